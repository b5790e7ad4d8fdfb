//! A minimal driver that stands in for the GUI event loop.
//!
//! Usage: `calendrum [config.json]`
//! It fires due events once per second, and prints the actions a notification layer would run.

use std::path::Path;
use std::time::Duration;

use calendrum::config::ManagerConfig;
use calendrum::EventManager;

const TICK: Duration = Duration::from_secs(1);

fn main() {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        None => ManagerConfig::default(),
        Some(path) => match ManagerConfig::from_file(Path::new(&path)) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Invalid configuration file: {}. Using a default configuration", err);
                ManagerConfig::default()
            }
        },
    };

    let mut manager = match EventManager::open(&config) {
        Ok(manager) => manager,
        Err(err) => {
            log::error!("Unable to load events from {:?}: {}", config.events_file, err);
            std::process::exit(1);
        }
    };

    println!("---- {} events in {:?} -----", manager.len(), config.events_file);
    calendrum::utils::print_event_list(&manager);

    // The first round also fires whatever expired while we were not running
    loop {
        if let Err(err) = manager.refresh_clock() {
            log::error!("Unable to read the clock: {}", err);
        } else {
            match manager.trigger_current() {
                Err(err) => log::error!("Unable to persist fired events: {}", err),
                Ok(actions) => {
                    for action in actions {
                        println!("{} -> {}", manager.current_time(), action);
                    }
                },
            }
        }
        std::thread::sleep(TICK);
    }
}
