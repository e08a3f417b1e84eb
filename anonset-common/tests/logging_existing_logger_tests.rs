//! Logging setup when the process already has a logger

use anonset_common::logging::{self, LogConfig, LogLevel};
use log::{Log, Metadata, Record};

struct Nop;

impl Log for Nop {
    fn enabled(&self, _: &Metadata) -> bool {
        false
    }

    fn log(&self, _: &Record) {}

    fn flush(&self) {}
}

static NOP: Nop = Nop;

#[test]
fn test_init_keeps_an_installed_logger() {
    log::set_logger(&NOP).unwrap();

    let config = LogConfig {
        level: LogLevel::Debug,
        ..LogConfig::default()
    };
    assert_eq!(logging::init(&config), Ok(()));
    assert_eq!(logging::init(&LogConfig::default()), Ok(()));

    // Helpers still go through the installed logger
    logging::log_selection(LogLevel::Info, "selection finished", None);
}
