mod errors;
mod streams;
mod temporal;
mod users;

use crate::{errors::errors, temporal::temporal, users::users};
use log::LevelFilter;
use sigil_core::Connection;
use std::env;
#[cfg(not(feature = "disable-streams"))]
use streams::streams;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Run every named binding scenario against the connection.
pub fn execute_tests<C: Connection>(mut connection: C) {
    users(&mut connection);
    temporal(&mut connection);
    #[cfg(not(feature = "disable-streams"))]
    streams(&mut connection);
    errors(&mut connection);
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
