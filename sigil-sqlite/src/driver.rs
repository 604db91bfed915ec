use crate::{SqliteConnection, SqlitePrepared};
use sigil_core::Driver;

#[derive(Default, Debug, Clone, Copy)]
pub struct SqliteDriver;

impl SqliteDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for SqliteDriver {
    type Connection = SqliteConnection;
    type Prepared = SqlitePrepared;

    const NAME: &'static str = "sqlite";
}
