use crate::{Connection, Prepared, Result};

pub trait Driver {
    type Connection: Connection<Driver = Self>;
    type Prepared: Prepared;

    /// Name of the driver, also the scheme of its connection URLs.
    const NAME: &'static str;

    fn connect(&self, url: &str) -> Result<Self::Connection> {
        Self::Connection::connect(url)
    }
}
