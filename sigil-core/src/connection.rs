use crate::{Executor, Result};

pub trait Connection: Executor {
    /// Open a connection to the given URL, `<driver name>://<location>`.
    fn connect(url: &str) -> Result<Self>;
}
