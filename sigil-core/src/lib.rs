mod as_value;
mod connection;
mod driver;
mod error;
mod executor;
mod named_statement;
mod parameters;
mod parse;
mod placeholder;
mod prepared;
mod query;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use connection::*;
pub use driver::*;
pub use error::*;
pub use executor::*;
pub use named_statement::*;
pub use parameters::*;
pub use parse::*;
pub use placeholder::*;
pub use prepared::*;
pub use query::*;
pub use util::*;
pub use value::*;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
