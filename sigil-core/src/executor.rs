use crate::{Driver, NamedStatement, Result};

pub trait Executor: Sized {
    type Driver: Driver;

    fn driver(&self) -> &Self::Driver;

    /// Prepare the SQL text, which uses positional `?` placeholders.
    fn prepare(&mut self, sql: String) -> Result<<Self::Driver as Driver>::Prepared>;

    /// Start a statement bound by parameter name on this executor.
    fn named(&mut self) -> NamedStatement<'_, Self> {
        NamedStatement::new(self)
    }
}
