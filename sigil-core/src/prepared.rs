use crate::{AsValue, Result, RowLabeled, RowsAffected};
use std::fmt::Display;

/// A backend prepared statement, bound by 1-based ordinal position.
///
/// This is the contract a driver fulfills to sit under a [`NamedStatement`](crate::NamedStatement).
/// Every error it returns reaches the caller unchanged.
///
/// Methods binding values return `&mut Self` for fluent chaining:
/// ```rust,ignore
/// prepared.bind_index(42, 1)?.bind_index("hello", 2)?;
/// ```
pub trait Prepared: Display {
    /// Rows produced by [`Prepared::execute_query`], borrowing the statement.
    type Rows<'r>: Iterator<Item = Result<RowLabeled>>
    where
        Self: 'r;

    /// Bind a value at the 1-based `index`.
    fn bind_index<V: AsValue>(&mut self, value: V, index: u64) -> Result<&mut Self>;
    /// Remove all the previously bound values.
    fn clear_bindings(&mut self) -> Result<&mut Self>;
    /// Run the statement to completion, returns true when it produces a row set.
    fn execute(&mut self) -> Result<bool>;
    /// Run the statement and stream its rows.
    fn execute_query(&mut self) -> Result<Self::Rows<'_>>;
    /// Run a modify statement and return the number of rows it affected.
    fn execute_update(&mut self) -> Result<RowsAffected>;
}
