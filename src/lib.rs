//! Named `@name` placeholders on top of positional prepared statements.
//!
//! ```rust,ignore
//! use sigil::{Connection, Executor};
//! use sigil_sqlite::SqliteConnection;
//!
//! let mut connection = SqliteConnection::connect("sqlite://:memory:")?;
//! let mut statement = connection.named();
//! statement.set_statement("SELECT * FROM users WHERE email = @email AND active = @active")?;
//! statement.bind("email", "ada@example.com")?.bind("active", true)?;
//! for row in statement.execute_query()? {
//!     println!("{:?}", row?);
//! }
//! ```
pub use sigil_core::*;
