use crate::{CBox, SqliteDriver, SqlitePrepared, byte_length, error_message_from_ptr};
use libsqlite3_sys::{
    SQLITE_OK, SQLITE_OPEN_CREATE, SQLITE_OPEN_READWRITE, SQLITE_OPEN_URI, sqlite3,
    sqlite3_busy_timeout, sqlite3_close, sqlite3_errmsg, sqlite3_finalize, sqlite3_open_v2,
    sqlite3_prepare_v2, sqlite3_stmt,
};
use sigil_core::{
    Connection, Context, Driver, Error, Executor, Result, log_error, truncate_long,
};
use std::{
    ffi::{CString, c_char, c_int},
    ptr,
};

/// Milliseconds a statement waits on a locked database before failing.
const BUSY_TIMEOUT: c_int = 5_000;

pub struct SqliteConnection {
    pub(crate) connection: CBox<sqlite3>,
}

impl SqliteConnection {
    fn error_message(&self) -> String {
        unsafe { error_message_from_ptr(&sqlite3_errmsg(*self.connection)).to_string() }
    }

    /// Compile the first statement of `sql`, returns it with the number of bytes it spans.
    ///
    /// The statement is null when `sql` starts with nothing but comments or whitespace.
    fn prepare_next(&self, sql: &str) -> Result<(CBox<sqlite3_stmt>, usize)> {
        let mut statement = CBox::<sqlite3_stmt>::new(ptr::null_mut(), |p| unsafe {
            sqlite3_finalize(p);
        });
        let mut tail: *const c_char = ptr::null();
        let rc = unsafe {
            sqlite3_prepare_v2(
                *self.connection,
                sql.as_ptr() as *const c_char,
                byte_length(sql.len())?,
                &mut *statement,
                &mut tail,
            )
        };
        if rc != SQLITE_OK {
            return Err(Error::msg(self.error_message()));
        }
        let consumed = if tail.is_null() {
            sql.len()
        } else {
            unsafe { tail.offset_from(sql.as_ptr() as *const c_char) as usize }
        };
        Ok((statement, consumed))
    }
}

impl Executor for SqliteConnection {
    type Driver = SqliteDriver;

    fn driver(&self) -> &Self::Driver {
        &SqliteDriver
    }

    fn prepare(&mut self, sql: String) -> Result<SqlitePrepared> {
        let context = || format!("While preparing the query:\n{}", truncate_long!(sql));
        let (statement, mut consumed) = self
            .prepare_next(&sql)
            .map_err(|e| log_error!(e.context(context())))?;
        if statement.is_null() {
            return Err(log_error!(
                Error::msg("The query does not contain any statement").context(context())
            ));
        }
        // Only comments, whitespace and empty statements may follow
        while consumed < sql.len() {
            let (next, length) = self
                .prepare_next(&sql[consumed..])
                .map_err(|e| log_error!(e.context(context())))?;
            if !next.is_null() {
                return Err(log_error!(
                    Error::msg("Cannot prepare more than one statement at a time")
                        .context(context())
                ));
            }
            if length == 0 {
                break;
            }
            consumed += length;
        }
        Ok(SqlitePrepared::new(statement))
    }
}

impl Connection for SqliteConnection {
    /// Open `sqlite://<location>`, where location is a path, `:memory:` or a sqlite URI
    /// (`sqlite://data.db?mode=ro`).
    fn connect(url: &str) -> Result<SqliteConnection> {
        let prefix = format!("{}://", <Self::Driver as Driver>::NAME);
        let Some(location) = url.strip_prefix(&prefix) else {
            return Err(log_error!(Error::msg(format!(
                "Expected sqlite connection url to start with `{}`",
                &prefix
            ))));
        };
        let location = if location.starts_with("file:") {
            location.to_string()
        } else {
            format!("file:{}", location)
        };
        let context = || format!("Error while decoding connection URL: `{}`", url);
        let location = CString::new(location).with_context(context)?;
        let mut connection = CBox::<sqlite3>::new(ptr::null_mut(), |p| unsafe {
            sqlite3_close(p);
        });
        let rc = unsafe {
            sqlite3_open_v2(
                location.as_ptr(),
                &mut *connection,
                SQLITE_OPEN_READWRITE | SQLITE_OPEN_CREATE | SQLITE_OPEN_URI,
                ptr::null(),
            )
        };
        let connection = Self { connection };
        if rc != SQLITE_OK {
            let error = if connection.connection.is_null() {
                Error::msg("Could not allocate the sqlite connection")
            } else {
                Error::msg(connection.error_message())
            };
            return Err(log_error!(error.context(format!("Cannot open `{}`", url))));
        }
        unsafe {
            sqlite3_busy_timeout(*connection.connection, BUSY_TIMEOUT);
        }
        log::debug!("Opened sqlite connection `{}`", url);
        Ok(connection)
    }
}
