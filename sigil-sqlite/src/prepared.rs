use crate::{
    CBox, byte_length, error_message_from_ptr,
    extract::{extract_name, extract_value},
};
use libsqlite3_sys::*;
use sigil_core::{
    AsValue, Error, Prepared, Result, RowLabeled, RowNames, RowsAffected, StreamKind, Value,
    log_error, truncate_long,
};
use std::{
    ffi::{CStr, c_int},
    fmt::{self, Display},
    os::raw::{c_char, c_void},
};

pub struct SqlitePrepared {
    pub(crate) statement: CBox<sqlite3_stmt>,
}

impl SqlitePrepared {
    pub(crate) fn new(statement: CBox<sqlite3_stmt>) -> Self {
        unsafe {
            sqlite3_clear_bindings(*statement);
        }
        Self { statement }
    }

    /// The SQL text the statement was prepared from.
    pub fn sql(&self) -> String {
        unsafe {
            let sql = sqlite3_sql(*self.statement);
            if sql.is_null() {
                return String::new();
            }
            CStr::from_ptr(sql).to_string_lossy().into_owned()
        }
    }

    fn error(&self, context: impl Display) -> Error {
        let message = unsafe {
            error_message_from_ptr(&sqlite3_errmsg(sqlite3_db_handle(*self.statement))).to_string()
        };
        let sql = self.sql();
        log_error!(Error::msg(message).context(format!("{}:\n{}", context, truncate_long!(sql))))
    }

    fn column_count(&self) -> c_int {
        unsafe { sqlite3_column_count(*self.statement) }
    }

    /// Rewind the statement so it can run again, bindings are kept.
    fn reset(&mut self) {
        unsafe {
            sqlite3_reset(*self.statement);
        }
    }

    /// Advance to the next row, false once the statement is done.
    fn step(&mut self) -> Result<bool> {
        match unsafe { sqlite3_step(*self.statement) } {
            SQLITE_ROW => Ok(true),
            SQLITE_DONE => Ok(false),
            _ => Err(self.error("While executing the query")),
        }
    }

    fn labels(&self) -> Result<RowNames> {
        (0..self.column_count())
            .map(|i| extract_name(*self.statement, i))
            .collect()
    }

    fn row(&self, labels: &RowNames) -> Result<RowLabeled> {
        let values = (0..self.column_count())
            .map(|i| extract_value(*self.statement, i))
            .collect::<Result<_>>()?;
        Ok(RowLabeled::new(labels.clone(), values))
    }

    fn total_changes(&self) -> i64 {
        unsafe { sqlite3_total_changes64(sqlite3_db_handle(*self.statement)) }
    }

    /// Rows written by the last completed INSERT, UPDATE or DELETE, triggers excluded.
    fn changes(&self) -> u64 {
        unsafe { sqlite3_changes64(sqlite3_db_handle(*self.statement)) as u64 }
    }

    fn last_insert_rowid(&self) -> i64 {
        unsafe { sqlite3_last_insert_rowid(sqlite3_db_handle(*self.statement)) }
    }

    fn bind_text(&mut self, index: c_int, text: &str) -> Result<c_int> {
        let length = byte_length(text.len())
            .map_err(|e| log_error!(e.context(format!("Cannot bind parameter {}", index))))?;
        Ok(unsafe {
            sqlite3_bind_text(
                *self.statement,
                index,
                text.as_ptr() as *const c_char,
                length,
                SQLITE_TRANSIENT(),
            )
        })
    }

    fn bind_blob(&mut self, index: c_int, blob: &[u8]) -> Result<c_int> {
        let length = byte_length(blob.len())
            .map_err(|e| log_error!(e.context(format!("Cannot bind parameter {}", index))))?;
        Ok(unsafe {
            sqlite3_bind_blob(
                *self.statement,
                index,
                blob.as_ptr() as *const c_void,
                length,
                SQLITE_TRANSIENT(),
            )
        })
    }

    fn unsupported(value: impl fmt::Debug) -> Error {
        log_error!(Error::msg(format!(
            "Cannot use a {:?} as a query parameter",
            value
        )))
    }
}

impl Prepared for SqlitePrepared {
    type Rows<'r> = SqliteRows<'r>;

    fn bind_index<V: AsValue>(&mut self, value: V, index: u64) -> Result<&mut Self> {
        let Ok(index) = c_int::try_from(index) else {
            return Err(log_error!(Error::msg(format!(
                "Parameter index {} is out of range",
                index
            ))));
        };
        // A statement that already ran must be rewound before it accepts new values
        self.reset();
        let statement = *self.statement;
        let value = value.as_value();
        let rc = match value {
            Value::Null(..) => unsafe { sqlite3_bind_null(statement, index) },
            Value::Boolean(v) => unsafe { sqlite3_bind_int(statement, index, v as c_int) },
            Value::Int8(v) => unsafe { sqlite3_bind_int(statement, index, v as c_int) },
            Value::Int16(v) => unsafe { sqlite3_bind_int(statement, index, v as c_int) },
            Value::Int32(v) => unsafe { sqlite3_bind_int(statement, index, v as c_int) },
            Value::Int64(v) => unsafe { sqlite3_bind_int64(statement, index, v) },
            Value::Float32(v) => unsafe { sqlite3_bind_double(statement, index, v as f64) },
            Value::Float64(v) => unsafe { sqlite3_bind_double(statement, index, v) },
            Value::Blob(ref v) => self.bind_blob(index, v)?,
            Value::Stream(stream) => {
                let kind = stream.kind;
                let bytes = stream.into_bytes().map_err(|e| {
                    log_error!(e.context(format!("Cannot bind parameter {}", index)))
                })?;
                match kind {
                    StreamKind::Binary => self.bind_blob(index, &bytes)?,
                    // Content was validated as text while draining the stream
                    StreamKind::Ascii | StreamKind::Character => {
                        let text = String::from_utf8(bytes)?;
                        self.bind_text(index, &text)?
                    }
                }
            }
            Value::Object(ref opaque) => {
                if let Some(v) = opaque.downcast_ref::<String>() {
                    self.bind_text(index, v)?
                } else if let Some(v) = opaque.downcast_ref::<Vec<u8>>() {
                    self.bind_blob(index, v)?
                } else if let Some(v) = opaque.downcast_ref::<i64>() {
                    unsafe { sqlite3_bind_int64(statement, index, *v) }
                } else if let Some(v) = opaque.downcast_ref::<f64>() {
                    unsafe { sqlite3_bind_double(statement, index, *v) }
                } else {
                    return Err(Self::unsupported(opaque));
                }
            }
            ref v => match v.as_text() {
                Some(text) => self.bind_text(index, &text)?,
                None => return Err(Self::unsupported(v)),
            },
        };
        if rc != SQLITE_OK {
            return Err(self.error(format_args!("Cannot bind parameter {} to query", index)));
        }
        Ok(self)
    }

    fn clear_bindings(&mut self) -> Result<&mut Self> {
        self.reset();
        let rc = unsafe { sqlite3_clear_bindings(*self.statement) };
        if rc != SQLITE_OK {
            return Err(self.error("Cannot clear the bindings of query"));
        }
        Ok(self)
    }

    fn execute(&mut self) -> Result<bool> {
        self.reset();
        let rows = self.column_count() > 0;
        while self.step()? {}
        Ok(rows)
    }

    fn execute_query(&mut self) -> Result<Self::Rows<'_>> {
        self.reset();
        let labels = self.labels()?;
        Ok(SqliteRows {
            prepared: self,
            labels,
            done: false,
        })
    }

    fn execute_update(&mut self) -> Result<RowsAffected> {
        if self.column_count() > 0 {
            let sql = self.sql();
            return Err(log_error!(Error::msg(format!(
                "Cannot run as an update a query that returns rows:\n{}",
                truncate_long!(sql)
            ))));
        }
        self.reset();
        let changes = self.total_changes();
        let rowid = self.last_insert_rowid();
        while self.step()? {}
        let last_insert_rowid = self.last_insert_rowid();
        // The total also counts trigger and cascade writes
        let rows_affected = if self.total_changes() != changes {
            self.changes()
        } else {
            0
        };
        Ok(RowsAffected {
            rows_affected,
            last_affected_id: (last_insert_rowid != rowid).then_some(last_insert_rowid),
        })
    }
}

impl Display for SqlitePrepared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sql = self.sql();
        write!(f, "{}", truncate_long!(sql))
    }
}

/// Rows of a running query, the statement is rewound on the next execution.
pub struct SqliteRows<'r> {
    prepared: &'r mut SqlitePrepared,
    labels: RowNames,
    done: bool,
}

impl SqliteRows<'_> {
    pub fn labels(&self) -> &RowNames {
        &self.labels
    }
}

impl Iterator for SqliteRows<'_> {
    type Item = Result<RowLabeled>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.prepared.step() {
            Ok(true) => Some(self.prepared.row(&self.labels)),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
