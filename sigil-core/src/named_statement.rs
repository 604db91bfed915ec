use crate::{
    AsValue, BindError, Driver, Error, Executor, Opaque, ParameterTable, Prepared, Result,
    Rewritten, RowsAffected, SqlType, StreamKind, StreamValue, Value, log_error, rewrite,
};
use std::{
    any::Any,
    fmt::{self, Display},
    io::Read,
};
use time::{OffsetDateTime, UtcOffset};

type PreparedOf<E> = <<E as Executor>::Driver as Driver>::Prepared;

struct Current<P> {
    rewritten: Rewritten,
    prepared: P,
}

/// A prepared statement whose parameters are bound by name.
///
/// The SQL uses `@name` placeholders. [`NamedStatement::set_statement`] rewrites them
/// into `?`, prepares the result on the executor and records the names in placeholder
/// order. Binding a name targets the first placeholder carrying that name.
///
/// ```rust,ignore
/// let mut statement = connection.named();
/// statement
///     .set_statement("UPDATE users SET name = @name WHERE id = @id")?
///     .bind("name", "Ada")?
///     .bind("id", 7)?;
/// statement.execute_update()?;
/// ```
pub struct NamedStatement<'e, E: Executor> {
    executor: &'e mut E,
    current: Option<Current<PreparedOf<E>>>,
}

impl<'e, E: Executor> NamedStatement<'e, E> {
    pub fn new(executor: &'e mut E) -> Self {
        Self {
            executor,
            current: None,
        }
    }

    /// Rewrite and prepare `sql`, replacing the previous statement.
    ///
    /// If the executor fails to prepare it, the previous statement and its bindings are
    /// left untouched and the executor error is returned as is.
    pub fn set_statement(&mut self, sql: &str) -> Result<&mut Self> {
        let rewritten = rewrite(sql);
        let prepared = self.executor.prepare(rewritten.sql.clone())?;
        self.current = Some(Current {
            rewritten,
            prepared,
        });
        Ok(self)
    }

    pub fn is_prepared(&self) -> bool {
        self.current.is_some()
    }

    /// The rewritten SQL, with positional placeholders.
    pub fn sql(&self) -> Option<&str> {
        self.current.as_ref().map(|v| v.rewritten.sql.as_str())
    }

    pub fn parameters(&self) -> Option<&ParameterTable> {
        self.current.as_ref().map(|v| &v.rewritten.parameters)
    }

    /// Parameter names in placeholder order, empty before any statement is set.
    pub fn parameter_names(&self) -> &[String] {
        self.parameters().map(ParameterTable::names).unwrap_or_default()
    }

    pub fn statement(&self) -> Option<&PreparedOf<E>> {
        self.current.as_ref().map(|v| &v.prepared)
    }

    pub fn statement_mut(&mut self) -> Option<&mut PreparedOf<E>> {
        self.current.as_mut().map(|v| &mut v.prepared)
    }

    fn current(&self) -> Result<&Current<PreparedOf<E>>> {
        self.current
            .as_ref()
            .ok_or_else(|| log_error!(Error::from(BindError::NotPrepared)))
    }

    fn current_mut(&mut self) -> Result<&mut Current<PreparedOf<E>>> {
        self.current
            .as_mut()
            .ok_or_else(|| log_error!(Error::from(BindError::NotPrepared)))
    }

    /// 1-based ordinal of the first placeholder named `name`.
    pub fn position(&self, name: &str) -> Result<u64> {
        self.current()?
            .rewritten
            .parameters
            .position(name)
            .map_err(|e| log_error!(e))
    }

    /// 1-based ordinals of every placeholder named `name`.
    pub fn positions(&self, name: &str) -> Result<Vec<u64>> {
        let positions = self
            .current()?
            .rewritten
            .parameters
            .positions(name)
            .collect::<Vec<_>>();
        if positions.is_empty() {
            return Err(log_error!(Error::from(BindError::UnknownParameter(
                name.to_owned()
            ))));
        }
        Ok(positions)
    }

    /// Bind `value` to the first placeholder named `name`.
    ///
    /// Later placeholders with the same name stay unbound, use [`NamedStatement::bind_all`]
    /// to reach them.
    pub fn bind(&mut self, name: &str, value: impl AsValue) -> Result<&mut Self> {
        let index = self.position(name)?;
        let current = self.current_mut()?;
        log::trace!("Binding `{}` at position {}", name, index);
        current.prepared.bind_index(value, index)?;
        Ok(self)
    }

    /// Bind `value` to every placeholder named `name`.
    ///
    /// Stream values can only be bound when the name occurs once.
    pub fn bind_all(&mut self, name: &str, value: impl AsValue) -> Result<&mut Self> {
        let positions = self.positions(name)?;
        let value = value.as_value();
        let (last, rest) = positions
            .split_last()
            .ok_or_else(|| Error::from(BindError::UnknownParameter(name.to_owned())))?;
        let copies = rest
            .iter()
            .map(|index| value.try_clone().map(|copy| (*index, copy)))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| log_error!(e.context(format!("While binding `{}`", name))))?;
        let current = self.current_mut()?;
        for (index, copy) in copies {
            log::trace!("Binding `{}` at position {}", name, index);
            current.prepared.bind_index(copy, index)?;
        }
        log::trace!("Binding `{}` at position {}", name, last);
        current.prepared.bind_index(value, *last)?;
        Ok(self)
    }

    /// Bind a NULL of the given target type.
    pub fn bind_null(&mut self, name: &str, sql_type: SqlType) -> Result<&mut Self> {
        self.bind(name, Value::Null(sql_type))
    }

    /// Bind a value read from `reader`, `length` bytes when given.
    pub fn bind_stream(
        &mut self,
        name: &str,
        kind: StreamKind,
        reader: impl Read + Send + 'static,
        length: Option<u64>,
    ) -> Result<&mut Self> {
        self.bind(name, StreamValue::new(kind, reader, length))
    }

    /// Bind a driver specific object, optionally tagged with its target type and scale.
    pub fn bind_object<T: Any + Send + Sync>(
        &mut self,
        name: &str,
        object: T,
        target: Option<SqlType>,
        scale: Option<u32>,
    ) -> Result<&mut Self> {
        let mut opaque = Opaque::new(object);
        opaque.target = target;
        opaque.scale = scale;
        self.bind(name, opaque)
    }

    /// Bind the calendar date of `instant` as seen at `offset`.
    pub fn bind_date_at(
        &mut self,
        name: &str,
        instant: OffsetDateTime,
        offset: UtcOffset,
    ) -> Result<&mut Self> {
        self.bind(name, instant.to_offset(offset).date())
    }

    /// Bind the wall clock time of `instant` as seen at `offset`.
    pub fn bind_time_at(
        &mut self,
        name: &str,
        instant: OffsetDateTime,
        offset: UtcOffset,
    ) -> Result<&mut Self> {
        self.bind(name, instant.to_offset(offset).time())
    }

    /// Bind `instant` expressed at `offset`.
    pub fn bind_timestamp_at(
        &mut self,
        name: &str,
        instant: OffsetDateTime,
        offset: UtcOffset,
    ) -> Result<&mut Self> {
        self.bind(name, instant.to_offset(offset))
    }

    /// Remove all the previously bound values.
    pub fn clear_bindings(&mut self) -> Result<&mut Self> {
        self.current_mut()?.prepared.clear_bindings()?;
        Ok(self)
    }

    /// Run the statement, returns true when it produces a row set.
    pub fn execute(&mut self) -> Result<bool> {
        self.current_mut()?.prepared.execute()
    }

    /// Run the statement and stream its rows.
    pub fn execute_query(&mut self) -> Result<<PreparedOf<E> as Prepared>::Rows<'_>> {
        self.current_mut()?.prepared.execute_query()
    }

    /// Run a modify statement and return the number of rows it affected.
    pub fn execute_update(&mut self) -> Result<RowsAffected> {
        self.current_mut()?.prepared.execute_update()
    }
}

impl<'e, E: Executor> Display for NamedStatement<'e, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.current {
            Some(current) => Display::fmt(&current.rewritten, f),
            None => write!(f, "<no statement>"),
        }
    }
}
