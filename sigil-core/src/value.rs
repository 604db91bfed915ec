use crate::{Error, Result, format_date, format_time, format_timestamp, format_timestamp_tz};
use anyhow::Context;
use rust_decimal::Decimal;
use std::{
    any::{Any, type_name},
    fmt,
    io::Read,
    sync::Arc,
};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use url::Url;
use uuid::Uuid;

/// Target SQL type, used for typed NULLs and for opaque objects.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SqlType {
    /// No specific type, the driver decides.
    #[default]
    Null,
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Decimal,
    Varchar,
    Clob,
    Blob,
    Date,
    Time,
    Timestamp,
    TimestampWithTimezone,
    Uuid,
    Url,
    /// User defined or driver specific type, identified by name.
    Named(String),
}

/// How the bytes of a [`StreamValue`] must be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// 7 bit text.
    Ascii,
    /// Raw bytes.
    Binary,
    /// UTF-8 text.
    Character,
}

/// A value whose content is pulled from a reader when the driver binds it.
pub struct StreamValue {
    pub kind: StreamKind,
    /// Exact number of bytes to read, `None` reads until the end of the reader.
    pub length: Option<u64>,
    reader: Box<dyn Read + Send>,
}

impl StreamValue {
    pub fn new(kind: StreamKind, reader: impl Read + Send + 'static, length: Option<u64>) -> Self {
        Self {
            kind,
            length,
            reader: Box::new(reader),
        }
    }

    pub fn sql_type(&self) -> SqlType {
        match self.kind {
            StreamKind::Binary => SqlType::Blob,
            StreamKind::Ascii | StreamKind::Character => SqlType::Clob,
        }
    }

    /// Drain the reader.
    ///
    /// Fails if the reader ends before `length` bytes, or if the content does not
    /// match the stream kind (non ASCII bytes for `Ascii`, invalid UTF-8 for `Character`).
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        let StreamValue {
            kind,
            length,
            reader,
        } = self;
        let mut buffer = Vec::new();
        match length {
            Some(length) => {
                reader
                    .take(length)
                    .read_to_end(&mut buffer)
                    .context("While reading a stream parameter")?;
                if (buffer.len() as u64) < length {
                    return Err(Error::msg(format!(
                        "The stream parameter ended after {} bytes but its declared length is {}",
                        buffer.len(),
                        length
                    )));
                }
            }
            None => {
                let mut reader = reader;
                reader
                    .read_to_end(&mut buffer)
                    .context("While reading a stream parameter")?;
            }
        }
        match kind {
            StreamKind::Ascii if !buffer.is_ascii() => Err(Error::msg(
                "The ascii stream parameter contains non ascii bytes",
            )),
            StreamKind::Character if std::str::from_utf8(&buffer).is_err() => Err(Error::msg(
                "The character stream parameter is not valid UTF-8",
            )),
            _ => Ok(buffer),
        }
    }

    /// Drain a textual stream into a `String`.
    pub fn into_text(self) -> Result<String> {
        if self.kind == StreamKind::Binary {
            return Err(Error::msg("Cannot read a binary stream parameter as text"));
        }
        Ok(String::from_utf8(self.into_bytes()?)?)
    }
}

impl fmt::Debug for StreamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamValue")
            .field("kind", &self.kind)
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

/// A driver specific object, passed through untouched and downcast by the driver.
#[derive(Clone)]
pub struct Opaque {
    pub object: Arc<dyn Any + Send + Sync>,
    pub type_name: &'static str,
    pub target: Option<SqlType>,
    pub scale: Option<u32>,
}

impl Opaque {
    pub fn new<T: Any + Send + Sync>(object: T) -> Self {
        Self {
            object: Arc::new(object),
            type_name: type_name::<T>(),
            target: None,
            scale: None,
        }
    }
    pub fn with_target(mut self, target: SqlType) -> Self {
        self.target = Some(target);
        self
    }
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.object.downcast_ref::<T>()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Opaque")
            .field("type_name", &self.type_name)
            .field("target", &self.target)
            .field("scale", &self.scale)
            .finish()
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.object, &other.object)
            && self.target == other.target
            && self.scale == other.scale
    }
}

/// A value bound to a statement parameter or read from a result row.
#[derive(Debug)]
pub enum Value {
    Null(SqlType),
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Decimal(Decimal),
    Varchar(String),
    Blob(Box<[u8]>),
    Date(Date),
    Time(Time),
    Timestamp(PrimitiveDateTime),
    TimestampWithTimezone(OffsetDateTime),
    Uuid(Uuid),
    Url(Url),
    Stream(StreamValue),
    Object(Opaque),
}

impl Default for Value {
    fn default() -> Self {
        Value::Null(SqlType::Null)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null(l), Self::Null(r)) => l == r,
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Int8(l), Self::Int8(r)) => l == r,
            (Self::Int16(l), Self::Int16(r)) => l == r,
            (Self::Int32(l), Self::Int32(r)) => l == r,
            (Self::Int64(l), Self::Int64(r)) => l == r,
            (Self::Float32(l), Self::Float32(r)) => l == r,
            (Self::Float64(l), Self::Float64(r)) => l == r,
            (Self::Decimal(l), Self::Decimal(r)) => l == r,
            (Self::Varchar(l), Self::Varchar(r)) => l == r,
            (Self::Blob(l), Self::Blob(r)) => l == r,
            (Self::Date(l), Self::Date(r)) => l == r,
            (Self::Time(l), Self::Time(r)) => l == r,
            (Self::Timestamp(l), Self::Timestamp(r)) => l == r,
            (Self::TimestampWithTimezone(l), Self::TimestampWithTimezone(r)) => l == r,
            (Self::Uuid(l), Self::Uuid(r)) => l == r,
            (Self::Url(l), Self::Url(r)) => l == r,
            (Self::Object(l), Self::Object(r)) => l == r,
            // Streams are consumed on bind, two of them are never the same value
            _ => false,
        }
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null(..))
    }

    pub fn sql_type(&self) -> SqlType {
        match self {
            Value::Null(sql_type) => sql_type.clone(),
            Value::Boolean(..) => SqlType::Boolean,
            Value::Int8(..) => SqlType::TinyInt,
            Value::Int16(..) => SqlType::SmallInt,
            Value::Int32(..) => SqlType::Integer,
            Value::Int64(..) => SqlType::BigInt,
            Value::Float32(..) => SqlType::Real,
            Value::Float64(..) => SqlType::Double,
            Value::Decimal(..) => SqlType::Decimal,
            Value::Varchar(..) => SqlType::Varchar,
            Value::Blob(..) => SqlType::Blob,
            Value::Date(..) => SqlType::Date,
            Value::Time(..) => SqlType::Time,
            Value::Timestamp(..) => SqlType::Timestamp,
            Value::TimestampWithTimezone(..) => SqlType::TimestampWithTimezone,
            Value::Uuid(..) => SqlType::Uuid,
            Value::Url(..) => SqlType::Url,
            Value::Stream(stream) => stream.sql_type(),
            Value::Object(opaque) => opaque.target.clone().unwrap_or_default(),
        }
    }

    /// Duplicate the value, streams cannot be duplicated because reading them consumes them.
    pub fn try_clone(&self) -> Result<Value> {
        Ok(match self {
            Value::Null(v) => Value::Null(v.clone()),
            Value::Boolean(v) => Value::Boolean(*v),
            Value::Int8(v) => Value::Int8(*v),
            Value::Int16(v) => Value::Int16(*v),
            Value::Int32(v) => Value::Int32(*v),
            Value::Int64(v) => Value::Int64(*v),
            Value::Float32(v) => Value::Float32(*v),
            Value::Float64(v) => Value::Float64(*v),
            Value::Decimal(v) => Value::Decimal(*v),
            Value::Varchar(v) => Value::Varchar(v.clone()),
            Value::Blob(v) => Value::Blob(v.clone()),
            Value::Date(v) => Value::Date(*v),
            Value::Time(v) => Value::Time(*v),
            Value::Timestamp(v) => Value::Timestamp(*v),
            Value::TimestampWithTimezone(v) => Value::TimestampWithTimezone(*v),
            Value::Uuid(v) => Value::Uuid(*v),
            Value::Url(v) => Value::Url(v.clone()),
            Value::Object(v) => Value::Object(v.clone()),
            Value::Stream(..) => {
                return Err(Error::msg(
                    "A stream value can be bound to a single parameter only",
                ));
            }
        })
    }

    /// Textual rendering for drivers that store these kinds as text.
    ///
    /// Returns `None` for kinds that have a native representation (numbers, blobs,
    /// NULL) or that cannot be rendered without consuming them (streams, objects).
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Decimal(v) => Some(v.to_string()),
            Value::Varchar(v) => Some(v.clone()),
            Value::Date(v) => format_date(v).ok(),
            Value::Time(v) => format_time(v).ok(),
            Value::Timestamp(v) => format_timestamp(v).ok(),
            Value::TimestampWithTimezone(v) => format_timestamp_tz(v).ok(),
            Value::Uuid(v) => Some(v.to_string()),
            Value::Url(v) => Some(v.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use time::macros::{date, datetime, time};

    #[test]
    fn stream_declared_length() {
        let stream = StreamValue::new(StreamKind::Binary, Cursor::new(vec![1, 2, 3, 4]), Some(3));
        assert_eq!(stream.into_bytes().unwrap(), vec![1, 2, 3]);
        let stream = StreamValue::new(StreamKind::Binary, Cursor::new(vec![1, 2]), Some(3));
        assert!(stream.into_bytes().is_err());
        let stream = StreamValue::new(StreamKind::Binary, Cursor::new(vec![1, 2]), None);
        assert_eq!(stream.into_bytes().unwrap(), vec![1, 2]);
    }

    #[test]
    fn stream_kinds() {
        let stream = StreamValue::new(StreamKind::Ascii, Cursor::new("héllo"), None);
        assert!(stream.into_bytes().is_err());
        let stream = StreamValue::new(StreamKind::Character, Cursor::new("héllo"), None);
        assert_eq!(stream.into_text().unwrap(), "héllo");
        let stream = StreamValue::new(StreamKind::Character, Cursor::new(vec![0xff, 0xfe]), None);
        assert!(stream.into_bytes().is_err());
        let stream = StreamValue::new(StreamKind::Binary, Cursor::new("abc"), None);
        assert!(stream.into_text().is_err());
    }

    #[test]
    fn try_clone() {
        let value = Value::Varchar("abc".into());
        assert_eq!(value.try_clone().unwrap(), value);
        let object = Value::Object(Opaque::new(5u8).with_target(SqlType::TinyInt));
        assert_eq!(object.try_clone().unwrap(), object);
        let stream = Value::Stream(StreamValue::new(StreamKind::Binary, Cursor::new("x"), None));
        assert!(stream.try_clone().is_err());
        assert_ne!(
            Value::Object(Opaque::new(5u8)),
            Value::Object(Opaque::new(5u8))
        );
    }

    #[test]
    fn sql_types() {
        assert_eq!(Value::default().sql_type(), SqlType::Null);
        assert_eq!(Value::Int32(1).sql_type(), SqlType::Integer);
        assert_eq!(
            Value::Null(SqlType::Named("geometry".into())).sql_type(),
            SqlType::Named("geometry".into())
        );
        assert_eq!(
            Value::Object(Opaque::new(()).with_target(SqlType::Blob)).sql_type(),
            SqlType::Blob
        );
        assert_ne!(Value::Null(SqlType::Integer), Value::Null(SqlType::Varchar));
        assert_ne!(Value::Int32(1), Value::Int64(1));
    }

    #[test]
    fn text_rendering() {
        assert_eq!(
            Value::Date(date!(2025 - 03 - 09)).as_text().as_deref(),
            Some("2025-03-09")
        );
        assert_eq!(
            Value::Time(time!(08:05:00)).as_text().as_deref(),
            Some("08:05:00.0")
        );
        assert_eq!(
            Value::Timestamp(datetime!(2025-03-09 08:05:01.5)).as_text().as_deref(),
            Some("2025-03-09 08:05:01.5")
        );
        assert_eq!(Value::Int32(1).as_text(), None);
    }

    #[test]
    fn opaque_downcast() {
        let opaque = Opaque::new(String::from("point(1 2)")).with_scale(2);
        assert_eq!(opaque.downcast_ref::<String>().unwrap(), "point(1 2)");
        assert!(opaque.downcast_ref::<i32>().is_none());
        assert_eq!(opaque.scale, Some(2));
        assert!(format!("{:?}", opaque).contains("alloc::string::String"));
    }
}
