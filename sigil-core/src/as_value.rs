use crate::{Error, Opaque, Parse, Result, SqlType, StreamValue, Value, truncate_long};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use std::{any, borrow::Cow, str::FromStr};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use url::Url;
use uuid::Uuid;

/// Conversion between native Rust types and the dynamically typed [`Value`]
/// used to bind parameters and to read rows.
///
/// # Examples
/// ```rust
/// use sigil_core::{AsValue, SqlType, Value};
/// assert_eq!(42i32.as_value(), Value::Int32(42));
/// assert_eq!(None::<i32>.as_value(), Value::Null(SqlType::Integer));
/// let n: i64 = AsValue::try_from_value(Value::Int32(42)).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// The NULL value typed after `Self`, used to bind `None`.
    fn as_empty_value() -> Value
    where
        Self: Sized;
    /// Convert into the owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Attempt to convert a [`Value`] read from a row into `Self`.
    ///
    /// Accepts the canonical variant of the type, plus the alternatives a driver may
    /// produce when they convert without loss (integers that fit, a double that is
    /// exactly representable as a float, text for temporal types). Decimals read as
    /// floating point take the nearest representable value.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized,
    {
        Err(Error::msg(format!(
            "Cannot convert {:?} into {}",
            value,
            any::type_name::<Self>()
        )))
    }
}

fn mismatch<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert {:?} into {}",
        value,
        any::type_name::<T>()
    ))
}

impl AsValue for Value {
    fn as_empty_value() -> Value {
        Value::Null(SqlType::Null)
    }
    fn as_value(self) -> Value {
        self
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(T::try_from_value(value)?))
    }
}

impl AsValue for bool {
    fn as_empty_value() -> Value {
        Value::Null(SqlType::Boolean)
    }
    fn as_value(self) -> Value {
        Value::Boolean(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Boolean(v) => Ok(v),
            Value::Int8(v) => Ok(v != 0),
            Value::Int16(v) => Ok(v != 0),
            Value::Int32(v) => Ok(v != 0),
            Value::Int64(v) => Ok(v != 0),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

macro_rules! impl_as_value_integer {
    ($source:ty, $variant:ident, $sql_type:ident) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                Value::Null(SqlType::$sql_type)
            }
            fn as_value(self) -> Value {
                Value::$variant(self.into())
            }
            fn try_from_value(value: Value) -> Result<Self> {
                let result = match value {
                    Value::Int8(v) => <$source>::try_from(v).ok(),
                    Value::Int16(v) => <$source>::try_from(v).ok(),
                    Value::Int32(v) => <$source>::try_from(v).ok(),
                    Value::Int64(v) => <$source>::try_from(v).ok(),
                    Value::Boolean(v) => Some(v as $source),
                    _ => return Err(mismatch::<Self>(&value)),
                };
                result.ok_or_else(|| {
                    Error::msg(format!(
                        "Value {:?} does not fit into {}",
                        value,
                        stringify!($source)
                    ))
                })
            }
        }
    };
}

impl_as_value_integer!(i8, Int8, TinyInt);
impl_as_value_integer!(i16, Int16, SmallInt);
impl_as_value_integer!(i32, Int32, Integer);
impl_as_value_integer!(i64, Int64, BigInt);
impl_as_value_integer!(u8, Int16, SmallInt);
impl_as_value_integer!(u16, Int32, Integer);
impl_as_value_integer!(u32, Int64, BigInt);

impl AsValue for f32 {
    fn as_empty_value() -> Value {
        Value::Null(SqlType::Real)
    }
    fn as_value(self) -> Value {
        Value::Float32(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float32(v) => Ok(v),
            Value::Float64(v) => {
                let narrowed = v as f32;
                if f64::from(narrowed) == v || v.is_nan() {
                    Ok(narrowed)
                } else {
                    Err(Error::msg(format!(
                        "Value {:?} cannot be represented as f32 without loss",
                        value
                    )))
                }
            }
            Value::Int8(v) => Ok(v.into()),
            Value::Int16(v) => Ok(v.into()),
            Value::Decimal(v) => v.to_f32().ok_or_else(|| mismatch::<Self>(&value)),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for f64 {
    fn as_empty_value() -> Value {
        Value::Null(SqlType::Double)
    }
    fn as_value(self) -> Value {
        Value::Float64(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float64(v) => Ok(v),
            Value::Float32(v) => Ok(v.into()),
            Value::Int8(v) => Ok(v.into()),
            Value::Int16(v) => Ok(v.into()),
            Value::Int32(v) => Ok(v.into()),
            Value::Decimal(v) => v.to_f64().ok_or_else(|| mismatch::<Self>(&value)),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for Decimal {
    fn as_empty_value() -> Value {
        Value::Null(SqlType::Decimal)
    }
    fn as_value(self) -> Value {
        Value::Decimal(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Decimal(v) => Ok(v),
            Value::Int8(v) => Ok(v.into()),
            Value::Int16(v) => Ok(v.into()),
            Value::Int32(v) => Ok(v.into()),
            Value::Int64(v) => Ok(v.into()),
            Value::Float32(v) => Decimal::from_f32(v).ok_or_else(|| mismatch::<Self>(&value)),
            Value::Float64(v) => Decimal::from_f64(v).ok_or_else(|| mismatch::<Self>(&value)),
            Value::Varchar(ref v) => Decimal::from_str_exact(v).map_err(|e| {
                Error::new(e).context(format!("Cannot parse '{}' as Decimal", truncate_long!(v)))
            }),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for String {
    fn as_empty_value() -> Value {
        Value::Null(SqlType::Varchar)
    }
    fn as_value(self) -> Value {
        Value::Varchar(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(v) => Ok(v),
            Value::Stream(v) => v.into_text(),
            _ => value.as_text().ok_or_else(|| mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for &str {
    fn as_empty_value() -> Value {
        Value::Null(SqlType::Varchar)
    }
    fn as_value(self) -> Value {
        Value::Varchar(self.into())
    }
}

impl AsValue for Cow<'_, str> {
    fn as_empty_value() -> Value {
        Value::Null(SqlType::Varchar)
    }
    fn as_value(self) -> Value {
        Value::Varchar(self.into_owned())
    }
}

impl AsValue for Vec<u8> {
    fn as_empty_value() -> Value {
        Value::Null(SqlType::Blob)
    }
    fn as_value(self) -> Value {
        Value::Blob(self.into())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(v) => Ok(v.into()),
            Value::Varchar(v) => Ok(v.into_bytes()),
            Value::Stream(v) => v.into_bytes(),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for Box<[u8]> {
    fn as_empty_value() -> Value {
        Value::Null(SqlType::Blob)
    }
    fn as_value(self) -> Value {
        Value::Blob(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Vec::<u8>::try_from_value(value).map(Into::into)
    }
}

impl AsValue for &[u8] {
    fn as_empty_value() -> Value {
        Value::Null(SqlType::Blob)
    }
    fn as_value(self) -> Value {
        Value::Blob(self.into())
    }
}

macro_rules! impl_as_value_textual {
    ($source:ty, $variant:ident, $sql_type:ident, $parse:expr) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                Value::Null(SqlType::$sql_type)
            }
            fn as_value(self) -> Value {
                Value::$variant(self)
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    Value::$variant(v) => Ok(v),
                    Value::Varchar(ref v) => $parse(v.as_str()),
                    _ => Err(mismatch::<Self>(&value)),
                }
            }
        }
    };
}

impl_as_value_textual!(Date, Date, Date, <Date as Parse>::parse);
impl_as_value_textual!(Time, Time, Time, <Time as Parse>::parse);
impl_as_value_textual!(
    PrimitiveDateTime,
    Timestamp,
    Timestamp,
    <PrimitiveDateTime as Parse>::parse
);
impl_as_value_textual!(
    OffsetDateTime,
    TimestampWithTimezone,
    TimestampWithTimezone,
    <OffsetDateTime as Parse>::parse
);
impl_as_value_textual!(Uuid, Uuid, Uuid, |v: &str| Uuid::from_str(v)
    .map_err(|e| Error::new(e).context(format!("Cannot parse '{}' as Uuid", v))));
impl_as_value_textual!(Url, Url, Url, |v: &str| Url::parse(v)
    .map_err(|e| Error::new(e).context(format!("Cannot parse '{}' as Url", v))));

impl AsValue for StreamValue {
    fn as_empty_value() -> Value {
        Value::Null(SqlType::Blob)
    }
    fn as_value(self) -> Value {
        Value::Stream(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Stream(v) => Ok(v),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for Opaque {
    fn as_empty_value() -> Value {
        Value::Null(SqlType::Null)
    }
    fn as_value(self) -> Value {
        Value::Object(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(v) => Ok(v),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}
