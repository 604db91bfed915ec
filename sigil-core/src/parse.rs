use crate::Result;
use anyhow::Context;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, format_description::BorrowedFormatItem,
    macros::format_description,
};

const DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second].[subsecond]");
const TIMESTAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]");
const TIMESTAMP_TZ: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]"
);

pub fn format_date(value: &Date) -> Result<String> {
    Ok(value.format(DATE)?)
}

pub fn format_time(value: &Time) -> Result<String> {
    Ok(value.format(TIME)?)
}

pub fn format_timestamp(value: &PrimitiveDateTime) -> Result<String> {
    Ok(value.format(TIMESTAMP)?)
}

pub fn format_timestamp_tz(value: &OffsetDateTime) -> Result<String> {
    Ok(value.format(TIMESTAMP_TZ)?)
}

/// Parsing of the textual forms drivers return for temporal values.
pub trait Parse {
    fn parse(value: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized;
}

impl Parse for Date {
    fn parse(value: impl AsRef<str>) -> Result<Self> {
        Date::parse(value.as_ref(), DATE)
            .with_context(|| format!("Cannot parse '{}' as time::Date", value.as_ref()))
    }
}

impl Parse for Time {
    fn parse(value: impl AsRef<str>) -> Result<Self> {
        let value = value.as_ref();
        Time::parse(value, TIME)
            .or(Time::parse(
                value,
                format_description!("[hour]:[minute]:[second]"),
            ))
            .or(Time::parse(value, format_description!("[hour]:[minute]")))
            .with_context(|| format!("Cannot parse '{}' as time::Time", value))
    }
}

impl Parse for PrimitiveDateTime {
    fn parse(value: impl AsRef<str>) -> Result<Self> {
        let value = value.as_ref();
        PrimitiveDateTime::parse(value, TIMESTAMP)
            .or(PrimitiveDateTime::parse(
                value,
                format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
            ))
            .or(PrimitiveDateTime::parse(
                value,
                format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
            ))
            .or(PrimitiveDateTime::parse(
                value,
                format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
            ))
            .with_context(|| format!("Cannot parse '{}' as time::PrimitiveDateTime", value))
    }
}

impl Parse for OffsetDateTime {
    fn parse(value: impl AsRef<str>) -> Result<Self> {
        let value = value.as_ref();
        OffsetDateTime::parse(value, TIMESTAMP_TZ)
            .or(OffsetDateTime::parse(
                value,
                format_description!(
                    "[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
                ),
            ))
            .or(OffsetDateTime::parse(
                value,
                format_description!(
                    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]"
                ),
            ))
            .with_context(|| format!("Cannot parse '{}' as time::OffsetDateTime", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, time};

    #[test]
    fn parse_temporal() {
        assert_eq!(<Date as Parse>::parse("2024-02-29").unwrap(), date!(2024 - 02 - 29));
        assert!(<Date as Parse>::parse("2023-02-29").is_err());
        assert_eq!(<Time as Parse>::parse("23:59").unwrap(), time!(23:59));
        assert_eq!(<Time as Parse>::parse("23:59:01.25").unwrap(), time!(23:59:01.25));
        assert_eq!(
            <PrimitiveDateTime as Parse>::parse("2024-02-29T10:00:00").unwrap(),
            datetime!(2024-02-29 10:00)
        );
        assert_eq!(
            <OffsetDateTime as Parse>::parse("2024-02-29 10:00:00.0+02:00").unwrap(),
            datetime!(2024-02-29 10:00 +2)
        );
    }

    #[test]
    fn format_then_parse() {
        let value = datetime!(1999-12-31 23:59:59.123456789 -05:30);
        let text = format_timestamp_tz(&value).unwrap();
        assert_eq!(text, "1999-12-31 23:59:59.123456789-05:30");
        assert_eq!(<OffsetDateTime as Parse>::parse(text).unwrap(), value);
    }
}
