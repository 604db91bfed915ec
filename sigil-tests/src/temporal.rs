use indoc::indoc;
use sigil_core::{Executor, SqlType};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time,
    macros::{date, datetime, offset, time},
};
use url::Url;
use uuid::Uuid;

pub fn temporal<E: Executor>(executor: &mut E) {
    let mut statement = executor.named();

    // Setup
    statement
        .set_statement("DROP TABLE IF EXISTS sigil_events")
        .expect("Failed to prepare the drop of sigil_events")
        .execute()
        .expect("Failed to drop sigil_events");
    statement
        .set_statement(indoc! {"
            CREATE TABLE sigil_events (
                id UUID PRIMARY KEY,
                day DATE,
                clock TIME,
                local_ts TIMESTAMP,
                zoned_ts TEXT,
                link TEXT
            )
        "})
        .expect("Failed to prepare the creation of sigil_events")
        .execute()
        .expect("Failed to create sigil_events");

    // Insert
    let id = Uuid::from_u128(0x7a1d_92c4_0b6e_4f4e_9c2f_5d3e_1a2b_3c4d);
    let instant = datetime!(2024-12-31 23:30:15 UTC);
    let link = Url::parse("https://example.com/events?id=1").expect("Failed to parse the url");
    statement
        .set_statement(indoc! {"
            INSERT INTO sigil_events (id, day, clock, local_ts, zoned_ts, link)
            VALUES (@id, @day, @clock, @local_ts, @zoned_ts, @link)
        "})
        .expect("Failed to prepare the insert");
    statement
        .bind("id", id)
        .and_then(|s| s.bind_date_at("day", instant, offset!(+2)))
        .and_then(|s| s.bind_time_at("clock", instant, offset!(+2)))
        .and_then(|s| s.bind("local_ts", datetime!(2024-02-29 12:00:00.5)))
        .and_then(|s| s.bind_timestamp_at("zoned_ts", instant, offset!(-5)))
        .and_then(|s| s.bind("link", link.clone()))
        .expect("Failed to bind the event");
    statement
        .execute_update()
        .expect("Failed to insert the event");
    statement
        .bind("id", Uuid::from_u128(1))
        .and_then(|s| s.bind_null("day", SqlType::Date))
        .and_then(|s| s.bind_null("clock", SqlType::Time))
        .and_then(|s| s.bind("local_ts", None::<PrimitiveDateTime>))
        .and_then(|s| s.bind("zoned_ts", None::<OffsetDateTime>))
        .and_then(|s| s.bind("link", None::<Url>))
        .expect("Failed to bind the empty event");
    statement
        .execute_update()
        .expect("Failed to insert the empty event");

    // Read back
    statement
        .set_statement("SELECT * FROM sigil_events WHERE id = @id")
        .expect("Failed to prepare the select");
    statement.bind("id", id).expect("Failed to bind id");
    let mut row = statement
        .execute_query()
        .expect("Failed to run the select")
        .next()
        .expect("Expected one event")
        .expect("Failed to read the event");
    assert_eq!(row.take::<Uuid>("id").unwrap(), id);
    assert_eq!(row.take::<Date>("day").unwrap(), date!(2025 - 01 - 01));
    assert_eq!(row.take::<Time>("clock").unwrap(), time!(01:30:15));
    assert_eq!(
        row.take::<PrimitiveDateTime>("local_ts").unwrap(),
        datetime!(2024-02-29 12:00:00.5)
    );
    let zoned = row.take::<OffsetDateTime>("zoned_ts").unwrap();
    assert_eq!(zoned, instant);
    assert_eq!(zoned.offset(), offset!(-5));
    assert_eq!(row.take::<Url>("link").unwrap(), link);

    statement
        .bind("id", Uuid::from_u128(1))
        .expect("Failed to bind id");
    let mut row = statement
        .execute_query()
        .expect("Failed to run the select")
        .next()
        .expect("Expected one event")
        .expect("Failed to read the event");
    assert_eq!(row.take::<Option<Date>>("day").unwrap(), None);
    assert_eq!(row.take::<Option<Time>>("clock").unwrap(), None);
    assert_eq!(row.take::<Option<Url>>("link").unwrap(), None);
}
