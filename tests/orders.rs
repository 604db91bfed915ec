#[cfg(test)]
mod tests {
    use indoc::indoc;
    use rust_decimal::Decimal;
    use sigil::{BindError, Connection, Executor, Result, RowLabeled};
    use sigil_sqlite::SqliteConnection;
    use sigil_tests::{init_logs, silent_logs};
    use std::str::FromStr;
    use time::macros::date;

    fn orders() -> SqliteConnection {
        init_logs();
        let mut connection =
            SqliteConnection::connect("sqlite://:memory:").expect("Could not open the database");
        let mut statement = connection.named();
        statement
            .set_statement(indoc! {"
                CREATE TABLE orders (
                    id INTEGER PRIMARY KEY,
                    customer TEXT NOT NULL,
                    note TEXT,
                    total TEXT NOT NULL,
                    placed TEXT NOT NULL
                )
            "})
            .expect("Failed to prepare")
            .execute()
            .expect("Failed to create the table");
        statement
            .set_statement(indoc! {"
                INSERT INTO orders (id, customer, note, total, placed)
                VALUES (@id, @customer, 'placed @ counter', @total, @placed)
            "})
            .expect("Failed to prepare");
        assert_eq!(
            statement.parameter_names(),
            ["id", "customer", "total", "placed"]
        );
        for (id, customer, total, placed) in [
            (1, "ada@example.com", "12.50", date!(2025 - 03 - 01)),
            (2, "alan@example.com", "7.25", date!(2025 - 03 - 02)),
            (3, "ada@example.com", "30.00", date!(2025 - 03 - 05)),
        ] {
            statement
                .bind("placed", placed)
                .and_then(|s| s.bind("total", Decimal::from_str(total)?))
                .and_then(|s| s.bind("customer", customer))
                .and_then(|s| s.bind("id", id))
                .expect("Failed to bind");
            assert_eq!(
                statement
                    .execute_update()
                    .expect("Failed to insert")
                    .rows_affected,
                1
            );
        }
        drop(statement);
        connection
    }

    #[test]
    fn select_by_name() {
        let mut connection = orders();
        let mut statement = connection.named();
        statement
            .set_statement(indoc! {"
                SELECT id, note, total, placed FROM orders
                WHERE customer = @customer AND placed >= @since
                ORDER BY id
            "})
            .expect("Failed to prepare");
        assert_eq!(
            statement.sql(),
            Some(indoc! {"
                SELECT id, note, total, placed FROM orders
                WHERE customer = ? AND placed >= ?
                ORDER BY id
            "})
        );
        statement
            .bind("since", date!(2025 - 03 - 01))
            .and_then(|s| s.bind("customer", "ada@example.com"))
            .expect("Failed to bind");
        let mut rows = statement
            .execute_query()
            .expect("Failed to run")
            .collect::<Result<Vec<RowLabeled>>>()
            .expect("Failed to read the rows");
        assert_eq!(rows.len(), 2);
        let first = &mut rows[0];
        assert_eq!(first.take::<i64>("id").unwrap(), 1);
        assert_eq!(first.take::<String>("note").unwrap(), "placed @ counter");
        assert_eq!(
            first.take::<Decimal>("total").unwrap(),
            Decimal::from_str("12.50").unwrap()
        );
        assert_eq!(
            first.take::<time::Date>("placed").unwrap(),
            date!(2025 - 03 - 01)
        );
        assert_eq!(rows[1].take::<i64>("id").unwrap(), 3);
    }

    #[test]
    fn repeated_name() {
        let mut connection = orders();
        let mut statement = connection.named();
        statement
            .set_statement(indoc! {"
                SELECT count(*) AS n FROM orders
                WHERE customer = @who OR (note IS NULL AND customer = @who)
            "})
            .expect("Failed to prepare");
        assert_eq!(statement.positions("who").unwrap(), [1, 2]);
        statement.bind_all("who", "alan@example.com").expect("Failed to bind");
        let n = statement
            .execute_query()
            .expect("Failed to run")
            .next()
            .expect("Expected a row")
            .and_then(|mut row| row.take::<i64>("n"))
            .expect("Failed to read");
        assert_eq!(n, 1);
    }

    #[test]
    fn unknown_names_are_reported() {
        let mut connection = orders();
        let mut statement = connection.named();
        statement
            .set_statement("DELETE FROM orders WHERE id = @id")
            .expect("Failed to prepare");
        silent_logs! {
            let error = statement.bind("ID", 1).map(|_| ()).unwrap_err();
            assert_eq!(
                error.downcast_ref::<BindError>(),
                Some(&BindError::UnknownParameter("ID".into()))
            );
        };
        statement.bind("id", 2).expect("Failed to bind");
        assert_eq!(statement.execute_update().unwrap().rows_affected, 1);
    }
}
