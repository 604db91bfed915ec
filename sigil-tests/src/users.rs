use indoc::indoc;
use rust_decimal::Decimal;
use sigil_core::{Executor, Result, RowLabeled, SqlType};

pub fn users<E: Executor>(executor: &mut E) {
    let mut statement = executor.named();

    // Setup
    statement
        .set_statement("DROP TABLE IF EXISTS sigil_users")
        .expect("Failed to prepare the drop of sigil_users")
        .execute()
        .expect("Failed to drop sigil_users");
    statement
        .set_statement(indoc! {"
            CREATE TABLE sigil_users (
                id INTEGER PRIMARY KEY,
                name VARCHAR(64) NOT NULL,
                email VARCHAR(128),
                score DOUBLE PRECISION,
                balance TEXT,
                active BOOLEAN
            )
        "})
        .expect("Failed to prepare the creation of sigil_users")
        .execute()
        .expect("Failed to create sigil_users");

    // Insert
    statement
        .set_statement(indoc! {"
            INSERT INTO sigil_users (id, name, email, score, balance, active)
            VALUES (@id, @name, @email, @score, @balance, @active)
        "})
        .expect("Failed to prepare the insert");
    assert_eq!(
        statement.parameter_names(),
        ["id", "name", "email", "score", "balance", "active"]
    );
    let users = [
        (1, "alice", Some("alice@example.com"), 9.5, Decimal::new(1250, 2), true),
        (2, "bob", Some("bob@example.org"), 7.0, Decimal::new(-300, 2), false),
        (3, "carol", None, 8.25, Decimal::new(0, 0), true),
        (4, "dave", Some("dave@example.com"), 5.5, Decimal::new(99999, 3), true),
    ];
    for (id, name, email, score, balance, active) in users {
        statement
            .bind("id", id)
            .and_then(|s| s.bind("name", name))
            .and_then(|s| s.bind("email", email))
            .and_then(|s| s.bind("score", score))
            .and_then(|s| s.bind("balance", balance))
            .and_then(|s| s.bind("active", active))
            .expect("Failed to bind the user");
        let affected = statement.execute_update().expect("Failed to insert a user");
        assert_eq!(affected.rows_affected, 1);
    }

    // Literal containing the sentinel
    statement
        .set_statement(indoc! {"
            SELECT id, name, email FROM sigil_users
            WHERE email LIKE '%@example.com' AND score >= @min
            ORDER BY id
        "})
        .expect("Failed to prepare the select by email");
    assert_eq!(statement.parameter_names(), ["min"]);
    assert!(
        statement
            .sql()
            .unwrap()
            .contains("email LIKE '%@example.com' AND score >= ?")
    );
    statement.bind("min", 5.0).expect("Failed to bind min");
    let mut rows = statement
        .execute_query()
        .expect("Failed to run the select by email")
        .collect::<Result<Vec<RowLabeled>>>()
        .expect("Failed to read the users");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].take::<String>("name").unwrap(), "alice");
    assert_eq!(rows[1].take::<String>("name").unwrap(), "dave");
    assert_eq!(
        rows[1].take::<String>("email").unwrap(),
        "dave@example.com"
    );

    // Same name used twice
    statement
        .set_statement("SELECT name FROM sigil_users WHERE id = @id OR id = @id + 1 ORDER BY id")
        .expect("Failed to prepare the select by id");
    assert_eq!(statement.positions("id").unwrap(), [1, 2]);
    statement.bind_all("id", 2).expect("Failed to bind id");
    let names = statement
        .execute_query()
        .expect("Failed to run the select by id")
        .map(|row| row.and_then(|mut row| row.take::<String>("name")))
        .collect::<Result<Vec<_>>>()
        .expect("Failed to read the users");
    assert_eq!(names, ["bob", "carol"]);
    statement.clear_bindings().expect("Failed to clear bindings");
    statement.bind("id", 2).expect("Failed to bind id");
    // Only the first occurrence received a value
    if let Ok(rows) = statement.execute_query() {
        if let Ok(rows) = rows.collect::<Result<Vec<_>>>() {
            assert!(rows.len() < 2);
        }
    }

    // Typed null
    statement
        .set_statement("UPDATE sigil_users SET email = @email WHERE id = @id")
        .expect("Failed to prepare the email update");
    statement
        .bind_null("email", SqlType::Varchar)
        .and_then(|s| s.bind("id", 1))
        .expect("Failed to bind the email update");
    let affected = statement
        .execute_update()
        .expect("Failed to update the email");
    assert_eq!(affected.rows_affected, 1);
    statement
        .set_statement("SELECT email, balance, active FROM sigil_users WHERE id = @id")
        .expect("Failed to prepare the select by id");
    statement.bind("id", 1).expect("Failed to bind id");
    let mut row = statement
        .execute_query()
        .expect("Failed to run the select by id")
        .next()
        .expect("Expected one user")
        .expect("Failed to read the user");
    assert_eq!(row.take::<Option<String>>("email").unwrap(), None);
    assert_eq!(
        row.take::<Decimal>("balance").unwrap(),
        Decimal::new(1250, 2)
    );
    assert!(row.take::<bool>("active").unwrap());

    // Update count
    statement
        .set_statement("UPDATE sigil_users SET score = score + @delta WHERE active = @active")
        .expect("Failed to prepare the score update");
    statement
        .bind("delta", 1.0)
        .and_then(|s| s.bind("active", true))
        .expect("Failed to bind the score update");
    let affected = statement
        .execute_update()
        .expect("Failed to update the scores");
    #[cfg(not(feature = "disable-update-count"))]
    assert_eq!(affected.rows_affected, 3);
    let _ = affected;

    statement
        .set_statement("SELECT COUNT(*) AS total FROM sigil_users WHERE score > @score")
        .expect("Failed to prepare the count");
    statement.bind("score", 9.0).expect("Failed to bind score");
    let total = statement
        .execute_query()
        .expect("Failed to run the count")
        .next()
        .expect("Expected one row")
        .and_then(|mut row| row.take::<i64>("total"))
        .expect("Failed to read the count");
    assert_eq!(total, 2);
}
