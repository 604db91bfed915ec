#[cfg(test)]
mod tests {
    use sigil_core::Connection;
    use sigil_sqlite::SqliteConnection;
    use sigil_tests::{init_logs, silent_logs};
    use std::{fs, path::Path, sync::Mutex};

    static MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn create_database() {
        init_logs();
        const DB_PATH: &'static str = "../target/debug/creation.sqlite";
        let _guard = MUTEX.lock().unwrap();
        if Path::new(DB_PATH).exists() {
            fs::remove_file(DB_PATH)
                .expect(format!("Failed to remove test database file {}", DB_PATH).as_str());
        }
        assert!(
            !Path::new(DB_PATH).exists(),
            "Database file should not exist before test"
        );
        SqliteConnection::connect(&format!("sqlite://{}?mode=rwc", DB_PATH))
            .expect("Could not open the database");
        assert!(
            Path::new(DB_PATH).exists(),
            "Database file should be created after connection"
        );
        SqliteConnection::connect(&format!("sqlite://{}?mode=ro", DB_PATH))
            .expect("Could not open the database");
        fs::remove_file(DB_PATH)
            .expect(format!("Failed to remove existing test database file {}", DB_PATH).as_str());
        silent_logs! {
            assert!(
                SqliteConnection::connect(&format!("sqlite://{}?mode=ro", DB_PATH)).is_err(),
                "Should not be able to open in read only unexisting database"
            );
        };
    }

    #[test]
    fn wrong_url() {
        silent_logs! {
            assert!(SqliteConnection::connect("duckdb://some_value").is_err());
            assert!(SqliteConnection::connect("sqlite://bad\0name").is_err());
        };
    }
}
