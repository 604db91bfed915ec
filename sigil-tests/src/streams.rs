use sigil_core::{Executor, StreamKind};
use std::io::Cursor;

pub fn streams<E: Executor>(executor: &mut E) {
    let mut statement = executor.named();

    // Setup
    statement
        .set_statement("DROP TABLE IF EXISTS sigil_documents")
        .expect("Failed to prepare the drop of sigil_documents")
        .execute()
        .expect("Failed to drop sigil_documents");
    statement
        .set_statement("CREATE TABLE sigil_documents (id INTEGER PRIMARY KEY, body TEXT, data BLOB)")
        .expect("Failed to prepare the creation of sigil_documents")
        .execute()
        .expect("Failed to create sigil_documents");

    // Insert
    statement
        .set_statement("INSERT INTO sigil_documents (id, body, data) VALUES (@id, @body, @data)")
        .expect("Failed to prepare the insert");
    statement
        .bind("id", 1)
        .and_then(|s| {
            s.bind_stream(
                "body",
                StreamKind::Character,
                Cursor::new("Grüße aus Köln, and the rest is cut"),
                Some("Grüße aus Köln".len() as u64),
            )
        })
        .and_then(|s| s.bind_stream("data", StreamKind::Binary, Cursor::new(vec![0u8, 1, 2, 255]), None))
        .expect("Failed to bind the document");
    statement
        .execute_update()
        .expect("Failed to insert the document");

    // Declared length longer than the content
    let error = statement
        .bind_stream("body", StreamKind::Ascii, Cursor::new("short"), Some(100))
        .map(|_| ())
        .expect_err("A truncated stream must not bind");
    assert!(format!("{:#}", error).contains("declared length"));

    // Read back
    statement
        .set_statement("SELECT body, data FROM sigil_documents WHERE id = @id")
        .expect("Failed to prepare the select");
    statement.bind("id", 1).expect("Failed to bind id");
    let mut row = statement
        .execute_query()
        .expect("Failed to run the select")
        .next()
        .expect("Expected one document")
        .expect("Failed to read the document");
    assert_eq!(row.take::<String>("body").unwrap(), "Grüße aus Köln");
    assert_eq!(row.take::<Vec<u8>>("data").unwrap(), [0, 1, 2, 255]);
}
