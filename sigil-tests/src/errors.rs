use crate::silent_logs;
use sigil_core::{BindError, Executor};

pub fn errors<E: Executor>(executor: &mut E) {
    let mut statement = executor.named();

    silent_logs! {
        // Nothing prepared yet
        let error = statement.bind("a", 1).map(|_| ()).expect_err("Binding must fail");
        assert_eq!(error.downcast_ref::<BindError>(), Some(&BindError::NotPrepared));
        assert!(statement.execute().is_err());

        statement
            .set_statement("SELECT @a AS a")
            .expect("Failed to prepare the select");
        statement.bind("a", 5).expect("Failed to bind a");

        // Unknown parameter
        let error = statement.bind("b", 1).map(|_| ()).expect_err("Binding must fail");
        assert_eq!(
            error.downcast_ref::<BindError>(),
            Some(&BindError::UnknownParameter("b".into()))
        );

        // The driver rejects the statement, the previous one stays in place
        let error = statement
            .set_statement("SELEC @b FROM")
            .map(|_| ())
            .expect_err("Malformed SQL must not prepare");
        assert!(error.downcast_ref::<BindError>().is_none());
        assert_eq!(statement.parameter_names(), ["a"]);
    };

    let a = statement
        .execute_query()
        .expect("Failed to run the select")
        .next()
        .expect("Expected one row")
        .and_then(|mut row| row.take::<i64>("a"))
        .expect("Failed to read a");
    assert_eq!(a, 5);
}
