#[cfg(test)]
mod tests {
    use indoc::indoc;
    use sigil_core::{Placeholder, Token, rewrite, tokenize};

    #[test]
    fn reference_statement() {
        let rewritten = rewrite("SELECT * FROM t WHERE a=@x AND b='lit@eral' AND c=@y");
        assert_eq!(
            rewritten.sql,
            "SELECT * FROM t WHERE a=? AND b='lit@eral' AND c=?"
        );
        assert_eq!(rewritten.parameters.names(), ["x", "y"]);
        assert_eq!(rewritten.parameters.position("y").unwrap(), 2);
    }

    #[test]
    fn no_placeholders() {
        for sql in [
            "SELECT 1",
            "",
            "SELECT 'a@b' FROM t",
            "SELECT email FROM users WHERE email LIKE '%@example.com'",
            "SELECT ? FROM t",
        ] {
            let rewritten = rewrite(sql);
            assert_eq!(rewritten.sql, sql);
            assert!(rewritten.parameters.is_empty());
        }
    }

    #[test]
    fn one_question_mark_per_placeholder() {
        let sql = indoc! {"
            INSERT INTO orders (id, customer, note, total)
            VALUES (@id, @customer, 'paid @ counter', @total)
        "};
        let rewritten = rewrite(sql);
        assert_eq!(
            rewritten.sql,
            indoc! {"
                INSERT INTO orders (id, customer, note, total)
                VALUES (?, ?, 'paid @ counter', ?)
            "}
        );
        assert_eq!(rewritten.sql.matches('?').count(), 3);
        assert_eq!(rewritten.parameters.len(), 3);
        assert_eq!(rewritten.parameters.names(), ["id", "customer", "total"]);
    }

    #[test]
    fn boundaries() {
        let rewritten = rewrite("@a");
        assert_eq!(rewritten.sql, "?");
        assert_eq!(rewritten.parameters.names(), ["a"]);

        let rewritten = rewrite("@first = 1 AND 2 = @last");
        assert_eq!(rewritten.sql, "? = 1 AND 2 = ?");
        assert_eq!(rewritten.parameters.names(), ["first", "last"]);
    }

    #[test]
    fn consecutive_placeholders() {
        let rewritten = rewrite("SELECT @a@b, @c||@d");
        assert_eq!(rewritten.sql, "SELECT ??, ?||?");
        assert_eq!(rewritten.parameters.names(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn duplicates_are_kept() {
        let rewritten = rewrite("SELECT @x, @y, @z, @w, @x");
        assert_eq!(rewritten.sql, "SELECT ?, ?, ?, ?, ?");
        assert_eq!(rewritten.parameters.names(), ["x", "y", "z", "w", "x"]);
        assert_eq!(rewritten.parameters.position("x").unwrap(), 1);
        let rewritten = rewrite("SELECT @a, @x, @b, @c, @x");
        assert_eq!(rewritten.parameters.position("x").unwrap(), 2);
        assert_eq!(
            rewritten.parameters.positions("x").collect::<Vec<_>>(),
            [2, 5]
        );
    }

    #[test]
    fn literals_are_opaque() {
        let sql = "UPDATE t SET a = '@a', b = @b, c = '', d = '@d''@e', f = @f";
        let rewritten = rewrite(sql);
        assert_eq!(
            rewritten.sql,
            "UPDATE t SET a = '@a', b = ?, c = '', d = '@d''@e', f = ?"
        );
        assert_eq!(rewritten.parameters.names(), ["b", "f"]);
    }

    #[test]
    fn multiline_literal() {
        let sql = "SELECT 'line one\n@not_a_parameter\nline three', @p";
        let rewritten = rewrite(sql);
        assert_eq!(
            rewritten.sql,
            "SELECT 'line one\n@not_a_parameter\nline three', ?"
        );
        assert_eq!(rewritten.parameters.names(), ["p"]);
    }

    #[test]
    fn unterminated_literal_runs_to_the_end() {
        let sql = "SELECT @a, 'never closed @b AND @c";
        let rewritten = rewrite(sql);
        assert_eq!(rewritten.sql, "SELECT ?, 'never closed @b AND @c");
        assert_eq!(rewritten.parameters.names(), ["a"]);
        assert_eq!(
            tokenize(sql).last(),
            Some(Token::Literal(11..sql.len()))
        );
    }

    #[test]
    fn placeholder_offsets() {
        let sql = "x=@abc";
        assert_eq!(
            tokenize(sql).collect::<Vec<_>>(),
            [Token::Placeholder(Placeholder {
                name: "abc",
                start: 2,
                end: 6
            })]
        );
    }

    #[test]
    fn double_sentinel() {
        // Only the second sentinel is followed by a word character
        let rewritten = rewrite("SELECT @@rowcount");
        assert_eq!(rewritten.sql, "SELECT @?");
        assert_eq!(rewritten.parameters.names(), ["rowcount"]);
    }

    #[test]
    fn deterministic_and_idempotent() {
        let sql = "SELECT * FROM t WHERE a = @a AND b IN (@b, '@c', @a)";
        let first = rewrite(sql);
        let second = rewrite(sql);
        assert_eq!(first, second);
        let again = rewrite(&first.sql);
        assert_eq!(again.sql, first.sql);
        assert!(again.parameters.is_empty());
    }

    #[test]
    fn display_truncates() {
        let sql = format!("SELECT {} FROM t WHERE a = @a", "c, ".repeat(300));
        let rewritten = rewrite(&sql);
        let shown = rewritten.to_string();
        assert!(shown.len() <= 500);
        assert!(shown.ends_with("..."));
    }
}
