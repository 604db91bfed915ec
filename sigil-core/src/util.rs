#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            &$query[..$crate::floor_char_boundary(&$query, 497)].trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}

/// Largest index not greater than `index` that lies on a char boundary of `value`.
pub fn floor_char_boundary(value: &str, index: usize) -> usize {
    if index >= value.len() {
        return value.len();
    }
    let mut index = index;
    while !value.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Logs the error and returns it, to be used as `return Err(log_error!(error))`.
#[macro_export]
macro_rules! log_error {
    ($error:expr) => {{
        let error = $error;
        log::error!("{:#}", error);
        error
    }};
}

#[cfg(test)]
mod tests {
    use super::floor_char_boundary;

    #[test]
    fn char_boundary() {
        assert_eq!(floor_char_boundary("abc", 10), 3);
        assert_eq!(floor_char_boundary("abc", 1), 1);
        assert_eq!(floor_char_boundary("aé", 2), 1);
    }

    #[test]
    fn truncate() {
        let long = "x".repeat(600);
        let truncated = format!("{}", truncate_long!(long));
        assert_eq!(truncated.len(), 500);
        assert!(truncated.ends_with("..."));
        assert_eq!(format!("{}", truncate_long!("SELECT 1  ")), "SELECT 1");
    }
}
