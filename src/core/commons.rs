// src/core/commons.rs

/// Wraps a value in double quotes, escaping backslashes and quotes it already contains.
///
/// Used for every path and option-file value placed on a composed command line. The
/// executor splits lines with POSIX rules, under which the value comes back unchanged as a
/// single argument.
pub fn wrap_value(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Joins non-empty command fragments with single spaces.
pub fn join_parts<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parts
        .into_iter()
        .filter_map(|p| {
            let trimmed = p.as_ref().trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_value_escapes_quotes() {
        assert_eq!(wrap_value("C:/My Projects"), "\"C:/My Projects\"");
        assert_eq!(wrap_value("say \"hi\""), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_wrap_value_escapes_backslashes() {
        assert_eq!(wrap_value(r"C:\sdk\"), r#""C:\\sdk\\""#);
    }

    #[test]
    fn test_wrapped_values_split_back_to_the_original() {
        let values = [
            r"C:\sdk\",
            r"\\server\share",
            r#"say "hi" \"twice\""#,
            "C:/Program Files (x86)/Kit",
            "$HOME and `ticks`",
            "",
        ];
        for value in values {
            let line = format!("cmake -DX={}", wrap_value(value));
            let parts = shlex::split(&line).unwrap();
            assert_eq!(parts, vec!["cmake".to_string(), format!("-DX={}", value)], "value: {}", value);
        }
    }

    #[test]
    fn test_join_parts_skips_empty_fragments() {
        assert_eq!(join_parts(["cmake", "", "  -B x ", " "]), "cmake -B x");
    }
}
