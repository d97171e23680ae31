//! Parser for the bracketed list syntax group services print.
//!
//! `[ <identity ...>, x1, (x1*x2)^2 ]` splits into its top-level items. Commas
//! nested inside `()`, `[]`, `<>` or double-quoted strings do not split.

use super::ServiceError;

/// Split a printed list into trimmed top-level items. `[ ]` yields `[]`.
pub fn parse_list(text: &str) -> Result<Vec<String>, ServiceError> {
    let body = text
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| malformed(text, "not a bracketed list"))?;

    let mut items = Vec::new();
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        if in_string {
            if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' | '[' | '<' => depth += 1,
            ')' | ']' | '>' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| malformed(text, "unbalanced closing bracket"))?;
            }
            ',' if depth == 0 => {
                items.push(item(text, &body[start..i])?);
                start = i + 1;
            }
            _ => {}
        }
    }
    if in_string {
        return Err(malformed(text, "unterminated string"));
    }
    if depth != 0 {
        return Err(malformed(text, "unbalanced opening bracket"));
    }
    let last = body[start..].trim();
    if !(last.is_empty() && items.is_empty()) {
        items.push(item(text, last)?);
    }
    Ok(items)
}

/// Strip the quotes from a printed string (`"C2 x S4"`).
pub fn parse_string(text: &str) -> Result<String, ServiceError> {
    text.trim()
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .map(str::to_owned)
        .ok_or_else(|| malformed(text, "not a quoted string"))
}

pub fn parse_bool(text: &str) -> Result<bool, ServiceError> {
    match text.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(malformed(text, "not a boolean")),
    }
}

pub fn parse_usize(text: &str) -> Result<usize, ServiceError> {
    text.trim()
        .parse()
        .map_err(|_| malformed(text, "not a non-negative integer"))
}

fn item(text: &str, raw: &str) -> Result<String, ServiceError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(malformed(text, "empty list item"));
    }
    Ok(s.to_owned())
}

fn malformed(text: &str, reason: &str) -> ServiceError {
    const SHOWN: usize = 80;
    let mut what: String = text.trim().chars().take(SHOWN).collect();
    if text.trim().chars().count() > SHOWN {
        what.push('…');
    }
    ServiceError::Malformed {
        what,
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_top_level_only() {
        let items = parse_list("[ <identity ...>, x1, x1^-1*(x1*x2)^2, x2*x1 ]").unwrap();
        assert_eq!(
            items,
            vec!["<identity ...>", "x1", "x1^-1*(x1*x2)^2", "x2*x1"]
        );
    }

    #[test]
    fn nested_and_quoted_commas_do_not_split() {
        let items = parse_list(r#"[ "C2, weird", [ 1, 2 ], (a,b) ]"#).unwrap();
        assert_eq!(items, vec![r#""C2, weird""#, "[ 1, 2 ]", "(a,b)"]);
    }

    #[test]
    fn empty_list() {
        assert!(parse_list("[  ]").unwrap().is_empty());
        assert!(parse_list("[]").unwrap().is_empty());
    }

    #[test]
    fn truncated_or_unbalanced_is_malformed() {
        for bad in ["[ x1, x2", "x1, x2", "[ (x1, x2 ]", "[ x1), x2 ]", "[ x1,, x2 ]", "[ \"C2 ]", ""] {
            assert!(
                matches!(parse_list(bad), Err(ServiceError::Malformed { .. })),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn scalars() {
        assert_eq!(parse_string(" \"C2 x S4\" ").unwrap(), "C2 x S4");
        assert!(parse_string("S4").is_err());
        assert!(parse_bool("true").unwrap());
        assert!(!parse_bool(" false\n").unwrap());
        assert!(parse_bool("fail").is_err());
        assert_eq!(parse_usize(" 48 ").unwrap(), 48);
        assert!(parse_usize("-1").is_err());
    }
}
