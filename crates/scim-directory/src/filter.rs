//! Single-clause list filters.
//!
//! Only the shape `<path> <operator> "<value>"` is understood, and it is
//! always evaluated as equality between the attribute at `<path>` and the
//! unquoted value. Operators other than `eq` are accepted and treated as
//! `eq` (with a warning), which is a deliberate simplification of SCIM
//! filtering. Compound (`and`/`or`), grouped and bracketed filters are
//! rejected with [`FilterError::Unsupported`] rather than guessed at.

use scim_path::{format_attr_path, parse_attr_path, resolve_value, AtomicPaths, Path, Record};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("malformed filter {0:?}: expected `<attribute> <operator> \"<value>\"`")]
    Malformed(String),
    #[error("unsupported filter {filter:?}: {reason}")]
    Unsupported { filter: String, reason: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    /// Any other operator token, evaluated as `Eq`.
    Other(String),
}

impl FilterOperator {
    fn parse(token: &str) -> Self {
        if token.eq_ignore_ascii_case("eq") {
            FilterOperator::Eq
        } else {
            FilterOperator::Other(token.to_string())
        }
    }
}

/// One parsed `<path> <operator> "<value>"` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub path: Path,
    pub operator: FilterOperator,
    pub value: String,
}

impl Filter {
    /// Parse a single clause.
    ///
    /// The value is one token; whitespace inside `"` pairs belongs to it, so a
    /// quoted value may contain spaces. Every `"` is stripped from it. Fewer
    /// than three tokens is [`FilterError::Malformed`].
    pub fn parse(filter: &str, atomic: &AtomicPaths) -> Result<Self, FilterError> {
        let malformed = || FilterError::Malformed(filter.to_string());
        let unsupported = |reason| FilterError::Unsupported { filter: filter.to_string(), reason };

        let (path, rest) = next_token(filter).ok_or_else(malformed)?;
        let (operator, rest) = next_token(rest).ok_or_else(malformed)?;
        let raw_value = rest.trim();
        if raw_value.is_empty() {
            return Err(malformed());
        }
        if path.starts_with('(') || path.eq_ignore_ascii_case("not") {
            return Err(unsupported("grouped or negated filters are not supported"));
        }
        if path.contains('[') {
            return Err(unsupported("bracketed sub-attribute filters are not supported"));
        }
        let (value_token, trailing) = split_value(raw_value);
        if !trailing.trim().is_empty() {
            return Err(unsupported("compound filters are not supported"));
        }

        let operator = FilterOperator::parse(operator);
        if let FilterOperator::Other(op) = &operator {
            tracing::warn!(operator = %op, "filter operator evaluated as `eq`");
        }
        Ok(Filter {
            path: parse_attr_path(path, atomic),
            operator,
            value: value_token.replace('"', ""),
        })
    }

    /// Equality test against the attribute at `self.path`.
    ///
    /// Strings compare verbatim; booleans and numbers compare by their JSON
    /// rendering, so `"true"` matches both `"true"` and `true`. Absent
    /// attributes, nulls, arrays and objects never match.
    pub fn matches(&self, record: &Record) -> bool {
        match resolve_value(record, &self.path) {
            Some(Value::String(s)) => *s == self.value,
            Some(Value::Bool(b)) => b.to_string() == self.value,
            Some(Value::Number(n)) => n.to_string() == self.value,
            _ => false,
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match &self.operator {
            FilterOperator::Eq => "eq",
            FilterOperator::Other(op) => op.as_str(),
        };
        write!(f, "{} {} \"{}\"", format_attr_path(&self.path), op, self.value)
    }
}

/// Predicate over records used by list queries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecordFilter {
    #[default]
    All,
    Clause(Filter),
}

impl RecordFilter {
    /// `None` or a blank string yields [`RecordFilter::All`].
    pub fn parse(filter: Option<&str>, atomic: &AtomicPaths) -> Result<Self, FilterError> {
        match filter.map(str::trim) {
            None | Some("") => Ok(RecordFilter::All),
            Some(f) => Filter::parse(f, atomic).map(RecordFilter::Clause),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            RecordFilter::All => true,
            RecordFilter::Clause(filter) => filter.matches(record),
        }
    }
}

/// Splits the value token from whatever follows it. The token ends at the
/// first whitespace outside a `"` pair; an unclosed quote runs to the end.
fn split_value(s: &str) -> (&str, &str) {
    let mut quoted = false;
    for (i, c) in s.char_indices() {
        match c {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => return s.split_at(i),
            _ => {}
        }
    }
    (s, "")
}

/// Splits off the next whitespace-delimited token.
fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    Some(s.split_at(end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(s: &str) -> Result<Filter, FilterError> {
        Filter::parse(s, &AtomicPaths::default())
    }

    fn rec(v: Value) -> Record {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_basic_clause() {
        let f = parse(r#"userName eq "Bob""#).unwrap();
        assert_eq!(f.path, vec!["username"]);
        assert_eq!(f.operator, FilterOperator::Eq);
        assert_eq!(f.value, "Bob");
    }

    #[test]
    fn test_parse_nested_path_and_spaces_in_value() {
        let f = parse(r#"name.givenName  EQ   "Bob Smith""#).unwrap();
        assert_eq!(f.path, vec!["name", "givenname"]);
        assert_eq!(f.operator, FilterOperator::Eq);
        assert_eq!(f.value, "Bob Smith");
    }

    #[test]
    fn test_unquoted_value() {
        assert_eq!(parse("active eq true").unwrap().value, "true");
    }

    #[test]
    fn test_strips_every_quote() {
        assert_eq!(parse(r#"nickname eq Al"ly"#).unwrap().value, "Ally");
        assert_eq!(parse(r#"nickname eq "Al"#).unwrap().value, "Al");
        assert_eq!(parse(r#"nickname eq "Al"ly""#).unwrap().value, "Ally");
        assert_eq!(parse(r#"nickname eq "a""b""#).unwrap().value, "ab");
        assert_eq!(parse(r#"displayName eq "Al "Big" Ly""#).unwrap().value, "Al Big Ly");
    }

    #[test]
    fn test_malformed() {
        for f in ["", "active", "active eq", "   active   eq   "] {
            assert_eq!(parse(f), Err(FilterError::Malformed(f.to_string())), "{f:?}");
        }
    }

    #[test]
    fn test_unsupported_shapes() {
        for f in [
            r#"active eq "true" and userName eq "Bob""#,
            r#"emails[type eq "work"].value eq "a@x""#,
            r#"(active eq "true")"#,
            "active eq true or x eq y",
            r#"nickname eq "Al" ly"#,
        ] {
            assert!(matches!(parse(f), Err(FilterError::Unsupported { .. })), "{f:?}");
        }
    }

    #[test]
    fn test_other_operator_is_equality() {
        let f = parse(r#"userName co "Bob""#).unwrap();
        assert_eq!(f.operator, FilterOperator::Other("co".into()));
        assert!(f.matches(&rec(json!({"username": "Bob"}))));
        assert!(!f.matches(&rec(json!({"username": "Bobby"}))));
    }

    #[test]
    fn test_matches_string_bool_number() {
        let f = parse(r#"active eq "true""#).unwrap();
        assert!(f.matches(&rec(json!({"active": "true"}))));
        assert!(f.matches(&rec(json!({"active": true}))));
        assert!(!f.matches(&rec(json!({"active": "false"}))));
        assert!(!f.matches(&rec(json!({}))));
        let n = parse(r#"age eq "42""#).unwrap();
        assert!(n.matches(&rec(json!({"age": 42}))));
    }

    #[test]
    fn test_value_case_is_significant() {
        let f = parse(r#"userName eq "bob""#).unwrap();
        assert!(!f.matches(&rec(json!({"username": "Bob"}))));
    }

    #[test]
    fn test_record_filter_all() {
        let atomic = AtomicPaths::default();
        assert_eq!(RecordFilter::parse(None, &atomic), Ok(RecordFilter::All));
        assert_eq!(RecordFilter::parse(Some("  "), &atomic), Ok(RecordFilter::All));
        assert!(RecordFilter::All.matches(&Record::new()));
    }

    #[test]
    fn test_display() {
        let f = parse(r#"Name.GivenName eq "Bob""#).unwrap();
        assert_eq!(f.to_string(), r#"name.givenname eq "Bob""#);
    }
}
