//! Value matchers: the atomic unit of type checking.
//!
//! A [`Matcher`] is a pure predicate over a [`serde_json::Value`] paired with
//! a stable, human-readable description. Descriptions are rendered through
//! `Display` and embedded verbatim in validation messages, so their format is
//! part of the public contract and must not drift.
//!
//! Primitive kinds are converted with `From<Kind>`; every other shape is
//! built explicitly through the constructors on [`Matcher`].

use crate::error::SchemaResult;
use chrono::{DateTime, FixedOffset};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Primitive kind tags recognized for type matching.
///
/// A bare kind converts into a type matcher; this is the only implicit
/// conversion the engine performs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Kind {
    /// String value
    String,
    /// Integer number
    Integer,
    /// Decimal number (integers qualify)
    Decimal,
    /// Boolean value
    Boolean,
    /// DateTime in RFC3339 format
    DateTime,
}

impl Kind {
    /// Whether the given value is of this kind.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Kind::String => value.is_string(),
            Kind::Integer => value.is_i64(),
            Kind::Decimal => value.is_i64() || value.is_f64(),
            Kind::Boolean => value.is_boolean(),
            Kind::DateTime => value
                .as_str()
                .is_some_and(|s| DateTime::<FixedOffset>::parse_from_rfc3339(s).is_ok()),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::String => "string",
            Kind::Integer => "integer",
            Kind::Decimal => "decimal",
            Kind::Boolean => "boolean",
            Kind::DateTime => "dateTime",
        };
        f.write_str(name)
    }
}

/// A predicate over a JSON value plus a description for diagnostics.
///
/// Matchers compose by wrapping: [`Matcher::array`] and [`Matcher::nullable`]
/// take an inner matcher and nest to arbitrary depth.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Value must be of a primitive kind
    Type(Kind),
    /// Value must be an array whose every element matches the inner matcher
    Array(Box<Matcher>),
    /// Value may be null, or must match the inner matcher
    Nullable(Box<Matcher>),
    /// Value must be a string drawn from a fixed set
    Options(Vec<String>),
    /// Value must be a string the expression finds a match in
    Pattern(Regex),
    /// Any value matches
    Anything,
    /// No value matches; marks a name as off-limits for direct storage
    Reserved,
}

impl Matcher {
    /// Array of values each matching `inner`. The empty array matches.
    pub fn array(inner: impl Into<Matcher>) -> Self {
        Matcher::Array(Box::new(inner.into()))
    }

    /// Null or a value matching `inner`.
    pub fn nullable(inner: impl Into<Matcher>) -> Self {
        Matcher::Nullable(Box::new(inner.into()))
    }

    /// A string equal to one of the allowed values.
    ///
    /// An empty set is legal but degenerate: it rejects everything.
    pub fn options<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Matcher::Options(allowed.into_iter().map(Into::into).collect())
    }

    /// A string the regular expression finds a match in (search, not a full
    /// anchor). Fails at definition time if the expression does not compile.
    pub fn pattern(expression: &str) -> SchemaResult<Self> {
        Ok(Matcher::Pattern(Regex::new(expression)?))
    }

    /// Matches every value.
    pub fn anything() -> Self {
        Matcher::Anything
    }

    /// Matches no value.
    pub fn reserved() -> Self {
        Matcher::Reserved
    }

    /// Apply the predicate. Pure; no side effects.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Matcher::Type(kind) => kind.matches(value),
            Matcher::Array(inner) => value
                .as_array()
                .is_some_and(|items| items.iter().all(|item| inner.matches(item))),
            Matcher::Nullable(inner) => value.is_null() || inner.matches(value),
            Matcher::Options(allowed) => value
                .as_str()
                .is_some_and(|s| allowed.iter().any(|option| option == s)),
            Matcher::Pattern(regex) => value.as_str().is_some_and(|s| regex.is_match(s)),
            Matcher::Anything => true,
            Matcher::Reserved => false,
        }
    }
}

impl From<Kind> for Matcher {
    fn from(kind: Kind) -> Self {
        Matcher::Type(kind)
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Type(kind) => write!(f, "{kind}"),
            Matcher::Array(inner) => write!(f, "array({inner})"),
            Matcher::Nullable(inner) => write!(f, "nullable({inner})"),
            Matcher::Options(allowed) => {
                write!(f, "options(")?;
                for (i, option) in allowed.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "'{option}'")?;
                }
                write!(f, ")")
            }
            Matcher::Pattern(regex) => write!(f, "regexp({})", regex.as_str()),
            Matcher::Anything => f.write_str("anything"),
            Matcher::Reserved => f.write_str("reserved"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_matching() {
        assert!(Kind::String.matches(&json!("abc")));
        assert!(!Kind::String.matches(&json!(42)));
        assert!(Kind::Integer.matches(&json!(42)));
        assert!(!Kind::Integer.matches(&json!(4.2)));
        assert!(Kind::Decimal.matches(&json!(4.2)));
        assert!(Kind::Decimal.matches(&json!(42)));
        assert!(Kind::Boolean.matches(&json!(false)));
        assert!(!Kind::Boolean.matches(&json!("false")));
    }

    #[test]
    fn test_datetime_kind() {
        assert!(Kind::DateTime.matches(&json!("2010-01-23T04:56:22Z")));
        assert!(!Kind::DateTime.matches(&json!("2010-02-30T04:56:22Z")));
        assert!(!Kind::DateTime.matches(&json!("not a date")));
        assert!(!Kind::DateTime.matches(&json!(1264222582)));
    }

    #[test]
    fn test_array_matcher() {
        let matcher = Matcher::array(Kind::String);
        assert!(matcher.matches(&json!([])));
        assert!(matcher.matches(&json!(["control", "treatment"])));
        assert!(!matcher.matches(&json!(["control", 7])));
        assert!(!matcher.matches(&json!("control")));
        assert!(!matcher.matches(&json!(null)));
    }

    #[test]
    fn test_nullable_matcher() {
        let matcher = Matcher::nullable(Kind::Integer);
        assert!(matcher.matches(&json!(null)));
        assert!(matcher.matches(&json!(7)));
        assert!(!matcher.matches(&json!("7")));
    }

    #[test]
    fn test_nested_composition() {
        let matcher = Matcher::nullable(Matcher::array(Matcher::nullable(Kind::String)));
        assert!(matcher.matches(&json!(null)));
        assert!(matcher.matches(&json!(["a", null, "b"])));
        assert!(!matcher.matches(&json!(["a", 1])));
    }

    #[test]
    fn test_options_matcher() {
        let matcher = Matcher::options(["user", "visitor"]);
        assert!(matcher.matches(&json!("user")));
        assert!(!matcher.matches(&json!("email")));
        assert!(!matcher.matches(&json!(null)));

        let empty = Matcher::options(Vec::<String>::new());
        assert!(!empty.matches(&json!("anything")));
    }

    #[test]
    fn test_pattern_matcher() {
        let matcher = Matcher::pattern("^https?://").unwrap();
        assert!(matcher.matches(&json!("https://example.com")));
        assert!(!matcher.matches(&json!("covfefe")));
        assert!(!matcher.matches(&json!(9000)));
        assert!(!matcher.matches(&json!(null)));
    }

    #[test]
    fn test_pattern_compile_failure() {
        assert!(Matcher::pattern("(").is_err());
    }

    #[test]
    fn test_anything_and_reserved() {
        assert!(Matcher::anything().matches(&json!(null)));
        assert!(Matcher::anything().matches(&json!({"a": 1})));
        assert!(!Matcher::reserved().matches(&json!(null)));
        assert!(!Matcher::reserved().matches(&json!("x")));
    }

    #[test]
    fn test_descriptions_are_stable() {
        assert_eq!(Matcher::from(Kind::String).to_string(), "string");
        assert_eq!(Matcher::array(Kind::String).to_string(), "array(string)");
        assert_eq!(
            Matcher::nullable(Matcher::pattern("^https?://").unwrap()).to_string(),
            "nullable(regexp(^https?://))"
        );
        assert_eq!(
            Matcher::options(["user", "visitor"]).to_string(),
            "options('user', 'visitor')"
        );
        assert_eq!(Matcher::options(Vec::<String>::new()).to_string(), "options()");
        assert_eq!(Matcher::anything().to_string(), "anything");
        assert_eq!(Matcher::reserved().to_string(), "reserved");
    }
}
