/*!
Named parameters.

A parameter is anything implementing [`Parameter`]: it knows its label, can
seed its default into a [`Matches`] record, can consume the words that follow
its label token, and can describe itself for help output.

Built-in kinds:
  - [`StringParam`]  : any single word
  - [`IntegerParam`] : a signed 64-bit integer
  - [`BooleanParam`] : true|1|yes|y|on / false|0|no|n|off (case-insensitive)
  - [`ChoiceParam`]  : one word out of a fixed set

New kinds plug in through [`crate::Variables::declare`]; nothing in the tree
or the dispatch loop knows about the concrete types.
*/

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::vars::Matches;

/// A parsed parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

/// Capability set every named parameter kind provides.
///
/// `consume` is only ever called with the words *after* the label token.
/// Implementations may take as many words as they need and must return the
/// unconsumed tail.
pub trait Parameter: fmt::Debug + Send + Sync {
    /// Label the user types to address this parameter.
    fn label(&self) -> &str;

    /// Value assigned when the parameter is not given.
    fn default_value(&self) -> Value;

    /// Write the default into `out`. Never fails.
    fn reset_to_default(&self, out: &mut Matches) {
        out.set_default(self.label(), self.default_value());
    }

    /// Parse leading words into `out`, returning the remainder.
    fn consume<'w>(&self, words: &'w [String], out: &mut Matches) -> Result<&'w [String]>;

    /// Type name shown in help tables.
    fn describe_type(&self) -> String;

    /// Default shown in help tables.
    fn describe_default(&self) -> String {
        self.default_value().to_string()
    }

    /// One-line description shown in help tables.
    fn describe_description(&self) -> String;
}

/// Split off the single value token, or fail with `MissingValue`.
fn take_one<'w>(label: &str, words: &'w [String]) -> Result<(&'w str, &'w [String])> {
    match words.split_first() {
        Some((first, rest)) => Ok((first.as_str(), rest)),
        None => Err(Error::MissingValue {
            label: label.to_string(),
        }),
    }
}

fn invalid(label: &str, value: &str, expected: impl Into<String>) -> Error {
    Error::InvalidValue {
        label: label.to_string(),
        value: value.to_string(),
        expected: expected.into(),
    }
}

/* ---- String ---- */

#[derive(Debug, Clone)]
pub struct StringParam {
    label: String,
    default: String,
    description: String,
}

impl StringParam {
    pub fn new(
        label: impl Into<String>,
        default: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            default: default.into(),
            description: description.into(),
        }
    }
}

impl Parameter for StringParam {
    fn label(&self) -> &str {
        &self.label
    }

    fn default_value(&self) -> Value {
        Value::String(self.default.clone())
    }

    fn consume<'w>(&self, words: &'w [String], out: &mut Matches) -> Result<&'w [String]> {
        let (value, rest) = take_one(&self.label, words)?;
        out.set(&self.label, Value::String(value.to_string()));
        Ok(rest)
    }

    fn describe_type(&self) -> String {
        "string".into()
    }

    fn describe_description(&self) -> String {
        self.description.clone()
    }
}

/* ---- Integer ---- */

#[derive(Debug, Clone)]
pub struct IntegerParam {
    label: String,
    default: i64,
    description: String,
}

impl IntegerParam {
    pub fn new(label: impl Into<String>, default: i64, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            default,
            description: description.into(),
        }
    }
}

impl Parameter for IntegerParam {
    fn label(&self) -> &str {
        &self.label
    }

    fn default_value(&self) -> Value {
        Value::Integer(self.default)
    }

    fn consume<'w>(&self, words: &'w [String], out: &mut Matches) -> Result<&'w [String]> {
        let (raw, rest) = take_one(&self.label, words)?;
        let n = raw
            .parse::<i64>()
            .map_err(|_| invalid(&self.label, raw, "integer"))?;
        out.set(&self.label, Value::Integer(n));
        Ok(rest)
    }

    fn describe_type(&self) -> String {
        "integer".into()
    }

    fn describe_description(&self) -> String {
        self.description.clone()
    }
}

/* ---- Boolean ---- */

#[derive(Debug, Clone)]
pub struct BooleanParam {
    label: String,
    default: bool,
    description: String,
}

impl BooleanParam {
    pub fn new(label: impl Into<String>, default: bool, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            default,
            description: description.into(),
        }
    }
}

/// Accepts the usual spellings of yes/no.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "on" => Some(true),
        "false" | "0" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

impl Parameter for BooleanParam {
    fn label(&self) -> &str {
        &self.label
    }

    fn default_value(&self) -> Value {
        Value::Boolean(self.default)
    }

    fn consume<'w>(&self, words: &'w [String], out: &mut Matches) -> Result<&'w [String]> {
        let (raw, rest) = take_one(&self.label, words)?;
        let b = parse_bool(raw).ok_or_else(|| invalid(&self.label, raw, "boolean"))?;
        out.set(&self.label, Value::Boolean(b));
        Ok(rest)
    }

    fn describe_type(&self) -> String {
        "boolean".into()
    }

    fn describe_description(&self) -> String {
        self.description.clone()
    }
}

/* ---- Choice ---- */

/// One word out of a fixed list; stored as `Value::String`.
#[derive(Debug, Clone)]
pub struct ChoiceParam {
    label: String,
    choices: Vec<String>,
    default: String,
    description: String,
}

impl ChoiceParam {
    /// `default` is not required to be one of `choices`; a sentinel such as
    /// `""` is allowed for "not chosen".
    pub fn new<I, S>(
        label: impl Into<String>,
        choices: I,
        default: impl Into<String>,
        description: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            choices: choices.into_iter().map(Into::into).collect(),
            default: default.into(),
            description: description.into(),
        }
    }
}

impl Parameter for ChoiceParam {
    fn label(&self) -> &str {
        &self.label
    }

    fn default_value(&self) -> Value {
        Value::String(self.default.clone())
    }

    fn consume<'w>(&self, words: &'w [String], out: &mut Matches) -> Result<&'w [String]> {
        let (raw, rest) = take_one(&self.label, words)?;
        if !self.choices.iter().any(|c| c == raw) {
            return Err(invalid(&self.label, raw, self.choices.join("|")));
        }
        out.set(&self.label, Value::String(raw.to_string()));
        Ok(rest)
    }

    fn describe_type(&self) -> String {
        self.choices.join("|")
    }

    fn describe_description(&self) -> String {
        self.description.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(ws: &[&str]) -> Vec<String> {
        ws.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn string_consumes_exactly_one_word() {
        let p = StringParam::new("name", "anon", "who to greet");
        let mut out = Matches::default();
        let input = words(&["Alice", "hello"]);
        let rest = p.consume(&input, &mut out).unwrap();
        assert_eq!(rest, &input[1..]);
        assert_eq!(out.get_str("name"), Some("Alice"));
        assert!(out.is_explicit("name"));
    }

    #[test]
    fn string_missing_value_names_label() {
        let p = StringParam::new("name", "anon", "");
        let mut out = Matches::default();
        let err = p.consume(&[], &mut out).unwrap_err();
        assert!(matches!(err, Error::MissingValue { ref label } if label == "name"));
        assert!(out.get("name").is_none());
    }

    #[test]
    fn reset_writes_default() {
        let p = StringParam::new("name", "anon", "");
        let mut out = Matches::default();
        p.reset_to_default(&mut out);
        assert_eq!(out.get_str("name"), Some("anon"));
        assert!(!out.is_explicit("name"));
    }

    #[test]
    fn integer_parses_and_rejects() {
        let p = IntegerParam::new("port", 8080, "listen port");
        let mut out = Matches::default();
        let input = words(&["9000"]);
        assert!(p.consume(&input, &mut out).unwrap().is_empty());
        assert_eq!(out.get_i64("port"), Some(9000));

        let bad = words(&["nine"]);
        let err = p.consume(&bad, &mut out).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { ref expected, .. } if expected == "integer"));
        assert_eq!(p.describe_default(), "8080");
    }

    #[test]
    fn boolean_spellings() {
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);

        let p = BooleanParam::new("tls", false, "");
        let mut out = Matches::default();
        let input = words(&["on", "rest"]);
        let rest = p.consume(&input, &mut out).unwrap();
        assert_eq!(rest, &input[1..]);
        assert_eq!(out.get_bool("tls"), Some(true));
    }

    #[test]
    fn choice_validates_membership() {
        let p = ChoiceParam::new("level", ["low", "high"], "low", "");
        let mut out = Matches::default();
        let ok = words(&["high"]);
        p.consume(&ok, &mut out).unwrap();
        assert_eq!(out.get_str("level"), Some("high"));

        let bad = words(&["mid"]);
        let err = p.consume(&bad, &mut out).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value 'mid' for parameter level (expected low|high)"
        );
        assert_eq!(p.describe_type(), "low|high");
    }

    #[test]
    fn value_serializes_untagged() {
        assert_eq!(
            serde_json::to_value(Value::Integer(3)).unwrap(),
            serde_json::json!(3)
        );
        assert_eq!(
            serde_json::to_value(Value::from("x")).unwrap(),
            serde_json::json!("x")
        );
    }
}
