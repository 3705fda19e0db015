//! Declarative parameter rules and the resolver that applies them.
//!
//! # Design
//! Every endpoint owns a `&'static [ParamRule]` table. A rule names one
//! accepted parameter and optionally constrains its type, its value set, or
//! a predicate, and may carry a default and a normalizer. Tables are built
//! with `const fn` builders so they live in statics and are shared by every
//! call.
//!
//! `resolve` is a pure function over a rule table and an argument map. The
//! world is closed: an argument without a rule is rejected, never forwarded.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::ValidationError;

/// Caller-supplied arguments, and the resolved map handed to the transport.
pub type Params = BTreeMap<String, ParamValue>;

/// Builds a [`Params`] map from `key => value` pairs.
///
/// ```
/// use gitlab_core::params;
///
/// let args = params! { "tags" => true, "keep_n" => 12 };
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::Params::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut params = $crate::Params::new();
        $(
            params.insert(::std::string::String::from($key), $crate::ParamValue::from($value));
        )+
        params
    }};
}

/// A runtime value supplied for a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Str(String),
    DateTime(DateTime<FixedOffset>),
    List(Vec<ParamValue>),
}

/// The primitive type of a [`ParamValue`], as named in rule declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Bool,
    Int,
    String,
    DateTime,
    Array,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeTag::Bool => "bool",
            TypeTag::Int => "int",
            TypeTag::String => "string",
            TypeTag::DateTime => "datetime",
            TypeTag::Array => "array",
        })
    }
}

impl ParamValue {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            ParamValue::Bool(_) => TypeTag::Bool,
            ParamValue::Int(_) => TypeTag::Int,
            ParamValue::Str(_) => TypeTag::String,
            ParamValue::DateTime(_) => TypeTag::DateTime,
            ParamValue::List(_) => TypeTag::Array,
        }
    }

    /// Text form used in query strings and CSV joins.
    pub fn to_text(&self) -> String {
        match self {
            ParamValue::Bool(value) => value.to_string(),
            ParamValue::Int(value) => value.to_string(),
            ParamValue::Str(value) => value.clone(),
            ParamValue::DateTime(value) => format_datetime(value),
            ParamValue::List(items) => items
                .iter()
                .map(ParamValue::to_text)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// JSON form used in request bodies.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ParamValue::Bool(value) => serde_json::Value::Bool(*value),
            ParamValue::Int(value) => serde_json::Value::from(*value),
            ParamValue::Str(value) => serde_json::Value::String(value.clone()),
            ParamValue::DateTime(value) => serde_json::Value::String(format_datetime(value)),
            ParamValue::List(items) => {
                serde_json::Value::Array(items.iter().map(ParamValue::to_json).collect())
            }
        }
    }

    /// Converts a decoded JSON value, rejecting shapes with no parameter form.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(value) => Some(ParamValue::Bool(*value)),
            serde_json::Value::Number(number) => number.as_i64().map(ParamValue::Int),
            serde_json::Value::String(value) => Some(ParamValue::Str(value.clone())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(ParamValue::from_json)
                .collect::<Option<Vec<_>>>()
                .map(ParamValue::List),
            serde_json::Value::Null | serde_json::Value::Object(_) => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(value) => write!(f, "\"{value}\""),
            ParamValue::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            other => f.write_str(&other.to_text()),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<DateTime<FixedOffset>> for ParamValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        ParamValue::DateTime(value)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(value: DateTime<Utc>) -> Self {
        ParamValue::DateTime(value.fixed_offset())
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(items: Vec<T>) -> Self {
        ParamValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// A constant scalar usable in static rule tables (allowed values, defaults).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Str(&'static str),
}

impl Scalar {
    pub fn to_value(self) -> ParamValue {
        match self {
            Scalar::Bool(value) => ParamValue::Bool(value),
            Scalar::Int(value) => ParamValue::Int(value),
            Scalar::Str(value) => ParamValue::Str(value.to_string()),
        }
    }

    fn matches(self, value: &ParamValue) -> bool {
        match (self, value) {
            (Scalar::Bool(a), ParamValue::Bool(b)) => a == *b,
            (Scalar::Int(a), ParamValue::Int(b)) => a == *b,
            (Scalar::Str(a), ParamValue::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_value(), f)
    }
}

/// Transforms a validated value into its transport form.
pub type Normalizer = fn(ParamValue) -> ParamValue;

/// A predicate a value must satisfy, with a description for error messages.
#[derive(Debug, Clone, Copy)]
pub struct Check {
    pub test: fn(&ParamValue) -> bool,
    pub describe: &'static str,
}

/// The declared contract of one accepted parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParamRule {
    pub name: &'static str,
    pub required: bool,
    /// Empty means any type.
    pub types: &'static [TypeTag],
    pub values: Option<&'static [Scalar]>,
    pub check: Option<Check>,
    pub default: Option<Scalar>,
    pub normalizer: Option<Normalizer>,
}

impl ParamRule {
    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            types: &[],
            values: None,
            check: None,
            default: None,
            normalizer: None,
        }
    }

    pub const fn required(name: &'static str) -> Self {
        Self {
            required: true,
            ..Self::optional(name)
        }
    }

    pub const fn types(self, types: &'static [TypeTag]) -> Self {
        Self { types, ..self }
    }

    pub const fn values(self, values: &'static [Scalar]) -> Self {
        Self {
            values: Some(values),
            ..self
        }
    }

    pub const fn check(self, test: fn(&ParamValue) -> bool, describe: &'static str) -> Self {
        Self {
            check: Some(Check { test, describe }),
            ..self
        }
    }

    pub const fn default_value(self, value: Scalar) -> Self {
        Self {
            default: Some(value),
            ..self
        }
    }

    pub const fn normalize(self, normalizer: Normalizer) -> Self {
        Self {
            normalizer: Some(normalizer),
            ..self
        }
    }

    fn validate(&self, value: &ParamValue) -> Result<(), ValidationError> {
        if !self.types.is_empty() && !self.types.contains(&value.type_tag()) {
            let expected: Vec<String> = self.types.iter().map(ToString::to_string).collect();
            return Err(ValidationError::InvalidType {
                key: self.name.to_string(),
                expected: expected.join("|"),
                actual: value.type_tag().to_string(),
            });
        }
        if let Some(values) = self.values {
            if !values.iter().any(|allowed| allowed.matches(value)) {
                let allowed: Vec<String> = values.iter().map(ToString::to_string).collect();
                return Err(ValidationError::InvalidValue {
                    key: self.name.to_string(),
                    allowed: format!("one of {}", allowed.join(", ")),
                    actual: value.to_string(),
                });
            }
        }
        if let Some(check) = self.check {
            if !(check.test)(value) {
                return Err(ValidationError::InvalidValue {
                    key: self.name.to_string(),
                    allowed: check.describe.to_string(),
                    actual: value.to_string(),
                });
            }
        }
        Ok(())
    }

    fn apply(&self, value: ParamValue) -> ParamValue {
        match self.normalizer {
            Some(normalize) => normalize(value),
            None => value,
        }
    }
}

/// Validates `args` against `rules` and returns the request-ready map.
///
/// Unknown keys are reported first, then missing required keys, then type
/// and value violations in key order. Declared defaults fill absent keys and
/// pass through the rule's normalizer like supplied values do.
pub fn resolve(rules: &[ParamRule], args: Params) -> Result<Params, ValidationError> {
    let rule_for = |key: &str| rules.iter().find(|rule| rule.name == key);

    if let Some(key) = args.keys().find(|key| rule_for(key.as_str()).is_none()) {
        return Err(ValidationError::UnknownParameter(key.clone()));
    }
    if let Some(rule) = rules
        .iter()
        .find(|rule| rule.required && !args.contains_key(rule.name))
    {
        return Err(ValidationError::MissingRequiredParameter(
            rule.name.to_string(),
        ));
    }

    let mut resolved = Params::new();
    for (key, value) in args {
        let Some(rule) = rule_for(key.as_str()) else {
            continue;
        };
        rule.validate(&value)?;
        resolved.insert(key, rule.apply(value));
    }
    for rule in rules {
        if let Some(default) = rule.default {
            if !resolved.contains_key(rule.name) {
                resolved.insert(rule.name.to_string(), rule.apply(default.to_value()));
            }
        }
    }
    Ok(resolved)
}

/// The remote service only understands the literal strings `"true"`/`"false"`.
pub fn normalize_bool(value: ParamValue) -> ParamValue {
    match value {
        ParamValue::Bool(flag) => ParamValue::Str(if flag { "true" } else { "false" }.to_string()),
        other => other,
    }
}

/// ISO-8601 with a `+HH:MM` offset, e.g. `2019-03-15T08:00:00+00:00`.
pub fn normalize_datetime(value: ParamValue) -> ParamValue {
    match value {
        ParamValue::DateTime(at) => ParamValue::Str(format_datetime(&at)),
        other => other,
    }
}

/// Joins a list into a single comma-separated string.
pub fn normalize_csv(value: ParamValue) -> ParamValue {
    match value {
        list @ ParamValue::List(_) => ParamValue::Str(list.to_text()),
        other => other,
    }
}

fn format_datetime(at: &DateTime<FixedOffset>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

fn is_positive(value: &ParamValue) -> bool {
    matches!(value, ParamValue::Int(n) if *n >= 1)
}

fn is_page_size(value: &ParamValue) -> bool {
    matches!(value, ParamValue::Int(n) if (1..=100).contains(n))
}

pub const PAGE: ParamRule = ParamRule::optional("page")
    .types(&[TypeTag::Int])
    .check(is_positive, "an integer of at least 1");

pub const PER_PAGE: ParamRule = ParamRule::optional("per_page")
    .types(&[TypeTag::Int])
    .check(is_page_size, "an integer between 1 and 100");
