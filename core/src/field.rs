use std::fmt::Display;

use serde::Serialize;

use crate::{error::BindingError, source::ParameterSource};

/// Type a raw parameter string is converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Value is taken as supplied.
    String,

    /// Signed 64-bit integer, parsed strictly (no surrounding whitespace).
    Integer,

    /// Generic object. Kept as the raw string, callers decide what it means.
    Any,
}

impl Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match *self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Any => "object",
        })
    }
}

/// Bound value of a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Optional field that was not supplied.
    Null,
    Str(String),
    Int(i64),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Str(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
        }
    }
}

/// Static description of one expected parameter.
///
/// Every constructor is `const`, so an endpoint can keep its table in a
/// `const`/`static` item:
///
/// ```rust
/// use rbind_core::field::FieldSpec;
///
/// const SPECS: &[FieldSpec] = &[
///     FieldSpec::string("username").with_default("guest"),
///     FieldSpec::integer("age").with_default("-1"),
/// ];
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldType,

    /// Absence of a required field without a default is an error.
    pub required: bool,

    /// Raw value used when the parameter is absent or blank.
    pub default: Option<&'static str>,
}

impl FieldSpec {
    /// Creates required field spec with no default value.
    pub const fn new(name: &'static str, kind: FieldType) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
        }
    }

    pub const fn string(name: &'static str) -> Self {
        Self::new(name, FieldType::String)
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub const fn any(name: &'static str) -> Self {
        Self::new(name, FieldType::Any)
    }

    pub const fn required(self, required: bool) -> Self {
        Self { required, ..self }
    }

    pub const fn optional(self) -> Self {
        self.required(false)
    }

    /// Sets default value, field stops being required.
    pub const fn with_default(self, value: &'static str) -> Self {
        Self {
            required: false,
            default: Some(value),
            ..self
        }
    }

    /// Resolves this field against given source.
    pub fn resolve(&self, source: &ParameterSource) -> Result<Value, BindingError> {
        let supplied = source.first(self.name);

        match (supplied, self.default) {
            // blank counts as unset when there is something to fall back to.
            (Some(raw), Some(default)) if raw.is_empty() => self.convert(default),
            (Some(raw), _) => self.convert_supplied(raw),
            (None, Some(default)) => self.convert(default),
            (None, None) if self.required => Err(BindingError::MissingParameter {
                field: self.name.to_string(),
            }),
            (None, None) => Ok(Value::Null),
        }
    }

    fn convert_supplied(&self, raw: &str) -> Result<Value, BindingError> {
        if raw.is_empty() && self.kind == FieldType::Integer && !self.required {
            return Ok(Value::Null);
        }
        self.convert(raw)
    }

    fn convert(&self, raw: &str) -> Result<Value, BindingError> {
        match self.kind {
            FieldType::String | FieldType::Any => Ok(Value::Str(raw.to_string())),
            FieldType::Integer => raw.parse::<i64>().map(Value::Int).map_err(|_| {
                BindingError::TypeConversion {
                    field: self.name.to_string(),
                    raw: raw.to_string(),
                    expected: self.kind,
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(query: &str) -> ParameterSource {
        ParameterSource::parse(query).expect("valid query")
    }

    #[test]
    fn test_const_builders() {
        const SPEC: FieldSpec = FieldSpec::integer("age").with_default("-1");

        assert_eq!(SPEC.name, "age");
        assert_eq!(SPEC.kind, FieldType::Integer);
        assert!(!SPEC.required);
        assert_eq!(SPEC.default, Some("-1"));

        assert!(FieldSpec::string("username").required);
        assert!(!FieldSpec::any("x").optional().required);
    }

    #[test]
    fn test_resolve_present() {
        let s = source("username=hello&age=20&age=30");

        assert_eq!(
            FieldSpec::string("username").resolve(&s),
            Ok(Value::Str("hello".into()))
        );
        // first value wins.
        assert_eq!(FieldSpec::integer("age").resolve(&s), Ok(Value::Int(20)));
        assert_eq!(
            FieldSpec::any("age").resolve(&s),
            Ok(Value::Str("20".into()))
        );
    }

    #[test]
    fn test_resolve_missing() {
        let s = source("");

        assert_eq!(
            FieldSpec::string("username").resolve(&s),
            Err(BindingError::MissingParameter {
                field: "username".into()
            })
        );
        assert_eq!(
            FieldSpec::integer("age").optional().resolve(&s),
            Ok(Value::Null)
        );
        assert_eq!(
            FieldSpec::integer("age").with_default("-1").resolve(&s),
            Ok(Value::Int(-1))
        );
    }

    #[test]
    fn test_resolve_blank() {
        let s = source("username=&age=");

        assert_eq!(
            FieldSpec::string("username").with_default("guest").resolve(&s),
            Ok(Value::Str("guest".into()))
        );
        assert_eq!(
            FieldSpec::string("username").resolve(&s),
            Ok(Value::Str(String::new()))
        );
        assert_eq!(
            FieldSpec::integer("age").optional().resolve(&s),
            Ok(Value::Null)
        );
        assert!(matches!(
            FieldSpec::integer("age").resolve(&s),
            Err(BindingError::TypeConversion { .. })
        ));
    }

    #[test]
    fn test_resolve_conversion_errors() {
        let s = source("age=twenty&big=99999999999999999999&padded=%2020");

        for name in ["age", "big", "padded"] {
            match FieldSpec::integer(name).resolve(&s) {
                Err(BindingError::TypeConversion {
                    field, expected, ..
                }) => {
                    assert_eq!(field, name);
                    assert_eq!(expected, FieldType::Integer);
                }
                other => panic!("expected conversion error for {}, got {:?}", name, other),
            }
        }

        assert_eq!(
            FieldSpec::integer("missing").with_default("abc").resolve(&s),
            Err(BindingError::TypeConversion {
                field: "missing".into(),
                raw: "abc".into(),
                expected: FieldType::Integer,
            })
        );
    }

    #[test]
    fn test_signed_integers() {
        let s = source("a=-5&b=%2B7");

        assert_eq!(FieldSpec::integer("a").resolve(&s), Ok(Value::Int(-5)));
        assert_eq!(FieldSpec::integer("b").resolve(&s), Ok(Value::Int(7)));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Int(3).to_string(), "3");
        assert_eq!(Value::Str("kim".into()).to_string(), "kim");
    }
}
