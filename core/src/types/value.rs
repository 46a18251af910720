//! Typed column values
//!
//! This module provides the value kinds a column can declare and the
//! values rows carry, along with the conversion from untyped input.

use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};

/// Kind of value a column holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    /// Absent / null value
    Null,

    /// Boolean
    Bool,

    /// Signed 64-bit integer
    Int,

    /// Unsigned 64-bit integer
    Uint,

    /// 64-bit floating point
    Float,

    /// UTF-8 string
    String,

    /// UUID
    Uuid,
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Debug::fmt(self, f)
    }
}

impl Kind {
    /// Convert an untyped value into a value of this kind
    ///
    /// Bool, Int, Uint, Float and String convert when the input has a
    /// matching shape. Uuid and Null are not handled and return
    /// `UnsupportedKind`.
    pub fn convert(&self, input: &serde_json::Value) -> Result<Value> {
        let converted = match self {
            Kind::Bool => input.as_bool().map(Value::Bool),
            Kind::Int => input.as_i64().map(Value::Int),
            Kind::Uint => input.as_u64().map(Value::Uint),
            Kind::Float => input.as_f64().map(Value::Float),
            Kind::String => input.as_str().map(|s| Value::String(s.to_string())),
            Kind::Uuid | Kind::Null => return Err(CoreError::UnsupportedKind(*self)),
        };

        converted.ok_or_else(|| CoreError::TypeMismatch {
            expected: *self,
            found: describe_json(input),
        })
    }
}

fn describe_json(input: &serde_json::Value) -> String {
    let shape = match input {
        serde_json::Value::Null => return "null".to_string(),
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    };
    format!("{} {}", shape, input)
}

/// Value held by a column
#[derive(Clone, Serialize, Deserialize)]
pub enum Value {
    /// Null value
    Null,

    /// Boolean
    Bool(bool),

    /// Signed 64-bit integer
    Int(i64),

    /// Unsigned 64-bit integer
    Uint(u64),

    /// 64-bit floating point
    Float(f64),

    /// UTF-8 string
    String(String),

    /// UUID
    Uuid(Uuid),
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(v) => write!(f, "Bool({})", v),
            Value::Int(v) => write!(f, "Int({})", v),
            Value::Uint(v) => write!(f, "Uint({})", v),
            Value::Float(v) => write!(f, "Float({})", v),
            Value::String(v) => write!(f, "String({:?})", v),
            Value::Uuid(v) => write!(f, "Uuid({})", v),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Uint(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "\"{}\"", v),
            Value::Uuid(v) => write!(f, "{}", v),
        }
    }
}

impl Value {
    /// Get the kind of the value
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Uint(_) => Kind::Uint,
            Value::Float(_) => Kind::Float,
            Value::String(_) => Kind::String,
            Value::Uuid(_) => Kind::Uuid,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the value as a tag, if it is an unsigned integer
    pub fn as_tag(&self) -> Option<u64> {
        match self {
            Value::Uint(tag) => Some(*tag),
            _ => None,
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Uint(a), Value::Uint(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Uuid(a), Value::Uuid(b)) => a.cmp(b),
            _ => self.kind().cmp(&other.kind()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::bool(Kind::Bool, json!(true), Value::Bool(true))]
    #[case::int(Kind::Int, json!(-7), Value::Int(-7))]
    #[case::uint(Kind::Uint, json!(42), Value::Uint(42))]
    #[case::float(Kind::Float, json!(1.5), Value::Float(1.5))]
    #[case::float_from_integer(Kind::Float, json!(2), Value::Float(2.0))]
    #[case::string(Kind::String, json!("Bill"), Value::String("Bill".to_string()))]
    fn test_convert_supported_kinds(
        #[case] kind: Kind,
        #[case] input: serde_json::Value,
        #[case] expected: Value,
    ) {
        assert_eq!(kind.convert(&input).unwrap(), expected);
    }

    #[test]
    fn test_convert_shape_mismatch() {
        match Kind::Uint.convert(&json!(-1)) {
            Err(CoreError::TypeMismatch { expected, .. }) => assert_eq!(expected, Kind::Uint),
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }

        match Kind::Bool.convert(&json!("true")) {
            Err(CoreError::TypeMismatch { found, .. }) => assert_eq!(found, "string \"true\""),
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_convert_uuid_is_unsupported() {
        let input = json!("00000000-0000-0000-0000-000000000001");
        match Kind::Uuid.convert(&input) {
            Err(CoreError::UnsupportedKind(kind)) => assert_eq!(kind, Kind::Uuid),
            other => panic!("Expected UnsupportedKind, got {:?}", other),
        }
    }

    #[test]
    fn test_value_ordering() {
        assert!(Value::Null < Value::Bool(false));
        assert!(Value::Int(100) < Value::Uint(0));
        assert!(Value::Uint(2) < Value::Uint(10));
        assert!(Value::from("a") < Value::from("b"));
        assert!(Value::Float(-0.5) < Value::Float(0.5));
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    }

    #[test]
    fn test_value_kind() {
        let values = vec![
            Value::Null,
            Value::Bool(true),
            Value::Int(-1),
            Value::Uint(1),
            Value::Float(3.25),
            Value::from("text"),
            Value::Uuid(Uuid::nil()),
        ];
        let kinds: Vec<Kind> = values.iter().map(Value::kind).collect();
        assert_eq!(
            kinds,
            vec![Kind::Null, Kind::Bool, Kind::Int, Kind::Uint, Kind::Float, Kind::String, Kind::Uuid]
        );
    }

    #[test]
    fn test_debug_keeps_full_strings() {
        let long = Value::from("abcdefghijklmnopqrstuvwxyz");
        assert_eq!(format!("{:?}", long), "String(\"abcdefghijklmnopqrstuvwxyz\")");
        assert_eq!(format!("{:?}", Value::from("say \"hi\"")), r#"String("say \"hi\"")"#);
    }
}
