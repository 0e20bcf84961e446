use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ColumnType {
    Boolean,
    Integer,
    Float,
    String,
}

impl ColumnType {
    /// Common type of two columns being stacked on top of each other.
    pub fn unify(self, other: ColumnType) -> ColumnType {
        match (self, other) {
            (left, right) if left == right => left,
            (ColumnType::Integer, ColumnType::Float) | (ColumnType::Float, ColumnType::Integer) => {
                ColumnType::Float
            }
            _ => ColumnType::String,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Boolean => "boolean",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::String => "string",
        };
        f.write_str(name)
    }
}

/// A single cell. Empty CSV fields become [`Value::Null`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether the value may sit in a column of type `ty`. Nulls fit anywhere.
    pub fn conforms_to(&self, ty: ColumnType) -> bool {
        matches!(
            (self, ty),
            (Value::Null, _)
                | (Value::Boolean(_), ColumnType::Boolean)
                | (Value::Integer(_), ColumnType::Integer)
                | (Value::Float(_), ColumnType::Float)
                | (Value::String(_), ColumnType::String)
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts the value to `ty`. Only widening conversions are attempted:
    /// integers to floats, and anything to its textual form.
    pub fn cast(self, ty: ColumnType) -> Value {
        match (self, ty) {
            (Value::Null, _) => Value::Null,
            (Value::Integer(i), ColumnType::Float) => Value::Float(i as f64),
            (Value::String(s), ColumnType::String) => Value::String(s),
            (other, ColumnType::String) => Value::String(other.to_string()),
            (other, _) => other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

fn parse_boolean(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[derive(Debug, Clone)]
struct TypeCandidate {
    possible_boolean: bool,
    possible_integer: bool,
    possible_float: bool,
}

impl TypeCandidate {
    fn new() -> Self {
        Self {
            possible_boolean: true,
            possible_integer: true,
            possible_float: true,
        }
    }

    fn observe(&mut self, value: &str) {
        if self.possible_boolean && parse_boolean(value).is_none() {
            self.possible_boolean = false;
        }
        if self.possible_integer && value.parse::<i64>().is_err() {
            self.possible_integer = false;
        }
        if self.possible_float && value.parse::<f64>().is_err() {
            self.possible_float = false;
        }
    }

    fn decide(&self) -> ColumnType {
        if self.possible_boolean {
            ColumnType::Boolean
        } else if self.possible_integer {
            ColumnType::Integer
        } else if self.possible_float {
            ColumnType::Float
        } else {
            ColumnType::String
        }
    }
}

/// Picks the narrowest type that every non-empty cell parses as.
/// A column with no non-empty cells is a string column.
pub fn infer_column_type<'a, I>(cells: I) -> ColumnType
where
    I: IntoIterator<Item = &'a str>,
{
    let mut candidate = TypeCandidate::new();
    let mut observed = false;
    for cell in cells.into_iter().filter(|cell| !cell.is_empty()) {
        candidate.observe(cell);
        observed = true;
    }
    if observed {
        candidate.decide()
    } else {
        ColumnType::String
    }
}

/// Parses `value` as `ty`. Callers pass a type obtained from
/// [`infer_column_type`] over the same cells, so the fallback to a string is
/// only reached for inputs outside that contract.
pub fn parse_typed_value(value: &str, ty: ColumnType) -> Value {
    if value.is_empty() {
        return Value::Null;
    }
    let parsed = match ty {
        ColumnType::Boolean => parse_boolean(value).map(Value::Boolean),
        ColumnType::Integer => value.parse().ok().map(Value::Integer),
        ColumnType::Float => value.parse().ok().map(Value::Float),
        ColumnType::String => None,
    };
    parsed.unwrap_or_else(|| Value::String(value.to_string()))
}

/// Infers a type for a column of raw cells and converts every cell to it.
pub fn type_column(raw: Vec<String>) -> (ColumnType, Vec<Value>) {
    let ty = infer_column_type(raw.iter().map(String::as_str));
    let values = raw
        .into_iter()
        .map(|cell| match ty {
            ColumnType::String if cell.is_empty() => Value::Null,
            ColumnType::String => Value::String(cell),
            _ => parse_typed_value(&cell, ty),
        })
        .collect();
    (ty, values)
}
