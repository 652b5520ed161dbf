//! Decoded command arguments and typed attribute values
//!
//! Raw strings from the command surface are decoded exactly once into a
//! [`Value`]. The accessor then turns a `Value` into an [`Attr`], the typed
//! form the attribute graph reads and writes, and reports reads back to
//! the caller as a [`Reading`].

use std::fmt;

use crate::scene::Color;

/// A raw argument after sigil decoding
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `@id`: another registered object
    Reference(String),
    /// `#rrggbb`: a hex integer
    Integer(i64),
    /// Anything that parses as JSON
    Structured(serde_json::Value),
    /// Everything else, verbatim
    Text(String),
}

impl Value {
    /// Decode a raw argument.
    ///
    /// `@name` is a reference, `#hex` parses its leading hex digits, then
    /// JSON is tried, and anything left is a plain string.
    pub fn decode(raw: &str) -> Self {
        if let Some(id) = raw.strip_prefix('@') {
            return Self::Reference(id.to_string());
        }
        
        if let Some(digits) = raw.strip_prefix('#') {
            let end = digits
                .find(|c: char| !c.is_ascii_hexdigit())
                .unwrap_or(digits.len());
            return match i64::from_str_radix(&digits[..end], 16) {
                Ok(value) => Self::Integer(value),
                Err(_) => Self::Text(raw.to_string()),
            };
        }
        
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(value) => Self::Structured(value),
            Err(_) => Self::Text(raw.to_string()),
        }
    }
    
    /// Numeric view, if the value is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Structured(serde_json::Value::Number(n)) => n.as_f64(),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(raw: &str) -> Self {
        Self::decode(raw)
    }
}

/// A typed attribute value in the attribute graph
#[derive(Debug, Clone, PartialEq)]
pub enum Attr {
    /// Scalar number
    Number(f64),
    /// Flag
    Bool(bool),
    /// Free text
    Text(String),
    /// Color slot
    Color(Color),
    /// Structured value (vectors, material summaries, ...)
    Composite(serde_json::Value),
    /// Registered id of another object
    Object(String),
}

impl Attr {
    /// Number as `f32`, only for numeric attrs
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n as f32),
            _ => None,
        }
    }
    
    /// Truthiness: flags as-is, numbers when non-zero
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Number(n) => Some(*n != 0.0),
            _ => None,
        }
    }
    
    /// Text rendering of any attr
    pub fn as_text(&self) -> String {
        match self {
            Self::Number(n) => Reading::Number(*n).to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Text(s) | Self::Object(s) => s.clone(),
            Self::Color(c) => format!("#{}", c.hex_string()),
            Self::Composite(v) => v.to_string(),
        }
    }
}

impl From<serde_json::Value> for Attr {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Composite(serde_json::Value::Null), Self::Number),
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::String(s) => Self::Text(s),
            other => Self::Composite(other),
        }
    }
}

impl Color {
    /// Assign through the color's own setter.
    ///
    /// Numbers are packed hex, text is parsed as a color string, objects
    /// may carry any of `r`, `g`, `b`. Returns `false` and leaves the color
    /// alone when the value cannot describe a color.
    pub fn assign(&mut self, value: &Attr) -> bool {
        match value {
            Attr::Color(c) => *self = *c,
            Attr::Number(n) if n.is_finite() && *n >= 0.0 => *self = Color::from_hex(*n as u32),
            Attr::Text(s) => match Color::parse(s) {
                Some(c) => *self = c,
                None => return false,
            },
            Attr::Composite(serde_json::Value::Object(map)) => {
                let channel = |name: &str| map.get(name).and_then(serde_json::Value::as_f64).map(|v| v as f32);
                if let Some(r) = channel("r") { self.r = r; }
                if let Some(g) = channel("g") { self.g = g; }
                if let Some(b) = channel("b") { self.b = b; }
            }
            _ => return false,
        }
        true
    }
}

/// What a property read reports to the caller
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    /// Unresolved id or path
    Empty,
    /// Number
    Number(f64),
    /// Flag
    Bool(bool),
    /// Text, including colors (`#rrggbb`) and serialized composites
    Text(String),
}

impl Reading {
    /// Numeric view
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.parse().ok(),
            _ => None,
        }
    }
    
    /// Whether the read resolved nothing
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Number(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Text(s) => f.write_str(s),
        }
    }
}
