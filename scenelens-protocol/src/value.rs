//! Property and uniform values.
//!
//! Layout/transform properties carry a `PropValue`; an absent value ("not set")
//! is modelled as `Option::None` by every caller. Equality is strict and
//! type-aware: `Number(100.0)` never equals `Text("100")`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A layout or transform property value as it travels on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl PropValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Truthiness used by the layout-participation toggle.
    pub fn is_truthy(&self) -> bool {
        match self {
            PropValue::Bool(b) => *b,
            PropValue::Number(n) => *n != 0.0 && !n.is_nan(),
            PropValue::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Bool(b) => write!(f, "{b}"),
            PropValue::Number(n) => write!(f, "{n}"),
            PropValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Text(value)
    }
}

/// Runtime value of a shader-filter uniform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UniformValue {
    Bool(bool),
    Scalar(f64),
    Vector(Vec<f64>),
    Other(serde_json::Value),
}

impl UniformValue {
    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            UniformValue::Vector(v) => Some(v),
            _ => None,
        }
    }

    /// Infers the semantic type from the runtime shape alone.
    pub fn shape_type(&self) -> UniformType {
        match self {
            UniformValue::Bool(_) => UniformType::Bool,
            UniformValue::Scalar(_) => UniformType::F32,
            UniformValue::Vector(v) => match v.len() {
                2 => UniformType::Vec2,
                3 => UniformType::Vec3,
                4 => UniformType::Vec4,
                9 => UniformType::Mat3x3,
                16 => UniformType::Mat4x4,
                _ => UniformType::Unknown,
            },
            UniformValue::Other(_) => UniformType::Unknown,
        }
    }
}

/// Closed taxonomy of uniform shapes, serialized with WGSL-style names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum UniformType {
    F32,
    Bool,
    Vec2,
    Vec3,
    Vec4,
    Mat3x3,
    Mat4x4,
    Unknown,
}

impl UniformType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UniformType::F32 => "f32",
            UniformType::Bool => "bool",
            UniformType::Vec2 => "vec2<f32>",
            UniformType::Vec3 => "vec3<f32>",
            UniformType::Vec4 => "vec4<f32>",
            UniformType::Mat3x3 => "mat3x3<f32>",
            UniformType::Mat4x4 => "mat4x4<f32>",
            UniformType::Unknown => "unknown",
        }
    }

    /// Parses a declared type name; anything outside the taxonomy is `Unknown`.
    pub fn parse(declared: &str) -> Self {
        match declared.trim() {
            "f32" => UniformType::F32,
            "bool" => UniformType::Bool,
            "vec2<f32>" => UniformType::Vec2,
            "vec3<f32>" => UniformType::Vec3,
            "vec4<f32>" => UniformType::Vec4,
            "mat3x3<f32>" => UniformType::Mat3x3,
            "mat4x4<f32>" => UniformType::Mat4x4,
            _ => UniformType::Unknown,
        }
    }
}

impl From<String> for UniformType {
    fn from(value: String) -> Self {
        UniformType::parse(&value)
    }
}

impl From<UniformType> for String {
    fn from(value: UniformType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for UniformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
