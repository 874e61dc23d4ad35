// Fri Aug 21 2026 - Alex

use crate::memory::Address;
use serde::Serialize;
use std::fmt;

/// A field's rendered current value. `Object` carries a nested address the
/// caller may expand further.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum DecodedValue {
    Absent,
    Signed(i64),
    Unsigned(u64),
    Float(f32),
    Bool(bool),
    Text(String),
    Vec2(f32, f32),
    Vec3(f32, f32, f32),
    Quat(f32, f32, f32, f32),
    Object(Address),
    RawAddress(Address),
}

impl DecodedValue {
    pub fn nested_object(&self) -> Option<Address> {
        match self {
            DecodedValue::Object(addr) => Some(*addr),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, DecodedValue::Absent)
    }
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::Absent => Ok(()),
            DecodedValue::Signed(v) => write!(f, "{}", v),
            DecodedValue::Unsigned(v) => write!(f, "{}", v),
            DecodedValue::Float(v) => write!(f, "{}", v),
            DecodedValue::Bool(v) => write!(f, "{}", v),
            DecodedValue::Text(s) => write!(f, "{}", s),
            DecodedValue::Vec2(x, y) => write!(f, "{} {}", x, y),
            DecodedValue::Vec3(x, y, z) => write!(f, "{} {} {}", x, y, z),
            DecodedValue::Quat(x, y, z, w) => write!(f, "{} {} {} {}", x, y, z, w),
            DecodedValue::Object(addr) => write!(f, "{}", addr),
            DecodedValue::RawAddress(addr) => write!(f, "{}", addr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_render() {
        assert_eq!(format!("{}", DecodedValue::Vec2(1.5, -2.25)), "1.5 -2.25");
    }

    #[test]
    fn test_absent_renders_empty() {
        assert_eq!(format!("{}", DecodedValue::Absent), "");
    }

    #[test]
    fn test_bool_render() {
        assert_eq!(format!("{}", DecodedValue::Bool(true)), "true");
        assert_eq!(format!("{}", DecodedValue::Bool(false)), "false");
    }
}
