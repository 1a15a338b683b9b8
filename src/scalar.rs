//! The primitive values carried by leaf nodes.

use core::fmt::{self, Formatter, Display};
#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

/// A primitive configuration value: a string, a number or a boolean.
///
/// Leaf nodes share their scalars through an [`Arc`], so copying a subtree out of a tree never clones the values themselves.
///
/// [`Arc`]: https://doc.rust-lang.org/std/sync/struct.Arc.html " "
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Scalar {
    /// A boolean flag.
    Boolean(bool),
    /// A signed integer.
    Integer(i64),
    /// A floating-point number.
    Float(f64),
    /// Any text, including values which look like numbers but were provided as strings.
    String(String),
}
impl Scalar {
    /// Returns the string slice if the scalar is a string, `None` otherwise.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(x) => Some(x),
            _ => None,
        }
    }
    /// Returns the integer if the scalar is an integer, `None` otherwise.
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(x) => Some(*x),
            _ => None,
        }
    }
    /// Returns the number as a float if the scalar is numeric, `None` otherwise.
    #[inline]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            Self::Integer(x) => Some(*x as f64),
            _ => None,
        }
    }
    /// Returns the flag if the scalar is a boolean, `None` otherwise.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(x) => Some(*x),
            _ => None,
        }
    }
}
impl Display for Scalar {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(x) => Display::fmt(x, f),
            Self::Integer(x) => Display::fmt(x, f),
            Self::Float(x) => Display::fmt(x, f),
            Self::String(x) => f.pad(x),
        }
    }
}

impl From<&str> for Scalar {
    #[inline(always)]
    fn from(op: &str) -> Self {
        Self::String(op.to_owned())
    }
}
impl From<String> for Scalar {
    #[inline(always)]
    fn from(op: String) -> Self {
        Self::String(op)
    }
}
impl From<bool> for Scalar {
    #[inline(always)]
    fn from(op: bool) -> Self {
        Self::Boolean(op)
    }
}
impl From<f64> for Scalar {
    #[inline(always)]
    fn from(op: f64) -> Self {
        Self::Float(op)
    }
}
impl From<f32> for Scalar {
    #[inline(always)]
    fn from(op: f32) -> Self {
        Self::Float(f64::from(op))
    }
}
macro_rules! impl_from_int {
    ($($ty:ty),+ $(,)?) => {$(
        impl From<$ty> for Scalar {
            #[inline(always)]
            fn from(op: $ty) -> Self {
                Self::Integer(i64::from(op))
            }
        }
    )+};
}
impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl PartialEq<str> for Scalar {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}
impl PartialEq<&str> for Scalar {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Scalar::from("maximumSize=10").to_string(), "maximumSize=10");
        assert_eq!(Scalar::from(600_i64).to_string(), "600");
        assert_eq!(Scalar::from(true).to_string(), "true");
        assert_eq!(Scalar::from(0.5_f64).to_string(), "0.5");
    }

    #[test]
    fn accessors() {
        assert_eq!(Scalar::from("x").as_str(), Some("x"));
        assert_eq!(Scalar::from(7_u8).as_i64(), Some(7));
        assert_eq!(Scalar::from(7_u8).as_f64(), Some(7.0));
        assert_eq!(Scalar::from(false).as_bool(), Some(false));
        assert_eq!(Scalar::from(1_i32).as_str(), None);
        assert_eq!(Scalar::from("cache1"), "cache1");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_flat_map() {
        use std::collections::BTreeMap;
        let map: BTreeMap<String, Scalar> = serde_json::from_str(
            r#"{"redis[0].names": "cache1", "redis[0].ttl": 600, "redis[0].stats": true}"#,
        )
        .expect("valid json");
        assert_eq!(map["redis[0].names"], Scalar::from("cache1"));
        assert_eq!(map["redis[0].ttl"], Scalar::Integer(600));
        assert_eq!(map["redis[0].stats"], Scalar::Boolean(true));
    }
}
