//! The closed set of column element types and the dispatch from a runtime
//! type name to a static Rust type.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use snafu::Snafu;

use crate::value::Value;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("unknown column type name '{}'", name))]
    UnknownTypeName { name: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Runtime tag for the element type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 32-bit signed integer, wire name `"int"`.
    Int,
    /// 64-bit signed integer, wire name `"long"`.
    Long,
    /// 32-bit IEEE-754 float, wire name `"float"`.
    Float,
    /// 64-bit IEEE-754 float, wire name `"double"`.
    Double,
    /// UTF-8 string of variable length, wire name `"string"`.
    String,
}

impl ElementType {
    /// The wire-level type name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementType {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "int" => Ok(Self::Int),
            "long" => Ok(Self::Long),
            "float" => Ok(Self::Float),
            "double" => Ok(Self::Double),
            "string" => Ok(Self::String),
            _ => UnknownTypeName { name }.fail(),
        }
    }
}

/// A static Rust type backing one [`ElementType`].
///
/// Carries the total order used wherever column values are sorted or
/// binary-searched; for floats this is the IEEE-754 total order, so a
/// dictionary of floats sorts without an `Ord` bound.
pub trait NativeType: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    const ELEMENT_TYPE: ElementType;

    /// Extracts a typed value, or `None` when the variant carries a
    /// different element type.
    fn from_value(value: &Value) -> Option<Self>;

    fn into_value(self) -> Value;

    fn total_cmp(&self, other: &Self) -> Ordering;
}

impl NativeType for i32 {
    const ELEMENT_TYPE: ElementType = ElementType::Int;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl NativeType for i64 {
    const ELEMENT_TYPE: ElementType = ElementType::Long;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Long(self)
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl NativeType for f32 {
    const ELEMENT_TYPE: ElementType = ElementType::Float;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        f32::total_cmp(self, other)
    }
}

impl NativeType for f64 {
    const ELEMENT_TYPE: ElementType = ElementType::Double;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Double(self)
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        f64::total_cmp(self, other)
    }
}

impl NativeType for String {
    const ELEMENT_TYPE: ElementType = ElementType::String;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(v) => Some(v.clone()),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::String(self)
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

/// Invokes `$body` with `$t` bound to the static type matching
/// `$element_type`.
///
/// This is how generic operator code written once is re-specialised per
/// column at runtime:
///
/// ```
/// use data_types::{resolve_element_type, ElementType};
///
/// let element_type = ElementType::Long;
/// let width = resolve_element_type!(element_type, |T| std::mem::size_of::<T>());
/// assert_eq!(width, 8);
/// ```
#[macro_export]
macro_rules! resolve_element_type {
    ($element_type:expr, | $t:ident | $body:expr) => {
        match $element_type {
            $crate::ElementType::Int => {
                type $t = i32;
                $body
            }
            $crate::ElementType::Long => {
                type $t = i64;
                $body
            }
            $crate::ElementType::Float => {
                type $t = f32;
                $body
            }
            $crate::ElementType::Double => {
                type $t = f64;
                $body
            }
            $crate::ElementType::String => {
                type $t = ::std::string::String;
                $body
            }
        }
    };
}
