use serde::{Deserialize, Serialize};

/// Typed argument or return value of a trace call.
///
/// Serialized externally tagged, e.g. `{"uint": 3}` or `{"array": [{"pointer": 4096}]}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Missing or null value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer (also used for enums recorded as signed).
    #[serde(rename = "sint")]
    SInt(i64),
    /// Unsigned integer.
    #[serde(rename = "uint")]
    UInt(u64),
    /// Floating point.
    Float(f64),
    /// String.
    Str(String),
    /// Opaque pointer or handle.
    Pointer(u64),
    /// Array of values (out-parameters are recorded as one-element arrays).
    Array(Vec<Value>),
    /// Struct members in declaration order.
    Struct(Vec<Value>),
    /// Raw bytes.
    Blob(Vec<u8>),
}

impl Value {
    /// Integer view of the value; non-numeric values read as 0.
    pub fn to_uint(&self) -> u64 {
        match self {
            Self::Bool(b) => u64::from(*b),
            Self::SInt(v) => *v as u64,
            Self::UInt(v) | Self::Pointer(v) => *v,
            Self::Float(v) => *v as u64,
            _ => 0,
        }
    }

    /// Truncating 32-bit view, the width of GL enums and names.
    pub fn to_u32(&self) -> u32 {
        self.to_uint() as u32
    }

    /// Signed view of the value; non-numeric values read as 0.
    pub fn to_sint(&self) -> i64 {
        match self {
            Self::Bool(b) => i64::from(*b),
            Self::SInt(v) => *v,
            Self::UInt(v) | Self::Pointer(v) => *v as i64,
            Self::Float(v) => *v as i64,
            _ => 0,
        }
    }

    /// Pointer view of the value; null reads as 0.
    pub fn to_pointer(&self) -> u64 {
        match self {
            Self::Pointer(v) | Self::UInt(v) => *v,
            Self::SInt(v) => *v as u64,
            _ => 0,
        }
    }

    /// Elements when the value is an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Members when the value is a struct.
    pub fn as_struct(&self) -> Option<&[Value]> {
        match self {
            Self::Struct(v) => Some(v),
            _ => None,
        }
    }

    /// Byte length when the value is a blob.
    pub fn blob_len(&self) -> Option<usize> {
        match self {
            Self::Blob(v) => Some(v.len()),
            _ => None,
        }
    }

    /// First element of an array value, the shape of API out-parameters.
    pub fn first_element(&self) -> Option<&Value> {
        self.as_array().and_then(|a| a.first())
    }

    /// True for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Build an array of unsigned integers.
    pub fn uints(values: impl IntoIterator<Item = u64>) -> Self {
        Self::Array(values.into_iter().map(Self::UInt).collect())
    }

    /// Build a one-element pointer array, the shape of a COM out-parameter.
    pub fn out_pointer(ptr: u64) -> Self {
        Self::Array(vec![Self::Pointer(ptr)])
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::UInt(u64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::SInt(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::SInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}
