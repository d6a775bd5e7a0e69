// CLASSIFICATION: COMMUNITY
// Filename: payload.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! Decoded tensor payloads.
//!
//! The binary dump format is owned by the runtime that wrote it. A
//! [`PayloadDecoder`] supplied by the caller turns raw artifact bytes into a
//! [`TensorPayload`], which is either a typed array or an explicit marker for
//! a tensor that could not be converted.

use std::fmt;
use std::str::FromStr;

use num_complex::Complex;

/// Element type of a decoded tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    F32,
    F64,
    Complex64,
    Complex128,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    Bool,
    String,
    Structured,
}

/// Broad numeric category of a [`DType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DTypeClass {
    Float,
    Complex,
    Integer,
    Bool,
    Text,
    Structured,
}

impl DTypeClass {
    /// Whether values of this class can hold NaN or infinity.
    pub fn has_non_finite_values(self) -> bool {
        matches!(self, DTypeClass::Float | DTypeClass::Complex)
    }
}

/// Indexed by `DType as usize`.
const DTYPE_TABLE: &[(DType, &str, DTypeClass)] = &[
    (DType::F32, "float32", DTypeClass::Float),
    (DType::F64, "float64", DTypeClass::Float),
    (DType::Complex64, "complex64", DTypeClass::Complex),
    (DType::Complex128, "complex128", DTypeClass::Complex),
    (DType::I8, "int8", DTypeClass::Integer),
    (DType::I16, "int16", DTypeClass::Integer),
    (DType::I32, "int32", DTypeClass::Integer),
    (DType::I64, "int64", DTypeClass::Integer),
    (DType::U8, "uint8", DTypeClass::Integer),
    (DType::U16, "uint16", DTypeClass::Integer),
    (DType::U32, "uint32", DTypeClass::Integer),
    (DType::U64, "uint64", DTypeClass::Integer),
    (DType::Bool, "bool", DTypeClass::Bool),
    (DType::String, "string", DTypeClass::Text),
    (DType::Structured, "structured", DTypeClass::Structured),
];

impl DType {
    fn entry(self) -> &'static (DType, &'static str, DTypeClass) {
        &DTYPE_TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.entry().1
    }

    pub fn class(self) -> DTypeClass {
        self.entry().2
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DTYPE_TABLE
            .iter()
            .find(|(_, name, _)| *name == s)
            .map(|(dtype, _, _)| *dtype)
            .ok_or_else(|| format!("unsupported dtype: {s}"))
    }
}

/// One element of a structured tensor: named fields, each a small array.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub fields: Vec<(String, TensorArray)>,
}

/// Flat element storage of a decoded tensor.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorArray {
    F32(Vec<f32>),
    F64(Vec<f64>),
    Complex64(Vec<Complex<f32>>),
    Complex128(Vec<Complex<f64>>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    Bool(Vec<bool>),
    String(Vec<String>),
    Structured(Vec<Record>),
}

impl TensorArray {
    pub fn dtype(&self) -> DType {
        match self {
            TensorArray::F32(_) => DType::F32,
            TensorArray::F64(_) => DType::F64,
            TensorArray::Complex64(_) => DType::Complex64,
            TensorArray::Complex128(_) => DType::Complex128,
            TensorArray::I8(_) => DType::I8,
            TensorArray::I16(_) => DType::I16,
            TensorArray::I32(_) => DType::I32,
            TensorArray::I64(_) => DType::I64,
            TensorArray::U8(_) => DType::U8,
            TensorArray::U16(_) => DType::U16,
            TensorArray::U32(_) => DType::U32,
            TensorArray::U64(_) => DType::U64,
            TensorArray::Bool(_) => DType::Bool,
            TensorArray::String(_) => DType::String,
            TensorArray::Structured(_) => DType::Structured,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            TensorArray::F32(v) => v.len(),
            TensorArray::F64(v) => v.len(),
            TensorArray::Complex64(v) => v.len(),
            TensorArray::Complex128(v) => v.len(),
            TensorArray::I8(v) => v.len(),
            TensorArray::I16(v) => v.len(),
            TensorArray::I32(v) => v.len(),
            TensorArray::I64(v) => v.len(),
            TensorArray::U8(v) => v.len(),
            TensorArray::U16(v) => v.len(),
            TensorArray::U32(v) => v.len(),
            TensorArray::U64(v) => v.len(),
            TensorArray::Bool(v) => v.len(),
            TensorArray::String(v) => v.len(),
            TensorArray::Structured(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of decoding one dump artifact.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorPayload {
    Array(TensorArray),
    /// The artifact could not be converted into an array. `initialized` is
    /// false when the runtime dumped an uninitialized tensor.
    Inconvertible { initialized: bool },
}

impl TensorPayload {
    pub fn as_array(&self) -> Option<&TensorArray> {
        match self {
            TensorPayload::Array(array) => Some(array),
            TensorPayload::Inconvertible { .. } => None,
        }
    }
}

impl From<TensorArray> for TensorPayload {
    fn from(array: TensorArray) -> Self {
        TensorPayload::Array(array)
    }
}

/// Converts raw artifact bytes into a payload. Conversion failures are
/// reported as [`TensorPayload::Inconvertible`].
pub trait PayloadDecoder: Sync {
    fn decode(&self, bytes: &[u8]) -> TensorPayload;
}

impl<F> PayloadDecoder for F
where
    F: Fn(&[u8]) -> TensorPayload + Sync,
{
    fn decode(&self, bytes: &[u8]) -> TensorPayload {
        self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dtype_names_round_trip() {
        for (idx, (dtype, name, _)) in DTYPE_TABLE.iter().enumerate() {
            assert_eq!(*dtype as usize, idx);
            assert_eq!(dtype.name(), *name);
            assert_eq!(name.parse::<DType>().unwrap(), *dtype);
        }
        assert!("float8".parse::<DType>().is_err());
    }

    #[test]
    fn only_float_and_complex_can_be_non_finite() {
        assert!(DType::F32.class().has_non_finite_values());
        assert!(DType::Complex128.class().has_non_finite_values());
        assert!(!DType::I16.class().has_non_finite_values());
        assert!(!DType::String.class().has_non_finite_values());
        assert!(!DType::Structured.class().has_non_finite_values());
    }

    #[test]
    fn closures_decode() {
        let decoder = |bytes: &[u8]| -> TensorPayload { TensorArray::U8(bytes.to_vec()).into() };
        let payload = decoder.decode(&[1, 2, 3]);
        assert_eq!(payload.as_array().map(TensorArray::len), Some(3));
        assert_eq!(payload.as_array().map(TensorArray::dtype), Some(DType::U8));
    }
}
