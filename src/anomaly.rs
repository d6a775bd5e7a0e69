// CLASSIFICATION: COMMUNITY
// Filename: anomaly.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! NaN / infinity detection on decoded dumps.

use num_complex::Complex;
use num_traits::{Float, float::FloatCore};

use crate::datum::DebugTensorDatum;
use crate::payload::{TensorArray, TensorPayload};

/// Predicate applied to each dump by [`crate::DumpDir::find`].
pub type TensorFilter = dyn Fn(&DebugTensorDatum, &TensorPayload) -> bool + Sync;

/// Whether a decoded dump contains any NaN or infinite element.
///
/// Inconvertible payloads, empty arrays and dtypes without a NaN/Inf
/// representation (integers, bools, strings, structured records) give `false`.
pub fn has_inf_or_nan(_datum: &DebugTensorDatum, tensor: &TensorPayload) -> bool {
    let Some(array) = tensor.as_array() else {
        return false;
    };
    if !array.dtype().class().has_non_finite_values() {
        return false;
    }
    match array {
        TensorArray::F32(values) => any_non_finite(values),
        TensorArray::F64(values) => any_non_finite(values),
        TensorArray::Complex64(values) => any_non_finite_complex(values),
        TensorArray::Complex128(values) => any_non_finite_complex(values),
        _ => false,
    }
}

fn is_non_finite<T: Float>(value: T) -> bool {
    value.is_nan() || value.is_infinite()
}

fn any_non_finite<T: Float>(values: &[T]) -> bool {
    values.iter().copied().any(is_non_finite)
}

fn any_non_finite_complex<T: Float + FloatCore>(values: &[Complex<T>]) -> bool {
    values.iter().any(|c| c.is_nan() || c.is_infinite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Record;
    use std::path::Path;

    fn datum() -> DebugTensorDatum {
        DebugTensorDatum::new(
            Path::new("/foo"),
            Path::new("_tfdbg_device_,job_localhost,replica_0,task_0,cpu_0/bar_0_DebugIdentity_42"),
        )
        .unwrap()
    }

    fn check(array: TensorArray) -> bool {
        has_inf_or_nan(&datum(), &TensorPayload::Array(array))
    }

    #[test]
    fn detects_nan_and_inf() {
        assert!(check(TensorArray::F64(vec![f64::NAN, f64::NAN, 7.0])));
        assert!(check(TensorArray::F64(vec![f64::INFINITY, f64::INFINITY, 7.0])));
        assert!(check(TensorArray::F64(vec![f64::INFINITY, f64::NAN, 7.0])));
        assert!(check(TensorArray::F32(vec![1.0, f32::NEG_INFINITY])));
    }

    #[test]
    fn finite_and_empty_are_clean() {
        assert!(!check(TensorArray::F64(vec![0.0, 0.0, 7.0])));
        assert!(!check(TensorArray::F64(vec![])));
        assert!(!check(TensorArray::F32(vec![f32::MAX, f32::MIN_POSITIVE])));
    }

    #[test]
    fn inconvertible_is_never_anomalous() {
        for initialized in [false, true] {
            assert!(!has_inf_or_nan(&datum(), &TensorPayload::Inconvertible { initialized }));
        }
    }

    #[test]
    fn complex_values() {
        let clean = vec![
            Complex::new(0.0, 1.0),
            Complex::new(0.0, 3.0),
            Complex::new(0.0, 3.0),
            Complex::new(0.0, 7.0),
        ];
        assert!(!check(TensorArray::Complex128(clean.clone())));

        let mut dirty = clean;
        dirty.push(Complex::new(f64::NAN, 0.0));
        assert!(check(TensorArray::Complex128(dirty)));

        assert!(check(TensorArray::Complex64(vec![Complex::new(1.0, f32::INFINITY)])));
        assert!(!check(TensorArray::Complex64(vec![Complex::new(f32::MAX, -f32::MAX)])));
    }

    #[test]
    fn non_float_dtypes_are_clean() {
        assert!(!check(TensorArray::I16(vec![1, 3, 3, 7])));
        assert!(!check(TensorArray::Bool(vec![true, false])));
        assert!(!check(TensorArray::String(
            ["s", "p", "a", "m"].iter().map(|s| s.to_string()).collect()
        )));
        assert!(!check(TensorArray::Structured(vec![
            Record {
                fields: vec![
                    ("spam".into(), TensorArray::String(vec!["spam".into()])),
                    ("eggs".into(), TensorArray::F64(vec![8.0, 7.0])),
                ],
            },
            Record {
                fields: vec![
                    ("spam".into(), TensorArray::String(vec!["eggs".into()])),
                    ("eggs".into(), TensorArray::F64(vec![f64::NAN, 5.0])),
                ],
            },
        ])));
    }
}
