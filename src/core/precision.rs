// src/core/precision.rs

//! Numeric precision abstraction for amplitudes and gate matrices.

use num_complex::Complex;
use num_traits::{Float, FloatConst};
use std::fmt;

/// Floating-point type used for the real and imaginary parts of amplitudes.
///
/// Implemented for `f32` (single-precision complex) and `f64`
/// (double-precision complex). Gate matrices and engines are generic over
/// this trait, so the precision is fixed at the type level.
pub trait Precision:
    Float + FloatConst + Into<f64> + Default + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Short name used in logs.
    const NAME: &'static str;

    /// Converts an `f64` into this precision, rounding if needed.
    fn from_f64(value: f64) -> Self;

    /// Default tolerance for normalization and unitarity checks.
    fn tolerance() -> Self;
}

impl Precision for f32 {
    const NAME: &'static str = "f32";

    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn tolerance() -> Self {
        1e-5
    }
}

impl Precision for f64 {
    const NAME: &'static str = "f64";

    fn from_f64(value: f64) -> Self {
        value
    }

    fn tolerance() -> Self {
        1e-9
    }
}

/// Target element type for [`SimulationEngine::as_type`](crate::SimulationEngine::as_type).
///
/// Real targets keep only the real part of a complex value.
pub trait Element: Copy + fmt::Debug {
    /// Whether the element carries an imaginary part.
    const IS_COMPLEX: bool;

    /// Builds an element from real and imaginary parts.
    fn from_parts(re: f64, im: f64) -> Self;
}

impl Element for f32 {
    const IS_COMPLEX: bool = false;

    fn from_parts(re: f64, _im: f64) -> Self {
        re as f32
    }
}

impl Element for f64 {
    const IS_COMPLEX: bool = false;

    fn from_parts(re: f64, _im: f64) -> Self {
        re
    }
}

impl Element for Complex<f32> {
    const IS_COMPLEX: bool = true;

    fn from_parts(re: f64, im: f64) -> Self {
        Complex::new(re as f32, im as f32)
    }
}

impl Element for Complex<f64> {
    const IS_COMPLEX: bool = true;

    fn from_parts(re: f64, im: f64) -> Self {
        Complex::new(re, im)
    }
}

/// Converts a complex value between precisions.
pub(crate) fn cast_complex<T: Precision, U: Precision>(value: Complex<T>) -> Complex<U> {
    Complex::new(U::from_f64(value.re.into()), U::from_f64(value.im.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_targets_drop_imaginary_part() {
        assert_eq!(<f64 as Element>::from_parts(0.25, 0.75), 0.25);
        assert_eq!(<f32 as Element>::from_parts(-1.5, 3.0), -1.5f32);
        assert_eq!(<Complex<f32> as Element>::from_parts(0.5, -0.5), Complex::new(0.5f32, -0.5));
    }

    #[test]
    fn cast_complex_narrows_to_f32() {
        let narrowed: Complex<f32> = cast_complex(Complex::new(0.1f64, 0.2));
        assert!((narrowed.re - 0.1f32).abs() < f32::EPSILON);
        assert!((narrowed.im - 0.2f32).abs() < f32::EPSILON);
    }
}
