//! Shared test utilities for the eco-score workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Approximate float assertions
//! - Reference locations and bounding boxes
//! - Raster scene and score batch generators
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_approx_eq, locations};
//! ```
//!
//! Fixtures are plain tuples and JSON so this crate stays independent of the
//! crates it tests.

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for approximate equality of coordinate pairs.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_coords_approx_eq;
///
/// assert_coords_approx_eq!((38.5001, -122.9001), (38.5, -122.9), 0.001);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($x1:expr, $y1:expr), ($x2:expr, $y2:expr), $epsilon:expr) => {{
        $crate::assert_approx_eq!($x1, $x2, $epsilon);
        $crate::assert_approx_eq!($y1, $y2, $epsilon);
    }};
}

/// Assert a value lies within `expected ± expected * fraction`.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_within_fraction;
///
/// assert_within_fraction!(63.0, 60.0, 0.1); // passes: 54..=66
/// ```
#[macro_export]
macro_rules! assert_within_fraction {
    ($value:expr, $expected:expr, $fraction:expr) => {{
        let expected: f64 = $expected as f64;
        let tolerance = (expected * ($fraction as f64)).abs();
        $crate::assert_approx_eq!($value, expected, tolerance + 1e-9);
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(0.0, 0.0, 0.0001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_assert_coords_approx_eq_passes() {
        assert_coords_approx_eq!((1.0001, 2.0001), (1.0, 2.0), 0.001);
    }

    #[test]
    fn test_assert_within_fraction() {
        assert_within_fraction!(66.0, 60.0, 0.1);
        assert_within_fraction!(54.0, 60.0, 0.1);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_within_fraction_fails() {
        assert_within_fraction!(67.0, 60.0, 0.1);
    }
}
