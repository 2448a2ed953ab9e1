use crate::error::{Error, Result};

/// Asserts that a numerical value is in the provided interval `(a,b]` and panics
/// with a helpful message if not
///
/// ### Example
/// ```ignore
/// let factor = 1.5;
/// assert_interval!(factor, 0.0, 1.0);
/// ```
/// This will panic with the message "Invalid value for \`factor\`. Must be in the interval (0.0, 1.0]."
#[macro_export]
macro_rules! assert_interval {
    ($var:expr, $a:expr, $b:expr) => {
        assert!(
            $var > $a && $var <= $b,
            "Invalid value for `{}`. Must be in the interval ({}, {}].",
            stringify!($var),
            $a,
            $b,
        );
    };
}

/// Check that `value` lies in `(0, 1]`
pub(crate) fn ensure_unit_open(name: &'static str, value: f32) -> Result<()> {
    (value > 0.0 && value <= 1.0)
        .then_some(())
        .ok_or(Error::OutOfRange {
            name,
            value,
            interval: "(0, 1]",
        })
}

/// Check that `value` lies in `[lo, 1]`
pub(crate) fn ensure_unit_from(name: &'static str, value: f32, lo: f32) -> Result<()> {
    (value >= lo && value <= 1.0)
        .then_some(())
        .ok_or(Error::OutOfRange {
            name,
            value,
            interval: if lo == 0.0 {
                "[0, 1]"
            } else {
                "[epsilon_floor, 1]"
            },
        })
}
