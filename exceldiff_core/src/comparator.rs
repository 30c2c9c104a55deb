//! Cell equality under a canonical scalar representation.

use exceldiff_common::CellValue;

const DEFAULT_DECIMAL_PLACES: i32 = 10;

/// Decides whether two cells hold the same value.
///
/// Values of different kinds never compare equal: the number `1` and the
/// text `"1"` are different cells. Numbers are rounded to a fixed number of
/// decimal places first so that float storage noise does not register as a
/// change.
#[derive(Debug, Clone, Copy)]
pub struct CellComparator {
    decimal_places: i32,
}

impl CellComparator {
    pub fn new() -> Self {
        Self {
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }

    pub fn with_decimal_places(mut self, places: i32) -> Self {
        self.decimal_places = places;
        self
    }

    pub fn equal(&self, left: &CellValue, right: &CellValue) -> bool {
        match (left, right) {
            (CellValue::Empty, CellValue::Empty) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            (CellValue::Number(a), CellValue::Number(b)) => self.numbers_equal(*a, *b),
            _ => false,
        }
    }

    fn numbers_equal(&self, a: f64, b: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return a.is_nan() && b.is_nan();
        }
        self.canonical(a) == self.canonical(b)
    }

    fn canonical(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.decimal_places);
        let scaled = value * factor;
        // Huge magnitudes have no fractional part worth rounding
        if scaled.is_finite() {
            scaled.round() / factor
        } else {
            value
        }
    }
}

impl Default for CellComparator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_kind_equality() {
        let cmp = CellComparator::new();
        assert!(cmp.equal(&CellValue::text("Bob"), &CellValue::text("Bob")));
        assert!(!cmp.equal(&CellValue::text("Bob"), &CellValue::text("Bobby")));
        assert!(cmp.equal(&CellValue::Bool(true), &CellValue::Bool(true)));
        assert!(cmp.equal(&CellValue::Number(2.0), &CellValue::Number(2.0)));
    }

    #[test]
    fn test_no_type_coercion() {
        let cmp = CellComparator::new();
        assert!(!cmp.equal(&CellValue::Number(1.0), &CellValue::text("1")));
        assert!(!cmp.equal(&CellValue::Bool(true), &CellValue::Number(1.0)));
        assert!(!cmp.equal(&CellValue::Bool(true), &CellValue::text("TRUE")));
    }

    #[test]
    fn test_padding_equals_blank_but_not_empty_text() {
        let cmp = CellComparator::new();
        assert!(cmp.equal(&CellValue::Empty, &CellValue::Empty));
        assert!(!cmp.equal(&CellValue::Empty, &CellValue::text("")));
        assert!(!cmp.equal(&CellValue::Empty, &CellValue::text("c")));
    }

    #[test]
    fn test_float_noise_ignored() {
        let cmp = CellComparator::new();
        assert!(cmp.equal(&CellValue::Number(0.1 + 0.2), &CellValue::Number(0.3)));
        assert!(!cmp.equal(&CellValue::Number(0.3), &CellValue::Number(0.3001)));
        assert!(cmp.equal(&CellValue::Number(-0.0), &CellValue::Number(0.0)));
    }

    #[test]
    fn test_special_floats() {
        let cmp = CellComparator::new();
        assert!(cmp.equal(&CellValue::Number(f64::NAN), &CellValue::Number(f64::NAN)));
        assert!(!cmp.equal(&CellValue::Number(f64::NAN), &CellValue::Number(0.0)));
        assert!(cmp.equal(&CellValue::Number(1e300), &CellValue::Number(1e300)));
        assert!(cmp.equal(
            &CellValue::Number(f64::INFINITY),
            &CellValue::Number(f64::INFINITY)
        ));
    }

    #[test]
    fn test_custom_precision() {
        let cmp = CellComparator::new().with_decimal_places(2);
        assert!(cmp.equal(&CellValue::Number(1.001), &CellValue::Number(1.0)));
        assert!(!cmp.equal(&CellValue::Number(1.01), &CellValue::Number(1.0)));
    }
}
