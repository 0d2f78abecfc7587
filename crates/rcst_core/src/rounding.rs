//! Rounding of weights and chances to "nice" fractions.
//!
//! A number is first placed in a decimal band `10^(p-1) ..= 10^p`. The band
//! midpoint `0.5 * 10^p` is the starting candidate, and any member of the
//! nice-number set that lies strictly closer to the input replaces it.

use std::sync::LazyLock;

use tracing::warn;

pub const MIN_POWER_OF_TEN: i32 = -4;
pub const MAX_POWER_OF_TEN: i32 = 5;

/// `10^-5 ..= 10^5`, indexed by `p - MIN_POWER_OF_TEN + 1`.
const POWERS_OF_TEN: [f64; 11] = [
    1e-5, 1e-4, 1e-3, 1e-2, 1e-1, 1e0, 1e1, 1e2, 1e3, 1e4, 1e5,
];

const MIN_DENOMINATOR: u32 = 6;
const MAX_DENOMINATOR: u32 = 10;

static NICE_NUMBERS: LazyLock<Vec<f64>> = LazyLock::new(build_nice_numbers);

fn build_nice_numbers() -> Vec<f64> {
    let mut out = vec![1.0];
    for denominator in MIN_DENOMINATOR..=MAX_DENOMINATOR {
        for numerator in 1..denominator {
            push_unique(&mut out, f64::from(numerator) / f64::from(denominator));
        }
    }
    push_unique(&mut out, 0.05);
    push_unique(&mut out, 0.95);
    out
}

fn push_unique(values: &mut Vec<f64>, value: f64) {
    if !values.contains(&value) {
        values.push(value);
    }
}

/// The rounding targets in construction order. Ties between equally close
/// targets go to the earlier entry.
pub fn nice_numbers() -> &'static [f64] {
    &NICE_NUMBERS
}

pub fn power_of_ten(exponent: i32) -> Option<f64> {
    let index = exponent - MIN_POWER_OF_TEN + 1;
    usize::try_from(index)
        .ok()
        .and_then(|i| POWERS_OF_TEN.get(i).copied())
}

/// Smallest `p` in the supported range with `10^(p-1) <= number <= 10^p`.
pub fn magnitude(number: f64) -> Option<i32> {
    (MIN_POWER_OF_TEN..=MAX_POWER_OF_TEN).find(|&p| {
        match (power_of_ten(p - 1), power_of_ten(p)) {
            (Some(lower), Some(upper)) => lower <= number && number <= upper,
            _ => false,
        }
    })
}

/// Like [`round_number`], but `None` for values outside the supported band.
pub fn try_round_number(number: f64) -> Option<f64> {
    if number == 0.0 {
        return Some(number);
    }

    let midpoint = 0.5 * power_of_ten(magnitude(number)?)?;

    let mut rounded = midpoint;
    let mut best_distance = (number - rounded).abs();
    for &candidate in nice_numbers() {
        let distance = (number - candidate).abs();
        if distance < best_distance {
            rounded = candidate;
            best_distance = distance;
        }
    }
    Some(rounded)
}

pub fn round_number(number: f64) -> f64 {
    try_round_number(number).unwrap_or_else(|| {
        warn!(number, "number is out of the expected range, leaving it unchanged");
        number
    })
}
