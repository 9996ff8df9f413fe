pub mod complexity;
pub mod cost;
pub mod duration;
pub mod resource_hours;
pub mod risk;
pub mod team;

/// Rounds half-way cases toward positive infinity (`-2.5 -> -2`, `2.5 -> 3`).
///
/// Compares the exact fractional part instead of adding 0.5, which would
/// carry into the next integer for `0.49999999999999994` and for odd values
/// at or above 2^52.
pub(crate) fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Durations are reported with one decimal place.
pub(crate) fn round_to_tenth(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}
