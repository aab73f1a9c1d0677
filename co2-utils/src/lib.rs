//! Shared utility functions for the CO2 chart crates.

/// Lenient numeric helpers.
///
/// Dataset cells are free-form text; anything that is not a finite number
/// is treated as missing, and missing values read as 0 in sums.
pub mod numbers {
    /// Parse a metric cell. Blank, `null`, `n/a` and non-finite values yield `None`.
    pub fn parse_metric(ess: &str) -> Option<f64> {
        let ess_lowered = ess.trim().to_lowercase();
        match ess_lowered.as_str() {
            "" | "null" | "n/a" | "na" | "nan" => None,
            s => s.parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    /// Parse a year cell into an integer year.
    ///
    /// Accepts `"2000"`, `" 2000 "` and `"2000.0"`; anything with a
    /// fractional part is rejected.
    pub fn parse_year(ess: &str) -> Option<i32> {
        let trimmed = ess.trim();
        if let Ok(year) = trimmed.parse::<i32>() {
            return Some(year);
        }
        let float = trimmed.parse::<f64>().ok()?;
        if float.fract() == 0.0 && float.abs() <= i32::MAX as f64 {
            Some(float as i32)
        } else {
            None
        }
    }

    /// Collapse an optional reading into a summable value.
    pub fn coerce(value: Option<f64>) -> f64 {
        match value {
            Some(v) if v.is_finite() => v,
            _ => 0.0,
        }
    }

    /// `part / total * 100`, or 0 when the total is 0.
    pub fn percentage(part: f64, total: f64) -> f64 {
        if total == 0.0 {
            0.0
        } else {
            part / total * 100.0
        }
    }

    pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() <= epsilon
    }

}

/// Error types
pub mod error {
    use thiserror::Error;

    /// Failure to turn a user-supplied string into a typed parameter.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum ParseError {
        #[error("invalid year: {0:?}")]
        InvalidYear(String),

        #[error("decade start must be a multiple of 10, got {0}")]
        InvalidDecade(i32),

        #[error("year must have four digits, got {0}")]
        YearOutOfRange(i32),

        #[error("unknown metric: {0:?}")]
        UnknownMetric(String),

        #[error("unknown stack mode: {0:?} (expected raw or percentage)")]
        UnknownMode(String),

        #[error("unknown group key: {0:?} (expected entity, code or region)")]
        UnknownGroupKey(String),
    }
}
