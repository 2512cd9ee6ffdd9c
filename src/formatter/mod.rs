//! Human-scaled rendering of timing measurements.

/// Format a measurement with the best-fit unit for its magnitude.
///
/// `ns` values scale up through `us`, `ms` and `s`; `ms` values scale up to
/// `s`; `s` values always print three decimals. Any other unit prints two
/// decimals with the unit appended verbatim.
pub fn format_value(value: f64, unit: &str) -> String {
    match unit {
        "ns" => {
            if value >= 1_000_000_000.0 {
                format!("{:.2}s", value / 1_000_000_000.0)
            } else if value >= 1_000_000.0 {
                format!("{:.2}ms", value / 1_000_000.0)
            } else if value >= 1_000.0 {
                format!("{:.2}us", value / 1_000.0)
            } else {
                format!("{:.0}ns", value)
            }
        }
        "ms" => {
            if value >= 1_000.0 {
                format!("{:.2}s", value / 1_000.0)
            } else {
                format!("{:.2}ms", value)
            }
        }
        "s" => format!("{:.3}s", value),
        other => format!("{:.2}{}", value, other),
    }
}

/// Format a signed percentage with an explicit sign, e.g. `+6.00%`.
pub fn format_signed_percent(change: f64) -> String {
    format!("{:+.2}%", change)
}
