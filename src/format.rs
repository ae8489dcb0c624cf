use chrono::{DateTime, SecondsFormat, Utc};

/// Renders a depth in meters without a trailing `.0` for integral values and
/// with full round-trip precision otherwise (`215.0` -> `215`, `214.5` ->
/// `214.5`). Dataset URLs, titles and descriptions all go through here.
pub fn format_depth(depth: f64) -> String {
    if depth.is_finite() && depth.fract() == 0.0 && depth.abs() < 1e15 {
        // adding 0.0 turns -0.0 into 0.0
        format!("{:.0}", depth + 0.0)
    } else {
        format!("{depth}")
    }
}

pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn format_geo(longitude: f64, latitude: f64) -> String {
    format!("({longitude};{latitude})")
}
