//! Pretty-printing helpers for coordinates and measured values.

/// Formats a number with the given number of decimals, grouping integer digits in threes
/// separated by spaces: `5449603.10` becomes `"5 449 603.10"`.
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (index, digit) in int_part.chars().enumerate() {
        if index > 0 && (int_part.len() - index) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Formats a latitude in degrees with a hemisphere suffix, e.g. `"45.2344° N"`.
pub fn format_latitude(lat: f64, decimals: usize) -> String {
    let hemisphere = if lat < 0.0 { 'S' } else { 'N' };
    format!("{:.decimals$}° {hemisphere}", lat.abs())
}

/// Formats a longitude in degrees with a hemisphere suffix, e.g. `"14.3534° E"`.
pub fn format_longitude(lon: f64, decimals: usize) -> String {
    let hemisphere = if lon < 0.0 { 'W' } else { 'E' };
    format!("{:.decimals$}° {hemisphere}", lon.abs())
}

/// Formats an elevation in meters, rounded to the nearest whole meter, with an optional
/// `± error` term.
///
/// Returns `None` when the height is missing, zero or not finite, in which case the caller
/// omits the elevation from its output entirely.
pub fn format_elevation(height: Option<f64>, error: Option<f64>) -> Option<String> {
    let height = height?;
    if height == 0.0 || !height.is_finite() {
        return None;
    }

    let rounded = height.round() as i64;
    Some(match error {
        Some(error) if error.is_finite() && error > 0.0 => {
            format!("{rounded} ± {} m", error.round() as i64)
        }
        _ => format!("{rounded} m"),
    })
}
