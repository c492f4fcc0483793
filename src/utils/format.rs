//! Display helpers for trip figures

/// Format a distance in kilometres with one decimal place
pub fn format_distance(km: f64) -> String {
    let km = if km.is_finite() { km } else { 0.0 };
    format!("{:.1} km", km)
}

/// Format a duration given in minutes
///
/// Under an hour renders as `"N min"`, otherwise as `"Hh Mm"` (or `"Hh"` when
/// the remaining minutes round to zero).
pub fn format_duration(minutes: f64) -> String {
    if !minutes.is_finite() || minutes <= 0.0 {
        return "0 min".to_string();
    }
    if minutes < 60.0 {
        return format!("{} min", minutes.round() as u64);
    }

    let total = minutes.round() as u64;
    let (hours, mins) = (total / 60, total % 60);
    if mins > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}h", hours)
    }
}
