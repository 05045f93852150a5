/// M:SS, clamping negative values to 0:00. The clamp lives here in the
/// display layer; countdown state itself is allowed to go negative.
pub fn format_mmss(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Planned minutes to one decimal, e.g. "5.0 min".
pub fn format_minutes(minutes: f64) -> String {
    format!("{:.1} min", minutes)
}

/// Overrun amount once the countdown has crossed zero.
pub fn format_overrun(remaining_secs: i64) -> Option<String> {
    if remaining_secs < 0 {
        Some(format!("+{}", format_mmss(-remaining_secs)))
    } else {
        None
    }
}
