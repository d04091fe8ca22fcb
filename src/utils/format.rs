/// Units used by [`format_size`], in 1024 steps
const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Render a byte count as a human-readable string.
///
/// 1024-based scaling over B, KB, MB and GB, rounded to one decimal place.
/// A trailing `.0` is dropped, so `1024` renders as `"1 KB"` and `1536` as
/// `"1.5 KB"`. Zero renders as the literal `"0 B"`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{:.0} {}", rounded, SIZE_UNITS[unit])
    } else {
        format!("{:.1} {}", rounded, SIZE_UNITS[unit])
    }
}
