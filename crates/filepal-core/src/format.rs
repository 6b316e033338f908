//! Human-readable formatting helpers shared by the assistant and the shell.

const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Format a byte count using 1024-based units, e.g. `1536` -> `"1.5 KB"`.
///
/// Values are rounded to two decimals and trailing zeros are dropped.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", trim_decimal(rounded), UNITS[unit])
}

/// Extension of a file name without the dot; empty when there is none.
///
/// Dotfiles such as `.bashrc` have no extension.
pub fn file_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => "",
        Some(idx) => &name[idx + 1..],
    }
}

fn trim_decimal(value: f64) -> String {
    let s = format!("{:.2}", value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
