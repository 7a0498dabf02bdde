// Display formatting for cards, footnotes and hover text

/// Group the integer part with commas: 1924490.0 -> "1,924,490"
pub fn thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.');
    let sign = if negative { "-" } else { "" };

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Integer counts with separators
pub fn count(value: u64) -> String {
    thousands(value as f64, 0)
}

pub fn fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// 27244448682.48 -> "27.24B"
pub fn billions(value: f64) -> String {
    format!("{:.2}B", value / 1e9)
}

/// 5582156391.24 with 1 decimal -> "5582.2M"
pub fn millions(value: f64, decimals: usize) -> String {
    format!("{:.*}M", decimals, value / 1e6)
}

/// Headline-style millions: 1033018 -> "1M"
pub fn compact_millions(value: f64) -> String {
    millions(value, 0)
}

pub fn percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value)
}

/// Bootstrap text class for a change value
pub fn change_class(change: f64) -> &'static str {
    if change < 0.0 {
        "text-danger"
    } else {
        "text-success"
    }
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
