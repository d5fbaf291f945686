use chrono::{DateTime, NaiveDate};

const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

pub fn format_vote_average(vote_average: f64) -> String {
    format!("{:.1}", vote_average)
}

/// "1999-10-15" -> "October 15, 1999". Unparseable input yields "Unknown".
pub fn format_release_date(raw: &str) -> String {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.date_naive()));
    match date {
        Some(d) => d.format("%B %-d, %Y").to_string(),
        None => "Unknown".to_string(),
    }
}

pub fn format_runtime(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours == 0 {
        format!("{}m", mins)
    } else {
        format!("{}h {}m", hours, mins)
    }
}

/// Whole dollars with thousands separators.
pub fn format_money(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("${}", out)
}

/// Poster URL for a given TMDB size bucket (`w300` for cards, `w500` for detail).
pub fn poster_url(poster_path: Option<&str>, size: &str) -> Option<String> {
    poster_path
        .filter(|p| !p.is_empty())
        .map(|p| format!("{IMAGE_BASE}/{size}{p}"))
}
