use crate::sorts::SortOption;

/// True only for one of the six sort tokens, matched exactly.
pub fn is_valid_sort_option(raw: Option<&str>) -> bool {
    parse_sort_option(raw).is_some()
}

pub fn parse_sort_option(raw: Option<&str>) -> Option<SortOption> {
    raw.filter(|s| !s.is_empty())?.parse().ok()
}

/// Lenient positive integer parsing for query and path parameters.
///
/// Leading whitespace and a sign are accepted, then the leading run of digits
/// is the value; anything after it is ignored. Returns `None` when there are
/// no digits, the value is zero or negative, or it overflows `T`.
pub fn parse_positive_int<T>(raw: &str) -> Option<T>
where
    T: TryFrom<u64>,
{
    let rest = raw.trim_start();
    let (negative, rest) = match rest.as_bytes().first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };
    let digits_len = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits_len == 0 {
        return None;
    }

    let mut value: u64 = 0;
    for b in rest[..digits_len].bytes() {
        value = value.checked_mul(10)?.checked_add(u64::from(b - b'0'))?;
    }
    if negative || value == 0 {
        return None;
    }
    T::try_from(value).ok()
}
