use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

const MONTHS: &[(&str, u32)] = &[
    ("janeiro", 0),
    ("fevereiro", 1),
    ("março", 2),
    ("marco", 2),
    ("abril", 3),
    ("maio", 4),
    ("junho", 5),
    ("julho", 6),
    ("agosto", 7),
    ("setembro", 8),
    ("outubro", 9),
    ("novembro", 10),
    ("dezembro", 11),
];

/// Attempts tried in order; the first `Some` wins.
const FORMATS: &[fn(&str) -> Option<DateTime<Utc>>] = &[parse_numeric, parse_spelled];

/// Fallback for text that matches no known format. Sorts as the oldest date.
pub fn sentinel() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// Parse a presentation date (`"dd/mm/yyyy ..."` or `"5 de março de 2025"`).
/// Never fails: unrecognized text yields [`sentinel`].
pub fn parse_date(text: &str) -> DateTime<Utc> {
    FORMATS
        .iter()
        .find_map(|attempt| attempt(text))
        .unwrap_or_else(|| {
            debug!(date = text, "unparseable presentation date, using epoch");
            sentinel()
        })
}

fn parse_numeric(text: &str) -> Option<DateTime<Utc>> {
    let segment = text.trim().split(' ').next()?;
    if !segment.contains('/') {
        return None;
    }
    let mut parts = segment.split('/');
    let day = leading_int(parts.next()?)?;
    let month = leading_int(parts.next()?)?;
    let year = leading_int(parts.next()?)?;
    // 1-based month on the wire
    let month0 = u32::try_from(month).ok()?.checked_sub(1)?;
    to_timestamp(year, month0, day)
}

fn parse_spelled(text: &str) -> Option<DateTime<Utc>> {
    let lower = text.trim().to_lowercase();
    let parts: Vec<&str> = lower.split(" de ").collect();
    if parts.len() < 3 {
        return None;
    }
    let day = leading_int(parts[0])?;
    let month_name = parts[1].trim();
    let month0 = MONTHS
        .iter()
        .find(|(name, _)| *name == month_name)
        .map(|(_, idx)| *idx)?;
    let year = leading_int(parts[2])?;
    to_timestamp(year, month0, day)
}

fn to_timestamp(year: i64, month0: u32, day: i64) -> Option<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        month0 + 1,
        u32::try_from(day).ok()?,
    )?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Integer prefix of `s` after trimming: `"2025 às 10h"` → 2025.
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<i64>().ok().map(|n| n * sign)
}

// ── Tests ──
