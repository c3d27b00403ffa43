use chrono::{Datelike, Duration, NaiveDate, TimeDelta, Weekday};

/// Resolves what a user typed into the Date field. Accepts ISO dates plus the
/// shorthands `today`, `tomorrow`, `yesterday`, `+3d`, `-1w`, `+1m`, `fri`, `next fri`.
pub(crate) fn parse_relative_date_input(input: &str, base: NaiveDate) -> Option<NaiveDate> {
    let trimmed = input.trim().to_lowercase();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(&trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    match trimmed.as_str() {
        "today" => return Some(base),
        "tomorrow" => return Some(base + Duration::days(1)),
        "yesterday" => return Some(base - Duration::days(1)),
        _ => {}
    }

    if let Some(date) = parse_relative_offset(&trimmed, base) {
        return Some(date);
    }

    if let Some(date) = parse_weekday_input(&trimmed, base) {
        return Some(date);
    }

    None
}

/// Normalizes the Date field on submit. Recognized input becomes `YYYY-MM-DD`;
/// anything else is kept as typed.
pub(crate) fn normalize_date_field(input: &str, base: NaiveDate) -> String {
    match parse_relative_date_input(input, base) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => input.to_string(),
    }
}

fn parse_relative_offset(input: &str, base: NaiveDate) -> Option<NaiveDate> {
    let mut chars = input.chars().peekable();
    let mut sign: i32 = 1;
    if let Some(&c) = chars.peek()
        && (c == '+' || c == '-')
    {
        if c == '-' {
            sign = -1;
        }
        chars.next();
    }

    let mut digits = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            digits.push(c);
            chars.next();
        } else {
            break;
        }
    }

    if digits.is_empty() {
        return None;
    }

    let qty: i32 = digits.parse().ok()?;
    let unit = chars.next()?;
    if chars.next().is_some() {
        return None;
    }

    let qty = sign * qty;
    // Out-of-range results are not dates; the caller keeps the text as typed.
    match unit {
        'd' => base.checked_add_signed(TimeDelta::try_days(qty as i64)?),
        'w' => base.checked_add_signed(TimeDelta::try_weeks(qty as i64)?),
        'm' => checked_add_months(base, qty),
        _ => None,
    }
}

fn parse_weekday_input(input: &str, base: NaiveDate) -> Option<NaiveDate> {
    let parts: Vec<&str> = input.split_whitespace().collect();

    match parts.as_slice() {
        [day] => Some(next_weekday(base, parse_weekday(day)?, false)),
        ["next", day] => Some(next_weekday(base, parse_weekday(day)?, true)),
        _ => None,
    }
}

fn parse_weekday(token: &str) -> Option<Weekday> {
    let token = token.trim();
    if token.starts_with("mon") {
        Some(Weekday::Mon)
    } else if token.starts_with("tue") {
        Some(Weekday::Tue)
    } else if token.starts_with("wed") {
        Some(Weekday::Wed)
    } else if token.starts_with("thu") {
        Some(Weekday::Thu)
    } else if token.starts_with("fri") {
        Some(Weekday::Fri)
    } else if token.starts_with("sat") {
        Some(Weekday::Sat)
    } else if token.starts_with("sun") {
        Some(Weekday::Sun)
    } else {
        None
    }
}

fn next_weekday(base: NaiveDate, weekday: Weekday, force_next: bool) -> NaiveDate {
    let base_num = base.weekday().num_days_from_monday() as i32;
    let target_num = weekday.num_days_from_monday() as i32;
    let mut delta = (target_num - base_num + 7) % 7;
    if force_next && delta == 0 {
        delta = 7;
    }
    base + Duration::days(delta as i64)
}

/// Moves by whole months, clamping the day to the target month's length
/// (Jan 31 + 1 month = Feb 28/29).
/// Stays on `base` when the target month is out of range.
pub(crate) fn add_months(base: NaiveDate, months: i32) -> NaiveDate {
    checked_add_months(base, months).unwrap_or(base)
}

fn checked_add_months(base: NaiveDate, months: i32) -> Option<NaiveDate> {
    let total = base
        .year()
        .checked_mul(12)?
        .checked_add(base.month() as i32 - 1)?
        .checked_add(months)?;
    let year = total.div_euclid(12);
    let month = (total.rem_euclid(12) + 1) as u32;
    let day = base.day().min(last_day_of_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

pub(crate) fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match NaiveDate::from_ymd_opt(next_year, next_month, 1) {
        Some(first_next) => (first_next - Duration::days(1)).day(),
        None => 31,
    }
}
