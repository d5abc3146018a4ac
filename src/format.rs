//! `ru-RU` presentation rules: the placeholder for missing values, currency
//! amounts and date/time strings.
//!
//! Every function here is total. Bad input degrades to the placeholder or to
//! the raw value; nothing panics.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Shown in place of any value the order does not carry.
pub const PLACEHOLDER: &str = "Не указано";

/// Currency assumed when the payment does not name one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// `toLocaleString('ru-RU')` layout.
pub const DATE_TIME_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

const NBSP: char = '\u{a0}';

/// Settings the projection needs besides the order itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayOptions {
    pub timezone: Tz,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Europe::Moscow,
        }
    }
}

/// A value that may or may not have something worth showing.
///
/// Strings count as missing when blank. Numbers are always shown, zero
/// included.
pub trait DisplayValue {
    fn display_value(&self) -> Option<String>;
}

impl DisplayValue for str {
    fn display_value(&self) -> Option<String> {
        let trimmed = self.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

impl DisplayValue for String {
    fn display_value(&self) -> Option<String> {
        self.as_str().display_value()
    }
}

impl DisplayValue for i64 {
    fn display_value(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl DisplayValue for crate::order::ItemStatus {
    fn display_value(&self) -> Option<String> {
        match self {
            crate::order::ItemStatus::Code(code) => code.display_value(),
            crate::order::ItemStatus::Label(label) => label.display_value(),
        }
    }
}

impl<T: DisplayValue> DisplayValue for Option<T> {
    fn display_value(&self) -> Option<String> {
        self.as_ref().and_then(DisplayValue::display_value)
    }
}

pub fn display_or_placeholder<T: DisplayValue + ?Sized>(value: &T) -> String {
    value
        .display_value()
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

// (code, symbol, fraction digits) as the ru-RU locale prints them.
const CURRENCIES: &[(&str, &str, u32)] = &[
    ("RUB", "₽", 2),
    ("USD", "$", 2),
    ("EUR", "€", 2),
    ("GBP", "£", 2),
    ("JPY", "¥", 0),
    ("CNY", "CN¥", 2),
    ("KRW", "₩", 0),
    ("UAH", "₴", 2),
    ("INR", "₹", 2),
    ("ILS", "₪", 2),
];

/// Format `amount` as a `ru-RU` currency string, e.g. `12 345,60 ₽`.
///
/// A missing or non-finite amount yields [`PLACEHOLDER`], as does one too
/// large to print exactly. Codes outside the symbol table are printed as
/// given, with two fraction digits.
pub fn format_currency(amount: Option<f64>, currency: Option<&str>) -> String {
    let Some(amount) = amount.filter(|a| a.is_finite()) else {
        return PLACEHOLDER.to_string();
    };

    let code = currency
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CURRENCY)
        .to_ascii_uppercase();

    let (symbol, digits) = match CURRENCIES.iter().find(|(known, _, _)| *known == code) {
        Some((_, symbol, digits)) => (symbol.to_string(), *digits),
        None => (code, 2),
    };

    match format_number(amount, digits) {
        Some(number) => format!("{}{}{}", number, NBSP, symbol),
        None => PLACEHOLDER.to_string(),
    }
}

/// Decimal comma, no-break space thousands separator. `None` when the amount
/// in minor units does not fit a `u128`.
fn format_number(amount: f64, fraction_digits: u32) -> Option<String> {
    let scale = 10u128.pow(fraction_digits);
    let scaled = (amount.abs() * scale as f64).round();
    if scaled >= u128::MAX as f64 {
        return None;
    }
    let minor = scaled as u128;
    let whole = minor / scale;
    let fraction = minor % scale;

    let mut out = String::new();
    if amount.is_sign_negative() && minor != 0 {
        out.push('-');
    }
    out.push_str(&group_thousands(whole));
    if fraction_digits > 0 {
        out.push(',');
        out.push_str(&format!(
            "{:0width$}",
            fraction,
            width = fraction_digits as usize
        ));
    }
    Some(out)
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(NBSP);
        }
        out.push(ch);
    }
    out
}

/// Format an ISO-8601-like date string in `timezone`.
///
/// Missing input yields [`PLACEHOLDER`]; input that does not parse is
/// returned unchanged.
pub fn format_date(value: Option<&str>, timezone: Tz) -> String {
    let Some(raw) = value.filter(|v| !v.trim().is_empty()) else {
        return PLACEHOLDER.to_string();
    };

    match parse_date(raw.trim(), timezone) {
        Some(dt) => dt.format(DATE_TIME_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// Format a Unix timestamp in seconds. Out-of-range values are shown as the
/// bare number.
pub fn format_timestamp(seconds: Option<i64>, timezone: Tz) -> String {
    let Some(seconds) = seconds else {
        return PLACEHOLDER.to_string();
    };

    match DateTime::<Utc>::from_timestamp(seconds, 0) {
        Some(dt) => dt
            .with_timezone(&timezone)
            .format(DATE_TIME_FORMAT)
            .to_string(),
        None => seconds.to_string(),
    }
}

fn parse_date(raw: &str, timezone: Tz) -> Option<DateTime<Tz>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&timezone));
    }

    // Without an offset the time is read as wall-clock time in the display zone.
    for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, layout) {
            return timezone.from_local_datetime(&naive).earliest();
        }
    }

    // Date-only strings are UTC midnight.
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight).with_timezone(&timezone))
}
