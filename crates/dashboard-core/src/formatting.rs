/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let factor = 10_f64.powi(decimals as i32);
    let rounded = (value.abs() * factor).round() / factor;

    let grouped = group_thousands(&(rounded.trunc() as u64).to_string());
    let body = if decimals == 0 {
        grouped
    } else {
        let frac = format!("{:.prec$}", rounded.fract(), prec = decimals as usize);
        // `frac` is "0.xx"; keep the ".xx" part.
        format!("{}{}", grouped, &frac[1..])
    };

    if negative {
        format!("-{}", body)
    } else {
        body
    }
}

/// Format an integer count with thousands separators.
pub fn format_count(value: usize) -> String {
    group_thousands(&value.to_string())
}

/// Format the amount paid as whole euros: the fractional part is dropped,
/// not rounded.
///
/// ```
/// use dashboard_core::formatting::format_amount;
///
/// assert_eq!(format_amount(35.96), "35 €");
/// assert_eq!(format_amount(0.0), "0 €");
/// ```
pub fn format_amount(amount: f64) -> String {
    format!("{} €", amount.trunc() as i64)
}

/// Format a total number of seconds as `DAYS:HOURS:MINUTES:SECONDS` with
/// unpadded fields.
///
/// ```
/// use dashboard_core::formatting::format_watch_time;
///
/// assert_eq!(format_watch_time(90_061), "1:1:1:1");
/// assert_eq!(format_watch_time(59), "0:0:0:59");
/// ```
pub fn format_watch_time(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    format!("{}:{}:{}:{}", days, hours, minutes, seconds)
}

/// Format an hour total with one decimal and an `h` suffix.
pub fn format_hours(hours: f64) -> String {
    format!("{}h", format_number(hours, 1))
}

/// Round to one decimal place, the precision used for every hour total.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let remainder = s.len() % 3;
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i != 0 && i % 3 == remainder {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
