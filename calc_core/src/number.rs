//! # Display Numbers
//!
//! The calculator display is text, not a number. Every operation parses the
//! display, computes with `f64`, and writes the result back as text. History
//! lines embed the same text, so the two conversions here define what users
//! see everywhere.
//!
//! ## Formatting rules
//!
//! - `NaN` → `"NaN"`, infinities → `"Infinity"` / `"-Infinity"`
//! - zero (including `-0.0`) → `"0"`
//! - `|x| >= 1e21` or `|x| < 1e-6` → exponent form with a signed exponent (`1e+21`, `1.5e-7`)
//! - otherwise the shortest decimal that round-trips (`0.1`, `120`, `0.30000000000000004`)
//!
//! ## Example
//!
//! ```rust
//! use calc_core::number::{format_number, parse_display};
//!
//! assert_eq!(format_number(120.0), "120");
//! assert_eq!(format_number(1e21), "1e+21");
//! assert_eq!(parse_display("0."), 0.0);
//! assert!(parse_display("Error").is_nan());
//! ```

/// Sentinel display text for domain errors
pub const ERROR_TEXT: &str = "Error";

/// Sentinel display text for magnitude overflow
pub const INFINITY_TEXT: &str = "Infinity";

/// Format a number the way the display shows it.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            INFINITY_TEXT.to_string()
        } else {
            format!("-{}", INFINITY_TEXT)
        };
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", value);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        }
    } else {
        format!("{}", value)
    }
}

/// Parse the leading number of a display string.
///
/// Accepts an optional sign followed by `Infinity` or by digits with at most
/// one decimal point and an optional exponent. Anything after the numeric
/// prefix is ignored. Text without a numeric prefix yields `NaN`.
pub fn parse_display(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();

    let negative = bytes.first() == Some(&b'-');
    let mut pos = usize::from(matches!(bytes.first(), Some(b'+') | Some(b'-')));

    if s[pos..].starts_with(INFINITY_TEXT) {
        return if negative { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let int_digits = count_digits(&bytes[pos..]);
    let int_part = &s[pos..pos + int_digits];
    pos += int_digits;

    let mut frac_part = "";
    if bytes.get(pos) == Some(&b'.') {
        let frac_digits = count_digits(&bytes[pos + 1..]);
        frac_part = &s[pos + 1..pos + 1 + frac_digits];
        pos += 1 + frac_digits;
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return f64::NAN;
    }

    let mut exponent = String::new();
    if matches!(bytes.get(pos), Some(b'e') | Some(b'E')) {
        let mut exp_pos = pos + 1;
        let exp_sign = match bytes.get(exp_pos) {
            Some(b'-') => {
                exp_pos += 1;
                "-"
            }
            Some(b'+') => {
                exp_pos += 1;
                ""
            }
            _ => "",
        };
        let exp_digits = count_digits(&bytes[exp_pos..]);
        if exp_digits > 0 {
            exponent = format!("e{}{}", exp_sign, &s[exp_pos..exp_pos + exp_digits]);
        }
    }

    let normalized = format!(
        "{}{}{}{}{}",
        if negative { "-" } else { "" },
        if int_part.is_empty() { "0" } else { int_part },
        if frac_part.is_empty() { "" } else { "." },
        frac_part,
        exponent,
    );

    normalized.parse().unwrap_or(f64::NAN)
}

/// Round to the nearest integer, halves toward positive infinity.
///
/// `2.5` → `3`, `-2.5` → `-2`.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
