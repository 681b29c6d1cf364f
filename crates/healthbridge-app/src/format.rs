// Copyright 2026 HealthBridge Contributors
// Licensed under the Apache License, Version 2.0

//! Display formatting helpers. All functions are total; inputs that do not
//! match the expected shape pass through unchanged.

/// Renders a phone number as `(NNN) NNN-NNNN` when it contains exactly ten
/// digits after stripping everything else. Any other digit count returns
/// the input untouched.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 10 {
        return phone.to_owned();
    }
    format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..])
}

/// Distances under one mile render as whole feet, otherwise as miles with
/// one decimal place.
pub fn format_distance(miles: f64) -> String {
    if miles < 1.0 {
        format!("{:.0} ft", miles * 5280.0)
    } else {
        format!("{miles:.1} mi")
    }
}

pub fn format_rating(rating: f64) -> String {
    format!("{rating:.1}")
}

#[cfg(test)]
mod tests {
    use super::{format_distance, format_phone, format_rating};

    #[test]
    fn phone_formats_ten_digit_numbers() {
        assert_eq!(format_phone("5551234567"), "(555) 123-4567");
        assert_eq!(format_phone("(555) 123-4567"), "(555) 123-4567");
        assert_eq!(format_phone("555.123.4567"), "(555) 123-4567");
    }

    #[test]
    fn phone_passes_through_other_digit_counts() {
        assert_eq!(format_phone("123-4567"), "123-4567");
        assert_eq!(format_phone("+1 555 123 4567"), "+1 555 123 4567");
        assert_eq!(format_phone(""), "");
    }

    #[test]
    fn distance_switches_units_at_one_mile() {
        assert_eq!(format_distance(0.8), "4224 ft");
        assert_eq!(format_distance(0.5), "2640 ft");
        assert_eq!(format_distance(1.0), "1.0 mi");
        assert_eq!(format_distance(2.1), "2.1 mi");
    }

    #[test]
    fn rating_renders_one_decimal() {
        assert_eq!(format_rating(4.8), "4.8");
        assert_eq!(format_rating(5.0), "5.0");
        assert_eq!(format_rating(4.25), "4.2");
    }
}
