//! Value classification of decoded payloads.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic category of a decoded payload.
///
/// Drives which context action the record menu offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    ContactInfo,
    Email,
    Isbn,
    Phone,
    Product,
    Sms,
    Text,
    Url,
    Wifi,
    Geo,
    CalendarEvent,
    DriverLicense,
    #[serde(other)]
    Unknown,
}

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9()\-. ]+$").expect("phone pattern is a valid regex")
});

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value.len() >= prefix.len()
        && value.is_char_boundary(prefix.len())
        && value[..prefix.len()].eq_ignore_ascii_case(prefix)
}

impl ValueType {
    /// Classifies a raw payload for providers that only hand back text.
    pub fn classify(raw: &str) -> Self {
        let value = raw.trim();
        if value.is_empty() {
            return ValueType::Unknown;
        }

        if starts_with_ignore_case(value, "http://") || starts_with_ignore_case(value, "https://")
        {
            return ValueType::Url;
        }
        if starts_with_ignore_case(value, "tel:") {
            return ValueType::Phone;
        }
        if starts_with_ignore_case(value, "mailto:") || starts_with_ignore_case(value, "MATMSG:")
        {
            return ValueType::Email;
        }
        if starts_with_ignore_case(value, "smsto:") || starts_with_ignore_case(value, "sms:") {
            return ValueType::Sms;
        }
        if starts_with_ignore_case(value, "WIFI:") {
            return ValueType::Wifi;
        }
        if starts_with_ignore_case(value, "geo:") {
            return ValueType::Geo;
        }
        if starts_with_ignore_case(value, "BEGIN:VCARD") || starts_with_ignore_case(value, "MECARD:")
        {
            return ValueType::ContactInfo;
        }
        if starts_with_ignore_case(value, "BEGIN:VEVENT")
            || starts_with_ignore_case(value, "BEGIN:VCALENDAR")
        {
            return ValueType::CalendarEvent;
        }

        if value.chars().all(|c| c.is_ascii_digit()) {
            if value.len() == 13 && (value.starts_with("978") || value.starts_with("979")) {
                return ValueType::Isbn;
            }
            if matches!(value.len(), 8 | 12 | 13) {
                return ValueType::Product;
            }
        }

        if PHONE_PATTERN.is_match(value) {
            let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
            if (7..=15).contains(&digits) {
                return ValueType::Phone;
            }
        }

        ValueType::Text
    }

    /// Returns the wire name, e.g. `URL`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::ContactInfo => "CONTACT_INFO",
            ValueType::Email => "EMAIL",
            ValueType::Isbn => "ISBN",
            ValueType::Phone => "PHONE",
            ValueType::Product => "PRODUCT",
            ValueType::Sms => "SMS",
            ValueType::Text => "TEXT",
            ValueType::Url => "URL",
            ValueType::Wifi => "WIFI",
            ValueType::Geo => "GEO",
            ValueType::CalendarEvent => "CALENDAR_EVENT",
            ValueType::DriverLicense => "DRIVER_LICENSE",
            ValueType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable text for a raw payload of the given type.
///
/// Strips the `tel:` / `mailto:` scheme so the dialer and share actions get
/// the bare number or address.
pub fn display_value_for(raw: &str, value_type: ValueType) -> String {
    let value = raw.trim();
    let prefix = match value_type {
        ValueType::Phone => Some("tel:"),
        ValueType::Email => Some("mailto:"),
        _ => None,
    };

    match prefix {
        Some(prefix) if starts_with_ignore_case(value, prefix) => {
            value[prefix.len()..].trim().to_string()
        }
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_table() {
        let cases = [
            ("https://example.com/a?b=c", ValueType::Url),
            ("HTTP://EXAMPLE.COM", ValueType::Url),
            ("tel:+49 170 1234567", ValueType::Phone),
            ("+49 (170) 123-4567", ValueType::Phone),
            ("mailto:someone@example.com", ValueType::Email),
            ("MATMSG:TO:a@b.c;SUB:hi;;", ValueType::Email),
            ("SMSTO:+123456789:hello", ValueType::Sms),
            ("WIFI:S:home;T:WPA;P:secret;;", ValueType::Wifi),
            ("geo:52.52,13.40", ValueType::Geo),
            ("BEGIN:VCARD\nFN:Someone\nEND:VCARD", ValueType::ContactInfo),
            ("BEGIN:VEVENT\nSUMMARY:x\nEND:VEVENT", ValueType::CalendarEvent),
            ("9783161484100", ValueType::Isbn),
            ("4006381333931", ValueType::Product),
            ("96385074", ValueType::Product),
            ("hello world", ValueType::Text),
            ("12345", ValueType::Text),
            ("   ", ValueType::Unknown),
        ];

        for (raw, expected) in cases {
            assert_eq!(ValueType::classify(raw), expected, "payload: {:?}", raw);
        }
    }

    #[test]
    fn test_display_value_strips_scheme() {
        assert_eq!(
            display_value_for(" tel:+491701234567 ", ValueType::Phone),
            "+491701234567"
        );
        assert_eq!(
            display_value_for("MAILTO:a@b.c", ValueType::Email),
            "a@b.c"
        );
        assert_eq!(
            display_value_for("https://example.com", ValueType::Url),
            "https://example.com"
        );
        assert_eq!(display_value_for("+4917012", ValueType::Phone), "+4917012");
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&ValueType::Url).unwrap(), "\"URL\"");
        assert_eq!(
            serde_json::to_string(&ValueType::ContactInfo).unwrap(),
            "\"CONTACT_INFO\""
        );
        let value_type: ValueType = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(value_type, ValueType::Unknown);
    }
}
