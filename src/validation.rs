use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub product: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub message: String,
}

impl RentalRequest {
    /// Text inputs arrive with surrounding whitespace; select and date
    /// values do not.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            product: self.product.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            message: self.message.trim().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ValidRental {
    pub request: RentalRequest,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ValidRental {
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields!")]
    MissingFields,
    #[error("Invalid email format!")]
    InvalidEmail,
    #[error("Invalid phone number! It must be 10-15 digits.")]
    InvalidPhone,
    #[error("Please pick valid rental dates.")]
    InvalidDate,
    #[error("The start date cannot be in the past!")]
    StartInPast,
    #[error("The end date must be after the start date!")]
    EndNotAfterStart,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidPhone => "invalid_phone",
            Self::InvalidDate => "invalid_date",
            Self::StartInPast => "start_in_past",
            Self::EndNotAfterStart => "end_not_after_start",
        }
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9+\-\s]{10,15}$").expect("phone pattern compiles"))
}

pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    phone_pattern().is_match(value)
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Checks run in a fixed order and the first failure wins.
pub fn validate_rental(request: &RentalRequest, today: NaiveDate) -> Result<ValidRental, ValidationError> {
    let request = request.trimmed();

    let required = [
        &request.name,
        &request.email,
        &request.phone,
        &request.product,
        &request.start_date,
        &request.end_date,
    ];
    if required.iter().any(|value| value.is_empty()) {
        return Err(ValidationError::MissingFields);
    }

    if !is_valid_email(&request.email) {
        return Err(ValidationError::InvalidEmail);
    }

    if !is_valid_phone(&request.phone) {
        return Err(ValidationError::InvalidPhone);
    }

    let (Some(start), Some(end)) = (parse_date(&request.start_date), parse_date(&request.end_date)) else {
        return Err(ValidationError::InvalidDate);
    };

    if start < today {
        return Err(ValidationError::StartInPast);
    }

    if end <= start {
        return Err(ValidationError::EndNotAfterStart);
    }

    Ok(ValidRental { request, start, end })
}

/// The earliest end date the picker should offer once `start_date` is set.
pub fn end_date_min(start_date: &str, today: NaiveDate) -> String {
    match parse_date(start_date) {
        Some(start) => format_date(start),
        None => format_date(today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 5).expect("valid date")
    }

    fn request() -> RentalRequest {
        RentalRequest {
            name: "Ada".to_string(),
            email: "ada@x.com".to_string(),
            phone: "0812345678901".to_string(),
            product: "Camera".to_string(),
            start_date: "2025-01-10".to_string(),
            end_date: "2025-01-12".to_string(),
            message: String::new(),
        }
    }

    #[test]
    fn well_formed_request_passes() {
        let valid = validate_rental(&request(), today()).expect("request should validate");

        assert_eq!(valid.nights(), 2);
        assert_eq!(valid.request.name, "Ada");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let mut padded = request();
        padded.name = "  Ada ".to_string();
        padded.email = " ada@x.com ".to_string();

        let valid = validate_rental(&padded, today()).expect("request should validate");
        assert_eq!(valid.request.name, "Ada");
        assert_eq!(valid.request.email, "ada@x.com");
    }

    #[test]
    fn missing_required_field_is_rejected_first() {
        let mut incomplete = request();
        incomplete.product.clear();
        incomplete.email = "not-an-email".to_string();

        assert_eq!(
            validate_rental(&incomplete, today()),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn message_is_optional() {
        let mut with_note = request();
        with_note.message = "   ".to_string();

        assert!(validate_rental(&with_note, today()).is_ok());
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut bad = request();
        bad.email = "not-an-email".to_string();

        assert_eq!(validate_rental(&bad, today()), Err(ValidationError::InvalidEmail));
        assert!(!is_valid_email("a b@x.com"));
        assert!(!is_valid_email("a@x"));
        assert!(is_valid_email("a@x.co"));
    }

    #[test]
    fn phone_must_be_ten_to_fifteen_allowed_characters() {
        assert!(is_valid_phone("0812345678"));
        assert!(is_valid_phone("+62-812-3456-78"));
        assert!(!is_valid_phone("081234567"));
        assert!(!is_valid_phone("0812345678901234"));
        assert!(!is_valid_phone("08123abc5678"));

        let mut bad = request();
        bad.phone = "12345".to_string();
        assert_eq!(validate_rental(&bad, today()), Err(ValidationError::InvalidPhone));
    }

    #[test]
    fn unparseable_date_is_rejected() {
        let mut bad = request();
        bad.start_date = "10/01/2025".to_string();

        assert_eq!(validate_rental(&bad, today()), Err(ValidationError::InvalidDate));
    }

    #[test]
    fn start_in_past_is_rejected() {
        let mut bad = request();
        bad.start_date = "2025-01-04".to_string();

        assert_eq!(validate_rental(&bad, today()), Err(ValidationError::StartInPast));

        bad.start_date = "2025-01-05".to_string();
        assert!(validate_rental(&bad, today()).is_ok());
    }

    #[test]
    fn end_must_follow_start() {
        let mut same_day = request();
        same_day.end_date = same_day.start_date.clone();
        assert_eq!(
            validate_rental(&same_day, today()),
            Err(ValidationError::EndNotAfterStart)
        );

        let mut reversed = request();
        reversed.end_date = "2025-01-09".to_string();
        assert_eq!(
            validate_rental(&reversed, today()),
            Err(ValidationError::EndNotAfterStart)
        );
    }

    #[test]
    fn end_minimum_tracks_start_date() {
        assert_eq!(end_date_min("2025-02-01", today()), "2025-02-01");
        assert_eq!(end_date_min("", today()), "2025-01-05");
    }

    #[test]
    fn wire_names_are_camel_case() {
        let encoded = serde_json::to_value(request()).expect("serializes");

        assert_eq!(encoded["startDate"], "2025-01-10");
        assert_eq!(encoded["endDate"], "2025-01-12");

        let decoded: RentalRequest = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "email": "ada@x.com",
            "phone": "0812345678901",
            "product": "Camera",
            "startDate": "2025-01-10",
            "endDate": "2025-01-12"
        }))
        .expect("message defaults to empty");
        assert_eq!(decoded.message, "");
    }
}
