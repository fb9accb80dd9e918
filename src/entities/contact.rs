use serde::{Deserialize, Serialize};

use crate::entities::validation::FieldError;

/// Contact section of the booking form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub special_requests: Option<String>,
}

impl ContactDetails {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(FieldError::new("name", "enter your name"));
        } else if name.chars().count() > 100 {
            errors.push(FieldError::new("name", "name must be at most 100 characters"));
        }

        if !is_valid_email(self.email.trim()) {
            errors.push(FieldError::new("email", "enter a valid email address"));
        }

        if normalized_phone(&self.phone).is_none() {
            errors.push(FieldError::new("phone", "enter a phone number of 10 to 15 digits"));
        }

        errors
    }

    /// Phone number with separators stripped, as sent to the backend.
    pub fn phone_digits(&self) -> String {
        normalized_phone(&self.phone).unwrap_or_else(|| self.phone.trim().to_string())
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !email.contains(char::is_whitespace)
        && !domain.contains('@')
        && domain
            .rsplit_once('.')
            .map(|(host, tld)| !host.is_empty() && tld.len() >= 2)
            .unwrap_or(false)
}

fn normalized_phone(phone: &str) -> Option<String> {
    let trimmed = phone.trim();
    let (prefix, rest) = match trimmed.strip_prefix('+') {
        Some(rest) => ("+", rest),
        None => ("", trimmed),
    };

    if !rest
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
    {
        return None;
    }

    let digits: String = rest.chars().filter(char::is_ascii_digit).collect();

    if (10..=15).contains(&digits.len()) {
        Some(format!("{}{}", prefix, digits))
    } else {
        None
    }
}
