//! Field validation for inbound send requests.
//!
//! Fields are checked in a fixed order and the first failure wins. Every
//! outcome is a [`ValidationResult`]; nothing in here panics on odd input.

use std::collections::HashMap;
use std::fmt;

use crate::models::EmailRequest;

pub const MIN_EMAIL_LENGTH: usize = 3;
pub const MIN_NAME_LENGTH: usize = 2;
pub const MIN_SUBJECT_LENGTH: usize = 1;
pub const MIN_BODY_LENGTH: usize = 1;

/// Semantic type of a request field, selects the rule applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    ToEmail,
    FromEmail,
    ToName,
    FromName,
    Subject,
    Body,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::ToEmail => "ToEmail",
            FieldType::FromEmail => "FromEmail",
            FieldType::ToName => "ToName",
            FieldType::FromName => "FromName",
            FieldType::Subject => "Subject",
            FieldType::Body => "Body",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
}

/// Required fields, in the order they are validated.
pub const FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "to", field_type: FieldType::ToEmail },
    FieldSpec { name: "to_name", field_type: FieldType::ToName },
    FieldSpec { name: "from", field_type: FieldType::FromEmail },
    FieldSpec { name: "from_name", field_type: FieldType::FromName },
    FieldSpec { name: "subject", field_type: FieldType::Subject },
    FieldSpec { name: "body", field_type: FieldType::Body },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub reason: String,
}

impl ValidationResult {
    fn pass(reason: &str) -> Self {
        Self {
            valid: true,
            reason: reason.to_string(),
        }
    }

    fn fail(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: reason.into(),
        }
    }
}

type Rule = fn(Option<&str>) -> ValidationResult;

/// Walks [`FIELDS`] and applies the rule registered for each field type.
#[derive(Clone)]
pub struct Validator {
    fields: &'static [FieldSpec],
    rules: HashMap<FieldType, Rule>,
}

impl Default for Validator {
    fn default() -> Self {
        let rules: [(FieldType, Rule); 6] = [
            (FieldType::ToEmail, validate_to_email),
            (FieldType::FromEmail, validate_from_email),
            (FieldType::ToName, validate_to_name),
            (FieldType::FromName, validate_from_name),
            (FieldType::Subject, validate_subject),
            (FieldType::Body, validate_body),
        ];

        Self {
            fields: FIELDS,
            rules: rules.into_iter().collect(),
        }
    }
}

impl Validator {
    pub fn validate(&self, request: &EmailRequest) -> ValidationResult {
        for spec in self.fields {
            let result = match self.rules.get(&spec.field_type) {
                Some(rule) => rule(request.text(spec.name)),
                None => ValidationResult::fail(format!(
                    "{} validator not found.",
                    spec.field_type
                )),
            };

            if !result.valid {
                return result;
            }
        }

        ValidationResult::pass("Valid request.")
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn validate_to_email(value: Option<&str>) -> ValidationResult {
    match value {
        Some(email) => validate_email(email),
        None => ValidationResult::fail("To Email is a required field."),
    }
}

fn validate_from_email(value: Option<&str>) -> ValidationResult {
    match value {
        Some(email) => validate_email(email),
        None => ValidationResult::fail("From Email is a required field."),
    }
}

fn validate_email(email: &str) -> ValidationResult {
    if char_len(email) < MIN_EMAIL_LENGTH {
        return ValidationResult::fail("Email length is too short.");
    }
    if !email.contains('@') {
        return ValidationResult::fail("Email does not contain @ symbol.");
    }
    ValidationResult::pass("Valid Email.")
}

fn validate_to_name(value: Option<&str>) -> ValidationResult {
    match value {
        Some(name) => validate_name(name),
        None => ValidationResult::fail("To Name is a required field."),
    }
}

fn validate_from_name(value: Option<&str>) -> ValidationResult {
    match value {
        Some(name) => validate_name(name),
        None => ValidationResult::fail("From Name is a required field."),
    }
}

fn validate_name(name: &str) -> ValidationResult {
    if char_len(name) < MIN_NAME_LENGTH {
        return ValidationResult::fail("Name length is too short.");
    }
    ValidationResult::pass("Valid name.")
}

fn validate_subject(value: Option<&str>) -> ValidationResult {
    let Some(subject) = value else {
        return ValidationResult::fail("Subject is a required field.");
    };
    if char_len(subject) < MIN_SUBJECT_LENGTH {
        return ValidationResult::fail("Subject length is too short.");
    }
    ValidationResult::pass("Valid subject.")
}

fn validate_body(value: Option<&str>) -> ValidationResult {
    let Some(body) = value else {
        return ValidationResult::fail("Body is a required field.");
    };
    if char_len(body) < MIN_BODY_LENGTH {
        return ValidationResult::fail("Body length is too short.");
    }
    ValidationResult::pass("Valid body.")
}
