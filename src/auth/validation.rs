use lazy_static::lazy_static;
use regex::Regex;

use crate::auth::dto::{SignInRequest, SignUpRequest};
use crate::error::{AppError, FieldError};

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 120;
const EMAIL_MAX: usize = 190;
const PASSWORD_MIN: usize = 6;
const PASSWORD_MAX: usize = 72;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Canonical stored form of an email. Lengths are checked on this, since lowercasing can add chars.
pub(crate) fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn check_name(name: &str, errors: &mut Vec<FieldError>) {
    let len = name.chars().count();
    if name.trim().is_empty() {
        errors.push(FieldError::new("name", "must not be blank"));
    } else if !(NAME_MIN..=NAME_MAX).contains(&len) {
        errors.push(FieldError::new("name", "must be between 2 and 120 characters"));
    }
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    let normalized = normalize_email(email);
    if normalized.is_empty() {
        errors.push(FieldError::new("email", "must not be blank"));
    } else if normalized.chars().count() > EMAIL_MAX {
        errors.push(FieldError::new("email", "must be at most 190 characters"));
    } else if !is_valid_email(&normalized) {
        errors.push(FieldError::new("email", "must be a valid email address"));
    }
}

fn check_password(password: &str, errors: &mut Vec<FieldError>) {
    let len = password.chars().count();
    if password.trim().is_empty() {
        errors.push(FieldError::new("password", "must not be blank"));
    } else if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        errors.push(FieldError::new("password", "must be between 6 and 72 characters"));
    }
}

fn finish(errors: Vec<FieldError>) -> Result<(), AppError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

pub fn validate_sign_up(req: &SignUpRequest) -> Result<(), AppError> {
    let mut errors = Vec::new();
    check_name(&req.name, &mut errors);
    check_email(&req.email, &mut errors);
    check_password(&req.password, &mut errors);
    finish(errors)
}

pub fn validate_sign_in(req: &SignInRequest) -> Result<(), AppError> {
    let mut errors = Vec::new();
    check_email(&req.email, &mut errors);
    check_password(&req.password, &mut errors);
    finish(errors)
}
