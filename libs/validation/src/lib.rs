//! Field-level validation primitives shared by the domain services.
//!
//! Each entity validates with an explicit function that collects every
//! violation into a structured list, so callers can surface all field
//! errors at once instead of failing on the first.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// A single violated constraint on a named field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Accumulates field errors across a sequence of checks.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an arbitrary violation.
    pub fn add(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors.push(FieldError::new(field, message));
        self
    }

    /// Non-blank after trimming.
    pub fn presence(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.add(field, "can't be blank");
        }
        self
    }

    /// Character count must not exceed `max`.
    pub fn length_max(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        if value.chars().count() > max {
            self.add(field, format!("is too long (maximum is {max} characters)"));
        }
        self
    }

    /// Character count must fall within `min..=max`.
    pub fn length_range(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.chars().count();
        if len < min {
            self.add(field, format!("is too short (minimum is {min} characters)"));
        } else if len > max {
            self.add(field, format!("is too long (maximum is {max} characters)"));
        }
        self
    }

    /// Value must match `re` entirely.
    pub fn format(&mut self, field: &str, value: &str, re: &Regex) -> &mut Self {
        if !re.is_match(value) {
            self.add(field, "is invalid");
        }
        self
    }

    /// Two submissions of the same secret must agree.
    pub fn confirmation(&mut self, field: &str, value: &str, confirmation: &str) -> &mut Self {
        if value != confirmation {
            self.add(field, "doesn't match confirmation");
        }
        self
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consume the validator: Ok when every check passed.
    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Email shape accepted at signup: local part of word chars, `+`, `-`,
/// `.`; domain labels of letters/digits/`-`/`.` with an alphabetic TLD.
/// Matching is case-insensitive.
pub fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^[\w+\-.]+@[a-z\d\-.]+\.[a-z]+$").expect("email regex must compile")
    })
}
