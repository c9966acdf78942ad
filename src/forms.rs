//! Field validation shared by the HTML forms.
//!
//! Each form struct deserializes from an urlencoded body with every field
//! defaulting to empty, then runs its rules and collects messages per field.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

/// Validation messages keyed by field name.
#[derive(Debug, Default, Clone)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Rule set for a single field, evaluated in declaration order. A missing
/// value stops the chain like `InputRequired` would.
pub struct Field<'a> {
    name: &'static str,
    value: &'a str,
    errors: &'a mut FieldErrors,
    stopped: bool,
}

impl<'a> Field<'a> {
    pub fn new(errors: &'a mut FieldErrors, name: &'static str, value: &'a str) -> Self {
        Self {
            name,
            value,
            errors,
            stopped: false,
        }
    }

    pub fn required(mut self) -> Self {
        if self.value.is_empty() {
            self.errors.add(self.name, "This field is required.");
            self.stopped = true;
        }
        self
    }

    pub fn max_len(self, max: usize) -> Self {
        if !self.stopped && self.value.chars().count() > max {
            self.errors.add(
                self.name,
                format!("Field cannot be longer than {max} characters."),
            );
        }
        self
    }

    pub fn min_len(self, min: usize) -> Self {
        if !self.stopped && self.value.chars().count() < min {
            self.errors.add(
                self.name,
                format!("Field must be at least {min} characters long."),
            );
        }
        self
    }

    pub fn email(self) -> Self {
        if !self.stopped && !is_valid_email(self.value) {
            self.errors.add(self.name, "Invalid email address.");
        }
        self
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}
