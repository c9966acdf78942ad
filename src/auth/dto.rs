use serde::Deserialize;

use crate::forms::{Field, FieldErrors};

/// Login form body.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        Field::new(&mut errors, "username", &self.username)
            .required()
            .max_len(20);
        Field::new(&mut errors, "password", &self.password)
            .required()
            .min_len(6);
        errors.into_result()
    }
}

/// Registration form body.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        Field::new(&mut errors, "username", &self.username)
            .required()
            .max_len(20);
        Field::new(&mut errors, "password", &self.password)
            .required()
            .min_len(6);
        Field::new(&mut errors, "email", &self.email)
            .required()
            .email()
            .max_len(50);
        Field::new(&mut errors, "first_name", &self.first_name)
            .required()
            .max_len(30);
        Field::new(&mut errors, "last_name", &self.last_name)
            .required()
            .max_len(30);
        errors.into_result()
    }
}
