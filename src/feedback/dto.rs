use serde::Deserialize;

use super::repo::{Feedback, FeedbackInput};
use crate::forms::{Field, FieldErrors};

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct FeedbackForm {
    pub title: String,
    pub content: String,
}

impl FeedbackForm {
    pub fn validate(&self) -> Result<FeedbackInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        Field::new(&mut errors, "title", &self.title)
            .required()
            .max_len(100);
        Field::new(&mut errors, "content", &self.content).required();
        errors.into_result()?;
        Ok(FeedbackInput {
            title: self.title.clone(),
            content: self.content.clone(),
        })
    }
}

impl From<&Feedback> for FeedbackForm {
    fn from(f: &Feedback) -> Self {
        Self {
            title: f.title.clone(),
            content: f.content.clone(),
        }
    }
}
