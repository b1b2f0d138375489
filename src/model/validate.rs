//! Form validation run before a request leaves the client. The backend
//! repeats these checks; this is only the first line.

use std::collections::BTreeMap;

use thiserror::Error;
use url::Url;

use crate::model::entity::{
    CourseInput, LoginInput, PasswordChangeInput, ProfileUpdateInput, RegisterInput,
};

const MIN_PASSWORD: usize = 6;
const ROLES: [&str; 3] = ["student", "instructor", "admin"];

/// Field-level validation failures, keyed by field path (`videos.0.url`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed: {}", self.summary())]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F: Into<String>, M: Into<String>>(&mut self, field: F, message: M) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// First message of every field, joined for display.
    pub fn summary(&self) -> String {
        self.fields
            .values()
            .filter_map(|messages| messages.first())
            .cloned()
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    fn min_len(&mut self, field: &str, value: &str, min: usize, message: &str) {
        if value.trim().chars().count() < min {
            self.add(field, message);
        }
    }

    fn email(&mut self, field: &str, value: &str) {
        if !is_email(value) {
            self.add(field, "Please enter a valid email address");
        }
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

impl Validate for LoginInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.email("email", &self.email);
        if self.password.chars().count() < MIN_PASSWORD {
            errors.add("password", "Password must be at least 6 characters");
        }
        errors.into_result()
    }
}

impl Validate for RegisterInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.min_len("name", &self.name, 2, "Name must be at least 2 characters");
        errors.email("email", &self.email);
        if self.password.chars().count() < MIN_PASSWORD {
            errors.add("password", "Password must be at least 6 characters");
        }

        if !ROLES.contains(&self.role.as_str()) {
            errors.add("role", "Please select a valid role");
        } else if self.role == "admin"
            && self.secret.as_deref().is_none_or(|s| s.is_empty())
        {
            errors.add("secret", "Admin secret is required for admin registration");
        }
        errors.into_result()
    }
}

impl Validate for ProfileUpdateInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.min_len("name", &self.name, 2, "Name must be at least 2 characters");
        errors.email("email", &self.email);
        errors.into_result()
    }
}

impl Validate for PasswordChangeInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.current_password.is_empty() {
            errors.add("currentPassword", "Current password is required");
        }
        if self.new_password.chars().count() < MIN_PASSWORD {
            errors.add("newPassword", "Password must be at least 6 characters");
        }
        errors.into_result()
    }
}

impl Validate for CourseInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.min_len("title", &self.title, 3, "Title must be at least 3 characters");
        errors.min_len(
            "description",
            &self.description,
            10,
            "Description must be at least 10 characters",
        );

        if self.videos.is_empty() {
            errors.add("videos", "At least one video is required");
        }

        for (i, video) in self.videos.iter().enumerate() {
            errors.min_len(
                &format!("videos.{i}.title"),
                &video.title,
                3,
                "Video title must be at least 3 characters",
            );
            if Url::parse(&video.url).is_err() {
                errors.add(format!("videos.{i}.url"), "Please enter a valid URL");
            }
        }
        errors.into_result()
    }
}

/// Public certificate id typed by a visitor.
pub fn validate_certificate_id(certificate_id: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if certificate_id.trim().is_empty() {
        errors.add("certificateId", "Certificate ID is required");
    }
    errors.into_result()
}
