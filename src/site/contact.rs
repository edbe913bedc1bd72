// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form validation.
//!
//! Validation reports every failing field at once and keeps nothing between
//! attempts, so a corrected form can simply be submitted again.

use crate::i18n::{Args, Translator};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

pub const MESSAGE_MAX_CHARS: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Message,
}

impl ContactField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Message => "message",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("name is required")]
    MissingName,
    #[error("email is required")]
    MissingEmail,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("message is required")]
    MissingMessage,
    #[error("message is longer than {max} characters")]
    MessageTooLong { max: usize },
}

impl ContactError {
    pub fn field(&self) -> ContactField {
        match self {
            ContactError::MissingName => ContactField::Name,
            ContactError::MissingEmail | ContactError::InvalidEmail(_) => ContactField::Email,
            ContactError::MissingMessage | ContactError::MessageTooLong { .. } => {
                ContactField::Message
            }
        }
    }

    /// Translation key of the field-level message.
    pub fn message_key(&self) -> &'static str {
        match self {
            ContactError::MissingName => "contact.errors.nameRequired",
            ContactError::MissingEmail => "contact.errors.emailRequired",
            ContactError::InvalidEmail(_) => "contact.errors.emailInvalid",
            ContactError::MissingMessage => "contact.errors.messageRequired",
            ContactError::MessageTooLong { .. } => "contact.errors.messageTooLong",
        }
    }

    pub fn localized(&self, translator: &Translator) -> String {
        let args = match self {
            ContactError::MessageTooLong { max } => Args::new().with("max", max),
            _ => Args::new(),
        };
        translator.t_with(self.message_key(), &args)
    }
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("email pattern is valid")
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// A form that passed validation, with surrounding whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    /// All field errors, in form order. Empty when the form is valid.
    pub fn validate(&self) -> Vec<ContactError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(ContactError::MissingName);
        }
        let email = self.email.trim();
        if email.is_empty() {
            errors.push(ContactError::MissingEmail);
        } else if !email_re().is_match(email) {
            errors.push(ContactError::InvalidEmail(email.to_string()));
        }
        let message = self.message.trim();
        if message.is_empty() {
            errors.push(ContactError::MissingMessage);
        } else if message.chars().count() > MESSAGE_MAX_CHARS {
            errors.push(ContactError::MessageTooLong {
                max: MESSAGE_MAX_CHARS,
            });
        }
        errors
    }

    pub fn submit(&self) -> Result<ContactSubmission, Vec<ContactError>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ContactSubmission {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        })
    }
}
