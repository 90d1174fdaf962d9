//! Payload validation for the submission forms.
//!
//! Each insert record has a [`Schema`] impl that reads a raw JSON payload and
//! either produces the typed record or reports every field that is wrong.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::{NewContactSubmission, NewEmailSubscription, NewUser, NewVolunteerSignup};
use crate::models::{Answer, Flag};

/// Upper bound on any single string field, in characters.
pub const MAX_FIELD_LEN: usize = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Payload key the error refers to. Empty for the payload itself.
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid form data: {} field error(s)", .errors.len())]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                field: field.into(),
                message: message.into(),
            }],
        }
    }

    /// Names of the offending fields, in the order they were checked.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field.as_str())
    }
}

pub trait Schema: Sized {
    fn validate(payload: &Value) -> Result<Self, ValidationError>;
}

impl Schema for NewUser {
    fn validate(payload: &Value) -> Result<Self, ValidationError> {
        let mut fields = Fields::new(payload);
        let username = fields.required("username");
        let password = fields.required("password");
        fields.finish()?;

        Ok(Self { username, password })
    }
}

impl Schema for NewContactSubmission {
    fn validate(payload: &Value) -> Result<Self, ValidationError> {
        let mut fields = Fields::new(payload);
        let name = fields.required("name");
        let email = fields.email("email");
        let interest = fields.required("interest");
        let message = fields.required("message");
        fields.finish()?;

        Ok(Self {
            name,
            email,
            interest: Some(interest),
            message,
        })
    }
}

impl Schema for NewEmailSubscription {
    fn validate(payload: &Value) -> Result<Self, ValidationError> {
        let mut fields = Fields::new(payload);
        let email = fields.email("email");
        let first_name = fields.optional("firstName");
        let interested_in_analytics = fields.choice::<Flag>("interestedInAnalytics");
        let interested_in_rise = fields.choice::<Flag>("interestedInRise");
        fields.finish()?;

        Ok(Self {
            email,
            first_name,
            interested_in_analytics,
            interested_in_rise,
        })
    }
}

impl Schema for NewVolunteerSignup {
    fn validate(payload: &Value) -> Result<Self, ValidationError> {
        let mut fields = Fields::new(payload);
        let full_name = fields.required("fullName");
        let email = fields.email("email");
        let phone_number = fields.optional("phoneNumber");
        let availability = fields.required("availability");
        let why_interested = fields.required("whyInterested");
        let experience_with_children = fields.required("experienceWithChildren");
        let is_over18 = fields.required_choice::<Answer>("isOver18");
        let agrees_background_check = fields.choice::<Flag>("agreesBackgroundCheck");
        fields.finish()?;

        let is_over18 = is_over18.ok_or_else(|| ValidationError::single("isOver18", "Required"))?;

        Ok(Self {
            full_name,
            email,
            phone_number,
            availability,
            why_interested,
            experience_with_children,
            is_over18,
            agrees_background_check,
        })
    }
}

enum Raw {
    Missing,
    Invalid,
    Present(String),
}

/// Reads fields out of a JSON object, collecting errors instead of stopping at
/// the first one. Values handed back for invalid fields are placeholders and
/// are discarded by [`Fields::finish`].
struct Fields<'a> {
    object: Option<&'a Map<String, Value>>,
    errors: Vec<FieldError>,
}

impl<'a> Fields<'a> {
    fn new(payload: &'a Value) -> Self {
        let mut fields = Self {
            object: payload.as_object(),
            errors: Vec::new(),
        };
        if fields.object.is_none() {
            fields.error("", format!("Expected object, received {}", type_name(payload)));
        }
        fields
    }

    fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Null and blank strings count as missing.
    fn raw(&mut self, field: &str) -> Raw {
        let Some(object) = self.object else {
            return Raw::Invalid;
        };

        match object.get(field) {
            None | Some(Value::Null) => Raw::Missing,
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Raw::Missing
                } else if trimmed.chars().count() > MAX_FIELD_LEN {
                    self.error(
                        field,
                        format!("String must contain at most {} character(s)", MAX_FIELD_LEN),
                    );
                    Raw::Invalid
                } else {
                    Raw::Present(trimmed.to_string())
                }
            }
            Some(other) => {
                self.error(field, format!("Expected string, received {}", type_name(other)));
                Raw::Invalid
            }
        }
    }

    fn required(&mut self, field: &str) -> String {
        match self.raw(field) {
            Raw::Present(value) => value,
            Raw::Missing => {
                self.error(field, "Required");
                String::new()
            }
            Raw::Invalid => String::new(),
        }
    }

    fn optional(&mut self, field: &str) -> Option<String> {
        match self.raw(field) {
            Raw::Present(value) => Some(value),
            Raw::Missing | Raw::Invalid => None,
        }
    }

    fn email(&mut self, field: &str) -> String {
        let value = self.required(field);
        if !value.is_empty() && !looks_like_email(&value) {
            self.error(field, "Invalid email");
        }
        value
    }

    fn choice<T>(&mut self, field: &str) -> Option<T>
    where
        T: FromStr<Err = String>,
    {
        match self.raw(field) {
            Raw::Present(value) => match value.parse() {
                Ok(parsed) => Some(parsed),
                Err(message) => {
                    self.error(field, message);
                    None
                }
            },
            Raw::Missing | Raw::Invalid => None,
        }
    }

    fn required_choice<T>(&mut self, field: &str) -> Option<T>
    where
        T: FromStr<Err = String>,
    {
        if matches!(self.object.and_then(|o| o.get(field)), None | Some(Value::Null)) {
            if self.object.is_some() {
                self.error(field, "Required");
            }
            return None;
        }
        let value = self.choice(field);
        if value.is_none() && !self.errors.iter().any(|e| e.field == field) {
            // blank string
            self.error(field, "Required");
        }
        value
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                errors: self.errors,
            })
        }
    }
}

fn looks_like_email(value: &str) -> bool {
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

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
