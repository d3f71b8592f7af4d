use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Per-field validation messages, keyed by form field name.
#[derive(Debug, Default, Clone)]
pub struct FieldErrors {
    errors: BTreeMap<&'static str, String>,
}

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Default, Clone)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();

        let email = self.email.trim();
        if email.is_empty() {
            errors.push("email", "This field is required.");
        } else if !is_valid_email(email) {
            errors.push("email", "Invalid email address.");
        }

        if self.password.is_empty() {
            errors.push("password", "This field is required.");
        } else if self.password.len() < MIN_PASSWORD_LEN {
            errors.push(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters long."),
            );
        }

        if self.confirm_password.is_empty() {
            errors.push("confirm_password", "This field is required.");
        } else if self.confirm_password != self.password {
            errors.push("confirm_password", "Passwords must match.");
        }

        errors
    }
}

/// Raw student form values as submitted, kept as strings so the form can be
/// re-rendered exactly as the admin typed it.
#[derive(Debug, Default, Clone)]
pub struct StudentFormData {
    pub name: String,
    pub age: String,
    pub roll_number: String,
    pub grade: String,
    pub email: String,
    pub password: String,
}

impl StudentFormData {
    pub fn from_fields(fields: &HashMap<String, Vec<String>>) -> Self {
        let text = |name: &str| {
            fields
                .get(name)
                .and_then(|values| values.first())
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };

        Self {
            name: text("name"),
            age: text("age"),
            roll_number: text("roll_number"),
            grade: text("grade"),
            email: text("email"),
            password: fields
                .get("password")
                .and_then(|values| values.first())
                .cloned()
                .unwrap_or_default(),
        }
    }

    pub fn validate(&self, password_required: bool) -> FieldErrors {
        let mut errors = FieldErrors::default();

        if self.name.is_empty() {
            errors.push("name", "This field is required.");
        }

        if self.age.is_empty() {
            errors.push("age", "This field is required.");
        } else if self.age_value().is_none() {
            errors.push("age", "Not a valid integer value.");
        }

        if self.roll_number.is_empty() {
            errors.push("roll_number", "This field is required.");
        }

        if self.grade.is_empty() {
            errors.push("grade", "This field is required.");
        }

        if self.email.is_empty() {
            errors.push("email", "This field is required.");
        } else if !is_valid_email(&self.email) {
            errors.push("email", "Invalid email address.");
        }

        if self.password.is_empty() {
            if password_required {
                errors.push("password", "This field is required.");
            }
        } else if self.password.len() < MIN_PASSWORD_LEN {
            errors.push(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters long."),
            );
        }

        errors
    }

    pub fn age_value(&self) -> Option<i32> {
        self.age.parse().ok()
    }
}

#[derive(Deserialize, Default, Clone)]
pub struct MarksForm {
    pub subject: String,
    pub marks: String,
}

impl MarksForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();

        if self.subject.trim().is_empty() {
            errors.push("subject", "This field is required.");
        }

        if self.marks.trim().is_empty() {
            errors.push("marks", "This field is required.");
        } else if self.marks_value().is_none() {
            errors.push("marks", "Not a valid integer value.");
        }

        errors
    }

    pub fn marks_value(&self) -> Option<i32> {
        self.marks.trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("ann@x.com"));
        assert!(is_valid_email("first.last@school.example.org"));
        assert!(!is_valid_email("ann"));
        assert!(!is_valid_email("ann@x"));
        assert!(!is_valid_email("ann @x.com"));
    }

    #[test]
    fn register_rejects_short_password() {
        let form = RegisterForm {
            email: "admin@school.test".into(),
            password: "short".into(),
            confirm_password: "short".into(),
        };
        let errors = form.validate();
        assert!(errors.get("password").is_some());
        assert!(errors.get("email").is_none());
    }

    #[test]
    fn register_rejects_mismatched_confirmation() {
        let form = RegisterForm {
            email: "admin@school.test".into(),
            password: "secret1".into(),
            confirm_password: "secret2".into(),
        };
        let errors = form.validate();
        assert_eq!(errors.get("confirm_password"), Some("Passwords must match."));
    }

    #[test]
    fn register_accepts_valid_input() {
        let form = RegisterForm {
            email: "admin@school.test".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        };
        assert!(form.validate().is_empty());
    }

    #[test]
    fn student_form_requires_integer_age() {
        let mut fields = HashMap::new();
        for (name, value) in [
            ("name", "Ann"),
            ("age", "ten"),
            ("roll_number", "1"),
            ("grade", "5A"),
            ("email", "ann@x.com"),
            ("password", "secret1"),
        ] {
            fields.insert(name.to_string(), vec![value.to_string()]);
        }

        let form = StudentFormData::from_fields(&fields);
        let errors = form.validate(true);
        assert_eq!(errors.get("age"), Some("Not a valid integer value."));
    }

    #[test]
    fn student_form_password_optional_on_edit() {
        let form = StudentFormData {
            name: "Ann".into(),
            age: "10".into(),
            roll_number: "1".into(),
            grade: "5A".into(),
            email: "ann@x.com".into(),
            password: String::new(),
        };
        assert!(form.validate(false).is_empty());
        assert!(form.validate(true).get("password").is_some());
    }

    #[test]
    fn marks_form_parses_score() {
        let form = MarksForm {
            subject: "Math".into(),
            marks: "90".into(),
        };
        assert!(form.validate().is_empty());
        assert_eq!(form.marks_value(), Some(90));

        let bad = MarksForm {
            subject: "Math".into(),
            marks: "ninety".into(),
        };
        assert_eq!(bad.validate().get("marks"), Some("Not a valid integer value."));
    }
}
