//! Wire and domain types shared by the extractor and the relay.
//!
//! `ProfileRecord` doubles as the extractor's output and the relay's
//! `targetProfile` input, so the validation bounds enforced at the HTTP
//! boundary live directly on it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// A scraped profile. All fields except `name` default to empty; a record
/// with an empty `name` never leaves a successful extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProfileRecord {
    #[validate(length(min = 1, max = 200, message = "name is required (1-200 characters)"))]
    pub name: String,
    #[validate(length(max = 500))]
    pub headline: String,
    #[validate(length(max = 200))]
    pub company: String,
    #[validate(length(max = 200))]
    pub location: String,
    #[validate(length(max = 5000))]
    pub about: String,
    #[validate(length(max = 20), nested)]
    pub experience: Vec<ExperienceEntry>,
    #[validate(length(max = 10), nested)]
    pub education: Vec<EducationEntry>,
    #[validate(length(max = 50), custom(function = items_max_100))]
    pub skills: Vec<String>,
    #[validate(length(max = 20), nested)]
    pub certifications: Vec<Certification>,
    #[validate(length(max = 20), nested)]
    pub projects: Vec<Project>,
    #[validate(length(max = 10), nested)]
    pub recommendations: Vec<Recommendation>,
    #[validate(length(max = 30), custom(function = items_max_200))]
    pub interests: Vec<String>,
    #[validate(length(max = 15), nested)]
    pub languages: Vec<LanguageEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ExperienceEntry {
    #[validate(length(max = 200))]
    pub title: String,
    #[validate(length(max = 200))]
    pub company: String,
    #[validate(length(max = 200))]
    pub duration: String,
    #[validate(length(max = 2000))]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EducationEntry {
    #[validate(length(max = 200))]
    pub school: String,
    #[validate(length(max = 200))]
    pub degree: String,
    #[validate(length(max = 200))]
    pub field: String,
    #[validate(length(max = 200))]
    pub duration: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Certification {
    #[validate(length(max = 200))]
    pub name: String,
    #[validate(length(max = 200))]
    pub issuer: String,
    #[validate(length(max = 100))]
    pub date: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Project {
    #[validate(length(max = 200))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: String,
    #[validate(length(max = 100))]
    pub date: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Recommendation {
    #[validate(length(max = 1000))]
    pub text: String,
    #[validate(length(max = 200))]
    pub author: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LanguageEntry {
    #[validate(length(max = 100))]
    pub language: String,
    #[validate(length(max = 100))]
    pub proficiency: String,
}

/// The sender's own profile, supplied from the caller's durable settings.
/// Read-only here; template filling proceeds without it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SenderProfile {
    #[validate(length(max = 200))]
    pub name: String,
    #[validate(length(max = 200))]
    pub email: String,
    #[validate(length(max = 300))]
    pub current_role: String,
    #[validate(length(max = 200))]
    pub status: String,
    #[validate(length(max = 50))]
    pub graduation_date: String,
    #[validate(length(max = 500))]
    pub looking_for: String,
    #[validate(length(max = 20), custom(function = items_max_100))]
    pub top_skills: Vec<String>,
    #[validate(length(max = 10), custom(function = items_max_500))]
    pub key_projects: Vec<String>,
    #[validate(length(max = 10), custom(function = items_max_300))]
    pub recent_experience: Vec<String>,
    #[validate(length(max = 300))]
    pub education: String,
    #[validate(length(max = 10), custom(function = items_max_500))]
    pub value_props: Vec<String>,
}

/// Request body for `POST /api/customize-message`.
///
/// Every field carries a serde default so shape problems surface as
/// itemized validation details instead of opaque deserialization errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomizeRequest {
    #[validate(nested)]
    pub target_profile: ProfileRecord,
    #[validate(nested)]
    pub user_profile: Option<SenderProfile>,
    #[validate(length(min = 50, max = 5000, message = "template must be 50-5000 characters"))]
    pub template: String,
}

/// Success body for `POST /api/customize-message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizeResponse {
    pub success: bool,
    pub customized_message: String,
    pub profile_name: String,
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deduplicated: Option<bool>,
    pub timestamp: DateTime<Utc>,
}

fn items_max(items: &[String], max: usize, code: &'static str) -> Result<(), ValidationError> {
    if items.iter().any(|item| item.chars().count() > max) {
        let mut err = ValidationError::new(code);
        err.message = Some(format!("items must be at most {max} characters").into());
        return Err(err);
    }
    Ok(())
}

fn items_max_100(items: &[String]) -> Result<(), ValidationError> {
    items_max(items, 100, "item_length")
}

fn items_max_200(items: &[String]) -> Result<(), ValidationError> {
    items_max(items, 200, "item_length")
}

fn items_max_300(items: &[String]) -> Result<(), ValidationError> {
    items_max(items, 300, "item_length")
}

fn items_max_500(items: &[String]) -> Result<(), ValidationError> {
    items_max(items, 500, "item_length")
}

fn camelize(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for ch in field.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

fn push_details(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let field = camelize(field.as_ref());
        let path = if prefix.is_empty() {
            field
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    let msg = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed {} validation", err.code));
                    out.push(format!("{path}: {msg}"));
                }
            }
            ValidationErrorsKind::Struct(inner) => push_details(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    push_details(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

/// Flatten a `ValidationErrors` tree into one human-readable line per
/// violation, with camelCase field paths matching the wire format.
pub fn validation_details(errors: &ValidationErrors) -> Vec<String> {
    let mut out = Vec::new();
    push_details("", errors, &mut out);
    out.sort();
    out
}
