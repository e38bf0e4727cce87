//! Validation of user-submitted button definitions.
//!
//! A [`ButtonDraft`] holds the raw form input, with headers still as JSON
//! text. [`ButtonDraft::validate`] either yields a ready [`Button`] or every
//! field-level problem at once, so a caller can report them together.

use crate::model::templates::{DEFAULT_COLOR, DEFAULT_ICON, ICONS};
use crate::model::{Button, Headers, HttpMethod, Template, new_id, now_millis};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use url::Url;

lazy_static! {
    static ref HEX_COLOR: Regex = Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap();
}

/// Default headers text offered for new buttons
pub const DEFAULT_HEADERS: &str = "{\n  \"Content-Type\": \"application/json\"\n}";

/// Raw button input as submitted by the user
#[derive(Debug, Clone)]
pub struct ButtonDraft {
    pub name: String,
    pub color: String,
    pub icon: String,
    pub method: HttpMethod,
    pub url: String,
    pub headers: String,
    pub body: String,
    pub description: String,
}

impl Default for ButtonDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: DEFAULT_COLOR.to_string(),
            icon: DEFAULT_ICON.to_string(),
            method: HttpMethod::Get,
            url: String::new(),
            headers: DEFAULT_HEADERS.to_string(),
            body: String::new(),
            description: String::new(),
        }
    }
}

impl ButtonDraft {
    /// Check every field and build the button when all pass
    pub fn validate(&self) -> Result<Button, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.name.trim().is_empty() {
            errors.add("name", "Name is required");
        }

        if self.url.trim().is_empty() {
            errors.add("url", "URL is required");
        } else if Url::parse(self.url.trim()).is_err() {
            errors.add("url", "Invalid URL");
        }

        let headers = match parse_headers(&self.headers) {
            Some(headers) => headers,
            None => {
                errors.add("headers", "Headers must be a valid JSON object of strings");
                Headers::new()
            }
        };

        let body = non_empty(&self.body);
        if let Some(body) = &body
            && self.method.accepts_body()
            && serde_json::from_str::<Value>(body).is_err()
        {
            errors.add("body", "Body must be valid JSON");
        }

        if !HEX_COLOR.is_match(&self.color) {
            errors.add("color", "Color must be a hex value like #3B82F6");
        }

        if !ICONS.contains(&self.icon.as_str()) {
            errors.add("icon", "Unknown icon");
        }

        if !errors.is_empty() {
            tracing::debug!("Button draft rejected: {}", errors);
            return Err(errors);
        }

        Ok(Button {
            id: new_id("btn"),
            name: self.name.trim().to_string(),
            color: self.color.clone(),
            icon: self.icon.clone(),
            method: self.method,
            url: self.url.trim().to_string(),
            headers,
            body,
            description: non_empty(&self.description),
            created_at: now_millis(),
        })
    }
}

impl From<&Template> for ButtonDraft {
    fn from(template: &Template) -> Self {
        let headers: IndexMap<&str, &str> = template.headers.iter().copied().collect();
        Self {
            name: template.name.to_string(),
            color: DEFAULT_COLOR.to_string(),
            icon: DEFAULT_ICON.to_string(),
            method: template.method,
            url: template.url.to_string(),
            headers: serde_json::to_string_pretty(&headers).unwrap_or_else(|_| "{}".to_string()),
            body: template.body.clone().unwrap_or_default(),
            description: template.description.to_string(),
        }
    }
}

impl From<&Button> for ButtonDraft {
    fn from(button: &Button) -> Self {
        Self {
            name: button.name.clone(),
            color: button.color.clone(),
            icon: button.icon.clone(),
            method: button.method,
            url: button.url.clone(),
            headers: serde_json::to_string_pretty(&button.headers)
                .unwrap_or_else(|_| "{}".to_string()),
            body: button.body.clone().unwrap_or_default(),
            description: button.description.clone().unwrap_or_default(),
        }
    }
}

/// Field-level validation messages, in the order they were found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<(&'static str, &'static str)>,
}

impl ValidationErrors {
    fn add(&mut self, field: &'static str, message: &'static str) {
        self.fields.push((field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Message for a field, if it failed
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| *message)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.fields.iter().copied()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

fn parse_headers(text: &str) -> Option<Headers> {
    let value: Value = serde_json::from_str(text).ok()?;
    let object = value.as_object()?;

    let mut headers = Headers::new();
    for (name, value) in object {
        headers.insert(name.clone(), value.as_str()?.to_string());
    }
    Some(headers)
}

fn non_empty(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::templates;

    fn draft() -> ButtonDraft {
        ButtonDraft {
            name: "Users".to_string(),
            url: "https://jsonplaceholder.typicode.com/users".to_string(),
            ..ButtonDraft::default()
        }
    }

    #[test]
    fn test_valid_draft_builds_button() {
        let button = draft().validate().unwrap();
        assert!(button.id.starts_with("btn_"));
        assert_eq!(button.name, "Users");
        assert_eq!(button.headers.get("Content-Type").unwrap(), "application/json");
        assert!(button.body.is_none());
        assert!(button.description.is_none());
    }

    #[test]
    fn test_blank_name_and_url_are_required() {
        let errors = ButtonDraft::default().validate().unwrap_err();
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("url"), Some("URL is required"));
    }

    #[test]
    fn test_relative_url_is_invalid() {
        let mut d = draft();
        d.url = "/users".to_string();
        assert_eq!(d.validate().unwrap_err().get("url"), Some("Invalid URL"));
    }

    #[test]
    fn test_headers_must_be_object_of_strings() {
        for headers in ["not json", "[1, 2]", r#"{"X-Count": 3}"#] {
            let mut d = draft();
            d.headers = headers.to_string();
            let errors = d.validate().unwrap_err();
            assert!(errors.get("headers").is_some(), "{}", headers);
        }
    }

    #[test]
    fn test_headers_keep_entry_order() {
        let mut d = draft();
        d.headers = r#"{"X-B": "2", "X-A": "1"}"#.to_string();
        let button = d.validate().unwrap();
        let names: Vec<_> = button.headers.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["X-B", "X-A"]);
    }

    #[test]
    fn test_body_checked_only_for_write_methods() {
        let mut d = draft();
        d.body = "{broken".to_string();
        assert!(d.validate().is_ok(), "GET ignores the body");

        d.method = HttpMethod::Post;
        let errors = d.validate().unwrap_err();
        assert_eq!(errors.get("body"), Some("Body must be valid JSON"));
    }

    #[test]
    fn test_color_and_icon_are_checked() {
        let mut d = draft();
        d.color = "blue".to_string();
        d.icon = "Rocket".to_string();
        let errors = d.validate().unwrap_err();
        assert!(errors.get("color").is_some());
        assert_eq!(errors.get("icon"), Some("Unknown icon"));
    }

    #[test]
    fn test_template_draft_is_valid() {
        for template in templates::builtin() {
            let button = ButtonDraft::from(&template).validate().unwrap();
            assert_eq!(button.name, template.name);
            assert_eq!(button.color, DEFAULT_COLOR);
            assert_eq!(button.icon, DEFAULT_ICON);
            assert_eq!(button.description.as_deref(), Some(template.description));
        }
    }

    #[test]
    fn test_errors_display_lists_fields() {
        let errors = ButtonDraft::default().validate().unwrap_err();
        let text = errors.to_string();
        assert!(text.contains("name: Name is required"));
        assert!(text.contains("url: URL is required"));
    }
}
