//! Heuristic field typing for displaying arbitrary JSON responses.
//!
//! The keyword list mixes English and Portuguese key names and is matched in
//! a fixed order; the first matching rule decides the label.

use crate::model::{Call, HttpMethod};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Display type assigned to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    Email,
    Url,
    Object,
    Array,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Email => "email",
            FieldType::Url => "url",
            FieldType::Object => "object",
            FieldType::Array => "array",
        }
    }
}

/// A classified property of a response item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataField {
    pub key: String,
    pub value: Value,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    pub icon: &'static str,
}

/// Keyword rules applied after the primitive pass, in priority order.
/// `None` keeps the type found from the value.
const KEY_RULES: &[(&[&str], Option<FieldType>, &str, &str)] = &[
    (&["phone", "telefone"], None, "Phone", "phone"),
    (&["url", "website", "site"], Some(FieldType::Url), "Website", "globe"),
    (&["address", "endereco"], None, "Address", "map-pin"),
    (&["company", "empresa"], None, "Company", "building"),
    (&["name", "nome"], None, "Name", "user"),
    (&["title", "titulo"], None, "Title", "tag"),
    (&["date", "created", "updated"], Some(FieldType::Date), "Date", "calendar"),
    (&["id"], None, "ID", "hash"),
    (&["status"], None, "Status", "alert-circle"),
];

/// Assign a display type, label and icon to one property
pub fn classify(key: &str, value: &Value) -> DataField {
    let lower_key = key.to_lowercase();

    let (mut field_type, mut icon) = match value {
        Value::Number(_) => (FieldType::Number, "hash"),
        Value::Bool(_) => (FieldType::Boolean, "check-circle"),
        Value::Array(_) => (FieldType::Array, "list"),
        Value::Object(_) => (FieldType::Object, "grid"),
        _ => (FieldType::String, "file-text"),
    };
    let mut label = humanize(key);

    let looks_like_email = value.as_str().is_some_and(|s| s.contains('@'));
    if lower_key.contains("email") || looks_like_email {
        field_type = FieldType::Email;
        icon = "mail";
        label = "Email".to_string();
    } else if let Some((_, rule_type, rule_label, rule_icon)) = KEY_RULES
        .iter()
        .find(|(keywords, ..)| keywords.iter().any(|k| lower_key.contains(k)))
    {
        if let Some(t) = rule_type {
            field_type = *t;
        }
        icon = *rule_icon;
        label = rule_label.to_string();
    }

    DataField {
        key: key.to_string(),
        value: value.clone(),
        field_type,
        label,
        icon,
    }
}

/// Capitalize the first letter and split camel case: `userEmail` -> `User Email`
pub fn humanize(key: &str) -> String {
    let mut chars = key.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut label: String = first.to_uppercase().collect();
    for c in chars {
        if c.is_ascii_uppercase() {
            label.push(' ');
        }
        label.push(c);
    }
    label
}

/// Where a displayed item came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSource {
    pub call_id: String,
    pub button_name: String,
    pub method: HttpMethod,
    pub url: String,
    pub status: u16,
    pub timestamp: DateTime<Utc>,
}

/// One record of a response, broken into classified fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataItem {
    pub id: String,
    pub source: ItemSource,
    pub fields: Vec<DataField>,
}

impl DataItem {
    /// Case-insensitive search over labels and displayed values
    pub fn matches(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        self.fields.iter().any(|field| {
            field.label.to_lowercase().contains(&term)
                || search_text(&field.value).to_lowercase().contains(&term)
        })
    }
}

/// Split a response into items: one per array element, or the value itself
pub fn classify_response(value: &Value) -> Vec<Vec<DataField>> {
    let items: Vec<&Value> = match value {
        Value::Array(elements) => elements.iter().collect(),
        other => vec![other],
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => map.iter().map(|(k, v)| classify(k, v)).collect(),
            other => vec![DataField {
                key: "value".to_string(),
                value: other.clone(),
                field_type: FieldType::String,
                label: "Value".to_string(),
                icon: "info",
            }],
        })
        .collect()
}

/// Build display items for a set of calls, in call order
pub fn data_items(calls: &[Call]) -> Vec<DataItem> {
    calls
        .iter()
        .enumerate()
        .flat_map(|(call_index, call)| {
            let response = call.response.clone().unwrap_or(Value::Null);
            let source = ItemSource {
                call_id: call.id.clone(),
                button_name: call.button_name.clone(),
                method: call.method,
                url: call.url.clone(),
                status: call.status,
                timestamp: call.timestamp,
            };

            classify_response(&response)
                .into_iter()
                .enumerate()
                .map(move |(item_index, fields)| DataItem {
                    id: format!("{}-{}", call_index, item_index),
                    source: source.clone(),
                    fields,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Render a field value for display; never fails
pub fn display_value(field: &DataField) -> String {
    let value = &field.value;
    if value.is_null() {
        return "Not provided".to_string();
    }

    match field.field_type {
        FieldType::Boolean => match value.as_bool() {
            Some(true) => "Yes".to_string(),
            Some(false) => "No".to_string(),
            None => search_text(value),
        },
        FieldType::Date => parse_date(value)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| search_text(value)),
        FieldType::Array => {
            let n = value.as_array().map_or(0, Vec::len);
            format!("Array ({} {})", n, if n == 1 { "item" } else { "items" })
        }
        FieldType::Object => {
            let n = value.as_object().map_or(0, |m| m.len());
            format!(
                "Object ({} {})",
                n,
                if n == 1 { "property" } else { "properties" }
            )
        }
        _ => search_text(value),
    }
}

/// Plain text form of a value: strings unquoted, everything else as JSON
fn search_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            DateTime::parse_from_rfc3339(s)
                .map(|d| d.date_naive())
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
                        .ok()
                        .map(|d| d.date())
                })
                .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|d| d.date_naive()),
        _ => None,
    }
}
