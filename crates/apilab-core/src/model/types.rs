use chrono::{DateTime, SubsecRound, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Request headers, kept in the order the user entered them
pub type Headers = IndexMap<String, String>;

/// Status text recorded for transport-level failures
pub const NETWORK_ERROR_STATUS_TEXT: &str = "Network Error";

/// Message used when a failure carries no message of its own
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// HTTP methods a button can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether a request body is sent for this method
    pub fn accepts_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }

    pub fn description(&self) -> &'static str {
        match self {
            HttpMethod::Get => "Fetch data without changing anything on the server",
            HttpMethod::Post => "Create new resources by sending data to the server",
            HttpMethod::Put => "Replace an existing resource completely",
            HttpMethod::Patch => "Update only specific fields of a resource",
            HttpMethod::Delete => "Remove resources from the server",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unsupported HTTP method: {}", s))
    }
}

/// A saved, executable request definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One execution of a button
///
/// Calls are built through [`Call::completed`] or [`Call::failed`], which keep
/// `status == 0` reserved for transport failures carrying an `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub id: String,
    pub button_id: String,
    pub button_name: String,
    pub method: HttpMethod,
    pub url: String,
    pub status: u16,
    pub status_text: String,
    pub response: Option<Value>,
    pub duration: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Identity of the button a call was made for, captured at execution time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOrigin {
    pub button_id: String,
    pub button_name: String,
    pub method: HttpMethod,
    pub url: String,
}

impl Call {
    /// A call that reached the server and produced a status
    pub fn completed(
        origin: CallOrigin,
        status: u16,
        status_text: impl Into<String>,
        response: Value,
        duration: u64,
    ) -> Self {
        debug_assert!(status != 0, "status 0 is reserved for transport failures");
        Self {
            id: new_id("call"),
            button_id: origin.button_id,
            button_name: origin.button_name,
            method: origin.method,
            url: origin.url,
            status,
            status_text: status_text.into(),
            response: Some(response),
            duration,
            timestamp: now_millis(),
            error: None,
        }
    }

    /// A call that never produced an HTTP response
    pub fn failed(origin: CallOrigin, message: impl Into<String>, duration: u64) -> Self {
        let message = message.into();
        let error = if message.trim().is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_string()
        } else {
            message
        };

        Self {
            id: new_id("call"),
            button_id: origin.button_id,
            button_name: origin.button_name,
            method: origin.method,
            url: origin.url,
            status: 0,
            status_text: NETWORK_ERROR_STATUS_TEXT.to_string(),
            response: None,
            duration,
            timestamp: now_millis(),
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the call produced response data worth collecting
    ///
    /// Null, `false`, zero and the empty string count as no data.
    pub fn has_data(&self) -> bool {
        if self.is_error() {
            return false;
        }
        match &self.response {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::String(text)) => !text.is_empty(),
            Some(Value::Number(number)) => number.as_f64() != Some(0.0),
            Some(_) => true,
        }
    }

    /// A call has an error exactly when its status is 0
    pub fn is_consistent(&self) -> bool {
        self.error.is_some() == (self.status == 0)
    }

    pub fn status_class(&self) -> StatusClass {
        StatusClass::of(self.status)
    }
}

/// Coarse grouping of HTTP status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    Success,
    Redirect,
    ClientError,
    ServerError,
    Other,
}

impl StatusClass {
    pub fn of(status: u16) -> Self {
        match status {
            200..=299 => StatusClass::Success,
            300..=399 => StatusClass::Redirect,
            400..=499 => StatusClass::ClientError,
            500.. => StatusClass::ServerError,
            _ => StatusClass::Other,
        }
    }
}

/// Short explanation of common status codes
pub fn status_description(status: u16) -> String {
    let known = match status {
        200 => "OK - Request succeeded",
        201 => "Created - Resource created successfully",
        204 => "No Content - Succeeded with no content",
        400 => "Bad Request - The request was invalid",
        401 => "Unauthorized - Authentication required",
        403 => "Forbidden - Access denied",
        404 => "Not Found - Resource not found",
        500 => "Internal Server Error - The server failed",
        _ => return format!("Status {}", status),
    };
    known.to_string()
}

/// Category a template is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Basic,
    Advanced,
    Example,
}

impl TemplateCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateCategory::Basic => "basic",
            TemplateCategory::Advanced => "advanced",
            TemplateCategory::Example => "example",
        }
    }
}

/// Read-only seed for creating a button
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub method: HttpMethod,
    pub url: &'static str,
    pub headers: Vec<(&'static str, &'static str)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub category: TemplateCategory,
}

/// Generate an opaque id such as `btn_3f2a...`
pub(crate) fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
}

/// Current time at the precision persisted records keep
pub(crate) fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
