use crate::model::{Button, Call, CallOrigin, Headers, HttpMethod};
use async_trait::async_trait;

/// Everything needed to issue one request for a button
#[derive(Debug, Clone, PartialEq)]
pub struct CallRequest {
    pub button_id: String,
    pub button_name: String,
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub body: Option<String>,
}

impl CallRequest {
    /// Body to send: only for methods that take one, and only when non-empty
    pub fn outgoing_body(&self) -> Option<&str> {
        if !self.method.accepts_body() {
            return None;
        }
        self.body.as_deref().filter(|body| !body.is_empty())
    }

    pub fn origin(&self) -> CallOrigin {
        CallOrigin {
            button_id: self.button_id.clone(),
            button_name: self.button_name.clone(),
            method: self.method,
            url: self.url.clone(),
        }
    }
}

impl From<&Button> for CallRequest {
    fn from(button: &Button) -> Self {
        Self {
            button_id: button.id.clone(),
            button_name: button.name.clone(),
            method: button.method,
            url: button.url.clone(),
            headers: button.headers.clone(),
            body: button.body.clone(),
        }
    }
}

/// Performs a request and reports the outcome as a [`Call`]
///
/// Implementations never fail: transport problems come back as a call
/// built with [`Call::failed`].
#[async_trait]
pub trait Invoker: Send + Sync {
    async fn execute(&self, request: &CallRequest) -> Call;
}
