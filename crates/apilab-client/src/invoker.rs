use crate::Result;
use apilab_core::model::{Call, CallOrigin, HttpMethod};
use apilab_core::{CallRequest, Invoker};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde_json::Value;
use std::error::Error as StdError;
use std::time::Instant;

const DEFAULT_ACCEPT: &str = "application/json";

/// Executes button requests over HTTP(S)
///
/// One request per execution: no retries, no timeout. Every outcome,
/// including transport failures, comes back as a [`Call`].
#[derive(Debug, Clone)]
pub struct HttpInvoker {
    client: Client,
}

impl HttpInvoker {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("apilab/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    async fn send(&self, request: &CallRequest) -> std::result::Result<(u16, Value), String> {
        let mut builder = self
            .client
            .request(to_method(request.method), request.url.as_str());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request
            .headers
            .keys()
            .any(|name| name.eq_ignore_ascii_case(ACCEPT.as_str()))
        {
            builder = builder.header(ACCEPT, DEFAULT_ACCEPT);
        }
        if let Some(body) = request.outgoing_body() {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await.map_err(|e| error_message(&e))?;
        let status = response.status().as_u16();
        let body = decode_body(response).await?;
        Ok((status, body))
    }
}

#[async_trait]
impl Invoker for HttpInvoker {
    async fn execute(&self, request: &CallRequest) -> Call {
        tracing::debug!("Dispatching {} {}", request.method, request.url);

        let started = Instant::now();
        let outcome = self.send(request).await;
        let duration = started.elapsed().as_millis() as u64;
        let origin: CallOrigin = request.origin();

        match outcome {
            Ok((status, body)) => {
                tracing::debug!(
                    "{} {} -> {} in {}ms",
                    request.method,
                    request.url,
                    status,
                    duration
                );
                Call::completed(origin, status, status_text(status), body, duration)
            }
            Err(message) => {
                tracing::debug!("{} {} failed: {}", request.method, request.url, message);
                Call::failed(origin, &message, duration)
            }
        }
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// JSON when the server says so, otherwise the raw text as a JSON string
async fn decode_body(response: Response) -> std::result::Result<Value, String> {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"));

    let text = response.text().await.map_err(|e| error_message(&e))?;
    if !is_json {
        return Ok(Value::String(text));
    }

    serde_json::from_str(&text).map_err(|e| format!("Invalid JSON response: {}", e))
}

fn status_text(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("")
}

/// Error message including its causes, e.g. the refused connection.
/// An empty message is replaced by [`Call::failed`].
fn error_message(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text_is_canonical_reason() {
        assert_eq!(status_text(200), "OK");
        assert_eq!(status_text(404), "Not Found");
        assert_eq!(status_text(599), "");
    }

    #[test]
    fn test_methods_map_one_to_one() {
        for method in HttpMethod::ALL {
            assert_eq!(to_method(method).as_str(), method.as_str());
        }
    }

    #[test]
    fn test_error_message_includes_causes() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let outer = std::io::Error::other(inner);
        assert!(error_message(&outer).contains("refused"));
    }
}
