//! Cloudflare wire types and response unwrapping

use flarezone_core::{Error, Fields, Page, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::{HOST_PROVIDER, PROVIDER};

/// Client API v4 response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope {
    pub success: bool,
    #[serde(default)]
    pub errors: Option<Vec<ApiMessage>>,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiMessage {
    #[serde(default)]
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResultInfo {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_count: Option<u32>,
}

impl ApiEnvelope {
    /// First API error as "code: message", if any
    pub fn error_message(&self) -> Option<String> {
        self.errors
            .as_ref()
            .and_then(|errors| errors.first())
            .map(|e| format!("{}: {}", e.code, e.message))
    }

    /// Result as a single object
    pub fn into_object(self) -> Result<Fields> {
        match self.result {
            Value::Object(fields) => Ok(fields),
            other => Err(Error::provider(
                PROVIDER,
                format!("Invalid response format: result is not an object: {}", other),
            )),
        }
    }

    /// Result as one page of objects
    ///
    /// Listings without `result_info` are a single, final page.
    pub fn into_page(self, requested: u32) -> Result<Page<Fields>> {
        let items = match self.result {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(fields) => Ok(fields),
                    other => Err(Error::provider(
                        PROVIDER,
                        format!("Invalid response format: list item is not an object: {}", other),
                    )),
                })
                .collect::<Result<Vec<_>>>()?,
            Value::Null => Vec::new(),
            other => {
                return Err(Error::provider(
                    PROVIDER,
                    format!("Invalid response format: result is not an array: {}", other),
                ));
            }
        };

        let Some(info) = self.result_info else {
            return Ok(Page::single(items));
        };
        let page = info.page.unwrap_or(requested);
        let total_pages = match (info.total_pages, info.total_count, info.per_page) {
            (Some(total), _, _) => total,
            (None, Some(count), Some(per_page)) if per_page > 0 => count.div_ceil(per_page),
            _ => page,
        };
        Ok(Page::new(items, page, total_pages.max(1)))
    }
}

/// Unwrap a client API response, mapping failures to errors
///
/// Non-2xx statuses are mapped by code; a 2xx body with `success: false` is
/// a provider rejection.
pub(crate) fn parse_envelope(status: u16, body: &str) -> Result<ApiEnvelope> {
    let envelope: Option<ApiEnvelope> = serde_json::from_str(body).ok();

    if (200..300).contains(&status) {
        return match envelope {
            Some(envelope) if envelope.success => Ok(envelope),
            Some(envelope) => Err(Error::provider(
                PROVIDER,
                envelope
                    .error_message()
                    .unwrap_or_else(|| "Request failed without an error message".to_string()),
            )),
            None => Err(Error::provider(
                PROVIDER,
                format!("Failed to parse response: {}", body),
            )),
        };
    }

    let detail = envelope
        .and_then(|e| e.error_message())
        .unwrap_or_else(|| body.to_string());

    match status {
        401 | 403 => Err(Error::provider(
            PROVIDER,
            format!(
                "Authentication failed: Invalid API key or insufficient permissions. Status: {} - {}",
                status, detail
            ),
        )),
        404 => Err(Error::not_found(detail)),
        409 => Err(Error::provider(
            PROVIDER,
            format!("Conflict: {}", detail),
        )),
        429 => Err(Error::provider(
            PROVIDER,
            format!("Rate limit exceeded. Please retry later. Status: {}", status),
        )),
        500..=599 => Err(Error::provider(
            PROVIDER,
            format!("Cloudflare server error (transient): {} - {}", status, detail),
        )),
        _ => Err(Error::provider(
            PROVIDER,
            format!("Request failed: {} - {}", status, detail),
        )),
    }
}

/// Host gateway response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct HostEnvelope {
    pub result: String,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub err_code: Option<Value>,
    #[serde(default)]
    pub response: Value,
}

/// Unwrap a host gateway response into its `response` object
pub(crate) fn parse_host_envelope(status: u16, body: &str) -> Result<Fields> {
    let envelope: HostEnvelope = serde_json::from_str(body).map_err(|e| {
        Error::provider(
            HOST_PROVIDER,
            format!("Failed to parse host response (status {}): {}", status, e),
        )
    })?;

    if envelope.result != "success" {
        let code = envelope
            .err_code
            .map(|code| match code {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .unwrap_or_else(|| "unknown".to_string());
        return Err(Error::provider(
            HOST_PROVIDER,
            format!(
                "{} ({})",
                envelope.msg.unwrap_or_else(|| "Host request failed".to_string()),
                code
            ),
        ));
    }

    match envelope.response {
        Value::Object(fields) => Ok(fields),
        Value::Null => Ok(Fields::new()),
        other => Err(Error::provider(
            HOST_PROVIDER,
            format!("Invalid host response format: {}", other),
        )),
    }
}
