use crate::api::{status, ResponseEnvelope};
use serde::Serialize;
use url::form_urlencoded;

/// Looks up a query parameter anywhere within `url`.
///
/// Hash-routed apps carry their query inside the fragment
/// (`http://host/#/path?code=...`), so this does not go
/// through `Url::query_pairs`. The first `?name` or `&name` occurrence wins.
///
/// Returns `None` if the parameter is absent, and `Some("")` if it is present
/// without a value. Values are percent-decoded, with `+` read as a space.
pub fn parameter_by_name(name: &str, url: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }

    for (index, separator) in url.char_indices() {
        if separator != '?' && separator != '&' {
            continue;
        }
        let Some(rest) = url[index + 1..].strip_prefix(name) else {
            continue;
        };

        match rest.chars().next() {
            None | Some('&') | Some('#') => return Some(String::new()),
            Some('=') => {
                let raw = &rest[1..];
                let end = raw.find(|c: char| c == '&' || c == '#').unwrap_or(raw.len());
                return Some(decode_component(&raw[..end]));
            }
            // A longer parameter that merely starts with `name`.
            Some(_) => continue,
        }
    }
    None
}

fn decode_component(raw: &str) -> String {
    // Prefix a key so a literal `=` within the value is kept intact.
    form_urlencoded::parse(format!("v={raw}").as_bytes())
        .next()
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

/// Whether a parameter carries a usable value.
pub fn is_valid(value: Option<&str>) -> bool {
    !is_not_valid(value)
}

/// Whether a parameter is missing or empty.
pub fn is_not_valid(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

/// A transient message summarizing a backend response for the user.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub summary: Option<String>,
    pub detail: Option<String>,
    /// How long the notice stays up, in milliseconds.
    pub life: u64,
}

impl Notice {
    /// Default display time of a notice.
    pub const DEFAULT_SECONDS: u64 = 3;

    pub fn from_envelope(envelope: &ResponseEnvelope, during_seconds: u64) -> Self {
        let severity = if envelope.code == status::SUCCESS {
            Severity::Success
        } else {
            Severity::Error
        };
        Self {
            severity,
            summary: envelope.message.clone(),
            detail: envelope.description.clone(),
            life: during_seconds.saturating_mul(1000),
        }
    }
}
