//! Request and response hooks applied to every backend call.
//!
//! The request side attaches the stored session token. The response side
//! reads the application-level `code` of the envelope and turns the
//! session states the backend signals into a [`SessionEffect`].

use super::{authorize, storage::TokenStore};
use crate::{
    api::{status, ResponseEnvelope},
    config::AppConfig,
    navigation::{Navigation, Route},
    toolkit::{is_valid, parameter_by_name},
    Error,
};
use reqwest::{header, RequestBuilder};

/// Path of the screen where the user grants a client its requested scope.
pub const CONFIRM_PATH: &str = "/auth/confirm";
/// Route name and path of the access-denied screen.
pub const ACCESS_DENIED_ROUTE: &str = "accessDenied";
pub const ACCESS_DENIED_PATH: &str = "/access";

/// What the backend's response code asks the client to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    /// The session expired or never existed: drop the token and log in again.
    SignOut,
    /// Drop the token but stay put.
    ClearToken,
    /// The user must explicitly authorize a client.
    Confirm {
        client_id: Option<String>,
        scope: Option<String>,
        redirect_uri: Option<String>,
    },
    AccessDenied,
}

/// Attaches the stored token, if any, and the JSON content type.
pub fn attach_session(
    request: RequestBuilder,
    config: &AppConfig,
    store: &dyn TokenStore,
) -> Result<RequestBuilder, Error> {
    let request = match store.get()? {
        Some(token) if is_valid(Some(&token)) => {
            request.header(config.token_header.as_str(), token)
        }
        _ => request,
    };
    Ok(request.header(header::CONTENT_TYPE, "application/json"))
}

/// Classifies a response envelope. Codes without a session meaning yield `None`.
pub fn inspect(
    envelope: &ResponseEnvelope,
    config: &AppConfig,
    current_url: &str,
) -> Option<SessionEffect> {
    match envelope.code {
        status::SESSION_EXPIRED | status::NOT_LOGGED_IN => Some(SessionEffect::SignOut),
        status::NEEDS_AUTHORIZATION => Some(SessionEffect::Confirm {
            client_id: envelope
                .data_str(&config.confirm_client_key)
                .map(str::to_string),
            scope: envelope.data_str("scope").map(str::to_string),
            redirect_uri: parameter_by_name("redirect_uri", current_url),
        }),
        status::FORBIDDEN => Some(SessionEffect::AccessDenied),
        status::SERVER_ERROR if config.clear_token_on_server_error => {
            Some(SessionEffect::ClearToken)
        }
        _ => None,
    }
}

/// Carries out an effect against the store, returning any navigation it implies.
pub fn apply(
    effect: &SessionEffect,
    config: &AppConfig,
    store: &dyn TokenStore,
) -> Result<Option<Navigation>, Error> {
    match effect {
        SessionEffect::SignOut => authorize::sign_out(config, store).map(Some),
        SessionEffect::ClearToken => {
            store.remove()?;
            Ok(None)
        }
        SessionEffect::Confirm {
            client_id,
            scope,
            redirect_uri,
        } => {
            let mut route = Route::path(CONFIRM_PATH);
            for (key, value) in [
                (config.confirm_client_key.as_str(), client_id),
                ("scope", scope),
                ("redirect_uri", redirect_uri),
            ] {
                if let Some(value) = value {
                    route = route.with_query(key, value.as_str());
                }
            }
            Ok(Some(Navigation::Push(route)))
        }
        SessionEffect::AccessDenied => Ok(Some(Navigation::Push(Route::named(
            ACCESS_DENIED_ROUTE,
            ACCESS_DENIED_PATH,
        )))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openauth::storage::MemoryStore;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> ResponseEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn expired_and_unauthenticated_sign_out() {
        let config = AppConfig::acs();
        for code in [status::SESSION_EXPIRED, status::NOT_LOGGED_IN] {
            let effect = inspect(&envelope(json!({ "code": code })), &config, "http://acs.top:132/#/");
            assert_eq!(effect, Some(SessionEffect::SignOut));
        }
    }

    #[test]
    fn expired_session_always_clears_token() {
        for config in [AppConfig::acs(), AppConfig::open_iam()] {
            let store = MemoryStore::with_token("old");
            let effect = inspect(&envelope(json!({ "code": 700 })), &config, "").unwrap();
            let navigation = apply(&effect, &config, &store).unwrap();
            assert!(navigation.is_some());
            assert_eq!(store.get().unwrap(), None);
        }
    }

    #[test]
    fn needs_authorization_builds_confirm_route() {
        let config = AppConfig::open_iam();
        let current = "http://openiam.top:9036/#/auth/login?redirect_uri=http%3A%2F%2Facs.top%3A132%2F%23%2F";
        let response = envelope(json!({
            "code": 901,
            "data": { "client_id": "1001", "scope": "profile" }
        }));

        let effect = inspect(&response, &config, current).unwrap();
        let store = MemoryStore::with_token("kept");
        let Some(Navigation::Push(route)) = apply(&effect, &config, &store).unwrap() else {
            panic!("expected a push to the confirm screen");
        };
        assert_eq!(route.path, CONFIRM_PATH);
        assert_eq!(route.query_value("client_id"), Some("1001"));
        assert_eq!(route.query_value("scope"), Some("profile"));
        assert_eq!(route.query_value("redirect_uri"), Some("http://acs.top:132/#/"));
        assert_eq!(store.get().unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn acs_reads_camel_case_client_id_and_omits_missing_values() {
        let config = AppConfig::acs();
        let response = envelope(json!({ "code": 901, "data": { "clientId": "1001" } }));
        let effect = inspect(&response, &config, "http://acs.top:132/#/").unwrap();
        let Some(Navigation::Push(route)) = apply(&effect, &config, &MemoryStore::new()).unwrap()
        else {
            panic!("expected a push to the confirm screen");
        };
        assert_eq!(route.query, vec![("clientId".to_string(), "1001".to_string())]);
    }

    #[test]
    fn forbidden_goes_to_access_denied() {
        let config = AppConfig::acs();
        let effect = inspect(&envelope(json!({ "code": 403 })), &config, "").unwrap();
        assert_eq!(
            apply(&effect, &config, &MemoryStore::new()).unwrap(),
            Some(Navigation::Push(Route::named(ACCESS_DENIED_ROUTE, ACCESS_DENIED_PATH)))
        );
    }

    #[test]
    fn server_error_clears_token_only_where_configured() {
        let response = envelope(json!({ "code": 500 }));
        assert_eq!(inspect(&response, &AppConfig::acs(), ""), None);

        let config = AppConfig::open_iam();
        let store = MemoryStore::with_token("iam");
        let effect = inspect(&response, &config, "").unwrap();
        assert_eq!(effect, SessionEffect::ClearToken);
        assert_eq!(apply(&effect, &config, &store).unwrap(), None);
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn other_codes_pass_through() {
        let config = AppConfig::open_iam();
        for code in [200, 400, 404, 902] {
            assert_eq!(inspect(&envelope(json!({ "code": code })), &config, ""), None);
        }
    }
}
