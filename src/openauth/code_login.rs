use crate::{api::ApiClient, navigation::Navigation, toolkit::is_valid, Error};
use reqwest::Method;
use serde::Deserialize;
use url::Url;

/// The backend endpoint exchanging an OpenAuth authorization code for a session token.
pub const CODE_LOGIN_ENDPOINT: &str = "/openAuth/codeLogin";

/// The `data` of a successful code login.
#[derive(Deserialize, Debug)]
struct CodeLoginData {
    #[serde(rename = "tokenValue", default)]
    token_value: Option<String>,
}

/// How an authorization code exchange ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeLoginOutcome {
    /// The token is stored; continue at the index page.
    LoggedIn(Navigation),
    /// The backend answered with a session code, and the interceptors have
    /// already performed this navigation.
    Intercepted(Navigation),
    /// No usable token was issued, e.g. because the code was already consumed.
    Rejected,
}

/// Exchanges the code and, on success, stores the token and sends the user to the index page.
pub async fn code_login(client: &ApiClient, code: &str) -> Result<CodeLoginOutcome, Error> {
    let (envelope, performed) = client
        .send(Method::GET, CODE_LOGIN_ENDPOINT, &[("code", code)], None)
        .await?;

    // If the interceptors already sent us somewhere, that's where we're going.
    if let Some(navigation) = performed {
        return Ok(CodeLoginOutcome::Intercepted(navigation));
    }

    // Failed logins come back with `data: null` or without the field at all.
    let data: Option<CodeLoginData> = envelope.data_as().unwrap_or(None);
    let Some(token) = data
        .and_then(|data| data.token_value)
        .filter(|token| is_valid(Some(token)))
    else {
        tracing::warn!(
            code = envelope.code,
            message = envelope.message.as_deref().unwrap_or_default(),
            "code login returned no token"
        );
        return Ok(CodeLoginOutcome::Rejected);
    };

    client.store().set(&token)?;
    tracing::info!(app = %client.config().app_name, "logged in with authorization code");

    let index = Url::parse(&client.config().index_url)?;
    Ok(CodeLoginOutcome::LoggedIn(Navigation::Redirect(index)))
}
