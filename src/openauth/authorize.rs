use super::storage::TokenStore;
use crate::{
    config::{AppConfig, LoginMode},
    navigation::{Navigation, Route},
    Error,
};
use url::{form_urlencoded, Url};

/// Path of the in-app login page for apps hosting their own.
pub const LOGIN_PATH: &str = "/auth/login";

/// The standard authorization-code query parameters sent to OpenAuth.
fn authorize_params(config: &AppConfig) -> [(&'static str, &str); 3] {
    [
        ("response_type", "code"),
        ("client_id", config.client_id.as_str()),
        ("redirect_uri", config.index_url.as_str()),
    ]
}

/// Builds `<server>?response_type=code&client_id=<id>&redirect_uri=<index>`.
///
/// The OpenAuth login page is hash-routed, so the query has to be appended
/// textually to stay inside the fragment; `Url::query_pairs_mut` would place
/// it before the `#`.
pub fn login_url(config: &AppConfig) -> Result<Url, Error> {
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(authorize_params(config))
        .finish();
    let separator = if config.open_auth_server_url.contains('?') {
        '&'
    } else {
        '?'
    };
    let url = Url::parse(&format!(
        "{}{separator}{query}",
        config.open_auth_server_url
    ))?;
    Ok(url)
}

/// Where an unauthenticated user is sent.
pub fn login_navigation(config: &AppConfig) -> Result<Navigation, Error> {
    match &config.login {
        LoginMode::External => Ok(Navigation::Redirect(login_url(config)?)),
        LoginMode::Route { name } => {
            let route = authorize_params(config)
                .into_iter()
                .fold(Route::named(name, LOGIN_PATH), |route, (key, value)| {
                    route.with_query(key, value)
                });
            Ok(Navigation::Push(route))
        }
    }
}

/// Clears the stored token and returns the login navigation.
pub fn sign_out(config: &AppConfig, store: &dyn TokenStore) -> Result<Navigation, Error> {
    store.remove()?;
    tracing::info!(app = %config.app_name, "signed out");
    login_navigation(config)
}
