use super::envelope::ResponseEnvelope;
use crate::{
    config::AppConfig,
    navigation::{Navigation, Navigator},
    openauth::{interceptor, TokenStore},
    Error,
};
use reqwest::Method;
use std::{sync::Arc, time::Duration};
use url::Url;

/// The backend client shared by the route guard and the rest of the app.
///
/// Every request goes through the session interceptors: the stored token is
/// attached on the way out, and session codes in the response are acted
/// upon before the envelope is handed back.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    config: Arc<AppConfig>,
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Creates a new API client for the given app.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, Error> {
        config.validate()?;

        // Paths are joined relative to the base, so it must end in a slash.
        let mut base_url = Url::parse(&config.api_base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            config: Arc::new(config),
            store,
            navigator,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn TokenStore {
        self.store.as_ref()
    }

    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    /// Performs a request against the backend.
    ///
    /// Transport failures and non-2xx statuses come back as `Error::Transport`
    /// untouched. Otherwise the envelope is returned whatever its code, after
    /// any session effect it signals has been carried out.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&serde_json::Value>,
    ) -> Result<ResponseEnvelope, Error> {
        let (envelope, _) = self.send(method, path, query, body).await?;
        Ok(envelope)
    }

    /// Like [`ApiClient::request`], but also hands back the navigation the
    /// interceptors performed, if the response signaled a session change.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&serde_json::Value>,
    ) -> Result<(ResponseEnvelope, Option<Navigation>), Error> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        tracing::debug!(%method, %url, "backend request");

        // Every request carries our session token, if we have one.
        let mut request = self.http.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let mut request = interceptor::attach_session(request, &self.config, self.store.as_ref())?;
        if let Some(body) = body {
            request = request.body(serde_json::to_string(body)?);
        }

        // Anything other than a 2xx is a transport problem, and the caller's to handle.
        let response = request.send().await?.error_for_status()?;

        // The backend reports its real status within the body, so we parse it first...
        let response_text = response.text().await?;
        let envelope = ResponseEnvelope::from_json(&response_text)?;

        // ...and then react to whatever session state it signals.
        let navigation = self.intercept(&envelope)?;
        Ok((envelope, navigation))
    }

    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<ResponseEnvelope, Error> {
        self.request(Method::GET, path, query, None).await
    }

    pub async fn post(&self, path: &str, body: &serde_json::Value) -> Result<ResponseEnvelope, Error> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    fn intercept(&self, envelope: &ResponseEnvelope) -> Result<Option<Navigation>, Error> {
        let current_url = self.navigator.current_url();
        let Some(effect) = interceptor::inspect(envelope, &self.config, &current_url) else {
            return Ok(None);
        };

        tracing::info!(code = envelope.code, ?effect, "backend signaled a session change");
        let navigation = interceptor::apply(&effect, &self.config, self.store.as_ref())?;
        if let Some(navigation) = &navigation {
            self.navigator.navigate(navigation.clone());
        }
        Ok(navigation)
    }
}
