use super::{authorize, code_login, code_login::CodeLoginOutcome};
use crate::{
    api::ApiClient,
    navigation::{Navigation, Route},
    toolkit::{is_valid, parameter_by_name},
    Error,
};

/// The outcome of guarding one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Enter the requested route.
    Proceed,
    /// Go somewhere else instead.
    Navigate(Navigation),
    /// Stay out of the requested route: the interceptors have already
    /// performed this navigation, so it must not be performed again.
    Handled(Navigation),
}

/// Runs before every route change and keeps unauthenticated users out.
#[derive(Clone)]
pub struct RouteGuard {
    client: ApiClient,
}

impl RouteGuard {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Decides whether the navigation to `to` may proceed.
    ///
    /// A whitelisted route always proceeds without touching the store or the
    /// network. Otherwise, an authorization code in the current URL is
    /// exchanged first; the exchange is awaited, so a navigation yields
    /// exactly one decision. A stored token lets the navigation through, its
    /// validity being judged by the backend on the next request. Anything
    /// else is sent to log in.
    pub async fn before_each(&self, to: &Route) -> Result<GuardDecision, Error> {
        // Whitelisted routes (login, error pages and friends) are always fine.
        let config = self.client.config();
        if let Some(name) = &to.name {
            if config.is_whitelisted(name) {
                tracing::debug!(route = %name, "whitelisted route");
                return Ok(GuardDecision::Proceed);
            }
        }

        // If OpenAuth just sent us back with a code, we'll exchange it first.
        let current_url = self.client.navigator().current_url();
        let code = parameter_by_name("code", &current_url).filter(|code| !code.is_empty());
        if let Some(code) = &code {
            match code_login::code_login(&self.client, code).await {
                Ok(CodeLoginOutcome::LoggedIn(navigation)) => {
                    return Ok(GuardDecision::Navigate(navigation))
                }
                // The backend rejected the session outright, and we've already been redirected.
                Ok(CodeLoginOutcome::Intercepted(navigation)) => {
                    return Ok(GuardDecision::Handled(navigation))
                }
                Ok(CodeLoginOutcome::Rejected) => {}
                // A failed exchange leaves us unauthenticated; the checks below decide.
                Err(err) => tracing::warn!(error = %err, "authorization code exchange failed"),
            }
        }

        // Do we have a token? Whether it's still valid is for the backend to say.
        let token = self.client.store().get()?;
        if is_valid(token.as_deref()) {
            return Ok(GuardDecision::Proceed);
        }

        tracing::info!(route = %to, "no session, sending to login");
        Ok(GuardDecision::Navigate(authorize::login_navigation(config)?))
    }
}
