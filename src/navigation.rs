use std::fmt;
use std::sync::{Mutex, PoisonError};
use url::{form_urlencoded, Url};

/// An in-app route, as handed to the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: Option<String>,
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Route {
    pub fn named(name: &str, path: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            path: path.to_string(),
            query: Vec::new(),
        }
    }

    pub fn path(path: &str) -> Self {
        Self {
            name: None,
            path: path.to_string(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Looks up the first query value for `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        if !self.query.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.query)
                .finish();
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

/// Where the session logic wants the user to go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Full-page navigation away from the app.
    Redirect(Url),
    /// In-app router push.
    Push(Route),
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Navigation::Redirect(url) => write!(f, "redirect {url}"),
            Navigation::Push(route) => write!(f, "push {route}"),
        }
    }
}

/// The browser-side collaborator: knows the current location and performs navigation.
pub trait Navigator: Send + Sync {
    fn current_url(&self) -> String;
    fn navigate(&self, navigation: Navigation);
}

/// A navigator that records every navigation instead of performing it.
#[derive(Debug)]
pub struct HistoryNavigator {
    current: Mutex<String>,
    history: Mutex<Vec<Navigation>>,
}

impl HistoryNavigator {
    pub fn new(current_url: impl Into<String>) -> Self {
        Self {
            current: Mutex::new(current_url.into()),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn set_current_url(&self, url: impl Into<String>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = url.into();
    }

    /// Drains the recorded navigations.
    pub fn take(&self) -> Vec<Navigation> {
        std::mem::take(&mut *self.history.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Navigator for HistoryNavigator {
    fn current_url(&self) -> String {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn navigate(&self, navigation: Navigation) {
        tracing::debug!(%navigation, "navigating");
        // A full-page redirect replaces the current location.
        if let Navigation::Redirect(url) = &navigation {
            self.set_current_url(url.as_str());
        }
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(navigation);
    }
}
