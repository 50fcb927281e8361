use crate::Error;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use url::Url;

/// Default request timeout, matching the ten seconds both front ends use.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// How an unauthenticated user is sent to log in.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LoginMode {
    /// Leave the app entirely for the OpenAuth server's login page.
    External,
    /// The app hosts the login page itself under the given route name.
    Route { name: String },
}

/// Everything one front end needs to know about itself and OpenAuth.
///
/// This replaces the module-level `globalConfig` object with a value
/// that is passed explicitly to the guard and the API client.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub app_name: String,
    /// Name of the stored token entry.
    pub app_token_name: String,
    /// Header the token is sent under.
    pub token_header: String,
    /// OpenAuth login page, possibly hash-routed (e.g. `http://host/#/auth/login`).
    pub open_auth_server_url: String,
    pub client_id: String,
    /// Where OpenAuth sends the user back to, and where a fresh login lands.
    pub index_url: String,
    pub api_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    pub login: LoginMode,
    /// Key the client id is read from and forwarded under on the confirm screen.
    pub confirm_client_key: String,
    /// Whether a 500 response drops the stored token.
    #[serde(default)]
    pub clear_token_on_server_error: bool,
    /// Route names that skip the authentication check.
    pub whitelist: Vec<String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl AppConfig {
    /// The access-control scheduling dashboard.
    pub fn acs() -> Self {
        Self {
            app_name: "ACS Server".to_string(),
            app_token_name: "acsToken".to_string(),
            token_header: "token".to_string(),
            open_auth_server_url: "http://openiam.top:9036/#/auth/login".to_string(),
            client_id: "1001".to_string(),
            index_url: "http://acs.top:132/#/".to_string(),
            api_base_url: "http://acs.top:1320".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            login: LoginMode::External,
            confirm_client_key: "clientId".to_string(),
            clear_token_on_server_error: false,
            whitelist: vec![
                "confirm".to_string(),
                "notFound".to_string(),
                "error".to_string(),
            ],
        }
    }

    /// The identity and access management console, which also hosts the login page.
    pub fn open_iam() -> Self {
        Self {
            app_name: "OpenIAM".to_string(),
            app_token_name: "iamToken".to_string(),
            token_header: "iamToken".to_string(),
            open_auth_server_url: "http://openiam.top:9036/#/auth/login".to_string(),
            client_id: "1000".to_string(),
            index_url: "http://openiam.top:9036/#/".to_string(),
            api_base_url: "http://openiam.top:8090".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            login: LoginMode::Route {
                name: "login".to_string(),
            },
            confirm_client_key: "client_id".to_string(),
            clear_token_on_server_error: true,
            whitelist: vec![
                "login".to_string(),
                "register".to_string(),
                "confirm".to_string(),
                "notFound".to_string(),
                "error".to_string(),
            ],
        }
    }

    /// Loads a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `AGILITY_*` environment overrides on top of this configuration.
    pub fn with_env_overrides(self) -> Result<Self, Error> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        if let Some(value) = lookup("AGILITY_API_BASE_URL") {
            self.api_base_url = value;
        }
        if let Some(value) = lookup("AGILITY_AUTH_SERVER_URL") {
            self.open_auth_server_url = value;
        }
        if let Some(value) = lookup("AGILITY_INDEX_URL") {
            self.index_url = value;
        }
        if let Some(value) = lookup("AGILITY_TIMEOUT_SECS") {
            self.timeout_secs = value
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("AGILITY_TIMEOUT_SECS is not a number: {value}")))?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Ensures every URL parses and the token entry has a name.
    pub fn validate(&self) -> Result<(), Error> {
        if self.app_token_name.trim().is_empty() {
            return Err(Error::Config("app_token_name must not be empty".to_string()));
        }
        if self.token_header.trim().is_empty() {
            return Err(Error::Config("token_header must not be empty".to_string()));
        }
        for (field, value) in [
            ("open_auth_server_url", &self.open_auth_server_url),
            ("index_url", &self.index_url),
            ("api_base_url", &self.api_base_url),
        ] {
            Url::parse(value).map_err(|err| Error::Config(format!("{field}: {err}")))?;
        }
        Ok(())
    }

    /// Whether the given route name bypasses the authentication check.
    pub fn is_whitelisted(&self, route_name: &str) -> bool {
        self.whitelist.iter().any(|name| name == route_name)
    }
}
