use crate::{seo::Site, theme::CookieSettings};
use std::{fmt, str::FromStr, time::Duration};

pub const DEFAULT_AUTH_DELAY: Duration = Duration::from_millis(750);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Development,
    Production,
    Test,
}

impl Mode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(format!("invalid mode: {other}")),
        }
    }
}

/// Portal settings shared with every handler.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub app_name: String,
    pub company_name: String,
    pub app_url: String,
    pub api_url: String,
    pub mode: Mode,
    pub cookie: CookieSettings,
    /// Simulated backend latency of the auth actions.
    pub auth_delay: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(app_url: String) -> Self {
        Self {
            app_name: "HEAPMIND SSO".to_string(),
            company_name: "HeapMind".to_string(),
            app_url,
            api_url: "http://localhost:5000".to_string(),
            mode: Mode::default(),
            cookie: CookieSettings::default(),
            auth_delay: DEFAULT_AUTH_DELAY,
        }
    }

    #[must_use]
    pub fn site(&self) -> Site {
        Site {
            name: self.app_name.clone(),
            company: self.company_name.clone(),
            base_url: self.app_url.clone(),
        }
    }
}
