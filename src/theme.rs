//! Colour theme preference carried in the `theme` cookie.

use axum::http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, InvalidHeaderValue},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

pub const THEME_COOKIE_NAME: &str = "theme";
pub const COLOR_SCHEME_HINT: &str = "sec-ch-prefers-color-scheme";
pub const THEME_COOKIE_MAX_AGE_SECONDS: u64 = 60 * 60 * 24 * 365;

#[derive(ToSchema, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Dark,
    Light,
    #[default]
    System,
}

#[derive(ToSchema, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedTheme {
    Dark,
    Light,
}

impl ThemePreference {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::System => "system",
        }
    }

    /// Unknown values fall back to [`ThemePreference::System`].
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    /// `system` follows the client's colour scheme, light when unknown.
    #[must_use]
    pub const fn resolve(self, system: Option<ResolvedTheme>) -> ResolvedTheme {
        match self {
            Self::Dark => ResolvedTheme::Dark,
            Self::Light => ResolvedTheme::Light,
            Self::System => match system {
                Some(theme) => theme,
                None => ResolvedTheme::Light,
            },
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            "system" => Ok(Self::System),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

impl ResolvedTheme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SameSite {
    #[default]
    Lax,
    Strict,
    None,
}

impl SameSite {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lax => "Lax",
            Self::Strict => "Strict",
            Self::None => "None",
        }
    }
}

impl FromStr for SameSite {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lax" => Ok(Self::Lax),
            "strict" => Ok(Self::Strict),
            "none" => Ok(Self::None),
            other => Err(format!("invalid SameSite policy: {other}")),
        }
    }
}

/// Attributes applied to every cookie the portal sets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookieSettings {
    domain: String,
    secure: bool,
    same_site: SameSite,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            domain: "localhost".to_string(),
            secure: false,
            same_site: SameSite::Lax,
        }
    }
}

impl CookieSettings {
    #[must_use]
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    #[must_use]
    pub fn secure(&self) -> bool {
        self.secure
    }

    #[must_use]
    pub fn same_site(&self) -> SameSite {
        self.same_site
    }
}

/// Preference stored in the request's `theme` cookie.
#[must_use]
pub fn preference_from_headers(headers: &HeaderMap) -> ThemePreference {
    cookie_value(headers, THEME_COOKIE_NAME)
        .map(|value| ThemePreference::parse_lenient(&value))
        .unwrap_or_default()
}

/// Colour scheme announced through the client hint header, if any.
#[must_use]
pub fn system_theme(headers: &HeaderMap) -> Option<ResolvedTheme> {
    let value = headers.get(COLOR_SCHEME_HINT)?.to_str().ok()?;
    match value.trim().trim_matches('"').to_ascii_lowercase().as_str() {
        "dark" => Some(ResolvedTheme::Dark),
        "light" => Some(ResolvedTheme::Light),
        _ => None,
    }
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            let (Some(key), Some(val)) = (parts.next(), parts.next()) else {
                continue;
            };
            if key.trim() == name {
                return Some(val.trim().to_string());
            }
        }
    }
    None
}

/// `Set-Cookie` value storing `preference`.
///
/// # Errors
/// Returns an error when the configured domain is not a valid header value.
pub fn theme_cookie(
    preference: ThemePreference,
    settings: &CookieSettings,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{THEME_COOKIE_NAME}={preference}; Path=/; Domain={}; SameSite={}; Max-Age={THEME_COOKIE_MAX_AGE_SECONDS}",
        settings.domain(),
        settings.same_site().as_str(),
    );
    // Browsers drop SameSite=None cookies without Secure.
    if settings.secure() || settings.same_site() == SameSite::None {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}
