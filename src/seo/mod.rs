//! Meta descriptors, structured data and crawler files for the public pages.

pub mod robots;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

pub const DEFAULT_SITE_NAME: &str = "HeapMind SSO";
pub const DEFAULT_IMAGE: &str = "/og-image.png";

const AUTH_KEYWORDS: &str = "login, sign in, authentication, secure login, user account, HeapMind, SSO, single sign on, access account, user portal, secure access, member login";

/// One entry of the document head, shaped like the router's meta descriptors.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum MetaTag {
    Title {
        title: String,
    },
    CharSet {
        #[serde(rename = "charSet")]
        char_set: String,
    },
    Name {
        name: String,
        content: String,
    },
    Property {
        property: String,
        content: String,
    },
    Link {
        #[serde(rename = "tagName")]
        tag_name: String,
        rel: String,
        href: String,
    },
}

impl MetaTag {
    fn name(name: &str, content: impl Into<String>) -> Self {
        Self::Name {
            name: name.to_string(),
            content: content.into(),
        }
    }

    fn property(property: &str, content: impl Into<String>) -> Self {
        Self::Property {
            property: property.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PageType {
    #[default]
    Website,
    Article,
    Product,
}

impl PageType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Article => "article",
            Self::Product => "product",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TwitterCard {
    Summary,
    #[default]
    SummaryLargeImage,
    App,
    Player,
}

impl TwitterCard {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::SummaryLargeImage => "summary_large_image",
            Self::App => "app",
            Self::Player => "player",
        }
    }
}

/// Inputs for [`SeoConfig::meta`]. Unset fields fall back to the site defaults.
#[derive(Clone, Debug)]
pub struct SeoConfig {
    title: String,
    description: String,
    keywords: Option<String>,
    image: Option<String>,
    url: Option<String>,
    page_type: PageType,
    site_name: Option<String>,
    twitter_card: TwitterCard,
    no_index: bool,
    canonical: Option<String>,
}

impl SeoConfig {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            keywords: None,
            image: Some(DEFAULT_IMAGE.to_string()),
            url: None,
            page_type: PageType::default(),
            site_name: Some(DEFAULT_SITE_NAME.to_string()),
            twitter_card: TwitterCard::default(),
            no_index: false,
            canonical: None,
        }
    }

    #[must_use]
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_page_type(mut self, page_type: PageType) -> Self {
        self.page_type = page_type;
        self
    }

    /// `None` drops the `| site` title suffix.
    #[must_use]
    pub fn with_site_name(mut self, site_name: Option<String>) -> Self {
        self.site_name = site_name;
        self
    }

    #[must_use]
    pub fn with_twitter_card(mut self, card: TwitterCard) -> Self {
        self.twitter_card = card;
        self
    }

    #[must_use]
    pub fn with_no_index(mut self, no_index: bool) -> Self {
        self.no_index = no_index;
        self
    }

    #[must_use]
    pub fn with_canonical(mut self, canonical: impl Into<String>) -> Self {
        self.canonical = Some(canonical.into());
        self
    }

    #[must_use]
    pub fn full_title(&self) -> String {
        match self.site_name.as_deref() {
            Some(site) if !site.is_empty() => format!("{} | {site}", self.title),
            _ => self.title.clone(),
        }
    }

    /// Head entries in document order.
    #[must_use]
    pub fn meta(&self) -> Vec<MetaTag> {
        let mut tags = vec![
            MetaTag::Title {
                title: self.full_title(),
            },
            MetaTag::name("description", &self.description),
            MetaTag::name("viewport", "width=device-width, initial-scale=1"),
            MetaTag::CharSet {
                char_set: "utf-8".to_string(),
            },
        ];

        if let Some(keywords) = &self.keywords {
            tags.push(MetaTag::name("keywords", keywords));
        }
        if let Some(canonical) = &self.canonical {
            tags.push(MetaTag::Link {
                tag_name: "link".to_string(),
                rel: "canonical".to_string(),
                href: canonical.clone(),
            });
        }
        tags.push(MetaTag::name(
            "robots",
            if self.no_index {
                "noindex, nofollow"
            } else {
                "index, follow"
            },
        ));

        tags.push(MetaTag::property("og:title", &self.title));
        tags.push(MetaTag::property("og:description", &self.description));
        tags.push(MetaTag::property("og:type", self.page_type.as_str()));
        tags.push(MetaTag::property(
            "og:site_name",
            self.site_name.clone().unwrap_or_default(),
        ));
        if let Some(image) = &self.image {
            tags.push(MetaTag::property("og:image", image));
        }
        if let Some(url) = &self.url {
            tags.push(MetaTag::property("og:url", url));
        }

        tags.push(MetaTag::name("twitter:card", self.twitter_card.as_str()));
        tags.push(MetaTag::name("twitter:title", &self.title));
        tags.push(MetaTag::name("twitter:description", &self.description));
        if let Some(image) = &self.image {
            tags.push(MetaTag::name("twitter:image", image));
        }

        tags.push(MetaTag::name("theme-color", "#000000"));
        tags.push(MetaTag::name("color-scheme", "light dark"));
        tags.push(MetaTag::name("format-detection", "telephone=no"));

        tags
    }
}

#[must_use]
pub fn auth_page_keywords() -> &'static str {
    AUTH_KEYWORDS
}

/// Who the pages belong to and where they are served from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Site {
    pub name: String,
    pub company: String,
    pub base_url: String,
}

impl Site {
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

#[derive(ToSchema, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthPage {
    Login,
    Register,
    Reset,
}

impl AuthPage {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/auth/login",
            Self::Register => "/auth/register",
            Self::Reset => "/auth/reset",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Login => "Sign In",
            Self::Register => "Sign Up",
            Self::Reset => "Reset Password",
        }
    }

    #[must_use]
    pub fn description(self, company: &str) -> String {
        match self {
            Self::Login => format!(
                "Securely access your {company} account. Enter your credentials to sign in and manage your profile, settings, and data."
            ),
            Self::Register => format!(
                "Securely access your {company} account. Enter your credentials to sign up and manage your profile, settings, and data."
            ),
            Self::Reset => format!(
                "Reset your {company} account password. Enter your email to receive a secure link for password recovery and account access."
            ),
        }
    }

    #[must_use]
    pub fn seo(self, site: &Site) -> SeoConfig {
        let url = site.url_for(self.path());
        SeoConfig::new(self.title(), self.description(&site.company))
            .with_keywords(auth_page_keywords())
            .with_url(url.clone())
            .with_canonical(url)
            .with_page_type(PageType::Website)
            .with_site_name(Some(site.name.clone()))
    }
}

impl fmt::Display for AuthPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::Reset => "reset",
        })
    }
}

impl FromStr for AuthPage {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "login" => Ok(Self::Login),
            "register" => Ok(Self::Register),
            "reset" => Ok(Self::Reset),
            other => Err(format!("unknown page: {other}")),
        }
    }
}

/// JSON-LD describing the sign-in page.
#[must_use]
pub fn login_structured_data(site: &Site) -> Value {
    let name = &site.name;
    let origin = site.base_url.trim_end_matches('/');
    let page_url = site.url_for(AuthPage::Login.path());

    json!({
        "@context": "https://schema.org",
        "@type": "WebPage",
        "name": format!("Sign In - {name}"),
        "description": format!(
            "Secure login page for {name}. Access your account with your email and password."
        ),
        "url": page_url,
        "isPartOf": {
            "@type": "WebSite",
            "name": name,
            "url": origin,
        },
        "mainEntity": {
            "@type": "WebApplication",
            "name": format!("{name} Login"),
            "applicationCategory": "BusinessApplication",
            "operatingSystem": "Web Browser",
        },
        "breadcrumb": {
            "@type": "BreadcrumbList",
            "itemListElement": [
                {
                    "@type": "ListItem",
                    "position": 1,
                    "name": "Home",
                    "item": origin,
                },
                {
                    "@type": "ListItem",
                    "position": 2,
                    "name": "Sign In",
                    "item": page_url,
                },
            ],
        },
    })
}
