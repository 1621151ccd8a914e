use super::handlers::{auth, health, loading, seo, theme};
use utoipa::openapi::{Contact, InfoBuilder, License, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Router that also drives the `OpenAPI` document.
///
/// Register endpoints here via `.routes(routes!(...))` so they are both served
/// and documented.
pub(crate) fn api_router() -> OpenApiRouter {
    let mut doc = cargo_openapi();
    doc.tags = Some(vec![
        tag("health", "Liveness and build information"),
        tag("auth", "Sign-in, sign-up and password-reset form actions"),
        tag("loading", "Global loading indicator"),
        tag("seo", "Meta descriptors and crawler files"),
        tag("preferences", "Theme preference"),
    ]);

    OpenApiRouter::with_openapi(doc)
        .routes(routes!(health::health))
        .routes(routes!(auth::login))
        .routes(routes!(auth::register))
        .routes(routes!(auth::reset))
        .routes(routes!(loading::combined))
        .routes(routes!(loading::state))
        .routes(routes!(seo::robots_txt))
        .routes(routes!(seo::sitemap_xml))
        .routes(routes!(seo::page))
        .routes(routes!(theme::get_theme, theme::put_theme))
}

fn tag(name: &str, description: &str) -> Tag {
    let mut tag = Tag::new(name);
    tag.description = Some(description.to_string());
    tag
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(optional_str(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    info.contact = cargo_contact();
    info.license = cargo_license();

    OpenApiBuilder::new().info(info).build()
}

fn cargo_contact() -> Option<Contact> {
    // Cargo authors are `;` separated and may include "Name <email>".
    let authors = env!("CARGO_PKG_AUTHORS");
    let primary = authors.split(';').next().map(str::trim)?;
    if primary.is_empty() {
        return None;
    }

    let (name, email) = parse_author(primary);
    if name.is_none() && email.is_none() {
        return None;
    }

    let mut contact = Contact::new();
    contact.name = name.map(str::to_string);
    contact.email = email.map(str::to_string);
    Some(contact)
}

fn cargo_license() -> Option<License> {
    let identifier = optional_str(env!("CARGO_PKG_LICENSE"))?;
    let mut license = License::new(identifier);
    license.identifier = Some(identifier.to_string());
    Some(license)
}

fn parse_author(author: &str) -> (Option<&str>, Option<&str>) {
    let Some((name, rest)) = author.split_once('<') else {
        return (optional_str(author), None);
    };
    let email = rest.split_once('>').map(|(email, _)| email.trim());
    (optional_str(name.trim()), email.and_then(optional_str))
}

fn optional_str(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
