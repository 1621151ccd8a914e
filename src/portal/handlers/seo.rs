use super::{ErrorBody, error_response};
use crate::{
    cli::globals::GlobalArgs,
    seo::{self, AuthPage, MetaTag, robots},
};
use axum::{
    Json,
    extract::{Extension, Path},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;

const ROBOTS_CACHE_CONTROL: &str = "public, max-age=86400";

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PageSeo {
    pub meta: Vec<MetaTag>,
    /// JSON-LD, only published for the sign-in page.
    #[schema(value_type = Option<Object>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_data: Option<Value>,
}

#[utoipa::path(
    get,
    path = "/robots.txt",
    responses(
        (status = 200, description = "Crawler rules", body = String, content_type = "text/plain"),
    ),
    tag = "seo"
)]
pub async fn robots_txt(globals: Extension<Arc<GlobalArgs>>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/plain")),
            (
                header::CACHE_CONTROL,
                HeaderValue::from_static(ROBOTS_CACHE_CONTROL),
            ),
        ],
        robots::robots_txt(&globals.app_url),
    )
}

#[utoipa::path(
    get,
    path = "/sitemap.xml",
    responses(
        (status = 200, description = "Public pages", body = String, content_type = "application/xml"),
    ),
    tag = "seo"
)]
pub async fn sitemap_xml(globals: Extension<Arc<GlobalArgs>>) -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/xml"),
        )],
        robots::sitemap_xml(&globals.app_url, Utc::now()),
    )
}

#[utoipa::path(
    get,
    path = "/seo/{page}",
    params(
        ("page" = String, Path, description = "login, register or reset")
    ),
    responses(
        (status = 200, description = "Meta descriptors for the page", body = PageSeo),
        (status = 404, description = "Unknown page", body = ErrorBody),
    ),
    tag = "seo"
)]
pub async fn page(globals: Extension<Arc<GlobalArgs>>, Path(page): Path<String>) -> Response {
    let Ok(page) = page.parse::<AuthPage>() else {
        return error_response(StatusCode::NOT_FOUND, ErrorBody::status(StatusCode::NOT_FOUND));
    };

    let site = globals.site();
    let structured_data = (page == AuthPage::Login).then(|| seo::login_structured_data(&site));

    Json(PageSeo {
        meta: page.seo(&site).meta(),
        structured_data,
    })
    .into_response()
}
