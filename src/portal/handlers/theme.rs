use crate::{
    cli::globals::GlobalArgs,
    forms::FormErrors,
    portal::handlers::auth::FormErrorResponse,
    theme::{
        COLOR_SCHEME_HINT, ResolvedTheme, ThemePreference, preference_from_headers, system_theme,
        theme_cookie,
    },
};
use axum::{
    Json,
    extract::Extension,
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{SET_COOKIE, VARY},
    },
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

const ACCEPT_CH: &str = "accept-ch";

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeView {
    pub theme: ThemePreference,
    pub actual_theme: ResolvedTheme,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ThemeUpdate {
    /// `dark`, `light` or `system`.
    pub theme: String,
}

fn hint_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_CH, HeaderValue::from_static(COLOR_SCHEME_HINT));
    headers.insert(
        VARY,
        HeaderValue::from_static("Cookie, Sec-CH-Prefers-Color-Scheme"),
    );
    headers
}

#[utoipa::path(
    get,
    path = "/preferences/theme",
    responses(
        (status = 200, description = "Stored preference and the theme it resolves to", body = ThemeView),
    ),
    tag = "preferences"
)]
pub async fn get_theme(headers: HeaderMap) -> impl IntoResponse {
    let theme = preference_from_headers(&headers);
    let view = ThemeView {
        theme,
        actual_theme: theme.resolve(system_theme(&headers)),
    };
    (hint_headers(), Json(view))
}

#[utoipa::path(
    put,
    path = "/preferences/theme",
    request_body = ThemeUpdate,
    responses(
        (status = 200, description = "Preference stored in the theme cookie", body = ThemeView),
        (status = 400, description = "Unknown theme", body = FormErrorResponse),
    ),
    tag = "preferences"
)]
pub async fn put_theme(
    globals: Extension<Arc<GlobalArgs>>,
    headers: HeaderMap,
    Json(update): Json<ThemeUpdate>,
) -> Response {
    let theme = match update.theme.parse::<ThemePreference>() {
        Ok(theme) => theme,
        Err(message) => {
            let mut errors = FormErrors::new();
            errors.add("theme", message);
            return (StatusCode::BAD_REQUEST, Json(FormErrorResponse { errors })).into_response();
        }
    };

    let mut response_headers = hint_headers();
    match theme_cookie(theme, &globals.cookie) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Failed to build theme cookie: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    let view = ThemeView {
        theme,
        actual_theme: theme.resolve(system_theme(&headers)),
    };
    (response_headers, Json(view)).into_response()
}
