use super::{ErrorBody, error_response};
use crate::loading::{CombinedLoading, LoadingState, LoadingStore, NavigationState};
use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Deserialize, IntoParams, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct LoadingQuery {
    /// Router transition state: `idle`, `loading` or `submitting`.
    pub navigation: Option<String>,
}

#[utoipa::path(
    get,
    path = "/loading",
    params(LoadingQuery),
    responses(
        (status = 200, description = "Store and navigation merged", body = CombinedLoading),
        (status = 400, description = "Unknown navigation state", body = ErrorBody),
    ),
    tag = "loading"
)]
pub async fn combined(store: Extension<LoadingStore>, Query(query): Query<LoadingQuery>) -> Response {
    let navigation = match query.navigation.as_deref() {
        None | Some("") => NavigationState::Idle,
        Some(value) => match value.parse::<NavigationState>() {
            Ok(navigation) => navigation,
            Err(message) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorBody::status(StatusCode::BAD_REQUEST).with_message(message),
                );
            }
        },
    };

    Json(store.combined(navigation)).into_response()
}

#[utoipa::path(
    get,
    path = "/loading/state",
    responses(
        (status = 200, description = "Current loading snapshot", body = LoadingState),
    ),
    tag = "loading"
)]
pub async fn state(store: Extension<LoadingStore>) -> Json<LoadingState> {
    Json(store.snapshot())
}
