//! Sign-in, sign-up and password-reset form actions.
//!
//! Valid submissions wait for the simulated backend inside a loading episode,
//! then redirect to the dashboard. Invalid ones return the field errors.

use crate::{
    cli::globals::GlobalArgs,
    forms::{FormErrors, LoginForm, RegisterForm, ResetForm},
    loading::LoadingStore,
};
use axum::{
    Form, Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use tracing::{Instrument, debug, info_span};
use utoipa::ToSchema;

pub const DASHBOARD_PATH: &str = "/dashboard";
pub const SIGNING_IN_TEXT: &str = "Signing in...";
pub const CREATING_ACCOUNT_TEXT: &str = "Creating account...";
pub const SENDING_RESET_TEXT: &str = "Sending reset link...";

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct FormErrorResponse {
    pub errors: FormErrors,
}

fn invalid(errors: FormErrors) -> Response {
    debug!(fields = errors.len(), "form rejected");
    (StatusCode::BAD_REQUEST, Json(FormErrorResponse { errors })).into_response()
}

async fn simulate(store: &LoadingStore, delay: Duration, text: &'static str) -> Response {
    let span = info_span!("auth.simulate", loading_text = text, delay_ms = delay.as_millis());
    store
        .with_loading(Some(text), tokio::time::sleep(delay))
        .instrument(span)
        .await;
    Redirect::to(DASHBOARD_PATH).into_response()
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Signed in, redirect to the dashboard"),
        (status = 400, description = "Invalid form fields", body = FormErrorResponse),
    ),
    tag = "auth"
)]
pub async fn login(
    store: Extension<LoadingStore>,
    globals: Extension<Arc<GlobalArgs>>,
    payload: Option<Form<LoginForm>>,
) -> Response {
    let form = payload.map(|Form(form)| form).unwrap_or_default();
    match form.validate() {
        Ok(submission) => {
            debug!(remember = submission.remember, "login accepted");
            simulate(&store, globals.auth_delay, SIGNING_IN_TEXT).await
        }
        Err(errors) => invalid(errors),
    }
}

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Account created, redirect to the dashboard"),
        (status = 400, description = "Invalid form fields", body = FormErrorResponse),
    ),
    tag = "auth"
)]
pub async fn register(
    store: Extension<LoadingStore>,
    globals: Extension<Arc<GlobalArgs>>,
    payload: Option<Form<RegisterForm>>,
) -> Response {
    let form = payload.map(|Form(form)| form).unwrap_or_default();
    match form.validate() {
        Ok(_) => simulate(&store, globals.auth_delay, CREATING_ACCOUNT_TEXT).await,
        Err(errors) => invalid(errors),
    }
}

#[utoipa::path(
    post,
    path = "/auth/reset",
    request_body(content = ResetForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Reset link sent, redirect to the dashboard"),
        (status = 400, description = "Invalid form fields", body = FormErrorResponse),
    ),
    tag = "auth"
)]
pub async fn reset(
    store: Extension<LoadingStore>,
    globals: Extension<Arc<GlobalArgs>>,
    payload: Option<Form<ResetForm>>,
) -> Response {
    let form = payload.map(|Form(form)| form).unwrap_or_default();
    match form.validate() {
        Ok(_) => simulate(&store, globals.auth_delay, SENDING_RESET_TEXT).await,
        Err(errors) => invalid(errors),
    }
}
