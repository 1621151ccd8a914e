//! User-facing messages for HTTP status codes and portal error codes.

pub const ERR_ACCESS_DENIED: &str = "ERR_ACCESS_DENIED";
pub const ERR_UNKNOWN: &str = "ERR_UNKNOWN";

const UNKNOWN_MESSAGE: &str = "An unknown error occurred.";

/// Message for a status code such as `404` or a named code such as
/// `ERR_ACCESS_DENIED`. Unknown codes map to the `ERR_UNKNOWN` message.
#[must_use]
pub fn error_message(code: &str) -> &'static str {
    match code.trim() {
        "404" => "The requested resource was not found.",
        "500" => "Internal server error.",
        "400" => "Bad request.",
        "401" => "Unauthorized access.",
        "403" => "Forbidden access.",
        "408" => "Request timeout.",
        "429" => "Too many requests. Please try again later.",
        ERR_ACCESS_DENIED => "Access denied.",
        _ => UNKNOWN_MESSAGE,
    }
}

#[must_use]
pub fn status_message(status: u16) -> &'static str {
    error_message(&status.to_string())
}
