use super::*;
use std::error::Error as StdError;

#[test]
fn test_api_error_passes_server_message_through() {
    let error = Error::ApiError("sha does not match".to_string());

    assert_eq!(error.to_string(), "sha does not match");
    assert!(error.source().is_none());
}

#[test]
fn test_invalid_credentials_error() {
    let error = Error::invalid_credentials();

    assert_eq!(
        error.to_string(),
        "Invalid credentials or repository not found"
    );
    assert!(matches!(error, Error::AuthError(_)));
}

#[test]
fn test_invalid_response_error() {
    let error = Error::InvalidResponse;

    assert_eq!(error.to_string(), "Invalid response format");
    assert!(error.source().is_none());
}

#[test]
fn test_network_error() {
    let error = Error::Network("connection refused".to_string());

    assert_eq!(error.to_string(), "Network error: connection refused");
}

#[test]
fn test_not_found_error() {
    assert_eq!(Error::NotFound.to_string(), "Resource not found");
}

#[test]
fn test_rate_limit_exceeded_error() {
    let error = Error::RateLimitExceeded;

    assert_eq!(error.to_string(), "Rate limit exceeded");
    assert!(error.source().is_none());
}

#[test]
fn test_error_is_send_sync() {
    // This test verifies that Error implements Send and Sync traits
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Error>();
}
