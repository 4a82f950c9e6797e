//! Sign-in and registration.
//!
//! Both endpoints answer with the session token in `data`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::routes;
use crate::error::ApiError;
use crate::http::{ApiClient, ApiResponse};

/// Body of `POST /user/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginParams {
    pub username: String,
    pub password: String,
}

impl LoginParams {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginParams")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /user/register`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterParams {
    pub username: String,
    pub password: String,
}

impl RegisterParams {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for RegisterParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterParams")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Sign in; `data` holds the session token.
pub async fn login(
    client: &ApiClient,
    params: &LoginParams,
) -> Result<ApiResponse<String>, ApiError> {
    client.post(routes::USER_LOGIN, params, None).await
}

/// Create an account; `data` holds the session token.
pub async fn register(
    client: &ApiClient,
    params: &RegisterParams,
) -> Result<ApiResponse<String>, ApiError> {
    client.post(routes::USER_REGISTER, params, None).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_password() {
        let params = LoginParams::new("amy", "hunter2");
        let debug = format!("{:?}", params);
        assert!(debug.contains("amy"));
        assert!(!debug.contains("hunter2"));

        let params = RegisterParams::new("amy", "hunter2");
        assert!(!format!("{:?}", params).contains("hunter2"));
    }

    #[test]
    fn test_wire_format() {
        let body = serde_json::to_value(LoginParams::new("amy", "pw")).unwrap();
        assert_eq!(body, serde_json::json!({"username": "amy", "password": "pw"}));
    }
}
