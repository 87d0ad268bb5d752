//! Checkout Types
//!
//! Wire types for the checkout endpoints and their error taxonomy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::upstream::UpstreamError;

/// Checkout form submitted by the browser. Unknown fields are rejected so
/// client/schema drift surfaces as a 422 instead of silently dropped data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CheckoutRequest {
    pub boots_link: String,
    pub stored_price: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub shipping_house_number: String,
    pub shipping_street_name: String,
    pub shipping_postcode: String,
    pub shipping_city: String,
    pub same_as_shipping: bool,
    pub billing_first_name: String,
    pub billing_last_name: String,
    pub billing_address: String,
    pub billing_postcode: String,
    pub billing_city: String,
    pub card_holder: String,
    pub card_bin: String,
    pub card_number: String,
    pub card_expiry_year: String,
    pub card_expiry_month: String,
    pub card_cvv: String,
    pub merchant: String,
}

/// Failure report forwarded to the workflow backend.
#[derive(Debug, Serialize, Deserialize)]
pub struct InterruptRequest {
    pub reasoning: String,
    pub full_url: String,
    pub error_code: String,
}

/// User input relayed into a running session.
#[derive(Debug, Deserialize)]
pub struct UserInteractionRequest {
    #[serde(rename = "userInput")]
    pub user_input: serde_json::Value,
}

/// Checkout endpoint errors.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("{0}")]
    Validation(String),

    #[error("Merchant not supported")]
    UnsupportedMerchant,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl IntoResponse for CheckoutError {
    fn into_response(self) -> Response {
        use serde_json::json;

        let (status, code, message) = match &self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION", msg.clone()),
            Self::UnsupportedMerchant => (
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_MERCHANT",
                self.to_string(),
            ),
            Self::Upstream(err) => {
                tracing::error!("Workflow backend error: {}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "Workflow backend request failed".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_request_rejects_unknown_fields() {
        let body = r#"{
            "bootsLink": "https://example.com/item",
            "unexpected": true
        }"#;

        let err = serde_json::from_str::<CheckoutRequest>(body).unwrap_err();
        assert!(err.to_string().contains("unexpected"));
    }

    #[test]
    fn user_interaction_unwraps_user_input() {
        let body = r#"{ "userInput": { "code": "123456" } }"#;
        let req: UserInteractionRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.user_input["code"], "123456");
    }
}
