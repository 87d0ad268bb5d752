//! Checkout Handlers
//!
//! Maps the browser-facing checkout form onto a workflow run, and forwards
//! run-scoped calls. The session identifier returned here is the key the
//! browser later uses to open its event stream.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;
use tracing::{info, instrument};

use super::types::{CheckoutError, CheckoutRequest, InterruptRequest, UserInteractionRequest};
use crate::api::AppState;
use crate::upstream::{postcode, RunSession};

const BOOTS_WORKFLOW_ID: &str = "873b7626-a85d-48fe-834f-a9346e4b6b81";
const ELF_WORKFLOW_ID: &str = "383c77ff-1873-4793-aeab-eeaa112d6b04";

/// Workflow to run for a merchant, if the merchant is supported.
fn workflow_for_merchant(merchant: &str) -> Option<&'static str> {
    match merchant {
        "boots" => Some(BOOTS_WORKFLOW_ID),
        "e.l.f. Cosmetics" => Some(ELF_WORKFLOW_ID),
        _ => None,
    }
}

/// Whether the merchant's workflow needs county fields resolved from
/// postcodes.
fn requires_county(merchant: &str) -> bool {
    merchant == "e.l.f. Cosmetics"
}

/// Build the named input variables for a checkout run.
fn build_run_variables(req: &CheckoutRequest) -> serde_json::Map<String, Value> {
    let mut variables = serde_json::Map::new();
    let mut put = |key: &str, value: Value| {
        variables.insert(key.to_owned(), value);
    };

    put("$BOOTS_LINK", Value::String(req.boots_link.clone()));
    put("$STORED_PRICE", Value::String(req.stored_price.clone()));
    put("$FIRST_NAME", Value::String(req.first_name.clone()));
    put("$LAST_NAME", Value::String(req.last_name.clone()));
    put("$EMAIL", Value::String(req.email.clone()));
    put("$PHONE", Value::String(req.phone.clone()));
    put(
        "$SHIPPING_HOUSE_NUMBER",
        Value::String(req.shipping_house_number.clone()),
    );
    put(
        "$SHIPPING_STREET_NAME",
        Value::String(req.shipping_street_name.clone()),
    );
    put(
        "$SHIPPING_POSTCODE",
        Value::String(req.shipping_postcode.clone()),
    );
    put("$SHIPPING_CITY", Value::String(req.shipping_city.clone()));
    put("$SAME_AS_SHIPPING", Value::Bool(req.same_as_shipping));
    put(
        "$BILLING_FIRST_NAME",
        Value::String(req.billing_first_name.clone()),
    );
    put(
        "$BILLING_LAST_NAME",
        Value::String(req.billing_last_name.clone()),
    );
    put(
        "$BILLING_ADDRESS",
        Value::String(req.billing_address.clone()),
    );
    put(
        "$BILLING_POSTCODE",
        Value::String(req.billing_postcode.clone()),
    );
    put("$BILLING_CITY", Value::String(req.billing_city.clone()));
    put("$CARD_HOLDER", Value::String(req.card_holder.clone()));
    put("$CARD_BIN", Value::String(req.card_bin.clone()));
    put("$CARD_NUMBER", Value::String(req.card_number.clone()));
    put(
        "$CARD_EXPIRY_YEAR",
        Value::String(req.card_expiry_year.clone()),
    );
    put(
        "$CARD_EXPIRY_MONTH",
        Value::String(req.card_expiry_month.clone()),
    );
    put("$CARD_CVV", Value::String(req.card_cvv.clone()));

    variables
}

/// POST /checkout
#[instrument(skip_all, fields(merchant = %req.merchant))]
pub async fn trigger_checkout(
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<RunSession>, CheckoutError> {
    if req.card_holder.trim().is_empty() || req.card_bin.trim().is_empty() {
        return Err(CheckoutError::Validation(
            "Card holder and bin are required".into(),
        ));
    }

    let workflow_id =
        workflow_for_merchant(&req.merchant).ok_or(CheckoutError::UnsupportedMerchant)?;

    let mut variables = build_run_variables(&req);

    if requires_county(&req.merchant) {
        let shipping_county = postcode::lookup_county(state.workflow.http(), &req.shipping_postcode)
            .await
            .ok_or_else(|| {
                CheckoutError::Validation("Please check your shipping postcode".into())
            })?;

        let billing_county = if req.same_as_shipping {
            String::new()
        } else {
            postcode::lookup_county(state.workflow.http(), &req.billing_postcode)
                .await
                .ok_or_else(|| {
                    CheckoutError::Validation("Please check your billing postcode".into())
                })?
        };

        variables.insert("$SHIPPING_COUNTY".into(), Value::String(shipping_county));
        variables.insert("$BILLING_COUNTY".into(), Value::String(billing_county));
    }

    let session = state.workflow.submit_run(workflow_id, &variables).await?;
    info!(session_id = %session.session_id, "Checkout run submitted");

    Ok(Json(session))
}

/// POST /`run/{session_id}/interrupt`
#[instrument(skip(state, req))]
pub async fn interrupt_run(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<InterruptRequest>,
) -> Result<Json<Value>, CheckoutError> {
    let response = state.workflow.report_failure(&session_id, &req).await?;
    Ok(Json(response))
}

/// POST /`run/{session_id}/user_interaction`
#[instrument(skip(state, req))]
pub async fn relay_user_interaction(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<UserInteractionRequest>,
) -> Result<Json<Value>, CheckoutError> {
    let response = state
        .workflow
        .relay_user_interaction(&session_id, &req.user_input)
        .await?;
    Ok(Json(response))
}
