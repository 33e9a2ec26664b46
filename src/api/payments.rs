//! Payment endpoints

use axum::{
    Json,
    extract::{Extension, Path, State},
    response::{IntoResponse, Response},
};
use http::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ApiResult, ValidJson, parse_uuid};
use crate::auth::CurrentUser;
use crate::db::payments::{self, Payment, PaymentOutcome};
use crate::error::{ApiResponse, AppError, ErrorCode, ServiceError};
use crate::state::AppState;
use crate::util::now_millis;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaymentMethod {
    #[default]
    Upi,
    CreditCard,
    DebitCard,
    NetBanking,
    Wallet,
}

impl PaymentMethod {
    /// Accepted wire values; anything else is an invalid-method error
    /// rather than a deserialization failure, so the envelope stays intact
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw {
            "UPI" => Ok(PaymentMethod::Upi),
            "CREDIT_CARD" => Ok(PaymentMethod::CreditCard),
            "DEBIT_CARD" => Ok(PaymentMethod::DebitCard),
            "NET_BANKING" => Ok(PaymentMethod::NetBanking),
            "WALLET" => Ok(PaymentMethod::Wallet),
            _ => Err(AppError::new(ErrorCode::PaymentInvalidMethod)
                .with_details(serde_json::json!({ "field": "method" }))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Upi => "UPI",
            PaymentMethod::CreditCard => "CREDIT_CARD",
            PaymentMethod::DebitCard => "DEBIT_CARD",
            PaymentMethod::NetBanking => "NET_BANKING",
            PaymentMethod::Wallet => "WALLET",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub order_id: String,
    pub method: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub order_number: String,
    pub order_status: String,
    pub total: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusView {
    pub payment: Option<Payment>,
    pub payment_status: String,
    pub order_details: OrderDetails,
}

pub async fn create_payment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidJson(body): ValidJson<CreatePaymentRequest>,
) -> Result<Response, ServiceError> {
    let order_id = parse_uuid(&body.order_id, "orderId")?;
    let method = body
        .method
        .as_deref()
        .map(PaymentMethod::parse)
        .transpose()?
        .unwrap_or_default();

    let outcome = payments::create(
        &state.pool,
        &user.id,
        order_id,
        method.as_str(),
        now_millis(),
    )
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    match outcome {
        PaymentOutcome::Created(payment) => Ok(Json(ApiResponse::success_with_message(
            payment,
            "Payment completed successfully",
        ))
        .into_response()),
        PaymentOutcome::Duplicate(existing) => Ok((
            StatusCode::CONFLICT,
            Json(ApiResponse::failure_with_data(
                existing,
                ErrorCode::PaymentAlreadyExists.message(),
            )),
        )
            .into_response()),
    }
}

/// Payment status for an order. An order without a payment is a normal
/// read, reported as `not_initiated`.
pub async fn payment_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(order_id): Path<String>,
) -> ApiResult<PaymentStatusView> {
    let order_id = parse_uuid(&order_id, "orderId")?;

    let (order, payment) = payments::find_for_order(&state.pool, &user.id, order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let payment_status = payment
        .as_ref()
        .map(|p| p.status.clone())
        .unwrap_or_else(|| payments::status::NOT_INITIATED.to_string());

    Ok(Json(ApiResponse::success(PaymentStatusView {
        payment,
        payment_status,
        order_details: OrderDetails {
            order_number: order.order_number,
            order_status: order.status,
            total: order.total,
        },
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_defaults_to_upi() {
        let body: CreatePaymentRequest =
            serde_json::from_str(r#"{"orderId": "c56a4180-65aa-42ec-a945-5fd21dec0538"}"#).unwrap();
        assert!(body.method.is_none());
        assert_eq!(PaymentMethod::default(), PaymentMethod::Upi);
        assert_eq!(PaymentMethod::default().as_str(), "UPI");
    }

    #[test]
    fn test_method_parses_all_wire_values() {
        for raw in ["UPI", "CREDIT_CARD", "DEBIT_CARD", "NET_BANKING", "WALLET"] {
            let method = PaymentMethod::parse(raw).unwrap();
            assert_eq!(method.as_str(), raw);
        }
    }

    #[test]
    fn test_method_rejects_unknown() {
        let err = PaymentMethod::parse("CASH").unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentInvalidMethod);

        assert!(PaymentMethod::parse("upi").is_err());
    }
}
