//! Paystack payment initiation types
//!
//! Payments are started and verified by backend functions that hold the Paystack
//! secret key; this side only builds the request and decodes the answers.
//! Paystack amounts are integers in kobo (1 naira = 100 kobo).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::decode::{DecodeError, RemoteRecord};
use crate::error::{AppError, AppResult, ErrorCode};

const KOBO_PER_NAIRA: i64 = 100;

/// Payment reference prefix
pub const REFERENCE_PREFIX: &str = "steersolo_";

/// Amount in kobo, always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub struct PaymentAmount(i64);

impl TryFrom<i64> for PaymentAmount {
    type Error = AppError;

    fn try_from(kobo: i64) -> Result<Self, Self::Error> {
        Self::from_kobo(kobo)
    }
}

impl From<PaymentAmount> for i64 {
    fn from(amount: PaymentAmount) -> Self {
        amount.0
    }
}

impl PaymentAmount {
    pub fn from_kobo(kobo: i64) -> AppResult<Self> {
        if kobo <= 0 {
            return Err(AppError::with_message(
                ErrorCode::PaymentInvalidAmount,
                format!("Amount must be positive, got {kobo} kobo"),
            ));
        }
        Ok(Self(kobo))
    }

    /// Convert a naira amount; at most two decimal places
    pub fn from_naira(naira: Decimal) -> AppResult<Self> {
        let kobo = naira
            .checked_mul(Decimal::from(KOBO_PER_NAIRA))
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::PaymentInvalidAmount,
                    format!("Amount {naira} is out of range"),
                )
            })?;
        if !kobo.fract().is_zero() {
            return Err(AppError::with_message(
                ErrorCode::PaymentInvalidAmount,
                format!("Amount {naira} has more than two decimal places"),
            ));
        }
        let kobo = kobo.to_i64().ok_or_else(|| {
            AppError::with_message(
                ErrorCode::PaymentInvalidAmount,
                format!("Amount {naira} is out of range"),
            )
        })?;
        Self::from_kobo(kobo)
    }

    pub fn kobo(&self) -> i64 {
        self.0
    }

    pub fn naira(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

/// Shop-owner subscription plans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPlan {
    Monthly,
    Yearly,
}

impl SubscriptionPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionPlan::Monthly => "monthly",
            SubscriptionPlan::Yearly => "yearly",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "monthly" => Ok(SubscriptionPlan::Monthly),
            "yearly" => Ok(SubscriptionPlan::Yearly),
            other => Err(AppError::with_message(
                ErrorCode::PlanNotFound,
                format!("Unknown subscription plan: {other}"),
            )),
        }
    }

    /// 价格 (kobo)
    pub fn amount(&self) -> PaymentAmount {
        match self {
            SubscriptionPlan::Monthly => PaymentAmount(100_000),
            SubscriptionPlan::Yearly => PaymentAmount(1_000_000),
        }
    }

    /// Price in naira
    pub fn price_naira(&self) -> Decimal {
        self.amount().naira()
    }
}

/// New unique transaction reference
pub fn generate_reference() -> String {
    format!("{REFERENCE_PREFIX}{}", uuid::Uuid::new_v4().simple())
}

/// Body sent to the payment-initialize function
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInitRequest {
    pub email: String,
    /// Kobo
    pub amount: PaymentAmount,
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<SubscriptionPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

impl PaymentInitRequest {
    pub fn new(email: impl Into<String>, amount: PaymentAmount) -> Self {
        Self {
            email: email.into(),
            amount,
            reference: generate_reference(),
            plan: None,
            callback_url: None,
            metadata: HashMap::new(),
        }
    }

    /// Subscription checkout for `plan`, tagged with the paying user
    pub fn for_subscription(
        email: impl Into<String>,
        user_id: impl Into<String>,
        plan: SubscriptionPlan,
    ) -> Self {
        let mut req = Self::new(email, plan.amount());
        req.plan = Some(plan);
        req.metadata
            .insert("user_id".into(), Value::String(user_id.into()));
        req.metadata
            .insert("plan".into(), Value::String(plan.as_str().into()));
        req
    }

    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation(format!(
                "Invalid payer email: {:?}",
                self.email
            )));
        }
        if self.amount.kobo() <= 0 {
            return Err(AppError::with_message(
                ErrorCode::PaymentInvalidAmount,
                format!("Amount must be positive, got {} kobo", self.amount.kobo()),
            ));
        }
        if self.reference.is_empty() {
            return Err(AppError::validation("Payment reference must not be empty"));
        }
        Ok(())
    }
}

/// Answer of the payment-initialize function
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInitResponse {
    /// Paystack checkout page the user is sent to
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

impl RemoteRecord for PaymentInitResponse {
    const ENTITY: &'static str = "payment_init";

    fn validate(&self) -> Result<(), DecodeError> {
        if !self.authorization_url.starts_with("https://") {
            return Err(DecodeError::invalid_value(
                Self::ENTITY,
                "authorization_url",
                format!("expected an https URL, got {:?}", self.authorization_url),
            ));
        }
        Ok(())
    }
}

/// Transaction status reported by Paystack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOutcome {
    Success,
    Failed,
    Abandoned,
    Pending,
    #[serde(other)]
    Unknown,
}

/// Answer of the payment-verify function
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentVerification {
    pub reference: String,
    pub status: PaymentOutcome,
    /// Kobo
    pub amount: i64,
    pub paid_at: Option<DateTime<Utc>>,
}

impl PaymentVerification {
    pub fn is_successful(&self) -> bool {
        self.status == PaymentOutcome::Success
    }
}

impl RemoteRecord for PaymentVerification {
    const ENTITY: &'static str = "payment_verification";

    fn validate(&self) -> Result<(), DecodeError> {
        if self.amount < 0 {
            return Err(DecodeError::invalid_value(
                Self::ENTITY,
                "amount",
                "must not be negative",
            ));
        }
        Ok(())
    }
}
