//! HTTP client for the backend's REST tables and functions

use reqwest::{Client, RequestBuilder, header};
use serde::Serialize;
use serde_json::{Value, json};
use shared::decode::{decode, decode_list, decode_optional_first};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    NewReview, NewWishlistItem, ProfileRow, Product, Review, ReviewSummary, Shop, WishlistItem,
};
use shared::payment::{PaymentInitRequest, PaymentInitResponse, PaymentVerification};
use shared::subscription::{SubscriptionStatus, calculate_subscription_status};

use crate::{ClientConfig, ClientError, ClientResult};

const PAYMENT_INIT_FUNCTION: &str = "paystack-initialize";
const PAYMENT_VERIFY_FUNCTION: &str = "paystack-verify";

/// Client for the SteerSolo backend
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    config: ClientConfig,
}

impl BackendClient {
    /// Create a new client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Set the signed-in user's access token
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.config.access_token = Some(token.into());
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Attach `apikey` and bearer headers
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .config
            .access_token
            .as_deref()
            .unwrap_or(&self.config.anon_key);
        request
            .header("apikey", &self.config.anon_key)
            .header(header::AUTHORIZATION, format!("Bearer {bearer}"))
    }

    // ========== Transport ==========

    async fn select(&self, table: &str, query: &[(&str, String)]) -> ClientResult<Value> {
        let url = self.config.rest_url(table);
        tracing::debug!(table, "GET {url}");
        let request = self.authorize(self.client.get(&url).query(query));
        Self::handle_response(request.send().await?).await
    }

    async fn insert<B: Serialize>(&self, table: &str, body: &B) -> ClientResult<Value> {
        let url = self.config.rest_url(table);
        tracing::debug!(table, "POST {url}");
        let request = self
            .authorize(self.client.post(&url).json(body))
            .header("Prefer", "return=representation");
        Self::handle_response(request.send().await?).await
    }

    async fn delete(&self, table: &str, query: &[(&str, String)]) -> ClientResult<Value> {
        let url = self.config.rest_url(table);
        tracing::debug!(table, "DELETE {url}");
        let request = self
            .authorize(self.client.delete(&url).query(query))
            .header("Prefer", "return=representation");
        Self::handle_response(request.send().await?).await
    }

    async fn invoke<B: Serialize>(&self, function: &str, body: &B) -> ClientResult<Value> {
        let url = self.config.function_url(function);
        tracing::debug!(function, "POST {url}");
        let request = self.authorize(self.client.post(&url).json(body));
        Self::handle_response(request.send().await?).await
    }

    /// Map error statuses, parse success bodies (empty body → `null`)
    async fn handle_response(response: reqwest::Response) -> ClientResult<Value> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), body = %text, "Backend request failed");
            return Err(ClientError::from_status(status, text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| ClientError::InvalidResponse(format!("body is not JSON: {e}")))
    }

    // ========== Profiles & subscription ==========

    /// Fetch a user's profile row, `None` if the user has no profile
    pub async fn fetch_profile(&self, user_id: &str) -> ClientResult<Option<ProfileRow>> {
        let rows = self
            .select(
                "profiles",
                &[("id", format!("eq.{user_id}")), ("select", "*".into())],
            )
            .await?;
        Ok(decode_optional_first(rows)?)
    }

    /// Fresh subscription status for a user
    ///
    /// A user without a profile row is reported as expired. A profile row that
    /// fails to decode (e.g. an unparseable `subscription_expires_at`) is
    /// returned as [`ClientError::Decode`], not folded into expired.
    pub async fn subscription_status(&self, user_id: &str) -> ClientResult<SubscriptionStatus> {
        let profile = self.fetch_profile(user_id).await?;
        if profile.is_none() {
            tracing::warn!(user_id, "No profile found, treating subscription as expired");
        }
        let facts = profile.as_ref().map(ProfileRow::subscription_facts);
        let status = calculate_subscription_status(facts.as_ref());
        tracing::info!(
            user_id,
            status = %status.status,
            days_remaining = status.days_remaining,
            "Subscription status computed"
        );
        Ok(status)
    }

    /// Whether shop-owner features should be shown to a user
    ///
    /// Missing profiles give `Ok(false)`; decode and transport failures surface
    /// as `Err` rather than `false`, so callers choose how to present them.
    pub async fn can_access_shop_features(&self, user_id: &str) -> ClientResult<bool> {
        Ok(self
            .subscription_status(user_id)
            .await?
            .can_access_shop_features())
    }

    // ========== Shops & products ==========

    /// Look up an active shop by its public slug
    pub async fn get_shop_by_slug(&self, slug: &str) -> ClientResult<Option<Shop>> {
        let rows = self
            .select(
                "shops",
                &[
                    ("shop_slug", format!("eq.{slug}")),
                    ("is_active", "eq.true".into()),
                    ("select", "*".into()),
                ],
            )
            .await?;
        Ok(decode_optional_first(rows)?)
    }

    /// Products a shop currently offers, by name
    pub async fn list_shop_products(&self, shop_id: &str) -> ClientResult<Vec<Product>> {
        let rows = self
            .select(
                "products",
                &[
                    ("shop_id", format!("eq.{shop_id}")),
                    ("is_available", "eq.true".into()),
                    ("select", "*".into()),
                    ("order", "name.asc".into()),
                ],
            )
            .await?;
        Ok(decode_list(rows)?)
    }

    // ========== Reviews ==========

    /// Reviews of a product, newest first
    pub async fn list_product_reviews(&self, product_id: &str) -> ClientResult<Vec<Review>> {
        let rows = self
            .select(
                "reviews",
                &[
                    ("product_id", format!("eq.{product_id}")),
                    ("select", "*".into()),
                    ("order", "created_at.desc".into()),
                ],
            )
            .await?;
        Ok(decode_list(rows)?)
    }

    pub async fn review_summary(&self, product_id: &str) -> ClientResult<ReviewSummary> {
        let reviews = self.list_product_reviews(product_id).await?;
        Ok(ReviewSummary::from_reviews(&reviews))
    }

    /// Submit a review; the payload is checked before anything is sent
    pub async fn submit_review(&self, review: &NewReview) -> ClientResult<Review> {
        review
            .validate()
            .map_err(|msg| AppError::with_message(ErrorCode::ReviewInvalidRating, msg))?;

        let rows = self.insert("reviews", review).await?;
        decode_optional_first(rows)?
            .ok_or_else(|| ClientError::InvalidResponse("insert returned no review row".into()))
    }

    // ========== Wishlist ==========

    pub async fn list_wishlist(&self, customer_id: &str) -> ClientResult<Vec<WishlistItem>> {
        let rows = self
            .select(
                "wishlists",
                &[
                    ("customer_id", format!("eq.{customer_id}")),
                    ("select", "*".into()),
                    ("order", "created_at.desc".into()),
                ],
            )
            .await?;
        Ok(decode_list(rows)?)
    }

    /// Save a product; a product already saved yields `WishlistDuplicate`
    pub async fn add_to_wishlist(
        &self,
        customer_id: &str,
        product_id: &str,
    ) -> ClientResult<WishlistItem> {
        let item = NewWishlistItem {
            customer_id: customer_id.to_string(),
            product_id: product_id.to_string(),
        };
        let rows = match self.insert("wishlists", &item).await {
            Ok(rows) => rows,
            Err(ClientError::Conflict(_)) => {
                return Err(AppError::new(ErrorCode::WishlistDuplicate)
                    .with_detail("product_id", product_id)
                    .into());
            }
            Err(e) => return Err(e),
        };
        decode_optional_first(rows)?
            .ok_or_else(|| ClientError::InvalidResponse("insert returned no wishlist row".into()))
    }

    /// Returns whether a saved product was actually removed
    pub async fn remove_from_wishlist(
        &self,
        customer_id: &str,
        product_id: &str,
    ) -> ClientResult<bool> {
        let rows = self
            .delete(
                "wishlists",
                &[
                    ("customer_id", format!("eq.{customer_id}")),
                    ("product_id", format!("eq.{product_id}")),
                ],
            )
            .await?;
        Ok(!decode_list::<WishlistItem>(rows)?.is_empty())
    }

    // ========== Payments ==========

    /// Start a Paystack checkout through the backend function
    pub async fn initialize_payment(
        &self,
        request: &PaymentInitRequest,
    ) -> ClientResult<PaymentInitResponse> {
        request.validate()?;
        let value = match self.invoke(PAYMENT_INIT_FUNCTION, request).await {
            Ok(value) => value,
            Err(ClientError::Backend { status, body }) => {
                return Err(AppError::with_message(ErrorCode::PaymentInitFailed, body)
                    .with_detail("status", status)
                    .into());
            }
            Err(e) => return Err(e),
        };
        let response: PaymentInitResponse = decode(value)?;
        tracing::info!(reference = %response.reference, "Payment initialized");
        Ok(response)
    }

    /// Ask the backend function to verify a transaction reference
    pub async fn verify_payment(&self, reference: &str) -> ClientResult<PaymentVerification> {
        let value = match self
            .invoke(PAYMENT_VERIFY_FUNCTION, &json!({ "reference": reference }))
            .await
        {
            Ok(value) => value,
            Err(ClientError::NotFound(_)) => {
                return Err(AppError::new(ErrorCode::PaymentReferenceNotFound)
                    .with_detail("reference", reference)
                    .into());
            }
            Err(e) => return Err(e),
        };
        let verification: PaymentVerification = decode(value)?;
        tracing::info!(
            reference,
            status = ?verification.status,
            "Payment verified"
        );
        Ok(verification)
    }
}
