//! steersolo-gate — print a user's subscription status and gating decision
//!
//! Usage: `steersolo-gate <user-id>` (or `STEERSOLO_USER_ID`).
//! Prints an `ApiResponse` JSON document and exits non-zero when the user
//! cannot access shop features or the lookup failed. With `STEERSOLO_STORE_PATH`
//! set, the report also says whether the subscription banner was dismissed.

use serde::Serialize;
use shared::error::{ApiResponse, AppError};
use steersolo_client::{ClientConfig, SubscriptionStatus};

#[derive(Serialize)]
struct GateReport {
    user_id: String,
    #[serde(flatten)]
    status: SubscriptionStatus,
    can_access_shop_features: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    subscription_banner_dismissed: Option<bool>,
}

const SUBSCRIPTION_BANNER: &str = "subscription-reminder";

#[tokio::main]
async fn main() -> std::process::ExitCode {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing (stderr, so stdout stays machine-readable)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "steersolo_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = run().await;
    if let Err(err) = &result {
        tracing::error!(code = %err.code, "{}", err.message);
    }
    let response = ApiResponse::from_result(result);

    let granted = response
        .data
        .as_ref()
        .is_some_and(|r| r.can_access_shop_features);

    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("Failed to serialize report: {e}"),
    }

    if granted {
        std::process::ExitCode::SUCCESS
    } else {
        std::process::ExitCode::FAILURE
    }
}

async fn run() -> Result<GateReport, AppError> {
    let user_id = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("STEERSOLO_USER_ID").ok())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::validation("usage: steersolo-gate <user-id>"))?;

    let config = ClientConfig::from_env()?;
    let client = config.build_client()?;

    let subscription_banner_dismissed = match config.open_preferences()? {
        Some(prefs) => Some(prefs.is_banner_dismissed(SUBSCRIPTION_BANNER)?),
        None => None,
    };

    let status = client.subscription_status(&user_id).await?;
    Ok(GateReport {
        user_id,
        can_access_shop_features: status.can_access_shop_features(),
        status,
        subscription_banner_dismissed,
    })
}
