use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use careworks_api::auth::{AppState, AppStateInner};
use careworks_api::routes;
use careworks_gateway::paypal::{self, PaypalClient};
use careworks_gateway::stripe::StripeClient;
use careworks_store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "careworks=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let host = std::env::var("CAREWORKS_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("CAREWORKS_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // A missing gateway credential disables that rail; the rest of the API
    // stays up and its endpoints answer with a configuration error.
    let stripe = match std::env::var("STRIPE_SECRET_KEY") {
        Ok(key) => Some(StripeClient::new(key)),
        Err(_) => {
            warn!("STRIPE_SECRET_KEY not set; card payments disabled");
            None
        }
    };
    let paypal = match (
        std::env::var("PAYPAL_CLIENT_ID"),
        std::env::var("PAYPAL_CLIENT_SECRET"),
    ) {
        (Ok(client_id), Ok(client_secret)) => {
            let base_url = std::env::var("PAYPAL_BASE_URL")
                .unwrap_or_else(|_| paypal::SANDBOX_BASE_URL.into());
            Some(PaypalClient::new(client_id, client_secret, base_url))
        }
        _ => {
            warn!("PAYPAL_CLIENT_ID/PAYPAL_CLIENT_SECRET not set; PayPal payments disabled");
            None
        }
    };

    // Shared state: store seeded with the operator accounts
    let state: AppState = Arc::new(AppStateInner {
        store: Store::new(),
        stripe,
        paypal,
    });

    let app = routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Careworks server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
