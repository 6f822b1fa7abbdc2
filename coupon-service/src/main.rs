use std::env;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use coupon_service::app::{build_router, AppState};
use coupon_service::config::CouponConfig;
use coupon_service::metrics::CouponMetrics;
use coupon_service::provider::ShopifyRuleProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .init();

    let config = CouponConfig::from_env()?;
    info!(shop = %config.shop_domain, api_version = %config.api_version, "configured rule provider");

    let provider = Arc::new(ShopifyRuleProvider::from_config(&config)?);
    let metrics = CouponMetrics::new()?;
    let state = AppState { provider, metrics };
    let app = build_router(state, &config.allowed_origins);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(8090);
    let ip: IpAddr = host.parse()?;
    let addr = SocketAddr::from((ip, port));
    println!("starting coupon-service on {addr}");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
