use std::sync::Arc;

use tracing::info;

use citypay::api::{self, AppState};
use citypay::config::Config;
use citypay::domain::payment::GatewayClient;
use citypay::identity::UuidRef;
use citypay::store::postgres::{PgInvoiceLedger, PgOwnerDirectory, PgPropertyCatalog};
use citypay::ussd::executor::Executor;
use citypay::ussd::screens::{payment_menu, ScreenDeps};
use citypay::ussd::service::DialogService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "citypay=info,tower_http=debug".into()),
        )
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env();

    info!("Connecting to database: {}", config.database_url);
    let pool = sqlx::PgPool::connect(&config.database_url).await?;

    let deps = ScreenDeps {
        owners: Arc::new(PgOwnerDirectory::new(pool.clone())),
        properties: Arc::new(PgPropertyCatalog::new(pool.clone())),
        invoices: Arc::new(PgInvoiceLedger::new(pool)),
        payment: Arc::new(GatewayClient::new(config.gateway_url.clone())),
    };

    // The menu is built once, before the listener accepts anything; from
    // here on it is traversed read-only.
    let menu = payment_menu(deps);
    let executor = Executor::new(Arc::new(menu), &config.ussd_prefix);
    let dialog = Arc::new(DialogService::new(executor, Arc::new(UuidRef)));

    let app = api::router(AppState { dialog });

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
