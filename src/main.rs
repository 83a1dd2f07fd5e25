use chrono::Utc;
use dotenvy::dotenv;
use order_ledger::config::{database, ledger};
use order_ledger::core::order::Game;
use order_ledger::core::report::{Dashboard, generate_table};
use order_ledger::core::session;
use order_ledger::core::store::OrderStore;
use order_ledger::errors::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load display settings
    let config = ledger::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Open the database and make sure the storage table exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Nothing is shown without a session
    session::require_login(&db).await?;

    // 6. Load the ledger and render it
    let store = OrderStore::load(db)
        .await?
        .with_filters(config.filters.to_filters());

    let now = Utc::now();
    println!("{}", Dashboard::from_orders(store.all()));
    for game in Game::ALL {
        println!();
        print!("{}", generate_table(&store, game, now, &config));
    }

    Ok(())
}
