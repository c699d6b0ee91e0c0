use std::{process::exit, sync::Arc};

use log::{error, info};
use velvet_core::{Config, PgDatabase, Velvet};
use velvet_server::{init_logger, run_server, ServerContext};

#[tokio::main]
async fn main() {
    init_logger();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration is invalid: {e}");
            exit(1);
        }
    };

    let database = match PgDatabase::new(&config.database_url).await {
        Ok(database) => database,
        Err(e) => {
            error!("Database connection failed: {e}");
            exit(1);
        }
    };

    info!("Connected to database");

    let app = match Velvet::new(database, &config) {
        Ok(app) => app,
        Err(e) => {
            error!("Storage client setup failed: {e}");
            exit(1);
        }
    };

    run_server(
        &config,
        ServerContext {
            app: Arc::new(app),
        },
    )
    .await;
}
