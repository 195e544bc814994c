use anyhow::Result;
use tracing::{debug, error, info, trace};

use super::initdb::apply_migrations;
use super::resolve_settings;
use super::serve::run;
use crate::config::initialize_app_state;
use crate::router::create_router;

pub async fn migrate_and_serve(database_url: Option<String>, bind_address: Option<String>) -> Result<()> {
    trace!("Entering migrate_and_serve function");
    info!("Applying database migrations and starting server");

    let settings = resolve_settings(database_url, bind_address)?;
    debug!("Database URL: {}", settings.database_url);
    debug!("Bind address: {}", settings.bind_address);
    let bind_address = settings.bind_address.clone();

    apply_migrations(&settings.database_url).await?;

    // Initialize application state
    trace!("Initializing application state");
    let state = match initialize_app_state(settings).await {
        Ok(state) => {
            debug!("Application state initialized successfully");
            state
        }
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            return Err(e);
        }
    };

    trace!("Creating application router");
    let app = create_router(state);
    debug!("Router created successfully");

    run(app, &bind_address).await
}
