pub mod initdb;
pub mod migrate_and_serve;
pub mod serve;

pub use initdb::init_database;
pub use migrate_and_serve::migrate_and_serve;
pub use serve::serve;

use anyhow::Result;

use crate::config::Settings;

/// Loads settings, letting command-line values win over configured ones.
pub(crate) fn resolve_settings(
    database_url: Option<String>,
    bind_address: Option<String>,
) -> Result<Settings> {
    let settings = Settings::load()?;
    Ok(Settings {
        database_url: database_url.unwrap_or(settings.database_url.clone()),
        bind_address: bind_address.unwrap_or(settings.bind_address.clone()),
        ..settings
    })
}
