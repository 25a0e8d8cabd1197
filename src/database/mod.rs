use anyhow::Result;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::config::Config;

pub mod memory;
pub mod models;
pub mod postgres;
pub mod repositories;
pub mod store;
pub mod transaction;
pub mod utils;

pub use memory::InMemoryStore;
pub use postgres::PgStore;
pub use store::{
    EventRoster, IdentityLookup, NotificationSink, ProfileLookup, Store, TeamStore, UnitOfWork,
};

pub async fn init_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    log::info!("Connected to database");

    if config.run_migrations {
        log::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;
        log::info!("Migrations completed successfully");
    }

    Ok(pool)
}
