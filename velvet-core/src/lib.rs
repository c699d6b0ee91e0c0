mod auth;
mod clubs;
mod config;
mod db;
mod events;
mod guestlist;
mod storage;
mod tokens;
mod util;

use std::sync::Arc;

pub use auth::*;
pub use clubs::*;
pub use config::*;
pub use db::*;
pub use events::*;
pub use guestlist::*;
pub use storage::*;
pub use tokens::*;

/// The velvet system, wiring authentication, the resource services, and the
/// storage delegate together over a database implementation.
pub struct Velvet<Db> {
    pub auth: Auth<Db>,
    pub clubs: ClubService<Db>,
    pub events: EventService<Db>,
    pub storage: StorageClient,
}

impl<Db> Velvet<Db>
where
    Db: Database,
{
    pub fn new(database: Db, config: &Config) -> std::result::Result<Self, StorageError> {
        let database = Arc::new(database);
        let storage = StorageClient::new(&config.storage)?;

        Ok(Self {
            auth: Auth::new(&database, TokenService::new(&config.token_secret)),
            clubs: ClubService::new(&database),
            events: EventService::new(&database),
            storage,
        })
    }
}
