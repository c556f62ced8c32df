pub mod config;
pub mod history;
pub mod session;
pub mod set;
pub mod template;

use repcycle_core::{Config, CoreError, Database, UserId};
use serde::Serialize;

/// Everything a user-scoped command needs.
pub struct Context {
    pub config: Config,
    pub db: Database,
    pub user: UserId,
}

impl Context {
    pub fn open(user: Option<&str>) -> Result<Self, CoreError> {
        let config = Config::load()?;
        let user = UserId::resolve(user, &config)?;
        let db = Database::open()?;
        Ok(Self { config, db, user })
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
