use std::sync::Arc;
use sqlx::{Pool, Sqlite};

use crate::auth::Authenticator;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: Pool<Sqlite>,
    pub authenticator: Arc<dyn Authenticator>,
    pub config: Arc<Config>,
}
