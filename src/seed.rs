//! Demo data for local development.

use sqlx::{Pool, Sqlite};

use crate::db::{
    FriendshipRepository, FriendshipStatus, Session, SessionRepository, User, UserRepository,
};
use crate::error::AppError;

pub const ADMIN_EMAIL: &str = "admin@mail.ru";
const DEMO_USERS: usize = 10;

/// What a seeding run created.
#[derive(Debug)]
pub struct SeedReport {
    pub admin: User,
    pub users: Vec<User>,
    pub admin_session: Session,
}

/// Creates an admin with pending requests to ten demo users, plus a session
/// for the admin. Returns `None` if the admin already exists.
pub async fn seed(
    pool: &Pool<Sqlite>,
    session_expiry_hours: i64,
) -> Result<Option<SeedReport>, AppError> {
    if UserRepository::get_by_email(pool, ADMIN_EMAIL).await?.is_some() {
        tracing::info!("seed data already present, skipping");
        return Ok(None);
    }

    let admin = UserRepository::create(pool, "Test User", ADMIN_EMAIL).await?;

    let mut users = Vec::with_capacity(DEMO_USERS);
    for n in 1..=DEMO_USERS {
        let name = format!("Demo User {n}");
        let email = format!("user{n}@example.com");
        users.push(UserRepository::create(pool, &name, &email).await?);
    }

    for user in &users {
        FriendshipRepository::create(pool, admin.id, user.id, FriendshipStatus::Pending).await?;
    }

    let admin_session = SessionRepository::create(pool, admin.id, session_expiry_hours).await?;

    tracing::info!(
        admin_id = admin.id,
        users = users.len(),
        "database seeded"
    );

    Ok(Some(SeedReport {
        admin,
        users,
        admin_session,
    }))
}
