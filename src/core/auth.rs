//! Authorization gate - the single place role checks happen.
//!
//! Finalization is restricted to one privileged role, compared verbatim
//! against the configured value; there is no hierarchy or delegation. The
//! check is pure and side-effect free, so every caller that used to compare
//! role strings inline depends on [`can_finalize`] instead.

use crate::{
    config::LedgerSettings,
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};

/// Returns true when `actor` holds the privileged role and an active account.
#[must_use]
pub fn can_finalize(actor: &user::Model, settings: &LedgerSettings) -> bool {
    actor.role == settings.privileged_role && actor.status == user::STATUS_ACTIVE
}

/// Gate used by the orchestrator: `Ok(())` for a finalizer, otherwise
/// [`Error::Unauthorized`] with no state changed.
pub fn require_finalizer(actor: &user::Model, settings: &LedgerSettings) -> Result<()> {
    if can_finalize(actor, settings) {
        Ok(())
    } else {
        Err(Error::Unauthorized {
            actor: actor.username.clone(),
        })
    }
}

/// Finds an employee by their linked Discord account.
pub async fn get_user_by_discord_id(
    db: &DatabaseConnection,
    discord_id: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::DiscordId.eq(discord_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an employee by primary key.
pub async fn get_user_by_id<C>(db: &C, user_id: i64) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Creates an employee record.
pub async fn create_user(
    db: &DatabaseConnection,
    discord_id: Option<String>,
    username: String,
    role: String,
    status: String,
) -> Result<user::Model> {
    if username.trim().is_empty() {
        return Err(Error::Config {
            message: "Username cannot be empty".to_string(),
        });
    }

    let new_user = user::ActiveModel {
        discord_id: Set(discord_id),
        username: Set(username.trim().to_string()),
        role: Set(role),
        status: Set(status),
        ..Default::default()
    };

    let result = new_user.insert(db).await?;
    Ok(result)
}
