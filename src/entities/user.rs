//! User entity - Employee identity and role records.
//!
//! The ledger core only inspects `role` and `status`: finalization requires
//! `role` to equal the configured privileged role and `status` to be
//! `"active"`. Everything else is bookkeeping for the bot layer.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status value for employees allowed to act
pub const STATUS_ACTIVE: &str = "active";

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID, if the employee is linked to a Discord account
    #[sea_orm(unique)]
    pub discord_id: Option<String>,
    /// Display name of the employee
    pub username: String,
    /// Role attribute, compared verbatim against the privileged role
    pub role: String,
    /// Account status: `"active"` or anything else (suspended, fired, ...)
    pub status: String,
}

/// `User` has no relationships the core needs to navigate
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
