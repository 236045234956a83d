//! Users table entity.
//!
//! Accounts are keyed by a generated UUID string; the username carries a
//! unique index, which [`DatabaseStore`] relies on for atomic
//! check-then-insert semantics.
//!
//! [`DatabaseStore`]: crate::store::DatabaseStore

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub username: String,
    pub password: String,
    pub balance_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
