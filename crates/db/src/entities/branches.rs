//! `SeaORM` Entity for branches table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "branches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub location: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::float_accounts::Entity")]
    FloatAccounts,
    #[sea_orm(has_many = "super::service_transactions::Entity")]
    ServiceTransactions,
    #[sea_orm(has_many = "super::gl_transactions::Entity")]
    GlTransactions,
}

impl Related<super::float_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FloatAccounts.def()
    }
}

impl Related<super::service_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceTransactions.def()
    }
}

impl Related<super::gl_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GlTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
