//! `SeaORM` Entity for gl_journal_entries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "gl_journal_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub gl_transaction_id: Uuid,
    pub line_no: i32,
    pub account_id: Uuid,
    pub account_code: String,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub debit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub credit: Decimal,
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::gl_transactions::Entity",
        from = "Column::GlTransactionId",
        to = "super::gl_transactions::Column::Id",
        on_delete = "Cascade"
    )]
    GlTransactions,
    #[sea_orm(
        belongs_to = "super::gl_accounts::Entity",
        from = "Column::AccountId",
        to = "super::gl_accounts::Column::Id"
    )]
    GlAccounts,
}

impl Related<super::gl_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GlTransactions.def()
    }
}

impl Related<super::gl_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GlAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
