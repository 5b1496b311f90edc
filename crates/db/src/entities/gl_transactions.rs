//! `SeaORM` Entity for gl_transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "gl_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub branch_id: Uuid,
    pub source_module: String,
    pub source_transaction_id: Uuid,
    pub transaction_date: Date,
    pub description: String,
    pub reference: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub total_debit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub total_credit: Decimal,
    pub is_reversal: bool,
    pub reversal_of: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::branches::Entity",
        from = "Column::BranchId",
        to = "super::branches::Column::Id"
    )]
    Branches,
    #[sea_orm(
        belongs_to = "super::service_transactions::Entity",
        from = "Column::SourceTransactionId",
        to = "super::service_transactions::Column::Id"
    )]
    ServiceTransactions,
    #[sea_orm(has_many = "super::gl_journal_entries::Entity")]
    GlJournalEntries,
}

impl Related<super::branches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Branches.def()
    }
}

impl Related<super::service_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceTransactions.def()
    }
}

impl Related<super::gl_journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GlJournalEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
