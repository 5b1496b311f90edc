//! `SeaORM` Entity for service_transactions table.
//!
//! One row per operational transaction (cash-in, card sale, expense, ...).
//! `float_movements` keeps the applied float deltas so a reversal can undo
//! exactly what was written.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "service_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub branch_id: Uuid,
    pub module: String,
    pub kind: String,
    pub provider: String,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub fee: Decimal,
    pub customer_name: Option<String>,
    pub phone_number: Option<String>,
    pub reference: Option<String>,
    pub expense_category: Option<String>,
    pub source_float_account_id: Option<Uuid>,
    pub destination_float_account_id: Option<Uuid>,
    #[sea_orm(column_type = "JsonBinary")]
    pub float_movements: Json,
    pub status: String,
    pub transaction_date: Date,
    pub performed_by: Uuid,
    pub reversed_at: Option<DateTimeWithTimeZone>,
    pub reversed_by: Option<Uuid>,
    pub reversal_reason: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::branches::Entity",
        from = "Column::BranchId",
        to = "super::branches::Column::Id"
    )]
    Branches,
    #[sea_orm(has_many = "super::gl_transactions::Entity")]
    GlTransactions,
}

impl Related<super::branches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Branches.def()
    }
}

impl Related<super::gl_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GlTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
