//! Float account repository.
//!
//! Balance changes go through `apply_delta`, a version-guarded update that
//! must run inside the caller's database transaction.

use branchbook_core::float::{
    AppliedMovement, FloatAccountInfo, FloatAccountKind, FloatAlert, FloatError,
};
use branchbook_shared::types::FloatAccountId;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::is_unique_violation;
use crate::entities::{branches, float_accounts};

/// Error types for float account operations.
#[derive(Debug, thiserror::Error)]
pub enum FloatAccountError {
    /// Float rule violated.
    #[error(transparent)]
    Float(#[from] FloatError),

    /// Branch not found.
    #[error("Branch not found: {0}")]
    BranchNotFound(Uuid),

    /// Stored row holds a value the domain does not know.
    #[error("Corrupt float account row: {0}")]
    Corrupt(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a float account.
#[derive(Debug, Clone)]
pub struct CreateFloatAccountInput {
    /// Owning branch.
    pub branch_id: Uuid,
    /// Channel.
    pub kind: FloatAccountKind,
    /// Provider name; ignored for cash in till and jumia.
    pub provider: String,
    /// Starting balance.
    pub opening_balance: Decimal,
    /// Low-balance threshold.
    pub min_threshold: Decimal,
    /// High-balance threshold.
    pub max_threshold: Option<Decimal>,
}

/// Converts a stored row into the snapshot the float rules work on.
///
/// # Errors
///
/// Returns `Corrupt` when the stored kind is unknown.
pub fn account_info(model: &float_accounts::Model) -> Result<FloatAccountInfo, FloatAccountError> {
    let kind = model
        .kind
        .parse::<FloatAccountKind>()
        .map_err(|e| FloatAccountError::Corrupt(e.to_string()))?;
    Ok(FloatAccountInfo {
        id: FloatAccountId::from_uuid(model.id),
        kind,
        provider: model.provider.clone(),
        current_balance: model.current_balance,
        min_threshold: model.min_threshold,
        max_threshold: model.max_threshold,
        is_active: model.is_active,
    })
}

/// Float account repository.
#[derive(Debug, Clone)]
pub struct FloatAccountRepository {
    db: DatabaseConnection,
}

impl FloatAccountRepository {
    /// Creates a new float account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a float account.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAccount` when the branch already has this
    /// kind/provider, `BranchNotFound`, or a validation error.
    pub async fn create(
        &self,
        input: CreateFloatAccountInput,
    ) -> Result<float_accounts::Model, FloatAccountError> {
        if input.opening_balance < Decimal::ZERO {
            return Err(FloatError::NegativeAmount(input.opening_balance).into());
        }
        FloatAccountInfo::check_thresholds(input.min_threshold, input.max_threshold)?;

        branches::Entity::find_by_id(input.branch_id)
            .one(&self.db)
            .await?
            .ok_or(FloatAccountError::BranchNotFound(input.branch_id))?;

        let provider = input.kind.provider_key(&input.provider);
        let now = Utc::now().into();
        let account = float_accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            branch_id: Set(input.branch_id),
            kind: Set(input.kind.as_str().to_string()),
            provider: Set(provider.clone()),
            current_balance: Set(input.opening_balance),
            min_threshold: Set(input.min_threshold),
            max_threshold: Set(input.max_threshold),
            is_active: Set(true),
            version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match account.insert(&self.db).await {
            Ok(model) => {
                info!(
                    float_account_id = %model.id,
                    branch_id = %model.branch_id,
                    kind = %model.kind,
                    provider = %model.provider,
                    "Float account created"
                );
                Ok(model)
            }
            Err(e) if is_unique_violation(&e) => Err(FloatError::DuplicateAccount {
                kind: input.kind,
                provider,
            }
            .into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Finds a float account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, id: Uuid) -> Result<Option<float_accounts::Model>, DbErr> {
        float_accounts::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists a branch's float accounts by kind then provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_branch(
        &self,
        branch_id: Uuid,
        include_inactive: bool,
    ) -> Result<Vec<float_accounts::Model>, DbErr> {
        let mut query =
            float_accounts::Entity::find().filter(float_accounts::Column::BranchId.eq(branch_id));
        if !include_inactive {
            query = query.filter(float_accounts::Column::IsActive.eq(true));
        }
        query
            .order_by_asc(float_accounts::Column::Kind)
            .order_by_asc(float_accounts::Column::Provider)
            .all(&self.db)
            .await
    }

    /// Finds the branch's account for `kind` and `provider`, locking the row.
    ///
    /// The active account wins over deactivated ones it replaced.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` when no such account exists.
    pub async fn find_for<C: ConnectionTrait>(
        conn: &C,
        branch_id: Uuid,
        kind: FloatAccountKind,
        provider: &str,
    ) -> Result<float_accounts::Model, FloatAccountError> {
        let provider = kind.provider_key(provider);
        float_accounts::Entity::find()
            .filter(float_accounts::Column::BranchId.eq(branch_id))
            .filter(float_accounts::Column::Kind.eq(kind.as_str()))
            .filter(float_accounts::Column::Provider.eq(provider.as_str()))
            .order_by_desc(float_accounts::Column::IsActive)
            .order_by_desc(float_accounts::Column::CreatedAt)
            .lock_exclusive()
            .one(conn)
            .await?
            .ok_or_else(|| FloatError::AccountNotFound { kind, provider }.into())
    }

    /// Loads an account by id for update, checking it belongs to `branch_id`.
    ///
    /// # Errors
    ///
    /// Returns `AccountIdNotFound` when missing or owned by another branch.
    pub async fn find_by_id_for<C: ConnectionTrait>(
        conn: &C,
        branch_id: Uuid,
        id: FloatAccountId,
    ) -> Result<float_accounts::Model, FloatAccountError> {
        float_accounts::Entity::find_by_id(id.into_inner())
            .filter(float_accounts::Column::BranchId.eq(branch_id))
            .lock_exclusive()
            .one(conn)
            .await?
            .ok_or_else(|| FloatError::AccountIdNotFound(id).into())
    }

    /// Applies a signed balance change to a loaded account.
    ///
    /// The update only succeeds if the row's version is unchanged since it
    /// was read.
    ///
    /// # Errors
    ///
    /// Returns `AccountInactive`, `InsufficientFloat` or `ConcurrentUpdate`.
    pub async fn apply_delta<C: ConnectionTrait>(
        conn: &C,
        account: &float_accounts::Model,
        delta: Decimal,
    ) -> Result<(AppliedMovement, Option<FloatAlert>), FloatAccountError> {
        let info = account_info(account)?;
        let applied = info.apply(delta)?;

        let result = float_accounts::Entity::update_many()
            .col_expr(
                float_accounts::Column::CurrentBalance,
                Expr::value(applied.new_balance),
            )
            .col_expr(
                float_accounts::Column::Version,
                Expr::col(float_accounts::Column::Version).add(1),
            )
            .col_expr(float_accounts::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(float_accounts::Column::Id.eq(account.id))
            .filter(float_accounts::Column::Version.eq(account.version))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(FloatError::ConcurrentUpdate(info.id).into());
        }

        if let Some(alert) = applied.alert {
            warn!(
                float_account_id = %account.id,
                kind = %account.kind,
                provider = %account.provider,
                balance = %applied.new_balance,
                ?alert,
                "Float account outside threshold"
            );
        }

        Ok((
            AppliedMovement {
                float_account_id: info.id,
                delta,
                balance_after: applied.new_balance,
            },
            applied.alert,
        ))
    }

    /// Updates the alert thresholds of an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountIdNotFound` or a threshold validation error.
    pub async fn set_thresholds(
        &self,
        id: Uuid,
        min_threshold: Decimal,
        max_threshold: Option<Decimal>,
    ) -> Result<float_accounts::Model, FloatAccountError> {
        FloatAccountInfo::check_thresholds(min_threshold, max_threshold)?;

        let account = self
            .find(id)
            .await?
            .ok_or(FloatError::AccountIdNotFound(FloatAccountId::from_uuid(id)))?;

        let mut active: float_accounts::ActiveModel = account.into();
        active.min_threshold = Set(min_threshold);
        active.max_threshold = Set(max_threshold);
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Deactivates an account; it keeps its history but takes no new movements.
    ///
    /// # Errors
    ///
    /// Returns `AccountIdNotFound` if the account does not exist.
    pub async fn deactivate(&self, id: Uuid) -> Result<float_accounts::Model, FloatAccountError> {
        let account = self
            .find(id)
            .await?
            .ok_or(FloatError::AccountIdNotFound(FloatAccountId::from_uuid(id)))?;

        let mut active: float_accounts::ActiveModel = account.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());
        let model = active.update(&self.db).await?;
        info!(float_account_id = %model.id, "Float account deactivated");
        Ok(model)
    }
}
