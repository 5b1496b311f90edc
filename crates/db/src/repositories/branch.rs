//! Branch repository.

use branchbook_shared::types::PageRequest;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder,
    QuerySelect, Set,
};
use tracing::info;
use uuid::Uuid;

use super::is_unique_violation;
use crate::entities::branches;

/// Error types for branch operations.
#[derive(Debug, thiserror::Error)]
pub enum BranchError {
    /// Branch not found.
    #[error("Branch not found: {0}")]
    NotFound(Uuid),

    /// Branch code already taken.
    #[error("Branch code '{0}' already exists")]
    DuplicateCode(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a branch.
#[derive(Debug, Clone)]
pub struct CreateBranchInput {
    /// Short unique code, e.g. `ACC-01`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional location.
    pub location: Option<String>,
}

/// Branch repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct BranchRepository {
    db: DatabaseConnection,
}

impl BranchRepository {
    /// Creates a new branch repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a branch.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCode` if the code exists, or a database error.
    pub async fn create(&self, input: CreateBranchInput) -> Result<branches::Model, BranchError> {
        let now = Utc::now().into();
        let code = input.code.trim().to_uppercase();

        let branch = branches::ActiveModel {
            id: Set(Uuid::now_v7()),
            code: Set(code.clone()),
            name: Set(input.name.trim().to_string()),
            location: Set(input.location),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match branch.insert(&self.db).await {
            Ok(model) => {
                info!(branch_id = %model.id, code = %model.code, "Branch created");
                Ok(model)
            }
            Err(e) if is_unique_violation(&e) => Err(BranchError::DuplicateCode(code)),
            Err(e) => Err(e.into()),
        }
    }

    /// Finds a branch by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, id: Uuid) -> Result<Option<branches::Model>, DbErr> {
        branches::Entity::find_by_id(id).one(&self.db).await
    }

    /// Gets a branch by ID, failing when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if missing, or a database error.
    pub async fn get(&self, id: Uuid) -> Result<branches::Model, BranchError> {
        self.find(id).await?.ok_or(BranchError::NotFound(id))
    }

    /// Lists branches ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, page: &PageRequest) -> Result<(Vec<branches::Model>, u64), DbErr> {
        let total = branches::Entity::find().count(&self.db).await?;
        let rows = branches::Entity::find()
            .order_by_asc(branches::Column::Code)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok((rows, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn branch(code: &str) -> branches::Model {
        let now = Utc::now().into();
        branches::Model {
            id: Uuid::now_v7(),
            code: code.to_string(),
            name: "Accra Central".to_string(),
            location: Some("Makola".to_string()),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_returns_inserted_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![branch("ACC-01")]])
            .into_connection();
        let repo = BranchRepository::new(db);

        let created = repo
            .create(CreateBranchInput {
                code: " acc-01 ".to_string(),
                name: "Accra Central".to_string(),
                location: None,
            })
            .await
            .unwrap();
        assert_eq!(created.code, "ACC-01");
    }

    #[tokio::test]
    async fn test_get_missing_branch() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<branches::Model>::new()])
            .into_connection();
        let repo = BranchRepository::new(db);

        let id = Uuid::now_v7();
        assert!(matches!(repo.get(id).await, Err(BranchError::NotFound(got)) if got == id));
    }
}
