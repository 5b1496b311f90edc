//! Branch routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use branchbook_db::entities::branches;
use branchbook_db::repositories::{BranchRepository, CreateBranchInput};
use branchbook_shared::types::{PageRequest, PageResponse};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, error::ApiError};

/// Creates the branch routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/branches", get(list_branches).post(create_branch))
        .route("/branches/{branch_id}", get(get_branch))
}

/// Request body for creating a branch.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBranchRequest {
    /// Short branch code, stored upper-case.
    #[validate(length(min = 1, max = 20))]
    pub code: String,
    /// Display name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Town or address.
    #[validate(length(max = 200))]
    pub location: Option<String>,
}

/// Query parameters for listing branches.
#[derive(Debug, Deserialize)]
pub struct ListBranchesQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default: 20, max: 100).
    pub per_page: Option<u32>,
}

/// Response for a branch.
#[derive(Debug, Serialize)]
pub struct BranchResponse {
    /// Branch ID.
    pub id: Uuid,
    /// Branch code.
    pub code: String,
    /// Name.
    pub name: String,
    /// Location.
    pub location: Option<String>,
    /// Whether the branch accepts postings.
    pub is_active: bool,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<branches::Model> for BranchResponse {
    fn from(b: branches::Model) -> Self {
        Self {
            id: b.id,
            code: b.code,
            name: b.name,
            location: b.location,
            is_active: b.is_active,
            created_at: b.created_at.to_rfc3339(),
        }
    }
}

/// POST `/branches` - Create a branch.
async fn create_branch(
    State(state): State<AppState>,
    Json(payload): Json<CreateBranchRequest>,
) -> Result<(StatusCode, Json<BranchResponse>), ApiError> {
    payload.validate()?;

    let repo = BranchRepository::new((*state.db).clone());
    let branch = repo
        .create(CreateBranchInput {
            code: payload.code,
            name: payload.name,
            location: payload.location,
        })
        .await?;

    info!(branch_id = %branch.id, code = %branch.code, "Branch created");
    Ok((StatusCode::CREATED, Json(branch.into())))
}

/// GET `/branches` - List branches.
async fn list_branches(
    State(state): State<AppState>,
    Query(query): Query<ListBranchesQuery>,
) -> Result<Json<PageResponse<BranchResponse>>, ApiError> {
    let page = PageRequest::new(query.page, query.per_page);
    let repo = BranchRepository::new((*state.db).clone());
    let (rows, total) = repo.list(&page).await?;

    let data = rows.into_iter().map(BranchResponse::from).collect();
    Ok(Json(PageResponse::new(data, &page, total)))
}

/// GET `/branches/{branch_id}` - Get a branch.
async fn get_branch(
    State(state): State<AppState>,
    Path(branch_id): Path<Uuid>,
) -> Result<Json<BranchResponse>, ApiError> {
    let repo = BranchRepository::new((*state.db).clone());
    let branch = repo.get(branch_id).await?;
    Ok(Json(branch.into()))
}
