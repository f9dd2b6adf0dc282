use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use waypoint_admin::{BulkReport, EntityKind, EntityTable};
use waypoint_core::ColumnUpdate;
use waypoint_shared::Record;
use waypoint_table::{SortDirection, SortSpec, TablePage, ViewState};

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query string of a table listing. Keys other than the fixed ones name
/// facet filters, e.g. `?status=paid`.
#[derive(Debug, Default, PartialEq)]
pub struct TableQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub direction: SortDirection,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub facets: BTreeMap<String, String>,
}

fn parse_number(key: &str, value: &str) -> Result<usize, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("'{}' must be a positive integer", key)))
}

impl TableQuery {
    pub fn from_params(params: HashMap<String, String>) -> Result<Self, AppError> {
        let mut query = TableQuery::default();

        for (key, value) in params {
            match key.as_str() {
                "search" => query.search = Some(value),
                "sort" => query.sort = Some(value).filter(|s| !s.is_empty()),
                "direction" => {
                    query.direction = match value.to_ascii_lowercase().as_str() {
                        "asc" => SortDirection::Asc,
                        "desc" => SortDirection::Desc,
                        _ => return Err(AppError::BadRequest(format!("Unknown sort direction '{}'", value))),
                    }
                }
                "page" => query.page = Some(parse_number(&key, &value)?),
                "page_size" => query.page_size = Some(parse_number(&key, &value)?),
                _ => {
                    query.facets.insert(key, value);
                }
            }
        }

        Ok(query)
    }

    /// Page size first, then filters and sort (each back to page 1), then
    /// the requested page.
    pub fn apply(&self, table: &mut EntityTable) -> Result<(), AppError> {
        if let Some(size) = self.page_size {
            table.set_page_size(size)?;
        }
        if let Some(search) = &self.search {
            table.search(search.clone());
        }
        for (name, value) in &self.facets {
            table.filter(name, value.as_str())?;
        }
        if let Some(column) = &self.sort {
            table.sort_by(match self.direction {
                SortDirection::Asc => SortSpec::asc(column.clone()),
                SortDirection::Desc => SortSpec::desc(column.clone()),
            });
        }
        if let Some(page) = self.page {
            table.go_to_page(page)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub entity: EntityKind,
    pub view: ViewState,
    #[serde(flatten)]
    pub page: TablePage<Record>,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub id: String,
    pub updated: Vec<ColumnUpdate>,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkUpdateRequest {
    pub ids: Vec<String>,
    pub updates: Vec<ColumnUpdate>,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/tables/{entity}", get(list_records).post(create_record))
        .route("/v1/tables/{entity}/bulk-delete", post(bulk_delete))
        .route("/v1/tables/{entity}/bulk-update", post(bulk_update))
        .route("/v1/tables/{entity}/{id}", patch(update_record).delete(delete_record))
}

fn new_table(state: &AppState, entity: &str) -> Result<EntityTable, AppError> {
    let kind: EntityKind = entity.parse()?;
    Ok(EntityTable::new(
        kind,
        state.tables.default_page_size,
        state.tables.bulk_concurrency,
    )?)
}

async fn loaded_table(state: &AppState, entity: &str) -> Result<EntityTable, AppError> {
    let mut table = new_table(state, entity)?;
    table.refresh(state.entities.as_ref()).await?;
    Ok(table)
}

/// GET /v1/tables/{entity}
pub async fn list_records(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<TableResponse>, AppError> {
    let query = TableQuery::from_params(params)?;
    let mut table = loaded_table(&state, &entity).await?;
    query.apply(&mut table)?;

    Ok(Json(TableResponse {
        entity: table.schema().kind,
        view: table.view().clone(),
        page: table.page().map(Record::clone),
    }))
}

/// POST /v1/tables/{entity}
pub async fn create_record(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Json(record): Json<Record>,
) -> Result<(StatusCode, Json<Record>), AppError> {
    let mut table = new_table(&state, &entity)?;
    let created = table.create(state.entities.as_ref(), record).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /v1/tables/{entity}/{id}
/// Body holds the edited fields; only those that differ are sent upstream.
pub async fn update_record(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, String)>,
    Json(edited): Json<Record>,
) -> Result<Json<UpdateResponse>, AppError> {
    let mut table = loaded_table(&state, &entity).await?;
    let changes = table.edit(state.entities.as_ref(), &id, edited).await?;
    Ok(Json(UpdateResponse {
        id,
        updated: changes.updates().to_vec(),
    }))
}

/// DELETE /v1/tables/{entity}/{id}
pub async fn delete_record(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let mut table = new_table(&state, &entity)?;
    table.delete(state.entities.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/tables/{entity}/bulk-delete
pub async fn bulk_delete(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Json(req): Json<BulkDeleteRequest>,
) -> Result<Json<BulkReport>, AppError> {
    let mut table = new_table(&state, &entity)?;
    let report = table.bulk_delete(state.entities.as_ref(), &req.ids).await?;
    Ok(Json(report))
}

/// POST /v1/tables/{entity}/bulk-update
pub async fn bulk_update(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Json(req): Json<BulkUpdateRequest>,
) -> Result<Json<BulkReport>, AppError> {
    let mut table = new_table(&state, &entity)?;
    let report = table
        .bulk_update(state.entities.as_ref(), &req.ids, &req.updates)
        .await?;
    Ok(Json(report))
}
