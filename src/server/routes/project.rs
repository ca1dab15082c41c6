use crate::db::ProjectCreateRow;
use crate::error::SwatchError;
use crate::server::guards::auth::SessionUser;
use crate::server::router::SwatchState;
use crate::server::routes::revision_etag;
use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::TypedHeader;
use headers::IfNoneMatch;
use swatchbook_schema::{EntityId, Project, ProjectCreate};
use tracing::{debug, info};

pub fn router() -> Router<SwatchState> {
    Router::new()
        .route("/api/project", get(list_projects).post(create_project))
        .route("/api/project/{id}", get(get_project))
}

/// GET /api/project
pub async fn list_projects(
    State(state): State<SwatchState>,
    user: SessionUser,
) -> Result<Json<Vec<Project>>, SwatchError> {
    let projects = state.db.list_projects(user.user_id).await?;
    Ok(Json(projects))
}

/// POST /api/project
pub async fn create_project(
    State(state): State<SwatchState>,
    user: SessionUser,
    payload: Result<Json<ProjectCreate>, JsonRejection>,
) -> Result<Response, SwatchError> {
    let Json(body) = payload?;
    let name = body.name.trim();
    if name.is_empty() {
        return Err(SwatchError::validation("Missing name"));
    }

    let project = state
        .db
        .create_project(ProjectCreateRow {
            owner_user_id: user.user_id,
            name: name.to_string(),
        })
        .await?;
    info!(project_id = project.id, owner = user.user_id, "project created");

    let etag = revision_etag(project.revision)?;
    Ok((StatusCode::CREATED, etag, Json(project)).into_response())
}

/// GET /api/project/{id}
///
/// Full aggregate of one owned project. `ETag` is the project revision;
/// a matching `If-None-Match` short-circuits to `304` without loading values.
pub async fn get_project(
    State(state): State<SwatchState>,
    user: SessionUser,
    if_none_match: Option<TypedHeader<IfNoneMatch>>,
    path: Result<Path<EntityId>, PathRejection>,
) -> Result<Response, SwatchError> {
    let Path(project_id) = path?;
    let project = state.db.get_owned_project(project_id, user.user_id).await?;

    let etag = revision_etag(project.revision)?;
    if let Some(TypedHeader(if_none_match)) = if_none_match
        && !if_none_match.precondition_passes(&etag.0)
    {
        debug!(project_id, revision = project.revision, "project not modified");
        return Ok((StatusCode::NOT_MODIFIED, etag).into_response());
    }

    let aggregate = state.db.load_aggregate(project_id).await?;
    let etag = revision_etag(aggregate.revision)?;
    Ok((etag, Json(aggregate)).into_response())
}
