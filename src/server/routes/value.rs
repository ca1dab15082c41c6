use crate::db::{ValueCreate, ValuePatch};
use crate::error::SwatchError;
use crate::server::router::SwatchState;
use crate::server::routes::extract::Scoped;
use crate::server::routes::revision_etag;
use crate::utils::logging::with_pretty_json_debug;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use swatchbook_schema::{ValueDraft, ValueKind, ValueUpdate};
use tracing::debug;

pub fn router() -> Router<SwatchState> {
    Router::new().route(
        "/api/value",
        get(list_values).post(create_value).put(update_value),
    )
}

fn require_fields(label: &str, value: &str) -> Result<(), SwatchError> {
    if label.trim().is_empty() {
        return Err(SwatchError::validation("Missing label"));
    }
    if value.trim().is_empty() {
        return Err(SwatchError::validation("Missing value"));
    }
    Ok(())
}

/// GET /api/value?type=&projectId=
pub async fn list_values(
    State(state): State<SwatchState>,
    scope: Scoped<ValueKind>,
) -> Result<Response, SwatchError> {
    let values = state.db.list_values(scope.project.id, scope.kind).await?;
    let etag = revision_etag(scope.project.revision)?;
    Ok((etag, Json(values)).into_response())
}

/// POST /api/value?type=&projectId=
pub async fn create_value(
    State(state): State<SwatchState>,
    scope: Scoped<ValueKind>,
    payload: Result<Json<ValueDraft>, JsonRejection>,
) -> Result<Response, SwatchError> {
    let Json(draft) = payload?;
    require_fields(&draft.label, &draft.value)?;

    with_pretty_json_debug(&draft, |pretty_body| {
        debug!(kind = %scope.kind, project_id = scope.project.id, body = %pretty_body, "create value");
    });

    let created = state
        .db
        .create_value(ValueCreate {
            project_id: scope.project.id,
            kind: scope.kind,
            label: draft.label,
            value: draft.value,
        })
        .await?;

    let etag = revision_etag(created.revision)?;
    Ok((StatusCode::CREATED, etag, Json(created.record)).into_response())
}

/// PUT /api/value?type=&projectId=
pub async fn update_value(
    State(state): State<SwatchState>,
    scope: Scoped<ValueKind>,
    payload: Result<Json<ValueUpdate>, JsonRejection>,
) -> Result<Response, SwatchError> {
    let Json(update) = payload?;
    let id = update.id.ok_or_else(|| SwatchError::validation("Missing id"))?;
    require_fields(&update.label, &update.value)?;

    let updated = state
        .db
        .patch_value(
            scope.project.id,
            scope.kind,
            id,
            ValuePatch {
                label: Some(update.label),
                value: Some(update.value),
            },
        )
        .await?;

    let etag = revision_etag(updated.revision)?;
    Ok((etag, Json(updated.record)).into_response())
}
