use crate::db::ComponentCreateRow;
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
    routing::post,
};
use swatchbook_schema::{ComponentCreate, ComponentType, ComponentUpdate};
use tracing::{debug, info};

pub fn router() -> Router<SwatchState> {
    Router::new().route("/api/component", post(create_component).put(update_component))
}

/// POST /api/component?type=&projectId=
///
/// Every style id must name a value of the slot's kind in the same project,
/// otherwise `400 INVALID_REFERENCE` and nothing is written.
pub async fn create_component(
    State(state): State<SwatchState>,
    scope: Scoped<ComponentType>,
    payload: Result<Json<ComponentCreate>, JsonRejection>,
) -> Result<Response, SwatchError> {
    let Json(body) = payload?;
    let variant = body.variant.trim();
    if variant.is_empty() {
        return Err(SwatchError::validation("Missing variant"));
    }

    with_pretty_json_debug(&body, |pretty_body| {
        debug!(
            component_type = %scope.kind,
            project_id = scope.project.id,
            body = %pretty_body,
            "create component"
        );
    });

    let created = state
        .db
        .create_component(ComponentCreateRow {
            project_id: scope.project.id,
            component_type: scope.kind,
            variant: variant.to_string(),
            styles: body.styles,
        })
        .await?;
    info!(
        component_id = created.record.id,
        project_id = scope.project.id,
        revision = created.revision,
        "component created"
    );

    let etag = revision_etag(created.revision)?;
    Ok((StatusCode::CREATED, etag, Json(created.record)).into_response())
}

/// PUT /api/component?type=&projectId=
///
/// Replaces the six style references of an existing component. The variant
/// name is fixed at creation and ignored here. A component of another type
/// is reported as not found.
pub async fn update_component(
    State(state): State<SwatchState>,
    scope: Scoped<ComponentType>,
    payload: Result<Json<ComponentUpdate>, JsonRejection>,
) -> Result<Response, SwatchError> {
    let Json(body) = payload?;

    let updated = state
        .db
        .patch_component_style(scope.project.id, scope.kind, body.id, body.styles.into())
        .await?;

    let etag = revision_etag(updated.revision)?;
    Ok((etag, Json(updated.record)).into_response())
}
