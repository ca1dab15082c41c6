use crate::error::SwatchError;
use crate::server::guards::auth::SessionUser;
use crate::server::router::SwatchState;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;
use std::str::FromStr;
use swatchbook_schema::{EntityId, Project};

#[derive(Debug, Deserialize)]
struct ScopeQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(rename = "projectId")]
    project_id: Option<String>,
}

/// `?type=&projectId=` resolved against the session user's projects.
///
/// Rejections, in order:
/// - no session => 401
/// - missing/unknown `type` => 400
/// - missing/non-numeric `projectId` => 400
/// - project absent or owned by someone else => 404
#[derive(Debug, Clone)]
pub struct Scoped<K> {
    pub kind: K,
    pub project: Project,
}

impl<K> FromRequestParts<SwatchState> for Scoped<K>
where
    K: FromStr<Err = String> + Send,
{
    type Rejection = SwatchError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SwatchState,
    ) -> Result<Self, Self::Rejection> {
        let user = SessionUser::from_request_parts(parts, state).await?;
        let Query(query) = Query::<ScopeQuery>::try_from_uri(&parts.uri)?;

        let kind = non_empty(query.kind)
            .ok_or_else(|| SwatchError::validation("Missing type"))?
            .parse::<K>()
            .map_err(SwatchError::Validation)?;

        let project_id = non_empty(query.project_id)
            .ok_or_else(|| SwatchError::validation("Missing projectId"))?
            .parse::<EntityId>()
            .map_err(|_| SwatchError::validation("Invalid projectId"))?;

        let project = state
            .db
            .get_owned_project(project_id, user.user_id)
            .await?;

        Ok(Scoped { kind, project })
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
