use async_trait::async_trait;
use reqwest::{
    Method, RequestBuilder, Response, StatusCode,
    header::{ETAG, IF_NONE_MATCH},
};
use serde::de::DeserializeOwned;
use swatchbook_schema::{
    ApiErrorBody, Component, ComponentCreate, ComponentType, ComponentUpdate, EntityId, Project,
    ProjectAggregate, ProjectCreate, ResolvedStyle, Revision, Revisioned, SigninRequest,
    SignupRequest, UserView, Value, ValueDraft, ValueKind, ValueUpdate,
};
use tracing::debug;
use url::Url;

use crate::client::api::{Fetched, TokensApi};
use crate::client::error::ClientError;

/// `TokensApi` over HTTP. Keeps the session cookie in its own cookie store,
/// so one instance is one signed-in user.
#[derive(Clone)]
pub struct HttpTokensApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpTokensApi {
    pub fn new(base: Url) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self { client, base })
    }

    pub async fn signup(&self, req: &SignupRequest) -> Result<UserView, ClientError> {
        let resp = self
            .request(Method::POST, self.endpoint("/api/auth/signup")?)
            .json(req)
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn signin(&self, req: &SigninRequest) -> Result<UserView, ClientError> {
        let resp = self
            .request(Method::POST, self.endpoint("/api/auth/signin")?)
            .json(req)
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn signout(&self) -> Result<(), ClientError> {
        let resp = self
            .request(Method::POST, self.endpoint("/api/auth/signout")?)
            .send()
            .await?;
        ensure_success(resp).await.map(|_| ())
    }

    pub async fn session(&self) -> Result<UserView, ClientError> {
        let resp = self
            .request(Method::GET, self.endpoint("/api/auth/session")?)
            .send()
            .await?;
        read_json(resp).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }

    /// `path?type=<kind>&projectId=<id>`
    fn scoped(&self, path: &str, kind: &str, project_id: EntityId) -> Result<Url, ClientError> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut()
            .append_pair("type", kind)
            .append_pair("projectId", &project_id.to_string());
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(method = %method, url = %url, "api request");
        self.client.request(method, url)
    }
}

/// Parses `"7"`, `W/"7"` or a bare `7`.
fn parse_revision(raw: &str) -> Option<Revision> {
    let raw = raw.trim();
    let raw = raw.strip_prefix("W/").unwrap_or(raw);
    raw.trim_matches('"').parse().ok()
}

fn response_revision(resp: &Response) -> Result<Revision, ClientError> {
    resp.headers()
        .get(ETAG)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_revision)
        .ok_or_else(|| ClientError::Parse("response carries no revision ETag".to_string()))
}

async fn ensure_success(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ApiErrorBody>(&text) {
        Ok(body) => (body.inner.code, body.inner.message),
        Err(_) => (status.as_str().to_string(), text),
    };
    debug!(status = status.as_u16(), code = %code, message = %message, "api error");

    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound(message));
    }
    Err(ClientError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let resp = ensure_success(resp).await?;
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Parse(e.to_string()))
}

async fn read_revisioned<T: DeserializeOwned>(resp: Response) -> Result<Revisioned<T>, ClientError> {
    let resp = ensure_success(resp).await?;
    let revision = response_revision(&resp)?;
    let record = read_json(resp).await?;
    Ok(Revisioned::new(revision, record))
}

#[async_trait]
impl TokensApi for HttpTokensApi {
    async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        let resp = self
            .request(Method::GET, self.endpoint("/api/project")?)
            .send()
            .await?;
        read_json(resp).await
    }

    async fn create_project(&self, name: &str) -> Result<Project, ClientError> {
        let body = ProjectCreate {
            name: name.to_string(),
        };
        let resp = self
            .request(Method::POST, self.endpoint("/api/project")?)
            .json(&body)
            .send()
            .await?;
        read_json(resp).await
    }

    async fn fetch_project(
        &self,
        project_id: EntityId,
        known: Option<Revision>,
    ) -> Result<Fetched<ProjectAggregate>, ClientError> {
        let mut req = self.request(
            Method::GET,
            self.endpoint(&format!("/api/project/{project_id}"))?,
        );
        if let Some(revision) = known {
            req = req.header(IF_NONE_MATCH, format!("\"{revision}\""));
        }

        let resp = req.send().await?;
        if resp.status() == StatusCode::NOT_MODIFIED {
            return Ok(Fetched::NotModified);
        }
        read_json(resp).await.map(Fetched::Modified)
    }

    async fn list_values(
        &self,
        project_id: EntityId,
        kind: ValueKind,
    ) -> Result<Vec<Value>, ClientError> {
        let resp = self
            .request(
                Method::GET,
                self.scoped("/api/value", kind.as_str(), project_id)?,
            )
            .send()
            .await?;
        read_json(resp).await
    }

    async fn create_value(
        &self,
        project_id: EntityId,
        kind: ValueKind,
        draft: &ValueDraft,
    ) -> Result<Revisioned<Value>, ClientError> {
        let resp = self
            .request(
                Method::POST,
                self.scoped("/api/value", kind.as_str(), project_id)?,
            )
            .json(draft)
            .send()
            .await?;
        read_revisioned(resp).await
    }

    async fn update_value(
        &self,
        project_id: EntityId,
        kind: ValueKind,
        id: EntityId,
        draft: &ValueDraft,
    ) -> Result<Revisioned<Value>, ClientError> {
        let body = ValueUpdate {
            id: Some(id),
            label: draft.label.clone(),
            value: draft.value.clone(),
        };
        let resp = self
            .request(
                Method::PUT,
                self.scoped("/api/value", kind.as_str(), project_id)?,
            )
            .json(&body)
            .send()
            .await?;
        read_revisioned(resp).await
    }

    async fn create_component(
        &self,
        project_id: EntityId,
        component_type: ComponentType,
        create: &ComponentCreate,
    ) -> Result<Revisioned<Component>, ClientError> {
        let resp = self
            .request(
                Method::POST,
                self.scoped("/api/component", component_type.as_str(), project_id)?,
            )
            .json(create)
            .send()
            .await?;
        read_revisioned(resp).await
    }

    async fn update_component(
        &self,
        project_id: EntityId,
        component_type: ComponentType,
        update: &ComponentUpdate,
    ) -> Result<Revisioned<ResolvedStyle>, ClientError> {
        let resp = self
            .request(
                Method::PUT,
                self.scoped("/api/component", component_type.as_str(), project_id)?,
            )
            .json(update)
            .send()
            .await?;
        read_revisioned(resp).await
    }
}
