#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use serde_json::Value;
use std::{
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use swatchbook::db::DbActorHandle;
use swatchbook::server::router::{SwatchState, swatchbook_router};
use tower::ServiceExt;

pub struct TestApp {
    pub app: Router,
    pub db: DbActorHandle,
    temp_path: PathBuf,
}

impl TestApp {
    pub async fn spawn(tag: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();

        let mut temp_path = std::env::temp_dir();
        temp_path.push(format!(
            "swatchbook-{tag}-{}-{}.sqlite",
            std::process::id(),
            nanos
        ));
        let database_url = format!("sqlite:{}", temp_path.display());
        let db = swatchbook::db::spawn(&database_url).await;

        // Plain-HTTP test traffic: drop `Secure` from the session cookie.
        let state = SwatchState::new(db.clone(), "", true);
        let app = swatchbook_router(state);

        Self { app, db, temp_path }
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Value) {
        self.send_with(method, uri, cookie, body, &[]).await
    }

    pub async fn send_with(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
        extra_headers: &[(&str, &str)],
    ) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        for (name, value) in extra_headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let resp = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, headers, json)
    }

    /// Signs up and signs in `name`, returning the `Cookie` header value.
    pub async fn login(&self, name: &str) -> String {
        let (status, _, _) = self
            .send(
                "POST",
                "/api/auth/signup",
                None,
                Some(serde_json::json!({
                    "username": name,
                    "email": format!("{name}@example.com"),
                    "password": "correct horse",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, headers, _) = self
            .send(
                "POST",
                "/api/auth/signin",
                None,
                Some(serde_json::json!({
                    "email": format!("{name}@example.com"),
                    "password": "correct horse",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        session_cookie(&headers).expect("signin sets a session cookie")
    }

    /// Creates a project for the session and returns its id.
    pub async fn create_project(&self, cookie: &str, name: &str) -> i64 {
        let (status, _, body) = self
            .send(
                "POST",
                "/api/project",
                Some(cookie),
                Some(serde_json::json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_i64().expect("project id")
    }

    pub async fn create_value(
        &self,
        cookie: &str,
        project_id: i64,
        kind: &str,
        label: &str,
        value: &str,
    ) -> i64 {
        let (status, _, body) = self
            .send(
                "POST",
                &format!("/api/value?type={kind}&projectId={project_id}"),
                Some(cookie),
                Some(serde_json::json!({ "label": label, "value": value })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create value failed: {body}");
        body["id"].as_i64().expect("value id")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.temp_path);
    }
}

/// `name=value` part of the session `Set-Cookie` header.
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("swatchbook_session="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub fn etag(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::ETAG)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
