// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use bytes::Bytes;
use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// A request the mock service received
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn query_param(&self, key: &str) -> Option<String> {
        let query = self.query.as_ref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    pub fn json_body(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Add a response for GET requests matching the path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();

        // Try exact match first
        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        // Try prefix match for paths like /apis/argoproj.io/v1alpha1/namespaces/foo
        for ((m, p), resp) in responses.iter() {
            if m == method && path.starts_with(p) {
                return Some(resp.clone());
            }
        }

        None
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let query = req.uri().query().map(|q| q.to_string());

        let response = self.find_response(&method, &path);
        let requests = self.requests.clone();

        Box::pin(async move {
            let body = req
                .into_body()
                .collect()
                .await
                .map_err(tower::BoxError::from)?
                .to_bytes();
            requests.lock().unwrap().push(RecordedRequest {
                method,
                path,
                query,
                body,
            });

            let (status, body) = response.unwrap_or_else(|| {
                // Default 404 for unmatched requests
                (404, not_found_json("resource", "unmatched"))
            });

            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a mock Application JSON object, optionally mid soft-deletion with a grace period
pub fn application_json(name: &str, namespace: &str, deletion_grace_secs: Option<i64>) -> String {
    let mut app = serde_json::json!({
        "apiVersion": "argoproj.io/v1alpha1",
        "kind": "Application",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "uid": "test-uid",
            "resourceVersion": "1"
        },
        "spec": {
            "source": { "repoURL": "r1" },
            "destination": { "namespace": "default", "server": "https://kubernetes.default.svc" },
            "project": "default"
        },
        "status": {
            "sync": { "status": "Synced", "revision": "abc123" },
            "health": { "status": "Healthy" }
        }
    });

    if let Some(grace) = deletion_grace_secs {
        app["metadata"]["deletionTimestamp"] = "2026-01-01T00:00:00Z".into();
        app["metadata"]["deletionGracePeriodSeconds"] = grace.into();
    }

    app.to_string()
}

/// Wrap Application JSON objects in an ApplicationList
pub fn application_list_json(items: &[String]) -> String {
    let items: Vec<serde_json::Value> = items
        .iter()
        .map(|i| serde_json::from_str(i).unwrap())
        .collect();

    serde_json::json!({
        "apiVersion": "argoproj.io/v1alpha1",
        "kind": "ApplicationList",
        "metadata": { "resourceVersion": "1" },
        "items": items
    })
    .to_string()
}

/// API group discovery response, with or without the argoproj.io group
pub fn api_group_list_json(with_argoproj: bool) -> String {
    let groups = if with_argoproj {
        serde_json::json!([{
            "name": "argoproj.io",
            "versions": [{ "groupVersion": "argoproj.io/v1alpha1", "version": "v1alpha1" }],
            "preferredVersion": { "groupVersion": "argoproj.io/v1alpha1", "version": "v1alpha1" }
        }])
    } else {
        serde_json::json!([])
    };

    serde_json::json!({
        "kind": "APIGroupList",
        "apiVersion": "v1",
        "groups": groups
    })
    .to_string()
}

/// Resource discovery response for argoproj.io/v1alpha1
pub fn api_resource_list_json() -> String {
    serde_json::json!({
        "kind": "APIResourceList",
        "apiVersion": "v1",
        "groupVersion": "argoproj.io/v1alpha1",
        "resources": [{
            "name": "applications",
            "singularName": "application",
            "namespaced": true,
            "kind": "Application",
            "verbs": ["create", "delete", "get", "list", "patch", "update", "watch"]
        }]
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Create a 409 conflict response, as returned for a stale resourceVersion
pub fn conflict_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!(
            "Operation cannot be fulfilled on {} \"{}\": the object has been modified",
            resource, name
        ),
        "reason": "Conflict",
        "code": 409
    })
    .to_string()
}

/// A DeploymentList holding one argocd-server deployment
pub fn deployment_list_json(version_label: Option<&str>, image: &str) -> String {
    let mut labels = serde_json::json!({ "app.kubernetes.io/name": "argocd-server" });
    if let Some(version) = version_label {
        labels["app.kubernetes.io/version"] = version.into();
    }

    serde_json::json!({
        "apiVersion": "apps/v1",
        "kind": "DeploymentList",
        "metadata": { "resourceVersion": "1" },
        "items": [{
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": { "name": "argocd-server", "namespace": "argocd", "labels": labels },
            "spec": {
                "selector": { "matchLabels": { "app.kubernetes.io/name": "argocd-server" } },
                "template": {
                    "metadata": { "labels": { "app.kubernetes.io/name": "argocd-server" } },
                    "spec": { "containers": [{ "name": "argocd-server", "image": image }] }
                }
            }
        }]
    })
    .to_string()
}
