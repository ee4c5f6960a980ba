use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::core::config::ApiConfig;
use crate::core::error::{AppError, Result};
use crate::features::board::models::{Assignment, AssignmentRole, Short, ShortFile, ShortStatus, User};
use crate::features::board::dtos::AssignmentRequest;
use crate::features::uploads::dtos::{ConfirmUploadRequest, ReserveUploadRequest, UploadTicket};
use crate::shared::types::ApiResponse;

/// Which slice of assignments a viewer may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentScope {
    /// Every assignment, including rates. Admin only.
    All,
    /// The public subset without payment details.
    Public,
}

/// Every server call the board engine makes.
#[async_trait]
pub trait BoardApi: Send + Sync {
    async fn list_shorts(&self, assigned_only: bool) -> Result<Vec<Short>>;
    async fn get_short(&self, short_id: i64) -> Result<Short>;
    async fn update_status(&self, short_id: i64, status: ShortStatus) -> Result<()>;
    async fn list_assignments(&self, scope: AssignmentScope) -> Result<Vec<Assignment>>;
    async fn list_users(&self) -> Result<Vec<User>>;
    /// Replace-not-append: the server removes any prior assignment for the
    /// same (short, role) before creating the new one.
    async fn replace_assignment(
        &self,
        short_id: i64,
        role: AssignmentRole,
        req: AssignmentRequest,
    ) -> Result<Assignment>;
    async fn delete_assignment(&self, short_id: i64, role: AssignmentRole) -> Result<()>;
    async fn mark_clips_complete(&self, short_id: i64) -> Result<()>;
    async fn mark_editing_complete(&self, short_id: i64) -> Result<()>;
    /// Step 1 of the upload protocol: obtain a signed storage target.
    async fn reserve_upload(&self, short_id: i64, req: ReserveUploadRequest) -> Result<UploadTicket>;
    /// Step 3 of the upload protocol: the File row is created here, never earlier.
    async fn confirm_upload(&self, short_id: i64, req: ConfirmUploadRequest) -> Result<ShortFile>;
    /// Idempotent: deleting a file that is already gone succeeds quietly.
    async fn delete_file(&self, file_id: i64) -> Result<()>;
    async fn delete_short(&self, short_id: i64) -> Result<()>;
}

/// Reqwest-backed implementation of [`BoardApi`] speaking the standard
/// `ApiResponse` envelope with bearer authentication.
pub struct HttpBoardApi {
    client: reqwest::Client,
    base_url: String,
    auth_token: String,
}

impl HttpBoardApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        if self.auth_token.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.auth_token)
        }
    }

    /// Decode an envelope response, extracting the server message verbatim
    /// for error statuses.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            let envelope: ApiResponse<T> = serde_json::from_str(&body)
                .map_err(|e| AppError::Internal(format!("Malformed API response: {}", e)))?;
            envelope
                .data
                .ok_or_else(|| AppError::Internal("API response missing data".to_string()))
        } else {
            let message = serde_json::from_str::<ApiResponse<()>>(&body)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| "Request failed".to_string());

            if status == reqwest::StatusCode::NOT_FOUND {
                Err(AppError::NotFound(message))
            } else {
                Err(AppError::Server {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    /// Decode a response whose payload does not matter.
    async fn decode_empty(response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await?;
        let message = serde_json::from_str::<ApiResponse<()>>(&body)
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| "Request failed".to_string());

        if status == reqwest::StatusCode::NOT_FOUND {
            Err(AppError::NotFound(message))
        } else {
            Err(AppError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl BoardApi for HttpBoardApi {
    async fn list_shorts(&self, assigned_only: bool) -> Result<Vec<Short>> {
        let response = self
            .request(reqwest::Method::GET, "/shorts")
            .query(&[("assigned_only", assigned_only)])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get_short(&self, short_id: i64) -> Result<Short> {
        let response = self
            .request(reqwest::Method::GET, &format!("/shorts/{}", short_id))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn update_status(&self, short_id: i64, status: ShortStatus) -> Result<()> {
        let response = self
            .request(reqwest::Method::PATCH, &format!("/shorts/{}/status", short_id))
            .json(&json!({ "status": status }))
            .send()
            .await?;
        Self::decode_empty(response).await
    }

    async fn list_assignments(&self, scope: AssignmentScope) -> Result<Vec<Assignment>> {
        let scope_param = match scope {
            AssignmentScope::All => "all",
            AssignmentScope::Public => "public",
        };
        let response = self
            .request(reqwest::Method::GET, "/assignments")
            .query(&[("scope", scope_param)])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let response = self.request(reqwest::Method::GET, "/users").send().await?;
        Self::decode(response).await
    }

    async fn replace_assignment(
        &self,
        short_id: i64,
        role: AssignmentRole,
        req: AssignmentRequest,
    ) -> Result<Assignment> {
        let response = self
            .request(
                reqwest::Method::PUT,
                &format!("/shorts/{}/assignments/{}", short_id, role),
            )
            .json(&req)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn delete_assignment(&self, short_id: i64, role: AssignmentRole) -> Result<()> {
        let response = self
            .request(
                reqwest::Method::DELETE,
                &format!("/shorts/{}/assignments/{}", short_id, role),
            )
            .send()
            .await?;
        Self::decode_empty(response).await
    }

    async fn mark_clips_complete(&self, short_id: i64) -> Result<()> {
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/shorts/{}/clips-complete", short_id),
            )
            .send()
            .await?;
        Self::decode_empty(response).await
    }

    async fn mark_editing_complete(&self, short_id: i64) -> Result<()> {
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/shorts/{}/editing-complete", short_id),
            )
            .send()
            .await?;
        Self::decode_empty(response).await
    }

    async fn reserve_upload(&self, short_id: i64, req: ReserveUploadRequest) -> Result<UploadTicket> {
        let response = self
            .request(reqwest::Method::POST, &format!("/shorts/{}/uploads", short_id))
            .json(&req)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn confirm_upload(&self, short_id: i64, req: ConfirmUploadRequest) -> Result<ShortFile> {
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/shorts/{}/uploads/confirm", short_id),
            )
            .json(&req)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn delete_file(&self, file_id: i64) -> Result<()> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/files/{}", file_id))
            .send()
            .await?;
        match Self::decode_empty(response).await {
            // Already gone counts as deleted.
            Err(AppError::NotFound(_)) => {
                tracing::debug!("File {} already deleted", file_id);
                Ok(())
            }
            other => other,
        }
    }

    async fn delete_short(&self, short_id: i64) -> Result<()> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/shorts/{}", short_id))
            .send()
            .await?;
        Self::decode_empty(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{delete, get};
    use axum::{Json, Router};
    use std::sync::{Arc, Mutex};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn api_for(base_url: String) -> HttpBoardApi {
        HttpBoardApi::new(&ApiConfig {
            base_url,
            auth_token: "test-token".to_string(),
            request_timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_shorts_sends_bearer_and_unwraps_envelope() {
        let seen_auth: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
        let seen_handle = seen_auth.clone();
        let router = Router::new().route(
            "/shorts",
            get(move |headers: HeaderMap| {
                let seen = seen_handle.clone();
                async move {
                    *seen.lock().unwrap() = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(String::from);
                    Json(json!({ "success": true, "data": [], "message": null, "errors": null }))
                }
            }),
        );
        let base = serve(router).await;

        let shorts = api_for(base).list_shorts(true).await.unwrap();
        assert!(shorts.is_empty());
        assert_eq!(
            seen_auth.lock().unwrap().as_deref(),
            Some("Bearer test-token")
        );
    }

    #[tokio::test]
    async fn test_error_envelope_message_surfaces_verbatim() {
        let router = Router::new().route(
            "/shorts/1",
            get(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({
                        "success": false,
                        "data": null,
                        "message": "Clips are not complete yet",
                        "errors": null
                    })),
                )
            }),
        );
        let base = serve(router).await;

        let err = api_for(base).get_short(1).await.unwrap_err();
        match err {
            AppError::Server { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Clips are not complete yet");
            }
            other => panic!("expected server error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_short_maps_to_not_found() {
        let router = Router::new().route(
            "/shorts/99",
            get(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "success": false,
                        "data": null,
                        "message": "Short not found",
                        "errors": null
                    })),
                )
            }),
        );
        let base = serve(router).await;

        let err = api_for(base).get_short(99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(m) if m == "Short not found"));
    }

    #[tokio::test]
    async fn test_delete_file_treats_missing_row_as_deleted() {
        let router = Router::new().route(
            "/files/7",
            delete(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "success": false,
                        "data": null,
                        "message": "File not found",
                        "errors": null
                    })),
                )
            }),
        );
        let base = serve(router).await;

        api_for(base).delete_file(7).await.unwrap();
    }
}
