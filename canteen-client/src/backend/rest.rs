//! REST backend
//!
//! Speaks the PostgREST dialect of the hosted service: tables under
//! `/rest/v1/<table>`, filters as `column=eq.value` query parameters,
//! `apikey` plus bearer authentication.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use shared::error::{AppError, ErrorCode};
use shared::models::{Canteen, MenuItem, NewNotification, VoteState, VoteUpdate};

use super::Backend;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

const REST_PREFIX: &str = "rest/v1";
/// Ask for a single JSON object instead of an array
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const VOTE_COLUMNS: &str = "votes,name,last_voter,last_vote_type";

/// Error body returned by the REST API
#[derive(Debug, Default, Deserialize)]
struct RestErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CategoryRow {
    #[serde(default)]
    category: Option<String>,
}

/// Which side of the protocol a failure happened on
#[derive(Debug, Clone, Copy)]
enum Access {
    Read,
    Write,
}

/// HTTP backend for the hosted service
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestBackend {
    /// Create a REST backend from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout_duration())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}/{}", self.base_url, REST_PREFIX, table)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("apikey", key).bearer_auth(key),
            None => request,
        }
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let request = self.authorize(self.client.get(self.table_url(table)).query(query));
        tracing::debug!(table, ?query, "REST select");
        let response = request.send().await.map_err(|e| transport_error(e, Access::Read))?;
        Self::handle_response(response, Access::Read).await
    }

    /// Map the HTTP response to a value or a backend error
    async fn handle_response<T: DeserializeOwned>(
        response: Response,
        access: Access,
    ) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text, access).into());
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ClientError::InvalidResponse(format!("{e}: {}", String::from_utf8_lossy(&bytes)))
        })
    }
}

fn transport_error(error: reqwest::Error, access: Access) -> ClientError {
    tracing::warn!(error = %error, ?access, "REST request failed");
    let app = match access {
        Access::Read => AppError::backend_read(error.to_string()),
        Access::Write => AppError::backend_write(error.to_string()),
    };
    app.with_detail("transport", true).into()
}

fn status_error(status: StatusCode, body: &str, access: Access) -> AppError {
    let parsed: RestErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .clone()
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    let code = match status {
        StatusCode::UNAUTHORIZED => ErrorCode::NotAuthenticated,
        StatusCode::NOT_FOUND => ErrorCode::NotFound,
        // A single-object request that matched zero rows
        StatusCode::NOT_ACCEPTABLE if parsed.code.as_deref() == Some("PGRST116") => {
            ErrorCode::NotFound
        }
        _ => match access {
            Access::Read => ErrorCode::BackendReadFailed,
            Access::Write => ErrorCode::BackendWriteFailed,
        },
    };

    let mut error = AppError::with_message(code, message).with_detail("status", status.as_u16());
    if let Some(native) = parsed.code {
        error = error.with_detail("native_code", native);
    }
    if let Some(details) = parsed.details {
        error = error.with_detail("details", details);
    }
    if let Some(hint) = parsed.hint {
        error = error.with_detail("hint", hint);
    }
    error
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

#[async_trait]
impl Backend for RestBackend {
    async fn list_canteens(&self) -> ClientResult<Vec<Canteen>> {
        self.select("canteens", &[("select", "*".to_string())]).await
    }

    async fn list_menu_items(&self, canteen_id: &str) -> ClientResult<Vec<MenuItem>> {
        self.select(
            "menu_items",
            &[("select", "*".to_string()), ("canteenid", eq(canteen_id))],
        )
        .await
    }

    async fn list_category_labels(&self, canteen_id: &str) -> ClientResult<Vec<String>> {
        let rows: Vec<CategoryRow> = self
            .select(
                "menu_items",
                &[("select", "category".to_string()), ("canteenid", eq(canteen_id))],
            )
            .await?;
        Ok(rows.into_iter().filter_map(|r| r.category).collect())
    }

    async fn fetch_vote_state(&self, item_id: &str) -> ClientResult<VoteState> {
        let request = self.authorize(
            self.client
                .get(self.table_url("menu_items"))
                .header(reqwest::header::ACCEPT, SINGLE_OBJECT)
                .query(&[("select", VOTE_COLUMNS.to_string()), ("id", eq(item_id))]),
        );
        let response = request.send().await.map_err(|e| transport_error(e, Access::Read))?;
        Self::handle_response(response, Access::Read)
            .await
            .map_err(|e| match e {
                ClientError::Backend(app) if app.code == ErrorCode::NotFound => {
                    AppError::menu_item_not_found(item_id).into()
                }
                other => other,
            })
    }

    async fn apply_vote(&self, item_id: &str, update: &VoteUpdate) -> ClientResult<MenuItem> {
        let request = self.authorize(
            self.client
                .patch(self.table_url("menu_items"))
                .query(&[("id", eq(item_id))])
                .header("Prefer", "return=representation")
                .json(update),
        );
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(e, Access::Write))?;
        let rows: Vec<MenuItem> = Self::handle_response(response, Access::Write).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| AppError::menu_item_not_found(item_id).into())
    }

    async fn insert_notification(&self, notification: &NewNotification) -> ClientResult<()> {
        let request = self.authorize(
            self.client
                .post(self.table_url("notifications"))
                .header("Prefer", "return=minimal")
                .json(notification),
        );
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(e, Access::Write))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text, Access::Write).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_status_error_parses_body() {
        let body = r#"{"message":"permission denied","code":"42501","details":null,"hint":"check policies"}"#;
        let err = status_error(StatusCode::FORBIDDEN, body, Access::Write);
        assert_eq!(err.code, ErrorCode::BackendWriteFailed);
        assert_eq!(err.message, "permission denied");
        assert_eq!(err.detail("native_code"), Some(&Value::from("42501")));
        assert_eq!(err.detail("hint"), Some(&Value::from("check policies")));
        assert_eq!(err.detail("status"), Some(&Value::from(403)));
    }

    #[test]
    fn test_zero_rows_on_single_object_is_not_found() {
        let body = r#"{"message":"JSON object requested, multiple (or no) rows returned","code":"PGRST116"}"#;
        let err = status_error(StatusCode::NOT_ACCEPTABLE, body, Access::Read);
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_non_json_error_body() {
        let err = status_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>", Access::Read);
        assert_eq!(err.code, ErrorCode::BackendReadFailed);
        assert_eq!(err.message, "HTTP 502");
    }

    #[test]
    fn test_table_url_trims_slash() {
        let backend = RestBackend::new(&ClientConfig::new("http://localhost:54321/")).unwrap();
        assert_eq!(
            backend.table_url("canteens"),
            "http://localhost:54321/rest/v1/canteens"
        );
    }
}
