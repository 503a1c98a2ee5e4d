//! HTTP client for a PostgREST-compatible data API (`{SUPABASE_URL}/rest/v1`).

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, instrument};

use learnhub_config::ProviderConfig;

use crate::{Caller, DataStore, Query, StoreError, StoreResult};

#[derive(Clone, Debug)]
pub struct PostgrestStore {
    http: Client,
    config: ProviderConfig,
}

impl PostgrestStore {
    pub fn new(config: ProviderConfig) -> StoreResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self { http, config })
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/{}", self.config.rest_url(), table)
    }

    /// Attaches the API key and the bearer for `caller`.
    fn authorize(&self, builder: RequestBuilder, caller: Caller<'_>) -> StoreResult<RequestBuilder> {
        let bearer = match caller {
            Caller::User(token) => token,
            Caller::Service => self
                .config
                .service_role_key
                .as_deref()
                .ok_or(StoreError::NotConfigured("service writes"))?,
        };

        Ok(builder
            .header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
            .header("Prefer", "return=representation"))
    }

    async fn send(&self, builder: RequestBuilder) -> StoreResult<Vec<Value>> {
        let response = builder
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        read_rows(response).await
    }
}

#[async_trait]
impl DataStore for PostgrestStore {
    fn name(&self) -> &'static str {
        "postgrest"
    }

    #[instrument(skip(self, query))]
    async fn select(
        &self,
        table: &str,
        query: &Query,
        caller: Caller<'_>,
    ) -> StoreResult<Vec<Value>> {
        let builder = self
            .http
            .get(self.endpoint(table))
            .query(&[("select", "*")])
            .query(&query.to_params());

        self.send(self.authorize(builder, caller)?).await
    }

    #[instrument(skip(self, row))]
    async fn insert(&self, table: &str, row: Value, caller: Caller<'_>) -> StoreResult<Value> {
        let builder = self.http.post(self.endpoint(table)).json(&row);

        self.send(self.authorize(builder, caller)?)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Unexpected {
                status: 201,
                message: format!("insert into {} returned no row", table),
            })
    }

    #[instrument(skip(self, query, patch))]
    async fn update(
        &self,
        table: &str,
        query: &Query,
        patch: Value,
        caller: Caller<'_>,
    ) -> StoreResult<Vec<Value>> {
        if query.is_unfiltered() {
            return Err(StoreError::Unfiltered("update"));
        }

        let builder = self
            .http
            .patch(self.endpoint(table))
            .query(&query.to_params())
            .json(&patch);

        self.send(self.authorize(builder, caller)?).await
    }

    #[instrument(skip(self, query))]
    async fn delete(
        &self,
        table: &str,
        query: &Query,
        caller: Caller<'_>,
    ) -> StoreResult<Vec<Value>> {
        if query.is_unfiltered() {
            return Err(StoreError::Unfiltered("delete"));
        }

        let builder = self
            .http
            .delete(self.endpoint(table))
            .query(&query.to_params());

        self.send(self.authorize(builder, caller)?).await
    }
}

async fn read_rows(response: Response) -> StoreResult<Vec<Value>> {
    let status = response.status();
    if !status.is_success() {
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string());
        debug!(status = %status.as_u16(), %message, "data API returned an error");

        return Err(if status.is_client_error() {
            StoreError::Rejected {
                status: status.as_u16(),
                message,
            }
        } else {
            StoreError::Unexpected {
                status: status.as_u16(),
                message,
            }
        });
    }

    // 204 answers carry no body.
    let bytes = response
        .bytes()
        .await
        .map_err(|e| StoreError::Transport(e.to_string()))?;
    if bytes.is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Array(rows)) => Ok(rows),
        Ok(row @ Value::Object(_)) => Ok(vec![row]),
        Ok(other) => Err(StoreError::Unexpected {
            status: status.as_u16(),
            message: format!("expected rows, got {}", other),
        }),
        Err(e) => Err(StoreError::Unexpected {
            status: status.as_u16(),
            message: format!("malformed response body: {}", e),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::{Path, Query as AxumQuery},
        http::{HeaderMap, StatusCode},
        routing::get,
    };
    use serde_json::json;
    use std::collections::HashMap;

    fn bearer(headers: &HeaderMap) -> String {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    async fn spawn_fake_data_api() -> PostgrestStore {
        let app = Router::new().route(
            "/rest/v1/{table}",
            get(
                |Path(table): Path<String>,
                 AxumQuery(params): AxumQuery<HashMap<String, String>>,
                 headers: HeaderMap| async move {
                    if bearer(&headers) != "Bearer user-token" {
                        return (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({ "message": "JWT expired" })),
                        );
                    }
                    assert_eq!(params.get("select").map(String::as_str), Some("*"));
                    (
                        StatusCode::OK,
                        Json(json!([{ "table": table, "filter": params.get("class_id") }])),
                    )
                },
            )
            .post(|headers: HeaderMap, Json(mut row): Json<Value>| async move {
                assert_eq!(bearer(&headers), "Bearer service-key");
                assert_eq!(
                    headers.get("prefer").and_then(|v| v.to_str().ok()),
                    Some("return=representation")
                );
                row["id"] = json!("row-1");
                (StatusCode::CREATED, Json(json!([row])))
            })
            .patch(
                |AxumQuery(params): AxumQuery<HashMap<String, String>>,
                 Json(patch): Json<Value>| async move {
                    let mut row = patch;
                    row["id"] = json!(params.get("id").cloned().unwrap_or_default());
                    (StatusCode::OK, Json(json!([row])))
                },
            )
            .delete(|| async {
                (
                    StatusCode::CONFLICT,
                    Json(json!({ "message": "still referenced" })),
                )
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let mut config = ProviderConfig::new(format!("http://{}", addr), "anon-key").unwrap();
        config.service_role_key = Some("service-key".to_string());
        PostgrestStore::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_select_sends_filters_as_user() {
        let store = spawn_fake_data_api().await;
        let rows = store
            .select(
                "assignments",
                &Query::new().eq("class_id", "c-1"),
                Caller::User("user-token"),
            )
            .await
            .unwrap();
        assert_eq!(rows, vec![json!({ "table": "assignments", "filter": "eq.c-1" })]);
    }

    #[tokio::test]
    async fn test_select_rejected_token() {
        let store = spawn_fake_data_api().await;
        let err = store
            .select("classes", &Query::new(), Caller::User("stale"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::Rejected {
                status: 401,
                message: "JWT expired".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_insert_returns_first_row() {
        let store = spawn_fake_data_api().await;
        let row = store
            .insert("profiles", json!({ "role": "STUDENT" }), Caller::Service)
            .await
            .unwrap();
        assert_eq!(row, json!({ "role": "STUDENT", "id": "row-1" }));
    }

    #[tokio::test]
    async fn test_update_sends_filter() {
        let store = spawn_fake_data_api().await;
        let rows = store
            .update(
                "submissions",
                &Query::new().eq("id", "s-1"),
                json!({ "grade": 80 }),
                Caller::User("user-token"),
            )
            .await
            .unwrap();
        assert_eq!(rows[0]["id"], "eq.s-1");
        assert_eq!(rows[0]["grade"], 80);
    }

    #[tokio::test]
    async fn test_delete_conflict_and_unfiltered() {
        let store = spawn_fake_data_api().await;
        let err = store
            .delete("classes", &Query::new().eq("id", "c-1"), Caller::User("user-token"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected { status: 409, .. }));

        assert_eq!(
            store
                .delete("classes", &Query::new(), Caller::User("user-token"))
                .await
                .unwrap_err(),
            StoreError::Unfiltered("delete")
        );
    }

    #[tokio::test]
    async fn test_service_calls_need_service_key() {
        let config = ProviderConfig::new("http://127.0.0.1:9", "anon-key").unwrap();
        let store = PostgrestStore::new(config).unwrap();
        assert_eq!(
            store
                .insert("profiles", json!({}), Caller::Service)
                .await
                .unwrap_err(),
            StoreError::NotConfigured("service writes")
        );
    }
}
