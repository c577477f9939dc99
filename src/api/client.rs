// src/api/client.rs
//! Thin HTTP client for the Notion API.
//!
//! Handles authentication and raw request/response plumbing; parsing lives
//! in [`super::parser`].

use super::pagination::fetch_all_pages;
use super::parser;
use crate::constants::{NOTION_API_BASE_URL, NOTION_API_PAGE_SIZE, NOTION_API_VERSION};
use crate::error::AppError;
use crate::model::{Block, Page};
use crate::types::{ApiKey, BlockId, DatabaseId, PageId};
use reqwest::{header, Client, Response};
use serde::Serialize;
use serde_json::Value;

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        Self::with_base_url(api_key, NOTION_API_BASE_URL)
    }

    /// Same as [`NotionHttpClient::new`] against another endpoint root.
    pub fn with_base_url(api_key: &ApiKey, base_url: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_API_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// Makes a GET request to `endpoint` with the given query parameters.
    pub async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Response, AppError> {
        let url = self.url(endpoint);
        log::debug!("GET {}", url);
        Ok(self.client.get(url).query(query).send().await?)
    }

    /// Makes a POST request with JSON body to the specified endpoint.
    pub async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, AppError> {
        let url = self.url(endpoint);
        log::debug!("POST {}", url);
        Ok(self.client.post(url).json(body).send().await?)
    }
}

/// Adds the pagination fields to a query body.
///
/// Non-object bodies are replaced by an object holding only those fields.
fn paged_body(body: &Value, page_size: usize, cursor: Option<String>) -> Value {
    let mut paged = match body {
        Value::Object(map) => map.clone(),
        _ => serde_json::Map::new(),
    };
    paged.insert("page_size".to_string(), Value::from(page_size));
    if let Some(cursor) = cursor {
        paged.insert("start_cursor".to_string(), Value::from(cursor));
    }
    Value::Object(paged)
}

#[async_trait::async_trait]
impl super::NotionRepository for NotionHttpClient {
    async fn retrieve_page(&self, id: &PageId) -> Result<Page, AppError> {
        let endpoint = format!("pages/{}", id.to_dashed());
        let response = self.get(&endpoint, &[]).await?;
        let result = extract_response_text(response).await?;
        parser::parse_page_response(result)
    }

    async fn retrieve_children(&self, parent: &BlockId) -> Result<Vec<Block>, AppError> {
        let endpoint = format!("blocks/{}/children", parent.to_dashed());
        let pagination_result = fetch_all_pages(
            |page_size, cursor| {
                let endpoint = endpoint.clone();
                async move {
                    let mut query = vec![("page_size", page_size.to_string())];
                    if let Some(cursor) = cursor {
                        query.push(("start_cursor", cursor));
                    }
                    let response = self.get(&endpoint, &query).await?;
                    let result = extract_response_text(response).await?;
                    parser::parse_blocks_pagination(result)
                }
            },
            NOTION_API_PAGE_SIZE,
            None,
        )
        .await?;
        Ok(pagination_result.items)
    }

    async fn query_database(
        &self,
        database: &DatabaseId,
        body: Value,
        limit: Option<usize>,
    ) -> Result<Vec<Page>, AppError> {
        let endpoint = format!("databases/{}/query", database.to_dashed());
        log::info!("Querying database {}", database);
        log::debug!("Query body: {}", body);

        let body = &body;
        let pagination_result = fetch_all_pages(
            |page_size, cursor| {
                let endpoint = endpoint.clone();
                async move {
                    let paged = paged_body(body, page_size, cursor);
                    let response = self.post(&endpoint, &paged).await?;
                    let result = extract_response_text(response).await?;
                    parser::parse_pages_pagination(result)
                }
            },
            limit.unwrap_or(NOTION_API_PAGE_SIZE),
            limit.map(|_| 1),
        )
        .await?;

        log::info!(
            "Database {} returned {} pages in {} batches",
            database,
            pagination_result.items.len(),
            pagination_result.batches
        );
        Ok(pagination_result.items)
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paged_body_keeps_filter() {
        let body = json!({"filter": {"property": "Done", "checkbox": {"equals": true}}});
        let paged = paged_body(&body, 100, Some("abc".to_string()));
        assert_eq!(
            paged,
            json!({
                "filter": {"property": "Done", "checkbox": {"equals": true}},
                "page_size": 100,
                "start_cursor": "abc"
            })
        );
    }

    #[test]
    fn test_paged_body_without_cursor() {
        let paged = paged_body(&Value::Null, 5, None);
        assert_eq!(paged, json!({"page_size": 5}));
    }

    #[test]
    fn test_client_builds_with_valid_key() {
        let key = ApiKey::new("secret_abcdefghijklmnopqrstuvwxyz0123456789ABCDEFG").unwrap();
        let client = NotionHttpClient::with_base_url(&key, "http://localhost:1/v1/").unwrap();
        assert_eq!(client.url("pages/x"), "http://localhost:1/v1/pages/x");
    }
}
