//! HTTP implementation of the migrator client.

use crate::config::BackendConfig;
use crate::error::ApiError;
use crate::migrator::{AnalysisOutcome, MigratorApi, Recommendation};
use crate::tree::Document;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    target_structure: Value,
    #[serde(default)]
    analysis_results: Value,
    project_id: String,
}

#[derive(Debug, Deserialize)]
struct RecommendResponse {
    status: String,
    #[serde(default)]
    data: Option<Recommendation>,
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    converted_code: String,
}

/// Error payload the backend attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// reqwest-based migrator client.
pub struct HttpMigratorClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpMigratorClient {
    pub fn new(config: &BackendConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(HttpMigratorClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Map a non-success response to `BackendRejected`, surfacing the
    /// backend's `detail` when the body carries one.
    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = match response.json::<ErrorBody>().await {
            Ok(body) => body.detail,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };
        Err(ApiError::BackendRejected { detail })
    }

    async fn post_for_archive(&self, path: &str, body: Value) -> Result<Vec<u8>, ApiError> {
        let response = self
            .http
            .post(self.endpoint(path))
            .json(&body)
            .send()
            .await?;
        let response = Self::check(response).await?;
        let bytes = response.bytes().await?;
        info!(endpoint = path, size = bytes.len(), "received migration archive");
        Ok(bytes.to_vec())
    }

    fn archive_form(file_name: &str, bytes: Vec<u8>) -> Form {
        Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()))
    }
}

#[async_trait]
impl MigratorApi for HttpMigratorClient {
    async fn analyze_repo(&self, repo_url: &str) -> Result<AnalysisOutcome, ApiError> {
        debug!(repo_url, "requesting repository analysis");
        let response = self
            .http
            .post(self.endpoint("github/analyze"))
            .json(&json!({ "github_url": repo_url }))
            .send()
            .await?;
        let parsed: AnalyzeResponse = Self::check(response).await?.json().await?;
        Ok(outcome_from(parsed))
    }

    async fn analyze_archive(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<AnalysisOutcome, ApiError> {
        debug!(file_name, size = bytes.len(), "uploading archive for analysis");
        let response = self
            .http
            .post(self.endpoint("zip/analyze"))
            .multipart(Self::archive_form(file_name, bytes))
            .send()
            .await?;
        let parsed: AnalyzeResponse = Self::check(response).await?.json().await?;
        Ok(outcome_from(parsed))
    }

    async fn migrate(
        &self,
        project_id: &str,
        target_structure: &Document,
        changes: bool,
    ) -> Result<Vec<u8>, ApiError> {
        self.post_for_archive(
            "migrate",
            json!({
                "project_id": project_id,
                "target_structure": target_structure.as_value(),
                "changes": changes,
            }),
        )
        .await
    }

    async fn migrate_repo(&self, repo_url: &str) -> Result<Vec<u8>, ApiError> {
        self.post_for_archive("github", json!({ "github_url": repo_url }))
            .await
    }

    async fn migrate_archive(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Vec<u8>, ApiError> {
        let response = self
            .http
            .post(self.endpoint("zip"))
            .multipart(Self::archive_form(file_name, bytes))
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn recommend(&self, file_name: &str) -> Result<Recommendation, ApiError> {
        let response = self
            .http
            .post(self.endpoint("recommend"))
            .json(&json!({ "file_name": file_name }))
            .send()
            .await?;
        let parsed: RecommendResponse = Self::check(response).await?.json().await?;
        if parsed.status != "success" {
            return Err(ApiError::BackendRejected {
                detail: parsed
                    .detail
                    .unwrap_or_else(|| "error generating recommendation".to_string()),
            });
        }
        parsed.data.ok_or_else(|| ApiError::BackendRejected {
            detail: "recommendation response carried no data".to_string(),
        })
    }

    async fn convert_snippet(
        &self,
        source_code: &str,
        file_types: &[String],
    ) -> Result<String, ApiError> {
        let response = self
            .http
            .post(self.endpoint("convert"))
            .json(&json!({
                "type": "single",
                "source_code": source_code,
                "file_types": file_types,
            }))
            .send()
            .await?;
        let parsed: ConvertResponse = Self::check(response).await?.json().await?;
        Ok(parsed.converted_code)
    }
}

fn outcome_from(parsed: AnalyzeResponse) -> AnalysisOutcome {
    AnalysisOutcome {
        project_id: parsed.project_id,
        target_structure: Document::from_value(parsed.target_structure),
        analysis_results: parsed.analysis_results,
    }
}
