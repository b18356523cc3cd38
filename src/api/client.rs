//! HTTP client for the FlowPrint server API.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::api::error::{ApiError, ApiResult};
use crate::api::types::{
    ApiResponse, LogsResponse, ReprintRequest, ServiceConfig, StatusSnapshot,
};
use crate::constants::REQUEST_TIMEOUT_SECS;

/// Typed wrapper over the server's REST endpoints.
#[derive(Clone)]
pub struct FlowPrintClient {
    client: Client,
    base_url: String,
}

impl FlowPrintClient {
    /// Build a client for the given base URL (e.g. `http://127.0.0.1:5000`).
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Websocket URL for the push channel, derived from the base URL.
    pub fn push_url(&self) -> String {
        let ws_base = if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            format!("ws://{}", self.base_url)
        };
        format!("{}/socket", ws_base)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn fetch_status(&self) -> ApiResult<StatusSnapshot> {
        let body = self
            .client
            .get(self.url("/api/status"))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn fetch_config(&self) -> ApiResult<ServiceConfig> {
        let body = self
            .client
            .get(self.url("/api/config"))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Save the settings document. Validates presence rules first so a
    /// bad form never produces a request.
    pub async fn save_config(&self, config: &ServiceConfig) -> ApiResult<ApiResponse> {
        config.validate()?;
        self.post_command("/api/config", Some(config)).await
    }

    pub async fn reset_config(&self) -> ApiResult<ApiResponse> {
        self.post_command::<()>("/api/config/reset", None).await
    }

    pub async fn test_connection(&self, config: &ServiceConfig) -> ApiResult<ApiResponse> {
        let probe = MailProbe {
            imap_host: &config.imap_host,
            imap_port: config.imap_port,
            imap_use_ssl: config.imap_use_ssl,
            imap_username: &config.imap_username,
            imap_password: &config.imap_password,
            mailbox: &config.mailbox,
        };
        self.post_command("/api/test-connection", Some(&probe)).await
    }

    pub async fn start_service(&self) -> ApiResult<ApiResponse> {
        self.post_command::<()>("/api/start", None).await
    }

    pub async fn stop_service(&self) -> ApiResult<ApiResponse> {
        self.post_command::<()>("/api/stop", None).await
    }

    pub async fn manual_check(&self) -> ApiResult<ApiResponse> {
        self.post_command::<()>("/api/manual-check", None).await
    }

    pub async fn reprint(&self, request: &ReprintRequest) -> ApiResult<ApiResponse> {
        self.post_command("/api/reprint", Some(request)).await
    }

    pub async fn clear_cache(&self) -> ApiResult<ApiResponse> {
        self.post_command::<()>("/api/clear-cache", None).await
    }

    pub async fn fetch_logs(&self) -> ApiResult<Vec<String>> {
        let body = self
            .client
            .get(self.url("/api/logs"))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let logs: LogsResponse = serde_json::from_str(&body)?;
        Ok(logs.logs)
    }

    /// Raw log text for saving to a local file.
    pub async fn download_logs(&self) -> ApiResult<String> {
        Ok(self
            .client
            .get(self.url("/api/logs/download"))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }

    /// POST a command endpoint and fold `success: false` bodies into
    /// application errors.
    async fn post_command<B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<ApiResponse> {
        let mut request = self.client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        // command endpoints report failures in the body, sometimes with
        // a non-2xx status; read the body either way
        let text = response.text().await?;
        let parsed: ApiResponse = serde_json::from_str(&text)?;
        if parsed.success {
            Ok(parsed)
        } else {
            Err(ApiError::Application(parsed.text()))
        }
    }
}

#[derive(Serialize)]
struct MailProbe<'a> {
    imap_host: &'a str,
    imap_port: u16,
    imap_use_ssl: bool,
    imap_username: &'a str,
    imap_password: &'a str,
    mailbox: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_url_swaps_scheme_and_appends_socket() {
        let client = FlowPrintClient::new("http://127.0.0.1:5000").unwrap();
        assert_eq!(client.push_url(), "ws://127.0.0.1:5000/socket");

        let client = FlowPrintClient::new("https://print.example.com/").unwrap();
        assert_eq!(client.push_url(), "wss://print.example.com/socket");
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let client = FlowPrintClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/api/status"), "http://localhost:5000/api/status");
    }
}
