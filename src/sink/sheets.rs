//! Google Sheets row sink.
//!
//! Appends rows through the `values.append` REST endpoint. Token acquisition
//! (service-account OAuth) is outside this crate's scope: the sink consumes a
//! ready bearer token supplied by configuration.

use async_trait::async_trait;
use serde_json::json;

use super::{PostRow, PostSink, SinkError};

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Sink that appends rows to a Google Sheets worksheet.
#[derive(Debug, Clone)]
pub struct SheetsSink {
    http: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    worksheet: String,
    access_token: String,
}

impl SheetsSink {
    pub fn new(
        spreadsheet_id: impl Into<String>,
        worksheet: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            worksheet: worksheet.into(),
            access_token: access_token.into(),
        }
    }

    /// Override the API base URL (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}/values/{}:append?valueInputOption=RAW",
            self.base_url, self.spreadsheet_id, self.worksheet
        )
    }
}

#[async_trait]
impl PostSink for SheetsSink {
    async fn append(&self, row: &PostRow) -> Result<(), SinkError> {
        let body = json!({
            "values": [[
                row.timestamp.to_rfc3339(),
                row.topic,
                row.draft,
                row.final_post,
                row.total_tokens,
                row.cost,
            ]],
        });

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SinkError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_shape() {
        let sink = SheetsSink::new("sheet-id", "Posts", "token");
        assert_eq!(
            sink.endpoint(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-id/values/Posts:append?valueInputOption=RAW"
        );
    }
}
