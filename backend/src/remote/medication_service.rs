use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::Value;
use shared::{MedicationResponse, RemoteInfo};
use thiserror::Error;

use crate::config::RemoteInfoSettings;

#[derive(Error, Debug)]
pub enum RemoteInfoError {
    #[error("Remote info endpoint is not configured")]
    NotConfigured,
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Remote info call failed with HTTP {0}")]
    Status(u16),
    #[error("Database tool call failed")]
    Rejected,
}

#[derive(Serialize)]
struct LookupRequest<'a> {
    username: &'a str,
    password: &'a str,
    disease_name: &'a str,
}

/// Client for the remote medication/treatment endpoint. Every failure is
/// reported as data (`{"error": ...}`) rather than as an `Err`.
#[derive(Clone)]
pub struct MedicationService {
    http_client: HttpClient,
    settings: RemoteInfoSettings,
}

impl MedicationService {
    pub fn new(settings: RemoteInfoSettings) -> Result<Self, RemoteInfoError> {
        let http_client = HttpClient::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            http_client,
            settings,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.settings.url.is_some()
    }

    pub async fn fetch(&self, class_name: &str) -> RemoteInfo {
        log::info!("Remote info call initiated for class: {}", class_name);
        match self.try_fetch(class_name).await {
            Ok(response) => {
                log::info!(
                    "Remote info call successful for class: {} ({} entries)",
                    class_name,
                    response.data.len()
                );
                RemoteInfo::Found(response)
            }
            Err(e) => {
                log::error!("Remote info call failed for class: {}, Error: {}", class_name, e);
                RemoteInfo::error(e.to_string())
            }
        }
    }

    async fn try_fetch(&self, class_name: &str) -> Result<MedicationResponse, RemoteInfoError> {
        let url = self.settings.url.as_deref().ok_or(RemoteInfoError::NotConfigured)?;
        let request = LookupRequest {
            username: self.settings.username.as_deref().unwrap_or_default().trim(),
            password: self.settings.password.as_deref().unwrap_or_default().trim(),
            disease_name: class_name.trim(),
        };

        let response = self.http_client.post(url).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(RemoteInfoError::Status(response.status().as_u16()));
        }

        let body: Value = response.json().await?;
        log::debug!("Remote info result for {}: {}", class_name, body);
        if body.get("status").and_then(Value::as_str) != Some("success") {
            return Err(RemoteInfoError::Rejected);
        }
        Ok(serde_json::from_value(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use std::time::Duration;

    fn settings(url: Option<String>) -> RemoteInfoSettings {
        RemoteInfoSettings {
            url,
            username: Some(" clinic ".into()),
            password: Some("secret\n".into()),
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn success_body_is_parsed_with_extra_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/lookup")
            .match_body(Matcher::Json(json!({
                "username": "clinic",
                "password": "secret",
                "disease_name": "Acne"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "status": "success",
                    "data": [{
                        "drug_name": "Benzoyl peroxide",
                        "dosage": "2.5%",
                        "duration": "8 weeks",
                        "route": "Topical",
                        "morning": "Yes",
                        "afternoon": "No",
                        "evening": "yes"
                    }],
                    "source": "formulary"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let service = MedicationService::new(settings(Some(format!("{}/lookup", server.url())))).unwrap();
        let info = service.fetch(" Acne ").await;
        mock.assert_async().await;

        let RemoteInfo::Found(response) = info else {
            panic!("expected success, got {:?}", info);
        };
        assert_eq!(response.data.len(), 1);
        let entry = &response.data[0];
        assert!(entry.morning);
        assert!(!entry.afternoon);
        assert!(!entry.evening);
        assert_eq!(response.extra["source"], "formulary");
    }

    #[tokio::test]
    async fn numeric_dosage_still_counts_as_success() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/lookup")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "status": "success",
                    "data": [{
                        "drug_name": "Amoxicillin",
                        "dosage": 500,
                        "duration": 7,
                        "route": "Oral",
                        "morning": "Yes"
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let service = MedicationService::new(settings(Some(format!("{}/lookup", server.url())))).unwrap();
        let RemoteInfo::Found(response) = service.fetch("BA- cellulitis").await else {
            panic!("numeric fields should not turn a success into an error");
        };
        assert_eq!(response.data[0].dosage, "500");
        assert_eq!(response.data[0].duration, "7");
        assert!(response.data[0].morning);
    }

    #[tokio::test]
    async fn non_success_status_becomes_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/lookup")
            .with_status(200)
            .with_body(r#"{"status": "failed", "message": "unknown disease"}"#)
            .create_async()
            .await;

        let service = MedicationService::new(settings(Some(format!("{}/lookup", server.url())))).unwrap();
        let info = service.fetch("Rosacea").await;
        assert_eq!(info.error_message(), Some("Database tool call failed"));
    }

    #[tokio::test]
    async fn http_and_json_failures_become_errors() {
        let mut server = mockito::Server::new_async().await;
        server.mock("POST", "/down").with_status(503).create_async().await;
        server
            .mock("POST", "/garbled")
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        let down = MedicationService::new(settings(Some(format!("{}/down", server.url())))).unwrap();
        assert!(down.fetch("Acne").await.error_message().unwrap().contains("503"));

        let garbled = MedicationService::new(settings(Some(format!("{}/garbled", server.url())))).unwrap();
        assert!(garbled.fetch("Acne").await.error_message().is_some());
    }

    #[tokio::test]
    async fn unconfigured_endpoint_is_an_error_value() {
        let service = MedicationService::new(settings(None)).unwrap();
        assert!(!service.is_configured());
        assert_eq!(
            service.fetch("Acne").await.error_message(),
            Some("Remote info endpoint is not configured")
        );
    }
}
