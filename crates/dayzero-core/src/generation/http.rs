//! HTTP client for the plan generation service.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use super::{parse_plan, GeneratedPlan, GenerationRequest, PlanGenerator};
use crate::error::{DayZeroError, Result};

/// Posts [`GenerationRequest`]s as JSON to a single endpoint.
pub struct HttpPlanGenerator {
    endpoint: String,
    http: Client,
}

impl HttpPlanGenerator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(DayZeroError::Configuration {
                message: "generation endpoint URL is empty".to_string(),
            });
        }

        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { endpoint, http })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PlanGenerator for HttpPlanGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedPlan> {
        debug!(
            "generate: endpoint={} goals={} energy={} hours={} day={}",
            self.endpoint,
            request.goal_count(),
            request.energy_level.as_str(),
            request.available_time_hours,
            request.day_sequence
        );

        let response = self.http.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            debug!("generate: service returned {status}");
            return Err(DayZeroError::GenerationStatus {
                status: status.as_u16(),
                body,
            });
        }

        parse_plan(&body)
    }
}

#[cfg(test)]
mod tests {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;
    use crate::{
        error::ErrorKind,
        models::{EnergyLevel, UserProfile},
    };

    /// Serves exactly one canned HTTP response and returns the request body it
    /// received.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/generate", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
                if request_complete(&received) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: text/plain\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            let text = String::from_utf8_lossy(&received).to_string();
            text.split("\r\n\r\n").nth(1).unwrap_or_default().to_string()
        });

        (url, handle)
    }

    fn request_complete(received: &[u8]) -> bool {
        let text = String::from_utf8_lossy(received);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        body.len() >= length
    }

    fn request() -> GenerationRequest {
        GenerationRequest::for_profile(&UserProfile::default(), EnergyLevel::High, 3.0, 2)
    }

    #[tokio::test]
    async fn test_generate_parses_fenced_payload() {
        let (url, server) = serve_once(
            "200 OK",
            "```json\n{\"theme\": \"Focus\", \"tasks\": [{\"time\": \"09:00\", \"task\": \"Plan\", \"type\": \"work\", \"completed\": true}]}\n```",
        )
        .await;

        let generator = HttpPlanGenerator::new(url, Duration::from_secs(5)).unwrap();
        let plan = generator.generate(&request()).await.unwrap();
        assert_eq!(plan.theme.as_deref(), Some("Focus"));
        assert!(!plan.tasks[0].completed);

        let sent: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(sent["energyLevel"], "High");
        assert_eq!(sent["availableTimeHours"], 3.0);
        assert_eq!(sent["daySequence"], 2);
    }

    #[tokio::test]
    async fn test_non_success_status_is_generation_failure() {
        let (url, _server) = serve_once("503 Service Unavailable", "overloaded").await;

        let generator = HttpPlanGenerator::new(url, Duration::from_secs(5)).unwrap();
        let err = generator.generate(&request()).await.unwrap_err();
        match &err {
            DayZeroError::GenerationStatus { status, body } => {
                assert_eq!(*status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_malformed_body_is_validation_failure() {
        let (url, _server) = serve_once("200 OK", "I could not plan your day").await;

        let generator = HttpPlanGenerator::new(url, Duration::from_secs(5)).unwrap();
        let err = generator.generate(&request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transient() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/generate", listener.local_addr().unwrap());
        drop(listener);

        let generator = HttpPlanGenerator::new(url, Duration::from_secs(5)).unwrap();
        let err = generator.generate(&request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransientIo);
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        assert!(HttpPlanGenerator::new("  ", Duration::from_secs(1)).is_err());
    }
}
