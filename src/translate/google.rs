use super::TranslationService;
use crate::config::Config;
use crate::retry::{with_retry_if, RetryConfig};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Longest text the translation endpoint accepts.
pub const MAX_TRANSLATION_CHARS: usize = 5000;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{service} API error ({status}): {body}")]
    Api {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("request to {service} API failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected {service} API response: {detail}")]
    Malformed {
        service: &'static str,
        detail: String,
    },

    #[error("text is {0} characters, the limit is {}", MAX_TRANSLATION_CHARS)]
    TooLong(usize),
}

impl ServiceError {
    /// Network failures, rate limiting and 5xx are worth another attempt.
    fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Api { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            ServiceError::Request { .. } => true,
            ServiceError::Malformed { .. } | ServiceError::TooLong(_) => false,
        }
    }
}

#[derive(Debug, Serialize)]
struct DetectRequest<'a> {
    q: &'a str,
}

#[derive(Debug, Deserialize)]
struct DetectResponse {
    data: DetectData,
}

#[derive(Debug, Deserialize)]
struct DetectData {
    detections: Vec<Detection>,
}

#[derive(Debug, Deserialize)]
struct Detection {
    language: String,
}

/// Detection through a detectlanguage.com-compatible endpoint and
/// translation through Google's public `gtx` endpoint.
pub struct GoogleTranslator {
    client: reqwest::Client,
    detection_url: String,
    detection_api_key: String,
    translate_url: String,
    retry: RetryConfig,
}

impl GoogleTranslator {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            detection_url: config.detection_api_url.clone(),
            detection_api_key: config.detection_api_key.clone(),
            translate_url: config.translate_api_url.clone(),
            retry: RetryConfig::translation_api(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn detect_once(&self, text: &str) -> Result<String, ServiceError> {
        const SERVICE: &str = "detection";

        let response = self
            .client
            .post(&self.detection_url)
            .bearer_auth(&self.detection_api_key)
            .json(&DetectRequest { q: text })
            .send()
            .await
            .map_err(|source| ServiceError::Request {
                service: SERVICE,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                service: SERVICE,
                status,
                body,
            });
        }

        let parsed: DetectResponse = response.json().await.map_err(|e| ServiceError::Malformed {
            service: SERVICE,
            detail: e.to_string(),
        })?;

        parsed
            .data
            .detections
            .into_iter()
            .next()
            .map(|detection| detection.language)
            .ok_or_else(|| ServiceError::Malformed {
                service: SERVICE,
                detail: "no detections".to_string(),
            })
    }

    async fn translate_once(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, ServiceError> {
        const SERVICE: &str = "translation";

        let response = self
            .client
            .get(&self.translate_url)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|source| ServiceError::Request {
                service: SERVICE,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                service: SERVICE,
                status,
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Malformed {
                service: SERVICE,
                detail: e.to_string(),
            })?;

        parse_gtx_response(&body).ok_or_else(|| ServiceError::Malformed {
            service: SERVICE,
            detail: "missing translated segments".to_string(),
        })
    }
}

/// Join the translated segments of a `gtx` response: `[[["text", "src", ...], ...], ...]`.
///
/// A `null` segment list means the service had nothing to return.
fn parse_gtx_response(body: &Value) -> Option<String> {
    let segments = match body.get(0)? {
        Value::Null => return Some(String::new()),
        Value::Array(segments) => segments,
        _ => return None,
    };

    Some(
        segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect(),
    )
}

#[async_trait]
impl TranslationService for GoogleTranslator {
    async fn detect(&self, text: &str) -> Result<String> {
        let language = with_retry_if(
            &self.retry,
            "Language detection",
            || self.detect_once(text),
            ServiceError::is_retryable,
        )
        .await?;

        debug!("Detected language: {}", language);
        Ok(language)
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        if source.eq_ignore_ascii_case(target) {
            return Ok(text.to_string());
        }

        let length = text.chars().count();
        if length > MAX_TRANSLATION_CHARS {
            return Err(ServiceError::TooLong(length).into());
        }

        let translated = with_retry_if(
            &self.retry,
            &format!("Translation {source} -> {target}"),
            || self.translate_once(text, source, target),
            ServiceError::is_retryable,
        )
        .await?;

        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::{
        matchers::{body_json, header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn translator(server: &MockServer) -> GoogleTranslator {
        let mut config = test_config();
        config.detection_api_url = format!("{}/0.2/detect", server.uri());
        config.translate_api_url = format!("{}/translate_a/single", server.uri());
        GoogleTranslator::new(&config).with_retry(RetryConfig::new(3, Duration::from_millis(1)))
    }

    // ==================== gtx Response Parsing Tests ====================

    #[test]
    fn test_parse_gtx_single_segment() {
        let body = json!([[["Hello", "Hola", null, null, 10]], null, "es"]);
        assert_eq!(parse_gtx_response(&body).as_deref(), Some("Hello"));
    }

    #[test]
    fn test_parse_gtx_multiple_segments() {
        let body = json!([
            [["Hello. ", "Hola. ", null, null, 10], ["How are you?", "¿Cómo estás?", null, null, 10]],
            null,
            "es"
        ]);
        assert_eq!(
            parse_gtx_response(&body).as_deref(),
            Some("Hello. How are you?")
        );
    }

    #[test]
    fn test_parse_gtx_null_segments_is_empty() {
        let body = json!([null, null, "es"]);
        assert_eq!(parse_gtx_response(&body).as_deref(), Some(""));
    }

    #[test]
    fn test_parse_gtx_malformed() {
        assert_eq!(parse_gtx_response(&json!({"error": "x"})), None);
        assert_eq!(parse_gtx_response(&json!(["text"])), None);
    }

    // ==================== Retry Classification Tests ====================

    #[test]
    fn test_retryable_statuses() {
        let api = |status| ServiceError::Api {
            service: "translation",
            status,
            body: String::new(),
        };
        assert!(api(StatusCode::TOO_MANY_REQUESTS).is_retryable());
        assert!(api(StatusCode::BAD_GATEWAY).is_retryable());
        assert!(!api(StatusCode::UNAUTHORIZED).is_retryable());
        assert!(!api(StatusCode::BAD_REQUEST).is_retryable());
        assert!(!ServiceError::TooLong(6000).is_retryable());
    }

    // ==================== detect Tests ====================

    #[tokio::test]
    async fn test_detect_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/0.2/detect"))
            .and(header("Authorization", "Bearer test-detect-key"))
            .and(body_json(json!({"q": "Hola mundo"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"detections": [
                    {"language": "es", "isReliable": true, "confidence": 9.1},
                    {"language": "pt", "isReliable": false, "confidence": 2.0}
                ]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let language = translator(&server).detect("Hola mundo").await.unwrap();
        assert_eq!(language, "es");
    }

    #[tokio::test]
    async fn test_detect_no_detections_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/0.2/detect"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"detections": []}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        assert!(translator(&server).detect("???").await.is_err());
    }

    #[tokio::test]
    async fn test_detect_unauthorized_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/0.2/detect"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .expect(1)
            .mount(&server)
            .await;

        let error = translator(&server).detect("hello").await.unwrap_err();
        assert!(error.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_detect_server_error_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/0.2/detect"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        assert!(translator(&server).detect("hello").await.is_err());
    }

    // ==================== translate Tests ====================

    #[tokio::test]
    async fn test_translate_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .and(query_param("client", "gtx"))
            .and(query_param("sl", "es"))
            .and(query_param("tl", "en"))
            .and(query_param("q", "Hola mundo"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([[["Hello world", "Hola mundo", null, null, 10]], null, "es"])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let translated = translator(&server)
            .translate("Hola mundo", "es", "en")
            .await
            .unwrap();
        assert_eq!(translated, "Hello world");
    }

    #[tokio::test]
    async fn test_translate_same_language_skips_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let translated = translator(&server)
            .translate("Hello", "en", "EN")
            .await
            .unwrap();
        assert_eq!(translated, "Hello");
    }

    #[tokio::test]
    async fn test_translate_too_long_rejected_before_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let text = "a".repeat(MAX_TRANSLATION_CHARS + 1);
        assert!(translator(&server).translate(&text, "en", "fr").await.is_err());
    }

    #[tokio::test]
    async fn test_translate_null_result_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([null, null, "fr"])))
            .mount(&server)
            .await;

        let translated = translator(&server).translate("...", "fr", "en").await.unwrap();
        assert!(translated.is_empty());
    }
}
