//! OpenRouter chat-completion client producing structured AQI forecasts

use super::{extract_content, RemoteError, RemoteForecast, RemoteForecaster, RemoteRequest};
use crate::config::RemoteSettings;
use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

const SYSTEM_PROMPT: &str = "You are a forecasting assistant for air quality index (AQI). \
Given a univariate daily AQI time series and a horizon, output a STRICT JSON object with this schema: \
{\"forecast\": {\"y\": number[], \"y_80\": number[], \"y_80_hi\": number[], \"y_95\": number[], \"y_95_hi\": number[]}}. \
All arrays must be length equal to the forecast horizon. \
Values must be reasonable AQI in [0,500]. Do not include any prose.";

/// Remote forecaster backed by an OpenRouter-hosted language model
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OpenRouterClient {
    /// Build a client from remote settings.
    ///
    /// Fails with [`RemoteError::MissingCredential`] when no API key is set.
    pub fn new(settings: &RemoteSettings) -> Result<Self, RemoteError> {
        let api_key = settings
            .credential()
            .ok_or(RemoteError::MissingCredential)?
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }

    fn payload(&self, request: &RemoteRequest) -> Value {
        let user_prompt = json!({
            "y_history": request.history,
            "h": request.horizon,
            "notes": "Daily AQI. Provide numeric arrays only.",
        });

        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": user_prompt.to_string()},
            ],
            "temperature": self.temperature,
            "response_format": {"type": "json_object"},
        })
    }
}

/// Map a non-success HTTP status to its failure kind
pub fn classify_status(status: StatusCode) -> Option<RemoteError> {
    if status.is_success() {
        None
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Some(RemoteError::Unauthorized(status.as_u16()))
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        Some(RemoteError::RateLimited)
    } else {
        Some(RemoteError::Status(status.as_u16()))
    }
}

fn transport_error(e: reqwest::Error) -> RemoteError {
    if e.is_timeout() {
        RemoteError::Timeout
    } else {
        RemoteError::Transport(e.to_string())
    }
}

#[async_trait]
impl RemoteForecaster for OpenRouterClient {
    async fn forecast(&self, request: &RemoteRequest) -> Result<RemoteForecast, RemoteError> {
        debug!(
            "Requesting {}-day forecast from {} with {} points",
            request.horizon,
            self.model,
            request.history.len()
        );

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&self.payload(request))
            .send()
            .await
            .map_err(transport_error)?;

        if let Some(err) = classify_status(response.status()) {
            match &err {
                RemoteError::Unauthorized(_) => error!("OpenRouter API key invalid or expired"),
                RemoteError::RateLimited => warn!("OpenRouter API rate limit exceeded"),
                _ => error!("OpenRouter API error: {}", response.status()),
            }
            return Err(err);
        }

        let body: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                RemoteError::Timeout
            } else {
                RemoteError::Malformed(format!("response body is not JSON: {}", e))
            }
        })?;

        let content = extract_content(&body)?;
        RemoteForecast::parse(content)
    }

    fn model_name(&self) -> String {
        format!("{} (OpenRouter)", self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(api_key: Option<&str>) -> RemoteSettings {
        RemoteSettings {
            api_key: api_key.map(str::to_string),
            ..RemoteSettings::default()
        }
    }

    #[test]
    fn test_missing_credential() {
        assert_eq!(
            OpenRouterClient::new(&settings(None)).unwrap_err(),
            RemoteError::MissingCredential
        );
        assert_eq!(
            OpenRouterClient::new(&settings(Some(""))).unwrap_err(),
            RemoteError::MissingCredential
        );
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(classify_status(StatusCode::OK), None);
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED),
            Some(RemoteError::Unauthorized(401))
        );
        assert_eq!(
            classify_status(StatusCode::FORBIDDEN),
            Some(RemoteError::Unauthorized(403))
        );
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS),
            Some(RemoteError::RateLimited)
        );
        assert_eq!(
            classify_status(StatusCode::BAD_GATEWAY),
            Some(RemoteError::Status(502))
        );
    }

    #[test]
    fn test_payload_shape() {
        let client = OpenRouterClient::new(&settings(Some("sk-test"))).unwrap();
        let request = RemoteRequest::new(&[40.0, 50.0], 3, 90);
        let payload = client.payload(&request);

        assert_eq!(payload["model"], "deepseek/deepseek-chat-v3.1:free");
        assert_eq!(payload["response_format"]["type"], "json_object");
        assert_eq!(payload["messages"][0]["role"], "system");

        let user: Value =
            serde_json::from_str(payload["messages"][1]["content"].as_str().unwrap()).unwrap();
        assert_eq!(user["h"], 3);
        assert_eq!(user["y_history"], json!([40.0, 50.0]));
        assert_eq!(client.model_name(), "deepseek/deepseek-chat-v3.1:free (OpenRouter)");
    }
}
