//! Summarization backends
//!
//! The model itself is a black box behind [`Summarizer`]. The hosted backend
//! talks to a Hugging Face style inference endpoint; the extractive backend
//! runs locally and needs no network.

use crate::domain::summary::{word_count, SummaryParams};
use crate::infrastructure::config::{SummarizerBackend, SummarizerConfig};
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Environment variables consulted for the inference API token, in order
pub const TOKEN_ENVS: [&str; 2] = ["CHRONOMIND_SUMMARIZER_TOKEN", "HF_API_TOKEN"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SummaryError {
    /// The model cannot be loaded or reached; retrying is pointless
    #[error("summarizer unavailable: {0}")]
    Unavailable(String),

    /// This one request failed; other inputs may still work
    #[error("summary generation failed: {0}")]
    Generation(String),
}

/// Turns a block of text into a short summary
pub trait Summarizer {
    fn summarize(&self, text: &str, params: &SummaryParams) -> Result<String, SummaryError>;

    /// Short description for logs and status lines
    fn describe(&self) -> String;
}

/// Build the backend selected in the configuration.
///
/// An `Err` here means the model could not be loaded at all.
pub fn from_config(config: &SummarizerConfig) -> Result<Box<dyn Summarizer>, SummaryError> {
    match config.backend {
        SummarizerBackend::Huggingface => {
            let token = TOKEN_ENVS
                .iter()
                .find_map(|key| std::env::var(key).ok())
                .filter(|t| !t.trim().is_empty());
            Ok(Box::new(HuggingFaceSummarizer::new(config, token)?))
        }
        SummarizerBackend::Extractive => Ok(Box::new(ExtractiveSummarizer)),
        SummarizerBackend::None => Err(SummaryError::Unavailable(
            "summaries are turned off (summarizer.backend = \"none\")".to_string(),
        )),
    }
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: &'a SummaryParams,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

/// Hosted summarization model behind an inference HTTP API
#[derive(Debug)]
pub struct HuggingFaceSummarizer {
    client: Client,
    url: String,
    token: Option<String>,
}

impl HuggingFaceSummarizer {
    pub fn new(config: &SummarizerConfig, token: Option<String>) -> Result<Self, SummaryError> {
        let model = config.model.trim();
        if model.is_empty() {
            return Err(SummaryError::Unavailable(
                "no summarization model configured".to_string(),
            ));
        }

        let url = format!("{}/models/{}", config.endpoint.trim_end_matches('/'), model);
        reqwest::Url::parse(&url).map_err(|e| {
            SummaryError::Unavailable(format!("invalid summarizer endpoint '{}': {}", url, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| SummaryError::Unavailable(e.to_string()))?;

        Ok(HuggingFaceSummarizer { client, url, token })
    }
}

impl Summarizer for HuggingFaceSummarizer {
    fn summarize(&self, text: &str, params: &SummaryParams) -> Result<String, SummaryError> {
        let body = InferenceRequest {
            inputs: text,
            parameters: params,
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        debug!(url = %self.url, words = word_count(text), "requesting summary");
        let response = request.send().map_err(|e| {
            if e.is_connect() {
                SummaryError::Unavailable(format!("cannot reach {}: {}", self.url, e))
            } else {
                SummaryError::Generation(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            let message = format!("{} returned {}: {}", self.url, status, detail.trim());
            return Err(match status {
                StatusCode::UNAUTHORIZED
                | StatusCode::FORBIDDEN
                | StatusCode::NOT_FOUND
                | StatusCode::SERVICE_UNAVAILABLE => SummaryError::Unavailable(message),
                _ => SummaryError::Generation(message),
            });
        }

        let value: Value = response
            .json()
            .map_err(|e| SummaryError::Generation(format!("malformed response: {}", e)))?;
        top_candidate(&value)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Pull the first candidate's text out of an inference response
fn top_candidate(value: &Value) -> Result<String, SummaryError> {
    if let Some(error) = value.get("error").and_then(Value::as_str) {
        return Err(SummaryError::Generation(error.to_string()));
    }

    let first = match value {
        Value::Array(items) => items.first(),
        other => Some(other),
    };

    first
        .and_then(|item| {
            item.get("summary_text")
                .or_else(|| item.get("generated_text"))
                .and_then(Value::as_str)
        })
        .map(str::to_string)
        .ok_or_else(|| SummaryError::Generation("response has no summary_text".to_string()))
}

fn sentence_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"[^.!?]+[.!?]*").unwrap())
}

/// Lead-sentence summary: leading sentences while they fit in `max_length` words
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtractiveSummarizer;

impl Summarizer for ExtractiveSummarizer {
    fn summarize(&self, text: &str, params: &SummaryParams) -> Result<String, SummaryError> {
        let budget = params.max_length.max(1);
        let mut picked: Vec<&str> = Vec::new();
        let mut used = 0;

        for sentence in sentence_regex().find_iter(text) {
            let sentence = sentence.as_str().trim();
            if sentence.is_empty() {
                continue;
            }

            let words = word_count(sentence);
            if used + words > budget {
                if picked.is_empty() {
                    let clipped: Vec<&str> = sentence.split_whitespace().take(budget).collect();
                    return Ok(clipped.join(" "));
                }
                break;
            }

            picked.push(sentence);
            used += words;
        }

        if picked.is_empty() {
            return Err(SummaryError::Generation("nothing to summarize".to_string()));
        }
        Ok(picked.join(" "))
    }

    fn describe(&self) -> String {
        "extractive (local)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SummaryPreset;
    use crate::test_support::{closed_port_url, lock_env, serve_once};

    fn hf_config(endpoint: &str) -> SummarizerConfig {
        SummarizerConfig {
            endpoint: endpoint.to_string(),
            timeout_secs: 5,
            ..SummarizerConfig::default()
        }
    }

    fn params() -> SummaryParams {
        SummaryPreset::Fixed.params_for("")
    }

    #[test]
    fn test_hosted_summary_success() {
        let server = serve_once(200, r#"[{"summary_text": "Summary: A calm week outdoors."}]"#);
        let summarizer =
            HuggingFaceSummarizer::new(&hf_config(&server.url), Some("secret".to_string()))
                .unwrap();

        let out = summarizer
            .summarize("Went hiking today, great weather.", &params())
            .unwrap();
        assert_eq!(out, "Summary: A calm week outdoors.");

        let request = server.request();
        assert!(request.starts_with("POST /models/facebook/bart-base"));
        assert!(request.to_lowercase().contains("authorization: bearer secret"));
        assert!(request.contains("\"inputs\":\"Went hiking today, great weather.\""));
        assert!(request.contains("\"num_beams\":4"));
        assert!(request.contains("\"wait_for_model\":true"));
    }

    #[test]
    fn test_hosted_model_missing_is_unavailable() {
        let server = serve_once(404, r#"{"error": "Model not found"}"#);
        let summarizer = HuggingFaceSummarizer::new(&hf_config(&server.url), None).unwrap();

        let err = summarizer.summarize("some text", &params()).unwrap_err();
        assert!(matches!(err, SummaryError::Unavailable(_)));
        server.request();
    }

    #[test]
    fn test_hosted_bad_input_is_generation_error() {
        let server = serve_once(400, r#"{"error": "input too long"}"#);
        let summarizer = HuggingFaceSummarizer::new(&hf_config(&server.url), None).unwrap();

        let err = summarizer.summarize("some text", &params()).unwrap_err();
        assert!(matches!(err, SummaryError::Generation(_)));
        server.request();
    }

    #[test]
    fn test_hosted_unreachable_is_unavailable() {
        let summarizer = HuggingFaceSummarizer::new(&hf_config(&closed_port_url()), None).unwrap();
        let err = summarizer.summarize("some text", &params()).unwrap_err();
        assert!(matches!(err, SummaryError::Unavailable(_)));
    }

    #[test]
    fn test_invalid_endpoint_fails_to_load() {
        let err = HuggingFaceSummarizer::new(&hf_config("not a url"), None).unwrap_err();
        assert!(matches!(err, SummaryError::Unavailable(_)));

        let mut config = hf_config("http://localhost");
        config.model = "  ".to_string();
        assert!(HuggingFaceSummarizer::new(&config, None).is_err());
    }

    #[test]
    fn test_top_candidate_shapes() {
        let array: Value = serde_json::from_str(r#"[{"summary_text": "a"}, {"summary_text": "b"}]"#).unwrap();
        assert_eq!(top_candidate(&array).unwrap(), "a");

        let generated: Value = serde_json::from_str(r#"{"generated_text": "c"}"#).unwrap();
        assert_eq!(top_candidate(&generated).unwrap(), "c");

        let empty: Value = serde_json::from_str("[]").unwrap();
        assert!(top_candidate(&empty).is_err());

        let error: Value = serde_json::from_str(r#"{"error": "overloaded"}"#).unwrap();
        assert_eq!(
            top_candidate(&error).unwrap_err(),
            SummaryError::Generation("overloaded".to_string())
        );
    }

    #[test]
    fn test_extractive_takes_leading_sentences() {
        let text = "Went hiking today, great weather. Finished reading a book. Cooked pasta.";
        let mut p = params();
        p.max_length = 9;
        assert_eq!(
            ExtractiveSummarizer.summarize(text, &p).unwrap(),
            "Went hiking today, great weather. Finished reading a book."
        );

        p.max_length = 3;
        assert_eq!(
            ExtractiveSummarizer.summarize(text, &p).unwrap(),
            "Went hiking today,"
        );
    }

    #[test]
    fn test_extractive_rejects_blank_input() {
        assert!(ExtractiveSummarizer.summarize("   ", &params()).is_err());
    }

    #[test]
    fn test_from_config_backends() {
        let _env = lock_env();

        let mut config = SummarizerConfig::default();
        config.backend = SummarizerBackend::Extractive;
        assert_eq!(from_config(&config).unwrap().describe(), "extractive (local)");

        config.backend = SummarizerBackend::None;
        assert!(matches!(
            from_config(&config),
            Err(SummaryError::Unavailable(_))
        ));

        config.backend = SummarizerBackend::Huggingface;
        assert!(from_config(&config)
            .unwrap()
            .describe()
            .ends_with("/models/facebook/bart-base"));
    }
}
