//! Cloud speech recognition

use crate::infrastructure::config::VoiceConfig;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Environment variables consulted for the transcription API key, in order
pub const API_KEY_ENVS: [&str; 2] = ["CHRONOMIND_STT_API_KEY", "OPENAI_API_KEY"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranscribeError {
    /// The service answered but found no intelligible speech
    #[error("speech not recognized")]
    Unrecognized,

    /// The service could not be reached or refused the request
    #[error("speech service error: {0}")]
    Service(String),
}

/// Converts one recorded utterance into text
pub trait Transcriber {
    fn transcribe(&self, wav: &Path) -> Result<String, TranscribeError>;
}

/// OpenAI-compatible `/audio/transcriptions` client
#[derive(Debug)]
pub struct HttpTranscriber {
    client: Client,
    url: String,
    api_key: Option<String>,
    model: String,
    language: Option<String>,
}

impl HttpTranscriber {
    pub fn new(config: &VoiceConfig, api_key: Option<String>) -> Result<Self, TranscribeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| TranscribeError::Service(e.to_string()))?;

        let language = Some(config.language.trim().to_string()).filter(|l| !l.is_empty());

        Ok(HttpTranscriber {
            client,
            url: format!(
                "{}/audio/transcriptions",
                config.endpoint.trim_end_matches('/')
            ),
            api_key,
            model: config.model.clone(),
            language,
        })
    }

    /// Build from config, reading the API key from the environment
    pub fn from_config(config: &VoiceConfig) -> Result<Self, TranscribeError> {
        let api_key = API_KEY_ENVS
            .iter()
            .find_map(|key| std::env::var(key).ok())
            .filter(|k| !k.trim().is_empty());
        Self::new(config, api_key)
    }
}

impl Transcriber for HttpTranscriber {
    fn transcribe(&self, wav: &Path) -> Result<String, TranscribeError> {
        let audio = fs::read(wav)
            .map_err(|e| TranscribeError::Service(format!("cannot read recording: {}", e)))?;

        let part = Part::bytes(audio)
            .file_name("utterance.wav")
            .mime_str("audio/wav")
            .map_err(|e| TranscribeError::Service(e.to_string()))?;
        let mut form = Form::new()
            .part("file", part)
            .text("model", self.model.clone());
        if let Some(language) = &self.language {
            form = form.text("language", language.clone());
        }

        let mut request = self.client.post(&self.url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        debug!(url = %self.url, "sending utterance for transcription");
        let response = request
            .send()
            .map_err(|e| TranscribeError::Service(format!("cannot reach {}: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TranscribeError::Service(format!(
                "{} returned {}: {}",
                self.url,
                status,
                body.trim()
            )));
        }

        let json: Value = response
            .json()
            .map_err(|e| TranscribeError::Service(format!("malformed response: {}", e)))?;
        let text = json
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim()
            .to_string();

        if text.is_empty() {
            Err(TranscribeError::Unrecognized)
        } else {
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{closed_port_url, serve_once};
    use tempfile::TempDir;

    fn voice_config(endpoint: &str) -> VoiceConfig {
        VoiceConfig {
            endpoint: endpoint.to_string(),
            timeout_secs: 5,
            ..VoiceConfig::default()
        }
    }

    fn fake_wav(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("u.wav");
        fs::write(&path, b"RIFF....WAVE").unwrap();
        path
    }

    #[test]
    fn test_transcribe_success() {
        let temp = TempDir::new().unwrap();
        let server = serve_once(200, r#"{"text": "  Walked the dog in the rain. "}"#);
        let transcriber =
            HttpTranscriber::new(&voice_config(&server.url), Some("key".to_string())).unwrap();

        let text = transcriber.transcribe(&fake_wav(temp.path())).unwrap();
        assert_eq!(text, "Walked the dog in the rain.");

        let request = server.request();
        assert!(request.starts_with("POST /audio/transcriptions"));
        assert!(request.to_lowercase().contains("authorization: bearer key"));
        assert!(request.contains("whisper-1"));
        assert!(request.contains("name=\"language\""));
    }

    #[test]
    fn test_transcribe_empty_text_is_unrecognized() {
        let temp = TempDir::new().unwrap();
        let server = serve_once(200, r#"{"text": ""}"#);
        let transcriber = HttpTranscriber::new(&voice_config(&server.url), None).unwrap();

        assert_eq!(
            transcriber.transcribe(&fake_wav(temp.path())).unwrap_err(),
            TranscribeError::Unrecognized
        );
        server.request();
    }

    #[test]
    fn test_transcribe_server_error() {
        let temp = TempDir::new().unwrap();
        let server = serve_once(500, r#"{"error": "boom"}"#);
        let transcriber = HttpTranscriber::new(&voice_config(&server.url), None).unwrap();

        assert!(matches!(
            transcriber.transcribe(&fake_wav(temp.path())),
            Err(TranscribeError::Service(_))
        ));
        server.request();
    }

    #[test]
    fn test_transcribe_unreachable() {
        let temp = TempDir::new().unwrap();
        let transcriber = HttpTranscriber::new(&voice_config(&closed_port_url()), None).unwrap();

        match transcriber.transcribe(&fake_wav(temp.path())) {
            Err(TranscribeError::Service(msg)) => assert!(msg.contains("cannot reach")),
            other => panic!("expected service error, got {:?}", other),
        }
    }

    #[test]
    fn test_language_omitted_when_blank() {
        let mut config = voice_config("http://localhost");
        config.language = " ".to_string();
        let transcriber = HttpTranscriber::new(&config, None).unwrap();
        assert!(transcriber.language.is_none());
        assert_eq!(transcriber.url, "http://localhost/audio/transcriptions");
    }
}
