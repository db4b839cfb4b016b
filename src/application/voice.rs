//! Dictating an entry: record one utterance, then transcribe it

use crate::infrastructure::config::{Config, META_DIR};
use crate::infrastructure::recorder::MicrophoneRecorder;
use crate::infrastructure::{CaptureError, HttpTranscriber, Recorder, TranscribeError, Transcriber};
use std::path::Path;
use tracing::{info, warn};

/// Why a dictation produced no text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceFailure {
    MicrophoneUnavailable(String),
    NotRecognized,
    ServiceUnreachable(String),
}

impl VoiceFailure {
    /// Message suitable for showing to the user
    pub fn message(&self) -> String {
        match self {
            VoiceFailure::MicrophoneUnavailable(detail) => {
                format!("Microphone unavailable: {}", detail)
            }
            VoiceFailure::NotRecognized => {
                "Sorry, the speech could not be understood. Try again.".to_string()
            }
            VoiceFailure::ServiceUnreachable(detail) => {
                format!("Speech recognition service unavailable: {}", detail)
            }
        }
    }
}

/// Result of one dictation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Utterance {
    Text(String),
    Failed(VoiceFailure),
}

impl Utterance {
    /// Transcribed text, empty when the attempt failed
    pub fn text(&self) -> &str {
        match self {
            Utterance::Text(text) => text,
            Utterance::Failed(_) => "",
        }
    }
}

/// Microphone plus speech recognizer
pub struct VoiceInput {
    recorder: Box<dyn Recorder>,
    transcriber: Result<Box<dyn Transcriber>, String>,
}

impl VoiceInput {
    pub fn new(recorder: Box<dyn Recorder>, transcriber: Box<dyn Transcriber>) -> Self {
        VoiceInput {
            recorder,
            transcriber: Ok(transcriber),
        }
    }

    /// Microphone and HTTP recognizer from the journal configuration.
    /// Recordings are kept under `.chronomind/recordings` until transcribed.
    pub fn from_config(config: &Config, root: &Path) -> Self {
        let recorder: Box<dyn Recorder> = Box::new(MicrophoneRecorder::new(
            Some(config.voice.device.clone()),
            config.voice.record_secs,
            root.join(META_DIR).join("recordings"),
        ));
        let transcriber = HttpTranscriber::from_config(&config.voice)
            .map(|t| Box::new(t) as Box<dyn Transcriber>)
            .map_err(|e| e.to_string());

        VoiceInput {
            recorder,
            transcriber,
        }
    }

    /// Capture and transcribe one utterance. Never fails; problems come back
    /// as `Utterance::Failed`.
    pub fn listen(&self) -> Utterance {
        let transcriber = match &self.transcriber {
            Ok(transcriber) => transcriber,
            Err(e) => return self.fail(VoiceFailure::ServiceUnreachable(e.clone())),
        };

        let audio = match self.recorder.record() {
            Ok(audio) => audio,
            Err(CaptureError::NoAudio) => return self.fail(VoiceFailure::NotRecognized),
            Err(CaptureError::MicrophoneUnavailable(detail)) => {
                return self.fail(VoiceFailure::MicrophoneUnavailable(detail))
            }
        };

        info!(seconds = audio.seconds(), "captured utterance");
        let outcome = transcriber.transcribe(&audio.path);
        audio.discard();

        match outcome {
            Ok(text) => Utterance::Text(text),
            Err(TranscribeError::Unrecognized) => self.fail(VoiceFailure::NotRecognized),
            Err(TranscribeError::Service(detail)) => {
                self.fail(VoiceFailure::ServiceUnreachable(detail))
            }
        }
    }

    fn fail(&self, failure: VoiceFailure) -> Utterance {
        warn!(failure = ?failure, "dictation failed");
        Utterance::Failed(failure)
    }
}
