//! Microphone capture into WAV files

use chrono::Utc;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// No input device, or the device refused to stream
    #[error("microphone unavailable: {0}")]
    MicrophoneUnavailable(String),

    /// Recording finished but holds no samples
    #[error("no audio captured")]
    NoAudio,
}

/// One finished recording on disk
#[derive(Debug)]
pub struct RecordedAudio {
    pub path: PathBuf,
    pub samples: u32,
    pub sample_rate: u32,
}

impl RecordedAudio {
    /// Validate a finished WAV file. Empty or unreadable files are removed.
    pub fn open(path: PathBuf) -> Result<Self, CaptureError> {
        match inspect_wav(&path) {
            Ok((samples, sample_rate)) if samples > 0 => Ok(RecordedAudio {
                path,
                samples,
                sample_rate,
            }),
            Ok(_) => {
                let _ = fs::remove_file(&path);
                Err(CaptureError::NoAudio)
            }
            Err(e) => {
                let _ = fs::remove_file(&path);
                Err(CaptureError::MicrophoneUnavailable(format!(
                    "recording is not readable audio: {}",
                    e
                )))
            }
        }
    }

    pub fn seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.samples as f32 / self.sample_rate as f32
        }
    }

    /// Delete the WAV file
    pub fn discard(self) {
        if let Err(e) = fs::remove_file(&self.path) {
            debug!(path = %self.path.display(), error = %e, "could not remove recording");
        }
    }
}

/// Sample count (per channel) and sample rate of a WAV file
fn inspect_wav(path: &Path) -> Result<(u32, u32), hound::Error> {
    let reader = hound::WavReader::open(path)?;
    Ok((reader.duration(), reader.spec().sample_rate))
}

/// Captures one utterance and hands back the WAV file
pub trait Recorder {
    fn record(&self) -> Result<RecordedAudio, CaptureError>;
}

type SharedWriter = Arc<Mutex<Option<hound::WavWriter<BufWriter<File>>>>>;

/// Fixed-length recording from an input device through cpal
#[derive(Debug, Clone)]
pub struct MicrophoneRecorder {
    device: Option<String>,
    duration: Duration,
    output_dir: PathBuf,
}

impl MicrophoneRecorder {
    /// `device` picks an input by name; `None` uses the host default
    pub fn new(device: Option<String>, seconds: u64, output_dir: impl Into<PathBuf>) -> Self {
        MicrophoneRecorder {
            device: device.filter(|name| !name.trim().is_empty()),
            duration: Duration::from_secs(seconds.max(1)),
            output_dir: output_dir.into(),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    fn next_path(&self) -> PathBuf {
        let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        self.output_dir
            .join(format!("utterance-{}-{}.wav", std::process::id(), stamp))
    }

    fn select_device(&self, host: &cpal::Host) -> Result<cpal::Device, CaptureError> {
        if let Some(wanted) = &self.device {
            let devices = host.input_devices().map_err(|e| {
                CaptureError::MicrophoneUnavailable(format!("cannot list input devices: {}", e))
            })?;
            return devices
                .into_iter()
                .find(|device| device.name().map(|name| &name == wanted).unwrap_or(false))
                .ok_or_else(|| {
                    CaptureError::MicrophoneUnavailable(format!(
                        "no input device named '{}'",
                        wanted
                    ))
                });
        }

        host.default_input_device().ok_or_else(|| {
            CaptureError::MicrophoneUnavailable("no default input device".to_string())
        })
    }
}

impl Recorder for MicrophoneRecorder {
    fn record(&self) -> Result<RecordedAudio, CaptureError> {
        let host = cpal::default_host();
        let device = self.select_device(&host)?;
        let input_config = device.default_input_config().map_err(|e| {
            CaptureError::MicrophoneUnavailable(format!("no usable input configuration: {}", e))
        })?;

        fs::create_dir_all(&self.output_dir).map_err(|e| {
            CaptureError::MicrophoneUnavailable(format!(
                "cannot create {}: {}",
                self.output_dir.display(),
                e
            ))
        })?;
        let path = self.next_path();

        let spec = hound::WavSpec {
            channels: input_config.channels(),
            sample_rate: input_config.sample_rate().0,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let writer = hound::WavWriter::create(&path, spec).map_err(|e| {
            CaptureError::MicrophoneUnavailable(format!("cannot create recording: {}", e))
        })?;
        let writer: SharedWriter = Arc::new(Mutex::new(Some(writer)));

        debug!(
            path = %path.display(),
            seconds = self.duration.as_secs(),
            rate = spec.sample_rate,
            "recording utterance"
        );
        let captured = build_stream(
            &device,
            input_config.sample_format(),
            &input_config.into(),
            writer.clone(),
        )
        .and_then(|stream| {
            stream.play().map_err(|e| {
                CaptureError::MicrophoneUnavailable(format!("cannot start input stream: {}", e))
            })?;
            thread::sleep(self.duration);
            drop(stream);
            Ok(())
        });

        let finalized = finalize(&writer);
        if let Err(e) = captured.and(finalized) {
            let _ = fs::remove_file(&path);
            return Err(e);
        }

        RecordedAudio::open(path)
    }
}

fn finalize(writer: &SharedWriter) -> Result<(), CaptureError> {
    let mut guard = writer
        .lock()
        .map_err(|_| CaptureError::MicrophoneUnavailable("recording writer poisoned".to_string()))?;
    if let Some(writer) = guard.take() {
        writer.finalize().map_err(|e| {
            CaptureError::MicrophoneUnavailable(format!("cannot finish recording: {}", e))
        })?;
    }
    Ok(())
}

fn build_stream(
    device: &cpal::Device,
    sample_format: SampleFormat,
    config: &cpal::StreamConfig,
    writer: SharedWriter,
) -> Result<Stream, CaptureError> {
    match sample_format {
        SampleFormat::F32 => build_input_stream::<f32>(device, config, writer),
        SampleFormat::I16 => build_input_stream::<i16>(device, config, writer),
        SampleFormat::U16 => build_input_stream::<u16>(device, config, writer),
        other => Err(CaptureError::MicrophoneUnavailable(format!(
            "unsupported input sample format: {:?}",
            other
        ))),
    }
}

fn build_input_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    writer: SharedWriter,
) -> Result<Stream, CaptureError>
where
    T: cpal::SizedSample,
    i16: cpal::FromSample<T>,
{
    let on_data = move |data: &[T], _info: &cpal::InputCallbackInfo| {
        if let Ok(mut guard) = writer.lock() {
            if let Some(writer) = guard.as_mut() {
                for sample in data {
                    if let Err(e) = writer.write_sample(sample.to_sample::<i16>()) {
                        error!(error = %e, "failed writing sample");
                        break;
                    }
                }
            }
        }
    };

    device
        .build_input_stream(
            config,
            on_data,
            |e| error!(error = %e, "input stream error"),
            None,
        )
        .map_err(|e| CaptureError::MicrophoneUnavailable(format!("cannot open input stream: {}", e)))
}
