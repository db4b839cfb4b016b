use crate::infrastructure::recorder::{CaptureError, RecordedAudio, Recorder};
use std::cell::Cell;
use std::ffi::OsString;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Serializes every test that reads or changes process environment variables
pub fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

/// Puts an environment variable back the way it was on drop
pub struct EnvVarRestore {
    key: &'static str,
    previous: Option<OsString>,
}

impl EnvVarRestore {
    pub fn capture(key: &'static str) -> Self {
        Self {
            key,
            previous: std::env::var_os(key),
        }
    }
}

impl Drop for EnvVarRestore {
    fn drop(&mut self) {
        if let Some(value) = &self.previous {
            std::env::set_var(self.key, value);
        } else {
            std::env::remove_var(self.key);
        }
    }
}

/// HTTP server that answers exactly one request with a canned JSON response
pub struct OneShotServer {
    pub url: String,
    handle: JoinHandle<String>,
}

impl OneShotServer {
    /// Wait for the request to be served and return its raw text
    pub fn request(self) -> String {
        self.handle.join().unwrap()
    }
}

pub fn serve_once(status: u16, body: &str) -> OneShotServer {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let body = body.to_string();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reason(status),
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        request
    });

    OneShotServer { url, handle }
}

/// Address that refuses connections
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    stream
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();

    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).to_string()
}

/// Write a mono 16 kHz WAV with `samples` samples
pub fn write_wav(path: &Path, samples: usize) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..samples {
        writer.write_sample(((i % 100) as i16) * 100).unwrap();
    }
    writer.finalize().unwrap();
}

/// Recorder that "captures" a synthetic WAV of fixed length
pub struct FixtureRecorder {
    dir: PathBuf,
    samples: usize,
    count: Cell<usize>,
}

impl FixtureRecorder {
    pub fn new(dir: &Path, samples: usize) -> Self {
        FixtureRecorder {
            dir: dir.to_path_buf(),
            samples,
            count: Cell::new(0),
        }
    }
}

impl Recorder for FixtureRecorder {
    fn record(&self) -> Result<RecordedAudio, CaptureError> {
        std::fs::create_dir_all(&self.dir).unwrap();
        self.count.set(self.count.get() + 1);
        let path = self.dir.join(format!("fixture-{}.wav", self.count.get()));
        write_wav(&path, self.samples);
        RecordedAudio::open(path)
    }
}

/// Recorder whose device is always missing
pub struct NoMicrophone;

impl Recorder for NoMicrophone {
    fn record(&self) -> Result<RecordedAudio, CaptureError> {
        Err(CaptureError::MicrophoneUnavailable(
            "no default input device".to_string(),
        ))
    }
}
