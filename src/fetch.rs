use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::{Context, anyhow};

use crate::frame::{DigitFrame, GeneratePayload};

/// Validates the digit input field: an integer in 0..=9, surrounding
/// whitespace tolerated. Anything else means no request is made.
pub fn parse_digit(input: &str) -> Option<u8> {
    match input.trim().parse::<u8>() {
        Ok(digit) if digit <= 9 => Some(digit),
        _ => None,
    }
}

/// Result of asking one source for images of a digit.
pub enum FetchOutcome {
    /// At least one decoded frame.
    Frames(Vec<DigitFrame>),
    /// The source answered but had no images for this digit.
    Empty,
    /// Network error, non-2xx status, or an undecodable body.
    Failed(anyhow::Error),
}

/// One place generated digit images can come from. Sources are tried
/// in order; `Empty` and `Failed` both mean "try the next one".
pub trait FrameSource: Send {
    fn label(&self) -> &str;
    fn fetch(&self, digit: u8) -> FetchOutcome;
}

/// A generation endpoint speaking `GET {base}/generate/{digit}` with a
/// `{"images": [...]}` JSON response.
pub struct HttpSource {
    label: String,
    base_url: String,
}

impl HttpSource {
    pub fn new(label: &str, base_url: &str) -> Self {
        Self {
            label: label.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, digit: u8) -> anyhow::Result<Vec<DigitFrame>> {
        let url = format!("{}/generate/{}", self.base_url, digit);
        // ureq turns 4xx/5xx statuses into errors, which is exactly the
        // "treat as failure" semantics the fallback needs.
        let mut response = ureq::get(&url)
            .call()
            .with_context(|| format!("request to {} failed", url))?;
        let payload: GeneratePayload = response
            .body_mut()
            .read_json()
            .with_context(|| format!("undecodable response from {}", url))?;
        payload
            .images
            .into_iter()
            .map(|rows| DigitFrame::from_rows(rows).map_err(|e| anyhow!(e)))
            .collect::<anyhow::Result<Vec<_>>>()
            .with_context(|| format!("malformed image data from {}", url))
    }
}

impl FrameSource for HttpSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn fetch(&self, digit: u8) -> FetchOutcome {
        match self.request(digit) {
            Ok(frames) if frames.is_empty() => FetchOutcome::Empty,
            Ok(frames) => FetchOutcome::Frames(frames),
            Err(e) => FetchOutcome::Failed(e),
        }
    }
}

/// Tries each source in order until one returns frames. Soft failures
/// (empty payloads) and hard failures are logged and both fall through
/// to the next source; running out of sources is the terminal error.
pub fn fetch_with_fallback(
    sources: &[Box<dyn FrameSource>],
    digit: u8,
    cancel: &AtomicBool,
) -> Option<anyhow::Result<Vec<DigitFrame>>> {
    for source in sources {
        if cancel.load(Ordering::Relaxed) {
            return None;
        }
        match source.fetch(digit) {
            FetchOutcome::Frames(frames) => {
                println!("{} images received from {} server", frames.len(), source.label());
                return Some(Ok(frames));
            }
            FetchOutcome::Empty => {
                eprintln!("No images returned for digit {} from {} server", digit, source.label());
            }
            FetchOutcome::Failed(e) => {
                eprintln!("Error fetching from {} server: {:#}", source.label(), e);
            }
        }
    }
    Some(Err(anyhow!("no source returned images for digit {}", digit)))
}

/// Terminal result of a fetch task, consumed by the UI layer.
pub enum FetchResult {
    Frames(Vec<DigitFrame>),
    Failed(anyhow::Error),
    Cancelled,
}

/// A fetch running on a worker thread. The render loop polls it once
/// per frame; the worker checks the cancel flag between sources.
pub struct FetchTask {
    digit: u8,
    rx: Receiver<FetchResult>,
    cancel: Arc<AtomicBool>,
}

impl FetchTask {
    pub fn spawn(sources: Vec<Box<dyn FrameSource>>, digit: u8) -> Self {
        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        thread::spawn(move || {
            let result = match fetch_with_fallback(&sources, digit, &flag) {
                Some(Ok(frames)) => FetchResult::Frames(frames),
                Some(Err(e)) => FetchResult::Failed(e),
                None => FetchResult::Cancelled,
            };
            // The receiver may be gone if the app quit; nothing to do.
            let _ = tx.send(result);
        });
        Self { digit, rx, cancel }
    }

    pub fn digit(&self) -> u8 {
        self.digit
    }

    /// Non-blocking; returns the result once the worker is done.
    pub fn poll(&self) -> Option<FetchResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(FetchResult::Failed(anyhow!("fetch worker terminated unexpectedly")))
            }
        }
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}
