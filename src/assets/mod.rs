//! # Asset Loading
//!
//! Disk-backed inputs of the showcase: the four environment cube maps and the
//! vector font used for the extruded text.
//!
//! Cube maps are decoded synchronously before the window opens. The font is read
//! on a loader thread and delivered exactly once through an [`AssetRequest`],
//! which the render loop polls every frame without blocking.

pub mod environment;
pub mod font;

use std::path::PathBuf;

use futures::channel::oneshot;
use thiserror::Error;

pub use environment::{draw_reflection_index, CubeMapImage, EnvironmentMapTable};
pub use font::VectorFont;

/// Errors raised while reading or decoding assets
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cube map face {} is {width}x{height}, expected {expected}x{expected}", .path.display())]
    CubeFaceSize {
        path: PathBuf,
        width: u32,
        height: u32,
        expected: u32,
    },

    #[error("failed to parse font {}: {source}", .path.display())]
    Font {
        path: PathBuf,
        #[source]
        source: ttf_parser::FaceParsingError,
    },

    #[error("font has no outlines for any character of {0:?}")]
    EmptyText(String),

    #[error("failed to tessellate text outline: {0}")]
    Tessellation(String),
}

/// One-shot delivery of an asset produced off the render thread
///
/// Resolves at most once. If the producing side goes away without sending, the
/// request settles as abandoned and never yields a value.
pub struct AssetRequest<T> {
    label: String,
    receiver: Option<oneshot::Receiver<T>>,
}

impl<T: Send + 'static> AssetRequest<T> {
    /// Creates a request and the sender that fulfils it
    pub fn channel(label: &str) -> (oneshot::Sender<T>, Self) {
        let (sender, receiver) = oneshot::channel();
        (
            sender,
            Self {
                label: label.to_string(),
                receiver: Some(receiver),
            },
        )
    }

    /// Runs `load` on a named background thread and delivers its success value
    ///
    /// Failures are logged and the request is abandoned.
    pub fn spawn<F>(label: &str, load: F) -> Self
    where
        F: FnOnce() -> Result<T, AssetError> + Send + 'static,
    {
        let (sender, request) = Self::channel(label);
        let thread_label = label.to_string();

        let spawned = std::thread::Builder::new()
            .name(format!("{label}-loader"))
            .spawn(move || match load() {
                Ok(value) => {
                    if sender.send(value).is_err() {
                        log::debug!("{} was loaded after its request was dropped", thread_label);
                    }
                }
                Err(err) => log::warn!("Failed to load {}: {}", thread_label, err),
            });

        if let Err(err) = spawned {
            log::warn!("Could not start loader thread for {}: {}", label, err);
        }

        request
    }

    /// Non-blocking check; returns the value the first time it is available
    pub fn poll(&mut self) -> Option<T> {
        let receiver = self.receiver.as_mut()?;
        match receiver.try_recv() {
            Ok(Some(value)) => {
                self.receiver = None;
                log::info!("{} ready", self.label);
                Some(value)
            }
            Ok(None) => None,
            Err(oneshot::Canceled) => {
                self.receiver = None;
                log::warn!("{} was never delivered; scene stays empty", self.label);
                None
            }
        }
    }

    /// True until the value has been delivered or the loader gave up
    pub fn is_pending(&self) -> bool {
        self.receiver.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_resolves_once() {
        let (sender, mut request) = AssetRequest::<u32>::channel("number");
        assert!(request.poll().is_none());
        assert!(request.is_pending());

        sender.send(7).unwrap();
        assert_eq!(request.poll(), Some(7));
        assert!(!request.is_pending());
        assert_eq!(request.poll(), None);
    }

    #[test]
    fn test_dropped_sender_abandons_request() {
        let (sender, mut request) = AssetRequest::<u32>::channel("number");
        drop(sender);
        assert_eq!(request.poll(), None);
        assert!(!request.is_pending());
    }

    #[test]
    fn test_failed_load_never_resolves() {
        let mut request = AssetRequest::<u32>::spawn("broken", || {
            Err(AssetError::EmptyText("nothing".to_string()))
        });

        // The loader thread drops its sender after logging the failure
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while request.is_pending() && std::time::Instant::now() < deadline {
            assert_eq!(request.poll(), None);
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(!request.is_pending());
    }

    #[test]
    fn test_spawned_load_delivers_value() {
        let mut request = AssetRequest::spawn("value", || Ok(String::from("loaded")));

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        let mut delivered = None;
        while delivered.is_none() && std::time::Instant::now() < deadline {
            delivered = request.poll();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert_eq!(delivered.as_deref(), Some("loaded"));
    }
}
