//! Observer trait for pipeline events.
//!
//! Both pipelines report what they are doing to an injected
//! [`PipelineObserver`] instead of a global printer. The binaries plug in an
//! indicatif spinner; library users can forward events anywhere else.
//!
//! # Example
//!
//! ```rust
//! use mistral_ocr_tools::PipelineObserver;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct PageCounter(AtomicUsize);
//!
//! impl PipelineObserver for PageCounter {
//!     fn on_ocr_complete(&self, pages: usize, _images: usize) {
//!         self.0.store(pages, Ordering::SeqCst);
//!     }
//! }
//!
//! let counter = PageCounter(AtomicUsize::new(0));
//! counter.on_ocr_complete(7, 2);
//! assert_eq!(counter.0.load(Ordering::SeqCst), 7);
//! ```

use std::path::Path;
use std::sync::Arc;

/// Receives progress events from the OCR and extraction pipelines.
///
/// All methods have no-op defaults; implement only what you need.
pub trait PipelineObserver: Send + Sync {
    /// A file is about to be sent to vendor storage.
    fn on_upload_start(&self, file_name: &str, bytes: usize) {
        let _ = (file_name, bytes);
    }

    /// The upload succeeded and was assigned `file_id`.
    fn on_upload_complete(&self, file_id: &str) {
        let _ = file_id;
    }

    /// The OCR request is being sent.
    fn on_ocr_start(&self, model: &str) {
        let _ = model;
    }

    /// The OCR response arrived.
    fn on_ocr_complete(&self, pages: usize, images: usize) {
        let _ = (pages, images);
    }

    /// A chat completion request is being sent.
    fn on_chat_start(&self, model: &str, prompt_chars: usize) {
        let _ = (model, prompt_chars);
    }

    /// The chat completion arrived.
    fn on_chat_complete(&self, response_chars: usize) {
        let _ = response_chars;
    }

    /// An output file was written.
    fn on_artifact_saved(&self, path: &Path) {
        let _ = path;
    }
}

/// Observer that ignores every event. Used when none is configured.
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Shared observer handle as stored by the pipelines.
pub type Observer = Arc<dyn PipelineObserver>;

/// A fresh [`NoopObserver`] behind an `Arc`.
pub fn noop() -> Observer {
    Arc::new(NoopObserver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl PipelineObserver for Recorder {
        fn on_upload_start(&self, file_name: &str, bytes: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("upload {file_name} {bytes}"));
        }

        fn on_artifact_saved(&self, path: &Path) {
            self.events
                .lock()
                .unwrap()
                .push(format!("saved {}", path.display()));
        }
    }

    #[test]
    fn noop_observer_does_not_panic() {
        let o = noop();
        o.on_upload_start("a.pdf", 10);
        o.on_upload_complete("file-1");
        o.on_ocr_start("mistral-ocr-latest");
        o.on_ocr_complete(3, 1);
        o.on_chat_start("mistral-large-latest", 100);
        o.on_chat_complete(20);
        o.on_artifact_saved(Path::new("out.md"));
    }

    #[test]
    fn overridden_methods_receive_events_and_defaults_stay_silent() {
        let rec = Recorder::default();
        rec.on_upload_start("spec.pdf", 2048);
        rec.on_ocr_complete(2, 0);
        rec.on_artifact_saved(Path::new("spec.json"));

        let events = rec.events.lock().unwrap();
        assert_eq!(
            *events,
            vec!["upload spec.pdf 2048".to_string(), "saved spec.json".to_string()]
        );
    }
}
