// Error types
pub mod error;

// Version ranges and per-family extraction strategies
pub mod version;

// Event-vs-error classification
pub mod classifier;

// Downstream sink seam
pub mod sink;

pub use classifier::{Classification, EXCEPTION_KEY, EventClassifier, IgnoreRule, Outcome};
pub use error::{Error, Result};
pub use sink::EventSink;
pub use version::{AdapterSet, ExtractionStrategy, event_names, ranges, select_strategy};
