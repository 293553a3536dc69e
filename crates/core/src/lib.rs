//! Konspekt Core Library
//!
//! Video URL handling, AI-generated summaries with key points and Q&A, and
//! the persisted client state (settings, history) shared between running
//! instances.

pub mod error;
pub mod events;
pub mod format;
pub mod history;
pub mod paths;
pub mod pipeline;
pub mod provider;
pub mod queues;
pub mod routes;
pub mod settings;
pub mod storage;
pub mod summarizer;
pub mod types;
pub mod video_url;

// Re-export commonly used items at crate root
pub use error::{KonspektError, Result};
pub use format::{
    format_compact_count, format_duration, format_summary_readable, format_timestamp,
    reading_time_minutes, truncate_with_ellipsis,
};
pub use history::History;
pub use paths::{get_data_dir, get_storage_path};
pub use pipeline::{SummaryOutcome, summarize_video};
pub use provider::{Provider, ProviderConfig};
pub use settings::{Settings, SettingsError};
pub use storage::{
    FileBackend, MemoryBackend, PersistedState, StorageArea, StorageContext, TracingSink,
};
pub use summarizer::{ChatSummarizer, SummarizeError, Summarizer};
pub use types::{DetailLevel, KeyPoint, QaPair, SummaryRequest, VideoSummary};
pub use video_url::{VideoUrl, VideoUrlError, is_valid_video_url, parse_video_url};
