use thiserror::Error;

use crate::{
    provider::ProviderError, settings::SettingsError, storage::StorageError,
    summarizer::SummarizeError, video_url::VideoUrlError,
};

#[derive(Error, Debug)]
pub enum KonspektError {
    #[error("Invalid video URL: {0}")]
    VideoUrl(#[from] VideoUrlError),

    #[error("Summarization failed: {0}")]
    Summarize(#[from] SummarizeError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, KonspektError>;
