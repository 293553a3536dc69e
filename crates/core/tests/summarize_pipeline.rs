use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use konspekt_core::{
    DetailLevel, History, KeyPoint, KonspektError, Provider, QaPair, Settings, StorageArea,
    SummarizeError, Summarizer, SummaryRequest, VideoSummary, VideoUrlError,
    storage::MemorySink, summarize_video,
};

/// Summarizer double that records requests and answers from a template.
struct FakeSummarizer {
    provider: Provider,
    calls: AtomicUsize,
    last_request: Mutex<Option<SummaryRequest>>,
    fail: bool,
}

impl FakeSummarizer {
    fn new(provider: Provider) -> Self {
        Self {
            provider,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Provider::Grok)
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, request: &SummaryRequest) -> Result<VideoSummary, SummarizeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if self.fail {
            return Err(SummarizeError::EmptySummary);
        }

        Ok(VideoSummary {
            video_id: request.video.video_id.clone(),
            title: format!("Video {}", request.video.video_id),
            summary: "A talk about ownership.".to_string(),
            key_points: vec![KeyPoint {
                text: "Moves transfer ownership".to_string(),
                timestamp_seconds: Some(30.0),
            }],
            questions: vec![QaPair {
                question: "What moves?".to_string(),
                answer: "Values.".to_string(),
            }],
            language: request.language.clone().unwrap_or_else(|| "en".to_string()),
            provider: self.provider,
            created_at_unix: 1,
        })
    }
}

fn history(area: &StorageArea) -> History {
    History::open(&area.open_context(), Arc::new(MemorySink::new()))
}

#[tokio::test]
async fn summarizes_and_records_in_history() -> anyhow::Result<()> {
    let area = StorageArea::in_memory();
    let history = history(&area);
    let summarizer = FakeSummarizer::new(Provider::Grok);
    let settings = Settings {
        detail: DetailLevel::Detailed,
        language: Some("uk".to_string()),
        ..Settings::default()
    };

    let outcome = summarize_video(
        "https://youtu.be/dQw4w9WgXcQ?t=42",
        &settings,
        &summarizer,
        &history,
        false,
    )
    .await?;

    assert!(!outcome.cached);
    assert_eq!(outcome.summary.language, "uk");
    assert_eq!(history.find("dQw4w9WgXcQ"), Some(outcome.summary));

    let request = summarizer.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(request.detail, DetailLevel::Detailed);
    assert_eq!(request.video.start_seconds, Some(42));
    Ok(())
}

#[tokio::test]
async fn reuses_history_unless_forced() -> anyhow::Result<()> {
    let area = StorageArea::in_memory();
    let history = history(&area);
    let summarizer = FakeSummarizer::new(Provider::Grok);
    let settings = Settings::default();
    let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    summarize_video(url, &settings, &summarizer, &history, false).await?;
    let second = summarize_video(url, &settings, &summarizer, &history, false).await?;
    assert!(second.cached);
    assert_eq!(summarizer.calls(), 1);

    let forced = summarize_video(url, &settings, &summarizer, &history, true).await?;
    assert!(!forced.cached);
    assert_eq!(summarizer.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn history_from_another_provider_or_language_is_not_reused() -> anyhow::Result<()> {
    let area = StorageArea::in_memory();
    let history = history(&area);
    let url = "https://youtu.be/dQw4w9WgXcQ";

    let grok = FakeSummarizer::new(Provider::Grok);
    summarize_video(url, &Settings::default(), &grok, &history, false).await?;

    let openai = FakeSummarizer::new(Provider::Openai);
    let settings = Settings {
        provider: Provider::Openai,
        ..Settings::default()
    };
    let outcome = summarize_video(url, &settings, &openai, &history, false).await?;
    assert!(!outcome.cached);

    let german = Settings {
        provider: Provider::Openai,
        language: Some("de".to_string()),
        ..Settings::default()
    };
    let outcome = summarize_video(url, &german, &openai, &history, false).await?;
    assert!(!outcome.cached);
    assert_eq!(openai.calls(), 2);
    assert_eq!(history.len(), 1);
    Ok(())
}

#[tokio::test]
async fn invalid_url_never_reaches_the_service() {
    let area = StorageArea::in_memory();
    let history = history(&area);
    let summarizer = FakeSummarizer::new(Provider::Grok);

    let err = summarize_video(
        "https://vimeo.com/1234",
        &Settings::default(),
        &summarizer,
        &history,
        false,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        KonspektError::VideoUrl(VideoUrlError::UnsupportedHost { .. })
    ));
    assert_eq!(summarizer.calls(), 0);
}

#[tokio::test]
async fn service_failure_leaves_history_untouched() {
    let area = StorageArea::in_memory();
    let history = history(&area);
    let summarizer = FakeSummarizer::failing();

    let err = summarize_video(
        "https://youtu.be/dQw4w9WgXcQ",
        &Settings::default(),
        &summarizer,
        &history,
        false,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        KonspektError::Summarize(SummarizeError::EmptySummary)
    ));
    assert!(history.is_empty());
}
