use crate::{
    error::Result,
    history::History,
    settings::Settings,
    summarizer::Summarizer,
    types::{SummaryRequest, VideoSummary},
    video_url::parse_video_url,
};

#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    pub summary: VideoSummary,
    pub cached: bool,
}

/// Summarize the video at `url`, reusing a history entry made with the same
/// provider and language unless `force` is set.
pub async fn summarize_video(
    url: &str,
    settings: &Settings,
    summarizer: &dyn Summarizer,
    history: &History,
    force: bool,
) -> Result<SummaryOutcome> {
    let video = parse_video_url(url)?;

    if !force {
        if let Some(cached) = history
            .find(&video.video_id)
            .filter(|entry| is_reusable(entry, settings))
        {
            tracing::debug!(video_id = %video.video_id, "summary served from history");
            return Ok(SummaryOutcome {
                summary: cached,
                cached: true,
            });
        }
    }

    let request = SummaryRequest {
        video,
        language: settings.language.clone(),
        detail: settings.detail,
    };
    let summary = summarizer.summarize(&request).await?;
    history.record(summary.clone(), settings.history_limit);

    Ok(SummaryOutcome {
        summary,
        cached: false,
    })
}

fn is_reusable(entry: &VideoSummary, settings: &Settings) -> bool {
    entry.provider == settings.provider
        && settings
            .language
            .as_deref()
            .is_none_or(|lang| entry.language.eq_ignore_ascii_case(lang))
}
