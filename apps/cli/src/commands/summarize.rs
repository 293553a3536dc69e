use std::time::Instant;

use anyhow::Result;
use console::style;
use konspekt_core::{
    ChatSummarizer, History, KonspektError, Settings, format_duration, format_summary_readable,
    parse_video_url, summarize_video,
};

use crate::{
    Session, SummarizeArgs,
    ui::{check, create_spinner, print_error, print_header, print_rule},
};

pub async fn run(session: &Session, args: SummarizeArgs) -> Result<()> {
    let saved = Settings::load(&session.context, session.sink.clone()).get();
    let settings = apply_overrides(saved, &args);

    // Validate URL and API key early
    let video = match parse_video_url(&args.url) {
        Ok(video) => video,
        Err(e) => {
            print_error(KonspektError::from(e));
            std::process::exit(1);
        }
    };
    let summarizer = match ChatSummarizer::new(settings.provider) {
        Ok(summarizer) => summarizer,
        Err(e) => {
            print_error(e);
            std::process::exit(1);
        }
    };

    let history = History::open(&session.context, session.sink.clone());

    print_header("Video Summarizer");
    print_rule();

    let start = Instant::now();
    let spinner = create_spinner(&format!(
        "Summarizing {} with {}...",
        video.video_id,
        settings.provider.name()
    ));

    let result = summarize_video(&args.url, &settings, &summarizer, &history, args.force).await;
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };

    let timing = if outcome.cached {
        style("(cached)".to_string()).dim()
    } else {
        style(format!("[{}]", format_duration(start.elapsed()))).dim()
    };
    spinner.finish_with_message(format!(
        "{} Summary ready ({}, {}) {}",
        check(),
        outcome.summary.provider.name(),
        style(&outcome.summary.language).yellow(),
        timing
    ));

    println!(
        "\n{} {}\n",
        style("Video:").dim(),
        style(video.canonical()).cyan()
    );
    print_rule();

    println!("{}", format_summary_readable(&outcome.summary));

    Ok(())
}

/// Per-run flags win over saved settings without being saved.
fn apply_overrides(mut settings: Settings, args: &SummarizeArgs) -> Settings {
    if let Some(lang) = &args.lang {
        settings.language = Some(lang.trim().to_ascii_lowercase());
    }
    if let Some(provider) = args.provider {
        settings.provider = provider.into();
    }
    if let Some(detail) = args.detail {
        settings.detail = detail.into();
    }
    settings
}

#[cfg(test)]
mod tests {
    use konspekt_core::{DetailLevel, Provider};

    use super::*;
    use crate::{CliDetail, CliProvider};

    fn args() -> SummarizeArgs {
        SummarizeArgs {
            url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            lang: None,
            provider: None,
            detail: None,
            force: false,
        }
    }

    #[test]
    fn saved_settings_apply_without_flags() {
        let saved = Settings {
            provider: Provider::Gemini,
            language: Some("uk".to_string()),
            ..Settings::default()
        };

        assert_eq!(apply_overrides(saved.clone(), &args()), saved);
    }

    #[test]
    fn flags_override_saved_settings() {
        let args = SummarizeArgs {
            lang: Some(" DE ".to_string()),
            provider: Some(CliProvider::Openai),
            detail: Some(CliDetail::Detailed),
            ..args()
        };

        let settings = apply_overrides(Settings::default(), &args);

        assert_eq!(settings.language.as_deref(), Some("de"));
        assert_eq!(settings.provider, Provider::Openai);
        assert_eq!(settings.detail, DetailLevel::Detailed);
        assert_eq!(settings.history_limit, Settings::default().history_limit);
    }
}
