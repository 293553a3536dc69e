use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use console::style;
use konspekt_core::{History, VideoSummary, format_summary_readable, truncate_with_ellipsis};

use crate::{
    HistoryAction, Session,
    ui::{check, print_error, print_rule},
};

const TITLE_WIDTH: usize = 48;

pub fn run(session: &Session, action: HistoryAction) -> Result<()> {
    let history = History::open(&session.context, session.sink.clone());

    match action {
        HistoryAction::List { limit } => {
            let entries = history.entries();
            if entries.is_empty() {
                println!("{}", style("No saved summaries yet").dim());
                return Ok(());
            }

            let now = unix_now();
            for entry in entries.iter().take(limit.unwrap_or(usize::MAX)) {
                println!("{}", list_row(entry, now));
            }
        }
        HistoryAction::Show { video_id } => match history.find(&video_id) {
            Some(summary) => {
                print_rule();
                println!("{}", format_summary_readable(&summary));
            }
            None => {
                print_error(format!("No saved summary for {video_id}"));
                std::process::exit(1);
            }
        },
        HistoryAction::Clear => {
            let count = history.len();
            history.clear();
            println!("{} Removed {} saved summaries", check(), count);
        }
    }

    Ok(())
}

fn list_row(entry: &VideoSummary, now: u64) -> String {
    format!(
        "{}  {:<width$}  {} {}",
        style(&entry.video_id).cyan(),
        truncate_with_ellipsis(&entry.title, TITLE_WIDTH),
        style(entry.provider.name()).dim(),
        style(format_age(now.saturating_sub(entry.created_at_unix))).dim(),
        width = TITLE_WIDTH
    )
}

fn format_age(secs: u64) -> String {
    match secs {
        0..60 => "just now".to_string(),
        60..3600 => format!("{}m ago", secs / 60),
        3600..86_400 => format!("{}h ago", secs / 3600),
        _ => format!("{}d ago", secs / 86_400),
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
