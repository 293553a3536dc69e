use std::time::Duration;

use crate::types::VideoSummary;

const WORDS_PER_MINUTE: usize = 200;

/// Format seconds as MM:SS, or H:MM:SS from one hour up
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else if secs < 3600.0 {
        let whole = d.as_secs();
        format!("{}m {}s", whole / 60, whole % 60)
    } else {
        let whole = d.as_secs();
        format!("{}h {}m", whole / 3600, (whole % 3600) / 60)
    }
}

/// Format a count as `999`, `1.2K`, `3.4M`, `1.1B`
pub fn format_compact_count(n: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1_000_000_000, "B"), (1_000_000, "M"), (1_000, "K")];

    for (size, suffix) in UNITS {
        if n >= size {
            // one decimal, truncated so 1_999 reads 1.9K rather than 2K
            let tenths = n / (size / 10);
            let whole = tenths / 10;
            let frac = tenths % 10;
            return if frac == 0 {
                format!("{}{}", whole, suffix)
            } else {
                format!("{}.{}{}", whole, frac, suffix)
            };
        }
    }

    n.to_string()
}

pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }

    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.truncate(out.trim_end().len());
    out.push('…');
    out
}

pub fn reading_time_minutes(text: &str) -> usize {
    let words = text.split_whitespace().count();
    if words == 0 {
        0
    } else {
        words.div_ceil(WORDS_PER_MINUTE)
    }
}

pub fn format_summary_readable(summary: &VideoSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!("# {}\n\n", summary.title));
    output.push_str(&format!(
        "**Video:** {} | **Language:** {} | **Provider:** {} | **Reading time:** {} min\n\n",
        summary.video_id,
        summary.language,
        summary.provider.name(),
        reading_time_minutes(&summary.summary).max(1)
    ));

    output.push_str("## Summary\n\n");
    output.push_str(&summary.summary);
    output.push_str("\n\n");

    if !summary.key_points.is_empty() {
        output.push_str("## Key points\n\n");
        for point in &summary.key_points {
            match point.timestamp_seconds {
                Some(ts) => {
                    output.push_str(&format!("• [{}] {}\n", format_timestamp(ts), point.text))
                }
                None => output.push_str(&format!("• {}\n", point.text)),
            }
        }
        output.push('\n');
    }

    if !summary.questions.is_empty() {
        output.push_str("## Q&A\n\n");
        for (i, qa) in summary.questions.iter().enumerate() {
            output.push_str(&format!("**Q{}.** {}\n", i + 1, qa.question));
            output.push_str(&format!("{}\n\n", qa.answer));
        }
    }

    output
}
