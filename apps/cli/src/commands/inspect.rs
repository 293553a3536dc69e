use anyhow::Result;
use console::style;
use konspekt_core::{VideoUrl, format_timestamp, parse_video_url};

use crate::ui::print_error;

pub fn run(url: &str) -> Result<()> {
    match parse_video_url(url) {
        Ok(video) => {
            for (label, value) in describe(&video) {
                println!("{:<10} {}", style(label).dim(), value);
            }
            Ok(())
        }
        Err(e) => {
            print_error(e);
            std::process::exit(1);
        }
    }
}

fn describe(video: &VideoUrl) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("video", video.video_id.clone()),
        ("canonical", video.canonical()),
        ("thumbnail", video.thumbnail_url()),
    ];
    if let Some(start) = video.start_seconds {
        rows.push(("start", format_timestamp(f64::from(start))));
    }
    if let Some(playlist) = &video.playlist_id {
        rows.push(("playlist", playlist.clone()));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_optional_fields_only_when_present() {
        let plain = parse_video_url("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(describe(&plain).len(), 3);

        let full = parse_video_url("https://youtu.be/dQw4w9WgXcQ?t=75&list=PL1").unwrap();
        let rows = describe(&full);
        assert!(rows.contains(&("start", "01:15".to_string())));
        assert!(rows.contains(&("playlist", "PL1".to_string())));
    }
}
