use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const VIDEO_ID_LEN: usize = 11;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VideoUrlError {
    #[error("URL is empty")]
    Empty,

    #[error("Unsupported host: {host}")]
    UnsupportedHost { host: String },

    #[error("URL does not point to a single video")]
    MissingVideoId,

    #[error("Invalid video id: {id}")]
    InvalidVideoId { id: String },

    #[error("Malformed URL: {reason}")]
    Malformed { reason: String },
}

/// A validated reference to one YouTube video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoUrl {
    pub video_id: String,
    pub start_seconds: Option<u32>,
    pub playlist_id: Option<String>,
}

impl VideoUrl {
    pub fn canonical(&self) -> String {
        match self.start_seconds {
            Some(start) if start > 0 => format!(
                "https://www.youtube.com/watch?v={}&t={}s",
                self.video_id, start
            ),
            _ => format!("https://www.youtube.com/watch?v={}", self.video_id),
        }
    }

    pub fn thumbnail_url(&self) -> String {
        format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", self.video_id)
    }
}

impl fmt::Display for VideoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

pub fn is_valid_video_url(input: &str) -> bool {
    parse_video_url(input).is_ok()
}

/// Parse a YouTube watch, share, shorts, embed or live URL.
///
/// The scheme is optional. `t`/`start` offsets such as `90`, `90s` or
/// `1h2m3s` are kept when they parse and dropped otherwise.
pub fn parse_video_url(input: &str) -> Result<VideoUrl, VideoUrlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(VideoUrlError::Empty);
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(VideoUrlError::Malformed {
            reason: "contains whitespace".to_string(),
        });
    }

    let rest = strip_scheme(trimmed)?;
    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (authority, path_and_query) = rest.split_at(authority_end);
    let host = normalize_host(authority)?;

    let without_fragment = path_and_query
        .split_once('#')
        .map_or(path_and_query, |(before, _)| before);
    let (path, query) = without_fragment
        .split_once('?')
        .unwrap_or((without_fragment, ""));
    let params = parse_query(query);
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let video_id = match host.as_str() {
        "youtube.com" | "youtube-nocookie.com" => match segments.as_slice() {
            ["watch"] => query_param(&params, "v").ok_or(VideoUrlError::MissingVideoId)?,
            ["shorts" | "embed" | "live" | "v", id, ..] => id.to_string(),
            _ => return Err(VideoUrlError::MissingVideoId),
        },
        "youtu.be" => segments
            .first()
            .map(|id| id.to_string())
            .ok_or(VideoUrlError::MissingVideoId)?,
        _ => return Err(VideoUrlError::UnsupportedHost { host }),
    };

    if !is_valid_video_id(&video_id) {
        return Err(VideoUrlError::InvalidVideoId { id: video_id });
    }

    let start_seconds = query_param(&params, "t")
        .or_else(|| query_param(&params, "start"))
        .and_then(|raw| parse_start_offset(&raw));
    let playlist_id = query_param(&params, "list").filter(|id| !id.is_empty());

    Ok(VideoUrl {
        video_id,
        start_seconds,
        playlist_id,
    })
}

pub fn is_valid_video_id(id: &str) -> bool {
    id.len() == VIDEO_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Parse `90`, `90s`, `1m30s` or `1h2m3s` into seconds.
pub fn parse_start_offset(raw: &str) -> Option<u32> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(seconds) = raw.parse::<u32>() {
        return Some(seconds);
    }

    let mut total: u32 = 0;
    let mut digits = String::new();
    let mut last_unit_rank = 0;

    for c in raw.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let (rank, multiplier) = match c {
            'h' => (3, 3600),
            'm' => (2, 60),
            's' => (1, 1),
            _ => return None,
        };
        // units must appear once each, largest first
        if digits.is_empty() || (last_unit_rank != 0 && rank >= last_unit_rank) {
            return None;
        }
        last_unit_rank = rank;

        let value: u32 = digits.parse().ok()?;
        total = total.checked_add(value.checked_mul(multiplier)?)?;
        digits.clear();
    }

    if !digits.is_empty() {
        return None;
    }
    Some(total)
}

fn strip_scheme(input: &str) -> Result<&str, VideoUrlError> {
    let Some((scheme, rest)) = input.split_once("://") else {
        return Ok(input);
    };

    if scheme.eq_ignore_ascii_case("https") || scheme.eq_ignore_ascii_case("http") {
        Ok(rest)
    } else {
        Err(VideoUrlError::Malformed {
            reason: format!("unsupported scheme {scheme}"),
        })
    }
}

fn normalize_host(authority: &str) -> Result<String, VideoUrlError> {
    if authority.is_empty() {
        return Err(VideoUrlError::Malformed {
            reason: "missing host".to_string(),
        });
    }
    if authority.contains('@') {
        return Err(VideoUrlError::Malformed {
            reason: "credentials are not allowed".to_string(),
        });
    }

    let host = authority
        .split_once(':')
        .map_or(authority, |(host, _port)| host)
        .to_ascii_lowercase();

    let host = ["www.", "m.", "music."]
        .iter()
        .find_map(|prefix| host.strip_prefix(prefix))
        .map(str::to_string)
        .unwrap_or(host);

    Ok(host)
}

fn parse_query(query: &str) -> Vec<(&str, &str)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .collect()
}

fn query_param(params: &[(&str, &str)], name: &str) -> Option<String> {
    params
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn accepts_common_url_shapes() {
        let inputs = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "http://youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "youtube.com/watch?v=dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://music.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ?rel=0",
            "https://www.youtube.com/live/dQw4w9WgXcQ",
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ",
            "  HTTPS://WWW.YOUTUBE.COM/watch?v=dQw4w9WgXcQ  ",
            "https://www.youtube.com:443/watch?v=dQw4w9WgXcQ#comments",
        ];

        for input in inputs {
            let url = parse_video_url(input).unwrap_or_else(|e| panic!("{input}: {e}"));
            assert_eq!(url.video_id, ID, "{input}");
        }
    }

    #[test]
    fn keeps_start_offset_and_playlist() {
        let url = parse_video_url("https://youtu.be/dQw4w9WgXcQ?t=1m30s&list=PL123").unwrap();
        assert_eq!(url.start_seconds, Some(90));
        assert_eq!(url.playlist_id.as_deref(), Some("PL123"));
        assert_eq!(
            url.canonical(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=90s"
        );
    }

    #[test]
    fn rejects_invalid_input() {
        assert_eq!(parse_video_url("   "), Err(VideoUrlError::Empty));
        assert_eq!(
            parse_video_url("https://vimeo.com/123456789"),
            Err(VideoUrlError::UnsupportedHost {
                host: "vimeo.com".to_string()
            })
        );
        assert_eq!(
            parse_video_url("https://www.youtube.com/playlist?list=PL123"),
            Err(VideoUrlError::MissingVideoId)
        );
        assert_eq!(
            parse_video_url("https://www.youtube.com/watch?v=short"),
            Err(VideoUrlError::InvalidVideoId {
                id: "short".to_string()
            })
        );
        assert!(matches!(
            parse_video_url("ftp://youtube.com/watch?v=dQw4w9WgXcQ"),
            Err(VideoUrlError::Malformed { .. })
        ));
        assert!(matches!(
            parse_video_url("https://user@youtube.com/watch?v=dQw4w9WgXcQ"),
            Err(VideoUrlError::Malformed { .. })
        ));
        assert!(!is_valid_video_url("not a url"));
    }

    #[test]
    fn start_offsets() {
        assert_eq!(parse_start_offset("90"), Some(90));
        assert_eq!(parse_start_offset("90s"), Some(90));
        assert_eq!(parse_start_offset("1h2m3s"), Some(3723));
        assert_eq!(parse_start_offset("2m"), Some(120));
        assert_eq!(parse_start_offset("3s2m"), None);
        assert_eq!(parse_start_offset("1x"), None);
        assert_eq!(parse_start_offset("m"), None);
        assert_eq!(parse_start_offset(""), None);
    }

    #[test]
    fn malformed_offset_is_dropped() {
        let url = parse_video_url("https://youtu.be/dQw4w9WgXcQ?t=soon").unwrap();
        assert_eq!(url.start_seconds, None);
        assert_eq!(url.canonical(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(
            url.thumbnail_url(),
            "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
        );
    }
}
