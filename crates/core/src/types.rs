use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{provider::Provider, video_url::VideoUrl};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Brief,
    #[default]
    Standard,
    Detailed,
}

impl DetailLevel {
    pub const ALL: [DetailLevel; 3] = [
        DetailLevel::Brief,
        DetailLevel::Standard,
        DetailLevel::Detailed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DetailLevel::Brief => "brief",
            DetailLevel::Standard => "standard",
            DetailLevel::Detailed => "detailed",
        }
    }

    pub fn key_point_target(&self) -> usize {
        match self {
            DetailLevel::Brief => 3,
            DetailLevel::Standard => 5,
            DetailLevel::Detailed => 8,
        }
    }

    pub fn question_target(&self) -> usize {
        match self {
            DetailLevel::Brief => 2,
            DetailLevel::Standard => 4,
            DetailLevel::Detailed => 6,
        }
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetailLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DetailLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("expected one of brief, standard, detailed; got {s:?}"))
    }
}

#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub video: VideoUrl,
    pub language: Option<String>,
    pub detail: DetailLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub video_id: String,
    pub title: String,
    pub summary: String,
    pub key_points: Vec<KeyPoint>,
    pub questions: Vec<QaPair>,
    pub language: String,
    pub provider: Provider,
    pub created_at_unix: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPoint {
    pub text: String,
    #[serde(default)]
    pub timestamp_seconds: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}
