use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    provider::{Provider, ProviderError},
    types::{KeyPoint, QaPair, SummaryRequest, VideoSummary},
};

const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid API response: {reason}")]
    InvalidResponse { reason: String },

    #[error("The service returned an empty summary")]
    EmptySummary,
}

/// Request/response contract of the summarization service.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, request: &SummaryRequest) -> Result<VideoSummary, SummarizeError>;
}

/// Model output before it is stamped with request metadata.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SummaryDraft {
    pub title: String,
    pub summary: String,
    pub key_points: Vec<DraftKeyPoint>,
    pub questions: Vec<QaPair>,
    pub language: Option<String>,
}

/// Models sometimes answer with bare strings instead of objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DraftKeyPoint {
    Text(String),
    Point(KeyPoint),
}

impl From<DraftKeyPoint> for KeyPoint {
    fn from(point: DraftKeyPoint) -> Self {
        match point {
            DraftKeyPoint::Text(text) => KeyPoint {
                text,
                timestamp_seconds: None,
            },
            DraftKeyPoint::Point(point) => point,
        }
    }
}

impl SummaryDraft {
    pub fn into_summary(self, request: &SummaryRequest, provider: Provider) -> VideoSummary {
        let language = self
            .language
            .filter(|l| !l.trim().is_empty())
            .or_else(|| request.language.clone())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        let title = if self.title.trim().is_empty() {
            request.video.video_id.clone()
        } else {
            self.title
        };

        VideoSummary {
            video_id: request.video.video_id.clone(),
            title,
            summary: self.summary.trim().to_string(),
            key_points: self.key_points.into_iter().map(KeyPoint::from).collect(),
            questions: self.questions,
            language,
            provider,
            created_at_unix: unix_now(),
        }
    }
}

/// Parse the model's message content, tolerating a markdown code fence.
pub fn parse_summary_content(content: &str) -> Result<SummaryDraft, SummarizeError> {
    let json = strip_code_fence(content);
    let draft: SummaryDraft = serde_json::from_str(json)?;
    if draft.summary.trim().is_empty() {
        return Err(SummarizeError::EmptySummary);
    }
    Ok(draft)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string ("json") on the opening fence line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn system_prompt(request: &SummaryRequest) -> String {
    let lang = request
        .language
        .as_deref()
        .unwrap_or("the video's own language");

    format!(
        r#"You are a video content summarizer. Your task is to summarize the video at the given URL.

IMPORTANT: Write ALL text content (title, summary, key points, questions and answers) in {lang}.

You MUST output ONLY valid JSON matching this exact structure (no markdown, no explanation):
{{
  "title": "Descriptive title for the video",
  "summary": "One paragraph summary of the entire video content",
  "language": "<ISO 639-1 code of the language you wrote in>",
  "key_points": [
    {{"text": "Key point", "timestamp_seconds": 120}}
  ],
  "questions": [
    {{"question": "A question a viewer might ask", "answer": "Answer grounded in the video"}}
  ]
}}

Rules:
- Give {points} key points, in the order they appear in the video
- Use timestamp_seconds only when you know where the point is made, otherwise null
- Give {questions} question/answer pairs
- Output ONLY the JSON, nothing else"#,
        lang = lang,
        points = request.detail.key_point_target(),
        questions = request.detail.question_target(),
    )
}

/// [`Summarizer`] backed by an OpenAI-compatible chat completions endpoint.
pub struct ChatSummarizer {
    provider: Provider,
    api_key: String,
    client: reqwest::Client,
}

impl ChatSummarizer {
    pub fn new(provider: Provider) -> Result<Self, ProviderError> {
        let api_key = provider.validate_api_key()?;
        Ok(Self::with_api_key(provider, api_key))
    }

    pub fn with_api_key(provider: Provider, api_key: String) -> Self {
        Self {
            provider,
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Summarizer for ChatSummarizer {
    async fn summarize(&self, request: &SummaryRequest) -> Result<VideoSummary, SummarizeError> {
        let config = self.provider.config();
        let user_prompt = format!(
            "Summarize this video: {} (detail: {})",
            request.video.canonical(),
            request.detail
        );

        tracing::debug!(
            provider = self.provider.id(),
            model = config.model,
            video_id = %request.video.video_id,
            "requesting summary"
        );

        let response = self
            .client
            .post(config.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": config.model,
                "messages": [
                    {
                        "role": "system",
                        "content": system_prompt(request),
                    },
                    {
                        "role": "user",
                        "content": user_prompt,
                    },
                ],
                "temperature": 0.3,
            }))
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| SummarizeError::InvalidResponse {
                reason: format!("missing choices[0].message.content in {response}"),
            })?;

        let draft = parse_summary_content(content)?;
        Ok(draft.into_summary(request, self.provider))
    }
}
