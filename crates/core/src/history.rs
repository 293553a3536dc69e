use std::sync::Arc;

use crate::{
    storage::{DiagnosticSink, PersistedState, StorageContext},
    types::VideoSummary,
};

pub const HISTORY_KEY: &str = "konspekt.history";

/// Recent summaries, newest first, at most one per video.
pub struct History {
    state: PersistedState<Vec<VideoSummary>>,
}

impl History {
    pub fn open(context: &StorageContext, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            state: PersistedState::new(context, HISTORY_KEY, Vec::new(), sink),
        }
    }

    /// Puts `summary` at the front, replacing an older entry for the same
    /// video, and keeps at most `limit` entries.
    pub fn record(&self, summary: VideoSummary, limit: usize) {
        self.state.update(move |entries| {
            let mut next = Vec::with_capacity(entries.len() + 1);
            let video_id = summary.video_id.clone();
            next.push(summary);
            next.extend(
                entries
                    .iter()
                    .filter(|entry| entry.video_id != video_id)
                    .cloned(),
            );
            next.truncate(limit.max(1));
            next
        });
    }

    pub fn find(&self, video_id: &str) -> Option<VideoSummary> {
        self.state
            .get()
            .into_iter()
            .find(|entry| entry.video_id == video_id)
    }

    pub fn entries(&self) -> Vec<VideoSummary> {
        self.state.get()
    }

    pub fn len(&self) -> usize {
        self.state.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.state.set(Vec::new());
    }
}
