//! Video records and the text views embedded from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use simrank_core::{normalize, Candidate, Error};
use std::str::FromStr;

/// A video as held by the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: u64,
    /// Platform-side video identifier
    #[serde(default)]
    pub video_yid: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Video {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            video_yid: String::new(),
            title: title.into(),
            description: String::new(),
            tags: Vec::new(),
            published_at: None,
        }
    }

    #[must_use]
    pub fn with_video_yid(mut self, video_yid: impl Into<String>) -> Self {
        self.video_yid = video_yid.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    /// The title as a ranking candidate, keyed by video id
    pub fn to_candidate(&self) -> Candidate {
        Candidate::new(self.id, self.title.clone())
    }

    /// The text embedded for the given view
    pub fn embedding_text(&self, embedding_type: EmbeddingType) -> String {
        embedding_type.compose(self)
    }
}

/// Which fields of a video are embedded together
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingType {
    #[default]
    Title,
    TitleTags,
    TitleDesc,
    FullText,
}

impl EmbeddingType {
    pub const ALL: [EmbeddingType; 4] = [
        EmbeddingType::Title,
        EmbeddingType::TitleTags,
        EmbeddingType::TitleDesc,
        EmbeddingType::FullText,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EmbeddingType::Title => "title",
            EmbeddingType::TitleTags => "title_tags",
            EmbeddingType::TitleDesc => "title_desc",
            EmbeddingType::FullText => "full_text",
        }
    }

    /// Compose the normalized text for this view of `video`.
    ///
    /// Fields are joined with single spaces and the result trimmed, so a
    /// video without tags embeds the same `title_tags` text as `title`.
    pub fn compose(&self, video: &Video) -> String {
        let title = normalize(&video.title);
        let joined = match self {
            EmbeddingType::Title => return title,
            EmbeddingType::TitleTags => format!("{} {}", title, tags_text(&video.tags)),
            EmbeddingType::TitleDesc => format!("{} {}", title, normalize(&video.description)),
            EmbeddingType::FullText => format!(
                "{} {} {}",
                title,
                normalize(&video.description),
                tags_text(&video.tags)
            ),
        };
        normalize(&joined)
    }
}

fn tags_text(tags: &[String]) -> String {
    tags.iter()
        .map(|t| normalize(t))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl std::fmt::Display for EmbeddingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EmbeddingType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        EmbeddingType::ALL
            .into_iter()
            .find(|t| t.name() == lowered)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown embedding type: {}", s)))
    }
}
