//! Records produced by the ACS extractors.
//!
//! All records are built fresh on each parse and never mutated afterwards.
//! Field names serialize in camelCase so the disk cache and CLI output keep
//! the shape the site templates consume.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Futsal,
    Beach,
}

impl Sport {
    pub const ALL: [Sport; 2] = [Sport::Futsal, Sport::Beach];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sport::Futsal => "futsal",
            Sport::Beach => "beach",
        }
    }
}

impl std::fmt::Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Sport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "futsal" => Ok(Sport::Futsal),
            "beach" => Ok(Sport::Beach),
            other => Err(format!("unknown sport \"{other}\" (expected futsal or beach)")),
        }
    }
}

/// Where a payload came from. Consumers branch on this to show staleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadSource {
    Live,
    Cache,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub published_at: String,
    pub category: String,
    pub sport: Sport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_featured: bool,
}

/// Pointer to a live match stream. No upstream parser fills these yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveEvent {
    pub id: String,
    pub title: String,
    pub match_teams: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_label: Option<String>,
    pub href: String,
    pub image_url: String,
    pub sport: Sport,
}

/// One league table row. `played == wins + draws + losses` is expected but
/// upstream numbers are trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsRow {
    pub position: i64,
    pub team_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_logo_url: Option<String>,
    pub played: i64,
    pub wins: i64,
    pub draws: i64,
    pub losses: i64,
    pub goal_diff: i64,
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub sport: Sport,
    pub home_team: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_logo_url: Option<String>,
    pub away_team: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
}

/// Article page ready for direct rendering. `body_html` is sanitized and
/// never contains the featured image held in `image_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsDetail {
    pub slug: String,
    pub title: String,
    pub category: String,
    pub published_at: String,
    pub image_url: String,
    pub lead: String,
    pub body_html: String,
    pub source_url: String,
    pub tags: Vec<String>,
    pub teams: Vec<String>,
}

/// Plain-text view of the same article page as [`NewsDetail`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetail {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub category: String,
    pub published_at: String,
    pub image_url: String,
    pub lead: String,
    pub paragraphs: Vec<String>,
    pub source_url: String,
    pub sport: Sport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeAcsPayload {
    pub hero_slides: Vec<Article>,
    pub latest_news: Vec<Article>,
    pub live_events: Vec<LiveEvent>,
    pub fetched_at: DateTime<Utc>,
    pub source: PayloadSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsPayload {
    pub sport: Sport,
    pub rows: Vec<StandingsRow>,
    pub fetched_at: DateTime<Utc>,
    pub source: PayloadSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchesPayload {
    pub sport: Sport,
    pub matches: Vec<Match>,
    pub fetched_at: DateTime<Utc>,
    pub source: PayloadSource,
}
