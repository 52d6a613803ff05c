//! Local static fallback source: the last tier every extractor can reach.
//!
//! The dataset is compiled into the binary and read-only. Its shape mirrors
//! the site's mock repositories (`latestNews`, `standings`, `weeklyMatches`),
//! not the extractor records; the scraper crate maps one onto the other.

use serde::Deserialize;

use crate::types::Sport;

static BUNDLED_DATASET: &str = include_str!("../data/fallback.json");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocalNewsItem {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub sport: Option<Sport>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocalStandingsRow {
    pub rank: i64,
    pub team: String,
    #[serde(default)]
    pub logo: Option<String>,
    pub played: i64,
    pub won: i64,
    pub drawn: i64,
    pub lost: i64,
    pub goal_difference: i64,
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocalMatch {
    pub home: String,
    pub away: String,
    #[serde(default)]
    pub home_logo: Option<String>,
    #[serde(default)]
    pub away_logo: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub score: Option<String>,
}

/// Read-only repository behind the fallback tier.
pub trait FallbackSource: Send + Sync {
    fn latest_news(&self) -> Vec<LocalNewsItem>;
    fn standings(&self, sport: Sport) -> Vec<LocalStandingsRow>;
    fn weekly_matches(&self, sport: Sport) -> Vec<LocalMatch>;
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct PerSport<T> {
    #[serde(default)]
    futsal: Vec<T>,
    #[serde(default)]
    beach: Vec<T>,
}

impl<T> Default for PerSport<T> {
    fn default() -> Self {
        Self {
            futsal: Vec::new(),
            beach: Vec::new(),
        }
    }
}

impl<T: Clone> PerSport<T> {
    fn get(&self, sport: Sport) -> Vec<T> {
        match sport {
            Sport::Futsal => self.futsal.clone(),
            Sport::Beach => self.beach.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Dataset {
    #[serde(default)]
    latest_news: Vec<LocalNewsItem>,
    #[serde(default)]
    standings: PerSport<LocalStandingsRow>,
    #[serde(default)]
    weekly_matches: PerSport<LocalMatch>,
}

/// [`FallbackSource`] backed by an in-memory dataset.
#[derive(Debug, Default)]
pub struct StaticFallback {
    data: Dataset,
}

impl StaticFallback {
    /// Loads the dataset bundled with the crate.
    #[must_use]
    pub fn bundled() -> Self {
        Self::from_json(BUNDLED_DATASET)
    }

    /// Parses a dataset in the bundled JSON shape. Malformed input yields an
    /// empty dataset rather than an error so the fallback tier never fails.
    #[must_use]
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Dataset>(raw) {
            Ok(data) => Self { data },
            Err(err) => {
                tracing::error!(error = %err, "fallback dataset is malformed; using empty dataset");
                Self::default()
            }
        }
    }
}

impl FallbackSource for StaticFallback {
    fn latest_news(&self) -> Vec<LocalNewsItem> {
        self.data.latest_news.clone()
    }

    fn standings(&self, sport: Sport) -> Vec<LocalStandingsRow> {
        self.data.standings.get(sport)
    }

    fn weekly_matches(&self, sport: Sport) -> Vec<LocalMatch> {
        self.data.weekly_matches.get(sport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_dataset_parses_and_is_populated() {
        let source = StaticFallback::bundled();
        assert!(source.latest_news().len() >= 12);
        assert!(!source.standings(Sport::Futsal).is_empty());
        assert!(!source.standings(Sport::Beach).is_empty());
        assert!(!source.weekly_matches(Sport::Futsal).is_empty());
        assert!(!source.weekly_matches(Sport::Beach).is_empty());
    }

    #[test]
    fn bundled_news_ids_are_unique() {
        let news = StaticFallback::bundled().latest_news();
        let mut ids: Vec<&str> = news.iter().map(|n| n.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), news.len());
    }

    #[test]
    fn malformed_json_yields_empty_dataset() {
        let source = StaticFallback::from_json("{not json");
        assert!(source.latest_news().is_empty());
        assert!(source.standings(Sport::Futsal).is_empty());
    }

    #[test]
    fn one_sided_sport_sections_parse() {
        let source = StaticFallback::from_json(
            r#"{"standings": {"beach": [{"rank": 1, "team": "ملوان", "played": 2, "won": 2, "drawn": 0, "lost": 0, "goal_difference": 5, "points": 6}]}}"#,
        );
        assert!(source.standings(Sport::Futsal).is_empty());
        let beach = source.standings(Sport::Beach);
        assert_eq!(beach.len(), 1);
        assert_eq!(beach[0].team, "ملوان");
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let source = StaticFallback::from_json(r#"{"latestNews": []}"#);
        assert!(source.weekly_matches(Sport::Beach).is_empty());
    }
}
