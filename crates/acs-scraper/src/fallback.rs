//! Maps the local static dataset onto extractor records.

use acs_core::{
    Article, FallbackSource, LocalMatch, LocalNewsItem, LocalStandingsRow, Match, Sport,
    StandingsRow,
};
use reqwest::Url;

use crate::matches::match_id;
use crate::text::{absolute_url, clean_text, create_article_slug, infer_sport, normalize_team_name};

pub(crate) fn local_articles(source: &dyn FallbackSource, base: &Url) -> Vec<Article> {
    source
        .latest_news()
        .into_iter()
        .map(|item| article_from_local(item, base))
        .collect()
}

pub(crate) fn local_standings(source: &dyn FallbackSource, sport: Sport, base: &Url) -> Vec<StandingsRow> {
    source
        .standings(sport)
        .into_iter()
        .map(|row| standings_row_from_local(row, base))
        .collect()
}

pub(crate) fn local_matches(source: &dyn FallbackSource, sport: Sport, base: &Url) -> Vec<Match> {
    source
        .weekly_matches(sport)
        .into_iter()
        .map(|m| match_from_local(m, sport, base))
        .collect()
}

fn article_from_local(item: LocalNewsItem, base: &Url) -> Article {
    let title = clean_text(&item.title);
    let category = clean_text(&item.category);
    let sport = item
        .sport
        .unwrap_or_else(|| infer_sport(&format!("{title} {category}")));
    let slug = if item.slug.trim().is_empty() {
        create_article_slug(&item.id, &title)
    } else {
        item.slug.trim().to_owned()
    };
    Article {
        id: item.id,
        slug,
        title,
        excerpt: clean_text(&item.summary),
        published_at: item.date,
        category,
        sport,
        source_url: None,
        image_url: absolute_url(base, &item.image),
        is_featured: item.featured,
    }
}

fn standings_row_from_local(row: LocalStandingsRow, base: &Url) -> StandingsRow {
    StandingsRow {
        position: row.rank,
        team_name: normalize_team_name(&row.team),
        team_logo_url: optional_url(base, row.logo.as_deref()),
        played: row.played,
        wins: row.won,
        draws: row.drawn,
        losses: row.lost,
        goal_diff: row.goal_difference,
        points: row.points,
    }
}

fn match_from_local(m: LocalMatch, sport: Sport, base: &Url) -> Match {
    let home_team = normalize_team_name(&m.home);
    let away_team = normalize_team_name(&m.away);
    let date_time = match (m.date.as_deref(), m.time.as_deref()) {
        (Some(d), Some(t)) => Some(clean_text(&format!("{d} {t}"))),
        (Some(one), None) | (None, Some(one)) => Some(clean_text(one)),
        (None, None) => None,
    }
    .filter(|s| !s.is_empty());
    let id_hint = date_time.as_deref().or(m.status.as_deref()).unwrap_or("");
    Match {
        id: match_id(&home_team, &away_team, id_hint),
        sport,
        home_logo_url: optional_url(base, m.home_logo.as_deref()),
        away_logo_url: optional_url(base, m.away_logo.as_deref()),
        home_team,
        away_team,
        date_time,
        venue: m.venue.map(|v| clean_text(&v)).filter(|v| !v.is_empty()),
        status: m.status.map(|s| clean_text(&s)).filter(|s| !s.is_empty()),
        score: m.score.map(|s| clean_text(&s)).filter(|s| !s.is_empty()),
    }
}

fn optional_url(base: &Url, raw: Option<&str>) -> Option<String> {
    raw.map(|r| absolute_url(base, r)).filter(|u| !u.is_empty())
}
