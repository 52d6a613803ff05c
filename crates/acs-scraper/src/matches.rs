//! Live-score page extractor.

use std::collections::HashSet;
use std::sync::LazyLock;

use acs_core::{Match, Sport};
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::dom::{
    element_text, first_element, first_image_url, first_text, nearby_heading, selector_list,
};
use crate::text::{infer_sport, normalize_team_name, slugify};

pub const MATCHES_PATH: &str = "/Live-Score";

#[must_use]
pub fn cache_key(sport: Sport) -> String {
    format!("matches-{sport}")
}

static ITEMS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".match-item, .match, .fixture, .match-row, .game-row, tr.match")
        .expect("valid match item selector")
});
static HOME: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    selector_list(&[".home-team", ".team-home", ".home .team-name", ".team.home", "td.home"])
});
static AWAY: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    selector_list(&[".away-team", ".team-away", ".away .team-name", ".team.away", "td.away"])
});
static GENERIC_TEAMS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".team-name, .team").expect("valid team selector"));
static DATE_TIME: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    selector_list(&["time", ".match-time", ".match-date", ".date-time", ".time", ".date"])
});
static VENUE: LazyLock<Vec<Selector>> =
    LazyLock::new(|| selector_list(&[".venue", ".stadium", ".location", ".place"]));
static STATUS: LazyLock<Vec<Selector>> =
    LazyLock::new(|| selector_list(&[".match-status", ".status", ".state"]));
static SCORE: LazyLock<Vec<Selector>> =
    LazyLock::new(|| selector_list(&[".score", ".result", ".match-score"]));

/// Slug-safe id from the two team names plus a time or status hint.
#[must_use]
pub(crate) fn match_id(home: &str, away: &str, time_or_status: &str) -> String {
    let id = slugify(&format!("{home} {away} {time_or_status}"));
    if id.is_empty() {
        "match".to_owned()
    } else {
        id
    }
}

/// Parses every match row on the page that belongs to `sport`.
///
/// Rows missing either team name are skipped. The sport of a row comes from
/// the closest heading above it. Duplicate ids keep the first row.
#[must_use]
pub fn parse_matches(html: &str, base: &Url, sport: Sport) -> Vec<Match> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for item in document.select(&ITEMS) {
        let Some(parsed) = parse_item(item, base) else {
            continue;
        };
        if parsed.sport != sport {
            continue;
        }
        if seen.insert(parsed.id.clone()) {
            out.push(parsed);
        }
    }
    out
}

fn parse_item(item: ElementRef<'_>, base: &Url) -> Option<Match> {
    let (home_el, away_el) = team_elements(item)?;
    let home_team = element_text(home_el);
    let away_team = element_text(away_el);
    if home_team.is_empty() || away_team.is_empty() {
        return None;
    }
    let home_team = normalize_team_name(&home_team);
    let away_team = normalize_team_name(&away_team);

    let date_time = first_text(item, &DATE_TIME);
    let status = first_text(item, &STATUS);
    let id_hint = date_time.as_deref().or(status.as_deref()).unwrap_or("");
    let heading = nearby_heading(item).unwrap_or_default();

    Some(Match {
        id: match_id(&home_team, &away_team, id_hint),
        sport: infer_sport(&heading),
        home_logo_url: logo(home_el, base),
        away_logo_url: logo(away_el, base),
        home_team,
        away_team,
        date_time,
        venue: first_text(item, &VENUE),
        status,
        score: first_text(item, &SCORE),
    })
}

/// Explicit home/away elements, else the first two generic team elements.
fn team_elements(item: ElementRef<'_>) -> Option<(ElementRef<'_>, ElementRef<'_>)> {
    if let (Some(home), Some(away)) = (first_element(item, &HOME), first_element(item, &AWAY)) {
        return Some((home, away));
    }
    let mut generic = item.select(&GENERIC_TEAMS);
    Some((generic.next()?, generic.next()?))
}

fn logo(team: ElementRef<'_>, base: &Url) -> Option<String> {
    let url = first_image_url(team, base);
    (!url.is_empty()).then_some(url)
}
