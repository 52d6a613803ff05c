//! League table extractor.
//!
//! Tables are recognized by a header row with a team column. Columns are
//! mapped by label substring (Persian first, then English), so reordered or
//! renamed headers still land in the right field. Numeric cells go through
//! [`coerce_number`]; a blank or non-numeric cell is `0`, never an error.

use std::sync::LazyLock;

use acs_core::{Sport, StandingsRow};
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::dom::{element_text, first_image_url, nearby_heading};
use crate::text::{coerce_number, infer_sport, normalize_team_name};

pub const STANDINGS_PATH: &str = "/";

#[must_use]
pub fn cache_key(sport: Sport) -> String {
    format!("standings-{sport}")
}

static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid table selector"));
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid tr selector"));
static CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("th, td").expect("valid cell selector"));
static DATA_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("valid td selector"));
static CAPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("caption").expect("valid caption selector"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Team,
    GoalDiff,
    Points,
    Draws,
    Losses,
    Wins,
    Played,
    Position,
}

/// Checked in order; the first role whose label matches wins.
const COLUMN_LABELS: &[(Column, &[&str])] = &[
    (Column::Team, &["تیم", "باشگاه", "team", "club"]),
    (Column::GoalDiff, &["تفاضل", "+/-", "diff"]),
    (Column::Points, &["امتیاز", "pts", "points"]),
    (Column::Draws, &["مساوی", "تساوی", "draw"]),
    (Column::Losses, &["باخت", "شکست", "lost", "loss"]),
    (Column::Wins, &["برد", "پیروزی", "won", "win"]),
    (Column::Played, &["بازی", "played"]),
    (Column::Position, &["رتبه", "ردیف", "جایگاه", "#", "rank", "pos"]),
];

fn column_for(label: &str) -> Option<Column> {
    let label = label.to_lowercase();
    COLUMN_LABELS
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| label.contains(n)))
        .map(|(column, _)| *column)
}

/// Column index for each role; the first header cell claiming a role keeps it.
#[derive(Debug, Default)]
struct ColumnMap {
    slots: Vec<(Column, usize)>,
}

impl ColumnMap {
    fn from_labels(labels: &[String]) -> Self {
        let mut map = Self::default();
        for (idx, label) in labels.iter().enumerate() {
            if let Some(column) = column_for(label) {
                if map.index(column).is_none() {
                    map.slots.push((column, idx));
                }
            }
        }
        map
    }

    fn index(&self, column: Column) -> Option<usize> {
        self.slots
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, idx)| *idx)
    }
}

/// Rows of the first standings table on the page that belongs to `sport`.
#[must_use]
pub fn parse_standings(html: &str, base: &Url, sport: Sport) -> Vec<StandingsRow> {
    let document = Html::parse_document(html);
    document
        .select(&TABLE)
        .filter(|table| table_sport(*table) == sport)
        .find_map(|table| {
            let rows = parse_table(table, base);
            (!rows.is_empty()).then_some(rows)
        })
        .unwrap_or_default()
}

fn table_sport(table: ElementRef<'_>) -> Sport {
    let caption = table
        .select(&CAPTION)
        .next()
        .map(element_text)
        .filter(|c| !c.is_empty());
    let context = caption
        .or_else(|| nearby_heading(table))
        .unwrap_or_default();
    infer_sport(&context)
}

/// Empty unless the first row is a header with a team column.
fn parse_table(table: ElementRef<'_>, base: &Url) -> Vec<StandingsRow> {
    let mut rows = table.select(&ROW).filter(|tr| owned_by(*tr, table));
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let labels: Vec<String> = header.select(&CELL).map(element_text).collect();
    let columns = ColumnMap::from_labels(&labels);
    let Some(team_idx) = columns.index(Column::Team) else {
        return Vec::new();
    };

    rows.filter_map(|tr| {
        let cells: Vec<ElementRef<'_>> = tr.select(&DATA_CELL).collect();
        (cells.len() > team_idx).then_some(cells)
    })
    .enumerate()
    .map(|(idx, cells)| build_row(idx, &cells, team_idx, &columns, base))
    .collect()
}

fn build_row(
    idx: usize,
    cells: &[ElementRef<'_>],
    team_idx: usize,
    columns: &ColumnMap,
    base: &Url,
) -> StandingsRow {
    let number = |column: Column| {
        columns
            .index(column)
            .and_then(|i| cells.get(i))
            .map_or(0, |cell| coerce_number(&element_text(*cell)))
    };
    let team_cell = cells[team_idx];
    let logo = first_image_url(team_cell, base);
    let fallback_position = i64::try_from(idx + 1).unwrap_or(i64::MAX);

    StandingsRow {
        position: columns
            .index(Column::Position)
            .map_or(fallback_position, |_| number(Column::Position)),
        team_name: normalize_team_name(&element_text(team_cell)),
        team_logo_url: (!logo.is_empty()).then_some(logo),
        played: number(Column::Played),
        wins: number(Column::Wins),
        draws: number(Column::Draws),
        losses: number(Column::Losses),
        goal_diff: number(Column::GoalDiff),
        points: number(Column::Points),
    }
}

/// Whether `tr` belongs to `table` itself and not to a nested table.
fn owned_by(tr: ElementRef<'_>, table: ElementRef<'_>) -> bool {
    tr.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table")
        .is_some_and(|nearest| nearest.id() == table.id())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.acs.ir").unwrap()
    }

    const PAGE: &str = r#"
    <html><body>
      <div class="box">
        <h3>جدول لیگ برتر فوتسال</h3>
        <table class="standings">
          <thead><tr><th>رتبه</th><th>نام تیم</th><th>بازی</th><th>برد</th><th>مساوی</th><th>باخت</th><th>تفاضل گل</th><th>امتیاز</th></tr></thead>
          <tbody>
            <tr><td>۱</td><td><img src="/uploads/media/teams/1.png"> گیتی‌پسند </td><td>9</td><td>8</td><td>1</td><td>0</td><td>+21</td><td>25</td></tr>
            <tr><td>2</td><td>-</td><td>9</td><td>6</td><td>2</td><td>1</td><td>ندارد</td><td>20</td></tr>
          </tbody>
        </table>
      </div>
      <div class="box">
        <h3>جدول فوتبال ساحلی</h3>
        <table>
          <tr><th>تیم</th><th>امتیاز</th></tr>
          <tr><td>ملوان</td><td>12</td></tr>
          <tr><td>پارس جنوبی</td><td>9</td></tr>
        </table>
      </div>
      <table><tr><th>ساعت</th><th>ورزشگاه</th></tr><tr><td>18</td><td>x</td></tr></table>
    </body></html>"#;

    #[test]
    fn maps_columns_by_label_substring() {
        let rows = parse_standings(PAGE, &base(), Sport::Futsal);
        assert_eq!(rows.len(), 2);
        let first = &rows[0];
        assert_eq!(first.position, 1);
        assert_eq!(first.team_name, "گیتی‌پسند");
        assert_eq!(
            first.team_logo_url.as_deref(),
            Some("https://www.acs.ir/uploads/media/teams/1.png")
        );
        assert_eq!(
            (first.played, first.wins, first.draws, first.losses),
            (9, 8, 1, 0)
        );
        assert_eq!(first.goal_diff, 21);
        assert_eq!(first.points, 25);
    }

    #[test]
    fn non_numeric_cells_coerce_to_zero() {
        let rows = parse_standings(PAGE, &base(), Sport::Futsal);
        assert_eq!(rows[1].goal_diff, 0);
        assert_eq!(rows[1].team_name, crate::text::FALLBACK_TEAM_NAME);
    }

    #[test]
    fn sport_comes_from_nearby_heading_and_missing_columns_default() {
        let rows = parse_standings(PAGE, &base(), Sport::Beach);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].team_name, "ملوان");
        assert_eq!(rows[0].position, 1);
        assert_eq!(rows[1].position, 2);
        assert_eq!(rows[1].points, 9);
        assert_eq!(rows[1].played, 0);
    }

    #[test]
    fn tables_without_team_header_are_ignored() {
        let html = "<table><tr><th>ساعت</th></tr><tr><td>1</td></tr></table>";
        assert!(parse_standings(html, &base(), Sport::Futsal).is_empty());
    }

    #[test]
    fn caption_overrides_heading() {
        let html = "<h2>فوتسال</h2><table><caption>Beach league</caption><tr><th>Team</th><th>Pts</th></tr><tr><td>A</td><td>3</td></tr></table>";
        assert!(parse_standings(html, &base(), Sport::Futsal).is_empty());
        let beach = parse_standings(html, &base(), Sport::Beach);
        assert_eq!(beach[0].points, 3);
    }

    #[test]
    fn header_labels_resolve_to_expected_columns() {
        assert_eq!(column_for("تفاضل گل"), Some(Column::GoalDiff));
        assert_eq!(column_for("+/-"), Some(Column::GoalDiff));
        assert_eq!(column_for("تساوی"), Some(Column::Draws));
        assert_eq!(column_for("#"), Some(Column::Position));
        assert_eq!(column_for("Team"), Some(Column::Team));
        assert_eq!(column_for("گل زده"), None);
    }
}
