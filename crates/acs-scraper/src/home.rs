//! Home page extractor: hero carousel plus the latest-news link scan.

use std::collections::HashSet;
use std::sync::LazyLock;

use acs_core::Article;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::dom::{
    element_text, first_image_url, first_text, selector_list, within_excluded_container,
};
use crate::image::has_hint_token;
use crate::text::{
    absolute_url, clean_text, create_article_slug, extract_id_from_href, infer_sport,
};

pub const HOME_PATH: &str = "/";
pub const HOME_CACHE_KEY: &str = "home";

pub const HERO_SLIDE_LIMIT: usize = 5;
pub const LATEST_NEWS_MIN: usize = 12;
pub const LATEST_NEWS_MAX: usize = 30;

/// Titles that are really leftover image captions or CMS placeholders.
const JUNK_TITLES: &[&str] = &[
    "crop", "image", "img", "photo", "untitled", "عکس", "تصویر", "بدون عنوان",
];
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];

static HERO_ITEMS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        ".hero-slider .item, .main-slider .item, .carousel .item, .carousel-item, \
         .slider .slide, .swiper-slide, .owl-carousel .item",
    )
    .expect("valid hero selector")
});
static NEWS_LINKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href*='fullcontent'], a[href*='FullContent'], a[href*='Fullcontent']")
        .expect("valid news link selector")
});
static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));
static IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("valid img selector"));

static HERO_TITLE: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    selector_list(&[".title", ".caption h2", ".caption h3", "h2", "h3", "h4", ".caption"])
});
static CARD_EXCERPT: LazyLock<Vec<Selector>> =
    LazyLock::new(|| selector_list(&[".lead", ".summary", ".excerpt", ".desc", "p"]));
static CARD_DATE: LazyLock<Vec<Selector>> =
    LazyLock::new(|| selector_list(&["time", ".date", ".news-date", ".time"]));
static CARD_CATEGORY: LazyLock<Vec<Selector>> =
    LazyLock::new(|| selector_list(&[".category", ".cat", ".service", ".tag"]));

const CARD_TAGS: &[&str] = &["li", "article"];
const CARD_CLASSES: &[&str] = &["item", "news-item", "card", "post", "news"];
const CARD_MAX_DEPTH: usize = 4;

/// Raw candidates scraped from the home page, before gating and padding.
#[derive(Debug, Default)]
pub struct HomeParse {
    pub hero: Vec<Article>,
    pub latest: Vec<Article>,
}

impl HomeParse {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hero.is_empty() && self.latest.is_empty()
    }
}

/// Parses hero slides and news links, each list de-duplicated by id.
///
/// Anchors with no usable title are skipped without claiming their id, so a
/// later titled link to the same article still gets through.
#[must_use]
pub fn parse_home(html: &str, base: &Url) -> HomeParse {
    let document = Html::parse_document(html);

    let mut hero_seen = HashSet::new();
    let mut hero = Vec::new();
    for item in document.select(&HERO_ITEMS) {
        if let Some(article) = hero_article(item, base) {
            if hero_seen.insert(article.id.clone()) {
                hero.push(article);
            }
        }
    }

    let mut latest_seen = HashSet::new();
    let mut latest = Vec::new();
    for link in document.select(&NEWS_LINKS) {
        if within_excluded_container(link) {
            continue;
        }
        if let Some(article) = link_article(link, base) {
            if latest_seen.insert(article.id.clone()) {
                latest.push(article);
            }
        }
    }

    HomeParse { hero, latest }
}

fn hero_article(item: ElementRef<'_>, base: &Url) -> Option<Article> {
    let anchor = if item.value().name() == "a" {
        item
    } else {
        item.select(&ANCHOR).next()?
    };
    let href = anchor.value().attr("href")?;
    let title = first_text(item, &HERO_TITLE)
        .or_else(|| attr_text(anchor, "title"))
        .or_else(|| non_empty(element_text(anchor)))
        .or_else(|| item.select(&IMG).find_map(|img| attr_text(img, "alt")))?;
    Some(build_article(href, title, item, base, true))
}

fn link_article(link: ElementRef<'_>, base: &Url) -> Option<Article> {
    let href = link.value().attr("href")?;
    let title = non_empty(element_text(link))
        .or_else(|| attr_text(link, "title"))?;
    let card = enclosing_card(link).unwrap_or(link);
    Some(build_article(href, title, card, base, false))
}

fn build_article(
    href: &str,
    title: String,
    scope: ElementRef<'_>,
    base: &Url,
    is_featured: bool,
) -> Article {
    let id = extract_id_from_href(href);
    let category = first_text(scope, &CARD_CATEGORY).unwrap_or_default();
    let excerpt = first_text(scope, &CARD_EXCERPT)
        .filter(|e| *e != title)
        .unwrap_or_default();
    Article {
        slug: create_article_slug(&id, &title),
        sport: infer_sport(&format!("{title} {category}")),
        excerpt,
        published_at: first_text(scope, &CARD_DATE).unwrap_or_default(),
        source_url: Some(absolute_url(base, href)).filter(|u| !u.is_empty()),
        image_url: first_image_url(scope, base),
        id,
        title,
        category,
        is_featured,
    }
}

/// Closest list item, article or card-like block around a news link.
fn enclosing_card(link: ElementRef<'_>) -> Option<ElementRef<'_>> {
    link.ancestors()
        .filter_map(ElementRef::wrap)
        .take(CARD_MAX_DEPTH)
        .find(|el| {
            CARD_TAGS.contains(&el.value().name())
                || el.value().classes().any(|c| CARD_CLASSES.contains(&c))
        })
}

fn attr_text(el: ElementRef<'_>, attr: &str) -> Option<String> {
    el.value().attr(attr).map(clean_text).filter(|t| !t.is_empty())
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

/// Keeps hero candidates fit for the carousel, first occurrence per id, at
/// most [`HERO_SLIDE_LIMIT`].
///
/// A slide needs an absolute http(s) image that is not a logo or icon, and a
/// real title rather than an image caption placeholder.
#[must_use]
pub fn collect_valid_slides(candidates: Vec<Article>) -> Vec<Article> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(is_valid_slide)
        .filter(|a| seen.insert(a.id.clone()))
        .take(HERO_SLIDE_LIMIT)
        .collect()
}

fn is_valid_slide(article: &Article) -> bool {
    let Ok(image) = Url::parse(&article.image_url) else {
        return false;
    };
    if !matches!(image.scheme(), "http" | "https") {
        return false;
    }
    let file_name = image.path().rsplit('/').next().unwrap_or("");
    if has_hint_token(file_name) {
        return false;
    }
    !is_junk_title(&article.title)
}

fn is_junk_title(title: &str) -> bool {
    let lowered = clean_text(title).to_lowercase();
    lowered.is_empty()
        || JUNK_TITLES.contains(&lowered.as_str())
        || IMAGE_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext))
}

/// Live links first, then padding, de-duplicated by id and cut to
/// [`LATEST_NEWS_MAX`]. Ids in `exclude` (the hero slides) never appear.
///
/// The result only falls below [`LATEST_NEWS_MIN`] when the combined pool
/// has fewer unique articles than that.
#[must_use]
pub fn bound_latest_news(
    primary: Vec<Article>,
    padding: Vec<Article>,
    exclude: &HashSet<String>,
) -> Vec<Article> {
    let mut seen = exclude.clone();
    let merged: Vec<Article> = primary
        .into_iter()
        .chain(padding)
        .filter(|a| seen.insert(a.id.clone()))
        .take(LATEST_NEWS_MAX)
        .collect();
    if merged.len() < LATEST_NEWS_MIN {
        tracing::debug!(
            count = merged.len(),
            min = LATEST_NEWS_MIN,
            "latest news pool is smaller than the minimum"
        );
    }
    merged
}

/// Hero slides and latest news for one payload. Hero ids are kept out of
/// the latest list.
#[must_use]
pub fn assemble_home(parsed: HomeParse, padding: Vec<Article>) -> (Vec<Article>, Vec<Article>) {
    let hero = collect_valid_slides(parsed.hero);
    let hero_ids: HashSet<String> = hero.iter().map(|a| a.id.clone()).collect();
    let latest = bound_latest_news(parsed.latest, padding, &hero_ids);
    (hero, latest)
}

/// Home content built from local articles only; featured ones become slides.
#[must_use]
pub fn home_from_local(local: Vec<Article>) -> (Vec<Article>, Vec<Article>) {
    let featured = local.iter().filter(|a| a.is_featured).cloned().collect();
    assemble_home(
        HomeParse {
            hero: featured,
            latest: Vec::new(),
        },
        local,
    )
}

#[cfg(test)]
#[path = "home_test.rs"]
mod tests;
