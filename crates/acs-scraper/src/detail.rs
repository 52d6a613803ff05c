//! Article page extractor behind both [`NewsDetail`] and [`ArticleDetail`].
//!
//! The body container is copied into its own fragment, the featured image is
//! picked out of it and detached, and only then is the fragment sanitized.
//! The featured image therefore never appears twice.

use std::sync::LazyLock;

use acs_core::{ArticleDetail, NewsDetail};
use html_escape::encode_text;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::dom::{all_texts, element_text, first_element, first_text, selector_list};
use crate::image::featured_image_src;
use crate::sanitize::Sanitizer;
use crate::text::{clean_text, infer_sport};

/// Stands in for any text field the page did not provide.
pub const PLACEHOLDER_TEXT: &str = "نامشخص";

#[must_use]
pub fn news_path(id: &str) -> String {
    format!("/fullcontent/{id}/")
}

static TITLE: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    selector_list(&["h1.news-title", ".news-title", ".title h1", "article h1", "h1"])
});
static CATEGORY: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    selector_list(&[".news-category", ".category", ".service-name", ".cat"])
});
static DATE: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    selector_list(&[".news-date", ".publish-date", "time", ".date"])
});
static LEAD: LazyLock<Vec<Selector>> =
    LazyLock::new(|| selector_list(&[".news-lead", ".lead", ".subtitle", ".summary"]));
static BODY: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    selector_list(&[
        ".news-body",
        ".news-content",
        "#news-body",
        ".content-text",
        ".entry-content",
        "article .content",
        ".body",
    ])
});
static PARAGRAPHS: LazyLock<Vec<Selector>> =
    LazyLock::new(|| selector_list(&[".news-text p", "article p", ".content p"]));
static TAGS: LazyLock<Vec<Selector>> =
    LazyLock::new(|| selector_list(&[".news-tags a", ".tags a", ".keywords a"]));
static TEAMS: LazyLock<Vec<Selector>> =
    LazyLock::new(|| selector_list(&[".news-teams a", ".teams a", ".team-tags a"]));

static FIGURE_IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("figure img").expect("valid figure img selector"));
static P: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").expect("valid p selector"));

/// Everything read from one article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPage {
    pub title: String,
    pub category: String,
    pub published_at: String,
    pub lead: String,
    pub image_url: String,
    pub body_html: String,
    pub paragraphs: Vec<String>,
    pub tags: Vec<String>,
    pub teams: Vec<String>,
}

impl DetailPage {
    /// True when the page yielded neither a title nor any body text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.title == PLACEHOLDER_TEXT && self.paragraphs.is_empty() && self.body_html.is_empty()
    }

    #[must_use]
    pub fn into_news(self, slug: &str, source_url: &str) -> NewsDetail {
        NewsDetail {
            slug: slug.to_owned(),
            title: self.title,
            category: self.category,
            published_at: self.published_at,
            image_url: self.image_url,
            lead: self.lead,
            body_html: self.body_html,
            source_url: source_url.to_owned(),
            tags: self.tags,
            teams: self.teams,
        }
    }

    #[must_use]
    pub fn into_article(self, id: &str, slug: &str, source_url: &str) -> ArticleDetail {
        ArticleDetail {
            id: id.to_owned(),
            slug: slug.to_owned(),
            sport: infer_sport(&format!("{} {}", self.title, self.category)),
            title: self.title,
            category: self.category,
            published_at: self.published_at,
            image_url: self.image_url,
            lead: self.lead,
            paragraphs: self.paragraphs,
            source_url: source_url.to_owned(),
        }
    }
}

/// Deterministic stand-in used when network access is switched off.
#[must_use]
pub fn placeholder_page() -> DetailPage {
    DetailPage {
        title: PLACEHOLDER_TEXT.to_owned(),
        category: PLACEHOLDER_TEXT.to_owned(),
        published_at: PLACEHOLDER_TEXT.to_owned(),
        lead: PLACEHOLDER_TEXT.to_owned(),
        image_url: String::new(),
        body_html: String::new(),
        paragraphs: Vec::new(),
        tags: Vec::new(),
        teams: Vec::new(),
    }
}

#[must_use]
pub fn parse_detail_page(html: &str, base: &Url, sanitizer: &Sanitizer) -> DetailPage {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let text_or_placeholder = |selectors: &[Selector]| {
        first_text(root, selectors).unwrap_or_else(|| PLACEHOLDER_TEXT.to_owned())
    };

    let (image_url, body_html, paragraphs) = match first_element(root, &BODY) {
        Some(body) => extract_body(&body.inner_html(), base, sanitizer),
        None => {
            let paragraphs = all_texts(root, &PARAGRAPHS);
            let rebuilt: String = paragraphs
                .iter()
                .map(|p| format!("<p>{}</p>", encode_text(p)))
                .collect();
            (String::new(), sanitizer.sanitize(&rebuilt), paragraphs)
        }
    };

    DetailPage {
        title: text_or_placeholder(&TITLE),
        category: text_or_placeholder(&CATEGORY),
        published_at: text_or_placeholder(&DATE),
        lead: text_or_placeholder(&LEAD),
        image_url,
        body_html,
        paragraphs,
        tags: unique(all_texts(root, &TAGS)),
        teams: unique(all_texts(root, &TEAMS)),
    }
}

/// Returns `(featured image, sanitized body, plain paragraphs)`.
fn extract_body(
    inner_html: &str,
    base: &Url,
    sanitizer: &Sanitizer,
) -> (String, String, Vec<String>) {
    let mut fragment = Html::parse_fragment(inner_html);

    let featured = featured_in_figure(&fragment, base)
        .or_else(|| featured_after_lead(&fragment, base))
        .map(|(src, removed)| (src, removed.id()));
    let image_url = match featured {
        Some((src, node)) => {
            if let Some(mut node) = fragment.tree.get_mut(node) {
                node.detach();
            }
            src
        }
        None => String::new(),
    };

    let body_html = sanitizer.sanitize(&fragment.root_element().inner_html());
    let paragraphs = plain_paragraphs(&body_html);
    (image_url, body_html, paragraphs)
}

/// Paragraph texts of already-sanitized HTML; the whole text when it has no
/// `<p>` at all.
fn plain_paragraphs(sanitized: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(sanitized);
    let root = fragment.root_element();
    let paragraphs: Vec<String> = root
        .select(&P)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect();
    if !paragraphs.is_empty() {
        return paragraphs;
    }
    let text = element_text(root);
    if text.is_empty() {
        Vec::new()
    } else {
        vec![text]
    }
}

/// First gated image inside a `<figure>`, paired with the figure to remove.
fn featured_in_figure<'a>(fragment: &'a Html, base: &Url) -> Option<(String, ElementRef<'a>)> {
    fragment.select(&FIGURE_IMG).find_map(|img| {
        let src = featured_image_src(img, base)?;
        let figure = enclosing_figure(img)?;
        Some((src, figure))
    })
}

/// First gated image after the first non-empty paragraph (from the start
/// when there is no paragraph), paired with the image or its figure.
fn featured_after_lead<'a>(fragment: &'a Html, base: &Url) -> Option<(String, ElementRef<'a>)> {
    let root = fragment.root_element();
    let lead = root
        .select(&P)
        .find(|p| !element_text(*p).is_empty())
        .map(|p| p.id());
    let mut past_lead = lead.is_none();

    for node in root.descendants() {
        if Some(node.id()) == lead {
            past_lead = true;
            continue;
        }
        if !past_lead {
            continue;
        }
        let Some(el) = ElementRef::wrap(node) else {
            continue;
        };
        if el.value().name() != "img" {
            continue;
        }
        if let Some(src) = featured_image_src(el, base) {
            return Some((src, enclosing_figure(el).unwrap_or(el)));
        }
    }
    None
}

fn enclosing_figure(img: ElementRef<'_>) -> Option<ElementRef<'_>> {
    img.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "figure")
}

fn unique(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = clean_text(&item);
        if !item.is_empty() && !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
#[path = "detail_test.rs"]
mod tests;
