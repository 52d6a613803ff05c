//! Small query helpers over `scraper` element trees.

use std::sync::LazyLock;

use reqwest::Url;
use scraper::{ElementRef, Selector};

use crate::text::{absolute_url, clean_text};

/// Tags whose whole subtree never reaches rendered or parsed content.
pub(crate) const DROPPED_TAGS: &[&str] = &[
    "script", "style", "iframe", "form", "input", "button", "select", "option", "textarea",
    "label", "svg", "noscript", "object", "embed", "canvas", "video", "audio", "source",
    "template", "link", "meta", "nav", "aside", "footer",
];

/// Substrings of `class`/`id` that mark site furniture rather than content.
const EXCLUDED_HINTS: &[&str] = &[
    "advert", "ads", "banner", "enamad", "samandehi", "trust", "sidebar", "widget", "share",
    "social", "related", "comment", "breadcrumb", "navbar", "menu", "footer",
];

static HEADING: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6, .title, .heading").expect("valid heading selector")
});

/// Parses a list of selectors, skipping any the selector engine rejects.
pub(crate) fn selector_list(raw: &[&str]) -> Vec<Selector> {
    raw.iter().filter_map(|s| Selector::parse(s).ok()).collect()
}

pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    clean_text(&el.text().collect::<String>())
}

/// First element matching any selector, in selector order.
pub(crate) fn first_element<'a>(
    scope: ElementRef<'a>,
    selectors: &[Selector],
) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|sel| scope.select(sel).next())
}

/// Text of the first element matching any selector, in selector order.
pub(crate) fn first_text(scope: ElementRef<'_>, selectors: &[Selector]) -> Option<String> {
    selectors.iter().find_map(|sel| {
        scope
            .select(sel)
            .map(element_text)
            .find(|text| !text.is_empty())
    })
}

/// Every non-empty text matching the first selector that matches at all.
pub(crate) fn all_texts(scope: ElementRef<'_>, selectors: &[Selector]) -> Vec<String> {
    for sel in selectors {
        let texts: Vec<String> = scope
            .select(sel)
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect();
        if !texts.is_empty() {
            return texts;
        }
    }
    Vec::new()
}

/// `src`, or the usual lazy-loading attributes when `src` is empty.
pub(crate) fn image_source(img: ElementRef<'_>) -> &str {
    ["src", "data-src", "data-lazy-src", "data-original"]
        .iter()
        .filter_map(|attr| img.value().attr(attr))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or("")
}

/// Absolute URL of the first `<img>` inside `scope`, or empty.
pub(crate) fn first_image_url(scope: ElementRef<'_>, base: &Url) -> String {
    static IMG: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("img").expect("valid img selector"));
    if scope.value().name() == "img" {
        return absolute_url(base, image_source(scope));
    }
    scope
        .select(&IMG)
        .map(|img| absolute_url(base, image_source(img)))
        .find(|url| !url.is_empty())
        .unwrap_or_default()
}

pub(crate) fn is_heading(el: ElementRef<'_>) -> bool {
    matches!(
        el.value().name(),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
    ) || el
        .value()
        .classes()
        .any(|c| c.eq_ignore_ascii_case("title") || c.eq_ignore_ascii_case("heading"))
}

/// Text of the closest heading before `el`: its earlier siblings first, then
/// the earlier siblings of each ancestor in turn.
pub(crate) fn nearby_heading(el: ElementRef<'_>) -> Option<String> {
    let mut current = Some(el);
    while let Some(node) = current {
        for sibling in node.prev_siblings().filter_map(ElementRef::wrap) {
            let text = if is_heading(sibling) {
                element_text(sibling)
            } else {
                sibling
                    .select(&HEADING)
                    .last()
                    .map(element_text)
                    .unwrap_or_default()
            };
            if !text.is_empty() {
                return Some(text);
            }
        }
        current = node.parent().and_then(ElementRef::wrap);
    }
    None
}

/// Lowercased `class` and `id` values joined with spaces.
pub(crate) fn class_and_id(el: ElementRef<'_>) -> String {
    let value = el.value();
    let mut out = value.attr("class").unwrap_or("").to_ascii_lowercase();
    if let Some(id) = value.attr("id") {
        out.push(' ');
        out.push_str(&id.to_ascii_lowercase());
    }
    out
}

/// Site furniture: a dropped tag, or a `class`/`id` carrying an excluded hint.
pub(crate) fn is_excluded_container(el: ElementRef<'_>) -> bool {
    if DROPPED_TAGS.contains(&el.value().name()) {
        return true;
    }
    let marks = class_and_id(el);
    !marks.is_empty() && EXCLUDED_HINTS.iter().any(|hint| marks.contains(hint))
}

/// Whether `el` or any ancestor is site furniture.
pub(crate) fn within_excluded_container(el: ElementRef<'_>) -> bool {
    is_excluded_container(el)
        || el
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(is_excluded_container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn nearby_heading_finds_previous_sibling_heading() {
        let doc = Html::parse_document(
            "<section><h2>لیگ برتر فوتبال ساحلی</h2><div><table id='t'></table></div></section>",
        );
        let sel = Selector::parse("#t").unwrap();
        let table = doc.select(&sel).next().unwrap();
        assert_eq!(
            nearby_heading(table).as_deref(),
            Some("لیگ برتر فوتبال ساحلی")
        );
    }

    #[test]
    fn nearby_heading_prefers_closest_heading() {
        let doc = Html::parse_document(
            "<h2>فوتسال</h2><div><h3>ساحلی</h3><p>x</p><ul><li id='m'>a</li></ul></div>",
        );
        let sel = Selector::parse("#m").unwrap();
        let item = doc.select(&sel).next().unwrap();
        assert_eq!(nearby_heading(item).as_deref(), Some("ساحلی"));
    }

    #[test]
    fn nearby_heading_none_without_headings() {
        let doc = Html::parse_document("<div><p id='p'>x</p></div>");
        let sel = Selector::parse("#p").unwrap();
        assert_eq!(nearby_heading(doc.select(&sel).next().unwrap()), None);
    }

    #[test]
    fn excluded_container_matches_hints_and_tags() {
        let doc = Html::parse_document(
            "<div class='Sidebar-Box'><img id='a' src='x'></div><nav><span id='b'></span></nav><div class='lead'><span id='c'></span></div>",
        );
        let pick = |id: &str| {
            let sel = Selector::parse(&format!("#{id}")).unwrap();
            doc.select(&sel).next().unwrap()
        };
        assert!(within_excluded_container(pick("a")));
        assert!(within_excluded_container(pick("b")));
        assert!(!within_excluded_container(pick("c")));
    }

    #[test]
    fn first_text_respects_selector_priority() {
        let doc = Html::parse_document(
            "<div class='b'>second</div><div class='a'>  first  </div>",
        );
        let selectors = selector_list(&[".a", ".b"]);
        assert_eq!(
            first_text(doc.root_element(), &selectors).as_deref(),
            Some("first")
        );
    }

    #[test]
    fn image_source_falls_back_to_lazy_attributes() {
        let doc = Html::parse_document("<img src='' data-src='/uploads/news/1.jpg'>");
        let sel = Selector::parse("img").unwrap();
        let img = doc.select(&sel).next().unwrap();
        assert_eq!(image_source(img), "/uploads/news/1.jpg");
    }
}
