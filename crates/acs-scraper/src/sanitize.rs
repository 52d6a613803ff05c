//! Allow-list HTML sanitizer for article bodies.
//!
//! The sanitizer is a pure tree walk: it parses the input as a fragment and
//! re-serializes only what the allow-lists admit. Disallowed elements are
//! unwrapped (children kept), furniture subtrees are dropped, and attributes
//! are rebuilt from scratch in a fixed order, so sanitizing already-sanitized
//! output reproduces it byte for byte.

use html_escape::{encode_double_quoted_attribute, encode_text};
use reqwest::Url;
use scraper::{ElementRef, Html, Node};

use crate::dom::{image_source, is_excluded_container};
use crate::text::absolute_url;

const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "strong", "b", "em", "i", "u", "ul", "ol", "li", "h2", "h3", "h4", "blockquote",
    "img", "a", "figure", "figcaption",
];

const HEADINGS: &[&str] = &["h2", "h3", "h4"];
/// Allowed tags whose start tag implicitly ends an open `<p>`.
const CLOSES_PARAGRAPH: &[&str] = &[
    "p", "ul", "ol", "li", "blockquote", "figure", "figcaption", "h2", "h3", "h4",
];
/// An `<li>` start tag only closes an open `<li>` up to one of these.
const LIST_ITEM_BOUNDARIES: &[&str] = &[
    "ul", "ol", "blockquote", "figure", "figcaption", "h2", "h3", "h4",
];

const BLOCKED_SCHEMES: &[&str] = &["javascript:", "data:", "vbscript:"];

fn class_for(tag: &str) -> Option<&'static str> {
    match tag {
        "p" => Some("text-muted-foreground leading-8"),
        "h2" => Some("mt-8 mb-4 text-xl font-bold"),
        "h3" => Some("mt-6 mb-3 text-lg font-bold"),
        "h4" => Some("mt-4 mb-2 font-semibold"),
        "ul" => Some("list-disc pr-6 space-y-2"),
        "ol" => Some("list-decimal pr-6 space-y-2"),
        "blockquote" => Some("border-r-4 pr-4 italic"),
        "figure" => Some("my-6"),
        "figcaption" => Some("mt-2 text-center text-sm text-muted-foreground"),
        "img" => Some("mx-auto rounded-lg"),
        "a" => Some("text-primary underline"),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Sanitizer {
    base_url: Url,
    /// Links into these hosts (or their subdomains) lose their `href`.
    self_hosts: Vec<String>,
}

impl Sanitizer {
    #[must_use]
    pub fn new(base_url: Url, self_hosts: Vec<String>) -> Self {
        let self_hosts = self_hosts
            .into_iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .filter(|h| !h.is_empty())
            .collect();
        Self {
            base_url,
            self_hosts,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns HTML safe for direct rendering. Never fails; anything that
    /// cannot be validated is dropped or unwrapped.
    #[must_use]
    pub fn sanitize(&self, html: &str) -> String {
        let fragment = Html::parse_fragment(html);
        let mut out = String::with_capacity(html.len());
        let mut open = Vec::new();
        self.write_children(fragment.root_element(), &mut open, &mut out);
        out.trim().to_owned()
    }

    fn write_children(
        &self,
        parent: ElementRef<'_>,
        open: &mut Vec<&'static str>,
        out: &mut String,
    ) {
        for child in parent.children() {
            match child.value() {
                Node::Text(text) => out.push_str(&encode_text(&**text)),
                Node::Element(_) => {
                    if let Some(el) = ElementRef::wrap(child) {
                        self.write_element(el, open, out);
                    }
                }
                _ => {}
            }
        }
    }

    fn write_element(&self, el: ElementRef<'_>, open: &mut Vec<&'static str>, out: &mut String) {
        if is_excluded_container(el) {
            return;
        }
        let name = el.value().name();
        let Some(&tag) = ALLOWED_TAGS.iter().find(|t| **t == name) else {
            self.write_children(el, open, out);
            return;
        };
        if !nests_cleanly(tag, open) {
            self.write_children(el, open, out);
            return;
        }
        match tag {
            "br" => out.push_str("<br>"),
            "img" => self.write_image(el, out),
            _ => {
                if tag == "a" {
                    self.open_anchor(el, out);
                } else {
                    open_tag(out, tag, &[]);
                }
                open.push(tag);
                self.write_children(el, open, out);
                open.pop();
                close_tag(out, tag);
            }
        }
    }

    fn open_anchor(&self, el: ElementRef<'_>, out: &mut String) {
        let href = el.value().attr("href").and_then(|h| self.safe_link(h));
        let title = el
            .value()
            .attr("title")
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let mut attrs: Vec<(&str, &str)> = Vec::with_capacity(4);
        if let Some(href) = href.as_deref() {
            attrs.push(("href", href));
        }
        if let Some(title) = title {
            attrs.push(("title", title));
        }
        if href.is_some() {
            attrs.push(("target", "_blank"));
            attrs.push(("rel", "noopener noreferrer"));
        }
        open_tag(out, "a", &attrs);
    }

    fn write_image(&self, el: ElementRef<'_>, out: &mut String) {
        let Some(src) = self.safe_image_src(image_source(el)) else {
            return;
        };
        let value = el.value();
        let alt = value.attr("alt").map_or("", str::trim);
        let title = value.attr("title").map(str::trim).filter(|t| !t.is_empty());

        let mut attrs: Vec<(&str, &str)> = vec![("src", src.as_str()), ("alt", alt)];
        if let Some(title) = title {
            attrs.push(("title", title));
        }
        attrs.push(("loading", "lazy"));
        attrs.push(("decoding", "async"));
        open_tag(out, "img", &attrs);
    }

    /// Absolute http(s) link outside the platform's own hosts, else `None`.
    pub(crate) fn safe_link(&self, raw: &str) -> Option<String> {
        let url = self.resolve_http(raw)?;
        let host = url.host_str()?.to_ascii_lowercase();
        let is_self = self
            .self_hosts
            .iter()
            .any(|h| host == *h || host.ends_with(&format!(".{h}")));
        if is_self {
            None
        } else {
            Some(url.into())
        }
    }

    pub(crate) fn safe_image_src(&self, raw: &str) -> Option<String> {
        self.resolve_http(raw).map(String::from)
    }

    fn resolve_http(&self, raw: &str) -> Option<Url> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lowered = trimmed.to_ascii_lowercase();
        if BLOCKED_SCHEMES.iter().any(|s| lowered.starts_with(s)) {
            return None;
        }
        let resolved = absolute_url(&self.base_url, trimmed);
        let url = Url::parse(&resolved).ok()?;
        matches!(url.scheme(), "http" | "https").then_some(url)
    }
}

/// Whether `tag` can be written inside the `open` elements without the HTML
/// parser closing one of them on the next pass. Tags that cannot are
/// unwrapped instead.
fn nests_cleanly(tag: &str, open: &[&str]) -> bool {
    if CLOSES_PARAGRAPH.contains(&tag) && open.contains(&"p") {
        return false;
    }
    if HEADINGS.contains(&tag) && open.iter().any(|t| HEADINGS.contains(t)) {
        return false;
    }
    if tag == "a" && open.contains(&"a") {
        return false;
    }
    if tag == "li" {
        for t in open.iter().rev() {
            if *t == "li" {
                return false;
            }
            if LIST_ITEM_BOUNDARIES.contains(t) {
                break;
            }
        }
    }
    true
}

fn open_tag(out: &mut String, tag: &str, attrs: &[(&str, &str)]) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attrs {
        push_attr(out, name, value);
    }
    if let Some(class) = class_for(tag) {
        push_attr(out, "class", class);
    }
    out.push('>');
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&encode_double_quoted_attribute(value));
    out.push('"');
}

fn close_tag(out: &mut String, tag: &str) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

#[cfg(test)]
#[path = "sanitize_test.rs"]
mod tests;
