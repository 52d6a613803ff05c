//! Featured-image validity gate.
//!
//! Decides whether an `<img>` is editorial content worth promoting to an
//! article's featured image, as opposed to a logo, seal, ad or thumbnail.
//! Only the attributes are available, so an image without a declared width
//! is rejected.

use reqwest::Url;
use scraper::ElementRef;

use crate::dom::{image_source, within_excluded_container};
use crate::text::absolute_url;

pub const MIN_FEATURED_WIDTH: u32 = 300;

const CONTENT_PATH_SEGMENTS: &[&str] = &["/uploads/", "/news/", "/media/"];

const WIDTH_ATTRIBUTES: &[&str] = &["width", "data-width", "data-naturalwidth"];

/// Whole tokens in a filename, class or id that mark non-editorial images.
pub(crate) const IMAGE_HINT_TOKENS: &[&str] = &[
    "icon", "logo", "badge", "trust", "enamad", "samandehi", "ad", "ads", "advert", "banner",
    "sprite", "avatar", "favicon",
];

/// Resolved `src` of `img` if it passes every gate, else `None`.
pub(crate) fn featured_image_src(img: ElementRef<'_>, base: &Url) -> Option<String> {
    if within_excluded_container(img) {
        return None;
    }
    let src = absolute_url(base, image_source(img));
    let url = Url::parse(&src).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    let path = url.path().to_ascii_lowercase();
    if !CONTENT_PATH_SEGMENTS.iter().any(|seg| path.contains(seg)) {
        return None;
    }

    let file_name = path.rsplit('/').next().unwrap_or("");
    let value = img.value();
    let marks = [
        file_name,
        value.attr("class").unwrap_or(""),
        value.attr("id").unwrap_or(""),
    ];
    if marks.iter().any(|m| has_hint_token(m)) {
        return None;
    }

    let width = declared_width(img)?;
    (width >= MIN_FEATURED_WIDTH).then_some(src)
}

/// True if any alphanumeric run of `text` is one of [`IMAGE_HINT_TOKENS`].
pub(crate) fn has_hint_token(text: &str) -> bool {
    text.to_ascii_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| IMAGE_HINT_TOKENS.contains(&token))
}

/// First width attribute, in preference order, that holds a number.
fn declared_width(img: ElementRef<'_>) -> Option<u32> {
    WIDTH_ATTRIBUTES.iter().find_map(|attr| {
        let raw = img.value().attr(attr)?.trim();
        let digits: String = raw.chars().take_while(char::is_ascii_digit).collect();
        digits.parse::<u32>().ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn gate(html: &str) -> Option<String> {
        let doc = Html::parse_fragment(html);
        let sel = Selector::parse("img").unwrap();
        let img = doc.select(&sel).next().unwrap();
        featured_image_src(img, &Url::parse("https://www.acs.ir").unwrap())
    }

    #[test]
    fn accepts_wide_editorial_image() {
        assert_eq!(
            gate(r#"<img src="/uploads/news/1403/final.jpg" width="800">"#).as_deref(),
            Some("https://www.acs.ir/uploads/news/1403/final.jpg")
        );
    }

    #[test]
    fn rejects_missing_or_narrow_width() {
        assert_eq!(gate(r#"<img src="/uploads/news/a.jpg">"#), None);
        assert_eq!(gate(r#"<img src="/uploads/news/a.jpg" width="120">"#), None);
        assert_eq!(gate(r#"<img src="/uploads/news/a.jpg" width="auto">"#), None);
    }

    #[test]
    fn width_attributes_follow_preference_order() {
        assert!(gate(r#"<img src="/media/a.jpg" data-width="640">"#).is_some());
        assert!(gate(r#"<img src="/media/a.jpg" data-naturalwidth="640px">"#).is_some());
        assert!(gate(r#"<img src="/media/a.jpg" width="100" data-width="900">"#).is_none());
    }

    #[test]
    fn rejects_paths_outside_content_folders() {
        assert_eq!(gate(r#"<img src="/static/img/photo.jpg" width="800">"#), None);
    }

    #[test]
    fn rejects_hint_tokens_in_filename_class_or_id() {
        assert_eq!(gate(r#"<img src="/uploads/site-logo.png" width="800">"#), None);
        assert_eq!(gate(r#"<img src="/uploads/news/a.jpg" class="ad" width="800">"#), None);
        assert_eq!(gate(r#"<img src="/uploads/news/a.jpg" id="trust-badge" width="800">"#), None);
        assert!(gate(r#"<img src="/uploads/news/road-trip.jpg" width="800">"#).is_some());
    }

    #[test]
    fn rejects_images_inside_excluded_containers() {
        assert_eq!(
            gate(r#"<div class="sidebar"><img src="/uploads/news/a.jpg" width="800"></div>"#),
            None
        );
    }

    #[test]
    fn rejects_unusable_sources() {
        assert_eq!(gate(r#"<img src="" width="800">"#), None);
        assert_eq!(gate(r#"<img src="data:image/png;base64,AA" width="800">"#), None);
    }

    #[test]
    fn hint_tokens_match_whole_words_only() {
        assert!(has_hint_token("main-logo.png"));
        assert!(has_hint_token("AD_slot"));
        assert!(!has_hint_token("uploads"));
        assert!(!has_hint_token("headline"));
    }
}
