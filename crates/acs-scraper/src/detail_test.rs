use super::*;
use acs_core::Sport;

fn base() -> Url {
    Url::parse("https://www.acs.ir").unwrap()
}

fn sanitizer() -> Sanitizer {
    Sanitizer::new(base(), vec!["www.acs.ir".into(), "acs.ir".into()])
}

const FIGURE_PAGE: &str = r#"
<html><body>
<article>
  <h1 class="news-title"> قهرمانی   تیم ملی فوتبال ساحلی </h1>
  <span class="news-category">ملی</span>
  <span class="news-date">۱۴۰۳/۰۷/۱۰</span>
  <p class="news-lead">لید خبر</p>
  <div class="news-body">
    <p>پاراگراف اول</p>
    <div class="ads"><p>تبلیغ</p></div>
    <figure><img src="/uploads/site-logo.png" width="800"></figure>
    <figure class="photo"><img src="/uploads/news/1403/main.jpg" width="900"><figcaption>کپشن</figcaption></figure>
    <p>پاراگراف دوم <a href="https://example.com/x">لینک</a></p>
    <img src="/uploads/news/1403/second.jpg" width="900">
  </div>
  <div class="news-tags"><a>فوتبال ساحلی</a><a>تیم ملی</a><a> فوتبال  ساحلی </a></div>
</article>
</body></html>
"#;

#[test]
fn reads_header_fields_with_cleaned_text() {
    let page = parse_detail_page(FIGURE_PAGE, &base(), &sanitizer());
    assert_eq!(page.title, "قهرمانی تیم ملی فوتبال ساحلی");
    assert_eq!(page.category, "ملی");
    assert_eq!(page.published_at, "۱۴۰۳/۰۷/۱۰");
    assert_eq!(page.lead, "لید خبر");
    assert_eq!(page.tags, ["فوتبال ساحلی", "تیم ملی"]);
    assert!(page.teams.is_empty());
}

#[test]
fn figure_image_is_featured_and_removed_from_body() {
    let page = parse_detail_page(FIGURE_PAGE, &base(), &sanitizer());
    assert_eq!(page.image_url, "https://www.acs.ir/uploads/news/1403/main.jpg");
    assert!(!page.body_html.contains("main.jpg"), "{}", page.body_html);
    assert!(!page.body_html.contains("کپشن"), "whole figure goes");
    assert!(page.body_html.contains("second.jpg"), "figure match wins over later images");
    assert!(page.body_html.contains("site-logo.png"), "rejected candidates stay in the body");
    assert!(!page.body_html.contains("تبلیغ"));
}

#[test]
fn paragraphs_are_plain_text_of_the_sanitized_body() {
    let page = parse_detail_page(FIGURE_PAGE, &base(), &sanitizer());
    assert_eq!(page.paragraphs, ["پاراگراف اول", "پاراگراف دوم لینک"]);
}

#[test]
fn falls_back_to_first_gated_image_after_lead_paragraph() {
    let html = r#"<div class="news-content">
        <img src="/uploads/news/before.jpg" width="900">
        <p> </p>
        <p>لید</p>
        <p><img src="/uploads/news/small.jpg" width="120"><img src="/uploads/news/after.jpg" width="640"></p>
        <p>ادامه</p>
    </div>"#;
    let page = parse_detail_page(html, &base(), &sanitizer());
    assert_eq!(page.image_url, "https://www.acs.ir/uploads/news/after.jpg");
    assert!(page.body_html.contains("before.jpg"));
    assert!(page.body_html.contains("small.jpg"));
    assert!(!page.body_html.contains("after.jpg"));
}

#[test]
fn nested_figure_is_removed_whole() {
    let html = r#"<div class="news-body">
        <p>لید</p>
        <div class="wrap"><figure><img data-src="/media/photo.jpg" data-width="700"></figure></div>
        <figure><figcaption>بدون تصویر</figcaption></figure>
    </div>"#;
    let page = parse_detail_page(html, &base(), &sanitizer());
    assert_eq!(page.image_url, "https://www.acs.ir/media/photo.jpg");
    assert!(!page.body_html.contains("photo.jpg"));
    assert!(page.body_html.contains("بدون تصویر"));
}

#[test]
fn no_valid_candidate_leaves_image_empty() {
    let html = r#"<div class="news-body"><p>متن</p><img src="/uploads/news/a.jpg"></div>"#;
    let page = parse_detail_page(html, &base(), &sanitizer());
    assert_eq!(page.image_url, "");
    assert!(page.body_html.contains("a.jpg"));
}

#[test]
fn missing_body_rebuilds_escaped_paragraphs() {
    let html = "<html><body><article><h1>عنوان</h1><p>یک &amp; <b>دو</b></p><p>سه</p></article></body></html>";
    let page = parse_detail_page(html, &base(), &sanitizer());
    assert_eq!(page.title, "عنوان");
    assert_eq!(page.category, PLACEHOLDER_TEXT);
    assert_eq!(page.image_url, "");
    assert_eq!(page.paragraphs, ["یک & دو", "سه"]);
    assert_eq!(
        page.body_html,
        r#"<p class="text-muted-foreground leading-8">یک &amp; دو</p><p class="text-muted-foreground leading-8">سه</p>"#
    );
}

#[test]
fn empty_page_is_blank_and_uses_placeholders() {
    let page = parse_detail_page("<html><body></body></html>", &base(), &sanitizer());
    assert!(page.is_blank());
    assert_eq!(page.lead, PLACEHOLDER_TEXT);
    assert_eq!(page, placeholder_page());
}

#[test]
fn conversions_carry_identity_and_infer_sport() {
    let page = parse_detail_page(FIGURE_PAGE, &base(), &sanitizer());
    let source = "https://www.acs.ir/fullcontent/77/";

    let article = page.clone().into_article("77", "news-77-x", source);
    assert_eq!(article.id, "77");
    assert_eq!(article.sport, Sport::Beach);
    assert_eq!(article.paragraphs.len(), 2);

    let news = page.into_news("news-77-x", source);
    assert_eq!(news.slug, "news-77-x");
    assert_eq!(news.source_url, source);
    assert!(news.body_html.starts_with("<p class="));
}

#[test]
fn news_path_targets_fullcontent() {
    assert_eq!(news_path("123"), "/fullcontent/123/");
}
