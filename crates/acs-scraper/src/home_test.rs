use super::*;
use acs_core::Sport;

fn base() -> Url {
    Url::parse("https://www.acs.ir").unwrap()
}

fn article(id: &str, title: &str, image_url: &str) -> Article {
    Article {
        id: id.to_owned(),
        slug: create_article_slug(id, title),
        title: title.to_owned(),
        excerpt: String::new(),
        published_at: String::new(),
        category: String::new(),
        sport: Sport::Futsal,
        source_url: None,
        image_url: image_url.to_owned(),
        is_featured: false,
    }
}

const HOME_PAGE: &str = r#"
<html><body>
  <div class="hero-slider">
    <div class="item">
      <a href="/fullcontent/101/title"><img src="/uploads/news/101.jpg"></a>
      <div class="caption"><h3>قهرمانی تیم ملی فوتبال ساحلی</h3></div>
    </div>
    <div class="item">
      <a href="/fullcontent/102/"><img src="/uploads/news/102.jpg" alt="Crop"></a>
    </div>
    <div class="item">
      <a href="/fullcontent/101/dup"><img src="/uploads/news/101b.jpg"></a>
      <h3>تکراری</h3>
    </div>
  </div>
  <ul class="latest">
    <li>
      <a href="/fullcontent/201/"><img src="/uploads/news/201.jpg"></a>
      <a href="/fullcontent/201/">برنامه هفته دهم لیگ برتر فوتسال</a>
      <span class="date">۱۴۰۳/۰۷/۱۰</span>
      <p class="summary">خلاصه خبر</p>
    </li>
    <li><a href="/FullContent/202/" title="عنوان از ویژگی"> </a></li>
    <li><a href="/fullcontent/201/">برنامه هفته دهم (تکرار)</a></li>
  </ul>
  <div class="sidebar-ads"><a href="/fullcontent/999/">تبلیغ</a></div>
</body></html>
"#;

#[test]
fn parses_hero_items_deduplicated_by_id() {
    let parsed = parse_home(HOME_PAGE, &base());
    let ids: Vec<&str> = parsed.hero.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["101", "102"]);
    let first = &parsed.hero[0];
    assert_eq!(first.title, "قهرمانی تیم ملی فوتبال ساحلی");
    assert_eq!(first.sport, Sport::Beach);
    assert_eq!(first.image_url, "https://www.acs.ir/uploads/news/101.jpg");
    assert!(first.is_featured);
    assert_eq!(parsed.hero[1].title, "Crop");
}

#[test]
fn untitled_links_do_not_claim_their_id() {
    let parsed = parse_home(HOME_PAGE, &base());
    let ids: Vec<&str> = parsed.latest.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["201", "202"]);

    let news = &parsed.latest[0];
    assert_eq!(news.title, "برنامه هفته دهم لیگ برتر فوتسال");
    assert_eq!(news.image_url, "https://www.acs.ir/uploads/news/201.jpg");
    assert_eq!(news.published_at, "۱۴۰۳/۰۷/۱۰");
    assert_eq!(news.excerpt, "خلاصه خبر");
    assert_eq!(
        news.source_url.as_deref(),
        Some("https://www.acs.ir/fullcontent/201/")
    );
    assert_eq!(news.slug, "news-201-برنامه-هفته-دهم-لیگ-برتر-فوتسال");
    assert!(!news.is_featured);

    assert_eq!(parsed.latest[1].title, "عنوان از ویژگی");
}

#[test]
fn links_inside_ad_containers_are_ignored() {
    let parsed = parse_home(HOME_PAGE, &base());
    assert!(parsed.latest.iter().all(|a| a.id != "999"));
}

#[test]
fn page_without_news_parses_empty() {
    let parsed = parse_home("<html><body><p>maintenance</p></body></html>", &base());
    assert!(parsed.is_empty());
}

#[test]
fn only_valid_slides_survive_the_gate() {
    let candidates = vec![
        article("1", "خبر بدون تصویر", ""),
        article("2", "Crop", "https://www.acs.ir/uploads/news/2.jpg"),
        article("3", "خبر کامل", "https://www.acs.ir/uploads/news/3.jpg"),
    ];
    let slides = collect_valid_slides(candidates);
    assert_eq!(slides.len(), 1);
    assert_eq!(slides[0].id, "3");
}

#[test]
fn slides_reject_logos_and_filename_titles() {
    let candidates = vec![
        article("1", "لوگو", "https://www.acs.ir/uploads/site-logo.png"),
        article("2", "IMG_2041.JPG", "https://www.acs.ir/uploads/news/2.jpg"),
        article("3", "خبر", "/uploads/news/3.jpg"),
    ];
    assert!(collect_valid_slides(candidates).is_empty());
}

#[test]
fn slides_are_capped() {
    let candidates: Vec<Article> = (0..9)
        .map(|i| {
            let image = format!("https://www.acs.ir/uploads/news/{i}.jpg");
            article(&i.to_string(), "خبر", &image)
        })
        .collect();
    assert_eq!(collect_valid_slides(candidates).len(), HERO_SLIDE_LIMIT);
}

#[test]
fn latest_news_is_deduplicated_and_bounded() {
    let primary: Vec<Article> = (0..20).map(|i| article(&i.to_string(), "زنده", "")).collect();
    let padding: Vec<Article> = (10..30).map(|i| article(&i.to_string(), "محلی", "")).collect();
    assert_eq!(primary.len() + padding.len(), 40);
    let unique_count = 30;

    let latest = bound_latest_news(primary, padding, &HashSet::new());
    assert_eq!(latest.len(), LATEST_NEWS_MAX.min(unique_count));
    let unique: HashSet<&str> = latest.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(unique.len(), latest.len());
    assert_eq!(latest[10].title, "زنده", "live copy of a shared id wins");
}

#[test]
fn latest_news_below_max_keeps_every_unique_article() {
    let primary: Vec<Article> = (0..25).map(|i| article(&i.to_string(), "زنده", "")).collect();
    let padding: Vec<Article> = (20..40).map(|i| article(&i.to_string(), "محلی", "")).collect();
    let unique_count = 40;
    let latest = bound_latest_news(primary, padding, &HashSet::new());
    assert_eq!(latest.len(), LATEST_NEWS_MAX.min(unique_count));

    let small = bound_latest_news(
        vec![article("1", "a", ""), article("1", "b", "")],
        vec![article("2", "c", "")],
        &HashSet::new(),
    );
    assert_eq!(small.len(), 2);
}

#[test]
fn hero_ids_are_kept_out_of_latest() {
    let parsed = HomeParse {
        hero: vec![article("1", "خبر ویژه", "https://www.acs.ir/uploads/news/1.jpg")],
        latest: vec![article("1", "خبر ویژه", ""), article("2", "خبر", "")],
    };
    let (hero, latest) = assemble_home(parsed, vec![article("1", "محلی", "")]);
    assert_eq!(hero.len(), 1);
    let ids: Vec<&str> = latest.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["2"]);
}

#[test]
fn local_home_promotes_featured_articles() {
    let mut featured = article("1", "ویژه", "https://www.acs.ir/uploads/news/1.jpg");
    featured.is_featured = true;
    let mut broken = article("2", "ویژه بدون تصویر", "");
    broken.is_featured = true;
    let plain = article("3", "عادی", "https://www.acs.ir/uploads/news/3.jpg");

    let (hero, latest) = home_from_local(vec![featured, broken, plain]);
    assert_eq!(hero.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(), ["1"]);
    assert_eq!(latest.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(), ["2", "3"]);
}
