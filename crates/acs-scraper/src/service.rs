//! The ACS content service: one handle owning the client, caches and
//! fallback data that every extractor shares.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use acs_core::{
    AppConfig, ArticleDetail, FallbackSource, HomeAcsPayload, MatchesPayload, NewsDetail,
    PayloadSource, Sport, StandingsPayload, StaticFallback,
};
use chrono::Utc;
use futures::future::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::{AcsClient, ClientOptions};
use crate::detail::{news_path, parse_detail_page, placeholder_page, DetailPage};
use crate::disk_cache::DiskCache;
use crate::error::AcsError;
use crate::fallback::{local_articles, local_matches, local_standings};
use crate::home::{assemble_home, home_from_local, parse_home, HOME_CACHE_KEY, HOME_PATH};
use crate::matches::{self, parse_matches, MATCHES_PATH};
use crate::sanitize::Sanitizer;
use crate::slot::{CacheSlot, Tier};
use crate::standings::{self, parse_standings, STANDINGS_PATH};
use crate::text::extract_id_from_slug;
use crate::warn_once::WarnOnce;

const NEWS_DETAIL_SCOPE: &str = "news-detail";
const ARTICLE_DETAIL_SCOPE: &str = "article-detail";

/// Payloads that carry a [`PayloadSource`] tag.
pub trait Provenance {
    #[must_use]
    fn with_source(self, source: PayloadSource) -> Self;
}

impl Provenance for HomeAcsPayload {
    fn with_source(self, source: PayloadSource) -> Self {
        Self { source, ..self }
    }
}

impl Provenance for StandingsPayload {
    fn with_source(self, source: PayloadSource) -> Self {
        Self { source, ..self }
    }
}

impl Provenance for MatchesPayload {
    fn with_source(self, source: PayloadSource) -> Self {
        Self { source, ..self }
    }
}

impl<T: Provenance> Tier<T> {
    /// Unwraps the payload with its `source` set from the tier it came from.
    pub fn into_tagged(self) -> T {
        match self {
            Tier::Live(p) => p.with_source(PayloadSource::Live),
            Tier::Cache(p) => p.with_source(PayloadSource::Cache),
            Tier::Fallback(p) => p.with_source(PayloadSource::Fallback),
        }
    }
}

/// Everything an [`AcsService`] is built from. Tests assemble these by hand
/// to point the service at a mock upstream and a throwaway cache directory.
pub struct ServiceParts {
    pub client: AcsClient,
    pub disk_cache: DiskCache,
    pub fallback: Arc<dyn FallbackSource>,
    pub sanitizer: Sanitizer,
    pub cache_ttl: Duration,
}

struct SportSlots<T: Clone> {
    futsal: CacheSlot<T>,
    beach: CacheSlot<T>,
}

impl<T> SportSlots<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn new(ttl: Duration) -> Self {
        Self {
            futsal: CacheSlot::new(ttl),
            beach: CacheSlot::new(ttl),
        }
    }

    fn get(&self, sport: Sport) -> &CacheSlot<T> {
        match sport {
            Sport::Futsal => &self.futsal,
            Sport::Beach => &self.beach,
        }
    }
}

struct Inner {
    client: AcsClient,
    disk_cache: DiskCache,
    fallback: Arc<dyn FallbackSource>,
    sanitizer: Sanitizer,
    warn: WarnOnce,
    home: CacheSlot<HomeAcsPayload>,
    standings: SportSlots<StandingsPayload>,
    matches: SportSlots<MatchesPayload>,
}

/// Cheaply clonable handle to the extractors.
///
/// Home, standings and matches walk live → disk cache → local data and never
/// fail. Article details fail loudly instead, except when network access is
/// switched off, where they return a placeholder.
#[derive(Clone)]
pub struct AcsService {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for AcsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcsService")
            .field("base_url", &self.inner.client.base_url().as_str())
            .field("cache_root", &self.inner.disk_cache.root())
            .finish_non_exhaustive()
    }
}

impl AcsService {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, AcsError> {
        let client = AcsClient::new(ClientOptions::from_config(config))?;
        let sanitizer = Sanitizer::new(client.base_url().clone(), config.self_hosts.clone());
        Ok(Self::from_parts(ServiceParts {
            client,
            disk_cache: DiskCache::new(&config.cache_dir, config.is_development()),
            fallback: Arc::new(StaticFallback::bundled()),
            sanitizer,
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
        }))
    }

    #[must_use]
    pub fn from_parts(parts: ServiceParts) -> Self {
        let ttl = parts.cache_ttl;
        Self {
            inner: Arc::new(Inner {
                client: parts.client,
                disk_cache: parts.disk_cache,
                fallback: parts.fallback,
                sanitizer: parts.sanitizer,
                warn: WarnOnce::new(),
                home: CacheSlot::new(ttl),
                standings: SportSlots::new(ttl),
                matches: SportSlots::new(ttl),
            }),
        }
    }

    #[must_use]
    pub fn sanitizer(&self) -> &Sanitizer {
        &self.inner.sanitizer
    }

    // ---------------------------------------------------------------------
    // Home / standings / matches
    // ---------------------------------------------------------------------

    pub async fn get_home_content(&self) -> HomeAcsPayload {
        let this = self.clone();
        self.inner
            .home
            .get_or_load(move || async move { this.load_home().await }.boxed())
            .await
            .into_tagged()
    }

    pub async fn get_standings_content(&self, sport: Sport) -> StandingsPayload {
        let this = self.clone();
        self.inner
            .standings
            .get(sport)
            .get_or_load(move || async move { this.load_standings(sport).await }.boxed())
            .await
            .into_tagged()
    }

    pub async fn get_matches_content(&self, sport: Sport) -> MatchesPayload {
        let this = self.clone();
        self.inner
            .matches
            .get(sport)
            .get_or_load(move || async move { this.load_matches(sport).await }.boxed())
            .await
            .into_tagged()
    }

    async fn load_home(&self) -> Tier<HomeAcsPayload> {
        self.run_tiers("home", HOME_CACHE_KEY, self.live_home(), || {
            let local = local_articles(self.fallback(), self.inner.client.base_url());
            let (hero_slides, latest_news) = home_from_local(local);
            HomeAcsPayload {
                hero_slides,
                latest_news,
                live_events: Vec::new(),
                fetched_at: Utc::now(),
                source: PayloadSource::Fallback,
            }
        })
        .await
    }

    async fn live_home(&self) -> Result<HomeAcsPayload, AcsError> {
        let html = self.inner.client.fetch_html(HOME_PATH).await?;
        let base = self.inner.client.base_url();
        let parsed = parse_home(&html, base);
        if parsed.is_empty() {
            return Err(AcsError::EmptyParse {
                page: HOME_PATH.to_owned(),
            });
        }
        let (hero_slides, latest_news) =
            assemble_home(parsed, local_articles(self.fallback(), base));
        Ok(HomeAcsPayload {
            hero_slides,
            latest_news,
            live_events: Vec::new(),
            fetched_at: Utc::now(),
            source: PayloadSource::Live,
        })
    }

    async fn load_standings(&self, sport: Sport) -> Tier<StandingsPayload> {
        let key = standings::cache_key(sport);
        self.run_tiers("standings", &key, self.live_standings(sport), || StandingsPayload {
            sport,
            rows: local_standings(self.fallback(), sport, self.inner.client.base_url()),
            fetched_at: Utc::now(),
            source: PayloadSource::Fallback,
        })
        .await
    }

    async fn live_standings(&self, sport: Sport) -> Result<StandingsPayload, AcsError> {
        let html = self.inner.client.fetch_html(STANDINGS_PATH).await?;
        let rows = parse_standings(&html, self.inner.client.base_url(), sport);
        if rows.is_empty() {
            return Err(AcsError::EmptyParse {
                page: format!("{STANDINGS_PATH} ({sport} standings)"),
            });
        }
        Ok(StandingsPayload {
            sport,
            rows,
            fetched_at: Utc::now(),
            source: PayloadSource::Live,
        })
    }

    async fn load_matches(&self, sport: Sport) -> Tier<MatchesPayload> {
        let key = matches::cache_key(sport);
        self.run_tiers("matches", &key, self.live_matches(sport), || MatchesPayload {
            sport,
            matches: local_matches(self.fallback(), sport, self.inner.client.base_url()),
            fetched_at: Utc::now(),
            source: PayloadSource::Fallback,
        })
        .await
    }

    async fn live_matches(&self, sport: Sport) -> Result<MatchesPayload, AcsError> {
        let html = self.inner.client.fetch_html(MATCHES_PATH).await?;
        let matches = parse_matches(&html, self.inner.client.base_url(), sport);
        if matches.is_empty() {
            return Err(AcsError::EmptyParse {
                page: format!("{MATCHES_PATH} ({sport} matches)"),
            });
        }
        Ok(MatchesPayload {
            sport,
            matches,
            fetched_at: Utc::now(),
            source: PayloadSource::Live,
        })
    }

    /// Live result if `live` succeeds (persisted to disk), else the disk copy
    /// under `key`, else whatever `fallback` builds.
    async fn run_tiers<T, Fut, F>(&self, scope: &str, key: &str, live: Fut, fallback: F) -> Tier<T>
    where
        T: Serialize + DeserializeOwned,
        Fut: Future<Output = Result<T, AcsError>>,
        F: FnOnce() -> T,
    {
        let err = match live.await {
            Ok(payload) => {
                self.inner.disk_cache.write(key, &payload).await;
                return Tier::Live(payload);
            }
            Err(err) => err,
        };

        if err.is_skipped() {
            tracing::debug!(scope, key, "network access skipped, serving stored data");
        } else {
            self.inner
                .warn
                .warn(scope, &format!("live fetch for {key} failed: {err}"));
        }

        match self.inner.disk_cache.read::<T>(key).await {
            Some(payload) => Tier::Cache(payload),
            None => {
                tracing::debug!(scope, key, "no disk cache entry, using local data");
                Tier::Fallback(fallback())
            }
        }
    }

    fn fallback(&self) -> &dyn FallbackSource {
        self.inner.fallback.as_ref()
    }

    // ---------------------------------------------------------------------
    // Article pages
    // ---------------------------------------------------------------------

    /// Sanitized article page for `slug`.
    ///
    /// # Errors
    ///
    /// - [`AcsError::InvalidSlug`] if `slug` does not embed an article id.
    /// - [`AcsError::EmptyParse`] if the page has neither a title nor a body.
    /// - Any fetch error other than [`AcsError::FetchSkipped`], which yields
    ///   a placeholder instead.
    pub async fn get_news_detail(&self, slug: &str) -> Result<NewsDetail, AcsError> {
        let loaded = self.load_detail(NEWS_DETAIL_SCOPE, slug).await?;
        Ok(loaded.page.into_news(slug, &loaded.source_url))
    }

    /// Plain-text view of the same page as [`Self::get_news_detail`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_news_detail`].
    pub async fn get_article_detail(&self, slug: &str) -> Result<ArticleDetail, AcsError> {
        let loaded = self.load_detail(ARTICLE_DETAIL_SCOPE, slug).await?;
        Ok(loaded
            .page
            .into_article(&loaded.id, slug, &loaded.source_url))
    }

    async fn load_detail(&self, scope: &str, slug: &str) -> Result<LoadedDetail, AcsError> {
        let Some(id) = extract_id_from_slug(slug) else {
            let err = AcsError::InvalidSlug {
                slug: slug.to_owned(),
            };
            self.inner.warn.warn(scope, &err.to_string());
            return Err(err);
        };
        let path = news_path(&id);
        let source_url = self.inner.client.resolve(&path)?.to_string();

        let html = match self.inner.client.fetch_html(&path).await {
            Ok(html) => html,
            Err(err) if err.is_skipped() => {
                tracing::debug!(scope, slug, "network access skipped, returning placeholder");
                return Ok(LoadedDetail {
                    id,
                    source_url,
                    page: placeholder_page(),
                });
            }
            Err(err) => {
                self.inner
                    .warn
                    .error(scope, &format!("failed to load {path}: {err}"));
                return Err(err);
            }
        };

        let page = parse_detail_page(&html, self.inner.client.base_url(), &self.inner.sanitizer);
        if page.is_blank() {
            let err = AcsError::EmptyParse { page: path };
            self.inner.warn.error(scope, &err.to_string());
            return Err(err);
        }
        Ok(LoadedDetail {
            id,
            source_url,
            page,
        })
    }

    // ---------------------------------------------------------------------
    // Cache priming
    // ---------------------------------------------------------------------

    /// Loads home plus both sports' standings and matches concurrently.
    pub async fn warm_all(&self) -> WarmReport {
        let (home, futsal_standings, beach_standings, futsal_matches, beach_matches) = futures::join!(
            self.get_home_content(),
            self.get_standings_content(Sport::Futsal),
            self.get_standings_content(Sport::Beach),
            self.get_matches_content(Sport::Futsal),
            self.get_matches_content(Sport::Beach),
        );
        WarmReport {
            entries: vec![
                WarmEntry::new(HOME_CACHE_KEY.to_owned(), home.source, home.latest_news.len()),
                WarmEntry::new(
                    standings::cache_key(Sport::Futsal),
                    futsal_standings.source,
                    futsal_standings.rows.len(),
                ),
                WarmEntry::new(
                    standings::cache_key(Sport::Beach),
                    beach_standings.source,
                    beach_standings.rows.len(),
                ),
                WarmEntry::new(
                    matches::cache_key(Sport::Futsal),
                    futsal_matches.source,
                    futsal_matches.matches.len(),
                ),
                WarmEntry::new(
                    matches::cache_key(Sport::Beach),
                    beach_matches.source,
                    beach_matches.matches.len(),
                ),
            ],
        }
    }
}

struct LoadedDetail {
    id: String,
    source_url: String,
    page: DetailPage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarmEntry {
    pub key: String,
    pub source: PayloadSource,
    pub records: usize,
}

impl WarmEntry {
    fn new(key: String, source: PayloadSource, records: usize) -> Self {
        Self {
            key,
            source,
            records,
        }
    }
}

/// Outcome of [`AcsService::warm_all`], one entry per cache key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarmReport {
    pub entries: Vec<WarmEntry>,
}

impl WarmReport {
    #[must_use]
    pub fn all_live(&self) -> bool {
        self.entries.iter().all(|e| e.source == PayloadSource::Live)
    }
}
