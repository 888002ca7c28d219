//! End-to-end resolver behavior.

use std::sync::Arc;
use std::time::Duration;

use provider_imagery::testing::{FailingCache, MockPreviewSource};
use provider_imagery::{
    DurableId, IconAssigner, ImageCache, ImageResolver, ImageSource, ImageryTables, MemoryCache,
    PreviewImage, ProviderDescriptor, ResolutionResult, ResolverConfig,
};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const SOCCER: &str = "https://cdn.kidsactivities.example/placeholders/soccer";

type TestResolver = ImageResolver<MockPreviewSource, Arc<MemoryCache>>;

/// Helper to build a resolver over a mock source and a shared memory cache.
fn setup(source: &MockPreviewSource) -> (TestResolver, Arc<MemoryCache>) {
    let cache = Arc::new(MemoryCache::new());
    let resolver = ImageResolver::new(
        source.clone(),
        Arc::clone(&cache),
        ImageryTables::default(),
    );
    (resolver, cache)
}

#[tokio::test]
async fn test_dead_domain_falls_back_to_soccer_placeholder() {
    let cache = Arc::new(MemoryCache::new());
    let config = ResolverConfig::default().with_fetch_timeout(Duration::from_secs(2));
    let resolver = ImageResolver::from_config(config, Arc::clone(&cache)).unwrap();

    let d = ProviderDescriptor::ephemeral("places/lakeside", "Lakeside Soccer Academy")
        .with_specialties(["soccer"])
        .with_website("https://dead-domain.invalid");

    let result = resolver.resolve(&d).await;

    assert_eq!(result.source, ImageSource::Placeholder);
    assert!(result.image_url.unwrap().starts_with(SOCCER));
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_og_site_resolves_to_website_og() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><meta property='og:image' content='https://x/og.png'></head></html>",
        ))
        .mount(&server)
        .await;

    let resolver =
        ImageResolver::from_config(ResolverConfig::default(), MemoryCache::new()).unwrap();
    let d = ProviderDescriptor::ephemeral("places/rainbow", "Rainbow Art Studio")
        .with_specialties(["art", "craft"])
        .with_website(server.uri());

    let result = resolver.resolve(&d).await;

    assert_eq!(
        result,
        ResolutionResult {
            image_url: Some("https://x/og.png".to_string()),
            source: ImageSource::WebsiteOg,
        }
    );
}

#[test]
fn test_icon_assignment_is_stable() {
    let assigner = IconAssigner::default();
    let first = assigner.assign("abc-123", "");
    let second = assigner.assign("abc-123", "");
    assert_eq!(first, second);

    // A fresh assigner stands in for a process restart.
    assert_eq!(IconAssigner::default().assign("abc-123", ""), first);
}

#[tokio::test]
async fn test_no_website_no_image_gives_placeholder() {
    let source = MockPreviewSource::new();
    let (resolver, _cache) = setup(&source);

    for d in [
        ProviderDescriptor::ephemeral("e-1", "Tiny Tots Swim School"),
        ProviderDescriptor::ephemeral("e-2", ""),
        ProviderDescriptor::ephemeral("", "").with_description("   "),
    ] {
        let result = resolver.resolve(&d).await;
        assert_eq!(result.source, ImageSource::Placeholder);
        assert!(result.image_url.is_some());
    }
    assert_eq!(source.call_count(), 0);
}

#[tokio::test]
async fn test_resolve_is_idempotent_for_ephemeral() {
    let source = MockPreviewSource::new().with_preview(
        "https://studio.example",
        PreviewImage::TwitterCard("https://studio.example/tw.png".to_string()),
    );
    let (resolver, _cache) = setup(&source);

    let d = ProviderDescriptor::ephemeral("places/studio", "Studio")
        .with_website("https://studio.example");

    let first = resolver.resolve(&d).await;
    let second = resolver.resolve(&d).await;

    assert_eq!(first, second);
    assert_eq!(first.source, ImageSource::WebsiteTwitter);
}

#[tokio::test]
async fn test_cached_identity_skips_network() {
    let source = MockPreviewSource::new().with_preview(
        "https://rainbow.example",
        PreviewImage::OpenGraph("https://x/og.png".to_string()),
    );
    let (resolver, cache) = setup(&source);

    let d = ProviderDescriptor::durable("3f9a6c1e", "Rainbow Art Studio")
        .with_website("https://rainbow.example");

    let first = resolver.resolve(&d).await;
    resolver.flush_writes().await;
    assert_eq!(first.source, ImageSource::WebsiteOg);
    assert_eq!(
        cache.peek(&DurableId::new("3f9a6c1e")),
        Some("https://x/og.png".to_string())
    );

    source.reset_calls();
    let second = resolver.resolve(&d).await;

    assert_eq!(source.call_count(), 0);
    assert_eq!(second.image_url, first.image_url);
    assert_eq!(second.source, ImageSource::Existing);
}

#[tokio::test]
async fn test_durable_repeat_keeps_url_and_reports_existing() {
    let source = MockPreviewSource::new();
    let (resolver, _cache) = setup(&source);

    let d = ProviderDescriptor::durable("p-12", "Northside Chess Club");

    let first = resolver.resolve(&d).await;
    resolver.flush_writes().await;
    let second = resolver.resolve(&d).await;
    let third = resolver.resolve(&d).await;

    // The URL is stable; the source says where this call found it.
    assert_eq!(first.source, ImageSource::Placeholder);
    assert_eq!(second.image_url, first.image_url);
    assert_eq!(second.source, ImageSource::Existing);
    assert_eq!(third, second);
}

#[tokio::test]
async fn test_placeholder_is_persisted_for_durable() {
    let source = MockPreviewSource::new();
    let (resolver, cache) = setup(&source);

    let d = ProviderDescriptor::durable("p-soccer", "Lakeside Soccer Academy")
        .with_specialties(["soccer"]);

    let result = resolver.resolve(&d).await;
    resolver.flush_writes().await;

    assert_eq!(cache.peek(&DurableId::new("p-soccer")), result.image_url);
}

#[tokio::test]
async fn test_ephemeral_results_are_never_cached() {
    let source = MockPreviewSource::new().with_preview(
        "https://rainbow.example",
        PreviewImage::OpenGraph("https://x/og.png".to_string()),
    );
    let (resolver, cache) = setup(&source);

    let d = ProviderDescriptor::ephemeral("places/rainbow", "Rainbow Art Studio")
        .with_website("https://rainbow.example");

    resolver.resolve(&d).await;
    resolver.resolve(&d).await;
    resolver.flush_writes().await;

    assert!(cache.is_empty());
    assert_eq!(source.call_count(), 2);
}

#[tokio::test]
async fn test_website_without_preview_falls_through_to_placeholder() {
    let source = MockPreviewSource::new();
    let (resolver, _cache) = setup(&source);

    let d = ProviderDescriptor::ephemeral("places/x", "Northside Chess Club")
        .with_website("https://chess.example");

    let result = resolver.resolve(&d).await;

    assert_eq!(source.calls(), vec!["https://chess.example".to_string()]);
    assert_eq!(result.source, ImageSource::Placeholder);
    assert!(result.image_url.unwrap().contains("/chess-"));
}

#[tokio::test]
async fn test_existing_image_wins_over_cache() {
    let source = MockPreviewSource::new();
    let (resolver, cache) = setup(&source);
    cache
        .put(&DurableId::new("p-1"), "https://cdn/cached.jpg")
        .await
        .unwrap();

    let d = ProviderDescriptor::durable("p-1", "Anything")
        .with_existing_image("https://cdn/curated.jpg");

    assert_eq!(
        resolver.resolve(&d).await,
        ResolutionResult::existing("https://cdn/curated.jpg")
    );
}

#[tokio::test]
async fn test_refresh_overwrites_cached_entry() {
    let source = MockPreviewSource::new();
    let (resolver, cache) = setup(&source);

    let d = ProviderDescriptor::durable("p-7", "Riverside Dance Company");
    let placeholder = resolver.resolve(&d).await;
    resolver.flush_writes().await;
    assert_eq!(placeholder.source, ImageSource::Placeholder);

    // The provider adds a website later; only an explicit refresh picks it up.
    source.add_preview(
        "https://riverside.example",
        PreviewImage::OpenGraph("https://riverside.example/og.jpg".to_string()),
    );
    let d = d.with_website("https://riverside.example");

    let cached = resolver.resolve(&d).await;
    assert_eq!(cached.image_url, placeholder.image_url);
    assert_eq!(source.call_count(), 0);

    let refreshed = resolver.refresh(&d).await;
    resolver.flush_writes().await;

    assert_eq!(refreshed.source, ImageSource::WebsiteOg);
    assert_eq!(
        cache.peek(&DurableId::new("p-7")),
        Some("https://riverside.example/og.jpg".to_string())
    );
}

#[tokio::test]
async fn test_cache_failures_never_surface() {
    let cache = FailingCache::new();
    let resolver = ImageResolver::new(
        MockPreviewSource::new(),
        cache.clone(),
        ImageryTables::default(),
    );

    let d = ProviderDescriptor::durable("p-9", "Lakeside Soccer Academy")
        .with_specialties(["soccer"]);
    let result = resolver.resolve(&d).await;
    resolver.flush_writes().await;

    assert_eq!(result.source, ImageSource::Placeholder);
    assert!(result.image_url.unwrap().starts_with(SOCCER));
    assert_eq!(cache.get_attempts(), 1);
    assert_eq!(cache.put_attempts(), 1);
}

#[tokio::test]
async fn test_many_cards_resolve_concurrently() {
    let source = MockPreviewSource::new()
        .with_delay(Duration::from_millis(200))
        .with_preview(
            "https://a.example",
            PreviewImage::OpenGraph("https://a.example/og.png".to_string()),
        );
    let (resolver, _cache) = setup(&source);

    let cards: Vec<_> = (0..10)
        .map(|i| {
            ProviderDescriptor::ephemeral(format!("places/{}", i), "Card")
                .with_website("https://a.example")
        })
        .collect();

    let started = std::time::Instant::now();
    let results = resolver.resolve_many(&cards).await;

    // Serialized, ten 200ms lookups would take two seconds.
    assert!(started.elapsed() < Duration::from_millis(1500));
    assert_eq!(results.len(), 10);
    assert!(results.iter().all(|r| r.source == ImageSource::WebsiteOg));
}

#[tokio::test]
async fn test_placeholder_choice_is_stable_per_identity() {
    let source = MockPreviewSource::new();
    let (resolver, _cache) = setup(&source);

    let d = ProviderDescriptor::ephemeral("places/swim-42", "Aqua Kids")
        .with_specialties(["swim"]);
    let first = resolver.placeholder_for(&d);

    for _ in 0..5 {
        assert_eq!(resolver.placeholder_for(&d), first);
    }
}
