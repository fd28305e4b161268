//! Integration tests for per-type render caching

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;
use std::thread;

use view_delegates::testing::RecordingRenderer;
use view_delegates::{
    CacheConfig, Delegate, DelegateId, DelegateRegistry, Params, RenderCacheKey, SchemaBuilder,
    ViewData,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn card_registry(cache: CacheConfig) -> DelegateRegistry {
    init_logging();
    let mut registry = DelegateRegistry::new();
    registry
        .register_builder(
            SchemaBuilder::new("CardDelegate")
                .property("title")
                .cache_with(cache),
        )
        .unwrap();
    registry
}

fn card(registry: &DelegateRegistry, title: &str) -> Delegate {
    registry
        .construct("CardDelegate", &ViewData::new().value("title", title))
        .unwrap()
}

#[test]
fn test_second_render_is_served_from_cache() {
    let registry = card_registry(CacheConfig::default());
    let renderer = RecordingRenderer::new();
    let delegate = card(&registry, "hello");

    let first = delegate.render(&renderer, "show", &Params::new()).unwrap();
    let second = delegate.render(&renderer, "show", &Params::new()).unwrap();

    assert_eq!(first, second);
    assert_eq!(renderer.call_count(), 1);
    let stats = registry.get("CardDelegate").unwrap().cache().unwrap().stats().snapshot();
    assert_eq!((stats.hits, stats.misses, stats.inserts), (1, 1, 1));
}

#[test]
fn test_continuation_runs_on_cache_hit() {
    let registry = card_registry(CacheConfig::default());
    let renderer = RecordingRenderer::new();
    let delegate = card(&registry, "hello");

    let fresh = delegate
        .render_with(&renderer, "show", &Params::new(), |text| text.len())
        .unwrap();
    let cached = delegate
        .render_with(&renderer, "show", &Params::new(), |text| text.len())
        .unwrap();

    assert_eq!(fresh, cached);
    assert_eq!(renderer.call_count(), 1);
}

#[test]
fn test_distinct_instances_never_share_entries() {
    let registry = card_registry(CacheConfig::default());
    let renderer = RecordingRenderer::new();
    let a = card(&registry, "same");
    let b = card(&registry, "same");

    a.render(&renderer, "show", &Params::new()).unwrap();
    b.render(&renderer, "show", &Params::new()).unwrap();
    a.clone().render(&renderer, "show", &Params::new()).unwrap();

    assert_eq!(renderer.call_count(), 2);
}

#[rstest]
#[case("show", json!({"x": 1}), "show", json!({"x": 1}), 1)]
#[case("show", json!({"x": 1, "y": 2}), "show", json!({"y": 2, "x": 1}), 1)]
#[case("show", json!({"x": 1}), "show", json!({"x": 2}), 2)]
#[case("show", json!({}), "list", json!({}), 2)]
fn test_params_and_view_select_the_entry(
    #[case] first_view: &str,
    #[case] first_params: serde_json::Value,
    #[case] second_view: &str,
    #[case] second_params: serde_json::Value,
    #[case] expected_renders: usize,
) {
    let to_params = |value: serde_json::Value| -> Params {
        value
            .as_object()
            .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    };

    let registry = card_registry(CacheConfig::default());
    let renderer = RecordingRenderer::new();
    let delegate = card(&registry, "t");

    delegate
        .render(&renderer, first_view, &to_params(first_params))
        .unwrap();
    delegate
        .render(&renderer, second_view, &to_params(second_params))
        .unwrap();

    assert_eq!(renderer.call_count(), expected_renders);
}

#[test]
fn test_fifo_cache_stays_bounded() {
    let registry = card_registry(CacheConfig::new(true, 3));
    let renderer = RecordingRenderer::new();
    let cards: Vec<Delegate> = (0..5).map(|n| card(&registry, &format!("c{n}"))).collect();

    for delegate in &cards {
        delegate.render(&renderer, "show", &Params::new()).unwrap();
    }

    let cache = registry.get("CardDelegate").unwrap();
    let cache = cache.cache().unwrap();
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.stats().snapshot().evictions, 2);
    let cached: Vec<DelegateId> = cache.keys().iter().map(RenderCacheKey::instance).collect();
    let newest: Vec<DelegateId> = cards[2..].iter().map(Delegate::id).collect();
    assert_eq!(cached, newest);

    // the two oldest were evicted and render again
    cards[0].render(&renderer, "show", &Params::new()).unwrap();
    assert_eq!(renderer.call_count(), 6);
}

#[test]
fn test_uncached_type_always_renders() {
    let registry = card_registry(CacheConfig::disabled());
    let renderer = RecordingRenderer::new();
    let delegate = card(&registry, "x");

    for _ in 0..3 {
        delegate.render(&renderer, "show", &Params::new()).unwrap();
    }

    assert_eq!(renderer.call_count(), 3);
    assert!(registry.get("CardDelegate").unwrap().cache().is_none());
}

#[test]
fn test_failed_render_is_not_cached() {
    let registry = card_registry(CacheConfig::default());
    let failing = RecordingRenderer::failing("boom");
    let delegate = card(&registry, "x");

    assert!(delegate.render(&failing, "show", &Params::new()).is_err());
    assert!(registry.get("CardDelegate").unwrap().cache().unwrap().is_empty());

    let renderer = RecordingRenderer::new();
    delegate.render(&renderer, "show", &Params::new()).unwrap();
    assert_eq!(renderer.call_count(), 1);
}

#[test]
fn test_subtype_owns_a_separate_cache() {
    let mut registry = card_registry(CacheConfig::default());
    let wide = registry
        .define_extending("WideCardDelegate", "CardDelegate")
        .unwrap();
    registry.register_builder(wide).unwrap();

    let renderer = RecordingRenderer::new();
    let wide = registry
        .construct("WideCardDelegate", &ViewData::new().value("title", "w"))
        .unwrap();
    wide.render(&renderer, "show", &Params::new()).unwrap();

    assert_eq!(renderer.last_call().unwrap().template, "wide_card/show");
    assert_eq!(registry.get("WideCardDelegate").unwrap().cache().unwrap().len(), 1);
    assert!(registry.get("CardDelegate").unwrap().cache().unwrap().is_empty());
}

#[test]
fn test_concurrent_renders_share_one_cache() {
    let registry = Arc::new(card_registry(CacheConfig::new(true, 8)));
    let renderer = Arc::new(RecordingRenderer::new());
    let delegate = card(&registry, "shared");

    let outputs: Vec<String> = (0..8)
        .map(|_| {
            let renderer = Arc::clone(&renderer);
            let delegate = delegate.clone();
            thread::spawn(move || {
                (0..50)
                    .map(|_| {
                        delegate
                            .render(renderer.as_ref(), "show", &Params::new())
                            .unwrap()
                    })
                    .last()
                    .unwrap()
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    assert!(outputs.windows(2).all(|pair| pair[0] == pair[1]));
    let kind = registry.get("CardDelegate").unwrap();
    let cache = kind.cache().unwrap();
    assert_eq!(cache.len(), 1);
    assert!(renderer.call_count() <= 8);
    assert_eq!(cache.stats().snapshot().lookups(), 400);
}
