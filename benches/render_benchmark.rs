use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;
use std::hint::black_box;

use view_delegates::model::Locals;
use view_delegates::{CacheConfig, DelegateRegistry, Params, SchemaBuilder, ViewData};

fn registry(cache: CacheConfig) -> DelegateRegistry {
    let mut registry = DelegateRegistry::new();
    registry
        .register_builder(
            SchemaBuilder::new("Shop::ProductDelegate")
                .model("product", ["sku", "name", "price"])
                .model_array("reviews", ["rating"])
                .property("currency")
                .view_local("label", |d| {
                    Ok(json!(format!("{} ({})", d.type_name(), d.property_str("currency").unwrap_or("EUR"))))
                })
                .cache_with(cache),
        )
        .unwrap();
    registry
}

fn input() -> ViewData {
    ViewData::from_json(&json!({
        "currency": "EUR",
        "product": {"sku": "P-1", "name": "Lamp", "price": 39, "cost": 12},
        "reviews": [{"rating": 5, "text": "bright"}, {"rating": 4, "text": "ok"}]
    }))
}

fn renderer(template: &str, locals: &Locals) -> anyhow::Result<String> {
    Ok(format!("{template}:{}", locals.to_json()))
}

fn benchmark_construct(c: &mut Criterion) {
    let registry = registry(CacheConfig::disabled());
    let data = input();

    c.bench_function("construct_product", |b| {
        b.iter(|| black_box(registry.construct("Shop::ProductDelegate", black_box(&data))))
    });
}

fn benchmark_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_product");
    let params = Params::new();

    let uncached = registry(CacheConfig::disabled());
    let delegate = uncached.construct("Shop::ProductDelegate", &input()).unwrap();
    group.bench_function("uncached", |b| {
        b.iter(|| black_box(delegate.render(&renderer, black_box("show"), &params)))
    });

    let cached = registry(CacheConfig::default());
    let delegate = cached.construct("Shop::ProductDelegate", &input()).unwrap();
    group.bench_function("cache_hit", |b| {
        b.iter(|| black_box(delegate.render(&renderer, black_box("show"), &params)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_construct, benchmark_render);
criterion_main!(benches);
