use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use trellis_router::Router;

/// A route table shaped like a small service API: literal endpoints,
/// parameterized resources, one pattern segment, one catch-all, and a
/// host-scoped admin surface.
fn build_router() -> Router<usize> {
    let mut router = Router::new();
    let mut id = 0;
    let mut add = |method: &str, path: &str, domain: Option<&str>| {
        id += 1;
        router.add_route(method, path, id, domain);
    };

    add("GET", "/v1/health", None);
    add("GET", "/v1/version", None);
    add("GET", "/v1/users", None);
    add("POST", "/v1/users", None);
    add("GET", "/v1/users/{id}", None);
    add("PUT", "/v1/users/{id}", None);
    add("GET", "/v1/users/{id}/orders", None);
    add("GET", "/v1/users/{id}/orders/{order}", None);
    add("GET", "/v1/orgs/@{org}/repos", None);
    add("GET", "/v1/orgs/{org}/repos", None);
    add("GET", "/assets/{...path}", None);
    add("GET", "/admin/metrics", Some("admin.example.com"));
    router
}

fn bench_lookup(c: &mut Criterion) {
    let router = build_router();

    c.bench_function("lookup/static_fast_path", |b| {
        b.iter(|| router.find_route(black_box("GET"), black_box("/v1/health"), None))
    });

    c.bench_function("lookup/param_walk", |b| {
        b.iter(|| router.find_route(black_box("GET"), black_box("/v1/users/1234/orders/77"), None))
    });

    c.bench_function("lookup/pattern_selection", |b| {
        b.iter(|| router.find_route(black_box("GET"), black_box("/v1/orgs/@acme/repos"), None))
    });

    c.bench_function("lookup/catch_all", |b| {
        b.iter(|| router.find_route(black_box("GET"), black_box("/assets/css/site.css"), None))
    });

    c.bench_function("lookup/hostname_scoped", |b| {
        b.iter(|| {
            router.find_route(
                black_box("GET"),
                black_box("/admin/metrics"),
                Some(black_box("admin.example.com")),
            )
        })
    });

    c.bench_function("lookup/miss", |b| {
        b.iter(|| router.find_route(black_box("GET"), black_box("/v2/none"), None))
    });
}

criterion_group!(benches, bench_lookup);
criterion_main!(benches);
