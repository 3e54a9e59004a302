use criterion::{criterion_group, criterion_main, Criterion};
use enzovu::server::{handler, Request, Response};
use enzovu::Router;
use http::Method;
use std::hint::black_box;

fn zoo_router() -> Router {
    let mut router = Router::new();
    let routes: &[(Method, &str)] = &[
        (Method::GET, "/"),
        (Method::GET, "/zoo/animals"),
        (Method::POST, "/zoo/animals"),
        (Method::GET, "/zoo/animals/{id}"),
        (Method::PUT, "/zoo/animals/{id}"),
        (Method::PATCH, "/zoo/animals/{id}"),
        (Method::DELETE, "/zoo/animals/{id}"),
        (Method::GET, "/zoo/animals/{id}/toys/{toy_id}"),
        (
            Method::GET,
            "/zoo/{category}/animals/{id}/habitats/{habitat_id}/sections/{section_id}",
        ),
        (
            Method::POST,
            "/inventory/{warehouse_id}/feeds/{feed_id}/items/{item_id}/batches/{batch_id}",
        ),
        (Method::GET, "/complex/{a}/{b}/{c}/{d}/{e}/{f}/{g}/{h}/{i}"),
    ];
    for (method, pattern) in routes {
        router
            .add_route(
                method.clone(),
                pattern,
                handler(|res: &mut Response, _req: &Request| {
                    res.text("ok");
                }),
                &[],
            )
            .expect("valid pattern");
    }
    router
}

const TEST_PATHS: [(Method, &str); 5] = [
    (Method::GET, "/zoo/animals/123"),
    (Method::GET, "/zoo/animals/123/toys/456"),
    (Method::GET, "/zoo/cats/animals/123/habitats/88/sections/5"),
    (Method::POST, "/inventory/1/feeds/2/items/3/batches/4"),
    (Method::GET, "/complex/1/2/3/4/5/6/7/8/9"),
];

fn bench_route_match(c: &mut Criterion) {
    let router = zoo_router();
    c.bench_function("route_match", |b| {
        b.iter(|| {
            for (method, path) in TEST_PATHS.iter() {
                let res = router.route(method, path);
                black_box(&res);
            }
        })
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let router = zoo_router();
    c.bench_function("dispatch", |b| {
        b.iter(|| {
            for (method, path) in TEST_PATHS.iter() {
                let req = http::Request::builder()
                    .method(method.clone())
                    .uri(*path)
                    .body(Vec::new())
                    .expect("valid request");
                black_box(router.handle(req));
            }
        })
    });
}

criterion_group!(benches, bench_route_match, bench_dispatch);
criterion_main!(benches);
