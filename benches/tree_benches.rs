use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use radix_mux::Tree;

const ROUTES: &[&str] = &[
    "/",
    "/users",
    "/users/:id",
    "/users/:id/posts",
    "/users/:id/posts/:post",
    "/users/:id/followers",
    "/user/list",
    "/groups",
    "/groups/:group/members/:member",
    "/api/v1/status",
    "/api/v1/health",
    "/api/v2/status",
    "/search/:query",
    "/static/*path",
];

const PATHS: &[&str] = &[
    "/",
    "/users",
    "/users/42",
    "/users/42/posts",
    "/users/42/posts/7",
    "/users/42/followers",
    "/user/list",
    "/groups/admins/members/alice",
    "/api/v1/status",
    "/api/v2/status",
    "/search/hello%20world",
    "/static/css/site.css",
    "/missing/route",
];

fn build_tree() -> Tree<usize> {
    let mut tree = Tree::new();
    for (i, route) in ROUTES.iter().enumerate() {
        tree.insert(route, "GET", i).unwrap();
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("insert route table", |b| b.iter(|| black_box(build_tree())));
}

fn bench_lookup(c: &mut Criterion) {
    let tree = build_tree();
    let mut rng = StdRng::seed_from_u64(42);
    let mut paths: Vec<&str> = (0..1000)
        .map(|_| *PATHS.choose(&mut rng).unwrap())
        .collect();
    paths.shuffle(&mut rng);

    c.bench_function("lookup mixed paths", |b| {
        b.iter(|| {
            for path in &paths {
                black_box(tree.lookup(path, "GET"));
            }
        })
    });

    c.bench_function("lookup deep wildcard", |b| {
        b.iter(|| black_box(tree.lookup(black_box("/groups/admins/members/alice"), "GET")))
    });
}

criterion_group!(benches, bench_insert, bench_lookup);
criterion_main!(benches);
