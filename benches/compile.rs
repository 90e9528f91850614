//! Compilation and reconstruction throughput.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;
use sleet::prelude::*;

fn registry() -> Registry {
    let mut registry = Registry::with_namespace(Namespace::new().project("bench").dataset("blog"));
    registry
        .define(
            Entity::builder("User")
                .table("users")
                .attribute("name", DataType::String)
                .attribute("age", DataType::Int64)
                .build(),
        )
        .unwrap();
    registry
        .define(
            Entity::builder("Post")
                .table("posts")
                .attribute("user_id", DataType::Int64)
                .attribute("title", DataType::String)
                .build(),
        )
        .unwrap();
    registry
        .associate("User", Association::has_many("Post", "user_id"))
        .unwrap();
    registry
}

fn options() -> FindOptions {
    let filter = WhereOptions::try_from(json!({
        "or": [
            {"age": {"between": [18, 65]}},
            {"name": ["ann", "bob", "cid"]},
            {"and": [{"name": {"like": "d%"}}, {"age": {"gte": 30}}]}
        ]
    }))
    .unwrap();
    FindOptions::new()
        .r#where(filter)
        .include(Include::new("Post").r#where(WhereOptions::new().op("title", Operator::NotLike, "%draft%")))
        .order_by("age", Direction::Desc)
        .limit(50)
}

fn bench_compile(c: &mut Criterion) {
    let registry = registry();
    let options = options();

    c.bench_function("compile_where", |b| {
        let filter = options.filter.clone().unwrap();
        b.iter(|| sleet::compile(black_box(&filter)).unwrap())
    });

    c.bench_function("build_select", |b| {
        b.iter(|| build_select(black_box(&registry), "User", black_box(&options)).unwrap())
    });
}

fn bench_reconstruct(c: &mut Criterion) {
    let registry = registry();
    let select = build_select(&registry, "User", &options()).unwrap();
    let rows: Vec<Row> = (0..100i64)
        .flat_map(|user| {
            (0..10i64).map(move |post| {
                Row::new()
                    .with("users_id", user)
                    .with("users_name", format!("user{user}"))
                    .with("users_age", 20 + user % 40)
                    .with("posts_id", user * 10 + post)
                    .with("posts_user_id", user)
                    .with("posts_title", format!("post {post}"))
            })
        })
        .collect();

    c.bench_function("reconstruct_has_many_1000_rows", |b| {
        b.iter(|| reconstruct(black_box(&rows), black_box(&select.shape)))
    });
}

criterion_group!(benches, bench_compile, bench_reconstruct);
criterion_main!(benches);
