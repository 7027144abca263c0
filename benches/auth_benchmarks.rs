use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use passage::auth::{extract_token, PasswordHasher, TokenIssuer};
use axum::http::{header, HeaderMap, HeaderValue};
use uuid::Uuid;

fn bench_token_issue_verify(c: &mut Criterion) {
    let issuer = TokenIssuer::new(b"bench-secret", None);
    let user_id = Uuid::new_v4();

    c.bench_function("token_issue", |b| b.iter(|| issuer.issue(black_box(user_id))));

    let token = issuer.issue(user_id).unwrap();
    c.bench_function("token_verify", |b| b.iter(|| issuer.verify(black_box(&token))));

    c.bench_function("token_verify_garbage", |b| {
        b.iter(|| issuer.verify(black_box("not.a.token")))
    });
}

fn bench_password(c: &mut Criterion) {
    let mut group = c.benchmark_group("bcrypt");
    group.sample_size(10);

    for cost in [4u32, 10] {
        let hasher = PasswordHasher::new(cost).unwrap();
        let hash = hasher.hash("password123").unwrap();

        group.bench_function(format!("hash_cost_{}", cost), |b| {
            b.iter(|| hasher.hash(black_box("password123")))
        });
        group.bench_function(format!("verify_cost_{}", cost), |b| {
            b.iter(|| hasher.verify(black_box("password123"), &hash))
        });
    }

    group.finish();
}

fn bench_token_extraction(c: &mut Criterion) {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        HeaderValue::from_static("theme=dark; lang=en; token=abc.def.ghi"),
    );
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_static("Bearer header.tok.en"),
    );

    c.bench_function("extract_token", |b| b.iter(|| extract_token(black_box(&headers)).is_some()));
}

criterion_group!(
    benches,
    bench_token_issue_verify,
    bench_password,
    bench_token_extraction
);
criterion_main!(benches);
