use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use passage::config::loader::{default_config_content, interpolate_env_vars, parse_config};
use passage::Config;

fn bench_config_creation(c: &mut Criterion) {
    c.bench_function("config_default", |b| b.iter(|| Config::default()));
    c.bench_function("config_ephemeral", |b| b.iter(|| Config::ephemeral("secret")));
}

fn bench_config_serialization(c: &mut Criterion) {
    let config = Config::ephemeral("secret");

    c.bench_function("config_to_toml", |b| {
        b.iter(|| toml::to_string(&black_box(&config)))
    });

    let toml_str = toml::to_string(&config).unwrap();
    c.bench_function("config_from_toml", |b| {
        b.iter(|| toml::from_str::<Config>(black_box(&toml_str)))
    });
}

fn bench_config_interpolation(c: &mut Criterion) {
    let content = default_config_content();

    c.bench_function("config_interpolate_env", |b| {
        b.iter(|| interpolate_env_vars(black_box(content)))
    });

    c.bench_function("config_parse_default", |b| {
        b.iter(|| parse_config(black_box(content)))
    });
}

fn bench_config_validate(c: &mut Criterion) {
    let config = Config::ephemeral("secret");

    c.bench_function("config_validate", |b| {
        b.iter(|| black_box(&config).validate())
    });
}

criterion_group!(
    benches,
    bench_config_creation,
    bench_config_serialization,
    bench_config_interpolation,
    bench_config_validate
);
criterion_main!(benches);
