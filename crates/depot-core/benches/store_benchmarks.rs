use criterion::{Criterion, black_box, criterion_group, criterion_main};
use depot_core::{FileStore, NoopObserver, Resolver, StoreConfig, extension_of};
use depot_fs::RobustnessConfig;
use std::sync::Arc;
use tempfile::tempdir;

fn resolver_benchmark(c: &mut Criterion) {
    let resolver = Resolver::new("/srv/files");
    c.bench_function("resolver::resolve_id", |b| {
        b.iter(|| resolver.resolve_id(black_box("0123456789abcdef0123456789abcdef")))
    });
    c.bench_function("resolver::resolve (escape)", |b| {
        b.iter(|| resolver.resolve(black_box("../../etc/passwd")))
    });
    c.bench_function("resolver::extension_of", |b| {
        b.iter(|| extension_of(black_box("../uploads/holiday photo.JPEG")))
    });
}

fn store_benchmark(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let config = StoreConfig::new(dir.path().join("store"))
        .with_robustness(RobustnessConfig { enable_fsync: false });
    let store = FileStore::open_with_observer(config, Arc::new(NoopObserver)).unwrap();

    c.bench_function("store::store", |b| {
        b.iter(|| store.store(black_box(b"hello world"), Some("a.txt")).unwrap())
    });

    let id = store.store(b"hello world", Some("a.txt")).unwrap().to_string();
    c.bench_function("store::retrieve", |b| b.iter(|| store.retrieve(black_box(&id)).unwrap()));
}

criterion_group!(benches, resolver_benchmark, store_benchmark);
criterion_main!(benches);
