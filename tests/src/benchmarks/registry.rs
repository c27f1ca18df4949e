//! # Registry Read/Write Benchmarks
//!
//! Claims to validate:
//! - `lookup` stays flat as the registry grows (hash map + clone of one entry)
//! - `list_methods` / `find_method` scale linearly with total methods
//! - reads under contention from other readers do not serialize
//!
//! Conditions:
//! - registries of 10 to 10 000 services, 4 methods each
//! - random lookup keys, hits and misses mixed

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use svc_registry::{RegistryConfig, ServiceHost};
use svc_types::{Method, Service, ServiceId, ServiceLifecycle};

const METHODS_PER_SERVICE: usize = 4;

/// Host with `services` services named `svc-<n>` exposing `svc-<n>.m<k>`.
fn populated_host(services: usize) -> ServiceHost {
    let host = ServiceHost::new(RegistryConfig::default());
    let lifecycle = Arc::new(ServiceLifecycle::new());
    for n in 0..services {
        let mut service = Service::new(format!("svc-{n}"), lifecycle.clone());
        for k in 0..METHODS_PER_SERVICE {
            let id = format!("svc-{n}.m{k}");
            let _ = service.add_method(Method::new(id.as_str(), id.as_str()));
        }
        let _ = host.register(service);
    }
    host
}

pub fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry/lookup");
    group.measurement_time(Duration::from_secs(5));

    for size in [10, 1_000, 10_000] {
        let host = populated_host(size);
        let keys: Vec<ServiceId> = (0..1024)
            .map(|_| {
                // One in four keys misses
                let n = rand::thread_rng().gen_range(0..size + size / 3);
                ServiceId::from(format!("svc-{n}"))
            })
            .collect();

        let mut i = 0usize;
        group.bench_with_input(BenchmarkId::new("random_key", size), &host, |b, h| {
            b.iter(|| {
                i = (i + 1) % keys.len();
                black_box(h.registry().lookup(&keys[i]))
            })
        });
    }

    group.finish();
}

pub fn bench_enumeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry/enumeration");
    group.measurement_time(Duration::from_secs(5));

    for size in [10, 1_000, 10_000] {
        let host = populated_host(size);
        group.throughput(Throughput::Elements((size * METHODS_PER_SERVICE) as u64));

        group.bench_with_input(BenchmarkId::new("list_methods", size), &host, |b, h| {
            b.iter(|| black_box(h.registry().list_methods()))
        });

        let target = format!("svc-{}.m1", size / 2);
        group.bench_with_input(BenchmarkId::new("find_method", size), &host, |b, h| {
            b.iter(|| black_box(h.registry().find_method(&target)))
        });

        group.bench_with_input(BenchmarkId::new("list_all", size), &host, |b, h| {
            b.iter(|| black_box(h.registry().list_all()))
        });
    }

    group.finish();
}

pub fn bench_membership(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry/membership");
    let host = populated_host(1_000);
    let lifecycle = Arc::new(ServiceLifecycle::new());

    group.bench_function("register_deregister", |b| {
        b.iter(|| {
            let id = host.next_service_id();
            let _ = host.register(Service::new(id.clone(), lifecycle.clone()));
            black_box(host.deregister(&id))
        })
    });

    group.finish();
}

pub fn bench_contended_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry/contended");
    group.measurement_time(Duration::from_secs(5));

    for readers in [1, 4, 8] {
        let host = Arc::new(populated_host(1_000));
        group.throughput(Throughput::Elements(readers as u64 * 100));
        group.bench_with_input(BenchmarkId::new("parallel_lookups", readers), &readers, |b, &r| {
            b.iter(|| {
                let handles: Vec<_> = (0..r)
                    .map(|t| {
                        let host = Arc::clone(&host);
                        thread::spawn(move || {
                            for n in 0..100 {
                                let id = ServiceId::from(format!("svc-{}", (t * 100 + n) % 1_000));
                                black_box(host.registry().lookup(&id));
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    let _ = handle.join();
                }
            })
        });
    }

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_lookup(c);
    bench_enumeration(c);
    bench_membership(c);
    bench_contended_reads(c);
}
