//! # Service Registry Benchmarks
//!
//! | Path | Claim |
//! |------|-------|
//! | `lookup` | flat in registry size |
//! | `list_methods` / `find_method` | linear in total methods |
//! | `register` + `deregister` | single write-lock round trip |
//! | parallel `lookup` | readers do not serialize |

use criterion::{criterion_group, criterion_main, Criterion};

fn registry_benches(c: &mut Criterion) {
    svc_tests::benchmarks::registry::register_benchmarks(c);
}

criterion_group!(benches, registry_benches);
criterion_main!(benches);
