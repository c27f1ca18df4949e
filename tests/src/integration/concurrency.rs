//! # Concurrent Membership and Reads
//!
//! Randomized multi-threaded schedules against one shared host:
//!
//! 1. **Distinct adds**: no lost updates, no false duplicates
//! 2. **Same-id race**: exactly one winner
//! 3. **Mixed churn**: readers never observe a half-applied change

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    use rand::seq::SliceRandom;
    use rand::Rng;
    use svc_registry::{RegistryConfig, RegistryError, ServiceHost};
    use svc_types::{ServiceId, ServiceLifecycle};

    use crate::{build_service, register_named};

    const THREADS: usize = 8;
    const PER_THREAD: usize = 64;

    #[test]
    fn test_concurrent_distinct_adds() {
        let host = Arc::new(ServiceHost::new(RegistryConfig::default()));
        let mut ids: Vec<String> = (0..THREADS * PER_THREAD).map(|i| format!("svc-{i}")).collect();
        ids.shuffle(&mut rand::thread_rng());

        let barrier = Arc::new(Barrier::new(THREADS));
        let handles: Vec<_> = ids
            .chunks(PER_THREAD)
            .map(|chunk| {
                let host = Arc::clone(&host);
                let barrier = Arc::clone(&barrier);
                let chunk = chunk.to_vec();
                thread::spawn(move || {
                    barrier.wait();
                    for id in chunk {
                        register_named(&host, &id, &["m"]).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let registered: HashSet<String> = host
            .registry()
            .service_ids()
            .into_iter()
            .map(|id| id.into_inner())
            .collect();
        assert_eq!(registered, ids.into_iter().collect());
        assert_eq!(host.registry().list_methods().len(), THREADS * PER_THREAD);
    }

    #[test]
    fn test_same_id_race_has_one_winner() {
        let host = Arc::new(ServiceHost::new(RegistryConfig::default()));
        let barrier = Arc::new(Barrier::new(THREADS));
        let wins = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let host = Arc::clone(&host);
                let barrier = Arc::clone(&barrier);
                let wins = Arc::clone(&wins);
                thread::spawn(move || {
                    barrier.wait();
                    match register_named(&host, "contested", &[]) {
                        Ok(_) => {
                            wins.fetch_add(1, Ordering::SeqCst);
                        }
                        Err(RegistryError::DuplicateIdentifier { .. }) => {}
                        Err(e) => panic!("unexpected error: {e}"),
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(wins.load(Ordering::SeqCst), 1);
        assert_eq!(host.registry().len(), 1);
    }

    #[test]
    fn test_readers_see_whole_services_during_churn() {
        let host = Arc::new(ServiceHost::new(RegistryConfig::default()));
        let done = Arc::new(AtomicBool::new(false));
        let methods = ["a", "b", "c"];

        let writers: Vec<_> = (0..4)
            .map(|w| {
                let host = Arc::clone(&host);
                thread::spawn(move || {
                    let mut rng = rand::thread_rng();
                    let lifecycle = Arc::new(ServiceLifecycle::new());
                    for round in 0..200 {
                        let id = format!("w{w}-{}", rng.gen_range(0..8));
                        if rng.gen_bool(0.5) {
                            let service = build_service(&id, &methods, &lifecycle).unwrap();
                            let _ = host.register(service);
                        } else {
                            let _ = host.deregister(&ServiceId::from(id.as_str()));
                        }
                        if round % 16 == 0 {
                            thread::yield_now();
                        }
                    }
                })
            })
            .collect();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let host = Arc::clone(&host);
                let done = Arc::clone(&done);
                thread::spawn(move || {
                    while !done.load(Ordering::Relaxed) {
                        let registry = host.registry();
                        // Every service carries all three methods, so any
                        // consistent snapshot has a multiple of three.
                        assert_eq!(registry.list_methods().len() % methods.len(), 0);
                        for service in registry.list_all() {
                            assert_eq!(service.methods().len(), methods.len());
                        }
                    }
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap();
        }
        done.store(true, Ordering::Relaxed);
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
