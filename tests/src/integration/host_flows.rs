//! # Host and Registry Flows
//!
//! Membership and lookup behaviour as seen by code holding a `ServiceHost`:
//!
//! 1. **Membership round trip**: two services, methods flattened, one removed
//! 2. **Error paths**: duplicate registration, unknown deregistration
//! 3. **Copy isolation**: returned services never alias registry state
//! 4. **Duplicate method ids**: deterministic winner

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use svc_registry::{Metrics, RegistryConfig, RegistryError, ServiceHost, ServiceRegistry};
    use svc_types::{Method, MethodId, ServiceId, ServiceLifecycle, ServiceState};

    use crate::{build_service, register_named};

    fn host() -> ServiceHost {
        ServiceHost::new(RegistryConfig::default())
    }

    fn method_ids(methods: &[Method]) -> HashSet<String> {
        methods.iter().map(|m| m.id.as_str().to_string()).collect()
    }

    #[test]
    fn test_two_services_then_remove_one() {
        let host = host();
        register_named(&host, "svc-a", &["m1", "m2"]).unwrap();
        register_named(&host, "svc-b", &["m3"]).unwrap();
        let registry = host.registry();

        let all = method_ids(&registry.list_methods());
        assert_eq!(all, ["m1", "m2", "m3"].iter().map(|s| s.to_string()).collect());

        let m3 = registry.find_method("m3").unwrap();
        let owner = registry
            .list_all()
            .into_iter()
            .find(|s| s.methods().contains(&m3.id))
            .unwrap();
        assert_eq!(owner.id().as_str(), "svc-b");

        host.deregister(&ServiceId::from("svc-a")).unwrap();
        let remaining = method_ids(&registry.list_methods());
        assert_eq!(remaining, ["m3".to_string()].into_iter().collect());
    }

    #[test]
    fn test_duplicate_registration_keeps_original() {
        let host = host();
        register_named(&host, "svc-a", &["m1"]).unwrap();

        let err = register_named(&host, "svc-a", &["other"]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateIdentifier { ref id } if id.as_str() == "svc-a"));

        let stored = host.registry().lookup(&ServiceId::from("svc-a")).unwrap();
        assert!(stored.methods().contains(&MethodId::from("m1")));
        assert!(!stored.methods().contains(&MethodId::from("other")));
        assert_eq!(host.registry().len(), 1);
    }

    #[test]
    fn test_deregister_unknown_is_noop() {
        let host = host();
        register_named(&host, "svc-a", &[]).unwrap();

        let err = host.deregister(&ServiceId::from("ghost")).unwrap_err();
        assert!(matches!(err, RegistryError::NotRegistered { .. }));
        assert_eq!(host.registry().service_ids(), vec![ServiceId::from("svc-a")]);
    }

    #[test]
    fn test_deregister_does_not_stop() {
        let host = host();
        let lifecycle = register_named(&host, "svc-a", &["m1"]).unwrap();

        let detached = host.deregister(&ServiceId::from("svc-a")).unwrap();
        assert_eq!(detached.id().as_str(), "svc-a");
        assert_eq!(lifecycle.state(), ServiceState::Running);
        assert!(host.registry().lookup(detached.id()).is_none());
    }

    #[test]
    fn test_returned_copies_are_isolated() {
        let host = host();
        register_named(&host, "svc-a", &["m1"]).unwrap();
        let id = ServiceId::from("svc-a");

        let mut copy = host.registry().lookup(&id).unwrap();
        copy.add_method(Method::new("injected", "injected")).unwrap();
        copy.remove_method(&MethodId::from("m1"));

        for mut listed in host.registry().list_all() {
            listed.remove_method(&MethodId::from("m1"));
        }

        let fresh = host.registry().lookup(&id).unwrap();
        assert_eq!(fresh.methods().ids(), vec![MethodId::from("m1")]);
        assert!(host.registry().find_method("injected").is_none());
    }

    #[test]
    fn test_blank_method_queries() {
        let metrics = Arc::new(Metrics::new());
        let registry = Arc::new(ServiceRegistry::with_metrics(metrics.clone()));
        let host = ServiceHost::with_registry(registry, RegistryConfig::default());
        register_named(&host, "svc-a", &["m1"]).unwrap();

        for key in ["", "   ", "\t\n"] {
            assert!(host.registry().find_method(key).is_none());
        }
        assert_eq!(metrics.snapshot().blank_method_queries, 3);
    }

    #[test]
    fn test_duplicate_method_id_resolves_to_greatest_service() {
        let host = host();
        let lifecycle = Arc::new(ServiceLifecycle::new());
        let mut low = build_service("svc-a", &[], &lifecycle).unwrap();
        low.add_method(Method::new("shared", "from-a")).unwrap();
        let mut high = build_service("svc-b", &[], &lifecycle).unwrap();
        high.add_method(Method::new("shared", "from-b")).unwrap();

        // Registration order must not matter
        host.register(high).unwrap();
        host.register(low).unwrap();

        for _ in 0..20 {
            assert_eq!(host.registry().find_method("shared").unwrap().name, "from-b");
        }
    }

    #[test]
    fn test_generated_services_round_trip() {
        let host = host();
        let lifecycle = Arc::new(ServiceLifecycle::new());
        let service = svc_types::Service::new(host.next_service_id(), lifecycle)
            .with_method(host.method("ping"))
            .unwrap()
            .with_method(host.method("pong"))
            .unwrap();

        let id = host.register(service.clone()).unwrap();
        let fetched = host.registry().lookup(&id).unwrap();
        assert_eq!(fetched.id(), service.id());
        assert_eq!(fetched.methods(), service.methods());

        let snapshot = host.registry().snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("ping"));
        assert!(json.contains(id.as_str()));
    }
}
