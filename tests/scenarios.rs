use mfa_context_gate as gate;
use gate::{Authentication, ContextValidator, InMemoryRegistry, ProviderDescriptor, Reason, RegisteredService, ValidatorConfig};
use std::sync::Arc;

const BYPASS: &str = "bypassMultifactorAuthentication";
const BYPASS_PROVIDER: &str = "bypassedMultifactorAuthenticationProviderId";

fn validator(registry: InMemoryRegistry) -> ContextValidator {
    ContextValidator::new(ValidatorConfig::default(), Arc::new(registry))
}

fn with_dummy() -> ContextValidator {
    validator(InMemoryRegistry::with_providers([ProviderDescriptor::new("mfa-dummy")]))
}

fn service() -> RegisteredService {
    RegisteredService::new("https://app.example.org")
}

#[test]
fn fails_with_no_providers() {
    let v = validator(InMemoryRegistry::new());
    let result = v.validate(&Authentication::new("casuser"), "invalid-context", Some(&service())).unwrap();
    assert!(!result.is_satisfied());
    assert_eq!(result.reason(), Reason::UnknownContext);
}

#[test]
fn fails_with_missing_provider() {
    let v = with_dummy();
    let result = v.validate(&Authentication::new("casuser"), "invalid-context", Some(&service())).unwrap();
    assert!(!result.is_satisfied());
    assert_eq!(result.reason(), Reason::UnknownContext);
}

#[test]
fn passes_with_proven_provider() {
    let v = with_dummy();
    let auth = Authentication::new("casuser").with_attribute("authn_method", "mfa-dummy");
    let result = v.validate(&auth, "mfa-dummy", Some(&service())).unwrap();
    assert!(result.is_satisfied());
    assert_eq!(result.provider().map(|p| p.id.as_str()), Some("mfa-dummy"));
}

#[test]
fn passes_with_trusted_context() {
    let v = with_dummy();
    let auth = Authentication::new("casuser")
        .with_attribute("authn_method", "mfa-other")
        .with_attribute("trusted_authn", "mfa-dummy");
    let result = v.validate(&auth, "mfa-dummy", Some(&service())).unwrap();
    assert!(result.is_satisfied());
    assert_eq!(result.reason(), Reason::TrustedContext);
}

#[test]
fn bypass_for_requested_context_is_not_proof() {
    let v = with_dummy();
    let auth = Authentication::new("casuser")
        .with_attribute("authn_method", "mfa-other")
        .with_attribute(BYPASS, true)
        .with_attribute(BYPASS_PROVIDER, "mfa-dummy");
    let result = v.validate(&auth, "mfa-dummy", Some(&service())).unwrap();
    assert!(!result.is_satisfied());
    assert_eq!(result.reason(), Reason::ContextBypassed);
}

#[test]
fn bypass_for_other_context_is_plain_failure() {
    let v = with_dummy();
    let auth = Authentication::new("casuser")
        .with_attribute("authn_method", "mfa-other")
        .with_attribute(BYPASS, true)
        .with_attribute(BYPASS_PROVIDER, "mfa-other");
    let result = v.validate(&auth, "mfa-dummy", Some(&service())).unwrap();
    assert!(!result.is_satisfied());
    assert_eq!(result.reason(), Reason::ContextNotSatisfied);
}

#[test]
fn renamed_attributes_are_honoured() {
    let config = ValidatorConfig::default()
        .with_proven_attribute("amr")
        .with_trusted_attribute("remembered");
    let registry = InMemoryRegistry::with_providers([ProviderDescriptor::new("mfa-dummy")]);
    let v = ContextValidator::new(config, Arc::new(registry));

    let proven = Authentication::new("casuser").with_attribute("amr", "mfa-dummy");
    assert_eq!(v.validate(&proven, "mfa-dummy", None).unwrap().reason(), Reason::ContextSatisfied);

    let old_key = Authentication::new("casuser").with_attribute("authn_method", "mfa-dummy");
    assert_eq!(v.validate(&old_key, "mfa-dummy", None).unwrap().reason(), Reason::ContextNotSatisfied);

    let trusted = Authentication::new("casuser").with_attribute("remembered", "mfa-dummy");
    assert_eq!(v.validate(&trusted, "mfa-dummy", None).unwrap().reason(), Reason::TrustedContext);
}

#[test]
fn authentication_document_from_json() {
    let auth = Authentication::from_json(
        r#"{
            "principal": "casuser",
            "attributes": {
                "authn_method": ["mfa-gauth", "mfa-dummy"],
                "bypassMultifactorAuthentication": false
            }
        }"#,
    )
    .unwrap();
    let result = with_dummy().validate(&auth, "mfa-dummy", None).unwrap();
    assert_eq!(result.reason(), Reason::ContextSatisfied);
}

#[test]
fn validator_is_shared_across_threads() {
    let v = Arc::new(with_dummy());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let v = Arc::clone(&v);
            std::thread::spawn(move || {
                let auth = if i % 2 == 0 {
                    Authentication::new("casuser").with_attribute("authn_method", "mfa-dummy")
                } else {
                    Authentication::new("casuser")
                };
                (i, v.validate(&auth, "mfa-dummy", None).unwrap().is_satisfied())
            })
        })
        .collect();
    for handle in handles {
        let (i, satisfied) = handle.join().unwrap();
        assert_eq!(satisfied, i % 2 == 0);
    }
}
