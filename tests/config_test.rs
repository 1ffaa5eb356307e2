use std::io::Write;

use herald::{
    Error, Event, EventError, EventRegistry, EventType, FailurePolicy, Listener, RegistryConfig,
};
use pretty_assertions::assert_eq;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[ctor::ctor]
fn init_tests() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

#[test]
fn test_registry_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "failure_policy": "collect_and_continue", "max_listeners": 2 }}"#
    )
    .unwrap();

    let config = RegistryConfig::from_file(file.path()).unwrap();
    assert_eq!(
        config,
        RegistryConfig {
            failure_policy: FailurePolicy::CollectAndContinue,
            max_listeners: 2,
        }
    );

    let registry = EventRegistry::with_config(config);
    registry
        .subscribe(
            EventType::Greet,
            Listener::new(|_: &Event| Err("first".into())),
        )
        .unwrap();
    registry
        .subscribe(
            EventType::Greet,
            Listener::new(|_: &Event| Err("second".into())),
        )
        .unwrap();

    let error = registry
        .emit(&Event::Greet {
            name: "config".to_string(),
        })
        .unwrap_err();
    assert_eq!(
        error.to_string(),
        "2 listener(s) failed for event greet (2 invoked)"
    );
    if let EventError::ListenerFailures { failures, .. } = error {
        let messages: Vec<_> = failures.iter().map(|f| f.source.to_string()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    } else {
        panic!("expected collected failures");
    }
}

#[test]
fn test_invalid_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();

    let result = RegistryConfig::from_file(file.path());
    assert!(matches!(result, Err(Error::Config(_))));
}
