use barter_negotiators::builtin::{register_negotiators, OneUpConfig, LIBRARY};
use barter_negotiators::component::list_static_negotiators;
use barter_negotiators::factory::*;
use barter_negotiators::ranking::{Offer, Preferences};
use barter_negotiators::RoundStage;

fn static_config(name: &str, params: serde_yaml::Value) -> NegotiatorConfig {
    NegotiatorConfig {
        name: name.to_string(),
        load_mode: LoadMode::StaticLib {
            library: LIBRARY.to_string(),
        },
        params,
    }
}

#[test]
fn test_static_library() {
    // Register negotiators as static library instead of using them as builtin.
    register_negotiators();

    let names = list_static_negotiators();
    assert!(names.contains(&"barter-negotiators::OneUp".to_string()));
    assert!(names.contains(&"barter-negotiators::Mirror".to_string()));

    let params = serde_yaml::to_value(OneUpConfig {
        random_offer_probability: 0.0,
        ..OneUpConfig::default()
    })
    .unwrap();
    let mut negotiator = create_negotiator(static_config("OneUp", params)).unwrap();

    negotiator
        .initialize(Preferences::new(vec!["A", "B", "C", "D"]).unwrap(), 10)
        .unwrap();
    assert_eq!(negotiator.stage(), RoundStage::AwaitingFirstOffer);

    let first = negotiator.make_offer(None).unwrap();
    assert_eq!(first, Offer::from(vec!["A", "B", "C", "D"]));

    let counter = negotiator
        .make_offer(Some(&Offer::from(vec!["B", "A", "C", "D"])))
        .unwrap();
    assert_eq!(counter, Offer::from(vec!["B", "A", "C", "D"]));
}

#[test]
fn test_static_library_unknown_negotiator() {
    register_negotiators();

    let error = create_negotiator(static_config("Generous", serde_yaml::Value::Null))
        .err()
        .unwrap();
    assert_eq!(
        error.root_cause().to_string(),
        "Negotiator 'barter-negotiators::Generous' not found."
    );
}

#[test]
fn test_config_from_file() {
    let path = std::env::temp_dir().join("barter-negotiators-test_config_from_file.yaml");
    std::fs::write(
        &path,
        r#"
name: OneUp
load_mode: BuiltIn
params:
  random-offer-probability: 0.0
  accept-at-threshold: true
  history-rounds: 8
"#,
    )
    .unwrap();

    let config = NegotiatorConfig::from_file(&path).unwrap();
    assert_eq!(config.name, "OneUp");
    assert_eq!(config.load_mode, LoadMode::BuiltIn);
    assert!(create_negotiator(config).is_ok());

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_config_from_missing_file() {
    let path = std::env::temp_dir().join("barter-negotiators-no-such-config.yaml");
    let error = NegotiatorConfig::from_file(&path).err().unwrap();
    assert!(error.to_string().starts_with("Reading negotiator config"));
}

#[test]
fn test_negotiators_config_from_file() {
    let path = std::env::temp_dir().join("barter-negotiators-negotiators-config.yaml");
    std::fs::write(
        &path,
        r#"
negotiators:
  - name: OneUp
    load_mode: BuiltIn
    params:
      random-offer-probability: 0.0
      seed: 11
  - name: Mirror
    load_mode: BuiltIn
"#,
    )
    .unwrap();

    let config = NegotiatorsConfig::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let names: Vec<_> = config.negotiators.iter().map(|n| n.name.clone()).collect();
    assert_eq!(names, vec!["OneUp", "Mirror"]);

    let mut negotiators = create_negotiators(config).unwrap();
    for negotiator in negotiators.iter_mut() {
        negotiator
            .initialize(Preferences::new(vec!["A", "B", "C"]).unwrap(), 5)
            .unwrap();
        assert_eq!(
            negotiator.make_offer(None).unwrap(),
            Offer::from(vec!["A", "B", "C"])
        );
    }
}
