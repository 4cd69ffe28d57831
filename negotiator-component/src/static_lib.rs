use anyhow::anyhow;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::component::NegotiatorComponent;

pub type BoxedNegotiator = Box<dyn NegotiatorComponent + Send + Sync>;

pub type ConstructorFunction =
    Box<dyn Fn(&str, serde_yaml::Value) -> anyhow::Result<BoxedNegotiator> + Send + Sync>;

/// Creates negotiator from YAML params. `name` is the name under which
/// negotiator was requested in configuration.
pub trait NegotiatorFactory<T> {
    fn new(name: &str, config: serde_yaml::Value) -> anyhow::Result<T>;
}

lazy_static! {
    /// Contains functions that can create negotiators by name.
    static ref CONSTRUCTORS: Arc<Mutex<HashMap<String, ConstructorFunction>>> = Arc::new(Mutex::new(HashMap::new()));
}

pub fn factory<T>() -> ConstructorFunction
where
    T: NegotiatorFactory<T> + NegotiatorComponent + Send + Sync + 'static,
{
    Box::new(|name: &str, config: serde_yaml::Value| {
        Ok(Box::new(T::new(name, config)?) as BoxedNegotiator)
    })
}

pub fn register_negotiator(library: &str, name: &str, constructor: ConstructorFunction) {
    let path = format!("{}::{}", library, name);
    match CONSTRUCTORS.lock() {
        Ok(mut map) => {
            log::debug!("Registering static negotiator '{}'.", path);
            map.insert(path, constructor);
        }
        Err(e) => log::error!("Failed to register static Negotiator '{}': {}", path, e),
    }
}

pub fn create_static_negotiator(
    name_path: &str,
    config: serde_yaml::Value,
) -> anyhow::Result<BoxedNegotiator> {
    let map = CONSTRUCTORS
        .lock()
        .map_err(|e| anyhow!("Failed to acquire static Negotiator creation lock: {}", e))?;

    match map.get(name_path) {
        Some(constructor) => constructor(name_path, config),
        None => Err(anyhow!("Negotiator '{}' not found.", name_path)),
    }
}

pub fn list_static_negotiators() -> Vec<String> {
    match CONSTRUCTORS.lock() {
        Ok(map) => {
            let mut names: Vec<String> = map.keys().cloned().collect();
            names.sort();
            names
        }
        Err(_) => vec![],
    }
}
