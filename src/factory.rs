use anyhow::{bail, Context};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use barter_builtin_negotiators::{Mirror, OneUpNegotiator};
use barter_negotiator_component::static_lib::create_static_negotiator;
use barter_negotiator_component::{BoxedNegotiator, NegotiatorFactory};

#[derive(Clone, Debug, Display, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub enum LoadMode {
    #[display(fmt = "BuiltIn")]
    BuiltIn,
    /// Negotiator registered with `register_negotiator` under `library`.
    #[display(fmt = "StaticLib({})", library)]
    StaticLib { library: String },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NegotiatorConfig {
    pub name: String,
    pub load_mode: LoadMode,
    #[serde(default)]
    pub params: serde_yaml::Value,
}

impl NegotiatorConfig {
    pub fn builtin(name: &str, params: serde_yaml::Value) -> NegotiatorConfig {
        NegotiatorConfig {
            name: name.to_string(),
            load_mode: LoadMode::BuiltIn,
            params,
        }
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<NegotiatorConfig> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<NegotiatorConfig> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Reading negotiator config: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Parsing negotiator config: {}", path.display()))
    }
}

/// Whole bargaining setup, one entry per party.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NegotiatorsConfig {
    pub negotiators: Vec<NegotiatorConfig>,
}

impl NegotiatorsConfig {
    pub fn from_yaml(content: &str) -> anyhow::Result<NegotiatorsConfig> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<NegotiatorsConfig> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Reading negotiators config: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Parsing negotiators config: {}", path.display()))
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Creates negotiators in the order they appear in `config`.
pub fn create_negotiators(config: NegotiatorsConfig) -> anyhow::Result<Vec<BoxedNegotiator>> {
    config
        .negotiators
        .into_iter()
        .map(create_negotiator)
        .collect()
}

pub fn create_negotiator(config: NegotiatorConfig) -> anyhow::Result<BoxedNegotiator> {
    log::info!(
        "Creating negotiator '{}' [load mode: {}].",
        config.name,
        config.load_mode
    );

    let name = config.name;
    let negotiator = match config.load_mode {
        LoadMode::BuiltIn => create_builtin(&name, config.params),
        LoadMode::StaticLib { library } => {
            create_static_negotiator(&format!("{}::{}", library, name), config.params)
        }
    };
    negotiator.with_context(|| format!("Failed to create negotiator '{}'", name))
}

pub fn create_builtin(name: &str, config: serde_yaml::Value) -> anyhow::Result<BoxedNegotiator> {
    let negotiator = match name {
        "OneUp" => Box::new(OneUpNegotiator::new(name, config)?) as BoxedNegotiator,
        "Mirror" => Box::new(Mirror::new(name, config)?) as BoxedNegotiator,
        _ => bail!("BuiltIn negotiator {} doesn't exists.", name),
    };
    Ok(negotiator)
}
