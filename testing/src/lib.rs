mod framework;
mod negotiation_record;

pub use framework::{Framework, FrameworkError, Party};
pub use negotiation_record::{NegotiationRecord, OfferEntry};

use barter_negotiators::factory::NegotiatorConfig;

/// OneUp negotiator config without random offers, so tests are deterministic.
pub fn deterministic_one_up() -> anyhow::Result<NegotiatorConfig> {
    let params = serde_yaml::to_value(barter_negotiators::builtin::OneUpConfig {
        random_offer_probability: 0.0,
        seed: Some(0),
        ..Default::default()
    })?;
    Ok(NegotiatorConfig::builtin("OneUp", params))
}
