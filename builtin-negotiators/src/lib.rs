pub mod mirror;
pub mod one_up;

pub use mirror::Mirror;
pub use one_up::OneUpNegotiator;

use barter_negotiator_component::static_lib::{factory, register_negotiator};

pub const LIBRARY: &str = "barter-negotiators";

pub fn register_negotiators() {
    register_negotiator(LIBRARY, "OneUp", factory::<OneUpNegotiator>());
    register_negotiator(LIBRARY, "Mirror", factory::<Mirror>());
}
