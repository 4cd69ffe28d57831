pub mod component;
pub mod error;
pub mod static_lib;
pub mod utility;

pub use component::{NegotiatorComponent, RoundResults, RoundStage};
pub use error::NegotiationError;
pub use static_lib::{factory, register_negotiator, BoxedNegotiator, NegotiatorFactory};
pub use utility::{RankDistance, UtilityFunction};

pub use barter_ranking_utils::{History, InvalidOfferError, Offer, Preferences};
