pub mod history;
mod offer;
mod one_up;
mod utility;

pub use history::History;
pub use offer::{InvalidOfferError, Item, Offer, Preferences, PreferencesError};
pub use one_up::one_up;
pub use utility::rank_distance;
