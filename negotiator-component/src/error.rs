use barter_ranking_utils::{InvalidOfferError, PreferencesError};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum NegotiationError {
    #[error("Negotiator wasn't initialized with preferences")]
    NotInitialized,
    #[error("Invalid offer. {0}")]
    InvalidOffer(#[from] InvalidOfferError),
    #[error("Invalid preferences. {0}")]
    InvalidPreferences(#[from] PreferencesError),
    #[error("Exceeded limit of {limit} iterations in round {round}")]
    IterationLimitExceeded { round: u32, limit: u32 },
    #[error("Iterations limit must be positive")]
    InvalidIterLimit,
    #[error("Utility {0} is not a finite number")]
    InvalidUtility(f64),
}
