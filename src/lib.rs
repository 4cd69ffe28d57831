pub mod factory;

pub use barter_negotiator_component::{
    BoxedNegotiator, NegotiationError, NegotiatorComponent, RoundResults, RoundStage,
};

pub mod builtin {
    pub use barter_builtin_negotiators::one_up::Config as OneUpConfig;
    pub use barter_builtin_negotiators::{register_negotiators, Mirror, OneUpNegotiator, LIBRARY};
}

pub mod component {
    pub use barter_negotiator_component::static_lib::{
        create_static_negotiator, factory, list_static_negotiators, register_negotiator,
    };
    pub use barter_negotiator_component::{
        NegotiatorComponent, NegotiatorFactory, RankDistance, UtilityFunction,
    };
}

pub mod ranking {
    pub use barter_ranking_utils::{
        one_up, rank_distance, History, InvalidOfferError, Item, Offer, Preferences,
        PreferencesError,
    };
}
