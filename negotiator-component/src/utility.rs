use barter_ranking_utils::{rank_distance, Offer, Preferences};

/// Scoring function provided by harness. Negotiators use it to evaluate
/// offers from their own perspective.
pub trait UtilityFunction: Send + Sync {
    fn utility(&self, offer: &Offer, preferences: &Preferences) -> f64;
}

/// Default scoring used in bargaining rounds. Check `rank_distance`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RankDistance;

impl UtilityFunction for RankDistance {
    fn utility(&self, offer: &Offer, preferences: &Preferences) -> f64 {
        rank_distance(offer, preferences)
    }
}

impl<F> UtilityFunction for F
where
    F: Fn(&Offer, &Preferences) -> f64 + Send + Sync,
{
    fn utility(&self, offer: &Offer, preferences: &Preferences) -> f64 {
        self(offer, preferences)
    }
}
