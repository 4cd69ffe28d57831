use crate::{Offer, Preferences};

/// Utility of `offer` measured against `preferences`.
///
/// Each item contributes `n / (position_in_offer + 1)` and loses the distance
/// between its position in the offer and its rank in preferences. The first part
/// is the same for every permutation, so only the distance term differentiates offers,
/// and the score is maximal for the offer equal to preferences.
///
/// Offer is expected to be validated against preferences. Items without rank
/// contribute nothing.
pub fn rank_distance(offer: &Offer, preferences: &Preferences) -> f64 {
    let total = preferences.len() as f64;
    offer
        .iter()
        .enumerate()
        .filter_map(|(position, item)| preferences.rank(item).map(|rank| (position, rank)))
        .map(|(position, rank)| {
            let distance = (position as f64 - rank as f64).abs();
            total / (position as f64 + 1.0) - distance
        })
        .sum()
}
