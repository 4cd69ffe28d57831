use derive_more::Display;
use serde::{Deserialize, Serialize};

use barter_ranking_utils::{Offer, Preferences};

/// Outcome of a round, delivered by harness after the round is closed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RoundResults {
    /// Both parties ended the round with the same offer.
    pub agreed: bool,
    /// Utility achieved by party, that opened the round.
    pub first_utility: f64,
    /// Utility achieved by party, that made the closing offer.
    pub last_utility: f64,
    /// Number of iterations, after which the round ended.
    pub iterations: u32,
}

impl RoundResults {
    pub fn utility_for(&self, moved_last: bool) -> f64 {
        match moved_last {
            true => self.last_utility,
            false => self.first_utility,
        }
    }
}

/// Stage of the round from negotiator's perspective.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum RoundStage {
    /// Negotiator was initialized and waits for the first `make_offer` call
    /// of the first round. Later rounds start from `RoundClosed` instead.
    #[display(fmt = "AwaitingFirstOffer")]
    AwaitingFirstOffer,
    #[display(fmt = "Negotiating")]
    Negotiating,
    /// Negotiator made his last offer allowed in this round.
    #[display(fmt = "FinalIteration")]
    FinalIteration,
    /// Round results were received and per-round state was reset. This is
    /// the round-start state for every round after the first one: the next
    /// `make_offer` opens or answers the new round and moves to `Negotiating`.
    #[display(fmt = "RoundClosed")]
    RoundClosed,
}

/// Capabilities, that harness uses to drive negotiations. Harness owns rounds
/// and iterations, negotiator only reacts to calls.
///
/// Returning opponent's offer unchanged from `make_offer` means acceptance.
pub trait NegotiatorComponent {
    /// Called once before the first round. Harness passes our ranking and
    /// maximal number of `make_offer` calls per round.
    fn initialize(&mut self, preferences: Preferences, iter_limit: u32) -> anyhow::Result<()>;

    /// Push forward negotiations. `opponent_offer` is `None` when we open the round.
    fn make_offer(&mut self, opponent_offer: Option<&Offer>) -> anyhow::Result<Offer>;

    /// Opponent's utility of his last offer. Only recorded.
    fn receive_utility(&mut self, utility: f64) -> anyhow::Result<()>;

    /// Called when round was finished. Negotiator can use results to adjust
    /// his strategy in future rounds.
    fn receive_results(&mut self, results: &RoundResults) -> anyhow::Result<()>;

    fn stage(&self) -> RoundStage;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_utility_by_move_order() {
        let results = RoundResults {
            agreed: true,
            first_utility: 3.0,
            last_utility: 5.0,
            iterations: 4,
        };

        assert_eq!(results.utility_for(true), 5.0);
        assert_eq!(results.utility_for(false), 3.0);
    }

    #[test]
    fn test_round_stage_display() {
        assert_eq!(RoundStage::FinalIteration.to_string(), "FinalIteration");
        assert_eq!(RoundStage::RoundClosed.to_string(), "RoundClosed");
    }
}
