use anyhow::bail;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use barter_negotiator_component::{
    History, NegotiationError, NegotiatorComponent, NegotiatorFactory, Offer, Preferences,
    RankDistance, RoundResults, RoundStage, UtilityFunction,
};

/// Negotiator that moves his offer one swap closer to the opponent's offer
/// in each iteration. From time to time proposes random offer, which is still
/// good enough for him, so his strategy is harder to predict.
pub struct OneUpNegotiator {
    config: Config,
    utility_fn: Box<dyn UtilityFunction>,
    rng: StdRng,
    session: Option<Session>,

    offer: Offer,
    current_iter: u32,
    round: u32,
    threshold: f64,
    /// We didn't open current round, so our final offer closes it.
    moves_last: bool,
    stage: RoundStage,
    /// Our offers from current round.
    past_offers: Vec<Offer>,

    utility_history: History<f64>,
    offer_history: History<Offer>,
    results_history: BTreeMap<u32, RoundResults>,
}

struct Session {
    preferences: Preferences,
    iter_limit: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Probability of proposing random offer instead of one-up offer.
    pub random_offer_probability: f64,
    /// Number of shuffles tried when looking for random offer above threshold.
    pub random_offer_retries: u32,
    /// Initial threshold as a fraction of our best possible utility.
    pub initial_threshold_ratio: f64,
    /// Weight of utility achieved in the last round, when updating threshold.
    pub threshold_learning_rate: f64,
    /// Fraction of iterations, after which negotiator opening the round
    /// accepts anything to avoid losing everything.
    pub late_acceptance_ratio: f64,
    /// Accept offers with utility not lower than current threshold.
    pub accept_at_threshold: bool,
    /// Number of most recent rounds kept in history.
    pub history_rounds: usize,
    /// Seed for reproducible random offers.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            random_offer_probability: 0.10,
            random_offer_retries: 20,
            initial_threshold_ratio: 0.75,
            threshold_learning_rate: 0.25,
            late_acceptance_ratio: 0.8,
            accept_at_threshold: false,
            history_rounds: 64,
            seed: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        let fractions = [
            ("random-offer-probability", self.random_offer_probability),
            ("threshold-learning-rate", self.threshold_learning_rate),
            ("late-acceptance-ratio", self.late_acceptance_ratio),
        ];
        for (name, value) in fractions.iter() {
            if !(0.0..=1.0).contains(value) {
                bail!("'{}' must be in range [0, 1], got {}", name, value);
            }
        }
        if !self.initial_threshold_ratio.is_finite() {
            bail!("'initial-threshold-ratio' must be finite number");
        }
        if self.history_rounds == 0 {
            bail!("'history-rounds' must be positive");
        }
        Ok(())
    }
}

impl NegotiatorFactory<OneUpNegotiator> for OneUpNegotiator {
    fn new(_name: &str, config: serde_yaml::Value) -> anyhow::Result<OneUpNegotiator> {
        let config: Config = match config {
            serde_yaml::Value::Null => Config::default(),
            config => serde_yaml::from_value(config)?,
        };
        OneUpNegotiator::with_config(config)
    }
}

impl OneUpNegotiator {
    pub fn with_config(config: Config) -> anyhow::Result<OneUpNegotiator> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(OneUpNegotiator {
            utility_fn: Box::new(RankDistance),
            rng,
            session: None,
            offer: Offer::default(),
            current_iter: 0,
            round: 0,
            threshold: 0.0,
            moves_last: true,
            stage: RoundStage::AwaitingFirstOffer,
            past_offers: vec![],
            utility_history: History::new(config.history_rounds),
            offer_history: History::new(config.history_rounds),
            results_history: BTreeMap::new(),
            config,
        })
    }

    /// Replaces default `RankDistance` scoring. Should be called before `initialize`,
    /// since initial threshold is computed from utility.
    pub fn with_utility(mut self, utility: impl UtilityFunction + 'static) -> Self {
        self.utility_fn = Box::new(utility);
        self
    }

    fn session(&self) -> Result<&Session, NegotiationError> {
        self.session.as_ref().ok_or(NegotiationError::NotInitialized)
    }

    /// Our utility of `offer`. Doesn't change negotiator state.
    pub fn calc_utility(&self, offer: &Offer) -> Result<f64, NegotiationError> {
        let session = self.session()?;
        Ok(self.utility_fn.utility(offer, &session.preferences))
    }

    /// Moves our current offer one swap toward `opponent_offer`.
    pub fn one_up(&mut self, opponent_offer: Option<&Offer>) -> Result<Offer, NegotiationError> {
        let opponent_offer = match opponent_offer {
            Some(offer) => offer,
            None => return Ok(self.offer.clone()),
        };

        self.session()?.preferences.validate(opponent_offer)?;
        self.offer = barter_ranking_utils::one_up(&self.offer, opponent_offer)?;
        Ok(self.offer.clone())
    }

    /// Shuffles our offer until its utility reaches threshold or retries
    /// are exhausted. The best offer found is returned.
    pub fn random_offer(&mut self) -> Result<Offer, NegotiationError> {
        let mut candidate = self.offer.clone();
        let mut best = candidate.clone();
        let mut best_utility = f64::NEG_INFINITY;

        for _ in 0..self.config.random_offer_retries {
            if best_utility >= self.threshold {
                break;
            }

            candidate.as_mut().shuffle(&mut self.rng);
            let utility = self.calc_utility(&candidate)?;
            if utility > best_utility {
                best_utility = utility;
                best = candidate.clone();
            }
        }

        if best_utility < self.threshold {
            log::warn!(
                "Random offer {} has utility {:.2} below threshold {:.2}.",
                best,
                best_utility,
                self.threshold
            );
        }

        self.offer = best;
        Ok(self.offer.clone())
    }

    fn first_offer(&mut self) -> Result<Offer, NegotiationError> {
        self.moves_last = false;
        Ok(self.session()?.preferences.to_offer())
    }

    fn final_offer(&mut self, their: &Offer) -> Result<Offer, NegotiationError> {
        if self.past_offers.contains(their) {
            log::debug!("Round {}: Accepting our own earlier offer {}.", self.round, their);
            return Ok(their.clone());
        }
        self.one_up(Some(their))
    }

    fn intermediate_offer(&mut self, their: &Offer) -> Result<Offer, NegotiationError> {
        if self.past_offers.contains(their) {
            log::debug!("Round {}: Accepting our own earlier offer {}.", self.round, their);
            return Ok(their.clone());
        }

        if self.rng.gen_bool(self.config.random_offer_probability) {
            return self.random_offer();
        }

        if self.is_too_late()? {
            log::debug!(
                "Round {}: Accepting {} in iteration {}, since it's too late to continue.",
                self.round,
                their,
                self.current_iter
            );
            return Ok(their.clone());
        }

        if self.config.accept_at_threshold {
            let utility = self.calc_utility(their)?;
            if utility >= self.threshold {
                log::debug!(
                    "Round {}: Accepting {} with utility {:.2} (threshold {:.2}).",
                    self.round,
                    their,
                    utility,
                    self.threshold
                );
                return Ok(their.clone());
            }
        }

        self.one_up(Some(their))
    }

    /// Negotiator, that opened the round, can't make the closing offer,
    /// so he gives up in the late part of the round.
    fn is_too_late(&self) -> Result<bool, NegotiationError> {
        let late_iter =
            (self.session()?.iter_limit as f64 * self.config.late_acceptance_ratio).floor() as u32;
        Ok(!self.moves_last && self.current_iter > late_iter)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn current_iteration(&self) -> u32 {
        self.current_iter
    }

    pub fn current_offer(&self) -> &Offer {
        &self.offer
    }

    pub fn moves_last(&self) -> bool {
        self.moves_last
    }

    pub fn past_offers(&self) -> &[Offer] {
        &self.past_offers
    }

    pub fn utility_history(&self) -> &History<f64> {
        &self.utility_history
    }

    pub fn offer_history(&self) -> &History<Offer> {
        &self.offer_history
    }

    pub fn results_history(&self) -> &BTreeMap<u32, RoundResults> {
        &self.results_history
    }
}

impl NegotiatorComponent for OneUpNegotiator {
    fn initialize(&mut self, preferences: Preferences, iter_limit: u32) -> anyhow::Result<()> {
        if iter_limit == 0 {
            return Err(NegotiationError::InvalidIterLimit.into());
        }

        let best_utility = self
            .utility_fn
            .utility(preferences.as_offer(), &preferences);
        self.threshold = self.config.initial_threshold_ratio * best_utility;
        self.offer = preferences.to_offer();
        self.session = Some(Session {
            preferences,
            iter_limit,
        });

        self.current_iter = 0;
        self.round = 0;
        self.moves_last = true;
        self.stage = RoundStage::AwaitingFirstOffer;
        self.past_offers.clear();
        self.utility_history = History::new(self.config.history_rounds);
        self.offer_history = History::new(self.config.history_rounds);
        self.results_history.clear();

        log::info!(
            "OneUp negotiator initialized. Iterations limit: {}, threshold: {:.2}.",
            iter_limit,
            self.threshold
        );
        Ok(())
    }

    fn make_offer(&mut self, opponent_offer: Option<&Offer>) -> anyhow::Result<Offer> {
        let session = self.session()?;
        let iter_limit = session.iter_limit;
        if let Some(their) = opponent_offer {
            session.preferences.validate(their).map_err(NegotiationError::from)?;
        }

        if self.current_iter >= iter_limit {
            return Err(NegotiationError::IterationLimitExceeded {
                round: self.round,
                limit: iter_limit,
            }
            .into());
        }

        self.current_iter += 1;
        let my_offer = match opponent_offer {
            None => self.first_offer()?,
            Some(their) => {
                self.offer_history
                    .record(self.round, self.current_iter, their.clone());

                if self.current_iter == iter_limit {
                    self.final_offer(their)?
                } else {
                    self.intermediate_offer(their)?
                }
            }
        };

        self.stage = match self.current_iter == iter_limit {
            true => RoundStage::FinalIteration,
            false => RoundStage::Negotiating,
        };

        log::debug!(
            "Round {}, iteration {}: Proposing {}.",
            self.round,
            self.current_iter,
            my_offer
        );

        self.past_offers.push(my_offer.clone());
        self.offer = my_offer.clone();
        Ok(my_offer)
    }

    fn receive_utility(&mut self, utility: f64) -> anyhow::Result<()> {
        if !utility.is_finite() {
            return Err(NegotiationError::InvalidUtility(utility).into());
        }
        self.utility_history
            .record(self.round, self.current_iter, utility);
        Ok(())
    }

    fn receive_results(&mut self, results: &RoundResults) -> anyhow::Result<()> {
        self.results_history.insert(self.round, results.clone());
        while self.results_history.len() > self.config.history_rounds {
            let oldest = self.results_history.keys().next().copied();
            if let Some(round) = oldest {
                self.results_history.remove(&round);
            }
        }

        let achieved = results.utility_for(self.moves_last);
        if achieved > 0.0 {
            let rate = self.config.threshold_learning_rate;
            let previous = self.threshold;
            self.threshold = previous * (1.0 - rate) + achieved * rate;

            log::info!(
                "Round {} finished (agreed: {}). Threshold changed from {:.2} to {:.2}.",
                self.round,
                results.agreed,
                previous,
                self.threshold
            );
        } else {
            log::info!(
                "Round {} finished (agreed: {}). Threshold stays {:.2}.",
                self.round,
                results.agreed,
                self.threshold
            );
        }

        self.round += 1;
        self.past_offers.clear();
        self.current_iter = 0;
        self.moves_last = true;
        self.stage = RoundStage::RoundClosed;
        Ok(())
    }

    fn stage(&self) -> RoundStage {
        self.stage
    }
}
