use anyhow::{anyhow, bail};
use std::fmt;

use barter_negotiator_component::{BoxedNegotiator, Offer, Preferences, RoundResults};
use barter_negotiators::factory::{create_negotiator, NegotiatorConfig};
use barter_ranking_utils::rank_distance;

use crate::negotiation_record::NegotiationRecord;

#[derive(thiserror::Error)]
#[error("{error}\nNegotiation traceback:\n\n{negotiation_traceback}")]
pub struct FrameworkError {
    error: anyhow::Error,
    negotiation_traceback: NegotiationRecord,
}

pub struct Party {
    pub name: String,
    pub preferences: Preferences,
    pub negotiator: BoxedNegotiator,
}

/// Emulates bargaining harness: two parties propose offers alternately.
/// Party returning the offer it just received accepts it.
/// Rounds without agreement give both parties zero utility.
pub struct Framework {
    pub parties: Vec<Party>,
    pub iter_limit: u32,
    round: u32,
}

impl Framework {
    pub fn new(iter_limit: u32) -> Framework {
        let _ = env_logger::builder().is_test(true).try_init();

        Framework {
            parties: vec![],
            iter_limit,
            round: 0,
        }
    }

    pub fn add_party(
        self,
        name: &str,
        config: NegotiatorConfig,
        preferences: Preferences,
    ) -> anyhow::Result<Self> {
        let negotiator = create_negotiator(config)?;
        self.add_negotiator(name, negotiator, preferences)
    }

    pub fn add_negotiator(
        mut self,
        name: &str,
        mut negotiator: BoxedNegotiator,
        preferences: Preferences,
    ) -> anyhow::Result<Self> {
        if self.parties.len() >= 2 {
            bail!("Framework supports only two parties.");
        }
        if let Some(other) = self.parties.first() {
            if other.name == name {
                bail!("Party named {} already exists.", name);
            }
        }

        negotiator.initialize(preferences.clone(), self.iter_limit)?;
        self.parties.push(Party {
            name: name.to_string(),
            preferences,
            negotiator,
        });
        Ok(self)
    }

    pub fn party(&self, name: &str) -> anyhow::Result<&Party> {
        self.parties
            .iter()
            .find(|party| party.name == name)
            .ok_or_else(|| anyhow!("Party {} not found.", name))
    }

    /// Runs `rounds` rounds. Parties take turns in opening rounds,
    /// starting from the party added first.
    pub fn run(&mut self, rounds: u32) -> Result<Vec<NegotiationRecord>, FrameworkError> {
        (0..rounds)
            .map(|round| self.run_round((round % 2) as usize))
            .collect()
    }

    pub fn run_round(&mut self, opener: usize) -> Result<NegotiationRecord, FrameworkError> {
        if self.parties.len() != 2 || opener > 1 {
            let record = NegotiationRecord::new(self.round, "", "");
            return Err(FrameworkError::from(
                anyhow!("Round requires two parties and opener index 0 or 1."),
                &record,
            ));
        }

        let order = [opener, 1 - opener];
        let mut record = NegotiationRecord::new(
            self.round,
            &self.parties[order[0]].name,
            &self.parties[order[1]].name,
        );

        let mut last: Option<Offer> = None;
        let mut iterations = 0;
        'round: for iteration in 1..=self.iter_limit {
            iterations = iteration;
            for &idx in order.iter() {
                let party = &mut self.parties[idx];
                let offer = party
                    .negotiator
                    .make_offer(last.as_ref())
                    .map_err(|e| FrameworkError::from(e, &record))?;
                record.add_offer(iteration, &party.name, offer.clone());

                if last.as_ref() == Some(&offer) {
                    log::info!(
                        "Round {}: {} accepted {} in iteration {}.",
                        self.round,
                        party.name,
                        offer,
                        iteration
                    );
                    record.agreement = Some(offer);
                    break 'round;
                }

                let utility = rank_distance(&offer, &party.preferences);
                self.parties[1 - idx]
                    .negotiator
                    .receive_utility(utility)
                    .map_err(|e| FrameworkError::from(e, &record))?;
                last = Some(offer);
            }
        }

        let utility_of = |party: &Party| match &record.agreement {
            Some(offer) => rank_distance(offer, &party.preferences),
            None => 0.0,
        };
        let results = RoundResults {
            agreed: record.agreement.is_some(),
            first_utility: utility_of(&self.parties[order[0]]),
            last_utility: utility_of(&self.parties[order[1]]),
            iterations,
        };

        for party in self.parties.iter_mut() {
            party
                .negotiator
                .receive_results(&results)
                .map_err(|e| FrameworkError::from(e, &record))?;
        }

        record.results = Some(results);
        log::debug!("{}", record);

        self.round += 1;
        Ok(record)
    }
}

impl FrameworkError {
    pub fn from(error: impl Into<anyhow::Error>, record: &NegotiationRecord) -> FrameworkError {
        FrameworkError {
            error: error.into(),
            negotiation_traceback: record.clone(),
        }
    }

    pub fn traceback(&self) -> &NegotiationRecord {
        &self.negotiation_traceback
    }

    pub fn error(&self) -> &anyhow::Error {
        &self.error
    }
}

impl fmt::Debug for FrameworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
