use serde::{Deserialize, Serialize};
use std::fmt;

use barter_negotiator_component::{Offer, RoundResults};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OfferEntry {
    pub iteration: u32,
    pub party: String,
    pub offer: Offer,
}

/// Everything that happened during a single round.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NegotiationRecord {
    pub round: u32,
    /// Party that opened the round goes first.
    pub parties: Vec<String>,
    pub offers: Vec<OfferEntry>,
    pub agreement: Option<Offer>,
    pub results: Option<RoundResults>,
}

impl NegotiationRecord {
    pub fn new(round: u32, opener: &str, closer: &str) -> NegotiationRecord {
        NegotiationRecord {
            round,
            parties: vec![opener.to_string(), closer.to_string()],
            offers: vec![],
            agreement: None,
            results: None,
        }
    }

    pub fn add_offer(&mut self, iteration: u32, party: &str, offer: Offer) {
        self.offers.push(OfferEntry {
            iteration,
            party: party.to_string(),
            offer,
        })
    }

    pub fn offers_of<'a>(&'a self, party: &'a str) -> impl Iterator<Item = &'a Offer> + 'a {
        self.offers
            .iter()
            .filter(move |entry| entry.party == party)
            .map(|entry| &entry.offer)
    }

    pub fn last_offer(&self) -> Option<&OfferEntry> {
        self.offers.last()
    }

    pub fn is_agreed(&self) -> bool {
        self.agreement.is_some()
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for NegotiationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Round {} [{}]", self.round, self.parties.join(" vs "))?;
        for entry in &self.offers {
            writeln!(
                f,
                "  iteration {:>3} | {:>10}: {}",
                entry.iteration, entry.party, entry.offer
            )?;
        }

        match &self.agreement {
            Some(offer) => writeln!(f, "Agreement: {}", offer)?,
            None => writeln!(f, "No agreement")?,
        }
        if let Some(results) = &self.results {
            writeln!(
                f,
                "Utilities: {:.2} (first), {:.2} (last)",
                results.first_utility, results.last_utility
            )?;
        }
        Ok(())
    }
}
