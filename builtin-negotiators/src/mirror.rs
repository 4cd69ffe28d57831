use barter_negotiator_component::{
    NegotiationError, NegotiatorComponent, NegotiatorFactory, Offer, Preferences, RoundResults,
    RoundStage,
};

/// Negotiator without any strategy. Starts from his preferences and one-ups
/// toward each incoming offer, until both sides propose the same offer.
pub struct Mirror {
    preferences: Option<Preferences>,
    offer: Offer,
    stage: RoundStage,
}

impl NegotiatorFactory<Mirror> for Mirror {
    fn new(_name: &str, _config: serde_yaml::Value) -> anyhow::Result<Mirror> {
        Ok(Mirror {
            preferences: None,
            offer: Offer::default(),
            stage: RoundStage::AwaitingFirstOffer,
        })
    }
}

impl NegotiatorComponent for Mirror {
    fn initialize(&mut self, preferences: Preferences, _iter_limit: u32) -> anyhow::Result<()> {
        self.offer = preferences.to_offer();
        self.preferences = Some(preferences);
        self.stage = RoundStage::AwaitingFirstOffer;
        Ok(())
    }

    fn make_offer(&mut self, opponent_offer: Option<&Offer>) -> anyhow::Result<Offer> {
        let preferences = self
            .preferences
            .as_ref()
            .ok_or(NegotiationError::NotInitialized)?;
        self.stage = RoundStage::Negotiating;

        let their = match opponent_offer {
            Some(their) => their,
            None => {
                self.offer = preferences.to_offer();
                return Ok(self.offer.clone());
            }
        };
        preferences
            .validate(their)
            .map_err(NegotiationError::from)?;

        if &self.offer == their {
            log::debug!("Mirror: Accepting {}.", their);
            return Ok(their.clone());
        }

        self.offer = barter_ranking_utils::one_up(&self.offer, their)?;
        Ok(self.offer.clone())
    }

    fn receive_utility(&mut self, _utility: f64) -> anyhow::Result<()> {
        Ok(())
    }

    fn receive_results(&mut self, _results: &RoundResults) -> anyhow::Result<()> {
        if let Some(preferences) = &self.preferences {
            self.offer = preferences.to_offer();
        }
        self.stage = RoundStage::RoundClosed;
        Ok(())
    }

    fn stage(&self) -> RoundStage {
        self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mirror() -> Mirror {
        let mut mirror = Mirror::new("Mirror", serde_yaml::Value::Null).unwrap();
        mirror
            .initialize(Preferences::new(vec!["A", "B", "C"]).unwrap(), 10)
            .unwrap();
        mirror
    }

    #[test]
    fn test_mirror_follows_opponent() {
        let mut mirror = mirror();
        let their = Offer::from(vec!["C", "B", "A"]);

        assert_eq!(mirror.make_offer(None).unwrap(), Offer::from(vec!["A", "B", "C"]));
        assert_eq!(
            mirror.make_offer(Some(&their)).unwrap(),
            Offer::from(vec!["C", "B", "A"])
        );
        // Offers are equal now, so it's acceptance.
        assert_eq!(mirror.make_offer(Some(&their)).unwrap(), their);
    }

    #[test]
    fn test_mirror_opens_each_round_with_preferences() {
        let mut mirror = mirror();
        let preferences = Offer::from(vec!["A", "B", "C"]);
        let their = Offer::from(vec!["C", "B", "A"]);

        mirror.make_offer(None).unwrap();
        assert_eq!(mirror.make_offer(Some(&their)).unwrap(), their);

        mirror
            .receive_results(&RoundResults {
                agreed: true,
                first_utility: 1.0,
                last_utility: 1.0,
                iterations: 2,
            })
            .unwrap();
        assert_eq!(mirror.stage(), RoundStage::RoundClosed);

        assert_eq!(mirror.make_offer(None).unwrap(), preferences);
        assert_eq!(mirror.stage(), RoundStage::Negotiating);
    }

    #[test]
    fn test_mirror_answers_from_preferences_in_new_round() {
        let mut mirror = mirror();
        let their = Offer::from(vec!["C", "B", "A"]);

        mirror.make_offer(None).unwrap();
        mirror.make_offer(Some(&their)).unwrap();
        mirror
            .receive_results(&RoundResults {
                agreed: true,
                first_utility: 1.0,
                last_utility: 1.0,
                iterations: 2,
            })
            .unwrap();

        // Opponent opens the next round. Mirror one-ups from its preferences
        // instead of accepting.
        let opening = Offer::from(vec!["B", "C", "A"]);
        assert_eq!(
            mirror.make_offer(Some(&opening)).unwrap(),
            Offer::from(vec!["B", "A", "C"])
        );
    }

    #[test]
    fn test_mirror_rejects_foreign_offer() {
        let mut mirror = mirror();
        let error = mirror
            .make_offer(Some(&Offer::from(vec!["A", "B", "Z"])))
            .err()
            .unwrap();
        assert!(matches!(
            error.downcast_ref::<NegotiationError>(),
            Some(NegotiationError::InvalidOffer(_))
        ));
    }
}
