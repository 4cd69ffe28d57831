use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::TryFrom;
use std::fmt;

pub type Item = String;

/// Offer can't be compared against preferences, because it isn't
/// a permutation of the same items.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum InvalidOfferError {
    #[error("Offer is empty")]
    Empty,
    #[error("Offer has {got} items, expected {expected}")]
    LengthMismatch { expected: usize, got: usize },
    #[error("Item '{0}' doesn't appear in preferences")]
    UnknownItem(Item),
    #[error("Item '{0}' appears in offer more than once")]
    DuplicateItem(Item),
}

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum PreferencesError {
    #[error("Preferences list can't be empty")]
    Empty,
    #[error("Item '{0}' is ranked more than once")]
    DuplicateItem(Item),
}

/// Proposed ranking of items. Has meaning only together with `Preferences`
/// of the same domain, which validate it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Offer {
    items: Vec<Item>,
}

impl Offer {
    pub fn new(items: Vec<Item>) -> Offer {
        Offer { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn get(&self, idx: usize) -> Option<&Item> {
        self.items.get(idx)
    }

    pub fn position(&self, item: &str) -> Option<usize> {
        self.items.iter().position(|candidate| candidate == item)
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a, b)
    }

    pub fn into_inner(self) -> Vec<Item> {
        self.items
    }
}

impl<S: Into<Item>> From<Vec<S>> for Offer {
    fn from(items: Vec<S>) -> Self {
        Offer::new(items.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<Item>> std::iter::FromIterator<S> for Offer {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Offer::new(iter.into_iter().map(Into::into).collect())
    }
}

impl AsMut<[Item]> for Offer {
    fn as_mut(&mut self) -> &mut [Item] {
        self.items.as_mut_slice()
    }
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.items.join(", "))
    }
}

/// Agent's ranking of items, best first. Fixed for the agent's lifetime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Item>", into = "Vec<Item>")]
pub struct Preferences {
    ranking: Offer,
    ranks: HashMap<Item, usize>,
}

impl Preferences {
    pub fn new<S: Into<Item>>(items: Vec<S>) -> Result<Preferences, PreferencesError> {
        let ranking = Offer::from(items);
        if ranking.is_empty() {
            return Err(PreferencesError::Empty);
        }

        let mut ranks = HashMap::with_capacity(ranking.len());
        for (idx, item) in ranking.iter().enumerate() {
            if ranks.insert(item.clone(), idx).is_some() {
                return Err(PreferencesError::DuplicateItem(item.clone()));
            }
        }
        Ok(Preferences { ranking, ranks })
    }

    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }

    pub fn rank(&self, item: &str) -> Option<usize> {
        self.ranks.get(item).copied()
    }

    /// Preferences turned into the offer, that is the best for us.
    pub fn as_offer(&self) -> &Offer {
        &self.ranking
    }

    pub fn to_offer(&self) -> Offer {
        self.ranking.clone()
    }

    /// Checks if `offer` is a permutation of preferred items.
    pub fn validate(&self, offer: &Offer) -> Result<(), InvalidOfferError> {
        if offer.is_empty() {
            return Err(InvalidOfferError::Empty);
        }
        if offer.len() != self.len() {
            return Err(InvalidOfferError::LengthMismatch {
                expected: self.len(),
                got: offer.len(),
            });
        }

        let mut seen = vec![false; self.len()];
        for item in offer.iter() {
            let rank = self
                .rank(item)
                .ok_or_else(|| InvalidOfferError::UnknownItem(item.clone()))?;
            if std::mem::replace(&mut seen[rank], true) {
                return Err(InvalidOfferError::DuplicateItem(item.clone()));
            }
        }
        Ok(())
    }
}

impl TryFrom<Vec<Item>> for Preferences {
    type Error = PreferencesError;

    fn try_from(items: Vec<Item>) -> Result<Self, Self::Error> {
        Preferences::new(items)
    }
}

impl From<Preferences> for Vec<Item> {
    fn from(preferences: Preferences) -> Self {
        preferences.ranking.into_inner()
    }
}

impl fmt::Display for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ranking.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn abcd() -> Preferences {
        Preferences::new(vec!["A", "B", "C", "D"]).unwrap()
    }

    #[test]
    fn test_preferences_rejects_invalid_lists() {
        assert_eq!(
            Preferences::new(Vec::<String>::new()),
            Err(PreferencesError::Empty)
        );
        assert_eq!(
            Preferences::new(vec!["A", "B", "A"]),
            Err(PreferencesError::DuplicateItem("A".to_string()))
        );
    }

    #[test]
    fn test_preferences_ranks() {
        let prefs = abcd();
        assert_eq!(prefs.rank("A"), Some(0));
        assert_eq!(prefs.rank("D"), Some(3));
        assert_eq!(prefs.rank("E"), None);
        assert_eq!(prefs.as_offer(), &Offer::from(vec!["A", "B", "C", "D"]));
    }

    #[test_case(&["D", "C", "B", "A"], Ok(()); "Reversed order is valid")]
    #[test_case(&[], Err(InvalidOfferError::Empty); "Empty offer")]
    #[test_case(
        &["A", "B", "C"],
        Err(InvalidOfferError::LengthMismatch { expected: 4, got: 3 });
        "Missing item"
    )]
    #[test_case(
        &["A", "B", "C", "E"],
        Err(InvalidOfferError::UnknownItem("E".to_string()));
        "Foreign item"
    )]
    #[test_case(
        &["A", "B", "B", "D"],
        Err(InvalidOfferError::DuplicateItem("B".to_string()));
        "Repeated item"
    )]
    fn test_validate_offer(items: &[&str], expected: Result<(), InvalidOfferError>) {
        let offer = Offer::from(items.to_vec());
        assert_eq!(abcd().validate(&offer), expected);
    }

    #[test]
    fn test_preferences_yaml() {
        let prefs: Preferences = serde_yaml::from_str("[A, B, C, D]").unwrap();
        assert_eq!(prefs, abcd());

        assert!(serde_yaml::from_str::<Preferences>("[A, A]").is_err());
        assert_eq!(
            serde_json::to_string(&prefs).unwrap(),
            r#"["A","B","C","D"]"#
        );
    }

    #[test]
    fn test_offer_display() {
        let offer = Offer::from(vec!["B", "A"]);
        assert_eq!(offer.to_string(), "[B, A]");
    }
}
