use crate::{InvalidOfferError, Offer};

/// Moves `current` one step closer to `opponent`.
///
/// Finds the first position on which offers differ and swaps into it the item,
/// that opponent placed there. All positions before it stay matched, so repeated
/// calls against the same opponent offer reach it after at most `n - 1` swaps.
///
/// Both offers must be permutations of the same items.
pub fn one_up(current: &Offer, opponent: &Offer) -> Result<Offer, InvalidOfferError> {
    if current.len() != opponent.len() {
        return Err(InvalidOfferError::LengthMismatch {
            expected: current.len(),
            got: opponent.len(),
        });
    }

    let mut improved = current.clone();
    let diverged = match current
        .iter()
        .zip(opponent.iter())
        .position(|(ours, theirs)| ours != theirs)
    {
        Some(idx) => idx,
        None => return Ok(improved),
    };

    let wanted = &opponent.items()[diverged];
    let swap_idx = current
        .iter()
        .skip(diverged)
        .position(|item| item == wanted)
        .map(|offset| diverged + offset)
        .ok_or_else(|| InvalidOfferError::UnknownItem(wanted.clone()))?;

    improved.swap(diverged, swap_idx);
    Ok(improved)
}
