//! Draw pile and discard pile for one round.
//!
//! The draw pile's back is the next card drawn; the discard pile's back is the
//! most recent discard. When the draw pile runs dry, everything under the top
//! discard is reclaimed and reshuffled into a new draw pile.

use rustc_hash::FxHashSet;
use tracing::debug;

use super::card::{Card, Rank, Suit};
use crate::core::{ActionError, GameRng};

/// Number of cards in a full deck.
pub const DECK_SIZE: usize = 52;

const LOG_TARGET: &str = "cobra::deck";

/// Draw and discard piles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    draw_pile: Vec<Card>,
    discard_pile: Vec<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// Build all 52 unique cards in canonical (suit-major) order, unshuffled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            draw_pile: canonical_cards().collect(),
            discard_pile: Vec::new(),
        }
    }

    /// Build a full deck whose first draws are `top_first`, in that order.
    ///
    /// The cards not listed follow in canonical order. Fails if `top_first`
    /// repeats a card.
    pub fn stacked(top_first: Vec<Card>) -> Result<Self, ActionError> {
        let mut seen = FxHashSet::default();
        if !top_first.iter().all(|card| seen.insert(*card)) {
            return Err(ActionError::DeckMismatch);
        }

        let mut order = top_first;
        order.extend(canonical_cards().filter(|card| !seen.contains(card)));
        order.reverse();

        Ok(Self {
            draw_pile: order,
            discard_pile: Vec::new(),
        })
    }

    /// Uniformly permute the draw pile.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.draw_pile);
    }

    /// Draw the next card, reclaiming the discard pile if needed.
    ///
    /// Returns `None` only on true exhaustion: the draw pile is empty and the
    /// discard pile holds at most the one card that must stay face up.
    pub fn draw(&mut self, rng: &mut GameRng) -> Option<Card> {
        if self.draw_pile.is_empty() {
            if self.discard_pile.len() <= 1 {
                return None;
            }
            self.reclaim_discards(rng);
        }
        self.draw_pile.pop()
    }

    fn reclaim_discards(&mut self, rng: &mut GameRng) {
        let top = self.discard_pile.pop();
        self.draw_pile = std::mem::take(&mut self.discard_pile);
        self.discard_pile.extend(top);
        self.shuffle(rng);
        debug!(
            target: LOG_TARGET,
            reclaimed = self.draw_pile.len(),
            "draw pile empty, reshuffled discards"
        );
    }

    /// Put a card face up on the discard pile.
    pub fn discard(&mut self, card: Card) {
        self.discard_pile.push(card);
    }

    /// Most recent discard.
    #[must_use]
    pub fn top_discard(&self) -> Option<Card> {
        self.discard_pile.last().copied()
    }

    /// Cards left in the draw pile.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.draw_pile.len()
    }

    /// Cards on the discard pile.
    #[must_use]
    pub fn discard_count(&self) -> usize {
        self.discard_pile.len()
    }

    /// Draw pile, bottom first.
    #[must_use]
    pub fn draw_pile(&self) -> &[Card] {
        &self.draw_pile
    }

    /// Discard pile, oldest first.
    #[must_use]
    pub fn discard_pile(&self) -> &[Card] {
        &self.discard_pile
    }
}

fn canonical_cards() -> impl Iterator<Item = Card> {
    Suit::ALL
        .into_iter()
        .flat_map(|suit| Rank::ALL.into_iter().map(move |rank| Card::new(rank, suit)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn test_new_deck_has_52_unique_cards() {
        let deck = Deck::new();
        assert_eq!(deck.remaining(), DECK_SIZE);
        assert_eq!(deck.discard_count(), 0);

        let unique: FxHashSet<_> = deck.draw_pile().iter().collect();
        assert_eq!(unique.len(), DECK_SIZE);
    }

    #[test]
    fn test_shuffle_keeps_cards() {
        let mut rng = GameRng::new(42);
        let mut deck = Deck::new();
        deck.shuffle(&mut rng);

        assert_ne!(deck.draw_pile(), Deck::new().draw_pile());
        let mut sorted = deck.draw_pile().to_vec();
        sorted.sort();
        let mut canonical = Deck::new().draw_pile().to_vec();
        canonical.sort();
        assert_eq!(sorted, canonical);
    }

    #[test]
    fn test_draw_from_back() {
        let mut rng = GameRng::new(1);
        let mut deck = Deck::stacked(vec![card(Rank::Queen, Suit::Hearts), card(Rank::Two, Suit::Clubs)]).unwrap();

        assert_eq!(deck.draw(&mut rng), Some(card(Rank::Queen, Suit::Hearts)));
        assert_eq!(deck.draw(&mut rng), Some(card(Rank::Two, Suit::Clubs)));
        assert_eq!(deck.remaining(), DECK_SIZE - 2);
    }

    #[test]
    fn test_stacked_rejects_duplicates() {
        let dup = vec![card(Rank::Ace, Suit::Spades), card(Rank::Ace, Suit::Spades)];
        assert_eq!(Deck::stacked(dup), Err(ActionError::DeckMismatch));
    }

    #[test]
    fn test_reclaim_keeps_top_discard() {
        let mut rng = GameRng::new(3);
        let mut deck = Deck::new();
        let mut drawn = Vec::new();
        while let Some(c) = deck.draw(&mut rng) {
            drawn.push(c);
            if deck.remaining() == 0 {
                break;
            }
        }
        assert_eq!(drawn.len(), DECK_SIZE);

        // Discard five cards; the last one must survive reclamation.
        for c in drawn.drain(..5) {
            deck.discard(c);
        }
        let top = deck.top_discard().unwrap();

        let next = deck.draw(&mut rng).unwrap();
        assert_eq!(deck.discard_pile(), &[top]);
        assert_eq!(deck.remaining(), 3);
        assert_ne!(next, top);
    }

    #[test]
    fn test_true_exhaustion() {
        let mut rng = GameRng::new(3);
        let mut deck = Deck::new();
        let mut held = Vec::new();
        while deck.remaining() > 0 {
            held.push(deck.draw(&mut rng).unwrap());
        }

        assert_eq!(deck.draw(&mut rng), None);

        deck.discard(held.pop().unwrap());
        assert_eq!(deck.draw(&mut rng), None);
        assert_eq!(deck.discard_count(), 1);
    }
}
