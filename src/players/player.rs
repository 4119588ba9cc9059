//! Per-seat state: hand, knowledge mask, scores, connection.
//!
//! ## Knowledge mask
//!
//! `known` holds the hand indices this player has legitimately seen. It is
//! kept aligned with the hand:
//! - removing a slot evicts it and shifts every greater index down by one
//! - replacing a slot's content evicts it (the new card is unseen)
//!
//! Callers that place a card deliberately (swapping a drawn card into their own
//! hand) re-mark the slot afterwards with `mark_known`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::Card;
use crate::core::{ActionError, PlayerId, SessionId};

/// A seated participant.
#[derive(Clone, Debug)]
pub struct Player {
    id: PlayerId,
    name: String,
    session: SessionId,
    connected: bool,
    hand: Vec<Card>,
    known: SmallVec<[usize; 8]>,
    round_score: i32,
    total_score: i32,
}

/// One slot of a player's own hand, as shown to that player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandSlotView {
    pub index: usize,
    pub known: bool,
    /// Card content, only for known slots.
    pub card: Option<Card>,
}

/// What every other seat may see about a player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPlayerView {
    pub id: PlayerId,
    pub name: String,
    pub card_count: usize,
    pub connected: bool,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, session: SessionId) -> Self {
        Self {
            id,
            name: name.into(),
            session,
            connected: true,
            hand: Vec::new(),
            known: SmallVec::new(),
            round_score: 0,
            total_score: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    /// Bind a new session and mark the seat connected again.
    pub fn reconnect(&mut self, session: SessionId) {
        self.session = session;
        self.connected = true;
    }

    // === Hand ===

    #[must_use]
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    #[must_use]
    pub fn hand_len(&self) -> usize {
        self.hand.len()
    }

    /// Card at `index`, or `InvalidIndex`.
    pub fn card_at(&self, index: usize) -> Result<Card, ActionError> {
        self.hand.get(index).copied().ok_or(ActionError::InvalidIndex {
            index,
            len: self.hand.len(),
        })
    }

    /// Append a card face down. Returns its index.
    pub fn add_card(&mut self, card: Card) -> usize {
        self.hand.push(card);
        self.hand.len() - 1
    }

    /// Remove the slot at `index`, compacting the hand and the knowledge mask.
    pub fn remove_card(&mut self, index: usize) -> Option<Card> {
        if index >= self.hand.len() {
            return None;
        }
        let card = self.hand.remove(index);
        self.known.retain(|known| *known != index);
        for known in &mut self.known {
            if *known > index {
                *known -= 1;
            }
        }
        Some(card)
    }

    /// Replace the slot at `index`, returning the old card. The slot becomes unknown.
    pub fn swap_card(&mut self, index: usize, card: Card) -> Option<Card> {
        let slot = self.hand.get_mut(index)?;
        let old = std::mem::replace(slot, card);
        self.forget(index);
        Some(old)
    }

    // === Knowledge ===

    /// Record that this player has seen slot `index`. Idempotent.
    pub fn mark_known(&mut self, index: usize) {
        if index < self.hand.len() && !self.known.contains(&index) {
            self.known.push(index);
        }
    }

    /// Drop slot `index` from the knowledge mask.
    pub fn forget(&mut self, index: usize) {
        self.known.retain(|known| *known != index);
    }

    #[must_use]
    pub fn is_known(&self, index: usize) -> bool {
        self.known.contains(&index)
    }

    #[must_use]
    pub fn known_count(&self) -> usize {
        self.known.len()
    }

    /// Known indices in ascending order.
    #[must_use]
    pub fn known_indices(&self) -> Vec<usize> {
        let mut indices = self.known.to_vec();
        indices.sort_unstable();
        indices
    }

    // === Scores ===

    /// Sum of card values over the current hand.
    #[must_use]
    pub fn score(&self) -> i32 {
        self.hand.iter().map(|card| card.value()).sum()
    }

    #[must_use]
    pub fn round_score(&self) -> i32 {
        self.round_score
    }

    #[must_use]
    pub fn total_score(&self) -> i32 {
        self.total_score
    }

    /// Record this round's score and fold it (plus any penalty) into the total.
    pub fn settle_round(&mut self, round_score: i32, penalty: i32) {
        self.round_score = round_score;
        self.total_score += round_score + penalty;
    }

    /// Clear round-scoped state. Totals and connection survive.
    pub fn reset(&mut self) {
        self.hand.clear();
        self.known.clear();
        self.round_score = 0;
    }

    // === Views ===

    /// Own hand with content revealed only for known slots.
    #[must_use]
    pub fn own_hand_view(&self) -> Vec<HandSlotView> {
        self.hand
            .iter()
            .enumerate()
            .map(|(index, card)| {
                let known = self.is_known(index);
                HandSlotView {
                    index,
                    known,
                    card: known.then_some(*card),
                }
            })
            .collect()
    }

    /// Face-down summary for other seats.
    #[must_use]
    pub fn public_view(&self) -> PublicPlayerView {
        PublicPlayerView {
            id: self.id,
            name: self.name.clone(),
            card_count: self.hand.len(),
            connected: self.connected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    fn player_with(cards: &[(Rank, Suit)]) -> Player {
        let mut player = Player::new(PlayerId::new(0), "ana", SessionId::new("s0"));
        for (rank, suit) in cards {
            player.add_card(Card::new(*rank, *suit));
        }
        player
    }

    #[test]
    fn test_add_card_returns_index() {
        let mut player = player_with(&[]);
        assert_eq!(player.add_card(Card::new(Rank::Ace, Suit::Hearts)), 0);
        assert_eq!(player.add_card(Card::new(Rank::Two, Suit::Hearts)), 1);
        assert!(!player.is_known(1));
    }

    #[test]
    fn test_remove_card_shifts_knowledge() {
        let mut player = player_with(&[
            (Rank::Ace, Suit::Hearts),
            (Rank::Two, Suit::Hearts),
            (Rank::Three, Suit::Hearts),
            (Rank::Four, Suit::Hearts),
        ]);
        player.mark_known(0);
        player.mark_known(1);
        player.mark_known(3);

        let removed = player.remove_card(1);

        assert_eq!(removed, Some(Card::new(Rank::Two, Suit::Hearts)));
        assert_eq!(player.known_indices(), vec![0, 2]);
        assert_eq!(player.card_at(2), Ok(Card::new(Rank::Four, Suit::Hearts)));
        assert_eq!(player.remove_card(9), None);
    }

    #[test]
    fn test_swap_card_evicts_knowledge() {
        let mut player = player_with(&[(Rank::Ace, Suit::Hearts), (Rank::Two, Suit::Hearts)]);
        player.mark_known(0);

        let old = player.swap_card(0, Card::new(Rank::King, Suit::Spades));

        assert_eq!(old, Some(Card::new(Rank::Ace, Suit::Hearts)));
        assert!(!player.is_known(0));
        assert_eq!(player.swap_card(5, Card::new(Rank::Ace, Suit::Clubs)), None);
    }

    #[test]
    fn test_mark_known_is_idempotent_and_bounded() {
        let mut player = player_with(&[(Rank::Ace, Suit::Hearts)]);
        player.mark_known(0);
        player.mark_known(0);
        player.mark_known(4);
        assert_eq!(player.known_count(), 1);
    }

    #[test]
    fn test_score() {
        let player = player_with(&[
            (Rank::Ace, Suit::Hearts),
            (Rank::King, Suit::Diamonds),
            (Rank::Queen, Suit::Clubs),
            (Rank::Five, Suit::Spades),
        ]);
        assert_eq!(player.score(), 1 - 1 + 10 + 5);
    }

    #[test]
    fn test_own_hand_view_masks_unknown() {
        let mut player = player_with(&[(Rank::Ace, Suit::Hearts), (Rank::Nine, Suit::Clubs)]);
        player.mark_known(1);

        let view = player.own_hand_view();

        assert_eq!(view[0], HandSlotView { index: 0, known: false, card: None });
        assert_eq!(
            view[1],
            HandSlotView {
                index: 1,
                known: true,
                card: Some(Card::new(Rank::Nine, Suit::Clubs)),
            }
        );
    }

    #[test]
    fn test_public_view_reveals_nothing() {
        let mut player = player_with(&[(Rank::Ace, Suit::Hearts), (Rank::Nine, Suit::Clubs)]);
        player.mark_known(0);

        let view = player.public_view();
        assert_eq!(view.card_count, 2);
        assert!(view.connected);

        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("rank"));
        assert!(!json.contains("known"));
    }

    #[test]
    fn test_settle_and_reset() {
        let mut player = player_with(&[(Rank::Five, Suit::Hearts)]);
        player.settle_round(5, 10);
        assert_eq!(player.round_score(), 5);
        assert_eq!(player.total_score(), 15);

        player.mark_known(0);
        player.reset();
        assert_eq!(player.hand_len(), 0);
        assert_eq!(player.known_count(), 0);
        assert_eq!(player.total_score(), 15);
    }

    #[test]
    fn test_reconnect_rebinds_session() {
        let mut player = player_with(&[]);
        player.disconnect();
        assert!(!player.is_connected());

        player.reconnect(SessionId::new("s9"));
        assert!(player.is_connected());
        assert_eq!(player.session().as_str(), "s9");
    }
}
