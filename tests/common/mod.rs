//! Shared setup for integration tests: seated tables and stacked deals.

#![allow(dead_code)]

use cobra_engine::{Card, Deck, Match, MatchConfig, PlayerId, Rank, Suit, RoomCode, SessionId};

pub const fn card(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

pub fn session(seat: usize) -> SessionId {
    SessionId::new(format!("session-{seat}"))
}

/// A match with `count` connected players named `p0`, `p1`, …
pub fn table(count: usize) -> (Match, Vec<PlayerId>) {
    let mut game = Match::new(RoomCode::new("TEST"), MatchConfig::default().with_seed(42));
    let ids = (0..count)
        .map(|seat| game.add_player(format!("p{seat}"), session(seat)).unwrap())
        .collect();
    (game, ids)
}

/// Deal a round from a stacked deck.
///
/// `hands[i]` lands in seat `i` in slot order, `flip` starts the discard
/// pile and `draws` are the next cards drawn, in order.
pub fn deal(game: &mut Match, hands: &[[Card; 4]], flip: Card, draws: &[Card]) {
    let mut order: Vec<Card> = hands.iter().flatten().copied().collect();
    order.push(flip);
    order.extend_from_slice(draws);
    let deck = Deck::stacked(order).unwrap();
    game.start_game_with_deck(deck).unwrap();
}

/// Every connected player peeks slots 0 and 1, then play starts.
pub fn peek_and_play(game: &mut Match, ids: &[PlayerId]) {
    for &id in ids {
        if game.player(id).is_some_and(|p| p.is_connected()) {
            game.initial_peek(id, &[0, 1]).unwrap();
        }
    }
    game.start_playing().unwrap();
}

/// Seat `count` players, deal the given hands and start play.
pub fn playing(hands: &[[Card; 4]], flip: Card, draws: &[Card]) -> (Match, Vec<PlayerId>) {
    let (mut game, ids) = table(hands.len());
    deal(&mut game, hands, flip, draws);
    peek_and_play(&mut game, &ids);
    (game, ids)
}

pub fn hand_of(game: &Match, id: PlayerId) -> Vec<Card> {
    game.player(id).unwrap().hand().to_vec()
}

pub fn known_of(game: &Match, id: PlayerId) -> Vec<usize> {
    game.player(id).unwrap().known_indices()
}
