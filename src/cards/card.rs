//! Card identity and classification.
//!
//! A `Card` is an immutable `(rank, suit)` pair. Its score value and its power
//! are pure functions of that pair:
//!
//! | Rank         | Value | Power        |
//! |--------------|-------|--------------|
//! | A            | 1     | —            |
//! | 2–6          | face  | —            |
//! | 7, 8         | face  | peek own     |
//! | 9, 10        | face  | peek other   |
//! | J (red)      | 10    | —            |
//! | J (black)    | 10    | black jack   |
//! | Q            | 10    | queen swap   |
//! | K (red)      | −1    | —            |
//! | K (black)    | 10    | —            |

use serde::{Deserialize, Serialize};

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    #[must_use]
    pub const fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }

    #[must_use]
    pub const fn is_black(self) -> bool {
        !self.is_red()
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
            Suit::Spades => "spades",
        };
        f.write_str(name)
    }
}

/// Card rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "A")]
    Ace,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Pip count for A–10, `None` for court cards.
    #[must_use]
    pub const fn pips(self) -> Option<i32> {
        match self {
            Rank::Ace => Some(1),
            Rank::Two => Some(2),
            Rank::Three => Some(3),
            Rank::Four => Some(4),
            Rank::Five => Some(5),
            Rank::Six => Some(6),
            Rank::Seven => Some(7),
            Rank::Eight => Some(8),
            Rank::Nine => Some(9),
            Rank::Ten => Some(10),
            Rank::Jack | Rank::Queen | Rank::King => None,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Special ability granted by a drawn card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerKind {
    /// Look at one of your own cards.
    PeekOwn,
    /// Look at one card of another player.
    PeekOther,
    /// Exchange one card between any two players.
    QueenSwap,
    /// Look at two own cards, then optionally swap one away.
    BlackJack,
}

impl std::fmt::Display for PowerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PowerKind::PeekOwn => "peek own",
            PowerKind::PeekOther => "peek other",
            PowerKind::QueenSwap => "queen swap",
            PowerKind::BlackJack => "black jack",
        };
        f.write_str(name)
    }
}

/// A playing card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Score contribution of this card when held at round end.
    #[must_use]
    pub const fn value(self) -> i32 {
        match (self.rank, self.suit.is_red()) {
            (Rank::King, true) => -1,
            (Rank::Jack | Rank::Queen | Rank::King, _) => 10,
            _ => match self.rank.pips() {
                Some(pips) => pips,
                None => 0,
            },
        }
    }

    /// Power granted when this card is drawn, if any.
    #[must_use]
    pub const fn power(self) -> Option<PowerKind> {
        match self.rank {
            Rank::Seven | Rank::Eight => Some(PowerKind::PeekOwn),
            Rank::Nine | Rank::Ten => Some(PowerKind::PeekOther),
            Rank::Queen => Some(PowerKind::QueenSwap),
            Rank::Jack if self.suit.is_black() => Some(PowerKind::BlackJack),
            _ => None,
        }
    }

    /// Same rank, regardless of suit. Snaps, steals and double drops match on this.
    #[must_use]
    pub fn matches_rank(self, other: Card) -> bool {
        self.rank == other.rank
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} of {}", self.rank, self.suit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_values() {
        assert_eq!(Card::new(Rank::Ace, Suit::Spades).value(), 1);
        assert_eq!(Card::new(Rank::Two, Suit::Hearts).value(), 2);
        assert_eq!(Card::new(Rank::Seven, Suit::Clubs).value(), 7);
        assert_eq!(Card::new(Rank::Ten, Suit::Diamonds).value(), 10);
    }

    #[test]
    fn test_court_values() {
        assert_eq!(Card::new(Rank::King, Suit::Hearts).value(), -1);
        assert_eq!(Card::new(Rank::King, Suit::Diamonds).value(), -1);
        assert_eq!(Card::new(Rank::King, Suit::Spades).value(), 10);
        assert_eq!(Card::new(Rank::King, Suit::Clubs).value(), 10);
        assert_eq!(Card::new(Rank::Queen, Suit::Hearts).value(), 10);
        assert_eq!(Card::new(Rank::Jack, Suit::Diamonds).value(), 10);
    }

    #[test]
    fn test_powers() {
        assert_eq!(Card::new(Rank::Seven, Suit::Hearts).power(), Some(PowerKind::PeekOwn));
        assert_eq!(Card::new(Rank::Eight, Suit::Spades).power(), Some(PowerKind::PeekOwn));
        assert_eq!(Card::new(Rank::Nine, Suit::Clubs).power(), Some(PowerKind::PeekOther));
        assert_eq!(Card::new(Rank::Ten, Suit::Diamonds).power(), Some(PowerKind::PeekOther));
        assert_eq!(Card::new(Rank::Queen, Suit::Hearts).power(), Some(PowerKind::QueenSwap));
        assert_eq!(Card::new(Rank::Jack, Suit::Clubs).power(), Some(PowerKind::BlackJack));
        assert_eq!(Card::new(Rank::Jack, Suit::Spades).power(), Some(PowerKind::BlackJack));
    }

    #[test]
    fn test_powerless_cards() {
        assert_eq!(Card::new(Rank::Jack, Suit::Hearts).power(), None);
        assert_eq!(Card::new(Rank::Jack, Suit::Diamonds).power(), None);
        assert_eq!(Card::new(Rank::King, Suit::Spades).power(), None);
        assert_eq!(Card::new(Rank::Ace, Suit::Hearts).power(), None);
        assert_eq!(Card::new(Rank::Six, Suit::Clubs).power(), None);
    }

    #[test]
    fn test_rank_match_ignores_suit() {
        let a = Card::new(Rank::Five, Suit::Hearts);
        let b = Card::new(Rank::Five, Suit::Spades);
        let c = Card::new(Rank::Six, Suit::Hearts);
        assert!(a.matches_rank(b));
        assert!(!a.matches_rank(c));
    }

    #[test]
    fn test_wire_format() {
        let card = Card::new(Rank::Ten, Suit::Clubs);
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, r#"{"rank":"10","suit":"clubs"}"#);
        assert_eq!(serde_json::to_string(&PowerKind::BlackJack).unwrap(), r#""blackJack""#);
        assert_eq!(card.to_string(), "10 of clubs");
    }
}
