use super::card::{Card, Symbol};
use rand::{Rng, seq::SliceRandom};

pub const BOARD_SIZE: usize = Symbol::ALL.len() * 2;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Deals a fresh board: two cards per symbol, Fisher–Yates shuffled with `rng`.
    pub fn deal<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards: Vec<Card> = Symbol::ALL
            .into_iter()
            .flat_map(|symbol| [Card::new(symbol), Card::new(symbol)])
            .collect();

        cards.shuffle(rng);
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub(super) fn get_mut(&mut self, index: usize) -> Option<&mut Card> {
        self.cards.get_mut(index)
    }

    pub fn symbols_match(&self, [first, second]: [usize; 2]) -> bool {
        match (self.cards.get(first), self.cards.get(second)) {
            (Some(a), Some(b)) => a.symbol == b.symbol,
            _ => false,
        }
    }

    pub(super) fn mark_matched(&mut self, pair: [usize; 2]) {
        for index in pair {
            if let Some(card) = self.cards.get_mut(index) {
                card.matched = true;
            }
        }
    }

    pub(super) fn hide(&mut self, pair: [usize; 2]) {
        for index in pair {
            if let Some(card) = self.cards.get_mut(index) {
                card.face_up = false;
            }
        }
    }

    /// Number of cards that are face-up and not yet matched.
    pub fn pending_count(&self) -> usize {
        self.cards.iter().filter(|card| card.is_pending()).count()
    }

    pub fn all_matched(&self) -> bool {
        !self.cards.is_empty() && self.cards.iter().all(|card| card.matched)
    }
}
