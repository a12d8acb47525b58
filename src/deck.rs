//! Deck state machine: card list, cursor, and visibility flag.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::models::Card;

/// Errors surfaced by deck operations. All recoverable; the caller decides
/// how to present them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("the deck has no cards")]
    EmptyDeck,

    #[error("{field} cannot be empty")]
    BlankField { field: &'static str },
}

/// Single authority over deck contents and viewing position.
///
/// Invariants: the cursor stays in `[0, len - 1]` whenever the deck is
/// non-empty and is 0 when it is empty; a failed operation leaves the deck,
/// cursor, and visibility flag exactly as they were.
#[derive(Debug)]
pub struct DeckController {
    cards: Vec<Card>,
    cursor: usize,
    front_visible: bool,
}

impl DeckController {
    /// Build a deck from (front, back) pairs. Pairs that are blank after
    /// trimming are skipped, so a seed file with stray empty rows still
    /// loads cleanly.
    pub fn new<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let cards: Vec<Card> = pairs
            .into_iter()
            .filter_map(|(front, back)| {
                let front = front.trim();
                let back = back.trim();
                if front.is_empty() || back.is_empty() {
                    None
                } else {
                    Some(Card::new(front.to_string(), back.to_string()))
                }
            })
            .collect();

        debug!("deck initialized with {} cards", cards.len());

        Self {
            cards,
            cursor: 0,
            front_visible: true,
        }
    }

    /// Uniformly permute the deck, then reset to the front of the first card.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.cursor = 0;
        self.front_visible = true;
    }

    /// The card under the cursor.
    pub fn current(&self) -> Result<&Card, DeckError> {
        self.cards.get(self.cursor).ok_or(DeckError::EmptyDeck)
    }

    /// Toggle between question and answer. No-op on an empty deck.
    pub fn flip(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.front_visible = !self.front_visible;
    }

    /// Advance the cursor, wrapping past the last card back to the first.
    /// Always lands on the question side. No-op on an empty deck.
    pub fn next(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.cards.len();
        self.front_visible = true;
    }

    /// Step the cursor back, wrapping before the first card to the last.
    /// Always lands on the question side. No-op on an empty deck.
    pub fn previous(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.cursor = (self.cursor + self.cards.len() - 1) % self.cards.len();
        self.front_visible = true;
    }

    /// Append a new card and make it current, question side up.
    pub fn add_card(&mut self, front: &str, back: &str) -> Result<&Card, DeckError> {
        let (front, back) = validated(front, back)?;
        self.cards.push(Card::new(front, back));
        self.cursor = self.cards.len() - 1;
        self.front_visible = true;

        let card = &self.cards[self.cursor];
        debug!("added card {} ({} total)", card.id, self.cards.len());
        Ok(card)
    }

    /// Replace both sides of the current card in place. Cursor and
    /// visibility are unchanged.
    pub fn edit_current(&mut self, front: &str, back: &str) -> Result<(), DeckError> {
        if self.cards.is_empty() {
            return Err(DeckError::EmptyDeck);
        }
        let (front, back) = validated(front, back)?;

        let card = &mut self.cards[self.cursor];
        card.front = front;
        card.back = back;
        debug!("edited card {}", card.id);
        Ok(())
    }

    /// Remove the current card and return it. The cursor is clamped to the
    /// new last index when it pointed past the end, and the next card shows
    /// its question side.
    ///
    /// Confirmation is the caller's job; this removes unconditionally.
    pub fn delete_current(&mut self) -> Result<Card, DeckError> {
        if self.cards.is_empty() {
            return Err(DeckError::EmptyDeck);
        }

        let removed = self.cards.remove(self.cursor);
        if self.cards.is_empty() {
            self.cursor = 0;
        } else {
            self.cursor = self.cursor.min(self.cards.len() - 1);
        }
        self.front_visible = true;

        debug!("deleted card {} ({} left)", removed.id, self.cards.len());
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_front_visible(&self) -> bool {
        self.front_visible
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

/// Trim both sides, rejecting blanks before any mutation happens.
fn validated(front: &str, back: &str) -> Result<(String, String), DeckError> {
    let front = front.trim();
    if front.is_empty() {
        return Err(DeckError::BlankField { field: "question" });
    }
    let back = back.trim();
    if back.is_empty() {
        return Err(DeckError::BlankField { field: "answer" });
    }
    Ok((front.to_string(), back.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(f, b)| (f.to_string(), b.to_string()))
            .collect()
    }

    fn sample_deck() -> DeckController {
        DeckController::new(pairs(&[("Q1", "A1"), ("Q2", "A2"), ("Q3", "A3")]))
    }

    #[test]
    fn new_deck_starts_at_first_card_front() {
        let deck = sample_deck();
        assert_eq!(deck.len(), 3);
        assert_eq!(deck.cursor(), 0);
        assert!(deck.is_front_visible());
        assert_eq!(deck.current().unwrap().front, "Q1");
    }

    #[test]
    fn seeding_skips_blank_pairs() {
        let deck = DeckController::new(pairs(&[("Q1", "A1"), ("", "A2"), ("Q3", "   ")]));
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.current().unwrap().front, "Q1");
    }

    #[test]
    fn empty_seed_yields_empty_deck() {
        let deck = DeckController::new(Vec::new());
        assert!(deck.is_empty());
        assert_eq!(deck.cursor(), 0);
        assert_eq!(deck.current(), Err(DeckError::EmptyDeck));
    }

    #[test]
    fn next_wraps_circularly() {
        let mut deck = DeckController::new(pairs(&[("Q1", "A1"), ("Q2", "A2")]));
        deck.next();
        assert_eq!(deck.cursor(), 1);
        deck.next();
        assert_eq!(deck.cursor(), 0);
    }

    #[test]
    fn previous_wraps_from_first_to_last() {
        let mut deck = sample_deck();
        deck.previous();
        assert_eq!(deck.cursor(), 2);
    }

    #[test]
    fn next_then_previous_restores_cursor() {
        let mut deck = sample_deck();
        deck.next();
        deck.next();
        let at = deck.cursor();
        deck.next();
        deck.previous();
        assert_eq!(deck.cursor(), at);
    }

    #[test]
    fn n_steps_return_to_start() {
        let mut deck = sample_deck();
        deck.next();
        let start = deck.cursor();
        for _ in 0..deck.len() {
            deck.next();
        }
        assert_eq!(deck.cursor(), start);
    }

    #[test]
    fn navigation_resets_to_front() {
        let mut deck = sample_deck();
        deck.flip();
        assert!(!deck.is_front_visible());
        deck.next();
        assert!(deck.is_front_visible());

        deck.flip();
        deck.previous();
        assert!(deck.is_front_visible());
    }

    #[test]
    fn flip_twice_restores_visibility() {
        let mut deck = sample_deck();
        deck.flip();
        deck.flip();
        assert!(deck.is_front_visible());
    }

    #[test]
    fn flip_and_navigation_are_noops_on_empty_deck() {
        let mut deck = DeckController::new(Vec::new());
        deck.flip();
        deck.next();
        deck.previous();
        assert!(deck.is_empty());
        assert_eq!(deck.cursor(), 0);
        assert!(deck.is_front_visible());
    }

    #[test]
    fn add_card_appends_and_moves_cursor() {
        let mut deck = sample_deck();
        deck.flip();
        let id = deck.add_card("Q4", "A4").unwrap().id.clone();
        assert_eq!(deck.len(), 4);
        assert_eq!(deck.cursor(), 3);
        assert!(deck.is_front_visible());
        assert_eq!(deck.current().unwrap().id, id);
    }

    #[test]
    fn add_card_trims_whitespace() {
        let mut deck = DeckController::new(Vec::new());
        deck.add_card("  Q  ", "\tA\n").unwrap();
        let card = deck.current().unwrap();
        assert_eq!(card.front, "Q");
        assert_eq!(card.back, "A");
    }

    #[test]
    fn add_card_to_empty_deck() {
        let mut deck = DeckController::new(Vec::new());
        deck.add_card("Q", "A").unwrap();
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.cursor(), 0);
        assert!(deck.is_front_visible());
    }

    #[test]
    fn add_card_rejects_blank_input_without_mutation() {
        let mut deck = sample_deck();
        deck.next();
        deck.flip();

        let err = deck.add_card("", "A").unwrap_err();
        assert_eq!(err, DeckError::BlankField { field: "question" });
        let err = deck.add_card("Q", "   ").unwrap_err();
        assert_eq!(err, DeckError::BlankField { field: "answer" });

        assert_eq!(deck.len(), 3);
        assert_eq!(deck.cursor(), 1);
        assert!(!deck.is_front_visible());
    }

    #[test]
    fn edit_current_replaces_both_sides_in_place() {
        let mut deck = sample_deck();
        deck.next();
        deck.flip();
        let id = deck.current().unwrap().id.clone();

        deck.edit_current(" New Q ", "New A").unwrap();

        let card = deck.current().unwrap();
        assert_eq!(card.id, id);
        assert_eq!(card.front, "New Q");
        assert_eq!(card.back, "New A");
        assert_eq!(deck.len(), 3);
        assert_eq!(deck.cursor(), 1);
        assert!(!deck.is_front_visible());
    }

    #[test]
    fn edit_current_fails_on_empty_deck() {
        let mut deck = DeckController::new(Vec::new());
        assert_eq!(deck.edit_current("Q", "A"), Err(DeckError::EmptyDeck));
    }

    #[test]
    fn edit_current_rejects_blank_input_without_mutation() {
        let mut deck = sample_deck();
        let err = deck.edit_current("Q", "").unwrap_err();
        assert_eq!(err, DeckError::BlankField { field: "answer" });
        assert_eq!(deck.current().unwrap().front, "Q1");
        assert_eq!(deck.current().unwrap().back, "A1");
    }

    #[test]
    fn delete_current_removes_card_under_cursor() {
        let mut deck = sample_deck();
        deck.next();
        let removed = deck.delete_current().unwrap();
        assert_eq!(removed.front, "Q2");
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.cursor(), 1);
        assert_eq!(deck.current().unwrap().front, "Q3");
    }

    #[test]
    fn delete_last_card_clamps_cursor() {
        let mut deck = sample_deck();
        deck.previous();
        assert_eq!(deck.cursor(), 2);
        deck.delete_current().unwrap();
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.cursor(), 1);
    }

    #[test]
    fn delete_down_to_empty_resets_cursor() {
        let mut deck = DeckController::new(pairs(&[("Q1", "A1")]));
        deck.flip();
        deck.delete_current().unwrap();
        assert!(deck.is_empty());
        assert_eq!(deck.cursor(), 0);
        assert!(deck.is_front_visible());
        assert_eq!(deck.current(), Err(DeckError::EmptyDeck));
    }

    #[test]
    fn delete_current_fails_on_empty_deck() {
        let mut deck = DeckController::new(Vec::new());
        assert_eq!(deck.delete_current().unwrap_err(), DeckError::EmptyDeck);
    }

    #[test]
    fn shuffle_permutes_and_resets_view() {
        let seed: Vec<(String, String)> = (0..12)
            .map(|i| (format!("Q{i}"), format!("A{i}")))
            .collect();
        let mut deck = DeckController::new(seed);
        deck.next();
        deck.flip();

        let mut before: Vec<String> = deck.cards().iter().map(|c| c.id.clone()).collect();
        let mut rng = StdRng::seed_from_u64(7);
        deck.shuffle(&mut rng);

        assert_eq!(deck.cursor(), 0);
        assert!(deck.is_front_visible());

        let mut after: Vec<String> = deck.cards().iter().map(|c| c.id.clone()).collect();
        assert_eq!(deck.len(), 12);
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }
}
