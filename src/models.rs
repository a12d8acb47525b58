//! Data models for flashcards and the bundled starter deck.

use chrono::{DateTime, Local};
use log::warn;
use serde::Deserialize;
use uuid::Uuid;

/// A single flashcard.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: String,
    pub front: String,
    pub back: String,
    pub created_at: DateTime<Local>,
}

impl Card {
    pub fn new(front: String, back: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string()[..8].to_string(),
            front,
            back,
            created_at: Local::now(),
        }
    }
}

/// One entry in the bundled starter deck.
#[derive(Debug, Deserialize)]
struct SeedCard {
    front: String,
    back: String,
}

/// Bundled deck: study-ready sample cards for first launch.
const BUNDLED_STARTER: &str = include_str!("../bundled_decks/starter.json");

/// The (front, back) pairs the session is seeded with.
pub fn starter_cards() -> Vec<(String, String)> {
    match serde_json::from_str::<Vec<SeedCard>>(BUNDLED_STARTER) {
        Ok(seeds) => seeds.into_iter().map(|s| (s.front, s.back)).collect(),
        Err(e) => {
            warn!("bundled starter deck is malformed: {e}");
            Vec::new()
        }
    }
}
