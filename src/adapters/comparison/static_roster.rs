//! Static comparison roster.
//!
//! A fixed set of participants the user is ranked against. There is no
//! multi-user backend, so this stands in for one.

use async_trait::async_trait;

use crate::domain::foundation::UserId;
use crate::domain::leaderboard::Participant;
use crate::ports::{ComparisonError, ComparisonSource};

const AVATAR_BASE: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=";

/// Comparison source backed by an in-process list.
#[derive(Debug, Clone)]
pub struct StaticComparisonSource {
    participants: Vec<Participant>,
}

impl StaticComparisonSource {
    /// The built-in roster.
    pub fn new() -> Self {
        Self {
            participants: default_roster(),
        }
    }

    /// A custom roster, ranked in the given order on ties.
    pub fn with_participants(participants: Vec<Participant>) -> Self {
        Self { participants }
    }
}

impl Default for StaticComparisonSource {
    fn default() -> Self {
        Self::new()
    }
}

fn roster_entry(id: &str, name: &str, seed: &str, points: u32) -> Option<Participant> {
    let id = UserId::new(id).ok()?;
    Some(Participant::new(
        id,
        name,
        format!("{}{}", AVATAR_BASE, seed),
        points,
    ))
}

fn default_roster() -> Vec<Participant> {
    [
        roster_entry("2", "Alice Green", "Alice", 450),
        roster_entry("3", "Bob Solar", "Bob", 320),
        roster_entry("4", "Charlie Compost", "Charlie", 580),
        roster_entry("5", "Dana Wind", "Dana", 120),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[async_trait]
impl ComparisonSource for StaticComparisonSource {
    async fn participants(&self) -> Result<Vec<Participant>, ComparisonError> {
        Ok(self.participants.clone())
    }
}
