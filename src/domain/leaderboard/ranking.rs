//! Ranking Projector - ranked comparison of the user against other participants.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;
use crate::domain::profile::UserProfile;

/// Another participant in the comparison set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: UserId,
    pub name: String,
    pub avatar_url: String,
    pub points: u32,
}

impl Participant {
    /// Creates a participant.
    pub fn new(id: UserId, name: impl Into<String>, avatar_url: impl Into<String>, points: u32) -> Self {
        Self {
            id,
            name: name.into(),
            avatar_url: avatar_url.into(),
            points,
        }
    }
}

/// One row of the leaderboard. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: UserId,
    pub name: String,
    pub avatar_url: String,
    pub points: u32,
    pub is_current_user: bool,
    /// 1-based, assigned after sorting.
    pub rank: u32,
}

/// Builds the ranked leaderboard.
pub struct RankingProjector;

impl RankingProjector {
    /// Ranks the current user against `comparison`.
    ///
    /// The comparison set enters first, in the given order, and the user
    /// last; a stable descending sort by points then breaks ties by that
    /// input order. A comparison entry with the user's own id is skipped so
    /// the user appears exactly once. Guests rank like anyone else.
    pub fn rankings(profile: &UserProfile, comparison: &[Participant]) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = comparison
            .iter()
            .filter(|participant| &participant.id != profile.id())
            .map(|participant| LeaderboardEntry {
                id: participant.id.clone(),
                name: participant.name.clone(),
                avatar_url: participant.avatar_url.clone(),
                points: participant.points,
                is_current_user: false,
                rank: 0,
            })
            .collect();

        entries.push(LeaderboardEntry {
            id: profile.id().clone(),
            name: profile.name().to_string(),
            avatar_url: profile.avatar_url().to_string(),
            points: profile.total_points(),
            is_current_user: true,
            rank: 0,
        });

        entries.sort_by(|a, b| b.points.cmp(&a.points));
        for (index, entry) in entries.iter_mut().enumerate() {
            entry.rank = index as u32 + 1;
        }
        entries
    }

    /// The current user's row.
    pub fn current_user(entries: &[LeaderboardEntry]) -> Option<&LeaderboardEntry> {
        entries.iter().find(|entry| entry.is_current_user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::impact::{fixtures, MainCategory, MediumTag};
    use crate::domain::profile::{save, Identity, LogEntry};
    use proptest::prelude::*;

    fn participant(id: &str, points: u32) -> Participant {
        Participant::new(UserId::new(id).unwrap(), id, "", points)
    }

    fn roster() -> Vec<Participant> {
        vec![
            participant("alice", 450),
            participant("bob", 320),
            participant("charlie", 580),
            participant("dana", 120),
        ]
    }

    fn profile_with_points(score: u8) -> UserProfile {
        let identity =
            Identity::new(UserId::new("me").unwrap(), "Eco Warrior", "me@example.com").unwrap();
        save(
            UserProfile::identified(identity),
            LogEntry::new(MediumTag::Text, fixtures::result(MainCategory::Food, score), None),
        )
    }

    #[test]
    fn sorts_descending_with_contiguous_ranks() {
        let entries = RankingProjector::rankings(&profile_with_points(0), &roster());

        let points: Vec<u32> = entries.iter().map(|e| e.points).collect();
        assert_eq!(points, vec![580, 450, 320, 120, 100]);
        let ranks: Vec<u32> = entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
        assert!(entries[4].is_current_user);
    }

    #[test]
    fn user_ranks_after_tied_participant() {
        let roster = vec![participant("rival", 80)];
        let entries = RankingProjector::rankings(&profile_with_points(20), &roster);

        assert_eq!(entries[0].id.as_str(), "rival");
        assert_eq!(entries[1].rank, 2);
        assert!(entries[1].is_current_user);
    }

    #[test]
    fn guest_is_ranked_too() {
        let guest = UserProfile::guest();
        let entries = RankingProjector::rankings(&guest, &roster());

        let me = RankingProjector::current_user(&entries).unwrap();
        assert_eq!(me.points, 0);
        assert_eq!(me.rank, 5);
    }

    #[test]
    fn empty_comparison_set_ranks_user_first() {
        let entries = RankingProjector::rankings(&profile_with_points(50), &[]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].rank, 1);
    }

    #[test]
    fn comparison_entry_with_own_id_is_skipped() {
        let mut roster = roster();
        roster.push(participant("me", 9_999));
        let entries = RankingProjector::rankings(&profile_with_points(50), &roster);

        assert_eq!(entries.iter().filter(|e| e.id.as_str() == "me").count(), 1);
        assert_eq!(entries.len(), 5);
    }

    proptest! {
        #[test]
        fn ranking_is_total_order_with_user_once(
            points in prop::collection::vec(0u32..1_000, 0..12),
            score in 0u8..=100,
        ) {
            let roster: Vec<Participant> = points
                .iter()
                .enumerate()
                .map(|(i, p)| participant(&format!("p{}", i), *p))
                .collect();

            let entries = RankingProjector::rankings(&profile_with_points(score), &roster);

            prop_assert_eq!(entries.len(), roster.len() + 1);
            prop_assert_eq!(entries.iter().filter(|e| e.is_current_user).count(), 1);
            for (index, entry) in entries.iter().enumerate() {
                prop_assert_eq!(entry.rank as usize, index + 1);
            }
            for pair in entries.windows(2) {
                prop_assert!(pair[0].points >= pair[1].points);
            }
        }
    }
}
