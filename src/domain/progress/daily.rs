//! Daily Completion Projector - which daily habits were logged today.

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Percentage;
use crate::domain::impact::MainCategory;
use crate::domain::profile::LogEntry;

/// One of the four tracked daily habits.
///
/// `Lifestyle` has no slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackedHabit {
    Transport,
    Food,
    Waste,
    Energy,
}

impl TrackedHabit {
    /// Slots in display order.
    pub const ALL: [TrackedHabit; 4] = [
        TrackedHabit::Transport,
        TrackedHabit::Food,
        TrackedHabit::Waste,
        TrackedHabit::Energy,
    ];

    /// Habit a category counts toward, if any.
    pub fn for_category(category: MainCategory) -> Option<Self> {
        match category {
            MainCategory::Transport => Some(TrackedHabit::Transport),
            MainCategory::Food => Some(TrackedHabit::Food),
            MainCategory::Waste => Some(TrackedHabit::Waste),
            MainCategory::Energy => Some(TrackedHabit::Energy),
            MainCategory::Lifestyle => None,
        }
    }

    /// Short label for the habit card.
    pub fn label(&self) -> &'static str {
        match self {
            TrackedHabit::Transport => "Commute",
            TrackedHabit::Food => "Food",
            TrackedHabit::Waste => "Waste",
            TrackedHabit::Energy => "Energy",
        }
    }

    fn slot(&self) -> usize {
        match self {
            TrackedHabit::Transport => 0,
            TrackedHabit::Food => 1,
            TrackedHabit::Waste => 2,
            TrackedHabit::Energy => 3,
        }
    }
}

impl fmt::Display for TrackedHabit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-habit completion for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCompletion {
    pub date: NaiveDate,
    completed: [bool; 4],
}

impl DailyCompletion {
    /// Completion on the calendar day of `reference`, in its time zone.
    pub fn on<Tz: TimeZone>(logs: &[LogEntry], reference: &DateTime<Tz>) -> Self {
        let mut completed = [false; 4];
        for entry in logs
            .iter()
            .filter(|entry| entry.recorded_at_time().is_same_day_as(reference))
        {
            if let Some(habit) = TrackedHabit::for_category(entry.result().main_category) {
                completed[habit.slot()] = true;
            }
        }
        Self {
            date: reference.date_naive(),
            completed,
        }
    }

    /// Completion for today in the local time zone.
    pub fn today(logs: &[LogEntry]) -> Self {
        Self::on(logs, &Local::now())
    }

    pub fn is_complete(&self, habit: TrackedHabit) -> bool {
        self.completed[habit.slot()]
    }

    /// Habits with their done flag, in display order.
    pub fn habits(&self) -> impl Iterator<Item = (TrackedHabit, bool)> + '_ {
        TrackedHabit::ALL
            .into_iter()
            .map(move |habit| (habit, self.is_complete(habit)))
    }

    pub fn completed_count(&self) -> usize {
        self.completed.iter().filter(|done| **done).count()
    }

    pub fn total(&self) -> usize {
        TrackedHabit::ALL.len()
    }

    /// `completed_count / total` in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        self.completed_count() as f64 / self.total() as f64
    }

    pub fn percent(&self) -> Percentage {
        Percentage::of(self.completed_count(), self.total())
    }
}
