//! Collection wrapper types for displaying groups of domain objects.

use std::{fmt, ops::Index};

use crate::models::{Goal, HistoryEntry};

/// Newtype wrapper for displaying a user's goals.
///
/// # Examples
///
/// ```rust
/// use dayzero_core::{display::Goals, models::{Goal, Priority}};
/// use jiff::Timestamp;
///
/// let goals = Goals(vec![Goal::new("Learn Rust", Priority::High, None, None, Timestamp::now())]);
/// assert!(goals.to_string().contains("## Learn Rust (High)"));
/// assert_eq!(Goals(vec![]).to_string(), "No goals found.\n");
/// ```
pub struct Goals(pub Vec<Goal>);

impl Goals {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Goal> {
        self.0.iter()
    }
}

impl Index<usize> for Goals {
    type Output = Goal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for Goals {
    type Item = Goal;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Goals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No goals found.")
        } else {
            for goal in &self.0 {
                write!(f, "{goal}")?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying archived sessions.
pub struct HistoryEntries(pub Vec<HistoryEntry>);

impl HistoryEntries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.0.iter()
    }

    /// Mean score over all entries, `None` when there are none.
    pub fn average_score(&self) -> Option<u8> {
        if self.0.is_empty() {
            return None;
        }
        let total: u32 = self.0.iter().map(|entry| u32::from(entry.score)).sum();
        Some((f64::from(total) / self.0.len() as f64).round() as u8)
    }
}

impl Index<usize> for HistoryEntries {
    type Output = HistoryEntry;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for HistoryEntries {
    type Item = HistoryEntry;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for HistoryEntries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(average) = self.average_score() else {
            return writeln!(f, "No archived sessions found.");
        };

        writeln!(f, "{} sessions, average score {average}", self.0.len())?;
        writeln!(f)?;
        for entry in &self.0 {
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}
