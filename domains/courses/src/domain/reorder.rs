//! Chapter reordering
//!
//! Positions are dense and 1-based. A drag-and-drop move only rewrites the
//! chapters whose position actually changes, which on a dense course is the
//! contiguous span between the source and destination indexes.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use coursecraft_common::{Error, Result};

use super::entities::Chapter;

/// Position of one chapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionAssignment {
    pub id: Uuid,
    pub position: i32,
}

impl From<&Chapter> for PositionAssignment {
    fn from(chapter: &Chapter) -> Self {
        Self {
            id: chapter.id,
            position: chapter.position,
        }
    }
}

/// Current positions of a course's chapters, in list order
pub fn current_positions(chapters: &[Chapter]) -> Vec<PositionAssignment> {
    chapters.iter().map(PositionAssignment::from).collect()
}

fn position_for_index(index: usize) -> Result<i32> {
    i32::try_from(index + 1)
        .map_err(|_| Error::Validation(format!("Chapter index {} is out of range", index)))
}

/// Apply a move to the chapters in list order and return an assignment for
/// every chapter whose position changes.
///
/// The result always renumbers the whole list to `1..=n`, so a course that
/// somehow drifted from dense positions is repaired rather than left with
/// two chapters on the same number.
pub fn resolve_move(
    ordered: &[PositionAssignment],
    from_index: usize,
    to_index: usize,
) -> Result<Vec<PositionAssignment>> {
    let len = ordered.len();
    if from_index >= len || to_index >= len {
        return Err(Error::Validation(format!(
            "Move {} -> {} is out of range for {} chapters",
            from_index, to_index, len
        )));
    }

    let mut reordered = ordered.to_vec();
    let moved = reordered.remove(from_index);
    reordered.insert(to_index, moved);

    let mut assignments = Vec::new();
    for (index, current) in reordered.iter().enumerate() {
        let position = position_for_index(index)?;
        if current.position != position {
            assignments.push(PositionAssignment {
                id: current.id,
                position,
            });
        }
    }
    Ok(assignments)
}

/// Check client-supplied assignments against the course's chapters.
///
/// Every id must belong to the course and appear once. Applied on top of
/// the current positions, the result must be exactly `1..=chapter_count`.
pub fn validate_assignments(
    current: &[PositionAssignment],
    updates: &[PositionAssignment],
) -> Result<()> {
    if updates.is_empty() {
        return Err(Error::Validation(
            "Reorder requires at least one chapter".to_string(),
        ));
    }

    let mut positions: HashMap<Uuid, i32> =
        current.iter().map(|c| (c.id, c.position)).collect();
    let max_position = i32::try_from(current.len()).unwrap_or(i32::MAX);
    let mut seen_ids = HashSet::with_capacity(updates.len());
    let mut seen_positions = HashSet::with_capacity(updates.len());

    for update in updates {
        if !positions.contains_key(&update.id) {
            return Err(Error::BadRequest(format!(
                "Chapter {} does not belong to this course",
                update.id
            )));
        }
        if !seen_ids.insert(update.id) {
            return Err(Error::BadRequest(format!(
                "Chapter {} appears more than once",
                update.id
            )));
        }
        if update.position < 1 || update.position > max_position {
            return Err(Error::BadRequest(format!(
                "Position {} is outside 1..={}",
                update.position, max_position
            )));
        }
        if !seen_positions.insert(update.position) {
            return Err(Error::BadRequest(format!(
                "Position {} is assigned more than once",
                update.position
            )));
        }
        positions.insert(update.id, update.position);
    }

    let mut result: Vec<i32> = positions.into_values().collect();
    result.sort_unstable();
    if let Some(clash) = result.windows(2).find(|w| w[0] == w[1]) {
        return Err(Error::BadRequest(format!(
            "Reorder leaves more than one chapter at position {}",
            clash[0]
        )));
    }
    if result.iter().zip(1..).any(|(position, expected)| *position != expected) {
        return Err(Error::BadRequest(format!(
            "Reorder must leave chapter positions as 1..={}",
            max_position
        )));
    }

    Ok(())
}
