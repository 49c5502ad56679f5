//! The process-wide list of sequences.

use crate::{Sequence, SequenceId};
use serde::Serialize;

/// Ordered sequences, newest first.
///
/// A value type: each operation returns a new collection, leaving siblings of
/// the targeted sequence equal to what they were. Lookups are by
/// [`SequenceId`], never by position.
///
/// # Examples
///
/// ```
/// use storyboard_core::{SceneArtifact, Sequence, SequenceCollection};
///
/// let first = Sequence::new("one", "", vec![SceneArtifact::new("p", "")]).unwrap();
/// let second = Sequence::new("two", "", vec![SceneArtifact::new("p", "")]).unwrap();
///
/// let collection = SequenceCollection::default()
///     .prepend(first.clone())
///     .prepend(second.clone());
/// assert_eq!(collection.first().map(|s| s.base_prompt().as_str()), Some("two"));
///
/// let removed = collection.remove(first.id());
/// assert_eq!(removed.len(), 1);
/// assert_eq!(removed.remove(first.id()), removed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct SequenceCollection {
    sequences: Vec<Sequence>,
}

impl SequenceCollection {
    /// Return a copy with `sequence` inserted at the front.
    pub fn prepend(&self, sequence: Sequence) -> Self {
        let mut sequences = Vec::with_capacity(self.sequences.len() + 1);
        sequences.push(sequence);
        sequences.extend(self.sequences.iter().cloned());
        Self { sequences }
    }

    /// Return a copy without the sequence `id`. Absent ids are a no-op.
    pub fn remove(&self, id: &SequenceId) -> Self {
        Self {
            sequences: self
                .sequences
                .iter()
                .filter(|s| s.id() != id)
                .cloned()
                .collect(),
        }
    }

    /// Return a copy with the sequence `id` replaced by `f(sequence)`.
    ///
    /// Returns `None` when no sequence has that id, so callers can tell a
    /// late result for a deleted target apart from an applied one.
    pub fn update<F>(&self, id: &SequenceId, f: F) -> Option<Self>
    where
        F: FnOnce(&Sequence) -> Sequence,
    {
        let position = self.sequences.iter().position(|s| s.id() == id)?;
        let mut sequences = self.sequences.clone();
        sequences[position] = f(&self.sequences[position]);
        Some(Self { sequences })
    }

    /// Look up a sequence by id.
    pub fn get(&self, id: &SequenceId) -> Option<&Sequence> {
        self.sequences.iter().find(|s| s.id() == id)
    }

    /// Whether a sequence with this id exists.
    pub fn contains(&self, id: &SequenceId) -> bool {
        self.get(id).is_some()
    }

    /// Newest sequence.
    pub fn first(&self) -> Option<&Sequence> {
        self.sequences.first()
    }

    /// Iterate newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Sequence> {
        self.sequences.iter()
    }

    /// Number of sequences.
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

impl<'a> IntoIterator for &'a SequenceCollection {
    type Item = &'a Sequence;
    type IntoIter = std::slice::Iter<'a, Sequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sequences.iter()
    }
}
