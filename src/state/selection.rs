use thiserror::Error;
use tracing::debug;

use super::data::{ImageEntry, Page};
use crate::compile::paginate;

/// Lifecycle of a selection session
///
/// A session is finalized and consumed in one step: once `finalize`
/// hands the pages over, the session rejects any further edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fresh from the scanner, nothing toggled or moved yet
    Unreviewed,
    /// The user has toggled, moved or removed at least once
    Reviewing,
    /// Handed to the document writer (terminal)
    Consumed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Which entries `finalize` hands over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeMode {
    /// Grid flow: only entries whose include flag is set
    Included,
    /// Review flow: the whole current ordering
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("This selection has already been compiled")]
    Consumed,
    #[error("No image at position {index} (list has {len})")]
    OutOfRange { index: usize, len: usize },
    #[error("Cannot remove the last image")]
    LastEntry,
    #[error("No images selected for compilation")]
    NothingIncluded,
}

/// The user-editable, ordered list of candidate images
///
/// Backs both the grid screen (include flags) and the review screen
/// (focus, reorder, remove). `included[i]` always describes `entries[i]`.
#[derive(Debug, Clone)]
pub struct SelectionState {
    entries: Vec<ImageEntry>,
    included: Vec<bool>,
    current: usize,
    phase: Phase,
}

impl SelectionState {
    /// Start a grid session with nothing included
    pub fn new(entries: Vec<ImageEntry>) -> Self {
        let included = vec![false; entries.len()];
        Self {
            entries,
            included,
            current: 0,
            phase: Phase::Unreviewed,
        }
    }

    /// Start a grid session with include flags already set (e.g. by the classifier).
    /// Missing flags count as not included.
    pub fn preselected(entries: Vec<ImageEntry>, flags: Vec<bool>) -> Self {
        let mut state = Self::new(entries);
        for (slot, flag) in state.included.iter_mut().zip(flags) {
            *slot = flag;
        }
        state
    }

    /// Start a review session over an already chosen list
    pub fn for_review(entries: Vec<ImageEntry>) -> Self {
        let included = vec![true; entries.len()];
        Self {
            entries,
            included,
            current: 0,
            phase: Phase::Unreviewed,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn is_included(&self, index: usize) -> bool {
        self.included.get(index).copied().unwrap_or(false)
    }

    pub fn included_count(&self) -> usize {
        self.included.iter().filter(|&&flag| flag).count()
    }

    /// Index of the entry the review screen is showing
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_entry(&self) -> Option<&ImageEntry> {
        self.entries.get(self.current)
    }

    /// Flip the include flag at `index`. Returns the new flag.
    pub fn toggle_include(&mut self, index: usize) -> Result<bool, SelectionError> {
        self.check_index(index)?;
        self.touch();

        let flag = &mut self.included[index];
        *flag = !*flag;
        Ok(*flag)
    }

    pub fn select_all(&mut self) -> Result<(), SelectionError> {
        self.set_all(true)
    }

    pub fn select_none(&mut self) -> Result<(), SelectionError> {
        self.set_all(false)
    }

    fn set_all(&mut self, flag: bool) -> Result<(), SelectionError> {
        self.check_live()?;
        self.touch();
        self.included.iter_mut().for_each(|slot| *slot = flag);
        Ok(())
    }

    /// Swap the entry at `index` with its neighbour in `direction`.
    ///
    /// Moving the first entry up or the last entry down leaves everything
    /// as it was. Otherwise focus follows the moved entry. Returns the
    /// entry's index after the call.
    pub fn move_entry(&mut self, index: usize, direction: Direction) -> Result<usize, SelectionError> {
        self.check_index(index)?;

        let target = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.entries.len() => index + 1,
            _ => return Ok(index),
        };

        self.touch();
        self.entries.swap(index, target);
        self.included.swap(index, target);
        self.current = target;
        Ok(target)
    }

    /// Delete the entry at `index`. The list never drops below one entry.
    pub fn remove(&mut self, index: usize) -> Result<ImageEntry, SelectionError> {
        self.check_index(index)?;
        if self.entries.len() == 1 {
            return Err(SelectionError::LastEntry);
        }

        self.touch();
        self.included.remove(index);
        let removed = self.entries.remove(index);
        if self.current >= self.entries.len() {
            self.current = self.entries.len() - 1;
        }

        debug!("Removed {} from selection", removed.file_name());
        Ok(removed)
    }

    pub fn next(&mut self) {
        if self.current + 1 < self.entries.len() {
            self.current += 1;
        }
    }

    pub fn previous(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Jump to `index`, clamped to the list
    pub fn focus(&mut self, index: usize) {
        self.current = index.min(self.entries.len().saturating_sub(1));
    }

    /// Hand over the ordered pages and close the session.
    ///
    /// A rejected call (nothing to compile) leaves the session editable.
    pub fn finalize(&mut self, mode: FinalizeMode) -> Result<Vec<Page>, SelectionError> {
        self.take(mode).map(paginate)
    }

    /// Close this grid session and open a review session over its included entries
    pub fn into_review(&mut self) -> Result<SelectionState, SelectionError> {
        self.take(FinalizeMode::Included).map(SelectionState::for_review)
    }

    fn take(&mut self, mode: FinalizeMode) -> Result<Vec<ImageEntry>, SelectionError> {
        self.check_live()?;

        let chosen: Vec<ImageEntry> = match mode {
            FinalizeMode::Included => self
                .entries
                .iter()
                .zip(&self.included)
                .filter(|(_, flag)| **flag)
                .map(|(entry, _)| entry.clone())
                .collect(),
            FinalizeMode::All => self.entries.clone(),
        };

        if chosen.is_empty() {
            return Err(SelectionError::NothingIncluded);
        }

        self.entries.clear();
        self.included.clear();
        self.current = 0;
        self.phase = Phase::Consumed;

        Ok(chosen)
    }

    fn check_live(&self) -> Result<(), SelectionError> {
        if self.phase == Phase::Consumed {
            return Err(SelectionError::Consumed);
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), SelectionError> {
        self.check_live()?;
        if index >= self.entries.len() {
            return Err(SelectionError::OutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(())
    }

    fn touch(&mut self) {
        if self.phase == Phase::Unreviewed {
            self.phase = Phase::Reviewing;
        }
    }
}
