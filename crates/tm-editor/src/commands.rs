//! Fog undo/redo history.
//!
//! Fog edits use **snapshot batching**: the revealed set is captured when a
//! brush stroke (or any other fog edit) begins and compared when it ends,
//! so one stroke across many cells undoes in a single step.

use tm_core::FogOfWar;

pub const DEFAULT_MAX_DEPTH: usize = 50;

#[derive(Debug)]
pub struct FogHistory {
    undo_stack: Vec<FogOfWar>,
    redo_stack: Vec<FogOfWar>,
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// Revealed set captured at the start of the outermost batch.
    batch_snapshot: Option<FogOfWar>,
}

impl Default for FogHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl FogHistory {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
            batch_depth: 0,
            batch_snapshot: None,
        }
    }

    /// Start a batch. Only the outermost call captures a snapshot.
    pub fn begin_batch(&mut self, fog: &FogOfWar) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(fog.clone());
        }
        self.batch_depth += 1;
    }

    /// End a batch. When the outermost batch closes and the revealed set
    /// differs from the snapshot, push one undo step. Returns whether a step
    /// was recorded.
    pub fn end_batch(&mut self, fog: &FogOfWar) -> bool {
        if self.batch_depth == 0 {
            return false;
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return false;
        }
        let Some(before) = self.batch_snapshot.take() else {
            return false;
        };
        if before == *fog {
            return false;
        }
        self.undo_stack.push(before);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
        true
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    /// Restore the revealed set from before the last recorded step.
    pub fn undo(&mut self, fog: &mut FogOfWar) -> bool {
        let Some(before) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(std::mem::replace(fog, before));
        true
    }

    pub fn redo(&mut self, fog: &mut FogOfWar) -> bool {
        let Some(after) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(std::mem::replace(fog, after));
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Drop all history, e.g. when a different map is loaded.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.batch_depth = 0;
        self.batch_snapshot = None;
    }
}
