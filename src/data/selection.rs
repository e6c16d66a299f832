//! Column Selection Model
//! Tracks which columns are chosen for the X and Y axes.

use serde::{Deserialize, Serialize};

/// Maximum number of columns a render accepts on either axis.
pub const MAX_SELECTION: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
        }
    }
}

/// Candidate columns plus the ordered X and Y selections.
///
/// Selection order is the order in which the candidates appear, matching how a
/// multi-select list reports its selected rows. The cap is not enforced here;
/// the renderer rejects oversized selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSelection {
    candidates: Vec<String>,
    x_selected: Vec<bool>,
    y_selected: Vec<bool>,
}

impl ColumnSelection {
    pub fn new(candidates: Vec<String>) -> Self {
        let n = candidates.len();
        Self {
            candidates,
            x_selected: vec![false; n],
            y_selected: vec![false; n],
        }
    }

    /// Replace the candidates and drop every selection.
    pub fn reset(&mut self, candidates: Vec<String>) {
        *self = Self::new(candidates);
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    fn flags(&self, axis: Axis) -> &[bool] {
        match axis {
            Axis::X => &self.x_selected,
            Axis::Y => &self.y_selected,
        }
    }

    fn flags_mut(&mut self, axis: Axis) -> &mut Vec<bool> {
        match axis {
            Axis::X => &mut self.x_selected,
            Axis::Y => &mut self.y_selected,
        }
    }

    /// Flip membership of `column` in the given axis. Unknown names are ignored.
    pub fn toggle(&mut self, axis: Axis, column: &str) -> bool {
        let Some(idx) = self.candidates.iter().position(|c| c == column) else {
            return false;
        };
        let flags = self.flags_mut(axis);
        flags[idx] = !flags[idx];
        flags[idx]
    }

    pub fn is_selected(&self, axis: Axis, column: &str) -> bool {
        self.candidates
            .iter()
            .position(|c| c == column)
            .map(|idx| self.flags(axis)[idx])
            .unwrap_or(false)
    }

    /// Selected column names for an axis, in candidate order.
    pub fn selected(&self, axis: Axis) -> Vec<String> {
        self.candidates
            .iter()
            .zip(self.flags(axis))
            .filter(|(_, &selected)| selected)
            .map(|(col, _)| col.clone())
            .collect()
    }

    pub fn x(&self) -> Vec<String> {
        self.selected(Axis::X)
    }

    pub fn y(&self) -> Vec<String> {
        self.selected(Axis::Y)
    }

    pub fn clear(&mut self, axis: Axis) {
        self.flags_mut(axis).iter_mut().for_each(|v| *v = false);
    }
}
