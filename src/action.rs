use strum::{Display, EnumIter, VariantArray};

/// Number of actions in the fixed action set
pub const NUM_ACTIONS: usize = 4;

/// A move on the grid
///
/// The declaration order is the canonical order used to break ties between
/// equally valued actions.
#[derive(EnumIter, VariantArray, Display, Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Action {
    North = 0,
    South = 1,
    East = 2,
    West = 3,
}

impl Action {
    /// Index of this action within a Q-table row
    pub const fn index(self) -> usize {
        self as usize
    }

    /// `(dx, dy)` displacement of the move, with `y` growing southwards
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Action::North => (0, -1),
            Action::South => (0, 1),
            Action::East => (1, 0),
            Action::West => (-1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn canonical_order() {
        let order: Vec<_> = Action::iter().collect();
        assert_eq!(
            order,
            [Action::North, Action::South, Action::East, Action::West],
            "Iteration follows declaration order"
        );
        assert_eq!(Action::VARIANTS.len(), NUM_ACTIONS);
        for (i, action) in Action::VARIANTS.iter().enumerate() {
            assert_eq!(action.index(), i, "Index matches position");
        }
    }

    #[test]
    fn deltas_are_unit_moves() {
        assert_eq!(Action::North.delta(), (0, -1));
        assert_eq!(Action::South.delta(), (0, 1));
        assert_eq!(Action::East.delta(), (1, 0));
        assert_eq!(Action::West.delta(), (-1, 0));
    }
}
