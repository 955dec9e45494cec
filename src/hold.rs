//! Hold slot: one piece of side storage, usable once per spawn

use crate::tetromino::PieceKind;

#[derive(Debug, Clone, Default)]
pub struct HoldSlot {
    held: Option<PieceKind>,
    /// Whether hold has been used since the last queue spawn
    used: bool,
}

impl HoldSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held(&self) -> Option<PieceKind> {
        self.held
    }

    pub fn is_used(&self) -> bool {
        self.used
    }

    /// Put `current` into the slot and return what was there before
    ///
    /// Returns `None` without touching the slot when hold was already used
    /// since the last spawn. Otherwise returns `Some(previous)`, where
    /// `previous` is `None` when the slot was empty and the caller should draw
    /// from the queue instead.
    pub fn exchange(&mut self, current: PieceKind) -> Option<Option<PieceKind>> {
        if self.used {
            return None;
        }
        Some(self.held.replace(current))
    }

    /// Lock the slot until the next queue spawn
    pub fn mark_used(&mut self) {
        self.used = true;
    }

    /// Called exactly when a piece is spawned from the queue
    pub fn reset_on_spawn(&mut self) {
        self.used = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_exchange_stores_piece() {
        let mut slot = HoldSlot::new();
        assert_eq!(slot.exchange(PieceKind::T), Some(None));
        assert_eq!(slot.held(), Some(PieceKind::T));
    }

    #[test]
    fn test_exchange_swaps_held_piece() {
        let mut slot = HoldSlot::new();
        slot.exchange(PieceKind::T);
        assert_eq!(slot.exchange(PieceKind::S), Some(Some(PieceKind::T)));
        assert_eq!(slot.held(), Some(PieceKind::S));
    }

    #[test]
    fn test_used_slot_refuses() {
        let mut slot = HoldSlot::new();
        slot.exchange(PieceKind::J);
        slot.mark_used();
        assert_eq!(slot.exchange(PieceKind::L), None);
        assert_eq!(slot.held(), Some(PieceKind::J));

        slot.reset_on_spawn();
        assert!(!slot.is_used());
        assert_eq!(slot.exchange(PieceKind::L), Some(Some(PieceKind::J)));
    }
}
