use crate::state::board::{Board, Move, Slot};
use crate::state::data::{ItemId, TierId};

/// Pointer events coming from the board widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    /// Left button pressed on a thumbnail
    Picked { item: ItemId, slot: Slot },
    /// Cursor entered a thumbnail
    EnteredItem(Slot),
    /// Cursor left a thumbnail
    LeftItem(Slot),
    /// Cursor entered a lane
    EnteredLane(TierId),
    /// Cursor left a lane
    LeftLane(TierId),
    /// Left button released anywhere
    Released,
}

/// Where the held item would land if released now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Take the position of the item at this slot
    Item(Slot),
    /// Append to the end of the lane
    LaneEnd(TierId),
}

impl DropTarget {
    pub fn tier(self) -> TierId {
        match self {
            DropTarget::Item(slot) => slot.tier,
            DropTarget::LaneEnd(tier) => tier,
        }
    }
}

/// State for drag interactions
///
/// Turns enter/leave/press/release events into a [`Move`] whose indices
/// are valid for the board at release time.
#[derive(Debug, Clone, Default)]
pub struct DragState {
    held: Option<ItemId>,
    target: Option<DropTarget>,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        self.held.is_some()
    }

    /// Item currently being dragged
    pub fn held(&self) -> Option<ItemId> {
        self.held
    }

    /// Current drop target while dragging
    pub fn target(&self) -> Option<DropTarget> {
        self.held.and(self.target)
    }

    /// Feed one event; returns a move when a drop completes
    pub fn update(&mut self, event: DragEvent, board: &Board) -> Option<Move> {
        if let DragEvent::Picked { item, slot } = event {
            self.held = Some(item);
            self.target = Some(DropTarget::Item(slot));
            return None;
        }

        if !self.is_dragging() {
            return None;
        }

        match event {
            DragEvent::Picked { .. } => None,
            DragEvent::EnteredItem(slot) => {
                self.target = Some(DropTarget::Item(slot));
                None
            }
            DragEvent::LeftItem(slot) => {
                if self.target == Some(DropTarget::Item(slot)) {
                    self.target = Some(DropTarget::LaneEnd(slot.tier));
                }
                None
            }
            DragEvent::EnteredLane(tier) => {
                if self.target.map(DropTarget::tier) != Some(tier) {
                    self.target = Some(DropTarget::LaneEnd(tier));
                }
                None
            }
            DragEvent::LeftLane(tier) => {
                if self.target.map(DropTarget::tier) == Some(tier) {
                    self.target = None;
                }
                None
            }
            DragEvent::Released => {
                let item = self.held.take()?;
                let target = self.target.take();
                resolve(board, item, target)
            }
        }
    }

    /// Abandon the current drag without moving anything
    pub fn cancel(&mut self) {
        self.held = None;
        self.target = None;
    }
}

/// Normalize a drop into a move against the current lane lengths
///
/// A drop with no target is not a move.
fn resolve(board: &Board, item: ItemId, target: Option<DropTarget>) -> Option<Move> {
    let Some(target) = target else {
        log::debug!("Drop of {} outside any lane", item);
        return None;
    };
    // The item may have shifted since it was picked up
    let from = board.locate(item)?;

    let tier = target.tier();
    let len = board.lane(tier).len();
    // Within the source lane, indices refer to the lane after removal
    let last = if tier == from.tier { len - 1 } else { len };
    let index = match target {
        DropTarget::Item(slot) => slot.index.min(last),
        DropTarget::LaneEnd(_) => last,
    };

    Some(Move {
        item,
        from,
        to: Slot::new(tier, index),
    })
}
