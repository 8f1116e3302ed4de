use std::sync::Arc;

use super::data::{ItemId, TierId, TierItem};

/// One lane of the board, shared between board snapshots
pub type Lane = Arc<Vec<TierItem>>;

/// A position inside a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub tier: TierId,
    pub index: usize,
}

impl Slot {
    pub fn new(tier: TierId, index: usize) -> Self {
        Self { tier, index }
    }
}

/// Relocation of one item from one slot to another
///
/// When `from.tier == to.tier`, `to.index` is an index into the lane
/// *after* the item has been taken out (list splice semantics).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub item: ItemId,
    pub from: Slot,
    pub to: Slot,
}

impl Move {
    /// Same lane, same index
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// The partition of every imported item across the lanes
///
/// A `Board` value is never mutated once built: each operation returns a
/// new board and reuses the `Arc` of every lane it did not touch, so
/// `Arc::ptr_eq` on a lane tells the view whether that lane changed.
#[derive(Debug, Clone, Default)]
pub struct Board {
    lanes: [Lane; TierId::COUNT],
}

impl Board {
    /// An empty board: every lane has length 0
    pub fn empty() -> Self {
        Self::default()
    }

    /// Items of one lane in display order
    pub fn lane(&self, tier: TierId) -> &Lane {
        &self.lanes[tier.index()]
    }

    /// Total number of items on the board
    pub fn len(&self) -> usize {
        self.lanes.iter().map(|lane| lane.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.iter().all(|lane| lane.is_empty())
    }

    /// Every item id on the board, lane by lane
    #[cfg(test)]
    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.lanes.iter().flat_map(|lane| lane.iter().map(|item| item.id))
    }

    /// Find which slot currently holds an item
    pub fn locate(&self, id: ItemId) -> Option<Slot> {
        TierId::ALL.iter().find_map(|&tier| {
            self.lane(tier)
                .iter()
                .position(|item| item.id == id)
                .map(|index| Slot::new(tier, index))
        })
    }

    /// New board with `item` appended to the end of `tier`
    pub fn with_appended(&self, tier: TierId, item: TierItem) -> Board {
        let mut next = self.clone();
        let mut items = self.lane(tier).to_vec();
        items.push(item);
        next.lanes[tier.index()] = Arc::new(items);
        next
    }

    /// New board with the move applied
    ///
    /// Returns `None` when the move changes nothing: a same-slot move, or
    /// a move that breaks the caller contract (index out of range or id
    /// not found at the source slot).
    pub fn with_move(&self, mv: &Move) -> Option<Board> {
        if mv.is_noop() {
            return None;
        }

        let source = self.lane(mv.from.tier);
        match source.get(mv.from.index) {
            Some(item) if item.id == mv.item => {}
            Some(item) => {
                log::warn!(
                    "Ignoring move of {}: slot {:?} holds {}",
                    mv.item,
                    mv.from,
                    item.id
                );
                return None;
            }
            None => {
                log::warn!("Ignoring move of {}: source {:?} out of range", mv.item, mv.from);
                return None;
            }
        }

        let mut next = self.clone();

        if mv.from.tier == mv.to.tier {
            // Remove and insert on the same working lane
            let mut items = source.to_vec();
            if mv.to.index >= items.len() {
                log::warn!("Ignoring move of {}: target {:?} out of range", mv.item, mv.to);
                return None;
            }
            let item = items.remove(mv.from.index);
            items.insert(mv.to.index, item);
            next.lanes[mv.from.tier.index()] = Arc::new(items);
        } else {
            let target = self.lane(mv.to.tier);
            if mv.to.index > target.len() {
                log::warn!("Ignoring move of {}: target {:?} out of range", mv.item, mv.to);
                return None;
            }
            let mut from_items = source.to_vec();
            let mut to_items = target.to_vec();
            let item = from_items.remove(mv.from.index);
            to_items.insert(mv.to.index, item);
            next.lanes[mv.from.tier.index()] = Arc::new(from_items);
            next.lanes[mv.to.tier.index()] = Arc::new(to_items);
        }

        Some(next)
    }

    /// New board without the item at `slot`, plus the removed item
    pub fn with_removed(&self, slot: Slot) -> Option<(Board, TierItem)> {
        let lane = self.lane(slot.tier);
        if slot.index >= lane.len() {
            log::warn!("Ignoring removal at {:?}: out of range", slot);
            return None;
        }
        let mut items = lane.to_vec();
        let removed = items.remove(slot.index);
        let mut next = self.clone();
        next.lanes[slot.tier.index()] = Arc::new(items);
        Some((next, removed))
    }
}

/// Owner of the current board
///
/// Holds the board behind an `Arc`. Operations that change nothing leave
/// that pointer alone, so observers can compare by identity.
#[derive(Debug, Clone, Default)]
pub struct TierStore {
    board: Arc<Board>,
}

impl TierStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current board snapshot
    pub fn board(&self) -> &Arc<Board> {
        &self.board
    }

    /// Append a freshly decoded item to the Pool
    pub fn ingest(&mut self, item: TierItem) {
        log::debug!("Adding {} to pool", item.id);
        self.board = Arc::new(self.board.with_appended(TierId::Pool, item));
    }

    /// Apply a move; returns whether the board changed
    pub fn move_item(&mut self, mv: Move) -> bool {
        match self.board.with_move(&mv) {
            Some(next) => {
                self.board = Arc::new(next);
                true
            }
            None => false,
        }
    }

    /// Delete the item at `slot`
    pub fn remove(&mut self, slot: Slot) -> Option<TierItem> {
        let (next, removed) = self.board.with_removed(slot)?;
        self.board = Arc::new(next);
        Some(removed)
    }

    /// Drop every item. Callers confirm with the user first.
    pub fn reset(&mut self) {
        self.board = Arc::new(Board::empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::test_item;

    fn store_with_pool(names: &[&str]) -> TierStore {
        let mut store = TierStore::new();
        for name in names {
            store.ingest(test_item(name));
        }
        store
    }

    fn names(board: &Board, tier: TierId) -> Vec<String> {
        board
            .lane(tier)
            .iter()
            .map(|item| item.name.clone().unwrap_or_default())
            .collect()
    }

    fn move_of(board: &Board, from: Slot, to: Slot) -> Move {
        Move {
            item: board.lane(from.tier)[from.index].id,
            from,
            to,
        }
    }

    fn sorted_ids(board: &Board) -> Vec<ItemId> {
        let mut ids: Vec<_> = board.ids().collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_empty_board() {
        let board = Board::empty();
        assert!(board.is_empty());
        for tier in TierId::ALL {
            assert!(board.lane(tier).is_empty());
        }
    }

    #[test]
    fn test_ingest_appends_to_pool_in_order() {
        let store = store_with_pool(&["a", "b", "c"]);
        assert_eq!(names(store.board(), TierId::Pool), ["a", "b", "c"]);
        assert_eq!(store.board().len(), 3);
    }

    #[test]
    fn test_same_slot_move_keeps_board_pointer() {
        let mut store = store_with_pool(&["a", "b"]);
        let before = Arc::clone(store.board());
        let slot = Slot::new(TierId::Pool, 1);
        let mv = move_of(store.board(), slot, slot);

        assert!(!store.move_item(mv));
        assert!(Arc::ptr_eq(&before, store.board()));
    }

    #[test]
    fn test_same_lane_move_uses_splice_semantics() {
        let mut store = store_with_pool(&["A", "B", "C"]);
        let mv = move_of(
            store.board(),
            Slot::new(TierId::Pool, 0),
            Slot::new(TierId::Pool, 2),
        );
        assert!(store.move_item(mv));
        assert_eq!(names(store.board(), TierId::Pool), ["B", "C", "A"]);

        let mv = move_of(
            store.board(),
            Slot::new(TierId::Pool, 2),
            Slot::new(TierId::Pool, 0),
        );
        assert!(store.move_item(mv));
        assert_eq!(names(store.board(), TierId::Pool), ["A", "B", "C"]);
    }

    #[test]
    fn test_cross_lane_move_shares_untouched_lanes() {
        let mut store = store_with_pool(&["a", "b"]);
        let before = Arc::clone(store.board());
        let mv = move_of(
            store.board(),
            Slot::new(TierId::Pool, 0),
            Slot::new(TierId::Elite, 0),
        );
        assert!(store.move_item(mv));

        let after = store.board();
        assert_eq!(names(after, TierId::Elite), ["a"]);
        assert_eq!(names(after, TierId::Pool), ["b"]);
        for tier in [TierId::Legendary, TierId::TopTier, TierId::Npc, TierId::Washed] {
            assert!(Arc::ptr_eq(before.lane(tier), after.lane(tier)));
        }
        // The old snapshot is untouched
        assert_eq!(names(&before, TierId::Pool), ["a", "b"]);
    }

    #[test]
    fn test_move_to_end_of_other_lane() {
        let mut store = store_with_pool(&["a", "b", "c"]);
        let first = move_of(
            store.board(),
            Slot::new(TierId::Pool, 0),
            Slot::new(TierId::Npc, 0),
        );
        store.move_item(first);
        let second = move_of(
            store.board(),
            Slot::new(TierId::Pool, 1),
            Slot::new(TierId::Npc, 1),
        );
        store.move_item(second);
        assert_eq!(names(store.board(), TierId::Npc), ["a", "c"]);
        assert_eq!(names(store.board(), TierId::Pool), ["b"]);
    }

    #[test]
    fn test_moves_preserve_item_ids() {
        let mut store = store_with_pool(&["a", "b", "c", "d", "e"]);
        let expected = sorted_ids(store.board());

        let script = [
            (Slot::new(TierId::Pool, 0), Slot::new(TierId::Legendary, 0)),
            (Slot::new(TierId::Pool, 2), Slot::new(TierId::Legendary, 1)),
            (Slot::new(TierId::Legendary, 1), Slot::new(TierId::Legendary, 0)),
            (Slot::new(TierId::Pool, 0), Slot::new(TierId::Washed, 0)),
            (Slot::new(TierId::Legendary, 0), Slot::new(TierId::Pool, 2)),
            (Slot::new(TierId::Pool, 1), Slot::new(TierId::Pool, 0)),
        ];
        for (from, to) in script {
            let mv = move_of(store.board(), from, to);
            store.move_item(mv);
            assert_eq!(sorted_ids(store.board()), expected);
        }
        assert_eq!(store.board().len(), 5);
    }

    #[test]
    fn test_contract_violations_are_ignored() {
        let mut store = store_with_pool(&["a", "b"]);
        let before = Arc::clone(store.board());
        let id = store.board().lane(TierId::Pool)[0].id;

        let out_of_range = Move {
            item: id,
            from: Slot::new(TierId::Pool, 5),
            to: Slot::new(TierId::Elite, 0),
        };
        assert!(!store.move_item(out_of_range));

        let stale_id = Move {
            item: id,
            from: Slot::new(TierId::Pool, 1),
            to: Slot::new(TierId::Elite, 0),
        };
        assert!(!store.move_item(stale_id));

        let past_end = Move {
            item: id,
            from: Slot::new(TierId::Pool, 0),
            to: Slot::new(TierId::Elite, 3),
        };
        assert!(!store.move_item(past_end));

        assert!(Arc::ptr_eq(&before, store.board()));
    }

    #[test]
    fn test_remove_only_touches_one_lane() {
        let mut store = store_with_pool(&["a", "b", "c"]);
        let mv = move_of(
            store.board(),
            Slot::new(TierId::Pool, 0),
            Slot::new(TierId::TopTier, 0),
        );
        store.move_item(mv);
        let before = Arc::clone(store.board());

        let removed = store.remove(Slot::new(TierId::Pool, 1)).unwrap();
        assert_eq!(removed.name.as_deref(), Some("c"));
        assert_eq!(store.board().lane(TierId::Pool).len(), 1);
        assert!(Arc::ptr_eq(
            before.lane(TierId::TopTier),
            store.board().lane(TierId::TopTier)
        ));
        assert!(store.remove(Slot::new(TierId::Pool, 9)).is_none());
    }

    #[test]
    fn test_reset_empties_every_lane() {
        let mut store = store_with_pool(&["a", "b", "c"]);
        let mv = move_of(
            store.board(),
            Slot::new(TierId::Pool, 0),
            Slot::new(TierId::Legendary, 0),
        );
        store.move_item(mv);
        store.reset();
        for tier in TierId::ALL {
            assert_eq!(store.board().lane(tier).len(), 0);
        }
    }

    #[test]
    fn test_locate() {
        let store = store_with_pool(&["a", "b"]);
        let id = store.board().lane(TierId::Pool)[1].id;
        assert_eq!(store.board().locate(id), Some(Slot::new(TierId::Pool, 1)));
        assert_eq!(store.board().locate(ItemId::next()), None);
    }
}
