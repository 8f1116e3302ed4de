/// Image ingestion module
///
/// This module handles:
/// - Finding image files (pickers, folder scans, dropped files)
/// - Decoding each file independently on a blocking task
/// - Shrinking to a thumbnail and encoding the data URL payload
/// - Appending finished items to the Pool

pub mod loader;
pub mod thumbnail;

use crate::error::IngestError;
use crate::state::board::TierStore;
use crate::state::data::TierItem;

/// Running count of ingest outcomes, shown in the status line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestTally {
    pub loaded: usize,
    pub failed: usize,
}

/// Apply one finished decode to the store
///
/// Failures only bump the tally; they never touch the board.
pub fn apply_result(
    store: &mut TierStore,
    tally: &mut IngestTally,
    result: Result<TierItem, IngestError>,
) {
    match result {
        Ok(item) => {
            store.ingest(item);
            tally.loaded += 1;
        }
        Err(e) => {
            log::warn!("Skipping image: {}", e);
            tally.failed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::thumbnail::png_bytes;
    use crate::state::data::TierId;
    use tokio::task::JoinSet;

    #[tokio::test]
    async fn test_one_bad_file_does_not_block_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let good_a = dir.path().join("a.png");
        let broken = dir.path().join("broken.png");
        let good_b = dir.path().join("b.png");
        std::fs::write(&good_a, png_bytes(10, 10)).unwrap();
        std::fs::write(&broken, b"not a png").unwrap();
        std::fs::write(&good_b, png_bytes(12, 12)).unwrap();

        let mut pending = JoinSet::new();
        for path in [good_a, broken, good_b] {
            pending.spawn(loader::load_item(path));
        }

        let mut store = TierStore::new();
        let mut tally = IngestTally::default();
        let mut completion_order = Vec::new();
        while let Some(joined) = pending.join_next().await {
            let result = joined.unwrap();
            if let Ok(item) = &result {
                completion_order.push(item.id);
            }
            apply_result(&mut store, &mut tally, result);
        }

        assert_eq!(tally, IngestTally { loaded: 2, failed: 1 });
        let pool: Vec<_> = store.board().lane(TierId::Pool).iter().map(|i| i.id).collect();
        assert_eq!(pool, completion_order);
    }

    #[test]
    fn test_failure_leaves_board_alone() {
        let mut store = TierStore::new();
        let before = std::sync::Arc::clone(store.board());
        let mut tally = IngestTally::default();
        apply_result(
            &mut store,
            &mut tally,
            Err(IngestError::Task("cancelled".into())),
        );
        assert!(std::sync::Arc::ptr_eq(&before, store.board()));
        assert_eq!(tally.failed, 1);
    }
}
