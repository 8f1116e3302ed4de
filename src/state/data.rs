/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the ingest layer, the board and the UI layer.

use iced::widget::image::Handle;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Unique identifier for an imported image.
///
/// Ids come from a process-wide counter, so they stay unique across the
/// whole board and never change when the item moves between tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    /// Allocate a fresh id
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "img-{}", self.0)
    }
}

/// The fixed set of lanes on the board, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierId {
    Legendary,
    TopTier,
    Elite,
    Npc,
    Washed,
    /// Holds imported images that have not been ranked yet
    Pool,
}

impl TierId {
    /// Number of lanes, Pool included
    pub const COUNT: usize = 6;

    /// Every lane, ranked tiers first, Pool last
    pub const ALL: [TierId; Self::COUNT] = [
        TierId::Legendary,
        TierId::TopTier,
        TierId::Elite,
        TierId::Npc,
        TierId::Washed,
        TierId::Pool,
    ];

    /// Ranked tiers only, top to bottom
    pub const RANKED: [TierId; Self::COUNT - 1] = [
        TierId::Legendary,
        TierId::TopTier,
        TierId::Elite,
        TierId::Npc,
        TierId::Washed,
    ];

    /// Position of this lane in [`TierId::ALL`]
    pub fn index(self) -> usize {
        match self {
            TierId::Legendary => 0,
            TierId::TopTier => 1,
            TierId::Elite => 2,
            TierId::Npc => 3,
            TierId::Washed => 4,
            TierId::Pool => 5,
        }
    }
}

/// How the board is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Edit affordances (delete buttons, pool, controls) visible
    #[default]
    Edit,
    /// Edit affordances hidden; what the export captures
    Presentation,
}

impl RenderMode {
    pub fn is_presentation(self) -> bool {
        self == RenderMode::Presentation
    }

    pub fn toggled(self) -> Self {
        match self {
            RenderMode::Edit => RenderMode::Presentation,
            RenderMode::Presentation => RenderMode::Edit,
        }
    }
}

/// A single imported image
///
/// Immutable once created. Cloning is cheap: the payload and the
/// pixel handle are reference counted.
#[derive(Debug, Clone)]
pub struct TierItem {
    /// Stable unique id
    pub id: ItemId,
    /// `data:image/png;base64,...` payload of the thumbnail
    pub url: Arc<str>,
    /// Original filename, display only
    pub name: Option<String>,
    /// Thumbnail width in pixels
    pub width: u32,
    /// Thumbnail height in pixels
    pub height: u32,
    /// Pixel handle used by the image widget
    pub handle: Handle,
}

impl TierItem {
    /// Build an item around an already encoded thumbnail
    pub fn new(
        url: impl Into<Arc<str>>,
        name: Option<String>,
        width: u32,
        height: u32,
        rgba: Vec<u8>,
    ) -> Self {
        Self {
            id: ItemId::next(),
            url: url.into(),
            name,
            width,
            height,
            handle: Handle::from_rgba(width, height, rgba),
        }
    }

    /// Name to show in the UI (falls back to the id)
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }
}

impl PartialEq for TierItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TierItem {}

#[cfg(test)]
pub(crate) fn test_item(name: &str) -> TierItem {
    TierItem::new(
        "data:image/png;base64,",
        Some(name.to_string()),
        1,
        1,
        vec![255, 0, 0, 255],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = ItemId::next();
        let b = ItemId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_tier_index_matches_order() {
        for (position, tier) in TierId::ALL.iter().enumerate() {
            assert_eq!(tier.index(), position);
        }
        assert!(!TierId::RANKED.contains(&TierId::Pool));
    }

    #[test]
    fn test_item_equality_is_by_id() {
        let a = test_item("a.png");
        let same = a.clone();
        let other = test_item("a.png");
        assert_eq!(a, same);
        assert_ne!(a, other);
    }

    #[test]
    fn test_display_name_fallback() {
        let mut item = test_item("cat.png");
        assert_eq!(item.display_name(), "cat.png");
        item.name = None;
        assert!(item.display_name().starts_with("img-"));
    }

    #[test]
    fn test_tier_id_serializes_snake_case() {
        let json = serde_json::to_string(&TierId::TopTier).unwrap();
        assert_eq!(json, "\"top_tier\"");
    }
}
