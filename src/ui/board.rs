/// Board widgets: tier rows, the pool panel and thumbnails
///
/// Everything here is a pure projection of the board, the drag state and
/// the render mode.

use iced::widget::{
    button, column, container, image, mouse_area, row, stack, text, tooltip, Space,
};
use iced::{alignment, mouse, Border, ContentFit, Element, Length};

use super::drag::{DragEvent, DragState, DropTarget};
use super::palette;
use crate::state::board::{Board, Slot};
use crate::state::data::{RenderMode, TierId, TierItem};
use crate::state::settings::AppConfig;
use crate::Message;

/// Thumbnail size inside ranked rows
const RANKED_TILE: f32 = 96.0;
/// Thumbnail size in the pool
const POOL_TILE: f32 = 128.0;
const LABEL_WIDTH: f32 = 128.0;
const SPACING: f32 = 8.0;

/// All ranked tiers, top to bottom
pub fn tier_rows<'a>(
    board: &'a Board,
    config: &AppConfig,
    drag: &DragState,
    mode: RenderMode,
) -> Element<'a, Message> {
    let rows = TierId::RANKED.iter().map(|&tier| {
        let style = config.style(tier);
        let text_color = style.text.to_color();
        let background = style.background.to_color();

        let label = container(text(style.label).size(20).color(text_color))
            .width(Length::Fixed(LABEL_WIDTH))
            .height(Length::Fill)
            .padding(8)
            .align_x(alignment::Horizontal::Center)
            .align_y(alignment::Vertical::Center)
            .style(move |_theme| container::Style {
                background: Some(background.into()),
                ..container::Style::default()
            });

        row![label, lane(board, tier, RANKED_TILE, drag, mode)]
            .height(Length::Shrink)
            .into()
    });

    let padding: u16 = if mode.is_presentation() { 24 } else { 0 };
    container(column(rows).spacing(1))
        .width(Length::Fill)
        .padding(padding)
        .style(|_theme| container::Style {
            background: Some(palette::BOARD.into()),
            border: Border {
                color: palette::DIVIDER,
                width: 1.0,
                radius: 12.0.into(),
            },
            ..container::Style::default()
        })
        .into()
}

/// The pool panel with its item count
pub fn pool_panel<'a>(board: &'a Board, drag: &DragState) -> Element<'a, Message> {
    let count = board.lane(TierId::Pool).len();
    let header = text(format!("Unranked ({count})")).size(18);

    let body: Element<'a, Message> = if count == 0 && !drag.is_dragging() {
        container(text("No images yet. Add some with the buttons above.").color(palette::MUTED))
            .width(Length::Fill)
            .padding(32)
            .align_x(alignment::Horizontal::Center)
            .into()
    } else {
        lane(board, TierId::Pool, POOL_TILE, drag, RenderMode::Edit)
    };

    container(column![header, body].spacing(16))
        .width(Length::Fill)
        .padding(24)
        .style(|_theme| container::Style {
            background: Some(palette::PANEL.into()),
            border: Border {
                color: palette::DIVIDER,
                width: 1.0,
                radius: 16.0.into(),
            },
            ..container::Style::default()
        })
        .into()
}

/// One droppable lane of thumbnails
fn lane<'a>(
    board: &'a Board,
    tier: TierId,
    tile_size: f32,
    drag: &DragState,
    mode: RenderMode,
) -> Element<'a, Message> {
    let items = board.lane(tier);
    let mut tiles: Vec<Element<'a, Message>> = items
        .iter()
        .enumerate()
        .map(|(index, item)| tile(item, Slot::new(tier, index), tile_size, drag, mode))
        .collect();

    if tiles.is_empty() {
        tiles.push(Space::new(Length::Fill, Length::Fixed(tile_size)).into());
    }

    let highlighted = drag.target().map(DropTarget::tier) == Some(tier);
    let content = container(row(tiles).spacing(SPACING).wrap())
        .width(Length::Fill)
        .padding(12)
        .style(move |_theme| container::Style {
            background: highlighted.then(|| palette::DROP_HIGHLIGHT.into()),
            ..container::Style::default()
        });

    mouse_area(content)
        .on_enter(Message::Drag(DragEvent::EnteredLane(tier)))
        .on_exit(Message::Drag(DragEvent::LeftLane(tier)))
        .into()
}

/// A draggable thumbnail, with a delete button in edit mode
fn tile<'a>(
    item: &'a TierItem,
    slot: Slot,
    size: f32,
    drag: &DragState,
    mode: RenderMode,
) -> Element<'a, Message> {
    let picture = image(item.handle.clone())
        .width(Length::Fixed(size))
        .height(Length::Fixed(size))
        .content_fit(ContentFit::Cover);

    let mut layers = stack![picture]
        .width(Length::Fixed(size))
        .height(Length::Fixed(size));

    if !mode.is_presentation() {
        let delete = button(text("×").size(14))
            .on_press(Message::Remove(slot))
            .padding([0, 6])
            .style(button::danger);
        layers = layers.push(
            container(delete)
                .width(Length::Fill)
                .padding(4)
                .align_x(alignment::Horizontal::Right),
        );
    }

    let held = drag.held() == Some(item.id);
    let targeted = drag.target() == Some(DropTarget::Item(slot)) && !held;
    let border_color = if held {
        palette::ACCENT
    } else if targeted {
        palette::ACCENT_SOFT
    } else {
        palette::TILE_BORDER
    };

    let framed = container(layers).style(move |_theme| container::Style {
        background: Some(palette::TILE.into()),
        border: Border {
            color: border_color,
            width: if held || targeted { 2.0 } else { 1.0 },
            radius: 6.0.into(),
        },
        ..container::Style::default()
    });

    let framed: Element<'a, Message> = match tile_caption(item, slot) {
        Some(caption) => tooltip(
            framed,
            container(text(caption).size(12)).padding([2, 6]).style(container::rounded_box),
            tooltip::Position::Bottom,
        )
        .into(),
        None => framed.into(),
    };

    mouse_area(framed)
        .on_press(Message::Drag(DragEvent::Picked { item: item.id, slot }))
        .on_enter(Message::Drag(DragEvent::EnteredItem(slot)))
        .on_exit(Message::Drag(DragEvent::LeftItem(slot)))
        .interaction(mouse::Interaction::Grab)
        .into()
}

/// Hover caption of a thumbnail: pool items show their file name
fn tile_caption(item: &TierItem, slot: Slot) -> Option<String> {
    (slot.tier == TierId::Pool).then(|| item.display_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::test_item;

    #[test]
    fn test_pool_tiles_are_captioned_with_file_name() {
        let item = test_item("sunset.jpg");
        assert_eq!(
            tile_caption(&item, Slot::new(TierId::Pool, 0)).as_deref(),
            Some("sunset.jpg")
        );
        assert_eq!(tile_caption(&item, Slot::new(TierId::Elite, 0)), None);
    }

    #[test]
    fn test_unnamed_pool_tile_falls_back_to_id() {
        let mut item = test_item("x.png");
        item.name = None;
        let caption = tile_caption(&item, Slot::new(TierId::Pool, 2));
        assert_eq!(caption, Some(item.id.to_string()));
    }
}
