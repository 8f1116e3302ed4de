/// Vector projection of the board used for export
///
/// The ranked tiers are laid out as rows: a colored label cell on the left,
/// then the lane's thumbnails in order, wrapping onto extra lines when the
/// lane is full. The Pool is not part of the picture.

use std::fmt::Write;

use crate::state::board::Board;
use crate::state::data::{RenderMode, TierId, TierItem};
use crate::state::settings::{AppConfig, TierStyle};

/// Board width in layout pixels
pub const BOARD_WIDTH: f32 = 960.0;
/// Width of the label cell
pub const LABEL_WIDTH: f32 = 128.0;
/// Square tile size of a thumbnail
pub const TILE_SIZE: f32 = 96.0;
/// Space between tiles
pub const TILE_GAP: f32 = 8.0;
/// Inner padding of a lane
pub const LANE_PADDING: f32 = 12.0;
/// Minimum height of a row
pub const MIN_ROW_HEIGHT: f32 = 100.0;
/// Corner radius of the board frame
pub const FRAME_RADIUS: f32 = 12.0;

const FRAME_FILL: &str = "#111827";
const DIVIDER: &str = "#1e293b";
const TILE_FILL: &str = "#1e293b";
const TILE_STROKE: &str = "#334155";
const BADGE_FILL: &str = "#dc2626";
const LABEL_FONT_SIZE: f32 = 20.0;

/// A laid out board, ready to rasterize
#[derive(Debug, Clone)]
pub struct Scene {
    /// Width in layout pixels
    pub width: f32,
    /// Height in layout pixels
    pub height: f32,
    /// SVG document
    pub svg: String,
}

/// Number of tiles that fit on one line of a lane
pub fn tiles_per_line() -> usize {
    let inner = BOARD_WIDTH - LABEL_WIDTH - 2.0 * LANE_PADDING;
    (((inner + TILE_GAP) / (TILE_SIZE + TILE_GAP)).floor() as usize).max(1)
}

/// Height of a row holding `count` items
pub fn row_height(count: usize) -> f32 {
    let lines = count.div_ceil(tiles_per_line());
    if lines == 0 {
        return MIN_ROW_HEIGHT;
    }
    let lines = lines as f32;
    let content = 2.0 * LANE_PADDING + lines * TILE_SIZE + (lines - 1.0) * TILE_GAP;
    content.max(MIN_ROW_HEIGHT)
}

/// Lay out the ranked tiers of `board`
pub fn build(board: &Board, config: &AppConfig, mode: RenderMode) -> Scene {
    let height: f32 = TierId::RANKED
        .iter()
        .map(|&tier| row_height(board.lane(tier).len()))
        .sum();
    let width = BOARD_WIDTH;

    let mut body = String::new();
    let mut y = 0.0;
    for (row, &tier) in TierId::RANKED.iter().enumerate() {
        let lane = board.lane(tier);
        let h = row_height(lane.len());
        if row > 0 {
            let _ = write!(
                body,
                r#"<rect x="0" y="{y}" width="{width}" height="1" fill="{DIVIDER}"/>"#
            );
        }
        push_label(&mut body, &config.style(tier), y, h);
        for (index, item) in lane.iter().enumerate() {
            push_tile(&mut body, item, index, y, mode);
        }
        y += h;
    }

    let svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" "#,
            r#"width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<defs><clipPath id="frame"><rect width="{w}" height="{h}" rx="{r}"/></clipPath></defs>"#,
            r#"<g clip-path="url(#frame)"><rect width="{w}" height="{h}" fill="{fill}"/>{body}</g>"#,
            r#"<rect x="0.5" y="0.5" width="{iw}" height="{ih}" rx="{r}" fill="none" stroke="{stroke}"/>"#,
            "</svg>"
        ),
        w = width,
        h = height,
        iw = width - 1.0,
        ih = height - 1.0,
        r = FRAME_RADIUS,
        fill = FRAME_FILL,
        stroke = DIVIDER,
        body = body,
    );

    Scene { width, height, svg }
}

fn push_label(out: &mut String, style: &TierStyle, y: f32, h: f32) {
    let cx = LABEL_WIDTH / 2.0;
    // Approximate vertical centering; baseline sits ~0.35em below the middle
    let baseline = y + h / 2.0 + LABEL_FONT_SIZE * 0.35;
    let _ = write!(
        out,
        concat!(
            r#"<rect x="0" y="{y}" width="{lw}" height="{h}" fill="{bg}"/>"#,
            r#"<text x="{cx}" y="{baseline}" text-anchor="middle" font-family="sans-serif" "#,
            r#"font-weight="900" font-size="{fs}" fill="{fg}">{label}</text>"#
        ),
        y = y,
        lw = LABEL_WIDTH,
        h = h,
        bg = style.background,
        cx = cx,
        baseline = baseline,
        fs = LABEL_FONT_SIZE,
        fg = style.text,
        label = escape(&style.label),
    );
}

fn push_tile(out: &mut String, item: &TierItem, index: usize, row_y: f32, mode: RenderMode) {
    let per_line = tiles_per_line();
    let col = (index % per_line) as f32;
    let line = (index / per_line) as f32;
    let x = LABEL_WIDTH + LANE_PADDING + col * (TILE_SIZE + TILE_GAP);
    let y = row_y + LANE_PADDING + line * (TILE_SIZE + TILE_GAP);

    let _ = write!(
        out,
        concat!(
            r#"<rect x="{x}" y="{y}" width="{s}" height="{s}" rx="6" fill="{fill}" stroke="{stroke}"/>"#,
            r#"<image x="{x}" y="{y}" width="{s}" height="{s}" preserveAspectRatio="xMidYMid slice" "#,
            r#"xlink:href="{href}"/>"#
        ),
        x = x,
        y = y,
        s = TILE_SIZE,
        fill = TILE_FILL,
        stroke = TILE_STROKE,
        href = escape(&item.url),
    );

    if !mode.is_presentation() {
        // Delete badge in the top right corner
        let bx = x + TILE_SIZE - 22.0;
        let by = y + 4.0;
        let _ = write!(
            out,
            concat!(
                r#"<g class="delete-badge"><rect x="{bx}" y="{by}" width="18" height="18" rx="4" fill="{fill}"/>"#,
                r#"<path d="M{ax} {ay} L{cx} {cy} M{cx} {ay} L{ax} {cy}" stroke="white" stroke-width="2"/></g>"#
            ),
            bx = bx,
            by = by,
            fill = BADGE_FILL,
            ax = bx + 5.0,
            ay = by + 5.0,
            cx = bx + 13.0,
            cy = by + 13.0,
        );
    }
}

/// Escape text for use inside XML content or attributes
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
