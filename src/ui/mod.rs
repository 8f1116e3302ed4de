/// User interface module
///
/// - Board widgets: tier rows, pool panel, thumbnails (board.rs)
/// - Drag gesture normalization into board moves (drag.rs)

pub mod board;
pub mod drag;

/// Colors shared by the widgets
pub mod palette {
    use iced::Color;

    pub const BOARD: Color = Color::from_rgb(0.059, 0.090, 0.165);
    pub const PANEL: Color = Color::from_rgb(0.067, 0.094, 0.153);
    pub const DIVIDER: Color = Color::from_rgb(0.118, 0.161, 0.231);
    pub const TILE: Color = Color::from_rgb(0.118, 0.161, 0.231);
    pub const TILE_BORDER: Color = Color::from_rgb(0.200, 0.255, 0.333);
    pub const ACCENT: Color = Color::from_rgb(0.506, 0.549, 0.973);
    pub const ACCENT_SOFT: Color = Color::from_rgba(0.506, 0.549, 0.973, 0.6);
    pub const DROP_HIGHLIGHT: Color = Color::from_rgba(0.388, 0.400, 0.945, 0.1);
    pub const MUTED: Color = Color::from_rgb(0.392, 0.455, 0.545);
}
