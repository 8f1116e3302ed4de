/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The board, its lanes and the move/remove/reset transitions (board.rs)
/// - User configuration loaded from disk (settings.rs)

pub mod board;
pub mod data;
pub mod settings;
