/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The editable selection behind the grid and review screens (selection.rs)
/// - Persistent settings (settings.rs)

pub mod data;
pub mod selection;
pub mod settings;
