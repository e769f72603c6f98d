//! Terminal User Interface components for jobtrack.

pub mod form;
mod help;
pub mod theme;
pub mod widgets;

pub use help::HelpOverlay;
pub use theme::Theme;
