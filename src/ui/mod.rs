//! Presentation text and menu model
//!
//! No DOM here: the web host renders these into overlays, the native host logs them.

pub mod hud;
pub mod menu;

pub use hud::{GameOverPanel, HudText, share_message};
pub use menu::{Alert, MenuAction, MenuButton, MainMenu, instructions};
