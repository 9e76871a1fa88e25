//! UI layer for the desktop window: the app shell and the widget surface.

pub mod app;
pub mod surface;

pub use app::{PersistedGuiSettings, UploadApp, SETTINGS_STORAGE_KEY};
