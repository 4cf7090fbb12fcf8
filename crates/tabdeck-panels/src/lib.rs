//! tabdeck Panel Management
//!
//! A panel group is an ordered strip of tabs with at most one active panel.
//! The group keeps the tab controls (ARIA attributes, roving tabindex), the
//! content panes and the remembered per-page selection in step with each
//! other. Rendering is left to the host; the group owns the state and the
//! markup of its placeholders.

mod content;
mod error;
mod group;
mod keyboard;
mod loader;
mod observer;
mod options;
mod panel;
mod render;
mod selection;
mod state;

pub use content::{escape_html, ContentProducer, ContentSource, PanelContent};
pub use error::PanelError;
pub use group::{GroupServices, PanelGroup};
pub use keyboard::{ControlAttributes, Key, KeyAction, PaneAttributes};
pub use loader::{ContentFetcher, HttpFetcher, LoadError, LoadRequest};
pub use observer::PanelObserver;
pub use options::{ChangeCallback, GroupOptions, NavStyle, PanelHook, PanelOptions};
pub use panel::Panel;
pub use selection::{SelectionMemory, SELECTION_KEY};
pub use state::PanelState;

pub type Result<T> = std::result::Result<T, PanelError>;
