//! tabdeck Core
//!
//! Wires configuration, storage and the feedback presenters into one
//! [`Frontend`] that owns a panel group per mounted container.

mod config;
mod error;
mod frontend;

pub use config::Config;
pub use error::CoreError;
pub use frontend::{Frontend, TabDef};

// Re-export the building blocks
pub use tabdeck_feedback::{
    default_modal, default_toasts, Backdrop, ModalHost, ModalOptions, ModalPresenter, Toast,
    ToastCenter, ToastKind, ToastPresenter,
};
pub use tabdeck_panels::{
    ContentFetcher, ContentSource, GroupOptions, GroupServices, HttpFetcher, Key, LoadError,
    LoadRequest, NavStyle, Panel, PanelContent, PanelError, PanelGroup, PanelObserver,
    PanelOptions, PanelState,
};
pub use tabdeck_storage::{Database, KeyValueStore, MemoryStore, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A host may already have installed a subscriber
    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_init_logging_twice() {
        super::init_logging();
        super::init_logging();
        tracing::info!("logging initialized");
    }
}
