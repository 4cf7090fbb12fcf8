//! Modal dialog presenter
//!
//! At most one modal is open. Opening another replaces it; there is no queue.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backdrop {
    /// No backdrop element
    None,
    /// Backdrop shown, clicking it closes the modal
    #[default]
    Dismissable,
    /// Backdrop shown, clicks are ignored
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalOptions {
    pub backdrop: Backdrop,
    /// Close on Escape
    pub keyboard: bool,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            backdrop: Backdrop::Dismissable,
            keyboard: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Modal {
    pub id: Uuid,
    pub content: String,
    pub options: ModalOptions,
    pub opened_at: DateTime<Utc>,
}

pub trait ModalPresenter: Send + Sync {
    fn show(&self, markup: &str);

    fn hide(&self);
}

#[derive(Debug, Default)]
pub struct ModalHost {
    current: Mutex<Option<Modal>>,
    defaults: ModalOptions,
}

impl ModalHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(defaults: ModalOptions) -> Self {
        Self {
            current: Mutex::new(None),
            defaults,
        }
    }

    /// Open a modal, replacing any open one
    pub fn open(&self, markup: &str, options: ModalOptions) -> Uuid {
        let modal = Modal {
            id: Uuid::new_v4(),
            content: markup.to_string(),
            options,
            opened_at: Utc::now(),
        };
        let id = modal.id;

        if let Some(previous) = self.current.lock().replace(modal) {
            tracing::debug!(modal_id = %previous.id, "Replaced open modal");
        }
        tracing::debug!(modal_id = %id, "Opened modal");

        id
    }

    pub fn close(&self) -> Option<Modal> {
        let closed = self.current.lock().take();
        if let Some(modal) = &closed {
            tracing::debug!(modal_id = %modal.id, "Closed modal");
        }
        closed
    }

    pub fn toggle(&self, markup: &str) {
        if self.is_open() {
            self.close();
        } else {
            self.open(markup, self.defaults);
        }
    }

    pub fn current(&self) -> Option<Modal> {
        self.current.lock().clone()
    }

    pub fn is_open(&self) -> bool {
        self.current.lock().is_some()
    }

    /// Backdrop element should be present
    pub fn has_backdrop(&self) -> bool {
        self.current
            .lock()
            .as_ref()
            .is_some_and(|m| m.options.backdrop != Backdrop::None)
    }

    /// Page scrolling is suspended while a modal is open (`body.modal-open`)
    pub fn scroll_locked(&self) -> bool {
        self.is_open()
    }

    /// Escape pressed. Returns true if it closed the modal.
    pub fn handle_escape(&self) -> bool {
        let closes = self
            .current
            .lock()
            .as_ref()
            .is_some_and(|m| m.options.keyboard);
        if closes {
            self.close();
        }
        closes
    }

    /// Click landed on the backdrop. Returns true if it closed the modal.
    pub fn handle_backdrop_click(&self) -> bool {
        let closes = self
            .current
            .lock()
            .as_ref()
            .is_some_and(|m| m.options.backdrop == Backdrop::Dismissable);
        if closes {
            self.close();
        }
        closes
    }
}

impl ModalPresenter for ModalHost {
    fn show(&self, markup: &str) {
        self.open(markup, self.defaults);
    }

    fn hide(&self) {
        self.close();
    }
}
