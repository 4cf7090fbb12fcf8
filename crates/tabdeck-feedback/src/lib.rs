//! tabdeck Feedback
//!
//! Fire-and-forget user feedback: toast notifications and a single modal
//! dialog. Both are service objects handed to whoever needs them; the
//! process-wide defaults exist for hosts that don't care to wire their own.

mod modal;
mod toast;

use std::sync::{Arc, OnceLock};

pub use modal::{Backdrop, Modal, ModalHost, ModalOptions, ModalPresenter};
pub use toast::{Toast, ToastCenter, ToastKind, ToastPresenter, MAX_VISIBLE_TOASTS};

static DEFAULT_TOASTS: OnceLock<Arc<ToastCenter>> = OnceLock::new();
static DEFAULT_MODAL: OnceLock<Arc<ModalHost>> = OnceLock::new();

/// Shared toast center for the whole process
pub fn default_toasts() -> Arc<ToastCenter> {
    Arc::clone(DEFAULT_TOASTS.get_or_init(|| Arc::new(ToastCenter::new())))
}

/// Shared modal host for the whole process
pub fn default_modal() -> Arc<ModalHost> {
    Arc::clone(DEFAULT_MODAL.get_or_init(|| Arc::new(ModalHost::new())))
}
