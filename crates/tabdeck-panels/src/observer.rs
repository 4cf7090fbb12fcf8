//! Observer interface for panel group changes

use crate::loader::LoadError;
use crate::panel::Panel;

/// Receives group notifications. Only `on_tab_change` is required; any
/// `Fn(&Panel)` closure is an observer of tab changes.
pub trait PanelObserver: Send + Sync {
    /// A panel was activated
    fn on_tab_change(&self, panel: &Panel);

    fn on_shown(&self, _panel: &Panel) {}

    fn on_hidden(&self, _panel: &Panel) {}

    /// Lazy content arrived
    fn on_loaded(&self, _panel: &Panel) {}

    fn on_load_failed(&self, _panel: &Panel, _error: &LoadError) {}
}

impl<F> PanelObserver for F
where
    F: Fn(&Panel) + Send + Sync,
{
    fn on_tab_change(&self, panel: &Panel) {
        self(panel)
    }
}
