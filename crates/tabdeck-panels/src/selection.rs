//! Remembered panel selection per page
//!
//! One JSON object under [`SELECTION_KEY`] maps a page path to the id of the
//! panel last active on that page. Read failures degrade to "nothing
//! remembered"; write failures are logged and otherwise ignored.

use std::collections::BTreeMap;
use std::sync::Arc;

use tabdeck_storage::KeyValueStore;

pub const SELECTION_KEY: &str = "activeTabs";

#[derive(Clone)]
pub struct SelectionMemory {
    store: Arc<dyn KeyValueStore>,
}

impl SelectionMemory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        match self.store.get_json::<BTreeMap<String, String>>(SELECTION_KEY) {
            Ok(saved) => saved.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read saved panel selection");
                BTreeMap::new()
            }
        }
    }

    /// Panel id last active on `page`
    pub fn load(&self, page: &str) -> Option<String> {
        self.read_all().remove(page)
    }

    pub fn save(&self, page: &str, panel_id: &str) -> bool {
        let mut saved = self.read_all();
        saved.insert(page.to_string(), panel_id.to_string());

        match self.store.set_json(SELECTION_KEY, &saved) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(page = %page, error = %e, "Could not save panel selection");
                false
            }
        }
    }

    pub fn forget(&self, page: &str) -> bool {
        let mut saved = self.read_all();
        if saved.remove(page).is_none() {
            return false;
        }

        match self.store.set_json(SELECTION_KEY, &saved) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(page = %page, error = %e, "Could not save panel selection");
                false
            }
        }
    }
}

impl std::fmt::Debug for SelectionMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionMemory").finish_non_exhaustive()
    }
}
