//! Frontend state container
//!
//! Owns the settings store, the toast and modal presenters, the content
//! fetcher and one [`PanelGroup`] per mounted container.

use std::collections::HashMap;
use std::sync::Arc;

use tabdeck_feedback::{ModalHost, ModalOptions, ToastCenter, ToastKind};
use tabdeck_panels::{
    ContentSource, GroupOptions, GroupServices, HttpFetcher, LoadError, LoadRequest, PanelGroup,
    PanelOptions,
};
use tabdeck_storage::{Database, KeyValueStore, MemoryStore};
use uuid::Uuid;

use crate::config::Config;
use crate::error::CoreError;
use crate::Result;

/// One panel for [`Frontend::create_simple`]
#[derive(Debug)]
pub struct TabDef {
    pub id: String,
    pub title: String,
    pub source: ContentSource,
    pub options: PanelOptions,
}

impl TabDef {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        source: impl Into<ContentSource>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            source: source.into(),
            options: PanelOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PanelOptions) -> Self {
        self.options = options;
        self
    }
}

pub struct Frontend {
    config: Config,
    store: Arc<dyn KeyValueStore>,
    toasts: Arc<ToastCenter>,
    modal: Arc<ModalHost>,
    fetcher: HttpFetcher,
    /// container id -> group
    groups: HashMap<String, PanelGroup>,
}

impl Frontend {
    /// Frontend backed by the SQLite database named in `config`
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let db = Database::open(&config.database_path)?;

        tracing::info!(path = %config.database_path.display(), "Opened settings database");

        Self::with_store(config, Arc::new(db))
    }

    /// Frontend whose remembered selections live only in memory
    pub fn in_memory(config: Config) -> Result<Self> {
        config.validate()?;
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    pub fn with_store(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let fetcher = HttpFetcher::new(
            config.fetch_timeout(),
            &config.user_agent,
            config.base_url()?,
        )?;

        Ok(Self {
            config,
            store,
            toasts: Arc::new(ToastCenter::new()),
            modal: Arc::new(ModalHost::new()),
            fetcher,
            groups: HashMap::new(),
        })
    }

    // === Groups ===

    /// Create an empty group for `container_id` on the page `page_path`
    pub fn mount(
        &mut self,
        container_id: &str,
        page_path: &str,
        options: GroupOptions,
    ) -> Result<&mut PanelGroup> {
        let group = self.build_group(container_id, page_path, options)?;
        Ok(self.insert_group(group))
    }

    /// Mount a group holding `tabs`, then restore the panel remembered for
    /// `page_path`. The first tab starts active unless one of them asks to be.
    /// Nothing is mounted if a tab is rejected.
    pub fn create_simple(
        &mut self,
        container_id: &str,
        page_path: &str,
        tabs: Vec<TabDef>,
    ) -> Result<&mut PanelGroup> {
        let mut group = self.build_group(container_id, page_path, GroupOptions::default())?;

        let any_active = tabs.iter().any(|t| t.options.active);
        for (i, tab) in tabs.into_iter().enumerate() {
            let mut options = tab.options;
            options.active |= !any_active && i == 0;
            group.add_tab(tab.id, tab.title, tab.source, options)?;
        }

        if !group.restore_selection() && group.active_tab().is_none() {
            // First tab was disabled
            group.navigate_tab(1);
        }

        Ok(self.insert_group(group))
    }

    fn build_group(
        &self,
        container_id: &str,
        page_path: &str,
        mut options: GroupOptions,
    ) -> Result<PanelGroup> {
        if self.groups.contains_key(container_id) {
            tracing::warn!(container = %container_id, "Container already has a panel group");
            return Err(CoreError::AlreadyMounted(container_id.to_string()));
        }

        options.page_path = Some(page_path.to_string());
        options.remember_selection = options.remember_selection && self.config.remember_selection;
        options.hash_navigation = options.hash_navigation || self.config.hash_navigation;

        let services = GroupServices {
            toasts: self.toasts.clone(),
            store: Some(self.store.clone()),
        };

        Ok(PanelGroup::with_services(container_id, options, services)?)
    }

    fn insert_group(&mut self, group: PanelGroup) -> &mut PanelGroup {
        self.groups
            .entry(group.container_id().to_string())
            .or_insert(group)
    }

    pub fn group(&self, container_id: &str) -> Option<&PanelGroup> {
        self.groups.get(container_id)
    }

    pub fn group_mut(&mut self, container_id: &str) -> Option<&mut PanelGroup> {
        self.groups.get_mut(container_id)
    }

    pub fn mounted(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Destroy and unmount the group of `container_id`
    pub fn teardown(&mut self, container_id: &str) -> Result<()> {
        let mut group = self
            .groups
            .remove(container_id)
            .ok_or_else(|| CoreError::NotMounted(container_id.to_string()))?;
        group.destroy();
        Ok(())
    }

    fn mounted_mut(&mut self, container_id: &str) -> Result<&mut PanelGroup> {
        self.groups
            .get_mut(container_id)
            .ok_or_else(|| CoreError::NotMounted(container_id.to_string()))
    }

    /// Fetch the queued lazy loads of one group. Returns how many results
    /// were applied.
    ///
    /// Holds the frontend until every fetch finishes. Hosts that keep
    /// handling input meanwhile use [`take_loads`](Self::take_loads), fetch
    /// with a clone of [`fetcher`](Self::fetcher) and report back through
    /// [`complete_load`](Self::complete_load).
    pub async fn load_pending(&mut self, container_id: &str) -> Result<usize> {
        let group = self
            .groups
            .get_mut(container_id)
            .ok_or_else(|| CoreError::NotMounted(container_id.to_string()))?;

        Ok(group.run_pending_loads(&self.fetcher).await)
    }

    /// Hand the queued lazy loads of one group to the caller
    pub fn take_loads(&mut self, container_id: &str) -> Result<Vec<LoadRequest>> {
        Ok(self.mounted_mut(container_id)?.take_pending_loads())
    }

    /// Apply a fetch result. False if the request went stale meanwhile.
    pub fn complete_load(
        &mut self,
        container_id: &str,
        request: &LoadRequest,
        result: std::result::Result<String, LoadError>,
    ) -> Result<bool> {
        Ok(self.mounted_mut(container_id)?.complete_load(request, result))
    }

    /// A taken request will never be completed
    pub fn abandon_load(&mut self, container_id: &str, request: &LoadRequest) -> Result<bool> {
        Ok(self.mounted_mut(container_id)?.abandon_load(request))
    }

    // === Feedback ===

    pub fn notify(&self, message: &str, kind: ToastKind) -> Uuid {
        self.toasts.push(message, kind)
    }

    pub fn show_modal(&self, markup: &str) -> Uuid {
        self.modal.open(markup, ModalOptions::default())
    }

    pub fn show_modal_with(&self, markup: &str, options: ModalOptions) -> Uuid {
        self.modal.open(markup, options)
    }

    /// False if no modal was open
    pub fn hide_modal(&self) -> bool {
        self.modal.close().is_some()
    }

    // === Accessors ===

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }

    /// Shares the client of this frontend
    pub fn fetcher(&self) -> HttpFetcher {
        self.fetcher.clone()
    }

    pub fn toasts(&self) -> Arc<ToastCenter> {
        self.toasts.clone()
    }

    pub fn modal(&self) -> Arc<ModalHost> {
        self.modal.clone()
    }
}

impl std::fmt::Debug for Frontend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frontend")
            .field("config", &self.config)
            .field("mounted", &self.mounted())
            .finish_non_exhaustive()
    }
}
