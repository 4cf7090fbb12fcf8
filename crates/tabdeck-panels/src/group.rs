//! Panel Group Manager
//!
//! Owns the panels of one container and the invariant that at most one of
//! them is active. Operations that a host wires to user input return `bool`
//! and never fail loudly; unknown ids are logged and ignored.

use std::collections::HashMap;
use std::sync::Arc;

use tabdeck_feedback::{ToastKind, ToastPresenter};
use tabdeck_storage::KeyValueStore;
use uuid::Uuid;

use crate::content::{ContentSource, PanelContent};
use crate::error::PanelError;
use crate::loader::{LoadError, LoadRequest};
use crate::observer::PanelObserver;
use crate::options::{GroupOptions, PanelHook, PanelOptions};
use crate::panel::Panel;
use crate::selection::SelectionMemory;
use crate::state::PanelState;
use crate::Result;

/// Collaborators injected into a group
#[derive(Clone)]
pub struct GroupServices {
    pub toasts: Arc<dyn ToastPresenter>,
    /// Backing store for the remembered selection; `None` disables it
    pub store: Option<Arc<dyn KeyValueStore>>,
}

impl Default for GroupServices {
    fn default() -> Self {
        Self {
            toasts: tabdeck_feedback::default_toasts(),
            store: None,
        }
    }
}

#[derive(Default)]
struct PanelHooks {
    on_show: Option<PanelHook>,
    on_hide: Option<PanelHook>,
}

pub struct PanelGroup {
    container_id: String,
    instance_id: Uuid,
    options: GroupOptions,
    /// Display order
    panels: Vec<Panel>,
    hooks: HashMap<String, PanelHooks>,
    focused: Option<String>,
    observers: Vec<Arc<dyn PanelObserver>>,
    selection: Option<SelectionMemory>,
    toasts: Arc<dyn ToastPresenter>,
    pub(crate) pending: Vec<LoadRequest>,
    /// panel id -> generation of its outstanding request
    pub(crate) in_flight: HashMap<String, u64>,
    next_generation: u64,
    fragment: Option<String>,
}

impl PanelGroup {
    pub fn new(container_id: impl Into<String>, options: GroupOptions) -> Result<Self> {
        Self::with_services(container_id, options, GroupServices::default())
    }

    pub fn with_services(
        container_id: impl Into<String>,
        options: GroupOptions,
        services: GroupServices,
    ) -> Result<Self> {
        let container_id = container_id.into();
        if container_id.trim().is_empty() {
            tracing::error!("Panel group needs a container id");
            return Err(PanelError::MissingContainer);
        }

        let group = Self {
            instance_id: Uuid::new_v4(),
            options,
            panels: Vec::new(),
            hooks: HashMap::new(),
            focused: None,
            observers: Vec::new(),
            selection: services.store.map(SelectionMemory::new),
            toasts: services.toasts,
            pending: Vec::new(),
            in_flight: HashMap::new(),
            next_generation: 1,
            fragment: None,
            container_id,
        };

        tracing::info!(
            container = %group.container_id,
            instance = %group.instance_id,
            "Panel group initialized"
        );

        Ok(group)
    }

    // === Registration ===

    /// Register a panel at the end of the strip
    pub fn add_tab(
        &mut self,
        id: impl Into<String>,
        title: impl Into<String>,
        source: impl Into<ContentSource>,
        options: PanelOptions,
    ) -> Result<&mut Self> {
        let id = id.into();
        if self.index_of(&id).is_some() {
            tracing::warn!(container = %self.container_id, panel_id = %id, "Duplicate panel id rejected");
            return Err(PanelError::Duplicate(id));
        }

        let PanelOptions {
            active,
            icon,
            badge,
            disabled,
            lazy,
            on_show,
            on_hide,
        } = options;

        let panel = Panel::new(
            id.clone(),
            title.into(),
            source.into(),
            icon,
            badge,
            disabled,
            lazy.unwrap_or(self.options.lazy),
        )?;

        tracing::debug!(container = %self.container_id, panel_id = %id, lazy = panel.lazy, "Added panel");

        self.panels.push(panel);
        self.hooks.insert(id.clone(), PanelHooks { on_show, on_hide });

        // Registration must not overwrite the remembered selection
        if active && self.active_index().is_none() {
            if let Err(e) = self.activate(&id, false) {
                tracing::debug!(container = %self.container_id, error = %e, "Initial activation refused");
            }
        }

        Ok(self)
    }

    /// Remove a panel. If it was active, the nearest enabled panel after it
    /// takes over, else the nearest before it, else nothing is active.
    pub fn remove_tab(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            tracing::debug!(container = %self.container_id, panel_id = %id, "Remove of unknown panel");
            return false;
        };

        if self.panels[index].is_active() {
            let successor = self.panels[index + 1..]
                .iter()
                .find(|p| !p.disabled)
                .or_else(|| self.panels[..index].iter().rev().find(|p| !p.disabled))
                .map(|p| p.id.clone());

            match successor {
                Some(next) => {
                    self.set_active_tab(&next);
                }
                None => {
                    self.hide_tab(id);
                }
            }
        }

        let removed = self.panels.remove(index);
        self.hooks.remove(id);
        self.pending.retain(|r| r.panel_id != id);
        self.in_flight.remove(id);
        if self.focused.as_deref() == Some(id) {
            self.focused = self.active_tab().map(|p| p.id.clone());
        }

        tracing::debug!(container = %self.container_id, panel_id = %removed.id, "Removed panel");

        true
    }

    // === Activation ===

    /// Make `id` the active panel. False if it is unknown or disabled.
    pub fn set_active_tab(&mut self, id: &str) -> bool {
        match self.activate(id, true) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(container = %self.container_id, error = %e, "Activation refused");
                false
            }
        }
    }

    fn activate(&mut self, id: &str, persist: bool) -> Result<()> {
        let index = self
            .index_of(id)
            .ok_or_else(|| PanelError::NotFound(id.to_string()))?;
        if self.panels[index].disabled {
            return Err(PanelError::Disabled(id.to_string()));
        }

        if let Some(previous) = self.active_index().filter(|&i| i != index) {
            let previous_id = self.panels[previous].id.clone();
            self.hide_tab(&previous_id);
        }

        self.show_tab(id);
        self.focused = Some(id.to_string());

        if self.options.hash_navigation {
            self.fragment = Some(id.to_string());
        }

        if persist {
            self.remember(id);
        }

        let panel = &self.panels[index];
        if let Some(callback) = &self.options.on_tab_change {
            callback(panel);
        }
        for observer in &self.observers {
            observer.on_tab_change(panel);
        }

        Ok(())
    }

    /// Apply active styling to `id` and clear it everywhere else. Starts the
    /// lazy load if the panel still needs one.
    pub fn show_tab(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            tracing::debug!(container = %self.container_id, panel_id = %id, "Show of unknown panel");
            return false;
        };
        if self.panels[index].disabled && !self.panels[index].is_active() {
            return false;
        }

        for (i, panel) in self.panels.iter_mut().enumerate() {
            if i != index && panel.is_active() {
                panel.state = PanelState::Inactive;
            }
        }

        let was_active = self.panels[index].is_active();
        if self.panels[index]
            .transition_to(PanelState::Active)
            .is_err()
        {
            return false;
        }

        self.begin_load(index);

        if !was_active {
            let panel = &self.panels[index];
            if let Some(hook) = self.hooks.get_mut(id).and_then(|h| h.on_show.as_mut()) {
                hook(panel);
            }
            for observer in &self.observers {
                observer.on_shown(panel);
            }
        }

        true
    }

    /// Remove active styling from `id`
    pub fn hide_tab(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            tracing::debug!(container = %self.container_id, panel_id = %id, "Hide of unknown panel");
            return false;
        };

        if !self.panels[index].is_active() {
            return true;
        }

        if self.panels[index]
            .transition_to(PanelState::Inactive)
            .is_err()
        {
            return false;
        }

        let panel = &self.panels[index];
        if let Some(hook) = self.hooks.get_mut(id).and_then(|h| h.on_hide.as_mut()) {
            hook(panel);
        }
        for observer in &self.observers {
            observer.on_hidden(panel);
        }

        true
    }

    /// Move activation `direction` enabled panels forward (positive) or
    /// backward (negative), wrapping around and skipping disabled panels.
    pub fn navigate_tab(&mut self, direction: isize) -> bool {
        if direction == 0 {
            return false;
        }
        let enabled = self.panels.iter().filter(|p| !p.disabled).count();
        if enabled == 0 {
            return false;
        }

        let forward = direction > 0;
        let mut steps = direction.unsigned_abs();
        let mut cursor = self.active_index();

        // Every `enabled` steps from an enabled panel lead back to it
        if cursor.is_some_and(|i| !self.panels[i].disabled) {
            steps %= enabled;
        } else {
            cursor = self.step_enabled(cursor, forward);
            steps = (steps - 1) % enabled;
        }

        for _ in 0..steps {
            match self.step_enabled(cursor, forward) {
                Some(next) => cursor = Some(next),
                None => return false,
            }
        }

        match cursor {
            Some(index) => {
                let id = self.panels[index].id.clone();
                self.set_active_tab(&id)
            }
            None => false,
        }
    }

    /// Next enabled index from `from` in one direction, wrapping. With no
    /// starting point, the first (or last) enabled panel.
    fn step_enabled(&self, from: Option<usize>, forward: bool) -> Option<usize> {
        let len = self.panels.len();
        match from {
            None if forward => self.panels.iter().position(|p| !p.disabled),
            None => self.panels.iter().rposition(|p| !p.disabled),
            Some(start) => (1..=len)
                .map(|step| {
                    if forward {
                        (start + step) % len
                    } else {
                        (start + len - step % len) % len
                    }
                })
                .find(|&i| !self.panels[i].disabled),
        }
    }

    pub(crate) fn first_enabled_id(&self) -> Option<String> {
        self.panels
            .iter()
            .find(|p| !p.disabled)
            .map(|p| p.id.clone())
    }

    pub(crate) fn last_enabled_id(&self) -> Option<String> {
        self.panels
            .iter()
            .rev()
            .find(|p| !p.disabled)
            .map(|p| p.id.clone())
    }

    // === Panel flags ===

    /// Disabling the active panel leaves it active; it only blocks future activations.
    pub fn disable_tab(&mut self, id: &str) -> bool {
        self.set_disabled(id, true)
    }

    pub fn enable_tab(&mut self, id: &str) -> bool {
        self.set_disabled(id, false)
    }

    fn set_disabled(&mut self, id: &str, disabled: bool) -> bool {
        match self.panel_mut(id) {
            Some(panel) => {
                panel.disabled = disabled;
                tracing::debug!(panel_id = %id, disabled, "Panel availability changed");
                true
            }
            None => {
                tracing::debug!(container = %self.container_id, panel_id = %id, "Availability change of unknown panel");
                false
            }
        }
    }

    pub fn update_tab_badge(&mut self, id: &str, badge: Option<String>) -> bool {
        match self.panel_mut(id) {
            Some(panel) => {
                panel.badge = badge;
                true
            }
            None => {
                tracing::debug!(container = %self.container_id, panel_id = %id, "Badge update of unknown panel");
                false
            }
        }
    }

    // === Selection memory and location ===

    fn remember(&self, id: &str) {
        if !self.options.remember_selection {
            return;
        }
        if let (Some(memory), Some(page)) = (&self.selection, &self.options.page_path) {
            memory.save(page, id);
        }
    }

    /// Re-activate the panel remembered for this page. Keeps the current
    /// active panel when nothing usable is remembered.
    pub fn restore_selection(&mut self) -> bool {
        let (Some(memory), Some(page)) = (&self.selection, &self.options.page_path) else {
            return false;
        };

        let Some(saved) = memory.load(page) else {
            return false;
        };

        if self.tab(&saved).is_some_and(|p| !p.disabled) {
            tracing::debug!(container = %self.container_id, panel_id = %saved, "Restoring remembered panel");
            self.set_active_tab(&saved)
        } else {
            tracing::debug!(container = %self.container_id, panel_id = %saved, "Remembered panel unavailable");
            false
        }
    }

    /// Location fragment changed (`#id` or `id`)
    pub fn handle_location_fragment(&mut self, fragment: &str) -> bool {
        if !self.options.hash_navigation {
            return false;
        }
        let id = fragment.trim_start_matches('#');
        if id.is_empty() || self.index_of(id).is_none() {
            return false;
        }
        self.set_active_tab(id)
    }

    /// Fragment the host should show in the location bar
    pub fn location_fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    // === Observers ===

    pub fn subscribe(&mut self, observer: Arc<dyn PanelObserver>) {
        self.observers.push(observer);
    }

    // === Lazy loading ===

    /// Produce content for a panel that still needs it. Synchronous sources
    /// resolve immediately; Url sources are queued for the fetcher.
    pub(crate) fn begin_load(&mut self, index: usize) -> bool {
        let panel = &self.panels[index];
        if !panel.needs_load() || self.in_flight.contains_key(&panel.id) {
            return false;
        }

        match panel.source.clone() {
            ContentSource::Url(url) => {
                let generation = self.next_generation;
                self.next_generation += 1;

                let id = panel.id.clone();
                tracing::debug!(container = %self.container_id, panel_id = %id, url = %url, "Queued lazy load");

                self.in_flight.insert(id.clone(), generation);
                self.pending.push(LoadRequest {
                    panel_id: id,
                    url,
                    generation,
                });
                self.panels[index].content = PanelContent::Loading;
            }
            _ => match self.panels[index].resolve_now() {
                PanelContent::Failed { message } => {
                    self.fail_load(index, LoadError::Producer(message));
                }
                content => {
                    self.finish_load(index, content);
                }
            },
        }

        true
    }

    pub(crate) fn finish_load(&mut self, index: usize, content: PanelContent) {
        let panel = &mut self.panels[index];
        panel.content = content;
        panel.loaded = true;

        tracing::debug!(container = %self.container_id, panel_id = %panel.id, "Lazy content loaded");

        let panel = &self.panels[index];
        for observer in &self.observers {
            observer.on_loaded(panel);
        }
    }

    pub(crate) fn fail_load(&mut self, index: usize, error: LoadError) {
        let panel = &mut self.panels[index];
        panel.content = PanelContent::Failed {
            message: error.to_string(),
        };

        tracing::warn!(container = %self.container_id, panel_id = %panel.id, error = %error, "Lazy content failed");

        let panel = &self.panels[index];
        self.toasts.show(
            &format!("Failed to load \"{}\": {}", panel.title, error),
            ToastKind::Error,
        );
        for observer in &self.observers {
            observer.on_load_failed(panel, &error);
        }
    }

    // === Lifecycle ===

    /// Tear down: drop every panel and outstanding request
    pub fn destroy(&mut self) {
        self.panels.clear();
        self.hooks.clear();
        self.pending.clear();
        self.in_flight.clear();
        self.focused = None;
        self.fragment = None;

        tracing::info!(container = %self.container_id, instance = %self.instance_id, "Panel group destroyed");
    }

    // === Accessors ===

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn options(&self) -> &GroupOptions {
        &self.options
    }

    pub fn nav_class(&self) -> String {
        self.options.nav_style.nav_class()
    }

    pub fn active_tab(&self) -> Option<&Panel> {
        self.panels.iter().find(|p| p.is_active())
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_tab().map(|p| p.id.as_str())
    }

    pub(crate) fn active_index(&self) -> Option<usize> {
        self.panels.iter().position(|p| p.is_active())
    }

    pub fn tabs(&self) -> &[Panel] {
        &self.panels
    }

    pub fn tab(&self, id: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    pub(crate) fn panel_mut(&mut self, id: &str) -> Option<&mut Panel> {
        self.panels.iter_mut().find(|p| p.id == id)
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.panels.iter().position(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub(crate) fn focused_id(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub(crate) fn set_focus(&mut self, id: Option<String>) {
        self.focused = id;
    }
}

impl std::fmt::Debug for PanelGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelGroup")
            .field("container_id", &self.container_id)
            .field("instance_id", &self.instance_id)
            .field("panels", &self.panels.len())
            .field("active", &self.active_id())
            .finish_non_exhaustive()
    }
}
