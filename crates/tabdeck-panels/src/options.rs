//! Typed configuration for panel groups and individual panels

use serde::{Deserialize, Serialize};

use crate::panel::Panel;

/// Called with the newly active panel after every activation
pub type ChangeCallback = Box<dyn Fn(&Panel) + Send + Sync>;

/// Per-panel lifecycle hook
pub type PanelHook = Box<dyn FnMut(&Panel) + Send>;

/// Look of the navigation strip
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavStyle {
    #[default]
    Tabs,
    Pills,
    Vertical,
    Custom(String),
}

impl NavStyle {
    /// CSS classes of the `ul.nav` element
    pub fn nav_class(&self) -> String {
        match self {
            NavStyle::Tabs => "nav-tabs".to_string(),
            NavStyle::Pills => "nav-pills".to_string(),
            NavStyle::Vertical => "nav-pills flex-column".to_string(),
            NavStyle::Custom(theme) => format!("nav-{}", theme),
        }
    }
}

pub struct GroupOptions {
    pub nav_style: NavStyle,
    /// Panes fade in and out
    pub animation: bool,
    /// Mirror the active panel into the location fragment
    pub hash_navigation: bool,
    /// Default for panels that don't say
    pub lazy: bool,
    /// Write the per-page selection on every activation
    pub remember_selection: bool,
    /// Page key for the remembered selection
    pub page_path: Option<String>,
    pub on_tab_change: Option<ChangeCallback>,
}

impl GroupOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nav_style(mut self, style: NavStyle) -> Self {
        self.nav_style = style;
        self
    }

    pub fn animation(mut self, enabled: bool) -> Self {
        self.animation = enabled;
        self
    }

    pub fn hash_navigation(mut self, enabled: bool) -> Self {
        self.hash_navigation = enabled;
        self
    }

    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    pub fn remember_selection(mut self, enabled: bool) -> Self {
        self.remember_selection = enabled;
        self
    }

    pub fn page_path(mut self, path: impl Into<String>) -> Self {
        self.page_path = Some(path.into());
        self
    }

    pub fn on_tab_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&Panel) + Send + Sync + 'static,
    {
        self.on_tab_change = Some(Box::new(f));
        self
    }
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            nav_style: NavStyle::Tabs,
            animation: true,
            hash_navigation: false,
            lazy: false,
            remember_selection: true,
            page_path: None,
            on_tab_change: None,
        }
    }
}

impl std::fmt::Debug for GroupOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupOptions")
            .field("nav_style", &self.nav_style)
            .field("animation", &self.animation)
            .field("hash_navigation", &self.hash_navigation)
            .field("lazy", &self.lazy)
            .field("remember_selection", &self.remember_selection)
            .field("page_path", &self.page_path)
            .field("on_tab_change", &self.on_tab_change.is_some())
            .finish()
    }
}

#[derive(Default)]
pub struct PanelOptions {
    /// Activate on registration if nothing is active yet
    pub active: bool,
    pub icon: Option<String>,
    pub badge: Option<String>,
    pub disabled: bool,
    /// `None` falls back to the group default
    pub lazy: Option<bool>,
    pub on_show: Option<PanelHook>,
    pub on_hide: Option<PanelHook>,
}

impl PanelOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(mut self) -> Self {
        self.active = true;
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = Some(lazy);
        self
    }

    pub fn on_show<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Panel) + Send + 'static,
    {
        self.on_show = Some(Box::new(f));
        self
    }

    pub fn on_hide<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Panel) + Send + 'static,
    {
        self.on_hide = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for PanelOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelOptions")
            .field("active", &self.active)
            .field("icon", &self.icon)
            .field("badge", &self.badge)
            .field("disabled", &self.disabled)
            .field("lazy", &self.lazy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_classes() {
        assert_eq!(NavStyle::Tabs.nav_class(), "nav-tabs");
        assert_eq!(NavStyle::Vertical.nav_class(), "nav-pills flex-column");
        assert_eq!(NavStyle::Custom("cyber".into()).nav_class(), "nav-cyber");
    }

    #[test]
    fn test_group_defaults() {
        let options = GroupOptions::default();
        assert!(options.animation);
        assert!(options.remember_selection);
        assert!(!options.hash_navigation);
        assert!(options.page_path.is_none());
    }
}
