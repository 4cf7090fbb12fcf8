//! Keyboard navigation and ARIA view model
//!
//! Arrow keys move between enabled panels, Home/End jump to the ends,
//! Enter/Space activate the focused control. Controls follow the roving
//! tabindex pattern: exactly one of them is reachable with Tab.

use serde::Serialize;

use crate::group::PanelGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    Home,
    End,
    Enter,
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Previous,
    Next,
    First,
    Last,
    Activate,
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value. Legacy IE names are accepted.
    pub fn from_dom_key(key: &str) -> Option<Key> {
        match key {
            "ArrowLeft" | "Left" => Some(Key::ArrowLeft),
            "ArrowUp" | "Up" => Some(Key::ArrowUp),
            "ArrowRight" | "Right" => Some(Key::ArrowRight),
            "ArrowDown" | "Down" => Some(Key::ArrowDown),
            "Home" => Some(Key::Home),
            "End" => Some(Key::End),
            "Enter" => Some(Key::Enter),
            " " | "Spacebar" => Some(Key::Space),
            _ => None,
        }
    }

    pub fn action(&self) -> KeyAction {
        match self {
            Key::ArrowLeft | Key::ArrowUp => KeyAction::Previous,
            Key::ArrowRight | Key::ArrowDown => KeyAction::Next,
            Key::Home => KeyAction::First,
            Key::End => KeyAction::Last,
            Key::Enter | Key::Space => KeyAction::Activate,
        }
    }
}

/// Attributes of one tab control (`button.nav-link`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlAttributes {
    pub id: String,
    pub role: &'static str,
    pub aria_controls: String,
    pub aria_selected: bool,
    pub tabindex: i8,
    pub disabled: bool,
    pub class: String,
}

/// Attributes of one content pane (`div.tab-pane`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaneAttributes {
    pub id: String,
    pub role: &'static str,
    pub aria_labelledby: String,
    pub tabindex: i8,
    pub visible: bool,
    pub class: String,
}

impl PanelGroup {
    /// Handle a key pressed on a focused tab control. Returns true when a
    /// panel was activated; the host should then suppress the default action.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key.action() {
            KeyAction::Previous => self.navigate_tab(-1),
            KeyAction::Next => self.navigate_tab(1),
            KeyAction::First => match self.first_enabled_id() {
                Some(id) => self.set_active_tab(&id),
                None => false,
            },
            KeyAction::Last => match self.last_enabled_id() {
                Some(id) => self.set_active_tab(&id),
                None => false,
            },
            KeyAction::Activate => match self.focused_id().map(str::to_string) {
                Some(id) => self.set_active_tab(&id),
                None => false,
            },
        }
    }

    pub fn handle_dom_key(&mut self, key: &str) -> bool {
        match Key::from_dom_key(key) {
            Some(key) => self.handle_key(key),
            None => false,
        }
    }

    /// Keyboard focus moved to the control of `id`
    pub fn focus(&mut self, id: &str) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        self.set_focus(Some(id.to_string()));
        true
    }

    /// The control that carries `tabindex=0`
    fn roving_index(&self) -> Option<usize> {
        self.active_index()
            .or_else(|| self.tabs().iter().position(|p| !p.disabled))
            .or(if self.is_empty() { None } else { Some(0) })
    }

    pub fn control_attributes(&self) -> Vec<ControlAttributes> {
        let roving = self.roving_index();
        self.tabs()
            .iter()
            .enumerate()
            .map(|(i, panel)| {
                let mut class = String::from("nav-link");
                if panel.is_active() {
                    class.push_str(" active");
                }
                if panel.disabled {
                    class.push_str(" disabled");
                }

                ControlAttributes {
                    id: panel.control_id(),
                    role: "tab",
                    aria_controls: panel.id.clone(),
                    aria_selected: panel.is_active(),
                    tabindex: if Some(i) == roving { 0 } else { -1 },
                    disabled: panel.disabled,
                    class,
                }
            })
            .collect()
    }

    pub fn pane_attributes(&self) -> Vec<PaneAttributes> {
        let animation = self.options().animation;
        self.tabs()
            .iter()
            .map(|panel| {
                let mut class = String::from("tab-pane");
                if animation {
                    class.push_str(" fade");
                }
                if panel.is_active() {
                    class.push_str(" show active");
                }

                PaneAttributes {
                    id: panel.id.clone(),
                    role: "tabpanel",
                    aria_labelledby: panel.control_id(),
                    tabindex: 0,
                    visible: panel.is_active(),
                    class,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{GroupOptions, PanelOptions};

    fn group() -> PanelGroup {
        let mut g = PanelGroup::new("tabs", GroupOptions::default()).unwrap();
        g.add_tab("A", "Alpha", "", PanelOptions::new().active())
            .unwrap()
            .add_tab("B", "Beta", "", PanelOptions::new())
            .unwrap()
            .add_tab("C", "Gamma", "", PanelOptions::new().disabled())
            .unwrap()
            .add_tab("D", "Delta", "", PanelOptions::new())
            .unwrap();
        g
    }

    fn zero_tabindex(g: &PanelGroup) -> Vec<String> {
        g.control_attributes()
            .into_iter()
            .filter(|c| c.tabindex == 0)
            .map(|c| c.aria_controls)
            .collect()
    }

    #[test]
    fn test_dom_key_parsing() {
        assert_eq!(Key::from_dom_key("ArrowLeft"), Some(Key::ArrowLeft));
        assert_eq!(Key::from_dom_key(" "), Some(Key::Space));
        assert_eq!(Key::from_dom_key("Down"), Some(Key::ArrowDown));
        assert_eq!(Key::from_dom_key("Tab"), None);
        assert_eq!(Key::ArrowUp.action(), KeyAction::Previous);
        assert_eq!(Key::Space.action(), KeyAction::Activate);
    }

    #[test]
    fn test_arrow_keys_skip_disabled() {
        let mut g = group();
        assert!(g.handle_key(Key::ArrowRight));
        assert_eq!(g.active_id(), Some("B"));
        assert!(g.handle_key(Key::ArrowDown));
        assert_eq!(g.active_id(), Some("D"));
        assert!(g.handle_key(Key::ArrowLeft));
        assert_eq!(g.active_id(), Some("B"));
        assert!(g.handle_dom_key("ArrowUp"));
        assert_eq!(g.active_id(), Some("A"));
        assert!(!g.handle_dom_key("Escape"));
    }

    #[test]
    fn test_home_and_end() {
        let mut g = group();
        assert!(g.handle_key(Key::End));
        assert_eq!(g.active_id(), Some("D"));
        assert!(g.handle_key(Key::Home));
        assert_eq!(g.active_id(), Some("A"));

        g.disable_tab("D");
        assert!(g.handle_key(Key::End));
        assert_eq!(g.active_id(), Some("B"));
    }

    #[test]
    fn test_enter_activates_focused() {
        let mut g = group();
        assert!(g.focus("D"));
        assert_eq!(g.active_id(), Some("A"));
        assert!(g.handle_key(Key::Enter));
        assert_eq!(g.active_id(), Some("D"));

        assert!(g.focus("C"));
        assert!(!g.handle_key(Key::Space));
        assert!(!g.focus("missing"));
    }

    #[test]
    fn test_roving_tabindex_follows_activation() {
        let mut g = group();
        assert_eq!(zero_tabindex(&g), vec!["A"]);

        for key in [Key::ArrowRight, Key::ArrowRight, Key::End, Key::Home] {
            g.handle_key(key);
            assert_eq!(zero_tabindex(&g), vec![g.active_id().unwrap().to_string()]);
        }

        let attrs = g.control_attributes();
        assert_eq!(attrs[0].id, "A-tab");
        assert!(attrs[0].aria_selected);
        assert_eq!(attrs[0].class, "nav-link active");
        assert_eq!(attrs[2].class, "nav-link disabled");
        assert!(!attrs[1].aria_selected);
    }

    #[test]
    fn test_roving_tabindex_without_active_panel() {
        let mut g = PanelGroup::new("tabs", GroupOptions::default()).unwrap();
        g.add_tab("A", "Alpha", "", PanelOptions::new().disabled())
            .unwrap()
            .add_tab("B", "Beta", "", PanelOptions::new())
            .unwrap();
        assert_eq!(zero_tabindex(&g), vec!["B"]);

        g.disable_tab("B");
        assert_eq!(zero_tabindex(&g), vec!["A"]);
    }

    #[test]
    fn test_pane_attributes() {
        let g = group();
        let panes = g.pane_attributes();
        assert_eq!(panes[0].class, "tab-pane fade show active");
        assert!(panes[0].visible);
        assert_eq!(panes[1].class, "tab-pane fade");
        assert_eq!(panes[1].aria_labelledby, "B-tab");
        assert_eq!(panes[1].role, "tabpanel");

        let mut still = PanelGroup::new("t", GroupOptions::new().animation(false)).unwrap();
        still
            .add_tab("x", "X", "", PanelOptions::new().active())
            .unwrap();
        assert_eq!(still.pane_attributes()[0].class, "tab-pane show active");
    }
}
