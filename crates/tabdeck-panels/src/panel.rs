//! Panel data structure

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::content::{escape_html, ContentSource, PanelContent};
use crate::error::PanelError;
use crate::state::PanelState;
use crate::Result;

#[derive(Debug, Clone, Serialize)]
pub struct Panel {
    /// Unique within its group; also the pane element id
    pub id: String,
    pub title: String,
    /// Icon class, e.g. `fas fa-chart-line`
    pub icon: Option<String>,
    pub badge: Option<String>,
    pub state: PanelState,
    pub disabled: bool,
    /// Content is produced on first activation
    pub lazy: bool,
    /// Lazy content has been produced successfully
    pub loaded: bool,
    pub content: PanelContent,
    #[serde(skip)]
    pub source: ContentSource,
    pub activated_at: Option<DateTime<Utc>>,
}

impl Panel {
    pub(crate) fn new(
        id: String,
        title: String,
        source: ContentSource,
        icon: Option<String>,
        badge: Option<String>,
        disabled: bool,
        lazy: bool,
    ) -> Result<Self> {
        if id.trim().is_empty() || id.chars().any(char::is_whitespace) {
            return Err(PanelError::InvalidId(id));
        }

        // Url content can only arrive asynchronously
        let lazy = lazy || source.requires_fetch();

        let mut panel = Self {
            id,
            title,
            icon,
            badge,
            state: PanelState::Inactive,
            disabled,
            lazy,
            loaded: false,
            content: PanelContent::Pending,
            source,
            activated_at: None,
        };

        if !panel.lazy {
            panel.content = panel.resolve_now();
        }

        Ok(panel)
    }

    /// Resolve a synchronous source. Url sources stay pending.
    pub(crate) fn resolve_now(&self) -> PanelContent {
        match &self.source {
            ContentSource::Inline(markup) => PanelContent::Ready {
                markup: markup.clone(),
            },
            ContentSource::Producer(produce) => match produce() {
                Ok(markup) => PanelContent::Ready { markup },
                Err(message) => PanelContent::Failed { message },
            },
            ContentSource::Url(_) => PanelContent::Pending,
        }
    }

    pub(crate) fn transition_to(&mut self, new_state: PanelState) -> Result<()> {
        if new_state == self.state {
            return Ok(());
        }
        if !self.state.can_transition_to(new_state, self.disabled) {
            return Err(PanelError::Disabled(self.id.clone()));
        }

        tracing::debug!(
            panel_id = %self.id,
            from = %self.state,
            to = %new_state,
            "Panel state transition"
        );

        self.state = new_state;
        if new_state.is_active() {
            self.activated_at = Some(Utc::now());
        }

        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Lazy and not yet loaded
    pub fn needs_load(&self) -> bool {
        self.lazy && !self.loaded
    }

    /// Id of the tab control element
    pub fn control_id(&self) -> String {
        format!("{}-tab", self.id)
    }

    /// Inner markup of the tab control: icon, title, badge
    pub fn title_markup(&self) -> String {
        let mut out = String::new();
        if let Some(icon) = &self.icon {
            out.push_str(&format!(r#"<i class="{} me-2"></i>"#, escape_html(icon)));
        }
        out.push_str(&escape_html(&self.title));
        if let Some(badge) = self.badge.as_deref().filter(|b| !b.is_empty()) {
            out.push_str(&format!(
                r#" <span class="badge bg-secondary ms-2">{}</span>"#,
                escape_html(badge)
            ));
        }
        out
    }
}
