//! Panel content sources and pane view states

use serde::Serialize;
use std::sync::Arc;

/// Produces pane markup on demand. An `Err` is shown as an inline error.
pub type ContentProducer = Arc<dyn Fn() -> std::result::Result<String, String> + Send + Sync>;

/// Where a panel's markup comes from
#[derive(Clone)]
pub enum ContentSource {
    /// Markup known up front
    Inline(String),
    /// Fetched with an HTTP GET, always lazily
    Url(String),
    /// Computed by the host when the pane is first shown
    Producer(ContentProducer),
}

impl ContentSource {
    pub fn inline(markup: impl Into<String>) -> Self {
        ContentSource::Inline(markup.into())
    }

    pub fn url(url: impl Into<String>) -> Self {
        ContentSource::Url(url.into())
    }

    pub fn producer<F>(f: F) -> Self
    where
        F: Fn() -> std::result::Result<String, String> + Send + Sync + 'static,
    {
        ContentSource::Producer(Arc::new(f))
    }

    /// Url sources cannot be resolved synchronously
    pub fn requires_fetch(&self) -> bool {
        matches!(self, ContentSource::Url(_))
    }
}

impl std::fmt::Debug for ContentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentSource::Inline(markup) => f.debug_tuple("Inline").field(markup).finish(),
            ContentSource::Url(url) => f.debug_tuple("Url").field(url).finish(),
            ContentSource::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

impl From<&str> for ContentSource {
    fn from(markup: &str) -> Self {
        ContentSource::Inline(markup.to_string())
    }
}

impl From<String> for ContentSource {
    fn from(markup: String) -> Self {
        ContentSource::Inline(markup)
    }
}

/// What the pane currently displays
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PanelContent {
    /// Lazy content not requested yet
    #[default]
    Pending,
    /// Fetch in flight
    Loading,
    Ready { markup: String },
    /// Last attempt failed; the pane offers a retry
    Failed { message: String },
}

impl PanelContent {
    pub fn is_ready(&self) -> bool {
        matches!(self, PanelContent::Ready { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PanelContent::Failed { .. })
    }

    /// Inner markup of the pane element
    pub fn to_markup(&self, panel_id: &str) -> String {
        match self {
            PanelContent::Pending | PanelContent::Loading => concat!(
                r#"<div class="text-center py-4">"#,
                r#"<div class="spinner-border text-primary" role="status">"#,
                r#"<span class="visually-hidden">Loading...</span>"#,
                r#"</div></div>"#
            )
            .to_string(),
            PanelContent::Ready { markup } => markup.clone(),
            PanelContent::Failed { message } => format!(
                concat!(
                    r#"<div class="alert alert-danger" role="alert">"#,
                    r#"<i class="fas fa-exclamation-triangle me-2"></i>"#,
                    "Failed to load content: {}",
                    r#"<button type="button" class="btn btn-sm btn-outline-danger ms-2" data-retry-panel="{}">Retry</button>"#,
                    "</div>"
                ),
                escape_html(message),
                escape_html(panel_id)
            ),
        }
    }
}

/// Escape text for use in element content or a quoted attribute
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_markup_escapes_message_and_offers_retry() {
        let content = PanelContent::Failed {
            message: "HTTP 500: <oops>".to_string(),
        };
        let markup = content.to_markup("news");

        assert!(markup.contains("HTTP 500: &lt;oops&gt;"));
        assert!(markup.contains(r#"data-retry-panel="news""#));
    }

    #[test]
    fn test_loading_markup_is_spinner() {
        assert!(PanelContent::Loading
            .to_markup("a")
            .contains("spinner-border"));
        assert_eq!(
            PanelContent::Pending.to_markup("a"),
            PanelContent::Loading.to_markup("a")
        );
    }

    #[test]
    fn test_source_conversions() {
        assert!(matches!(ContentSource::from("<p/>"), ContentSource::Inline(_)));
        assert!(ContentSource::url("/tabs/analytics").requires_fetch());
        let producer = ContentSource::producer(|| Ok("<p>hi</p>".to_string()));
        assert_eq!(format!("{:?}", producer), "Producer(..)");
    }
}
