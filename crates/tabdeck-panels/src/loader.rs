//! Lazy content loading
//!
//! Showing a lazy panel with a Url source queues a [`LoadRequest`] and puts
//! a spinner in the pane. The host drains the queue with
//! [`PanelGroup::run_pending_loads`] (or fetches on its own and reports back
//! through [`PanelGroup::complete_load`]). A panel has at most one request
//! outstanding; results for a request that is no longer current are dropped.

use async_trait::async_trait;
use reqwest::redirect::Policy;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::content::PanelContent;
use crate::group::PanelGroup;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Producer(String),
}

/// One queued fetch for one panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub panel_id: String,
    pub url: String,
    pub generation: u64,
}

#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch the markup at `url`
    async fn fetch(&self, url: &str) -> Result<String, LoadError>;
}

/// reqwest-backed fetcher. Relative panel URLs resolve against `base_url`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: Option<Url>,
}

impl HttpFetcher {
    pub fn new(
        timeout: Duration,
        user_agent: &str,
        base_url: Option<Url>,
    ) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .redirect(Policy::limited(5))
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| LoadError::Network(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn resolve(&self, raw: &str) -> Result<Url, LoadError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LoadError::InvalidUrl("URL is empty".to_string()));
        }

        let url = match Url::parse(trimmed) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => base
                    .join(trimmed)
                    .map_err(|e| LoadError::InvalidUrl(format!("{}: {}", trimmed, e)))?,
                None => {
                    return Err(LoadError::InvalidUrl(format!(
                        "{}: relative URL without a base",
                        trimmed
                    )))
                }
            },
            Err(e) => return Err(LoadError::InvalidUrl(format!("{}: {}", trimmed, e))),
        };

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(LoadError::InvalidUrl(format!(
                "{}: only http(s) is supported",
                url
            )));
        }

        Ok(url)
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, LoadError> {
        let url = self.resolve(url)?;

        let resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                LoadError::Timeout
            } else {
                LoadError::Network(e.to_string())
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LoadError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        resp.text().await.map_err(|e| {
            if e.is_timeout() {
                LoadError::Timeout
            } else {
                LoadError::Network(e.to_string())
            }
        })
    }
}

impl PanelGroup {
    pub fn pending_loads(&self) -> &[LoadRequest] {
        &self.pending
    }

    /// Hand the queued requests to the caller. They stay in flight until
    /// completed.
    pub fn take_pending_loads(&mut self) -> Vec<LoadRequest> {
        std::mem::take(&mut self.pending)
    }

    /// Apply the outcome of a fetch. Returns false if the request is stale
    /// (panel removed, or a newer request superseded it).
    pub fn complete_load(
        &mut self,
        request: &LoadRequest,
        result: Result<String, LoadError>,
    ) -> bool {
        if self.in_flight.get(&request.panel_id) != Some(&request.generation) {
            tracing::debug!(
                container = %self.container_id(),
                panel_id = %request.panel_id,
                generation = request.generation,
                "Dropping stale load result"
            );
            return false;
        }
        self.in_flight.remove(&request.panel_id);

        let Some(index) = self.index_of(&request.panel_id) else {
            return false;
        };

        match result {
            Ok(markup) => self.finish_load(index, PanelContent::Ready { markup }),
            Err(error) => self.fail_load(index, error),
        }

        true
    }

    /// Give back a request taken with [`take_pending_loads`](Self::take_pending_loads)
    /// that will never be completed. The panel loads again on its next
    /// activation or retry.
    pub fn abandon_load(&mut self, request: &LoadRequest) -> bool {
        if self.in_flight.get(&request.panel_id) != Some(&request.generation) {
            return false;
        }
        self.in_flight.remove(&request.panel_id);

        if let Some(panel) = self.panel_mut(&request.panel_id) {
            panel.content = PanelContent::Pending;
        }

        tracing::debug!(panel_id = %request.panel_id, generation = request.generation, "Abandoned lazy load");

        true
    }

    /// Retry action of a failed pane. True if a load is queued afterwards.
    pub fn retry_load(&mut self, id: &str) -> bool {
        match self.index_of(id) {
            Some(index) => self.begin_load(index) || self.pending.iter().any(|r| r.panel_id == id),
            None => false,
        }
    }

    /// Fetch every queued request in order. Returns how many were applied.
    ///
    /// A request leaves the queue only once its result is applied, so
    /// dropping the future (a timeout, `select!`) keeps the unfinished ones
    /// queued for the next run.
    pub async fn run_pending_loads<F>(&mut self, fetcher: &F) -> usize
    where
        F: ContentFetcher + ?Sized,
    {
        let mut applied = 0;

        while let Some(request) = self.pending.first().cloned() {
            tracing::debug!(panel_id = %request.panel_id, url = %request.url, "Fetching lazy content");
            let result = fetcher.fetch(&request.url).await;
            self.pending.remove(0);
            if self.complete_load(&request, result) {
                applied += 1;
            }
        }

        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupServices;
    use crate::options::{GroupOptions, PanelOptions};
    use crate::ContentSource;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tabdeck_feedback::{ToastCenter, ToastKind};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// Serves canned responses and counts calls per URL
    #[derive(Default)]
    struct FakeFetcher {
        responses: Mutex<HashMap<String, Result<String, LoadError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        fn respond(&self, url: &str, result: Result<String, LoadError>) {
            self.responses.lock().insert(url.to_string(), result);
        }

        fn calls_to(&self, url: &str) -> usize {
            self.calls.lock().iter().filter(|u| *u == url).count()
        }
    }

    #[async_trait]
    impl ContentFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<String, LoadError> {
            self.calls.lock().push(url.to_string());
            self.responses
                .lock()
                .get(url)
                .cloned()
                .unwrap_or_else(|| Err(LoadError::Network("no route".into())))
        }
    }

    fn group(toasts: Arc<ToastCenter>) -> PanelGroup {
        let mut g = PanelGroup::with_services(
            "news-tabs",
            GroupOptions::default(),
            GroupServices {
                toasts,
                store: None,
            },
        )
        .unwrap();
        g.add_tab("latest", "Latest", "<p>latest</p>", PanelOptions::new().active())
            .unwrap()
            .add_tab(
                "analysis",
                "Analysis",
                ContentSource::url("/tabs/analysis"),
                PanelOptions::new(),
            )
            .unwrap();
        g
    }

    #[tokio::test]
    async fn test_lazy_panel_fetches_exactly_once() {
        let fetcher = FakeFetcher::default();
        fetcher.respond("/tabs/analysis", Ok("<p>charts</p>".into()));
        let mut g = group(Arc::new(ToastCenter::new()));

        // Registration alone fetches nothing
        assert!(g.pending_loads().is_empty());

        g.set_active_tab("analysis");
        assert_eq!(g.tab("analysis").unwrap().content, PanelContent::Loading);
        assert_eq!(g.run_pending_loads(&fetcher).await, 1);
        assert_eq!(fetcher.calls_to("/tabs/analysis"), 1);

        let panel = g.tab("analysis").unwrap();
        assert!(panel.loaded);
        assert_eq!(
            panel.content,
            PanelContent::Ready {
                markup: "<p>charts</p>".into()
            }
        );

        g.set_active_tab("latest");
        g.set_active_tab("analysis");
        assert_eq!(g.run_pending_loads(&fetcher).await, 0);
        assert_eq!(fetcher.calls_to("/tabs/analysis"), 1);
    }

    #[tokio::test]
    async fn test_failure_shows_retriable_error_and_toast() {
        let toasts = Arc::new(ToastCenter::new());
        let fetcher = FakeFetcher::default();
        fetcher.respond(
            "/tabs/analysis",
            Err(LoadError::Http {
                status: 503,
                reason: "Service Unavailable".into(),
            }),
        );
        let mut g = group(toasts.clone());

        g.set_active_tab("analysis");
        g.run_pending_loads(&fetcher).await;

        let panel = g.tab("analysis").unwrap();
        assert!(!panel.loaded);
        assert!(panel.is_active());
        assert!(panel.content.is_failed());
        assert!(panel
            .content
            .to_markup(&panel.id)
            .contains("HTTP 503: Service Unavailable"));

        let shown = toasts.visible();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].kind, ToastKind::Error);

        // Next activation retries automatically
        fetcher.respond("/tabs/analysis", Ok("<p>back</p>".into()));
        g.set_active_tab("latest");
        g.set_active_tab("analysis");
        assert_eq!(g.run_pending_loads(&fetcher).await, 1);
        assert!(g.tab("analysis").unwrap().loaded);
        assert_eq!(fetcher.calls_to("/tabs/analysis"), 2);
    }

    #[tokio::test]
    async fn test_retry_action() {
        let fetcher = FakeFetcher::default();
        let mut g = group(Arc::new(ToastCenter::new()));

        g.set_active_tab("analysis");
        g.run_pending_loads(&fetcher).await;
        assert!(g.tab("analysis").unwrap().content.is_failed());

        fetcher.respond("/tabs/analysis", Ok("<p>ok</p>".into()));
        assert!(g.retry_load("analysis"));
        assert_eq!(g.tab("analysis").unwrap().content, PanelContent::Loading);
        g.run_pending_loads(&fetcher).await;
        assert!(g.tab("analysis").unwrap().loaded);

        assert!(!g.retry_load("analysis"));
        assert!(!g.retry_load("missing"));
    }

    struct StalledFetcher;

    #[async_trait]
    impl ContentFetcher for StalledFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, LoadError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_timed_out_drain_keeps_request_queued() {
        let mut g = group(Arc::new(ToastCenter::new()));
        g.set_active_tab("analysis");

        let drained = tokio::time::timeout(
            Duration::from_millis(50),
            g.run_pending_loads(&StalledFetcher),
        )
        .await;
        assert!(drained.is_err());
        assert_eq!(g.pending_loads().len(), 1);
        assert_eq!(g.tab("analysis").unwrap().content, PanelContent::Loading);

        g.set_active_tab("latest");
        g.set_active_tab("analysis");
        assert!(g.retry_load("analysis"));
        assert_eq!(g.pending_loads().len(), 1);

        let fetcher = FakeFetcher::default();
        fetcher.respond("/tabs/analysis", Ok("<p>charts</p>".into()));
        assert_eq!(g.run_pending_loads(&fetcher).await, 1);
        assert!(g.tab("analysis").unwrap().loaded);
        assert!(g.pending_loads().is_empty());
    }

    #[test]
    fn test_abandoned_request_loads_again_on_activation() {
        let mut g = group(Arc::new(ToastCenter::new()));
        g.set_active_tab("analysis");
        let taken = g.take_pending_loads();

        // Still outstanding: activation does not queue a second request
        g.set_active_tab("latest");
        g.set_active_tab("analysis");
        assert!(g.pending_loads().is_empty());

        assert!(g.abandon_load(&taken[0]));
        assert!(!g.abandon_load(&taken[0]));
        assert_eq!(g.tab("analysis").unwrap().content, PanelContent::Pending);

        g.set_active_tab("latest");
        g.set_active_tab("analysis");
        let again = g.take_pending_loads();
        assert_eq!(again.len(), 1);
        assert!(again[0].generation > taken[0].generation);
        assert!(!g.complete_load(&taken[0], Ok("<p>late</p>".into())));
        assert!(g.complete_load(&again[0], Ok("<p>fresh</p>".into())));
    }

    #[test]
    fn test_repeated_activation_while_in_flight_queues_one_request() {
        let mut g = group(Arc::new(ToastCenter::new()));

        g.set_active_tab("analysis");
        g.set_active_tab("latest");
        g.set_active_tab("analysis");
        g.set_active_tab("analysis");

        assert_eq!(g.pending_loads().len(), 1);
    }

    #[test]
    fn test_stale_result_after_removal_is_dropped() {
        let mut g = group(Arc::new(ToastCenter::new()));
        g.set_active_tab("analysis");
        let requests = g.take_pending_loads();
        assert_eq!(requests.len(), 1);

        g.remove_tab("analysis");
        g.add_tab(
            "analysis",
            "Analysis",
            ContentSource::url("/tabs/analysis"),
            PanelOptions::new(),
        )
        .unwrap();
        g.set_active_tab("analysis");

        assert!(!g.complete_load(&requests[0], Ok("<p>old</p>".into())));
        assert_eq!(g.tab("analysis").unwrap().content, PanelContent::Loading);

        let fresh = g.take_pending_loads();
        assert!(g.complete_load(&fresh[0], Ok("<p>new</p>".into())));
        assert!(g.tab("analysis").unwrap().loaded);
    }

    #[test]
    fn test_lazy_inline_and_producer_resolve_on_first_show() {
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);

        let mut g = PanelGroup::new("t", GroupOptions::new().lazy(true)).unwrap();
        g.add_tab("a", "A", "<p>a</p>", PanelOptions::new())
            .unwrap()
            .add_tab(
                "b",
                "B",
                ContentSource::producer(move || {
                    *counter.lock() += 1;
                    Ok("<p>b</p>".to_string())
                }),
                PanelOptions::new(),
            )
            .unwrap();

        assert_eq!(g.tab("a").unwrap().content, PanelContent::Pending);
        assert_eq!(*calls.lock(), 0);

        g.set_active_tab("b");
        g.set_active_tab("a");
        g.set_active_tab("b");

        assert_eq!(*calls.lock(), 1);
        assert!(g.tab("a").unwrap().loaded);
        assert!(g.pending_loads().is_empty());
    }

    #[test]
    fn test_resolve_relative_urls() {
        let base = Url::parse("https://news.example.com/dashboard/").unwrap();
        let fetcher = HttpFetcher::new(Duration::from_secs(5), "tabdeck-test", Some(base)).unwrap();

        assert_eq!(
            fetcher.resolve("/tabs/analysis").unwrap().as_str(),
            "https://news.example.com/tabs/analysis"
        );
        assert_eq!(
            fetcher.resolve("partials/top").unwrap().as_str(),
            "https://news.example.com/dashboard/partials/top"
        );
        assert!(matches!(
            fetcher.resolve("ftp://example.com/x"),
            Err(LoadError::InvalidUrl(_))
        ));
        assert!(fetcher.resolve("  ").is_err());

        let bare = HttpFetcher::new(Duration::from_secs(5), "tabdeck-test", None).unwrap();
        assert!(bare.resolve("/tabs/analysis").is_err());
    }

    /// Answers exactly one request with a canned status line and body
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "{}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn test_http_fetcher_success() {
        let base = serve_once("HTTP/1.1 200 OK", "<ul><li>story</li></ul>").await;
        let fetcher = HttpFetcher::new(
            Duration::from_secs(5),
            "tabdeck-test",
            Some(Url::parse(&base).unwrap()),
        )
        .unwrap();

        let body = fetcher.fetch("tabs/latest").await.unwrap();
        assert_eq!(body, "<ul><li>story</li></ul>");
    }

    #[tokio::test]
    async fn test_http_fetcher_non_success_status() {
        let base = serve_once("HTTP/1.1 404 Not Found", "missing").await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5), "tabdeck-test", None).unwrap();

        let err = fetcher
            .fetch(&format!("{}tabs/none", base))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LoadError::Http {
                status: 404,
                reason: "Not Found".into()
            }
        );
    }
}
