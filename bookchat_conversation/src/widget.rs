//! The embeddable widget: store, dispatcher and panel state behind one handle.
//!
//! Render layers bind to [`ChatWidget`] only: they call `submit`/`toggle`,
//! read `snapshot`/`is_open`, and `subscribe` to redraw on change.

use std::sync::{Arc, Mutex, PoisonError};

use bookchat_core::{
    ApiBaseUrl, AskError, AskTransport, ConversationObserver, ConversationState, HealthReport,
    HostAdapter,
};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::dispatcher::{RequestDispatcher, SubmitOutcome};
use crate::store::ConversationStore;
use crate::visibility::VisibilityController;

const DEFAULT_GREETING: &str =
    "Hello! I'm your book assistant. Ask me anything about the book content!";
const DEFAULT_FALLBACK_MESSAGE: &str =
    "Sorry, I encountered an error processing your question. Please try again.";

/// Blank text never reaches the conversation; the default stands in.
fn non_blank_or(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        warn!("Ignoring blank widget text, using \"{default}\"");
        default.to_string()
    } else {
        value
    }
}

/// Immutable per-instance settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub api_base_url: ApiBaseUrl,
    pub greeting: String,
    pub fallback_message: String,
    pub start_open: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_base_url: ApiBaseUrl::default(),
            greeting: DEFAULT_GREETING.to_string(),
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            start_open: false,
        }
    }
}

impl WidgetConfig {
    /// Read the host's base URL once; unset means the default origin.
    #[must_use]
    pub fn from_host(host: &dyn HostAdapter) -> Self {
        let api_base_url = host
            .api_base_url()
            .map_or_else(ApiBaseUrl::default, |url| ApiBaseUrl::new(&url));
        Self {
            api_base_url,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_api_base_url(mut self, url: &str) -> Self {
        self.api_base_url = ApiBaseUrl::new(url);
        self
    }

    #[must_use]
    pub fn with_greeting(mut self, greeting: String) -> Self {
        self.greeting = non_blank_or(greeting, DEFAULT_GREETING);
        self
    }

    #[must_use]
    pub fn with_fallback_message(mut self, message: String) -> Self {
        self.fallback_message = non_blank_or(message, DEFAULT_FALLBACK_MESSAGE);
        self
    }

    /// Replace blank display text set directly on the public fields.
    fn normalized(self) -> Self {
        Self {
            greeting: non_blank_or(self.greeting, DEFAULT_GREETING),
            fallback_message: non_blank_or(self.fallback_message, DEFAULT_FALLBACK_MESSAGE),
            ..self
        }
    }

    #[must_use]
    pub const fn with_start_open(mut self, open: bool) -> Self {
        self.start_open = open;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Mounted,
    Unmounted,
}

pub struct ChatWidget<T = Arc<dyn AskTransport>>
where
    T: Send + Sync,
{
    config: WidgetConfig,
    store: ConversationStore,
    dispatcher: RequestDispatcher<T>,
    visibility: VisibilityController,
    lifecycle: Mutex<Lifecycle>,
    abort: watch::Sender<bool>,
}

impl<T> ChatWidget<T>
where
    T: AskTransport,
{
    #[must_use]
    pub fn new(config: WidgetConfig, transport: T) -> Self {
        let config = config.normalized();
        let store = ConversationStore::new(&config.greeting);
        let (abort, abort_rx) = watch::channel(false);
        let dispatcher = RequestDispatcher::new(
            transport,
            store.clone(),
            config.api_base_url.clone(),
            config.fallback_message.clone(),
            abort_rx,
        );

        Self {
            visibility: VisibilityController::new(config.start_open),
            config,
            store,
            dispatcher,
            lifecycle: Mutex::new(Lifecycle::Created),
            abort,
        }
    }

    /// Hand the widget to its host. Only the first call has any effect.
    pub fn mount(&self, host: &dyn HostAdapter) -> bool {
        {
            let mut lifecycle = self.lifecycle();
            if *lifecycle != Lifecycle::Created {
                warn!("Widget already mounted, ignoring");
                return false;
            }
            *lifecycle = Lifecycle::Mounted;
        }

        info!("Mounting widget (session {})", self.store.session_id());
        host.mount(&self.store.snapshot());
        true
    }

    /// Detach from the host and abort any in-flight question.
    ///
    /// The conversation is over after this: later submissions are dropped.
    pub fn unmount(&self, host: &dyn HostAdapter) -> bool {
        {
            let mut lifecycle = self.lifecycle();
            if *lifecycle != Lifecycle::Mounted {
                return false;
            }
            *lifecycle = Lifecycle::Unmounted;
        }

        info!("Unmounting widget (session {})", self.store.session_id());
        self.abort.send_replace(true);
        host.unmount();
        true
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        *self.lifecycle() == Lifecycle::Mounted
    }

    pub async fn submit(&self, question: &str) -> SubmitOutcome {
        self.dispatcher.submit(question).await
    }

    pub async fn health(&self) -> Result<HealthReport, AskError> {
        self.dispatcher.health().await
    }

    /// Flip the panel; returns whether it is now open.
    pub fn toggle(&self) -> bool {
        self.visibility.toggle()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.visibility.is_open()
    }

    #[must_use]
    pub fn snapshot(&self) -> ConversationState {
        self.store.snapshot()
    }

    pub fn subscribe(&self, observer: Arc<dyn ConversationObserver>) {
        self.store.subscribe(observer);
    }

    #[must_use]
    pub const fn config(&self) -> &WidgetConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &ConversationStore {
        &self.store
    }

    fn lifecycle(&self) -> std::sync::MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
