//! Application callbacks
//!
//! Handlers run on whatever context delivered the event, usually the radio
//! driver's. Keep them short and defer heavy work to the main loop.

use std::collections::HashMap;
use std::fmt;

use crate::protocol::{MacAddress, Message, MessageKind};

/// Receives every validated inbound message.
pub trait MessageHandler: Send + Sync {
    /// Called with the link-layer source address and the decoded message.
    fn on_message(&self, source: MacAddress, message: &Message);
}

impl<F> MessageHandler for F
where
    F: Fn(MacAddress, &Message) + Send + Sync,
{
    fn on_message(&self, source: MacAddress, message: &Message) {
        self(source, message);
    }
}

/// Receives link-layer delivery outcomes.
pub trait SendHandler: Send + Sync {
    /// `delivered` reflects the radio's acknowledgment, not processing by
    /// the remote application.
    fn on_send_complete(&self, destination: MacAddress, delivered: bool);
}

impl<F> SendHandler for F
where
    F: Fn(MacAddress, bool) + Send + Sync,
{
    fn on_send_complete(&self, destination: MacAddress, delivered: bool) {
        self(destination, delivered);
    }
}

/// Routes each message kind to its own handler.
///
/// Kinds without a route go to the fallback, or are dropped if there is none.
#[derive(Default)]
pub struct KindRouter {
    routes: HashMap<MessageKind, Box<dyn MessageHandler>>,
    fallback: Option<Box<dyn MessageHandler>>,
}

impl KindRouter {
    /// Create an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `kind` to `handler`, replacing any earlier route.
    #[must_use]
    pub fn route(mut self, kind: MessageKind, handler: impl MessageHandler + 'static) -> Self {
        self.routes.insert(kind, Box::new(handler));
        self
    }

    /// Handle every unrouted kind with `handler`.
    #[must_use]
    pub fn fallback(mut self, handler: impl MessageHandler + 'static) -> Self {
        self.fallback = Some(Box::new(handler));
        self
    }

    /// Whether messages of `kind` reach some handler.
    #[must_use]
    pub fn handles(&self, kind: MessageKind) -> bool {
        self.routes.contains_key(&kind) || self.fallback.is_some()
    }
}

impl MessageHandler for KindRouter {
    fn on_message(&self, source: MacAddress, message: &Message) {
        if let Some(handler) = self.routes.get(&message.kind()).or(self.fallback.as_ref()) {
            handler.on_message(source, message);
        }
    }
}

impl fmt::Debug for KindRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.routes.keys().copied().collect();
        kinds.sort_by_key(|kind| kind.index());
        f.debug_struct("KindRouter")
            .field("routes", &kinds)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
