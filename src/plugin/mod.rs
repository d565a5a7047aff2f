//! Plugin seam between the chat host and the vision handler
//!
//! The host wraps each inbound message in an [`EventContext`] and offers it to
//! every registered [`Plugin`] in order until one of them breaks the chain.

/// GLM vision message handler
pub mod handler;
/// Keyword classification and URL extraction
pub mod trigger;

pub use handler::VisionPlugin;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Kind of inbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Text,
    Image,
}

/// What the chain should do after a plugin has seen the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventAction {
    /// Not handled, offer the event to the next plugin
    #[default]
    Continue,
    /// Handled, the reply is final and no other plugin runs
    BreakPass,
}

/// An inbound message travelling through the plugin chain
#[derive(Debug, Clone)]
pub struct EventContext {
    pub kind: ContextKind,
    pub content: String,
    pub reply: Option<String>,
    pub action: EventAction,
}

impl EventContext {
    /// A fresh text event with no reply
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: ContextKind::Text,
            content: content.into(),
            reply: None,
            action: EventAction::Continue,
        }
    }

    /// Set the reply and stop the chain
    pub fn reply_and_break(&mut self, reply: impl Into<String>) {
        self.reply = Some(reply.into());
        self.action = EventAction::BreakPass;
    }
}

/// Static plugin description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    pub name: &'static str,
    pub desc: &'static str,
    pub version: &'static str,
    pub author: &'static str,
}

/// A message handler registered with the host
#[async_trait]
pub trait Plugin: Send + Sync {
    fn info(&self) -> &PluginInfo;

    /// Inspect the event; set a reply and `BreakPass` to claim it.
    async fn on_handle_context(&self, ctx: &mut EventContext);

    fn help_text(&self) -> String;
}

/// Ordered list of plugins
#[derive(Default, Clone)]
pub struct PluginChain {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        debug!(plugin = plugin.info().name, "Registering plugin");
        self.plugins.push(plugin);
    }

    /// Offer `ctx` to each plugin in registration order, stopping at the first break.
    pub async fn dispatch(&self, ctx: &mut EventContext) {
        for plugin in &self.plugins {
            plugin.on_handle_context(ctx).await;
            if ctx.action == EventAction::BreakPass {
                debug!(plugin = plugin.info().name, "Event handled");
                return;
            }
        }
    }

    /// Help text of every registered plugin, separated by blank lines
    #[must_use]
    pub fn help_text(&self) -> String {
        self.plugins
            .iter()
            .map(|p| p.help_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
