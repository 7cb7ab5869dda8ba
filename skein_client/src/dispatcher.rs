use crate::context::HandlerContext;
use crate::errors::{HandleResult, HandlerError};

use skein_network::protocol::Message;
use std::collections::HashMap;

/// An inbound command handler. This is the signature expected by the
/// `command_handler` attribute macro
pub type HandlerFn = fn(&mut HandlerContext<'_>, &Message) -> HandleResult;

/// A command handler registration. Constructed by the `command_handler` attribute macro.
pub struct HandlerRegistration {
    pub command: &'static str,
    /// Lines with fewer arguments than this are dropped before the handler
    /// sees them
    pub min_args: usize,
    pub handler: HandlerFn,
}

inventory::collect!(HandlerRegistration);

/// A command dispatcher. Collects registered command handlers and allows lookup by
/// command name.
pub struct CommandDispatcher {
    handlers: HashMap<String, &'static HandlerRegistration>,
}

impl CommandDispatcher {
    /// Construct a `CommandDispatcher`.
    ///
    /// Handlers are populated via compile-time registration.
    pub fn new() -> Self {
        let mut map = HashMap::new();

        for reg in inventory::iter::<HandlerRegistration> {
            map.insert(reg.command.to_ascii_uppercase(), reg);
        }

        Self { handlers: map }
    }

    /// Whether anything is registered for `command`
    pub fn handles(&self, command: &str) -> bool {
        self.handlers.contains_key(&command.to_ascii_uppercase())
    }

    /// Look up and execute the handler for a decoded message.
    ///
    /// Nothing here is allowed to fail the connection: unknown commands are
    /// ignored, short messages are dropped, and handler errors are logged.
    pub fn dispatch(&self, ctx: &mut HandlerContext<'_>, message: &Message) {
        let command = message.command.to_ascii_uppercase();

        let Some(reg) = self.handlers.get(&command) else {
            tracing::trace!(%command, "No handler");
            return;
        };

        if message.args.len() < reg.min_args {
            tracing::warn!(
                %command,
                min_args = reg.min_args,
                found = message.args.len(),
                "Dropping message with too few arguments"
            );
            return;
        }

        match (reg.handler)(ctx, message) {
            Ok(()) => {}
            Err(e) if e.is_unknown_target() => {
                tracing::warn!(network = ctx.network_index(), %command, "Ignoring message: {}", e);
            }
            Err(HandlerError::LookupError(e)) => {
                tracing::error!(network = ctx.network_index(), %command, "Model lookup failed: {}", e);
            }
            Err(e) => {
                tracing::warn!(network = ctx.network_index(), %command, "Rejected message: {}", e);
            }
        }
    }
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
