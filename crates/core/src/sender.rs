//! The sender abstraction.
//!
//! The engine itself is generic over any sender type `S`; it only hands the
//! sender to requirement predicates, redirect modifiers, and executors. This
//! trait is the minimal surface those callbacks can rely on when they need to
//! talk back to whoever issued the command.

use std::sync::Arc;

/// Something that can issue commands and receive feedback.
pub trait CommandSender {
    /// Display name of the sender.
    fn name(&self) -> &str;

    /// Deliver a message to the sender.
    fn send_message(&self, message: &str);
}

impl<T: CommandSender + ?Sized> CommandSender for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn send_message(&self, message: &str) {
        (**self).send_message(message);
    }
}

impl<T: CommandSender + ?Sized> CommandSender for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn send_message(&self, message: &str) {
        (**self).send_message(message);
    }
}
