//! Ordered fan-out of inbound messages to subscribers.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::error;

use super::messages::InboundMessage;

/// Subscriber callback. Identity is the `Arc` allocation, so keep a clone to
/// remove it later.
pub type MessageHandler = Arc<dyn Fn(&InboundMessage) + Send + Sync>;

/// Position a handler occupied when it was registered.
///
/// Ids count up from 0 on a fresh registry. They are informational only;
/// removal goes by handler identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(usize);

impl HandlerId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Registered message handlers, in registration order.
#[derive(Default)]
pub struct SubscriberRegistry {
    handlers: Mutex<Vec<MessageHandler>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<MessageHandler>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, handler: MessageHandler) -> HandlerId {
        let mut handlers = self.lock();
        handlers.push(handler);
        HandlerId(handlers.len() - 1)
    }

    /// Remove the first registration of `handler`. Returns false if it was
    /// never registered.
    pub fn remove(&self, handler: &MessageHandler) -> bool {
        let mut handlers = self.lock();
        match handlers.iter().position(|h| same_handler(h, handler)) {
            Some(index) => {
                handlers.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Deliver `message` to every handler in registration order.
    ///
    /// Works on a snapshot: handlers added or removed while dispatching take
    /// effect from the next message. A panicking handler is logged and the
    /// remaining handlers still run. Returns how many handlers completed.
    pub fn dispatch(&self, message: &InboundMessage) -> usize {
        let snapshot: Vec<MessageHandler> = self.lock().clone();

        let mut delivered = 0;
        for (index, handler) in snapshot.iter().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| handler(message))) {
                Ok(()) => delivered += 1,
                Err(panic) => error!(
                    handler = index,
                    "WebSocket message handler panicked: {}",
                    panic_message(panic.as_ref())
                ),
            }
        }
        delivered
    }
}

fn same_handler(a: &MessageHandler, b: &MessageHandler) -> bool {
    // Compare data pointers only; vtable pointers may differ per codegen unit.
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}
