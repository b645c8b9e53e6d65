//! Typed publish/subscribe bus.
//!
//! Each message type has its own ordered subscriber list. Receivers are shared
//! `Rc<RefCell<_>>` handles and are identified by pointer, so the same object
//! can listen to several message types and later detach from each of them.
//!
//! The bus is built for a single logical thread: all methods take `&self` so
//! a receiver may subscribe, unsubscribe or publish from inside its own
//! handler.
//!
//! Dispatch rules:
//! - receivers run in subscription order
//! - a receiver is registered at most once per message type
//! - a publish iterates the list as it was when the publish started;
//!   receivers unsubscribed mid-dispatch are skipped, receivers subscribed
//!   mid-dispatch wait for the next publish
//! - a receiver already handling a message is not re-entered

use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Something that reacts to messages of type `M`.
pub trait MessageReceiver<M> {
    fn on_message_received(&mut self, message: M);
}

type Handle<M> = Rc<RefCell<dyn MessageReceiver<M>>>;

/// Per-session message registry
#[derive(Default)]
pub struct MessageBus {
    receivers: RefCell<HashMap<TypeId, Box<dyn Any>>>,
}

fn address<T: ?Sized>(rc: &Rc<T>) -> *const () {
    Rc::as_ptr(rc).cast::<()>()
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a receiver for `M`. Returns `false` if it was already registered.
    pub fn subscribe<M, R>(&self, receiver: &Rc<RefCell<R>>) -> bool
    where
        M: 'static,
        R: MessageReceiver<M> + 'static,
    {
        let mut receivers = self.receivers.borrow_mut();
        let entry = receivers
            .entry(TypeId::of::<M>())
            .or_insert_with(|| Box::new(Vec::<Handle<M>>::new()));
        let Some(list) = entry.downcast_mut::<Vec<Handle<M>>>() else {
            return false;
        };

        let target = address(receiver);
        if list.iter().any(|h| address(h) == target) {
            debug!(message = type_name::<M>(), "duplicate subscription ignored");
            return false;
        }

        let handle: Handle<M> = receiver.clone();
        list.push(handle);
        debug!(message = type_name::<M>(), subscribers = list.len(), "subscribed");
        true
    }

    /// Remove a receiver from `M`'s list. Returns `false` if it was not registered.
    ///
    /// The type's entry is dropped once its last receiver leaves.
    pub fn unsubscribe<M, R>(&self, receiver: &Rc<RefCell<R>>) -> bool
    where
        M: 'static,
        R: MessageReceiver<M> + 'static,
    {
        let key = TypeId::of::<M>();
        let mut receivers = self.receivers.borrow_mut();
        let Some(list) = receivers
            .get_mut(&key)
            .and_then(|entry| entry.downcast_mut::<Vec<Handle<M>>>())
        else {
            return false;
        };

        let target = address(receiver);
        let Some(index) = list.iter().position(|h| address(h) == target) else {
            return false;
        };
        list.remove(index);
        debug!(message = type_name::<M>(), subscribers = list.len(), "unsubscribed");

        if list.is_empty() {
            receivers.remove(&key);
        }
        true
    }

    /// Deliver a copy of `message` to every receiver of `M`.
    ///
    /// Returns the number of receivers that handled it.
    pub fn publish<M>(&self, message: M) -> usize
    where
        M: Clone + 'static,
    {
        let snapshot = self.snapshot::<M>();
        if snapshot.is_empty() {
            trace!(message = type_name::<M>(), "published with no subscribers");
            return 0;
        }

        let mut delivered = 0;
        for handle in snapshot {
            if !self.contains_handle::<M>(address(&handle)) {
                continue;
            }
            match handle.try_borrow_mut() {
                Ok(mut receiver) => {
                    receiver.on_message_received(message.clone());
                    delivered += 1;
                }
                Err(_) => {
                    warn!(
                        message = type_name::<M>(),
                        "receiver is already dispatching, skipped"
                    );
                }
            }
        }
        trace!(message = type_name::<M>(), delivered, "published");
        delivered
    }

    /// Whether anyone listens to `M`
    pub fn has_subscribers<M: 'static>(&self) -> bool {
        self.receivers.borrow().contains_key(&TypeId::of::<M>())
    }

    pub fn subscriber_count<M: 'static>(&self) -> usize {
        self.receivers
            .borrow()
            .get(&TypeId::of::<M>())
            .and_then(|entry| entry.downcast_ref::<Vec<Handle<M>>>())
            .map_or(0, Vec::len)
    }

    pub fn is_subscribed<M, R>(&self, receiver: &Rc<RefCell<R>>) -> bool
    where
        M: 'static,
        R: MessageReceiver<M> + 'static,
    {
        self.contains_handle::<M>(address(receiver))
    }

    /// Number of message types with at least one receiver
    pub fn message_type_count(&self) -> usize {
        self.receivers.borrow().len()
    }

    /// Drop every subscription
    pub fn clear(&self) {
        self.receivers.borrow_mut().clear();
    }

    fn snapshot<M: 'static>(&self) -> Vec<Handle<M>> {
        self.receivers
            .borrow()
            .get(&TypeId::of::<M>())
            .and_then(|entry| entry.downcast_ref::<Vec<Handle<M>>>())
            .cloned()
            .unwrap_or_default()
    }

    fn contains_handle<M: 'static>(&self, target: *const ()) -> bool {
        self.receivers
            .borrow()
            .get(&TypeId::of::<M>())
            .and_then(|entry| entry.downcast_ref::<Vec<Handle<M>>>())
            .is_some_and(|list| list.iter().any(|h| address(h) == target))
    }
}

impl fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBus")
            .field("message_types", &self.message_type_count())
            .finish()
    }
}
