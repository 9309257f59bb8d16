//! Synchronous, ordered publish/subscribe.

use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use std::collections::HashMap;

use crate::Command;

/// Payload carried by the engine's own topics.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Event {
    /// Topics published without a payload receive this.
    #[default]
    Empty,
    /// `run.*` topics: the movement being (or just) performed.
    Run(Command),
    /// `move` / `move.after`: the movement value before the transform chain.
    Movement(f32),
}

impl Event {
    pub fn command(&self) -> Option<Command> {
        match self {
            Self::Run(command) => Some(*command),
            _ => None,
        }
    }

    pub fn movement(&self) -> Option<f32> {
        match self {
            Self::Movement(value) => Some(*value),
            _ => None,
        }
    }
}

/// One topic or a list of topics.
///
/// Implemented for `str` and for arrays, slices and vectors of `&str`, so both
/// `bus.subscribe("run", ..)` and `bus.subscribe(&["run", "move"], ..)` work.
pub trait Topics {
    fn for_each_topic(&self, f: &mut dyn FnMut(&str));
}

impl Topics for str {
    fn for_each_topic(&self, f: &mut dyn FnMut(&str)) {
        f(self);
    }
}

impl Topics for String {
    fn for_each_topic(&self, f: &mut dyn FnMut(&str)) {
        f(self);
    }
}

impl Topics for [&str] {
    fn for_each_topic(&self, f: &mut dyn FnMut(&str)) {
        for topic in self {
            f(topic);
        }
    }
}

impl<const N: usize> Topics for [&str; N] {
    fn for_each_topic(&self, f: &mut dyn FnMut(&str)) {
        self.as_slice().for_each_topic(f);
    }
}

impl Topics for Vec<&str> {
    fn for_each_topic(&self, f: &mut dyn FnMut(&str)) {
        self.as_slice().for_each_topic(f);
    }
}

type Handler<E> = Rc<dyn Fn(&E)>;

struct Slot<E> {
    id: u64,
    handler: Handler<E>,
}

struct Registry<E> {
    next_id: u64,
    topics: HashMap<String, Vec<Slot<E>>>,
}

impl<E> Registry<E> {
    fn remove(&mut self, topic: &str, id: u64) {
        if let Some(slots) = self.topics.get_mut(topic) {
            slots.retain(|slot| slot.id != id);
        }
    }
}

/// A synchronous fan-out event bus.
///
/// - Handlers on a topic run in subscription order, on the caller's stack.
/// - Publishing to a topic nobody listens to is a no-op.
/// - The bus is a cheap handle: clones share the same registry.
///
/// Publishing works on a snapshot of the topic's handlers, so a handler may subscribe,
/// unsubscribe or publish again while it runs. A handler removed during a publish still
/// receives that publish.
pub struct EventBus<E = Event> {
    inner: Rc<RefCell<Registry<E>>>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.inner.borrow();
        let mut topics: Vec<(&str, usize)> = registry
            .topics
            .iter()
            .map(|(topic, slots)| (topic.as_str(), slots.len()))
            .collect();
        topics.sort_unstable();
        f.debug_struct("EventBus").field("topics", &topics).finish()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                next_id: 0,
                topics: HashMap::new(),
            })),
        }
    }

    /// Registers `handler` on every topic in `topics`.
    ///
    /// The returned handle removes exactly this registration, on all of its topics.
    pub fn subscribe<T>(&self, topics: &T, handler: impl Fn(&E) + 'static) -> Subscription<E>
    where
        T: Topics + ?Sized,
    {
        let handler: Handler<E> = Rc::new(handler);
        let mut registry = self.inner.borrow_mut();
        let id = registry.next_id;
        registry.next_id = registry.next_id.wrapping_add(1);

        let mut keys = Vec::new();
        topics.for_each_topic(&mut |topic| {
            registry
                .topics
                .entry(topic.to_string())
                .or_default()
                .push(Slot {
                    id,
                    handler: Rc::clone(&handler),
                });
            keys.push(topic.to_string());
        });

        Subscription {
            registry: Rc::downgrade(&self.inner),
            id,
            topics: keys,
        }
    }

    /// Calls every handler of every topic in `topics` with `payload`.
    pub fn publish<T>(&self, topics: &T, payload: &E)
    where
        T: Topics + ?Sized,
    {
        topics.for_each_topic(&mut |topic| {
            let handlers: Vec<Handler<E>> = match self.inner.borrow().topics.get(topic) {
                Some(slots) => slots.iter().map(|slot| Rc::clone(&slot.handler)).collect(),
                None => return,
            };
            for handler in handlers {
                handler(payload);
            }
        });
    }

    /// Publishes the default payload (`Event::Empty` for the engine's bus).
    pub fn emit<T>(&self, topics: &T)
    where
        T: Topics + ?Sized,
        E: Default,
    {
        self.publish(topics, &E::default());
    }

    pub fn listener_count(&self, topic: &str) -> usize {
        self.inner
            .borrow()
            .topics
            .get(topic)
            .map_or(0, |slots| slots.len())
    }

    /// Drops every registration. Outstanding [`Subscription`]s become no-ops.
    pub fn clear(&self) {
        self.inner.borrow_mut().topics.clear();
    }
}

/// Handle returned by [`EventBus::subscribe`].
///
/// Dropping it does *not* unsubscribe; call [`Subscription::unsubscribe`].
pub struct Subscription<E = Event> {
    registry: Weak<RefCell<Registry<E>>>,
    id: u64,
    topics: Vec<String>,
}

impl<E> Subscription<E> {
    /// Removes the handler from all the topics it was registered on.
    ///
    /// Calling this more than once, or after the bus is gone, does nothing.
    pub fn unsubscribe(&self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut registry = registry.borrow_mut();
        for topic in &self.topics {
            registry.remove(topic, self.id);
        }
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(String::as_str)
    }
}

impl<E> fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("topics", &self.topics)
            .finish()
    }
}
