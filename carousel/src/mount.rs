//! Two-phase component mounting.
//!
//! Pass one calls every factory, in order, with the owner, the registry as filled so far and the
//! bus. Pass two calls [`Component::init`] on every created instance, in the same order. By the
//! time any `init` runs, every sibling exists, so `init` may look siblings up regardless of where
//! they were registered.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::Any;
use core::cell::RefCell;
use core::fmt;

use crate::{Error, EventBus};

/// A mounted unit.
pub trait Component: 'static {
    /// Second-phase hook, called once after every component of the same mount exists.
    fn init(&self) {}
}

/// A created component, kept both as itself (for `init`) and as `Any` (for typed lookup).
#[derive(Clone)]
pub struct Instance {
    any: Rc<dyn Any>,
    component: Rc<dyn Component>,
}

impl Instance {
    pub fn new<T: Component>(component: T) -> Self {
        Self::from_rc(Rc::new(component))
    }

    /// Wraps a component the factory keeps a handle to.
    pub fn from_rc<T: Component>(component: Rc<T>) -> Self {
        Self {
            any: Rc::clone(&component) as Rc<dyn Any>,
            component,
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Instance(..)")
    }
}

/// A component factory.
///
/// Returning `Err` is the equivalent of a misconfigured entry: it is reported and skipped.
pub type Factory<O> = Box<dyn FnOnce(&O, &Components, &EventBus) -> Result<Instance, Error>>;

/// An ordered list of named factories.
pub struct Factories<O> {
    entries: Vec<(String, Factory<O>)>,
}

impl<O> Default for Factories<O> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<O> Factories<O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        name: impl Into<String>,
        factory: impl FnOnce(&O, &Components, &EventBus) -> Result<Instance, Error> + 'static,
    ) -> Self {
        self.push(name, factory);
        self
    }

    pub fn push(
        &mut self,
        name: impl Into<String>,
        factory: impl FnOnce(&O, &Components, &EventBus) -> Result<Instance, Error> + 'static,
    ) {
        self.entries.push((name.into(), Box::new(factory)));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<O> fmt::Debug for Factories<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(name, _)| name))
            .finish()
    }
}

/// Registry of mounted components, in mount order.
///
/// This is a shared handle: factories may clone it and look siblings up later (typically in
/// `init`). A component that keeps a clone forms a reference cycle with the registry; it is
/// broken by [`Components::clear`], which `Carousel::destroy` calls.
#[derive(Clone, Default)]
pub struct Components {
    entries: Rc<RefCell<Vec<(String, Instance)>>>,
}

impl Components {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks a component up by name and type.
    pub fn get<T: Component>(&self, name: &str) -> Option<Rc<T>> {
        let any = self
            .entries
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, instance)| Rc::clone(&instance.any))?;
        any.downcast::<T>().ok()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.borrow().iter().any(|(n, _)| n == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Runs both passes for `factories` and appends the results to this registry.
    ///
    /// Returns the entries that were skipped.
    pub fn mount<O>(&self, owner: &O, factories: Factories<O>, bus: &EventBus) -> Vec<Error> {
        let mut skipped = Vec::new();
        let mut created: Vec<Rc<dyn Component>> = Vec::with_capacity(factories.len());

        for (name, factory) in factories.entries {
            if self.contains(&name) {
                cwarn!(name = %name, "mount: duplicate component name, skipping");
                skipped.push(Error::DuplicateComponent { name });
                continue;
            }
            // The registry is not borrowed here: the factory may query it.
            match factory(owner, self, bus) {
                Ok(instance) => {
                    cdebug!(name = %name, "mount: created");
                    created.push(Rc::clone(&instance.component));
                    self.entries.borrow_mut().push((name, instance));
                }
                Err(err) => {
                    cwarn!(name = %name, error = %err, "mount: factory failed, skipping");
                    skipped.push(match err {
                        err @ Error::ComponentFactory { .. } => err,
                        other => Error::ComponentFactory {
                            name,
                            reason: other.to_string(),
                        },
                    });
                }
            }
        }

        for component in created {
            component.init();
        }

        skipped
    }
}

impl fmt::Debug for Components {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Mounts `factories` into a fresh registry.
///
/// Returns the registry and the entries that were skipped.
pub fn mount<O>(owner: &O, factories: Factories<O>, bus: &EventBus) -> (Components, Vec<Error>) {
    let components = Components::new();
    let skipped = components.mount(owner, factories, bus);
    (components, skipped)
}
