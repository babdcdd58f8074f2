//! Ambient context values and the registry that extracts them into fields
//!
//! This module provides:
//! - `Context`: an immutable, cheaply cloned bag of typed values carried by a message
//! - `ContextRegistry`: ordered extraction functions run against every message
//!   that carries a `Context`

use super::fields::Fields;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Typed values attached to a unit of work, such as a request ID
///
/// Values are keyed by type. Adding a value returns a new `Context`; existing
/// clones are unaffected.
///
/// # Example
///
/// ```
/// use structured_logger_system::Context;
///
/// #[derive(Clone, Copy)]
/// struct RequestId(u64);
///
/// let ctx = Context::new().with_value(RequestId(42));
/// assert_eq!(ctx.value::<RequestId>().map(|r| r.0), Some(42));
/// ```
#[derive(Clone, Default)]
pub struct Context {
    values: Arc<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a new context holding `value`, replacing any value of the same type
    #[must_use]
    pub fn with_value<T: Any + Send + Sync>(&self, value: T) -> Self {
        let mut values = (*self.values).clone();
        values.insert(TypeId::of::<T>(), Arc::new(value));
        Self {
            values: Arc::new(values),
        }
    }

    /// Look up the value stored for type `T`
    pub fn value<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("values", &self.values.len())
            .finish()
    }
}

/// Extraction function: inspect the context and insert fields when a value is present
pub type ContextFn = Arc<dyn Fn(&Context, &mut Fields) + Send + Sync>;

/// Append-only list of context extraction functions
///
/// Thread-safe: `run` takes a shared lock, `register` an exclusive one.
pub struct ContextRegistry {
    fns: RwLock<Vec<ContextFn>>,
}

impl ContextRegistry {
    pub const fn new() -> Self {
        Self {
            fns: RwLock::new(Vec::new()),
        }
    }

    /// The process-wide registry used by loggers that aren't given their own
    pub fn global() -> &'static Arc<ContextRegistry> {
        static GLOBAL: OnceLock<Arc<ContextRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(ContextRegistry::new()))
    }

    /// Append an extraction function
    ///
    /// # Example
    ///
    /// ```
    /// use structured_logger_system::{Context, ContextRegistry, Fields};
    ///
    /// struct RequestId(u64);
    ///
    /// let registry = ContextRegistry::new();
    /// registry.register(|ctx, fields| {
    ///     if let Some(id) = ctx.value::<RequestId>() {
    ///         fields.insert("request", id.0);
    ///     }
    /// });
    ///
    /// let mut fields = Fields::new();
    /// registry.run(Some(&Context::new().with_value(RequestId(7))), &mut fields);
    /// assert!(fields.contains_key("request"));
    /// ```
    pub fn register<F>(&self, f: F)
    where
        F: Fn(&Context, &mut Fields) + Send + Sync + 'static,
    {
        self.fns.write().push(Arc::new(f));
    }

    /// Run every registered function, in registration order, against `fields`
    ///
    /// No-op when `ctx` is `None`.
    pub fn run(&self, ctx: Option<&Context>, fields: &mut Fields) {
        let Some(ctx) = ctx else {
            return;
        };

        let fns = self.fns.read();
        for f in fns.iter() {
            f(ctx, fields);
        }
    }

    pub fn len(&self) -> usize {
        self.fns.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fns.read().is_empty()
    }
}

impl Default for ContextRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ContextRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextRegistry")
            .field("functions", &self.len())
            .finish()
    }
}
