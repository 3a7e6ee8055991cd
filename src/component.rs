//! Component resolution.
//!
//! Pages name their component with a [`ComponentPath`] descriptor. A
//! [`ComponentResolver`] turns the descriptor into whatever the render host
//! instantiates (a factory closure, a view constructor, …). Resolution is
//! lazy: the controller asks for it the first time a page is created and
//! keeps the result on the entry.
//!
//! [`ComponentRegistry`] is the bundled resolver. Factories are registered
//! under descriptor patterns understood by [`matchit`]:
//!
//! | Pattern              | Matches                     | Params            |
//! |----------------------|-----------------------------|-------------------|
//! | `/settings`          | `/settings`                 | (none)            |
//! | `/profile/{id}`      | `/profile/42`               | `id = 42`         |
//! | `/docs/{*rest}`      | `/docs/guide/intro`         | `rest = guide/intro` |
//!
//! # Example
//!
//! ```
//! use gpui_stack_navigator::component::{ComponentRegistry, ComponentResolver};
//! use gpui_stack_navigator::ComponentPath;
//!
//! let mut registry = ComponentRegistry::new();
//! registry.register("/profile/{id}", "profile-factory");
//!
//! let resolved = registry.resolve(&ComponentPath::new("/profile/42")).unwrap();
//! assert_eq!(resolved.component, "profile-factory");
//! assert_eq!(resolved.params.get("id"), Some("42"));
//! ```

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, ComponentCache};
use crate::error::{NavigationError, Result};
use crate::page::ComponentPath;
use crate::{debug_log, trace_log, warn_log};
#[cfg(feature = "cache")]
use std::cell::RefCell;

/// Parameters captured from a descriptor pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentParams {
    values: Vec<(String, String)>,
}

impl ComponentParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing an existing value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.values.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.values.push((key, value));
        }
    }

    /// Look up a parameter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over `(key, value)` pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A resolved component together with the params its descriptor captured.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedComponent<C> {
    pub component: C,
    pub params: ComponentParams,
}

/// Maps component descriptors to components.
pub trait ComponentResolver<C> {
    /// Resolve `path`.
    fn resolve(&self, path: &ComponentPath) -> Result<ResolvedComponent<C>>;

    /// Forget anything cached for `path`, so the next resolution is fresh.
    fn invalidate(&self, _path: &ComponentPath) {}
}

/// Create a resolver from a closure.
///
/// ```
/// use gpui_stack_navigator::component::{resolver_fn, ComponentResolver};
/// use gpui_stack_navigator::ComponentPath;
///
/// let resolver = resolver_fn(|path: &ComponentPath| Some(path.as_str().len()));
/// let resolved = resolver.resolve(&ComponentPath::new("/abc")).unwrap();
/// assert_eq!(resolved.component, 4);
/// ```
pub const fn resolver_fn<C, F>(resolve: F) -> FnResolver<F>
where
    F: Fn(&ComponentPath) -> Option<C>,
{
    FnResolver { resolve }
}

/// Resolver created from a closure via [`resolver_fn`].
pub struct FnResolver<F> {
    resolve: F,
}

impl<C, F> ComponentResolver<C> for FnResolver<F>
where
    F: Fn(&ComponentPath) -> Option<C>,
{
    fn resolve(&self, path: &ComponentPath) -> Result<ResolvedComponent<C>> {
        (self.resolve)(path)
            .map(|component| ResolvedComponent {
                component,
                params: ComponentParams::new(),
            })
            .ok_or_else(|| NavigationError::ComponentNotFound {
                path: path.to_string(),
            })
    }
}

/// Pattern-based component registry.
pub struct ComponentRegistry<C> {
    router: matchit::Router<C>,
    patterns: Vec<String>,
    #[cfg(feature = "cache")]
    cache: RefCell<ComponentCache<C>>,
}

impl<C: Clone> ComponentRegistry<C> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            router: matchit::Router::new(),
            patterns: Vec::new(),
            #[cfg(feature = "cache")]
            cache: RefCell::new(ComponentCache::new()),
        }
    }

    /// Register `component` under `pattern`.
    ///
    /// A pattern that conflicts with an existing one is ignored with a warning.
    pub fn register(&mut self, pattern: impl Into<String>, component: C) -> &mut Self {
        let pattern = pattern.into();
        if let Err(err) = self.try_register(pattern.clone(), component) {
            warn_log!("Component pattern '{}' not registered: {}", pattern, err);
        }
        self
    }

    /// Register `component` under `pattern`, reporting conflicts.
    pub fn try_register(
        &mut self,
        pattern: impl Into<String>,
        component: C,
    ) -> std::result::Result<(), matchit::InsertError> {
        let pattern = pattern.into();
        self.router.insert(pattern.clone(), component)?;
        debug_log!("Registered component pattern '{}'", pattern);
        self.patterns.push(pattern);
        #[cfg(feature = "cache")]
        self.cache.borrow_mut().clear();
        Ok(())
    }

    /// Registered patterns, in registration order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Cache counters.
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.borrow().stats().clone()
    }

    fn lookup(&self, path: &ComponentPath) -> Result<ResolvedComponent<C>> {
        let matched =
            self.router
                .at(path.as_str())
                .map_err(|_| NavigationError::ComponentNotFound {
                    path: path.to_string(),
                })?;
        let mut params = ComponentParams::new();
        for (key, value) in matched.params.iter() {
            params.insert(key, value);
        }
        trace_log!(
            "Resolved component '{}' ({} params)",
            path,
            params.len()
        );
        Ok(ResolvedComponent {
            component: matched.value.clone(),
            params,
        })
    }
}

impl<C: Clone> Default for ComponentRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clone> ComponentResolver<C> for ComponentRegistry<C> {
    #[cfg(feature = "cache")]
    fn resolve(&self, path: &ComponentPath) -> Result<ResolvedComponent<C>> {
        if let Some(hit) = self.cache.borrow_mut().get(path) {
            return Ok(hit);
        }
        let resolved = self.lookup(path)?;
        self.cache.borrow_mut().insert(path.clone(), resolved.clone());
        Ok(resolved)
    }

    #[cfg(not(feature = "cache"))]
    fn resolve(&self, path: &ComponentPath) -> Result<ResolvedComponent<C>> {
        self.lookup(path)
    }

    #[cfg(feature = "cache")]
    fn invalidate(&self, path: &ComponentPath) {
        self.cache.borrow_mut().invalidate(path);
    }
}
