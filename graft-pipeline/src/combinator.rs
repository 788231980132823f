//! Delegate chaining.
//!
//! A [`Chain`] starts from a base operation and accumulates wrappers. Each
//! wrapper receives the link it wraps (`next`) and returns a new link that
//! may call `next` any number of times, including never. Wrappers are kept
//! as a list and folded only when the chain is built, so the most recently
//! registered wrapper is the outermost one and runs first.
//!
//! ```
//! use graft_pipeline::Chain;
//!
//! let mut chain = Chain::new(|n: i32| n + 1);
//! chain.around(|n, next| next(n * 10));
//! assert_eq!(chain.call(2), 21);
//! ```

use std::rc::Rc;

/// One callable step of a built chain.
pub type Link<A, R> = Rc<dyn Fn(A) -> R>;

/// Builds a new link around the link it receives.
pub type Wrapper<A, R> = Rc<dyn Fn(Link<A, R>) -> Link<A, R>>;

/// A base operation plus an ordered list of wrappers.
pub struct Chain<A, R> {
    base: Link<A, R>,
    wrappers: Vec<Wrapper<A, R>>,
}

impl<A: 'static, R: 'static> Chain<A, R> {
    pub fn new(base: impl Fn(A) -> R + 'static) -> Self {
        Self {
            base: Rc::new(base),
            wrappers: Vec::new(),
        }
    }

    /// Register a wrapper that builds a link from `next`.
    pub fn wrap(&mut self, wrapper: impl Fn(Link<A, R>) -> Link<A, R> + 'static) {
        self.wrappers.push(Rc::new(wrapper));
    }

    /// Register a middleware-style wrapper: `f` receives the argument and the
    /// next link.
    pub fn around(&mut self, f: impl Fn(A, &dyn Fn(A) -> R) -> R + 'static) {
        let f = Rc::new(f);
        self.wrap(move |next: Link<A, R>| {
            let f = Rc::clone(&f);
            let link: Link<A, R> = Rc::new(move |arg: A| f(arg, &*next));
            link
        });
    }

    /// Fold the wrappers over the base.
    pub fn build(&self) -> Link<A, R> {
        self.wrappers
            .iter()
            .fold(Rc::clone(&self.base), |next, wrapper| wrapper(next))
    }

    /// Build the chain and call it once.
    pub fn call(&self, arg: A) -> R {
        (self.build())(arg)
    }

    /// Number of registered wrappers.
    pub fn depth(&self) -> usize {
        self.wrappers.len()
    }
}

impl<A, R> Clone for Chain<A, R> {
    fn clone(&self) -> Self {
        Self {
            base: Rc::clone(&self.base),
            wrappers: self.wrappers.clone(),
        }
    }
}

impl<A, R> std::fmt::Debug for Chain<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("wrappers", &self.wrappers.len())
            .finish()
    }
}
