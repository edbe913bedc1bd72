// SPDX-License-Identifier: PMPL-1.0-or-later

//! Subscription bookkeeping for views.
//!
//! Every observer, timer, listener and animation-frame loop a view starts is
//! represented by a [`Lease`] taken from the view's [`ResourceTracker`]. The
//! lease releases its slot when dropped, so a view that drops its state on
//! any exit path (normal teardown, early return, `?`) leaves the tracker at
//! zero. [`Scope`] covers the remaining case of arbitrary cleanup closures.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    Observer,
    Timer,
    Listener,
    AnimationFrame,
}

impl ResourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Observer => "observer",
            ResourceKind::Timer => "timer",
            ResourceKind::Listener => "listener",
            ResourceKind::AnimationFrame => "animation-frame",
        }
    }
}

/// Live-resource counter shared by everything a view owns.
#[derive(Debug, Clone, Default)]
pub struct ResourceTracker {
    live: Rc<RefCell<BTreeMap<ResourceKind, usize>>>,
}

impl ResourceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, kind: ResourceKind) -> Lease {
        *self.live.borrow_mut().entry(kind).or_insert(0) += 1;
        trace!(kind = kind.label(), "resource acquired");
        Lease {
            kind,
            live: Rc::clone(&self.live),
        }
    }

    pub fn live(&self, kind: ResourceKind) -> usize {
        self.live.borrow().get(&kind).copied().unwrap_or(0)
    }

    pub fn total_live(&self) -> usize {
        self.live.borrow().values().sum()
    }
}

/// One live subscription. Dropping it releases the slot.
pub struct Lease {
    kind: ResourceKind,
    live: Rc<RefCell<BTreeMap<ResourceKind, usize>>>,
}

impl Lease {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}

impl fmt::Debug for Lease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lease").field("kind", &self.kind).finish()
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        if let Some(count) = self.live.borrow_mut().get_mut(&self.kind) {
            *count = count.saturating_sub(1);
        }
        trace!(kind = self.kind.label(), "resource released");
    }
}

/// Ordered set of disposers, run last-in first-out exactly once.
#[derive(Default)]
pub struct Scope {
    disposers: Vec<Box<dyn FnOnce()>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defer(&mut self, disposer: impl FnOnce() + 'static) {
        self.disposers.push(Box::new(disposer));
    }

    pub fn hold(&mut self, lease: Lease) {
        self.defer(move || drop(lease));
    }

    pub fn len(&self) -> usize {
        self.disposers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.disposers.is_empty()
    }

    pub fn dispose(&mut self) {
        while let Some(disposer) = self.disposers.pop() {
            disposer();
        }
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.dispose();
    }
}
