// SPDX-License-Identifier: PMPL-1.0-or-later

//! umbrella-site: presentation core of the Foundlab/Umbrella marketing site.
//!
//! The page is modelled as a laid-out [`dom::Document`] seen through a
//! scrolling [`observer::Viewport`]. On top of that sit the pieces that carry
//! actual logic:
//!
//! 1. **i18n**: two locale bundles, dotted-key lookup, `{placeholder}`
//!    interpolation, key-as-fallback.
//! 2. **reveal**: intersection-driven `visible` class, one-shot or toggling.
//! 3. **demo**: the scripted Veritas protocol walkthrough, whose active
//!    stage follows whichever marker sits in the middle of the viewport.
//!
//! [`view::SiteView`] composes them and owns every subscription through a
//! [`lifecycle::ResourceTracker`], so teardown is checkable.

pub mod ambient;
pub mod config;
pub mod content;
pub mod context;
pub mod demo;
pub mod diagnostics;
pub mod dom;
pub mod i18n;
pub mod lifecycle;
pub mod observer;
pub mod reveal;
pub mod site;
pub mod timer;
pub mod types;
pub mod view;
