// SPDX-License-Identifier: PMPL-1.0-or-later

//! Intersection observation over a [`Document`] and a scrolling [`Viewport`].
//!
//! Follows the browser model: the root is the viewport adjusted by a CSS
//! `rootMargin` (negative values shrink it), a target's ratio is the visible
//! fraction of its own area, and an entry is delivered only when a target's
//! intersecting state changes, plus once right after it is first observed.

use crate::dom::{Document, ElementId};
use crate::lifecycle::{Lease, ResourceKind, ResourceTracker};
use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Overlap of two rectangles. Edge-adjacent rectangles intersect with
    /// zero area, as in the browser.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_y: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_y: 0.0,
        }
    }

    pub fn root_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Move a document-space rectangle into viewport space.
    pub fn project(&self, rect: Rect) -> Rect {
        rect.translate(0.0, -self.scroll_y)
    }

    /// Scroll to `y`, clamped to the scrollable range of `document_height`.
    pub fn scroll_to(&mut self, y: f64, document_height: f64) {
        let max = (document_height - self.height).max(0.0);
        self.scroll_y = y.clamp(0.0, max);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl Length {
    fn resolve(&self, basis: f64) -> f64 {
        match self {
            Length::Px(px) => *px,
            Length::Percent(pct) => basis * pct / 100.0,
        }
    }
}

impl FromStr for Length {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let (number, unit) = if let Some(value) = raw.strip_suffix("px") {
            (value, "px")
        } else if let Some(value) = raw.strip_suffix('%') {
            (value, "%")
        } else {
            (raw, "")
        };
        let value: f64 = number
            .parse()
            .with_context(|| format!("invalid margin length '{}'", raw))?;
        match unit {
            "px" => Ok(Length::Px(value)),
            "%" => Ok(Length::Percent(value)),
            _ if value == 0.0 => Ok(Length::Px(0.0)),
            _ => Err(anyhow!("margin length '{}' needs a px or % unit", raw)),
        }
    }
}

/// CSS-style margin around the root, in `top right bottom left` order with
/// the usual one-to-four value shorthand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl Default for RootMargin {
    fn default() -> Self {
        Self {
            top: Length::Px(0.0),
            right: Length::Px(0.0),
            bottom: Length::Px(0.0),
            left: Length::Px(0.0),
        }
    }
}

impl FromStr for RootMargin {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let parts = raw
            .split_whitespace()
            .map(Length::from_str)
            .collect::<Result<Vec<_>>>()?;
        let (top, right, bottom, left) = match parts.as_slice() {
            [all] => (*all, *all, *all, *all),
            [vertical, horizontal] => (*vertical, *horizontal, *vertical, *horizontal),
            [top, horizontal, bottom] => (*top, *horizontal, *bottom, *horizontal),
            [top, right, bottom, left] => (*top, *right, *bottom, *left),
            _ => return Err(anyhow!("root margin '{}' needs 1 to 4 values", raw)),
        };
        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }
}

impl RootMargin {
    /// Grow (or, for negative values, shrink) the root rectangle.
    /// Percentages resolve against the root's height for top/bottom and its
    /// width for left/right.
    pub fn apply(&self, root: Rect) -> Rect {
        let top = self.top.resolve(root.height);
        let bottom = self.bottom.resolve(root.height);
        let left = self.left.resolve(root.width);
        let right = self.right.resolve(root.width);
        Rect::new(
            root.x - left,
            root.y - top,
            (root.width + left + right).max(0.0),
            (root.height + top + bottom).max(0.0),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: RootMargin,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin: RootMargin::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub is_intersecting: bool,
    pub ratio: f64,
}

/// Compute one target's intersection state against the adjusted root.
pub fn measure(target: Rect, viewport: &Viewport, options: &ObserverOptions) -> (bool, f64) {
    let root = options.root_margin.apply(viewport.root_rect());
    let projected = viewport.project(target);
    match projected.intersection(&root) {
        Some(overlap) => {
            let ratio = if projected.area() > 0.0 {
                overlap.area() / projected.area()
            } else {
                1.0
            };
            (ratio >= options.threshold, ratio)
        }
        None => (false, 0.0),
    }
}

pub struct IntersectionObserver {
    options: ObserverOptions,
    targets: BTreeMap<ElementId, Option<bool>>,
    lease: Option<Lease>,
}

impl IntersectionObserver {
    pub fn new(options: ObserverOptions, tracker: &ResourceTracker) -> Self {
        Self {
            options,
            targets: BTreeMap::new(),
            lease: Some(tracker.acquire(ResourceKind::Observer)),
        }
    }

    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    pub fn observe(&mut self, target: ElementId) {
        self.targets.entry(target).or_insert(None);
    }

    pub fn unobserve(&mut self, target: ElementId) {
        self.targets.remove(&target);
    }

    pub fn observed(&self) -> usize {
        self.targets.len()
    }

    /// Stop observing everything and release the observer slot.
    pub fn disconnect(&mut self) {
        if self.lease.take().is_some() {
            debug!(targets = self.targets.len(), "observer disconnected");
        }
        self.targets.clear();
    }

    /// Entries for every target whose state changed since the last check.
    /// Targets no longer present in the document are skipped.
    pub fn take_records(&mut self, document: &Document, viewport: &Viewport) -> Vec<IntersectionEntry> {
        if self.lease.is_none() {
            return Vec::new();
        }
        let mut entries = Vec::new();
        for (&target, last) in self.targets.iter_mut() {
            let Some(rect) = document.rect(target) else {
                continue;
            };
            let (is_intersecting, ratio) = measure(rect, viewport, &self.options);
            if *last != Some(is_intersecting) {
                *last = Some(is_intersecting);
                entries.push(IntersectionEntry {
                    target,
                    is_intersecting,
                    ratio,
                });
            }
        }
        entries
    }
}

impl Drop for IntersectionObserver {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    #[test]
    fn parses_margin_shorthand() {
        let margin: RootMargin = "0px 0px -50px 0px".parse().unwrap();
        assert_eq!(margin.bottom, Length::Px(-50.0));
        let band: RootMargin = "-40% 0px".parse().unwrap();
        assert_eq!(band.top, Length::Percent(-40.0));
        assert_eq!(band.bottom, Length::Percent(-40.0));
        assert_eq!(band.left, Length::Px(0.0));
        assert!("10em".parse::<RootMargin>().is_err());
        assert!("".parse::<RootMargin>().is_err());
        assert!("1px 2px 3px 4px 5px".parse::<RootMargin>().is_err());
    }

    #[test]
    fn central_band_is_twenty_percent() {
        let margin: RootMargin = "-40% 0px -40% 0px".parse().unwrap();
        let band = margin.apply(Rect::new(0.0, 0.0, 1000.0, 800.0));
        assert_eq!(band.y, 320.0);
        assert_eq!(band.height, 160.0);
        assert_eq!(band.width, 1000.0);
    }

    #[test]
    fn ratio_uses_target_area() {
        let viewport = Viewport::new(1000.0, 800.0);
        let options = ObserverOptions {
            threshold: 0.5,
            root_margin: RootMargin::default(),
        };
        // Half of the target hangs below the fold.
        let (visible, ratio) = measure(Rect::new(0.0, 700.0, 100.0, 200.0), &viewport, &options);
        assert!((ratio - 0.5).abs() < 1e-9);
        assert!(visible);
        let (visible, _) = measure(Rect::new(0.0, 900.0, 100.0, 200.0), &viewport, &options);
        assert!(!visible);
    }

    #[test]
    fn entries_only_on_state_change() {
        let tracker = ResourceTracker::new();
        let mut doc = Document::new();
        let id = doc.push(Element::new("div").rect(Rect::new(0.0, 1000.0, 100.0, 100.0)));
        let mut observer = IntersectionObserver::new(ObserverOptions::default(), &tracker);
        observer.observe(id);
        let mut viewport = Viewport::new(1000.0, 800.0);

        let first = observer.take_records(&doc, &viewport);
        assert_eq!(first.len(), 1);
        assert!(!first[0].is_intersecting);
        assert!(observer.take_records(&doc, &viewport).is_empty());

        viewport.scroll_to(400.0, 2000.0);
        let entered = observer.take_records(&doc, &viewport);
        assert_eq!(entered.len(), 1);
        assert!(entered[0].is_intersecting);
    }

    #[test]
    fn drop_releases_lease() {
        let tracker = ResourceTracker::new();
        {
            let _observer = IntersectionObserver::new(ObserverOptions::default(), &tracker);
            assert_eq!(tracker.live(ResourceKind::Observer), 1);
        }
        assert_eq!(tracker.live(ResourceKind::Observer), 0);
    }

    #[test]
    fn scroll_is_clamped() {
        let mut viewport = Viewport::new(1000.0, 800.0);
        viewport.scroll_to(5000.0, 2000.0);
        assert_eq!(viewport.scroll_y, 1200.0);
        viewport.scroll_to(-10.0, 2000.0);
        assert_eq!(viewport.scroll_y, 0.0);
    }
}
