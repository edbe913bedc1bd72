// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed page header: shadow once the page scrolls, plus the mobile menu.

use crate::i18n::Translator;
use crate::lifecycle::{Lease, ResourceKind, ResourceTracker};
use tracing::debug;

/// Scroll offset past which the header gains its shadow.
pub const SCROLLED_OFFSET: f64 = 10.0;
pub const CONTACT_ANCHOR: &str = "contato";

/// Header navigation: in-page anchor and label key.
pub const HEADER_NAV: [(&str, &str); 5] = [
    ("solucoes", "header.nav.solutions"),
    ("porque-foundlab", "header.nav.whyFoundlab"),
    ("casos-de-uso", "header.nav.useCases"),
    ("tecnologia", "header.nav.technology"),
    ("parcerias", "header.nav.partners"),
];

#[derive(Debug, Default)]
pub struct Header {
    scrolled: bool,
    menu_open: bool,
    scroll_listener: Option<Lease>,
}

impl Header {
    /// Subscribe to scroll and take the initial offset.
    pub fn attach(scroll_y: f64, tracker: &ResourceTracker) -> Self {
        let mut header = Self {
            scroll_listener: Some(tracker.acquire(ResourceKind::Listener)),
            ..Self::default()
        };
        header.on_scroll(scroll_y);
        header
    }

    pub fn is_attached(&self) -> bool {
        self.scroll_listener.is_some()
    }

    /// Returns whether the scrolled state flipped. Ignored once detached.
    pub fn on_scroll(&mut self, scroll_y: f64) -> bool {
        if !self.is_attached() {
            return false;
        }
        let scrolled = scroll_y > SCROLLED_OFFSET;
        let changed = scrolled != self.scrolled;
        self.scrolled = scrolled;
        changed
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        debug!(open = self.menu_open, "mobile menu toggled");
        self.menu_open
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    /// The page body stops scrolling while the mobile menu covers it.
    pub fn locks_scroll(&self) -> bool {
        self.menu_open
    }

    /// Follow a header link: the menu closes and the target href is returned.
    pub fn follow(&mut self, anchor: &str) -> String {
        self.close_menu();
        format!("/#{}", anchor)
    }

    pub fn detach(&mut self) {
        self.menu_open = false;
        if self.scroll_listener.take().is_some() {
            debug!("header scroll listener released");
        }
    }
}

/// Header links as `label (#anchor)`, then the demo button.
pub fn nav_lines(translator: &Translator) -> Vec<String> {
    let mut lines: Vec<String> = HEADER_NAV
        .iter()
        .map(|(anchor, key)| format!("{} (#{})", translator.t(key), anchor))
        .collect();
    lines.push(format!(
        "{} (#{})",
        translator.t("header.demoButton"),
        CONTACT_ANCHOR
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadow_appears_past_ten_pixels() {
        let tracker = ResourceTracker::new();
        let mut header = Header::attach(0.0, &tracker);
        assert!(!header.is_scrolled());
        assert!(!header.on_scroll(10.0));
        assert!(header.on_scroll(10.5));
        assert!(header.is_scrolled());
        assert!(!header.on_scroll(400.0));
        assert!(header.on_scroll(0.0));
        assert!(!header.is_scrolled());
    }

    #[test]
    fn attaching_mid_page_starts_scrolled() {
        let tracker = ResourceTracker::new();
        let header = Header::attach(900.0, &tracker);
        assert!(header.is_scrolled());
        assert_eq!(tracker.live(ResourceKind::Listener), 1);
    }

    #[test]
    fn following_a_link_closes_the_menu() {
        let tracker = ResourceTracker::new();
        let mut header = Header::attach(0.0, &tracker);
        assert!(header.toggle_menu());
        assert!(header.locks_scroll());
        assert_eq!(header.follow("tecnologia"), "/#tecnologia");
        assert!(!header.is_menu_open());
    }

    #[test]
    fn detach_releases_the_listener() {
        let tracker = ResourceTracker::new();
        let mut header = Header::attach(0.0, &tracker);
        header.toggle_menu();
        header.detach();
        assert_eq!(tracker.total_live(), 0);
        assert!(!header.is_menu_open());
        assert!(!header.on_scroll(500.0));
    }
}
