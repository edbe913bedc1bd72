// SPDX-License-Identifier: PMPL-1.0-or-later

//! Detail dialog shared by the engine carousel and the case-study cards.
//!
//! Closing hides the dialog at once but keeps its subject around until the
//! fade-out finishes, so the body does not blank mid-animation.

use crate::lifecycle::ResourceTracker;
use crate::timer::Timeout;
use std::fmt::Debug;
use std::time::{Duration, Instant};
use tracing::debug;

pub const MODAL_CLOSE_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub struct Modal<T> {
    active: Option<T>,
    open: bool,
    clear_timer: Timeout,
    close_delay: Duration,
}

impl<T: Copy + Debug> Modal<T> {
    pub fn new(close_delay: Duration) -> Self {
        Self {
            active: None,
            open: false,
            clear_timer: Timeout::new(),
            close_delay,
        }
    }

    pub fn open(&mut self, subject: T) {
        self.clear_timer.cancel();
        self.active = Some(subject);
        self.open = true;
        debug!(?subject, "modal opened");
    }

    pub fn close(&mut self, now: Instant, tracker: &ResourceTracker) {
        if !self.open {
            return;
        }
        self.open = false;
        self.clear_timer.restart(now, self.close_delay, tracker);
    }

    /// Escape key handler; returns whether the key was consumed.
    pub fn escape(&mut self, now: Instant, tracker: &ResourceTracker) -> bool {
        let consumed = self.open;
        self.close(now, tracker);
        consumed
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn active(&self) -> Option<T> {
        self.active
    }

    pub fn tick(&mut self, now: Instant) {
        if self.clear_timer.poll(now) {
            self.active = None;
        }
    }

    pub fn cancel_timers(&mut self) {
        self.clear_timer.cancel();
    }
}
