// SPDX-License-Identifier: PMPL-1.0-or-later

//! Decorative background animation.

pub mod particles;

pub use particles::{Particle, ParticleField};

use crate::lifecycle::ResourceTracker;
use crate::types::MotionPreference;
use tracing::{debug, warn};

/// Start the particle background unless motion is reduced. Seeding failure
/// disables the background instead of failing the page.
pub fn mount_background(
    count: usize,
    motion: MotionPreference,
    tracker: &ResourceTracker,
) -> Option<ParticleField> {
    if motion == MotionPreference::Reduced || count == 0 {
        debug!("particle background disabled");
        return None;
    }
    match particles::os_seed() {
        Ok(seed) => {
            let mut field = ParticleField::new(count, seed);
            field.start(tracker);
            Some(field)
        }
        Err(err) => {
            warn!("particle background unavailable: {:#}", err);
            None
        }
    }
}
