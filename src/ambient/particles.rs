// SPDX-License-Identifier: PMPL-1.0-or-later

//! Flow-field particle background.
//!
//! Particles drift along the angle of a smooth 3D noise field sampled at
//! their position and the elapsed time. The pointer pushes nearby particles
//! away. The field lives in a 10×10 square centred on the origin and wraps
//! at the edges.

use crate::lifecycle::{Lease, ResourceKind, ResourceTracker};
use anyhow::{anyhow, Result};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::f64::consts::TAU;
use tracing::debug;

pub const HALF_EXTENT: f64 = 5.0;
const SPEED: f64 = 0.003;
const POINTER_RADIUS: f64 = 1.0;
const POINTER_FORCE: f64 = 0.01;
const DAMPING: f64 = 0.98;
const NOISE_SCALE: f64 = 0.1;
const TIME_SCALE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub vx: f64,
    pub vy: f64,
}

const LATTICE: usize = 256;

/// Seeded value noise on an integer lattice, smoothly interpolated. Corner
/// values come from a shuffled permutation over a table of random values.
#[derive(Debug, Clone)]
struct FlowNoise {
    perm: [u8; LATTICE],
    values: [f64; LATTICE],
}

impl FlowNoise {
    fn new(rng: &mut SmallRng) -> Self {
        let mut perm = [0u8; LATTICE];
        for (slot, index) in perm.iter_mut().zip(0u8..=u8::MAX) {
            *slot = index;
        }
        perm.shuffle(rng);
        let mut values = [0.0; LATTICE];
        for value in values.iter_mut() {
            *value = rng.gen_range(-1.0..=1.0);
        }
        Self { perm, values }
    }

    fn hash(&self, index: i64) -> usize {
        self.perm[index.rem_euclid(LATTICE as i64) as usize] as usize
    }

    fn lattice(&self, x: i64, y: i64, z: i64) -> f64 {
        let h = self.hash(self.hash(self.hash(x) as i64 + y) as i64 + z);
        self.values[h]
    }

    /// In `[-1, 1]`, continuous in every coordinate.
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let (x0, y0, z0) = (x.floor(), y.floor(), z.floor());
        let (fx, fy, fz) = (smooth(x - x0), smooth(y - y0), smooth(z - z0));
        let (ix, iy, iz) = (x0 as i64, y0 as i64, z0 as i64);

        let corner = |dx: i64, dy: i64, dz: i64| self.lattice(ix + dx, iy + dy, iz + dz);
        let x00 = lerp(corner(0, 0, 0), corner(1, 0, 0), fx);
        let x10 = lerp(corner(0, 1, 0), corner(1, 1, 0), fx);
        let x01 = lerp(corner(0, 0, 1), corner(1, 0, 1), fx);
        let x11 = lerp(corner(0, 1, 1), corner(1, 1, 1), fx);
        lerp(lerp(x00, x10, fy), lerp(x01, x11, fy), fz)
    }
}

fn smooth(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn wrap(value: f64) -> f64 {
    if value > HALF_EXTENT {
        -HALF_EXTENT
    } else if value < -HALF_EXTENT {
        HALF_EXTENT
    } else {
        value
    }
}

pub fn os_seed() -> Result<u64> {
    let mut bytes = [0u8; 8];
    getrandom::getrandom(&mut bytes).map_err(|err| anyhow!("seeding particles: {}", err))?;
    Ok(u64::from_le_bytes(bytes))
}

pub struct ParticleField {
    particles: Vec<Particle>,
    noise: FlowNoise,
    pointer: Option<(f64, f64)>,
    elapsed: f64,
    frames: u64,
    frame_loop: Option<Lease>,
    pointer_listener: Option<Lease>,
}

impl ParticleField {
    pub fn new(count: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let particles = (0..count)
            .map(|_| Particle {
                x: rng.gen_range(-HALF_EXTENT..HALF_EXTENT),
                y: rng.gen_range(-HALF_EXTENT..HALF_EXTENT),
                z: rng.gen_range(-HALF_EXTENT..HALF_EXTENT),
                ..Particle::default()
            })
            .collect();
        Self {
            particles,
            noise: FlowNoise::new(&mut rng),
            pointer: None,
            elapsed: 0.0,
            frames: 0,
            frame_loop: None,
            pointer_listener: None,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_some()
    }

    /// Request the frame loop and the pointer listener.
    pub fn start(&mut self, tracker: &ResourceTracker) {
        if self.is_running() {
            return;
        }
        self.frame_loop = Some(tracker.acquire(ResourceKind::AnimationFrame));
        self.pointer_listener = Some(tracker.acquire(ResourceKind::Listener));
        debug!(particles = self.particles.len(), "particle loop started");
    }

    pub fn stop(&mut self) {
        if self.frame_loop.take().is_some() {
            debug!(frames = self.frames, "particle loop stopped");
        }
        self.pointer_listener = None;
    }

    /// Pointer position in normalised device coordinates (`-1..1`, y up).
    pub fn set_pointer(&mut self, x: f64, y: f64) {
        self.pointer = Some((x * HALF_EXTENT, y * HALF_EXTENT));
    }

    /// Advance one frame. Does nothing while stopped.
    pub fn frame(&mut self, dt: f64) {
        if !self.is_running() {
            return;
        }
        self.elapsed += dt;
        self.frames += 1;
        let noise = &self.noise;
        let pointer = self.pointer;
        let t = self.elapsed * TIME_SCALE;

        self.particles.par_iter_mut().for_each(|p| {
            let angle = noise.sample(p.x * NOISE_SCALE, p.y * NOISE_SCALE, t) * TAU;
            p.vx = angle.cos() * SPEED;
            p.vy = angle.sin() * SPEED;

            if let Some((px, py)) = pointer {
                let (dx, dy) = (p.x - px, p.y - py);
                let dist = (dx * dx + dy * dy).sqrt();
                if dist > f64::EPSILON && dist < POINTER_RADIUS {
                    let force = (1.0 - dist) * POINTER_FORCE;
                    p.vx += dx / dist * force;
                    p.vy += dy / dist * force;
                }
            }

            p.x = wrap(p.x + p.vx);
            p.y = wrap(p.y + p.vy);
            p.vx *= DAMPING;
            p.vy *= DAMPING;
        });
    }
}

impl Drop for ParticleField {
    fn drop(&mut self) {
        self.stop();
    }
}
