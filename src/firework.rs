use tracing::debug;

use crate::color::{Rgb, random_vivid};
use crate::particle::Particle;
use crate::pattern::{HeartPattern, Pattern};
use crate::rng::RandomSource;
use crate::surface::Surface;

const SHELL_RADIUS: f32 = 2.0; // rising marker

// Explosion altitude, as a fraction of surface height from the top
const BURST_HEIGHT_MIN: f32 = 0.18;
const BURST_HEIGHT_SPREAD: f32 = 0.22;

pub const MIN_PARTICLES: usize = 100;
pub const PARTICLE_SPREAD: usize = 1000;

/// Where and how a firework is launched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchParams {
    pub x: f32,
    pub y: f32,
    pub color: Rgb,
    pub rise_speed: f32, // per tick, negative rises
    pub particle_size: f32, // spark radius
}

#[derive(Debug, Clone)]
pub struct Firework {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    color: Rgb,
    particle_size: f32,
    exploded: bool,
    pattern: Option<Pattern>,
    particles: Vec<Particle>,
}

impl Firework {
    /// Builds a shell from `params`, drawing a small horizontal wind drift from `rng`.
    pub fn new<R: RandomSource + ?Sized>(params: LaunchParams, rng: &mut R) -> Self {
        Self {
            x: params.x,
            y: params.y,
            vx: rng.range(-1.0, 1.0),
            vy: params.rise_speed,
            color: params.color,
            particle_size: params.particle_size,
            exploded: false,
            pattern: None,
            particles: Vec::new(),
        }
    }

    pub fn update<S: Surface, R: RandomSource + ?Sized>(
        &mut self,
        surface: &mut S,
        rng: &mut R,
        heart: HeartPattern,
    ) {
        if !self.exploded {
            self.y += self.vy;
            self.x += self.vx;
            self.draw(surface);

            let burst_y =
                surface.height() * (BURST_HEIGHT_MIN + rng.next_f32() * BURST_HEIGHT_SPREAD);
            if self.y < burst_y {
                self.explode(rng, heart);
            }
        } else {
            self.particles.retain(Particle::alive);
            for particle in &mut self.particles {
                particle.update(surface);
            }
        }
    }

    /// Bursts into sparks at the current position. Does nothing once exploded.
    pub fn explode<R: RandomSource + ?Sized>(&mut self, rng: &mut R, heart: HeartPattern) {
        if self.exploded {
            return;
        }
        self.exploded = true;

        let pattern = Pattern::random(rng);
        let count = MIN_PARTICLES + rng.index(PARTICLE_SPREAD);
        self.pattern = Some(pattern);
        self.particles.reserve_exact(count);

        for i in 0..count {
            let velocity = pattern.velocity(i, count, heart, rng);
            let decay = rng.range(0.01, 0.05);
            let gravity = rng.range(0.03, 0.08);
            let color = random_vivid(rng);
            self.particles.push(Particle::new(
                (self.x, self.y),
                velocity,
                self.particle_size,
                color,
                decay,
                gravity,
            ));
        }

        debug!(
            x = self.x,
            y = self.y,
            ?pattern,
            particles = count,
            "firework exploded"
        );
    }

    fn draw<S: Surface>(&self, surface: &mut S) {
        let mut scope = surface.scoped_alpha(1.0);
        scope.fill_arc(self.x, self.y, SHELL_RADIUS, self.color);
    }

    /// Exploded and every spark has faded.
    pub fn is_finished(&self) -> bool {
        self.exploded && self.particles.is_empty()
    }

    pub fn is_exploded(&self) -> bool {
        self.exploded
    }

    pub fn pattern(&self) -> Option<Pattern> {
        self.pattern
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn velocity(&self) -> (f32, f32) {
        (self.vx, self.vy)
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn particle_size(&self) -> f32 {
        self.particle_size
    }
}
