use crate::color::Rgb;
use crate::surface::Surface;

/// A single spark thrown out by an exploding firework.
///
/// Gravity accumulates in `vy` without any terminal velocity; sparks fade
/// out long before the speed matters.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    radius: f32,
    color: Rgb,
    decay: f32,
    gravity: f32,
    alpha: f32,
}

impl Particle {
    pub fn new(
        (x, y): (f32, f32),
        (vx, vy): (f32, f32),
        radius: f32,
        color: Rgb,
        decay: f32,
        gravity: f32,
    ) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            radius,
            color,
            decay,
            gravity,
            alpha: 1.0,
        }
    }

    /// Advances one tick and draws the result.
    pub fn update<S: Surface>(&mut self, surface: &mut S) {
        self.vy += self.gravity;
        self.x += self.vx;
        self.y += self.vy;

        self.alpha -= self.decay;
        // Snap the faint tail to fully transparent
        if self.alpha <= self.decay {
            self.alpha = 0.0;
        }

        self.draw(surface);
    }

    pub fn draw<S: Surface>(&self, surface: &mut S) {
        let mut scope = surface.scoped_alpha(self.alpha);
        scope.fill_arc(self.x, self.y, self.radius, self.color);
    }

    pub fn alive(&self) -> bool {
        self.alpha > 0.0
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn velocity(&self) -> (f32, f32) {
        (self.vx, self.vy)
    }

    pub fn speed(&self) -> f32 {
        self.vx.hypot(self.vy)
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn color(&self) -> Rgb {
        self.color
    }
}
