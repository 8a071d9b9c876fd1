use tracing::{debug, trace};

use crate::firework::{Firework, LaunchParams};
use crate::pattern::HeartPattern;
use crate::rng::RandomSource;
use crate::surface::Surface;

/// Owns the active fireworks and advances them one tick at a time.
pub struct Show<R> {
    fireworks: Vec<Firework>,
    rng: R,
    heart: HeartPattern,
}

impl<R: RandomSource> Show<R> {
    pub fn new(rng: R, heart: HeartPattern) -> Self {
        Self {
            fireworks: Vec::new(),
            rng,
            heart,
        }
    }

    /// Updates and draws every firework, then drops the finished ones.
    pub fn tick<S: Surface>(&mut self, surface: &mut S) {
        for firework in &mut self.fireworks {
            firework.update(surface, &mut self.rng, self.heart);
        }

        let before = self.fireworks.len();
        self.fireworks.retain(|firework| !firework.is_finished());
        let removed = before - self.fireworks.len();
        if removed > 0 {
            trace!(removed, active = self.fireworks.len(), "fireworks finished");
        }
    }

    pub fn launch(&mut self, params: LaunchParams) {
        debug!(
            x = params.x,
            y = params.y,
            rise_speed = params.rise_speed,
            "launching firework"
        );
        let firework = Firework::new(params, &mut self.rng);
        self.fireworks.push(firework);
    }

    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }

    pub fn len(&self) -> usize {
        self.fireworks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fireworks.is_empty()
    }

    /// Live sparks across every firework.
    pub fn particle_count(&self) -> usize {
        self.fireworks.iter().map(|f| f.particles().len()).sum()
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn heart(&self) -> HeartPattern {
        self.heart
    }

    pub fn clear(&mut self) {
        self.fireworks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceRng;
    use crate::surface::RecordingSurface;

    fn params(y: f32, rise_speed: f32) -> LaunchParams {
        LaunchParams {
            x: 100.0,
            y,
            color: (0, 255, 0),
            rise_speed,
            particle_size: 2.0,
        }
    }

    #[test]
    fn test_launch_appends_in_order() {
        let mut show = Show::new(SequenceRng::constant(0.5), HeartPattern::Ring);
        assert!(show.is_empty());
        show.launch(params(900.0, -3.0));
        show.launch(params(800.0, -4.0));
        assert_eq!(show.len(), 2);
        assert_eq!(show.fireworks()[0].position(), (100.0, 900.0));
        assert_eq!(show.fireworks()[1].position(), (100.0, 800.0));
    }

    #[test]
    fn test_tick_updates_every_firework() {
        let mut show = Show::new(SequenceRng::constant(0.5), HeartPattern::Ring);
        let mut surface = RecordingSurface::new(500.0, 1000.0);
        show.launch(params(900.0, -3.0));
        show.launch(params(800.0, -4.0));
        show.tick(&mut surface);

        assert_eq!(show.fireworks()[0].position().1, 897.0);
        assert_eq!(show.fireworks()[1].position().1, 796.0);
        assert_eq!(surface.commands().len(), 2);
    }

    #[test]
    fn test_finished_firework_removed_between_survivors() {
        // The middle firework starts above the burst line and explodes on its first tick.
        let mut show = Show::new(fastrand::Rng::with_seed(1), HeartPattern::Ring);
        let mut surface = RecordingSurface::new(500.0, 1000.0);
        show.launch(params(990.0, -1.0));
        show.launch(params(10.0, -1.0));
        show.launch(params(980.0, -1.0));

        show.tick(&mut surface);
        assert!(show.fireworks()[1].is_exploded());

        let mut ticks = 0;
        while show.len() == 3 {
            show.tick(&mut surface);
            ticks += 1;
            assert!(ticks < 200);
        }
        assert_eq!(show.len(), 2);
        assert_eq!(show.fireworks()[0].position().1, 990.0 - (ticks + 1) as f32);
        assert!(show.fireworks().iter().all(|f| !f.is_exploded()));
    }

    #[test]
    fn test_particle_count_and_clear() {
        let mut show = Show::new(fastrand::Rng::with_seed(2), HeartPattern::Ring);
        let mut surface = RecordingSurface::new(500.0, 1000.0);
        show.launch(params(10.0, -1.0));
        show.tick(&mut surface);
        assert!(show.particle_count() >= 100);

        show.clear();
        assert!(show.is_empty());
        assert_eq!(show.particle_count(), 0);
    }
}
