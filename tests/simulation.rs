use fireworks::{
    HeartPattern, LaunchParams, RandomSource, RecordingSurface, SequenceRng, Show, Surface,
};

/// Ticks a firework can stay on the surface: the slowest rise to the lowest
/// burst line, the longest spark life, and one tick to notice it finished.
fn lifetime_bound(height: f32, rise_speed: f32) -> usize {
    let rise = (height * (1.0 - 0.18) / rise_speed.abs()).ceil() as usize + 1;
    let sparks = (1.0f32 / 0.01).ceil() as usize + 1;
    rise + sparks + 2
}

#[test]
fn test_every_firework_terminates() {
    let mut show = Show::new(fastrand::Rng::with_seed(2024), HeartPattern::Ring);
    let mut surface = RecordingSurface::new(800.0, 600.0);

    let mut bound = 0;
    for _ in 0..20 {
        let params = LaunchParams::random(show.rng_mut(), 800.0, 600.0);
        bound = bound.max(lifetime_bound(600.0, params.rise_speed));
        show.launch(params);
    }

    let mut ticks = 0;
    while !show.is_empty() {
        show.tick(&mut surface);
        surface.take_commands();
        ticks += 1;
        assert!(ticks <= bound, "still {} fireworks after {ticks} ticks", show.len());
    }
}

#[test]
fn test_removal_keeps_live_fireworks_and_order() {
    let mut rng = fastrand::Rng::with_seed(77);
    let mut show = Show::new(fastrand::Rng::with_seed(78), HeartPattern::Ring);
    let mut surface = RecordingSurface::new(640.0, 480.0);

    // Particle size doubles as an identity tag.
    let mut next_tag = 0u32;
    let mut tag = || {
        next_tag += 1;
        2.0 + next_tag as f32 * 0.001
    };

    for _ in 0..25 {
        let mut params = LaunchParams::random(&mut rng, 640.0, 480.0);
        params.y = rng.range(50.0, 480.0);
        params.particle_size = tag();
        show.launch(params);
    }

    for tick in 0..400 {
        if tick % 7 == 0 {
            let mut params = LaunchParams::random(&mut rng, 640.0, 480.0);
            params.particle_size = tag();
            show.launch(params);
        }

        let before: Vec<_> = show.fireworks().to_vec();
        show.tick(&mut surface);
        surface.take_commands();
        let after = show.fireworks();

        // Survivors keep their relative order.
        let mut cursor = before.iter();
        for kept in after {
            assert!(
                cursor.any(|f| f.particle_size() == kept.particle_size()),
                "order changed at tick {tick}"
            );
        }

        // Nothing finished is retained, nothing unfinished is dropped.
        assert!(after.iter().all(|f| !f.is_finished()));
        for gone in before
            .iter()
            .filter(|f| after.iter().all(|a| a.particle_size() != f.particle_size()))
        {
            assert!(gone.is_exploded(), "unexploded firework removed at tick {tick}");
            assert!(
                gone.particles().iter().all(|p| !p.alive()),
                "firework with live sparks removed at tick {tick}"
            );
        }
    }
}

#[test]
fn test_scripted_explosion_through_show() {
    // Every draw returns 0.55: burst line at 301, ring pattern, 650 sparks.
    let mut show = Show::new(SequenceRng::constant(0.55), HeartPattern::Ring);
    let mut surface = RecordingSurface::new(800.0, 1000.0);
    show.launch(LaunchParams {
        x: 100.0,
        y: 500.0,
        color: (255, 0, 0),
        rise_speed: -5.0,
        particle_size: 2.0,
    });

    for _ in 0..40 {
        assert!(!show.fireworks()[0].is_exploded());
        show.tick(&mut surface);
    }
    let firework = &show.fireworks()[0];
    assert!(firework.is_exploded());
    assert_eq!(firework.particles().len(), 650);
    assert_eq!(show.particle_count(), 650);

    // One marker per rising tick, nothing else yet.
    assert_eq!(surface.commands().len(), 40);
    surface.take_commands();

    show.tick(&mut surface);
    assert_eq!(surface.commands().len(), 650);
    assert_eq!(surface.global_alpha(), 1.0);
    assert_eq!(surface.save_depth(), 0);
}

#[test]
fn test_exploded_never_reverts() {
    let mut show = Show::new(fastrand::Rng::with_seed(5), HeartPattern::Curve);
    let mut surface = RecordingSurface::new(300.0, 300.0);
    for i in 0..10 {
        show.launch(LaunchParams {
            x: 30.0 * i as f32,
            y: 300.0,
            color: (0, 0, 255),
            rise_speed: -3.0,
            particle_size: 1.0 + i as f32,
        });
    }

    let mut exploded: Vec<f32> = Vec::new();
    while !show.is_empty() {
        show.tick(&mut surface);
        surface.take_commands();
        for size in &exploded {
            if let Some(f) = show.fireworks().iter().find(|f| f.particle_size() == *size) {
                assert!(f.is_exploded());
            }
        }
        for f in show.fireworks().iter().filter(|f| f.is_exploded()) {
            if !exploded.contains(&f.particle_size()) {
                exploded.push(f.particle_size());
            }
        }
    }
    assert_eq!(exploded.len(), 10);
    assert!(surface.width() > 0.0);
}
