/// Source of uniform random numbers for the simulation.
///
/// Everything random in a show (launch positions, explosion patterns,
/// particle counts, colors, the explosion altitude) is drawn through this
/// trait so a run can be replayed from a seed or a fixed sequence.
pub trait RandomSource {
    /// Uniform value in `[0, 1)`.
    fn next_f32(&mut self) -> f32;

    /// Uniform value in `[min, max)`.
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        ((self.next_f32() * len as f32) as usize).min(len - 1)
    }
}

impl RandomSource for fastrand::Rng {
    fn next_f32(&mut self) -> f32 {
        self.f32()
    }
}

/// Replays a fixed list of values, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct SequenceRng {
    values: Vec<f32>,
    pos: usize,
}

impl SequenceRng {
    /// Values are clamped into `[0, 1)`; an empty list behaves like `[0.0]`.
    pub fn new(values: impl IntoIterator<Item = f32>) -> Self {
        let mut values: Vec<f32> = values
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f32::EPSILON))
            .collect();
        if values.is_empty() {
            values.push(0.0);
        }
        Self { values, pos: 0 }
    }

    pub fn constant(value: f32) -> Self {
        Self::new([value])
    }
}

impl RandomSource for SequenceRng {
    fn next_f32(&mut self) -> f32 {
        let v = self.values[self.pos];
        self.pos = (self.pos + 1) % self.values.len();
        v
    }
}

/// Seeded generator when a seed is given, otherwise one seeded from entropy.
pub fn from_seed(seed: Option<u64>) -> fastrand::Rng {
    match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    }
}
