use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// Fractal Perlin field sampled on grid cells for noise-based cave fill.
/// Samples are remapped from roughly [-1, 1] to a [0, 100) "draw" so they can
/// be compared against a fill percentage like a uniform random draw.
pub struct NoiseField {
    fbm: Fbm<Perlin>,
}

impl NoiseField {
    pub fn new(seed: u32, octaves: usize, frequency: f32) -> Self {
        let fbm = Fbm::<Perlin>::new(seed)
            .set_octaves(octaves.max(1))
            .set_frequency(frequency as f64)
            .set_lacunarity(2.0)
            .set_persistence(0.5);

        Self { fbm }
    }

    /// Raw 2D noise at a cell coordinate.
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        self.fbm.get([x as f64, y as f64]) as f32
    }

    /// Noise at a cell centre remapped to the [0, 100) draw range.
    ///
    /// Perlin noise is zero on its integer lattice, so sampling at the centre
    /// keeps whole-number frequencies from collapsing every draw to 50.
    pub fn draw(&self, x: usize, y: usize) -> u32 {
        let v = self.sample(x as f32 + 0.5, y as f32 + 0.5);
        let normalized = ((v + 1.0) * 0.5).clamp(0.0, 0.999_999);
        (normalized * 100.0) as u32
    }
}
