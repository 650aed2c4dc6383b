use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::HeightmapError;

/// 8-bit elevation grid produced by diamond-square, with an optional
/// median-filtered copy. Row-major: `index = y * width + x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightmapBuffer {
    width: usize,
    height: usize,
    unfiltered: Box<[u8]>,
    filtered: Option<Box<[u8]>>,
}

/// Inputs to one diamond-square run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiamondSquare {
    pub width: usize,
    pub height: usize,
    /// Value every sample starts at before seeding.
    pub default_height: u8,
    /// Lattice spacing of the random seed points; also the first step size.
    pub feature_spread: usize,
    /// Seed points are drawn from `0..=feature_max_height`.
    pub feature_max_height: u8,
    /// Initial noise amplitude. Halved after each step, never below 1.
    pub noise_scale: i32,
}

impl HeightmapBuffer {
    /// Buffer of `width * height` samples all set to `value`.
    pub fn filled(width: usize, height: usize, value: u8) -> Result<Self, HeightmapError> {
        let len = checked_len(width, height)?;
        let unfiltered = strata_core::error::try_alloc_slice("heightmap", len, value)?;
        Ok(Self {
            width,
            height,
            unfiltered,
            filtered: None,
        })
    }

    /// Wrap existing samples. Fails if the length does not match.
    pub fn from_samples(width: usize, height: usize, samples: Vec<u8>) -> Result<Self, HeightmapError> {
        let len = checked_len(width, height)?;
        if samples.len() != len {
            return Err(HeightmapError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            unfiltered: samples.into_boxed_slice(),
            filtered: None,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn unfiltered(&self) -> &[u8] {
        &self.unfiltered
    }

    pub fn filtered(&self) -> Option<&[u8]> {
        self.filtered.as_deref()
    }

    /// Filtered samples when present and requested, else unfiltered.
    pub fn samples(&self, prefer_filtered: bool) -> &[u8] {
        match (&self.filtered, prefer_filtered) {
            (Some(f), true) => f,
            _ => &self.unfiltered,
        }
    }

    /// Sample with toroidal wrap on both axes, negative offsets included.
    pub fn sample(&self, x: i64, y: i64) -> u8 {
        self.unfiltered[self.wrapped_index(x, y)]
    }

    fn set_sample(&mut self, x: i64, y: i64, value: i32) {
        let i = self.wrapped_index(x, y);
        self.unfiltered[i] = value.clamp(0, 255) as u8;
    }

    fn wrapped_index(&self, x: i64, y: i64) -> usize {
        let xx = x.rem_euclid(self.width as i64) as usize;
        let yy = y.rem_euclid(self.height as i64) as usize;
        yy * self.width + xx
    }

    /// Run a 3x3 median filter over the unfiltered samples and keep the
    /// result alongside them. The window is clamped at the edges.
    pub fn apply_median_filter(&mut self) -> Result<(), HeightmapError> {
        let mut out =
            strata_core::error::try_alloc_slice("filtered heightmap", self.unfiltered.len(), 0u8)?;
        let w = self.width as i64;
        let h = self.height as i64;
        let mut window = [0u8; 9];
        for y in 0..h {
            for x in 0..w {
                let mut i = 0;
                for fy in -1..=1 {
                    for fx in -1..=1 {
                        let ix = (x + fx).clamp(0, w - 1) as usize;
                        let iy = (y + fy).clamp(0, h - 1) as usize;
                        window[i] = self.unfiltered[iy * self.width + ix];
                        i += 1;
                    }
                }
                window.sort_unstable();
                out[y as usize * self.width + x as usize] = window[4];
            }
        }
        self.filtered = Some(out);
        Ok(())
    }
}

fn checked_len(width: usize, height: usize) -> Result<usize, HeightmapError> {
    if width == 0 || height == 0 {
        return Err(HeightmapError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(HeightmapError::InvalidDimensions { width, height })
}

impl DiamondSquare {
    /// Generate with a seeded ChaCha8 stream. Same seed and parameters give
    /// the same buffer on every platform.
    pub fn generate_seeded(&self, seed: u64) -> Result<HeightmapBuffer, HeightmapError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate(&mut rng)
    }

    /// Diamond-square over a toroidal grid, followed by the median filter.
    /// `feature_spread` need not divide the dimensions; sampling wraps.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<HeightmapBuffer, HeightmapError> {
        if self.feature_spread == 0 {
            return Err(HeightmapError::InvalidFeatureSpread);
        }
        let mut hm = HeightmapBuffer::filled(self.width, self.height, self.default_height)?;
        let w = self.width as i64;
        let h = self.height as i64;
        let spread = self.feature_spread as i64;

        let mut y = 0;
        while y < h {
            let mut x = 0;
            while x < w {
                let v = rng.gen_range(0..=self.feature_max_height as i32);
                hm.set_sample(x, y, v);
                x += spread;
            }
            y += spread;
        }

        let mut step = spread;
        let mut noise = self.noise_scale.max(1);
        while step > 1 {
            let half = step / 2;

            // Square pass: centre of each cell from its four corners.
            let mut y = half;
            while y < h + half {
                let mut x = half;
                while x < w + half {
                    let sum = hm.sample(x - half, y - half) as i32
                        + hm.sample(x + half, y - half) as i32
                        + hm.sample(x - half, y + half) as i32
                        + hm.sample(x + half, y + half) as i32;
                    let n = rng.gen_range(-noise..=noise);
                    hm.set_sample(x, y, displaced(sum, n));
                    x += step;
                }
                y += step;
            }

            // Diamond pass: edge midpoints from their four orthogonal neighbours.
            let mut y = 0;
            while y < h {
                let mut x = 0;
                while x < w {
                    for (px, py) in [(x + half, y), (x, y + half)] {
                        let sum = hm.sample(px - half, py) as i32
                            + hm.sample(px + half, py) as i32
                            + hm.sample(px, py - half) as i32
                            + hm.sample(px, py + half) as i32;
                        let n = rng.gen_range(-noise..=noise);
                        hm.set_sample(px, py, displaced(sum, n));
                    }
                    x += step;
                }
                y += step;
            }

            step /= 2;
            noise = if noise > 2 { noise / 2 } else { 1 };
        }

        hm.apply_median_filter()?;
        log::debug!(
            "diamond-square {}x{} spread={} max={} noise={}",
            self.width,
            self.height,
            self.feature_spread,
            self.feature_max_height,
            self.noise_scale
        );
        Ok(hm)
    }
}

/// Average of four samples plus noise, truncated toward zero.
fn displaced(sum: i32, noise: i32) -> i32 {
    (sum as f32 / 4.0 + noise as f32) as i32
}
