// src/heightmap.rs

use log::debug;
use noise::{NoiseFn, Perlin};

use crate::coords::XZCoords;
use crate::oracle::{TerrainError, TerrainOracle};

/// Surface height sampled at the middle of the range.
pub const SEA_LEVEL: i32 = 64;
const HEIGHT_RANGE: f64 = 32.0;

/// Dense block heights over an axis-aligned patch of columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heightmap {
    origin: XZCoords,
    width: usize,
    length: usize,
    data: Vec<i32>, // row-major, z rows of x
}

impl Heightmap {
    pub fn from_fn(origin: XZCoords, width: usize, length: usize, f: impl Fn(XZCoords) -> i32) -> Self {
        let mut data = Vec::with_capacity(width * length);
        for dz in 0..length as i32 {
            for dx in 0..width as i32 {
                data.push(f(XZCoords::new(origin.x + dx, origin.z + dz)));
            }
        }
        Self { origin, width, length, data }
    }

    pub fn origin(&self) -> XZCoords {
        self.origin
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn get(&self, cell: XZCoords) -> Option<i32> {
        let u = cell.x.checked_sub(self.origin.x)?;
        let v = cell.z.checked_sub(self.origin.z)?;
        if u < 0 || v < 0 || u as usize >= self.width || v as usize >= self.length {
            return None;
        }
        Some(self.data[v as usize * self.width + u as usize])
    }

    pub fn min_max(&self) -> Option<(i32, i32)> {
        let min = *self.data.iter().min()?;
        let max = *self.data.iter().max()?;
        Some((min, max))
    }
}

impl TerrainOracle for Heightmap {
    fn height(&self, cell: XZCoords) -> Result<i32, TerrainError> {
        self.get(cell).ok_or(TerrainError::Unavailable(cell))
    }
}

/// Fractal Perlin terrain, quantised to whole blocks.
pub struct HeightmapGenerator {
    noise: Perlin,
    base_frequency: f64,
    octaves: usize,
    persistence: f64,
    lacunarity: f64,
    terrace: i32,
}

impl HeightmapGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            noise: Perlin::new(seed),
            base_frequency: 0.01,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            terrace: 1,
        }
    }

    /// Snap heights down to multiples of `step`, which widens flat areas.
    pub fn with_terrace(mut self, step: i32) -> Self {
        self.terrace = step.max(1);
        self
    }

    pub fn generate(&self, origin: XZCoords, width: usize, length: usize) -> Heightmap {
        debug!("generating {}x{} heightmap at {}", width, length, origin);
        Heightmap::from_fn(origin, width, length, |cell| self.sample_height(cell))
    }

    pub fn sample_height(&self, cell: XZCoords) -> i32 {
        let mut amplitude = 1.0;
        let mut frequency = self.base_frequency;
        let mut noise_height = 0.0;
        let mut max_value = 0.0;

        for _ in 0..self.octaves {
            let sample_x = cell.x as f64 * frequency;
            let sample_z = cell.z as f64 * frequency;

            noise_height += self.noise.get([sample_x, sample_z]) * amplitude;

            max_value += amplitude;
            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }

        let normalized = noise_height / max_value;
        let height = SEA_LEVEL + (normalized * HEIGHT_RANGE).round() as i32;
        height.div_euclid(self.terrace) * self.terrace
    }
}

impl TerrainOracle for HeightmapGenerator {
    fn height(&self, cell: XZCoords) -> Result<i32, TerrainError> {
        Ok(self.sample_height(cell))
    }
}
