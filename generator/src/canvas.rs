use std::path::Path;

use anyhow::{anyhow, Result};
use colorgrad::Gradient;
use flatzone::markers::ZONE_PALETTE_SIZE;
use flatzone::{Linger, MarkerKind, MarkerSink, ScanRegion};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use terrain::prelude::{BlockPos, Zone, SEA_LEVEL};

const HEIGHT_RANGE: f32 = 32.0;

/// Top-down picture of a scan, painted as markers arrive.
///
/// Cells stay black until the scan measures them. Released batches are kept
/// on the picture.
pub struct ZoneCanvas {
    region: ScanRegion,
    scale: u32,
    image: RgbImage,
    terrain: Gradient,
    palette: Vec<Rgb<u8>>,
}

fn to_rgb(c: colorgrad::Color) -> Rgb<u8> {
    Rgb([(c.r * 255.0) as u8, (c.g * 255.0) as u8, (c.b * 255.0) as u8])
}

impl ZoneCanvas {
    pub fn new(region: ScanRegion, scale: u32) -> Result<Self> {
        let terrain = colorgrad::CustomGradient::new()
            .colors(&[
                colorgrad::Color::new(0.0, 0.0, 0.5, 1.0),   // Deep water
                colorgrad::Color::new(0.0, 0.0, 1.0, 1.0),   // Shallow water
                colorgrad::Color::new(0.9, 0.9, 0.2, 1.0),   // Beach
                colorgrad::Color::new(0.0, 0.6, 0.0, 1.0),   // Grass
                colorgrad::Color::new(0.5, 0.3, 0.0, 1.0),   // Mountain
                colorgrad::Color::new(1.0, 1.0, 1.0, 1.0),   // Snow
            ])
            .domain(&[0.0, 0.3, 0.35, 0.4, 0.8, 1.0])
            .build()
            .map_err(|e| anyhow!("terrain gradient: {}", e))?;

        let rainbow = colorgrad::rainbow();
        let palette = (0..ZONE_PALETTE_SIZE)
            .map(|i| to_rgb(rainbow.at(i as f64 / ZONE_PALETTE_SIZE as f64)))
            .collect();

        let side = (2 * region.radius + 1) as u32 * scale;
        Ok(Self { region, scale, image: RgbImage::new(side, side), terrain, palette })
    }

    fn terrain_color(&self, y: i32) -> Rgb<u8> {
        let t = (y - SEA_LEVEL) as f32 / (2.0 * HEIGHT_RANGE) + 0.5;
        to_rgb(self.terrain.at(t.clamp(0.0, 1.0) as f64))
    }

    fn fill(&mut self, pos: BlockPos, color: Rgb<u8>) {
        let px = (pos.x - self.region.min_x()) as u32 * self.scale;
        let py = (pos.z - self.region.min_z()) as u32 * self.scale;
        for dy in 0..self.scale {
            for dx in 0..self.scale {
                self.image.put_pixel(px + dx, py + dy, color);
            }
        }
    }

    /// Outlines every zone and writes the picture to `path`.
    pub fn save(mut self, zones: &[Zone], path: &Path) -> Result<()> {
        for zone in zones {
            let x = (zone.origin.x - self.region.min_x()) * self.scale as i32;
            let y = (zone.origin.z - self.region.min_z()) * self.scale as i32;
            let rect = Rect::at(x, y).of_size(zone.width * self.scale, zone.length * self.scale);
            draw_hollow_rect_mut(&mut self.image, rect, Rgb([255, 0, 0]));
        }
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        self.image.save(path)?;
        Ok(())
    }
}

impl MarkerSink for ZoneCanvas {
    fn place(&mut self, pos: BlockPos, kind: MarkerKind) {
        if !self.region.in_square(pos.column()) {
            return;
        }
        let color = match kind {
            MarkerKind::Scanned => self.terrain_color(pos.y),
            MarkerKind::Zone { color } => self.palette[color as usize % self.palette.len()],
        };
        self.fill(pos, color);
    }

    fn clear(&mut self, pos: BlockPos) {
        if self.region.in_square(pos.column()) {
            let color = self.terrain_color(pos.y);
            self.fill(pos, color);
        }
    }

    fn release(&mut self, _batch: Vec<BlockPos>, _linger: Linger) {}
}
