// src/emitter.rs

use log::info;
use terrain::prelude::{BlockPos, Zone};

use crate::component::ClosedComponent;
use crate::decompose::decompose;
use crate::error::PublishError;
use crate::markers::{Linger, MarkerKind, MarkerSink, ZONE_PALETTE_SIZE};
use crate::publish::ZonePublisher;

/// Turns closed components into published zones, in closure order.
#[derive(Debug, Default)]
pub struct ZoneEmitter {
    next_color: u8,
    emitted: usize,
}

impl ZoneEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zones published so far by this emitter.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Decomposes `component` and publishes one zone per rectangle, each
    /// submission awaited before the next. Returns how many were published.
    pub async fn emit<P, M>(
        &mut self,
        component: &ClosedComponent,
        publisher: &mut P,
        markers: &mut M,
    ) -> Result<usize, PublishError>
    where
        P: ZonePublisher,
        M: MarkerSink,
    {
        let height = component.height();
        let rects = decompose(component);

        for rect in &rects {
            let zone = Zone::new(rect.origin, rect.width, rect.length, height);
            let blocks: Vec<BlockPos> = zone.blocks.iter().map(|b| b.at_height(height)).collect();

            publisher.publish(zone).await?;
            self.emitted += 1;
            info!("zone published: {}x{} at {} (h={})", rect.width, rect.length, rect.origin, height);

            let color = self.next_color;
            self.next_color = (self.next_color + 1) % ZONE_PALETTE_SIZE;
            for &pos in &blocks {
                markers.place(pos, MarkerKind::Zone { color });
            }
            markers.release(blocks, Linger::Zone);
        }
        Ok(rects.len())
    }
}
