// src/publish.rs

use chrono::{DateTime, Utc};
use futures::channel::mpsc;
use futures::SinkExt;
use serde::{Deserialize, Serialize};
use terrain::prelude::{XZCoords, Zone};

use crate::error::PublishError;

/// Bus topic zone reports are published on.
pub const ZONE_TOPIC: &str = "map.v1";
pub const BROADCAST: &str = "BROADCAST";

/// Receives zones in the order the scan closes them.
///
/// The scan awaits each call before moving on, so an implementation must not
/// reorder; it only has to accept the zone, not see it delivered.
#[allow(async_fn_in_trait)]
pub trait ZonePublisher {
    async fn publish(&mut self, zone: Zone) -> Result<(), PublishError>;
}

impl ZonePublisher for Vec<Zone> {
    async fn publish(&mut self, zone: Zone) -> Result<(), PublishError> {
        self.push(zone);
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageStatus {
    Success,
}

/// Zone body of a `map.v1` message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZonePayload {
    pub center: [i32; 2],
    pub origin: [i32; 2],
    pub size: [u32; 2],
    pub average_height: i32,
    pub blocks: Vec<[i32; 2]>,
}

impl From<&Zone> for ZonePayload {
    fn from(zone: &Zone) -> Self {
        Self {
            center: zone.center.to_pair(),
            origin: zone.origin.to_pair(),
            size: [zone.width, zone.length],
            average_height: zone.height,
            blocks: zone.blocks.iter().map(|b| b.to_pair()).collect(),
        }
    }
}

impl ZonePayload {
    pub fn to_zone(&self) -> Zone {
        Zone {
            origin: XZCoords::from(self.origin),
            width: self.size[0],
            length: self.size[1],
            center: XZCoords::from(self.center),
            height: self.average_height,
            blocks: self.blocks.iter().copied().map(XZCoords::from).collect(),
        }
    }
}

/// Envelope a zone travels in on the agent bus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub source: String,
    pub target: String,
    pub timestamp: DateTime<Utc>,
    pub status: MessageStatus,
    pub payload: ZonePayload,
}

impl ZoneMessage {
    pub fn new(source: &str, zone: &Zone) -> Self {
        Self {
            kind: ZONE_TOPIC.to_string(),
            source: source.to_string(),
            target: BROADCAST.to_string(),
            timestamp: Utc::now(),
            status: MessageStatus::Success,
            payload: ZonePayload::from(zone),
        }
    }
}

/// Publishes zones as `map.v1` messages into a bounded bus channel.
pub struct BusPublisher {
    source: String,
    tx: mpsc::Sender<ZoneMessage>,
}

impl BusPublisher {
    pub fn new(source: impl Into<String>, tx: mpsc::Sender<ZoneMessage>) -> Self {
        Self { source: source.into(), tx }
    }

    /// A publisher plus the receiving end of a fresh channel.
    pub fn channel(source: impl Into<String>, buffer: usize) -> (Self, mpsc::Receiver<ZoneMessage>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self::new(source, tx), rx)
    }
}

impl ZonePublisher for BusPublisher {
    async fn publish(&mut self, zone: Zone) -> Result<(), PublishError> {
        let message = ZoneMessage::new(&self.source, &zone);
        self.tx.send(message).await.map_err(|e| {
            if e.is_disconnected() {
                PublishError::Disconnected
            } else {
                PublishError::Rejected(e.to_string())
            }
        })
    }
}
