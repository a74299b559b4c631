use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use lane_defence_core::{CellCoord, Occupant, PlayerId};
use lane_defence_world::{query, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "lane";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "lane:v1";
/// Delimiter used to separate the prefix, lane dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Snapshot of the towers standing on one lane.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct LaneLayoutSnapshot {
    /// Number of columns in the lane.
    pub(crate) columns: u32,
    /// Number of rows in the lane.
    pub(crate) rows: u32,
    /// Towers composing the layout.
    pub(crate) towers: Vec<LayoutTower>,
}

impl LaneLayoutSnapshot {
    /// Captures the towers of the player's lane.
    pub(crate) fn capture(world: &World, player: PlayerId) -> Self {
        let dimensions = query::dimensions(world);
        let towers = query::lane(world, player)
            .iter()
            .filter_map(|(cell, occupant)| match occupant {
                Occupant::Tower { health } => Some(LayoutTower { cell, health }),
                Occupant::Soldier => None,
            })
            .collect();
        Self {
            columns: dimensions.width(),
            rows: dimensions.height(),
            towers,
        }
    }

    /// Encodes the snapshot into a single-line string suitable for the command line.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let payload = SerializableSnapshot {
            towers: self.towers.clone(),
        };
        let json = serde_json::to_vec(&payload).map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{SNAPSHOT_HEADER}:{}x{}:{encoded}",
            self.columns, self.rows
        ))
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let decoded: SerializableSnapshot =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        Ok(Self {
            columns,
            rows,
            towers: decoded.towers,
        })
    }

    /// Places the snapshot's towers on the player's lane.
    pub(crate) fn apply_to(
        &self,
        world: &mut World,
        player: PlayerId,
    ) -> Result<(), LayoutTransferError> {
        let dimensions = query::dimensions(world);
        if (self.columns, self.rows) != (dimensions.width(), dimensions.height()) {
            return Err(LayoutTransferError::DimensionMismatch {
                layout_columns: self.columns,
                layout_rows: self.rows,
                lane_columns: dimensions.width(),
                lane_rows: dimensions.height(),
            });
        }

        for tower in &self.towers {
            world
                .seed_tower(player, tower.cell, tower.health)
                .map_err(|reason| LayoutTransferError::RejectedTower {
                    cell: tower.cell,
                    reason,
                })?;
        }
        Ok(())
    }
}

/// Tower description captured within a layout snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct LayoutTower {
    /// Cell hosting the tower.
    pub(crate) cell: CellCoord,
    /// Health of the tower.
    pub(crate) health: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableSnapshot {
    towers: Vec<LayoutTower>,
}

/// Errors that can occur while transferring lane layouts.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("layout string was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    #[error("layout string is missing the prefix")]
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    #[error("layout string is missing the version")]
    MissingVersion,
    /// The encoded snapshot did not include lane dimensions.
    #[error("layout string is missing the lane dimensions")]
    MissingDimensions,
    /// The encoded snapshot did not include the payload segment.
    #[error("layout string is missing the payload")]
    MissingPayload,
    /// The encoded snapshot used an unexpected prefix segment.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The lane dimensions could not be parsed from the encoded snapshot.
    #[error("could not parse lane dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload could not be (de)serialised.
    #[error("could not process layout payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The layout was captured on a lane of another size.
    #[error(
        "layout for a {layout_columns}x{layout_rows} lane does not fit a {lane_columns}x{lane_rows} lane"
    )]
    DimensionMismatch {
        /// Columns recorded in the layout.
        layout_columns: u32,
        /// Rows recorded in the layout.
        layout_rows: u32,
        /// Columns of the target lane.
        lane_columns: u32,
        /// Rows of the target lane.
        lane_rows: u32,
    },
    /// The world refused one of the layout's towers.
    #[error("tower at {cell:?} was rejected: {reason}")]
    RejectedTower {
        /// Cell of the rejected tower.
        cell: CellCoord,
        /// Reason reported by the world.
        reason: lane_defence_core::PurchaseError,
    },
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let (columns, rows) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;

    let columns = columns
        .trim()
        .parse::<u32>()
        .map_err(|_| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;
    let rows = rows
        .trim()
        .parse::<u32>()
        .map_err(|_| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;

    if columns == 0 || rows == 0 {
        return Err(LayoutTransferError::InvalidDimensions(
            dimensions.to_owned(),
        ));
    }

    Ok((columns, rows))
}
