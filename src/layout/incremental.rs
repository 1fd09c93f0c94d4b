use super::partition::partition_valid;
use super::positions::{assign_positions, content_height};
use super::{ConfigError, LayoutConfig, PositionedTile, Row};
use crate::tile::{retain_valid, LayoutMetadata, Tile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Geometry {
    container_width: u32,
    gap: u32,
}

/// Everything remembered between calls.
#[derive(Debug, Default)]
struct LayoutState {
    /// Validated tiles the rows were built from
    tiles: Vec<Tile>,
    rows: Vec<Row>,
    metadata: LayoutMetadata,
    geometry: Option<Geometry>,
}

/// How a new tile list relates to the cached one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    /// Unrelated, shrunk, reordered or re-measured: lay out from scratch
    New,
    /// Cached list is a strict prefix of the new one
    Append,
    /// Same list, same geometry, same metadata
    Unchanged,
}

/// Masonry layout for one grid, recomputing only the last row and the new
/// tiles when the list grows at the end.
///
/// Not meant for concurrent use: `update` takes `&mut self`, so share it
/// behind a `Mutex` if several threads need the same grid.
#[derive(Debug, Default)]
pub struct MasonryLayout {
    config: LayoutConfig,
    state: LayoutState,
}

impl MasonryLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LayoutConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: LayoutState::default(),
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out `tiles`, reusing all but the last row of the previous call when
    /// the list only grew at the end.
    pub fn update(
        &mut self,
        tiles: &[Tile],
        container_width: u32,
        gap: u32,
        metadata: &LayoutMetadata,
    ) -> &[Row] {
        if container_width == 0 {
            tracing::debug!("Container width is 0, dropping cached layout");
            self.clear();
            return &self.state.rows;
        }

        let tiles = retain_valid(tiles);
        let geometry = Geometry {
            container_width,
            gap,
        };

        let mut rows = match self.classify(&tiles, geometry, metadata) {
            Change::Unchanged => {
                tracing::debug!("Layout unchanged ({} tiles)", tiles.len());
                return &self.state.rows;
            }
            Change::New => {
                tracing::debug!("Full layout of {} tiles at width {}", tiles.len(), container_width);
                partition_valid(&tiles, container_width, gap, metadata, &self.config)
            }
            Change::Append => {
                let keep = self.settled_rows();
                let mut rows = std::mem::take(&mut self.state.rows);
                rows.truncate(keep);
                let start: usize = rows.iter().map(Row::len).sum();
                tracing::debug!(
                    "Appending: kept {} rows, relaying tiles {}..{}",
                    keep,
                    start,
                    tiles.len()
                );
                rows.extend(partition_valid(
                    &tiles[start..],
                    container_width,
                    gap,
                    metadata,
                    &self.config,
                ));
                rows
            }
        };
        assign_positions(&mut rows, gap);

        self.state = LayoutState {
            tiles,
            rows,
            metadata: *metadata,
            geometry: Some(geometry),
        };
        &self.state.rows
    }

    pub fn rows(&self) -> &[Row] {
        &self.state.rows
    }

    /// All tiles in display order.
    pub fn tiles(&self) -> impl Iterator<Item = &PositionedTile> {
        self.state.rows.iter().flat_map(|r| r.tiles.iter())
    }

    pub fn content_height(&self) -> u64 {
        let gap = self.state.geometry.map_or(0, |g| g.gap);
        content_height(&self.state.rows, gap)
    }

    pub fn clear(&mut self) {
        self.state = LayoutState::default();
    }

    fn classify(&self, tiles: &[Tile], geometry: Geometry, metadata: &LayoutMetadata) -> Change {
        let cached = &self.state.tiles;
        if self.state.geometry != Some(geometry) {
            return Change::New;
        }
        if tiles.is_empty() || cached.is_empty() || tiles.len() < cached.len() {
            return Change::New;
        }
        // Full tile comparison: an id reused with other dimensions is a mismatch.
        if tiles[..cached.len()] != cached[..] {
            return Change::New;
        }
        if tiles.len() > cached.len() {
            Change::Append
        } else if self.state.metadata == *metadata {
            Change::Unchanged
        } else {
            Change::New
        }
    }

    /// Rows kept on append: everything but the last row, whose composition
    /// may change once more tiles follow it. Earlier rows are already on
    /// screen and stay as they are.
    fn settled_rows(&self) -> usize {
        self.state.rows.len().saturating_sub(1)
    }
}
