pub mod incremental;
pub mod packer;
pub mod partition;
pub mod positions;

use thiserror::Error;

use crate::tile::Tile;

pub use incremental::MasonryLayout;
pub use packer::pack_row;
pub use partition::partition;
pub use positions::assign_positions;

/// A tile with its final on-screen geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedTile {
    pub tile: Tile,
    pub width: u32,
    pub height: u32,
    /// Left edge within the scroll content (filled by the position pass)
    pub x: u32,
    /// Top edge within the scroll content (filled by the position pass)
    pub y: u32,
}

impl PositionedTile {
    pub(crate) fn sized(tile: Tile, width: u32, height: u32) -> Self {
        Self {
            tile,
            width,
            height,
            x: 0,
            y: 0,
        }
    }
}

/// A horizontal strip of tiles sharing one height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub tiles: Vec<PositionedTile>,
    /// Height shared by the row's resizable tiles; drives vertical rhythm.
    pub height: u32,
}

impl Row {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Stable list key for the rendering layer (id of the first tile).
    pub fn key(&self) -> Option<&str> {
        self.tiles.first().map(|t| t.tile.id.as_str())
    }

    pub fn has_ad(&self) -> bool {
        self.tiles.iter().any(|t| t.tile.is_ad())
    }

    /// Packed width including the gaps between tiles.
    pub fn width(&self, gap: u32) -> u64 {
        let tiles: u64 = self.tiles.iter().map(|t| u64::from(t.width)).sum();
        tiles + u64::from(gap) * self.tiles.len().saturating_sub(1) as u64
    }
}

/// Engine constants that are not delivered by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Lowest row height tried by the height search (px)
    pub min_row_height: u32,
    /// Highest row height tried by the height search (px)
    pub max_row_height: u32,
    /// Size of the candidate window offered to the packer
    pub max_items_per_row: usize,
    /// Window size used when an ad shows up past the second slot
    pub ad_window: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_row_height: 50,
            max_row_height: 180,
            max_items_per_row: 4,
            ad_window: 2,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_items_per_row == 0 {
            return Err(ConfigError::NoItemsPerRow);
        }
        if self.min_row_height == 0 || self.min_row_height > self.max_row_height {
            return Err(ConfigError::HeightRange {
                min: self.min_row_height,
                max: self.max_row_height,
            });
        }
        if self.ad_window == 0 || self.ad_window > self.max_items_per_row {
            return Err(ConfigError::AdWindow {
                ad_window: self.ad_window,
                max_items_per_row: self.max_items_per_row,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max_items_per_row must be at least 1")]
    NoItemsPerRow,

    #[error("invalid row height range {min}..={max}")]
    HeightRange { min: u32, max: u32 },

    #[error("ad_window {ad_window} must be within 1..={max_items_per_row}")]
    AdWindow {
        ad_window: usize,
        max_items_per_row: usize,
    },
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_height_range_is_rejected() {
        let config = LayoutConfig {
            min_row_height: 200,
            max_row_height: 100,
            ..LayoutConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::HeightRange { min: 200, max: 100 })
        );
    }

    #[test]
    fn ad_window_must_fit_the_row() {
        let config = LayoutConfig {
            max_items_per_row: 2,
            ad_window: 3,
            ..LayoutConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn row_width_counts_gaps() {
        let row = Row {
            tiles: vec![
                PositionedTile::sized(Tile::gif("a", 1, 1), 100, 50),
                PositionedTile::sized(Tile::gif("b", 1, 1), 60, 50),
            ],
            height: 50,
        };
        assert_eq!(row.width(2), 162);
        assert_eq!(row.key(), Some("a"));
        assert!(!row.has_ad());
    }
}
