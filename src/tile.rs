use compact_str::CompactString;
use thiserror::Error;

/// Media flavor of a standard (resizable) tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Gif,
    Clip,
    Sticker,
}

/// Whether the packer may resize a tile freely or must treat it as pre-sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Aspect-preserving media that follows the row height.
    Standard(MediaKind),
    /// Pre-sized advertisement. Its natural size is the desired on-screen size.
    Advertisement,
}

/// One media item to be placed in the grid. Immutable input to the layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tile {
    /// Stable identity from the content API
    pub id: CompactString,
    pub kind: TileKind,
    /// Natural width in pixels (must be > 0)
    pub natural_width: u32,
    /// Natural height in pixels (must be > 0)
    pub natural_height: u32,
}

impl Tile {
    pub fn new(id: &str, kind: TileKind, natural_width: u32, natural_height: u32) -> Self {
        Self {
            id: CompactString::new(id),
            kind,
            natural_width,
            natural_height,
        }
    }

    pub fn gif(id: &str, natural_width: u32, natural_height: u32) -> Self {
        Self::new(id, TileKind::Standard(MediaKind::Gif), natural_width, natural_height)
    }

    pub fn clip(id: &str, natural_width: u32, natural_height: u32) -> Self {
        Self::new(id, TileKind::Standard(MediaKind::Clip), natural_width, natural_height)
    }

    pub fn sticker(id: &str, natural_width: u32, natural_height: u32) -> Self {
        Self::new(id, TileKind::Standard(MediaKind::Sticker), natural_width, natural_height)
    }

    pub fn ad(id: &str, width: u32, height: u32) -> Self {
        Self::new(id, TileKind::Advertisement, width, height)
    }

    pub fn is_ad(&self) -> bool {
        matches!(self.kind, TileKind::Advertisement)
    }

    /// Check that the tile can take part in packing.
    pub fn validate(&self) -> Result<(), TileError> {
        if self.natural_width == 0 || self.natural_height == 0 {
            return Err(TileError::EmptyDimensions {
                id: self.id.clone(),
                width: self.natural_width,
                height: self.natural_height,
            });
        }
        if self.id.is_empty() {
            return Err(TileError::MissingId);
        }
        Ok(())
    }
}

/// Reasons a tile is excluded from the layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileError {
    #[error("tile '{id}' has unusable natural size {width}x{height}")]
    EmptyDimensions {
        id: CompactString,
        width: u32,
        height: u32,
    },

    #[error("tile has an empty id")]
    MissingId,
}

/// Keep only tiles that pass validation, preserving order.
/// Rejected tiles are logged and dropped; they never occupy a row slot.
pub fn retain_valid(tiles: &[Tile]) -> Vec<Tile> {
    let mut valid = Vec::with_capacity(tiles.len());
    for tile in tiles {
        match tile.validate() {
            Ok(()) => valid.push(tile.clone()),
            Err(e) => tracing::warn!("Skipping malformed tile: {}", e),
        }
    }
    if valid.len() != tiles.len() {
        tracing::debug!(
            "Filtered {} malformed tiles out of {}",
            tiles.len() - valid.len(),
            tiles.len()
        );
    }
    valid
}

/// Server-provided layout hints, delivered with every page of results.
///
/// Fields are private so the resize percent is always finite and in range;
/// that keeps equality reflexive for the layout cache.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutMetadata {
    /// Pixel floor for a non-ad tile that shares a row with an ad
    min_item_width: u32,
    /// Maximum shrink allowed for an ad's width, in percent (0..=100)
    ad_max_resize_percent: f32,
}

impl LayoutMetadata {
    pub fn new(min_item_width: u32, ad_max_resize_percent: f32) -> Self {
        let percent = if ad_max_resize_percent.is_finite() {
            ad_max_resize_percent.clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            min_item_width,
            ad_max_resize_percent: percent,
        }
    }

    pub fn min_item_width(&self) -> u32 {
        self.min_item_width
    }

    pub fn ad_max_resize_percent(&self) -> f32 {
        self.ad_max_resize_percent
    }

    /// Smallest width an ad of `ad_width` may be shrunk to.
    pub fn min_ad_width(&self, ad_width: i64) -> i64 {
        let keep = 100.0 - f64::from(self.ad_max_resize_percent);
        (ad_width as f64 * keep / 100.0).floor() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_tiles_are_rejected() {
        assert!(Tile::gif("a", 0, 10).validate().is_err());
        assert!(Tile::ad("b", 120, 0).validate().is_err());
        assert_eq!(Tile::gif("", 10, 10).validate(), Err(TileError::MissingId));
        assert!(Tile::sticker("c", 1, 1).validate().is_ok());
    }

    #[test]
    fn retain_valid_keeps_order() {
        let tiles = vec![
            Tile::gif("1", 100, 100),
            Tile::clip("2", 0, 100),
            Tile::ad("3", 120, 80),
            Tile::sticker("4", 50, 0),
            Tile::gif("5", 30, 40),
        ];
        let ids: Vec<String> = retain_valid(&tiles).iter().map(|t| t.id.to_string()).collect();
        assert_eq!(ids, ["1", "3", "5"]);
    }

    #[test]
    fn resize_percent_is_clamped() {
        assert_eq!(LayoutMetadata::new(50, 150.0).ad_max_resize_percent(), 100.0);
        assert_eq!(LayoutMetadata::new(50, -3.0).ad_max_resize_percent(), 0.0);
        assert_eq!(LayoutMetadata::new(50, f32::NAN).ad_max_resize_percent(), 0.0);
        assert_eq!(LayoutMetadata::new(50, 20.0).min_ad_width(120), 96);
    }

    #[test]
    fn non_finite_percent_still_compares_equal() {
        let a = LayoutMetadata::new(50, f32::NAN);
        let b = LayoutMetadata::new(50, f32::INFINITY);
        assert_eq!(a, a);
        assert_eq!(a, LayoutMetadata::new(50, f32::NAN));
        assert_eq!(b.min_ad_width(120), 120);
        assert_eq!(a.min_item_width(), 50);
    }
}
