use super::packer::pack_row;
use super::positions::assign_positions;
use super::{LayoutConfig, Row};
use crate::tile::{retain_valid, LayoutMetadata, Tile};

/// Split a tile sequence into packed, positioned rows.
///
/// Malformed tiles are dropped (and logged) before packing. A zero container
/// width yields an empty layout.
pub fn partition(
    tiles: &[Tile],
    container_width: u32,
    gap: u32,
    metadata: &LayoutMetadata,
    config: &LayoutConfig,
) -> Vec<Row> {
    if container_width == 0 {
        tracing::debug!("Container width is 0, skipping layout of {} tiles", tiles.len());
        return Vec::new();
    }
    let valid = retain_valid(tiles);
    let mut rows = partition_valid(&valid, container_width, gap, metadata, config);
    assign_positions(&mut rows, gap);
    rows
}

/// Greedy left-to-right row split over already validated tiles. Offsets are
/// left at zero; callers run the position pass.
pub(crate) fn partition_valid(
    tiles: &[Tile],
    container_width: u32,
    gap: u32,
    metadata: &LayoutMetadata,
    config: &LayoutConfig,
) -> Vec<Row> {
    let mut rows = Vec::with_capacity(tiles.len() / 3 + 1);
    let mut cursor = 0;

    while cursor < tiles.len() {
        let end = (cursor + config.max_items_per_row).min(tiles.len());
        let row = pack_row(&tiles[cursor..end], container_width, gap, metadata, config);
        if row.is_empty() {
            // Unreachable for a valid config; bail rather than spin.
            tracing::warn!("Packer returned an empty row at tile {}, stopping", cursor);
            break;
        }
        cursor += row.len();
        rows.push(row);
    }

    tracing::debug!("Partitioned {} tiles into {} rows", tiles.len(), rows.len());
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::test_support::TileFeed;

    fn ids(rows: &[Row]) -> Vec<String> {
        rows.iter()
            .flat_map(|r| r.tiles.iter().map(|t| t.tile.id.to_string()))
            .collect()
    }

    #[test]
    fn seven_squares_make_rows_of_four_and_three() {
        let tiles: Vec<_> = (0..7).map(|i| Tile::gif(&i.to_string(), 100, 100)).collect();
        let rows = partition(&tiles, 360, 1, &LayoutMetadata::default(), &LayoutConfig::default());
        let lens: Vec<_> = rows.iter().map(Row::len).collect();
        assert_eq!(lens, [4, 3]);
        assert_eq!(rows[1].height, 119);
    }

    #[test]
    fn zero_width_container_yields_nothing() {
        let tiles = vec![Tile::gif("a", 100, 100)];
        let rows = partition(&tiles, 0, 1, &LayoutMetadata::default(), &LayoutConfig::default());
        assert!(rows.is_empty());
    }

    #[test]
    fn malformed_tiles_are_skipped() {
        let tiles = vec![
            Tile::gif("a", 100, 100),
            Tile::gif("bad", 0, 100),
            Tile::gif("b", 100, 100),
            Tile::ad("bad-ad", 120, 0),
        ];
        let rows = partition(&tiles, 360, 1, &LayoutMetadata::default(), &LayoutConfig::default());
        assert_eq!(ids(&rows), ["a", "b"]);
    }

    #[test]
    fn rows_conserve_order_and_fill_width() {
        let config = LayoutConfig::default();
        let metadata = LayoutMetadata::new(50, 20.0);
        for seed in 0..20 {
            let tiles = TileFeed::new(seed).take(57, true);
            let rows = partition(&tiles, 411, 2, &metadata, &config);

            let expected: Vec<String> = tiles.iter().map(|t| t.id.to_string()).collect();
            assert_eq!(ids(&rows), expected, "seed {seed}");

            for row in &rows {
                assert!(row.len() >= 1 && row.len() <= config.max_items_per_row);
                assert!(row.tiles.iter().all(|t| t.width > 0 && t.height > 0));
                if !row.has_ad() {
                    assert!(row.width(2).abs_diff(411) <= 1, "seed {seed}: {row:?}");
                }
            }
        }
    }

    #[test]
    fn narrow_strip_alone_is_stretched_to_fill() {
        let tiles = vec![Tile::sticker("strip", 10, 100)];
        let rows = partition(&tiles, 360, 1, &LayoutMetadata::default(), &LayoutConfig::default());
        assert_eq!(rows[0].height, 180);
        assert_eq!(rows[0].tiles[0].width, 360);
    }

    #[test]
    fn ads_respect_resize_budget() {
        let metadata = LayoutMetadata::new(90, 20.0);
        for seed in 0..20 {
            let tiles = TileFeed::new(seed).take(80, true);
            let rows = partition(&tiles, 360, 1, &metadata, &LayoutConfig::default());
            for row in &rows {
                for t in row.tiles.iter().filter(|t| t.tile.is_ad()) {
                    let floor = metadata.min_ad_width(i64::from(t.tile.natural_width));
                    assert!(i64::from(t.width) >= floor - 1, "seed {seed}: {row:?}");
                }
            }
        }
    }
}
