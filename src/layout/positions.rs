use super::Row;

/// Fill in x/y offsets for every tile, top to bottom and left to right.
pub fn assign_positions(rows: &mut [Row], gap: u32) {
    let mut y = 0u32;
    for row in rows.iter_mut() {
        let mut x = 0u32;
        for tile in &mut row.tiles {
            tile.x = x;
            tile.y = y;
            x = x.saturating_add(tile.width).saturating_add(gap);
        }
        y = y.saturating_add(row.height).saturating_add(gap);
    }
}

/// Total scroll height of a positioned layout, without a trailing gap.
pub fn content_height(rows: &[Row], gap: u32) -> u64 {
    let heights: u64 = rows.iter().map(|r| u64::from(r.height)).sum();
    heights + u64::from(gap) * rows.len().saturating_sub(1) as u64
}
