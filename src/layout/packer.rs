use super::{LayoutConfig, PositionedTile, Row};
use crate::tile::{LayoutMetadata, Tile, TileKind};

/// Best candidate seen by the height search.
#[derive(Debug, Clone, Copy)]
struct Fit {
    /// Number of leading window tiles in the row
    len: usize,
    height: u32,
    /// container width minus packed width
    residual: i64,
}

/// Pack the best-fitting row from the front of `candidates`.
///
/// Every height in the search range is tried against every prefix of the
/// window; the prefix/height pair whose packed width lands closest to
/// `container_width` wins. The returned row may hold fewer tiles than were
/// offered. Tiles must already be validated and `container_width` must be
/// positive; an empty window yields an empty row.
pub fn pack_row(
    candidates: &[Tile],
    container_width: u32,
    gap: u32,
    metadata: &LayoutMetadata,
    config: &LayoutConfig,
) -> Row {
    let window = &candidates[..candidates.len().min(config.max_items_per_row)];
    if window.is_empty() {
        return Row {
            tiles: Vec::new(),
            height: 0,
        };
    }

    let ad_index = window.iter().position(Tile::is_ad);
    let (min_height, max_height) = match ad_index {
        // Ads never sit deep in a wide row; retry on a narrower window.
        Some(i) if i >= config.ad_window => {
            tracing::trace!("Ad at window slot {}, narrowing window to {}", i, config.ad_window);
            return pack_row(&window[..config.ad_window], container_width, gap, metadata, config);
        }
        // Ads are never resized vertically by the search.
        Some(i) => (window[i].natural_height, window[i].natural_height),
        None => (config.min_row_height, config.max_row_height),
    };

    let container = i64::from(container_width);
    let gap = i64::from(gap);

    let mut best: Option<Fit> = None;
    for height in min_height..=max_height {
        let mut packed = -gap;
        for (k, tile) in window.iter().enumerate() {
            packed += width_at(tile, height) + gap;
            let fit = Fit {
                len: k + 1,
                height,
                residual: container - packed,
            };
            if improves(best.as_ref(), &fit) {
                best = Some(fit);
            }
        }
    }

    let Some(fit) = best else {
        return Row {
            tiles: Vec::new(),
            height: 0,
        };
    };

    let row = &window[..fit.len];
    let mut widths: Vec<i64> = row.iter().map(|t| width_at(t, fit.height)).collect();
    let mut heights: Vec<i64> = vec![i64::from(fit.height); row.len()];
    let resizable: Vec<usize> = row
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.is_ad())
        .map(|(i, _)| i)
        .collect();

    spread(&mut widths, &resizable, fit.residual);
    settle_underflow(&mut widths, &resizable);

    if let Some(ad) = ad_index.filter(|&i| i < row.len()) {
        enforce_min_width(
            &mut widths,
            &mut heights,
            ad,
            &resizable,
            container,
            gap,
            metadata,
        );
    }

    tracing::trace!(
        "Packed row of {}/{} tiles at height {} (residual {})",
        row.len(),
        candidates.len(),
        fit.height,
        fit.residual
    );

    let tiles = row
        .iter()
        .zip(widths.iter().zip(heights.iter()))
        .map(|(tile, (&w, &h))| PositionedTile::sized(tile.clone(), to_px(w), to_px(h)))
        .collect();

    Row {
        tiles,
        height: fit.height,
    }
}

/// Width of `tile` when laid out at `height`, rounded half up.
fn width_at(tile: &Tile, height: u32) -> i64 {
    match tile.kind {
        TileKind::Advertisement => i64::from(tile.natural_width),
        TileKind::Standard(_) => {
            let w = i64::from(tile.natural_width);
            let h = i64::from(tile.natural_height);
            (2 * w * i64::from(height) + h) / (2 * h)
        }
    }
}

/// Tie-break: a strictly smaller residual wins, and a multi-tile candidate
/// always displaces a single-tile best. Single tiles are only taken while
/// nothing wider has been seen.
fn improves(best: Option<&Fit>, fit: &Fit) -> bool {
    let Some(best) = best else {
        return true;
    };
    let closer = fit.residual.abs() < best.residual.abs();
    if fit.len == 1 {
        best.len == 1 && closer
    } else {
        best.len == 1 || closer
    }
}

/// Add `amount` across `indices` as evenly as integers allow. Leftover pixels
/// go one each to the leading indices, so the sum is exact.
fn spread(widths: &mut [i64], indices: &[usize], amount: i64) {
    if indices.is_empty() || amount == 0 {
        return;
    }
    let n = indices.len() as i64;
    let share = amount / n;
    let rem = amount % n;
    for (k, &i) in indices.iter().enumerate() {
        let extra = if (k as i64) < rem.abs() { rem.signum() } else { 0 };
        widths[i] += share + extra;
    }
}

/// Lift tiles that a negative spread pushed below 1px back to 1px and take
/// the difference from tiles that still have room, so the row sum is kept.
fn settle_underflow(widths: &mut [i64], indices: &[usize]) {
    loop {
        let deficit: i64 = indices.iter().map(|&i| (1 - widths[i]).max(0)).sum();
        if deficit == 0 {
            return;
        }
        let donors: Vec<usize> = indices.iter().copied().filter(|&i| widths[i] > 1).collect();
        for &i in indices {
            widths[i] = widths[i].max(1);
        }
        if donors.is_empty() {
            return;
        }
        spread(widths, &donors, -deficit);
    }
}

fn packed_width(widths: &[i64], gap: i64) -> i64 {
    widths.iter().sum::<i64>() + gap * (widths.len() as i64 - 1)
}

/// Lift narrow neighbours of an ad to the metadata floor and shrink the ad
/// (within its resize budget) to make room. Clamped tiles take the ad's new
/// height so the pair renders as one strip.
fn enforce_min_width(
    widths: &mut [i64],
    heights: &mut [i64],
    ad: usize,
    resizable: &[usize],
    container: i64,
    gap: i64,
    metadata: &LayoutMetadata,
) {
    let floor = i64::from(metadata.min_item_width());
    let clamped: Vec<usize> = resizable
        .iter()
        .copied()
        .filter(|&i| widths[i] < floor)
        .collect();
    if clamped.is_empty() {
        return;
    }
    for &i in &clamped {
        widths[i] = floor;
    }

    let overflow = packed_width(widths, gap) - container;
    if overflow <= 0 {
        return;
    }

    let ad_width = widths[ad];
    let min_ad_width = metadata.min_ad_width(ad_width).max(1);
    let mut resized = ad_width - overflow;
    if resized < min_ad_width {
        // The ad is out of budget; the floor tiles absorb what is left.
        spread(widths, &clamped, resized - min_ad_width);
        resized = min_ad_width;
    }

    let ad_height = (2 * heights[ad] * resized + ad_width) / (2 * ad_width);
    tracing::debug!(
        "Resized ad from {}px to {}px wide (height {}px) to fit {} floor tiles",
        ad_width,
        resized,
        ad_height,
        clamped.len()
    );
    widths[ad] = resized;
    heights[ad] = ad_height;
    for &i in &clamped {
        heights[i] = ad_height;
    }
}

fn to_px(v: i64) -> u32 {
    v.clamp(1, i64::from(u32::MAX)) as u32
}
