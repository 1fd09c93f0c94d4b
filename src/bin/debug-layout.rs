/// Diagnostic tool: lay out a tile list given on the command line and dump the rows.
///
/// Usage: debug-layout <container-width> <gap> [--min-item-width N] [--ad-max-resize PCT] <kind:WxH>...
/// where kind is one of gif, clip, sticker, ad.
use anyhow::{bail, Context};
use masonry_rows::layout::MasonryLayout;
use masonry_rows::tile::{LayoutMetadata, Tile};

fn parse_tile(index: usize, spec: &str) -> anyhow::Result<Tile> {
    let (kind, size) = spec
        .split_once(':')
        .with_context(|| format!("tile '{}' is not kind:WxH", spec))?;
    let (w, h) = size
        .split_once('x')
        .with_context(|| format!("tile '{}' has no WxH size", spec))?;
    let w: u32 = w.parse().with_context(|| format!("bad width in '{}'", spec))?;
    let h: u32 = h.parse().with_context(|| format!("bad height in '{}'", spec))?;
    let id = index.to_string();
    Ok(match kind {
        "gif" => Tile::gif(&id, w, h),
        "clip" => Tile::clip(&id, w, h),
        "sticker" => Tile::sticker(&id, w, h),
        "ad" => Tile::ad(&id, w, h),
        other => bail!("unknown tile kind '{}'", other),
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("masonry_rows=debug".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let width: u32 = args
        .next()
        .context("missing container width")?
        .parse()
        .context("container width must be an integer")?;
    let gap: u32 = args
        .next()
        .context("missing gap")?
        .parse()
        .context("gap must be an integer")?;

    let mut min_item_width = 50;
    let mut ad_max_resize = 20.0;
    let mut tiles = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--min-item-width" => {
                min_item_width = args.next().context("missing value")?.parse()?;
            }
            "--ad-max-resize" => {
                ad_max_resize = args.next().context("missing value")?.parse()?;
            }
            spec => tiles.push(parse_tile(tiles.len(), spec)?),
        }
    }
    if tiles.is_empty() {
        bail!("no tiles given");
    }

    let metadata = LayoutMetadata::new(min_item_width, ad_max_resize);
    println!("=== Masonry layout: {} tiles in {}px (gap {}) ===", tiles.len(), width, gap);

    let mut layout = MasonryLayout::new();
    let rows = layout.update(&tiles, width, gap, &metadata);

    for (i, row) in rows.iter().enumerate() {
        println!(
            "[row {}] height={} width={} tiles={}{}",
            i,
            row.height,
            row.width(gap),
            row.len(),
            if row.has_ad() { " (ad)" } else { "" }
        );
        for t in &row.tiles {
            println!(
                "    #{} {:?} {}x{} -> {}x{} at ({}, {})",
                t.tile.id,
                t.tile.kind,
                t.tile.natural_width,
                t.tile.natural_height,
                t.width,
                t.height,
                t.x,
                t.y
            );
        }
    }

    let placed = layout.tiles().count();
    let valid = tiles.iter().filter(|t| t.validate().is_ok()).count();
    println!("\nPlaced {} of {} valid tiles, content height {}px", placed, valid, layout.content_height());
    if placed != valid {
        bail!("conservation check failed: {} placed, {} expected", placed, valid);
    }

    Ok(())
}
