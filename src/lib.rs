// Masonry row layout for media grids
// Packs GIF/clip/sticker/ad tiles into full-width rows and keeps earlier rows stable across pagination

pub mod layout;
pub mod tile;
