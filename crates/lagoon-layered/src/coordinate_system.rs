//! Direction handling.
//!
//! The pipeline always lays out top-to-bottom. For left-to-right and right-to-left layouts node
//! extents are swapped before positioning and the axes are swapped back afterwards.

use crate::RankDir;
use lagoon_graph::Vec2;

/// Swaps width and height for horizontal directions.
pub fn adjust(direction: RankDir, sizes: &mut [(f64, f64)]) {
    if direction.is_horizontal() {
        for (w, h) in sizes.iter_mut() {
            std::mem::swap(w, h);
        }
    }
}

/// Maps a top-to-bottom position into `direction`.
pub fn undo(direction: RankDir, p: Vec2) -> Vec2 {
    match direction {
        RankDir::TB => p,
        RankDir::BT => Vec2::new(p.x, -p.y),
        RankDir::LR => Vec2::new(p.y, p.x),
        RankDir::RL => Vec2::new(-p.y, p.x),
    }
}
