//! 基本型

mod color;
mod point;

pub use color::Color;
pub use point::{MAX_BOARD_SIZE, Move, Point};
