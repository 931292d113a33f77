//! 交点（Point）と着手（Move）

use smallvec::SmallVec;

use super::Color;

/// 盤の最大サイズ（25路）
pub const MAX_BOARD_SIZE: usize = 25;

/// 座標エンコードの行ストライド（2のべき乗）
const STRIDE_SHIFT: u16 = 5;
const STRIDE_MASK: u16 = (1 << STRIDE_SHIFT) - 1;

/// GTP 列文字（`I` は使わない）
const GTP_COLUMNS: &[u8; MAX_BOARD_SIZE] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// 盤上の交点
///
/// `y * 32 + x` で詰めた値を持つため、整数順序がそのまま行優先の走査順になる。
/// `y = 0` が盤面図の最上段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point(u16);

impl Point {
    /// パス
    pub const PASS: Point = Point(u16::MAX);

    /// 列 `x`・行 `y` の交点
    #[inline]
    pub const fn new(x: usize, y: usize) -> Point {
        debug_assert!(x < MAX_BOARD_SIZE && y < MAX_BOARD_SIZE);
        Point(((y as u16) << STRIDE_SHIFT) | x as u16)
    }

    #[inline]
    pub const fn is_pass(self) -> bool {
        self.0 == Point::PASS.0
    }

    /// 列（0始まり）
    #[inline]
    pub const fn x(self) -> usize {
        (self.0 & STRIDE_MASK) as usize
    }

    /// 行（0始まり）
    #[inline]
    pub const fn y(self) -> usize {
        (self.0 >> STRIDE_SHIFT) as usize
    }

    /// `size` 路盤の密な配列インデックス（`y * size + x`）
    #[inline]
    pub const fn index(self, size: usize) -> usize {
        self.y() * size + self.x()
    }

    /// 密な配列インデックスから復元
    #[inline]
    pub const fn from_index(index: usize, size: usize) -> Point {
        Point::new(index % size, index / size)
    }

    /// 周囲8近傍（盤内のみ、行優先順）
    pub fn neighbors8(self, size: usize) -> SmallVec<[Point; 8]> {
        let mut out = SmallVec::new();
        if self.is_pass() {
            return out;
        }
        let (x, y) = (self.x() as isize, self.y() as isize);
        for dy in -1..=1isize {
            for dx in -1..=1isize {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (nx, ny) = (x + dx, y + dy);
                if nx >= 0 && ny >= 0 && (nx as usize) < size && (ny as usize) < size {
                    out.push(Point::new(nx as usize, ny as usize));
                }
            }
        }
        out
    }

    /// 上下左右の4近傍（盤内のみ）
    pub fn neighbors4(self, size: usize) -> SmallVec<[Point; 4]> {
        let mut out = SmallVec::new();
        if self.is_pass() {
            return out;
        }
        let (x, y) = (self.x(), self.y());
        if y > 0 {
            out.push(Point::new(x, y - 1));
        }
        if x > 0 {
            out.push(Point::new(x - 1, y));
        }
        if x + 1 < size {
            out.push(Point::new(x + 1, y));
        }
        if y + 1 < size {
            out.push(Point::new(x, y + 1));
        }
        out
    }

    /// GTP 形式の文字列（例: `D4`, `pass`）
    pub fn to_gtp(self, size: usize) -> String {
        if self.is_pass() {
            return "pass".to_string();
        }
        let col = GTP_COLUMNS[self.x()] as char;
        format!("{col}{}", size - self.y())
    }

    /// GTP 形式の文字列から変換
    pub fn from_gtp(s: &str, size: usize) -> Option<Point> {
        if s.eq_ignore_ascii_case("pass") {
            return Some(Point::PASS);
        }
        let mut chars = s.chars();
        let col = chars.next()?.to_ascii_uppercase();
        let x = GTP_COLUMNS[..size].iter().position(|&c| c as char == col)?;
        let row: usize = chars.as_str().parse().ok()?;
        if row == 0 || row > size {
            return None;
        }
        Some(Point::new(x, size - row))
    }
}

/// 着手（交点 + 手番）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub point: Point,
    pub color: Color,
}

impl Move {
    #[inline]
    pub const fn new(point: Point, color: Color) -> Move {
        Move { point, color }
    }

    #[inline]
    pub const fn pass(color: Color) -> Move {
        Move {
            point: Point::PASS,
            color,
        }
    }

    #[inline]
    pub const fn is_pass(self) -> bool {
        self.point.is_pass()
    }
}
