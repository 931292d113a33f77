//! LocalDistribution（直前手の8近傍）

use crate::error::invariant_violation;
use crate::types::Point;

/// 近傍の最大数
pub const MAX_LOCAL: usize = 8;

/// 直前手の近傍だけからなる小さな分布（1回のサンプリング内でのみ使う）
#[derive(Debug, Clone)]
pub struct LocalDistribution {
    points: [Point; MAX_LOCAL],
    weights: [f64; MAX_LOCAL],
    len: usize,
    total: f64,
}

impl Default for LocalDistribution {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalDistribution {
    pub fn new() -> LocalDistribution {
        LocalDistribution {
            points: [Point::PASS; MAX_LOCAL],
            weights: [0.0; MAX_LOCAL],
            len: 0,
            total: 0.0,
        }
    }

    /// 候補を追加する
    pub fn push(&mut self, point: Point, weight: f64) {
        if self.len == MAX_LOCAL {
            invariant_violation(format_args!("more than {MAX_LOCAL} local candidates"));
        }
        self.points[self.len] = point;
        self.weights[self.len] = weight;
        self.len += 1;
        self.total += weight;
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.total
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Point, f64)> + '_ {
        self.points[..self.len]
            .iter()
            .copied()
            .zip(self.weights[..self.len].iter().copied())
    }

    /// 累積重みが `stab` を超える最初の候補
    ///
    /// 重み 0 の候補は選ばない。走査を使い切ったら `None`。
    pub fn pick(&self, mut stab: f64) -> Option<Point> {
        for (point, weight) in self.iter() {
            if weight > 0.0 && stab < weight {
                return Some(point);
            }
            stab -= weight;
        }
        None
    }
}
