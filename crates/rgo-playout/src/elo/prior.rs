//! PriorEstimator（探索木ノードへの事前分布）

use super::builder::DistributionBuilder;
use crate::board::Board;
use crate::error::PlayoutResult;
use crate::pattern::{FeatureMatcher, PatternSet};
use crate::probdist::PROBDIST_EPSILON;
use crate::types::{Color, Point};

/// 着手の統計（勝率とその重み）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveStats {
    pub playouts: u32,
    pub value: f64,
}

impl MoveStats {
    /// `playouts` 回分の重みで `result` を加重平均に加える
    pub fn add_result(&mut self, result: f64, playouts: u32) {
        if playouts == 0 {
            return;
        }
        let total = self.playouts + playouts;
        self.value += (result - self.value) * f64::from(playouts) / f64::from(total);
        self.playouts = total;
    }
}

/// 事前分布の受け手（探索木ノード側）
pub trait PriorSink {
    /// この交点の事前分布を受け取るか
    fn considers(&self, point: Point) -> bool;

    /// `value` を `playouts` 回分の仮想対局として加える
    fn add_prior(&mut self, point: Point, value: f64, playouts: u32);
}

/// 交点ごとの事前分布
#[derive(Debug, Clone)]
pub struct PriorMap {
    size: usize,
    to_play: Color,
    consider: Vec<bool>,
    priors: Vec<MoveStats>,
}

impl PriorMap {
    pub fn new(size: usize, to_play: Color) -> PriorMap {
        let n = size * size;
        PriorMap {
            size,
            to_play,
            consider: vec![false; n],
            priors: vec![MoveStats::default(); n],
        }
    }

    #[inline]
    pub fn to_play(&self) -> Color {
        self.to_play
    }

    pub fn consider(&mut self, point: Point) {
        if !point.is_pass() {
            self.consider[point.index(self.size)] = true;
        }
    }

    /// 空点をすべて対象にする
    pub fn consider_free_points<B: Board + ?Sized>(&mut self, board: &B) {
        for &point in board.free_points() {
            self.consider(point);
        }
    }

    pub fn prior(&self, point: Point) -> MoveStats {
        if point.is_pass() {
            return MoveStats::default();
        }
        self.priors[point.index(self.size)]
    }

    /// 事前分布が付いた交点
    pub fn iter(&self) -> impl Iterator<Item = (Point, MoveStats)> + '_ {
        self.priors
            .iter()
            .enumerate()
            .filter(|(_, stats)| stats.playouts > 0)
            .map(|(i, stats)| (Point::from_index(i, self.size), *stats))
    }
}

impl PriorSink for PriorMap {
    fn considers(&self, point: Point) -> bool {
        !point.is_pass() && self.consider[point.index(self.size)]
    }

    fn add_prior(&mut self, point: Point, value: f64, playouts: u32) {
        self.priors[point.index(self.size)].add_result(value, playouts);
    }
}

/// "assess" 設定の分布を正規化して事前分布にする
///
/// サンプラーの分布には触れない（読み取り専用）。
pub struct PriorEstimator<'a, M> {
    builder: DistributionBuilder<'a, M>,
}

impl<'a, M> PriorEstimator<'a, M> {
    pub fn new(set: &'a PatternSet, matcher: &'a M) -> Self {
        PriorEstimator {
            builder: DistributionBuilder::new(set, matcher),
        }
    }

    /// 対象交点に `weight / total` を `games` 回分の仮想対局として渡す
    ///
    /// 戻り値は渡した交点の数。合法手がなければ何も渡さない。
    pub fn assess<B, S>(
        &self,
        board: &B,
        color: Color,
        sink: &mut S,
        games: u32,
    ) -> PlayoutResult<usize>
    where
        B: Board + ?Sized,
        M: FeatureMatcher<B>,
        S: PriorSink + ?Sized,
    {
        let (field, moves) = self.builder.build(board, color)?;
        let total = field.total();
        if total < PROBDIST_EPSILON {
            log::trace!("assess: no weighted moves ({moves} valid), skipping priors");
            return Ok(0);
        }

        let mut forwarded = 0;
        for &point in board.free_points() {
            if !sink.considers(point) {
                continue;
            }
            sink.add_prior(point, field.get(point) / total, games);
            forwarded += 1;
        }
        Ok(forwarded)
    }
}
