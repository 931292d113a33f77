//! WeightedField（交点ごとの重みと行小計）

use rand::Rng;

use super::PROBDIST_EPSILON;
use crate::error::invariant_violation;
use crate::types::Point;

/// `mute` 直前の行小計
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBackup {
    pub row: usize,
    pub total: f64,
}

/// 盤サイズの重み付き分布
///
/// 平常時（除外〜サンプリング〜復元の区間外）は
/// `total == Σ row_totals == Σ items` が成り立つ。
#[derive(Debug, Clone)]
pub struct WeightedField {
    size: usize,
    items: Vec<f64>,
    row_totals: Vec<f64>,
    total: f64,
}

impl WeightedField {
    /// 全交点の重みが 0 の分布
    pub fn new(size: usize) -> WeightedField {
        WeightedField {
            size,
            items: vec![0.0; size * size],
            row_totals: vec![0.0; size],
            total: 0.0,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// 交点の重み
    ///
    /// `mute` 中の交点も元の値を返す（総和からは外れている）。
    #[inline]
    pub fn get(&self, point: Point) -> f64 {
        self.items[point.index(self.size)]
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.total
    }

    #[inline]
    pub fn row_total(&self, row: usize) -> f64 {
        self.row_totals[row]
    }

    /// 重みを設定し、行小計と総和を差分更新する
    #[inline]
    pub fn set(&mut self, point: Point, weight: f64) {
        debug_assert!(weight.is_finite() && weight >= 0.0, "bad weight {weight}");
        let idx = point.index(self.size);
        let delta = weight - self.items[idx];
        self.items[idx] = weight;
        self.row_totals[point.y()] += delta;
        self.total += delta;
    }

    /// 全交点を 0 に戻す
    pub fn clear(&mut self) {
        self.items.fill(0.0);
        self.row_totals.fill(0.0);
        self.total = 0.0;
    }

    /// 交点を一時的に分布から外す
    ///
    /// 重みそのものは残し、行小計と総和からだけ差し引く。戻り値は差し引く前の
    /// 行小計で、`restore_from_backups` に渡す。除外中の交点は `sample` の
    /// 除外リストで読み飛ばす。外部からは `ExclusionSet` 経由でだけ使う。
    #[inline]
    pub(crate) fn mute(&mut self, point: Point) -> RowBackup {
        let row = point.y();
        let backup = RowBackup {
            row,
            total: self.row_totals[row],
        };
        let weight = self.get(point);
        self.row_totals[row] -= weight;
        self.total -= weight;
        backup
    }

    /// `mute` 前の行小計と総和を書き戻す
    ///
    /// 同じ行を複数回 `mute` した場合は古いバックアップほど正しいので、
    /// 後ろから順に書き戻す。除外中の交点に `set` していないことが前提。
    pub(crate) fn restore_from_backups(&mut self, backups: &[RowBackup], grand_total: f64) {
        for backup in backups.iter().rev() {
            self.row_totals[backup.row] = backup.total;
        }
        self.total = grand_total;
    }

    /// 総和・行小計の和・重みの和の最大のずれ
    pub fn drift(&self) -> f64 {
        let rows: f64 = self.row_totals.iter().sum();
        let items: f64 = self.items.iter().sum();
        let mut worst = (self.total - rows).abs().max((self.total - items).abs());
        for (row, chunk) in self.items.chunks(self.size.max(1)).enumerate() {
            let sum: f64 = chunk.iter().sum();
            worst = worst.max((self.row_totals[row] - sum).abs());
        }
        worst
    }

    /// 重みに比例して交点を1つ選ぶ
    ///
    /// `excluded` は行優先順にソート済みの除外交点で、走査と並行して突き合わせる。
    /// `mute` した交点は重みが残っているので、必ず `excluded` に含めること
    /// （`ExclusionSet::points` がそのまま使える）。
    /// 総和が `PROBDIST_EPSILON` 未満ならパス。
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, excluded: &[Point]) -> Point {
        debug_assert!(excluded.windows(2).all(|w| w[0] < w[1]));
        if self.total < PROBDIST_EPSILON {
            return Point::PASS;
        }

        let mut stab = rng.random::<f64>() * self.total;
        let mut skip = 0;
        let mut fallback = None;

        for row in 0..self.size {
            let row_total = self.row_totals[row];
            if stab >= row_total {
                stab -= row_total;
                continue;
            }

            let row_start = Point::new(0, row);
            while skip < excluded.len() && excluded[skip] < row_start {
                skip += 1;
            }
            let base = row * self.size;
            for x in 0..self.size {
                let point = Point::new(x, row);
                if skip < excluded.len() && excluded[skip] == point {
                    skip += 1;
                    continue;
                }
                let weight = self.items[base + x];
                if weight <= 0.0 {
                    continue;
                }
                if stab < weight {
                    return point;
                }
                stab -= weight;
                fallback = Some(point);
            }

            // 丸め誤差で行を使い切った場合は行内の最後の候補
            if let Some(point) = fallback {
                return point;
            }
            stab = 0.0;
        }

        fallback
            .or_else(|| self.last_candidate(excluded))
            .unwrap_or_else(|| {
                invariant_violation(format_args!(
                    "field total {} but no eligible point",
                    self.total
                ))
            })
    }

    /// 除外されていない、重みが正の最後の交点
    fn last_candidate(&self, excluded: &[Point]) -> Option<Point> {
        (0..self.items.len())
            .rev()
            .map(|i| Point::from_index(i, self.size))
            .find(|p| self.get(*p) > 0.0 && excluded.binary_search(p).is_err())
    }
}
