//! ExclusionSet（一時的に分布から外した交点）

use super::field::{RowBackup, WeightedField};
use crate::error::invariant_violation;
use crate::types::Point;

/// 除外できる交点の最大数
///
/// コウの1点 + 直前手の8近傍 + 余裕1。
pub const MAX_EXCLUSIONS: usize = 10;

/// 除外交点（座標順）と、除外順に並んだ行小計のバックアップ
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    points: [Point; MAX_EXCLUSIONS],
    backups: [RowBackup; MAX_EXCLUSIONS],
    len: usize,
    total: f64,
}

impl ExclusionSet {
    /// 現在の総和を復元値として記録して開始する
    pub fn new(field: &WeightedField) -> ExclusionSet {
        ExclusionSet {
            points: [Point::PASS; MAX_EXCLUSIONS],
            backups: [RowBackup { row: 0, total: 0.0 }; MAX_EXCLUSIONS],
            len: 0,
            total: field.total(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 除外交点（座標の昇順）
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points[..self.len]
    }

    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        self.points().binary_search(&point).is_ok()
    }

    /// 開始時点の総和
    #[inline]
    pub fn grand_total(&self) -> f64 {
        self.total
    }

    /// 交点を分布から外す
    ///
    /// パスと既に除外済みの交点は何もせず `false` を返す。
    pub fn exclude(&mut self, field: &mut WeightedField, point: Point) -> bool {
        if point.is_pass() || self.contains(point) {
            return false;
        }
        if self.len == MAX_EXCLUSIONS {
            invariant_violation(format_args!("more than {MAX_EXCLUSIONS} excluded points"));
        }
        self.backups[self.len] = field.mute(point);
        self.insert_sorted(point);
        true
    }

    /// 座標順を保って挿入する
    fn insert_sorted(&mut self, point: Point) {
        let pos = self.points().partition_point(|&p| p < point);
        self.points.copy_within(pos..self.len, pos + 1);
        self.points[pos] = point;
        self.len += 1;
    }

    /// 除外前の行小計と総和に戻す（O(除外数)）
    pub fn restore(&self, field: &mut WeightedField) {
        field.restore_from_backups(&self.backups[..self.len], self.total);
    }
}
