//! MoveSampler（1手の選択）
//!
//! 処理の流れ:
//! 1. 手番の分布を用意する（キャッシュがなければ構築）
//! 2. 外部フックがあれば分布を書き換えさせる
//! 3. コウの禁止点を除外する
//! 4. 直前手の8近傍を除外し、隣接ボーナスを掛けた局所分布に移す
//! 5. 局所分布 + 盤全体の分布からサンプリングする
//! 6. 分布を元に戻す
//!
//! ## 復元の非対称性
//!
//! フックなしなら行小計のバックアップを書き戻すだけで O(除外数)。
//! フックは任意の交点を書き換えうるのでバックアップからは戻せず、
//! 全交点を再計算する（O(盤面)）。フックはこの代償を払う前提で使う。

use rand::Rng;

use super::builder::DistributionBuilder;
use super::fields::RolloutFields;
use crate::board::Board;
use crate::error::{PlayoutResult, invariant_violation};
use crate::pattern::{FeatureMatcher, PatternSet};
use crate::probdist::{ExclusionSet, LocalDistribution, PROBDIST_EPSILON, WeightedField};
use crate::types::{Color, Point};

/// サンプリング直前に分布を書き換える外部フック
///
/// 呼び出し元のスレッドで `choose` のたびに同期的に呼ばれるので、
/// 短時間で終わらなければならない。
pub trait FieldHook<B: ?Sized>: Send + Sync {
    fn adjust(&self, board: &B, color: Color, field: &mut WeightedField);
}

impl<B, F> FieldHook<B> for F
where
    B: ?Sized,
    F: Fn(&B, Color, &mut WeightedField) + Send + Sync,
{
    fn adjust(&self, board: &B, color: Color, field: &mut WeightedField) {
        self(board, color, field)
    }
}

/// サンプリング後の分布の戻し方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreStrategy {
    /// 行小計のバックアップを書き戻す（O(除外数)）
    Backups,
    /// 盤面から作り直す（O(盤面)、フックが動いた場合）
    Rebuild,
}

impl RestoreStrategy {
    #[inline]
    pub fn for_hook(hook_active: bool) -> RestoreStrategy {
        if hook_active {
            RestoreStrategy::Rebuild
        } else {
            RestoreStrategy::Backups
        }
    }
}

/// プレイアウトの1手を選ぶ
pub struct MoveSampler<'a, B: ?Sized, M> {
    builder: DistributionBuilder<'a, M>,
    hook: Option<&'a dyn FieldHook<B>>,
    contiguity_bonus: f64,
}

impl<'a, B, M> MoveSampler<'a, B, M>
where
    B: Board + ?Sized,
    M: FeatureMatcher<B>,
{
    /// 隣接ボーナスはガンマ表の `cont:1`（なければ 1.0）
    pub fn new(set: &'a PatternSet, matcher: &'a M) -> Self {
        MoveSampler {
            builder: DistributionBuilder::new(set, matcher),
            hook: None,
            contiguity_bonus: set.gammas.contiguity_bonus(),
        }
    }

    /// 分布調整フックを登録する（1つだけ）
    pub fn with_hook(mut self, hook: &'a dyn FieldHook<B>) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn with_contiguity_bonus(mut self, bonus: f64) -> Self {
        debug_assert!(bonus.is_finite() && bonus >= 0.0);
        self.contiguity_bonus = bonus;
        self
    }

    #[inline]
    pub fn contiguity_bonus(&self) -> f64 {
        self.contiguity_bonus
    }

    #[inline]
    pub fn builder(&self) -> &DistributionBuilder<'a, M> {
        &self.builder
    }

    /// `color` の着手を1つ選ぶ（候補がなければパス）
    pub fn choose<R: Rng + ?Sized>(
        &self,
        board: &B,
        color: Color,
        fields: &mut RolloutFields,
        rng: &mut R,
    ) -> PlayoutResult<Point> {
        let field = fields.prepare(&self.builder, board, color)?;

        #[cfg(feature = "diagnostics")]
        self.verify_field(board, color, field)?;

        let baseline = field.total();
        let hook_active = match self.hook {
            Some(hook) => {
                hook.adjust(board, color, field);
                true
            }
            None => false,
        };
        let strategy = RestoreStrategy::for_hook(hook_active);

        let mut exclusions = ExclusionSet::new(field);
        let mut local = LocalDistribution::new();

        if let Some(ko) = board.ko().filter(|ko| ko.color == color) {
            exclusions.exclude(field, ko.point);
        }
        if let Some(last) = board.last_move() {
            for neighbor in last.point.neighbors8(board.size()) {
                // コウの点は局所分布にも入れない
                if exclusions.exclude(field, neighbor) {
                    local.push(neighbor, field.get(neighbor) * self.contiguity_bonus);
                }
            }
        }

        let picked = pick(field, &exclusions, &local, rng);
        self.restore(strategy, board, color, field, &exclusions, baseline)?;
        Ok(picked)
    }

    fn restore(
        &self,
        strategy: RestoreStrategy,
        board: &B,
        color: Color,
        field: &mut WeightedField,
        exclusions: &ExclusionSet,
        baseline: f64,
    ) -> PlayoutResult<()> {
        match strategy {
            RestoreStrategy::Backups => exclusions.restore(field),
            RestoreStrategy::Rebuild => {
                self.builder.build_into(board, color, field)?;
                let tolerance = PROBDIST_EPSILON * baseline.abs().max(1.0);
                if (field.total() - baseline).abs() > tolerance {
                    invariant_violation(format_args!(
                        "rebuilt total {} differs from pre-hook total {baseline}",
                        field.total()
                    ));
                }
            }
        }
        Ok(())
    }

    /// 差分管理された分布を全再計算と照合する
    #[cfg(feature = "diagnostics")]
    fn verify_field(&self, board: &B, color: Color, field: &WeightedField) -> PlayoutResult<()> {
        for &point in board.free_points() {
            let expected = self.builder.point_weight(board, color, point)?;
            if (field.get(point) - expected).abs() >= PROBDIST_EPSILON {
                invariant_violation(format_args!(
                    "{} weight {} but recomputed {expected}",
                    point.to_gtp(board.size()),
                    field.get(point)
                ));
            }
        }
        Ok(())
    }
}

/// 局所分布と盤全体の分布をまとめて1回引く
fn pick<R: Rng + ?Sized>(
    field: &WeightedField,
    exclusions: &ExclusionSet,
    local: &LocalDistribution,
    rng: &mut R,
) -> Point {
    let local_total = local.total();
    let field_total = field.total();
    let stab = rng.random::<f64>() * (local_total + field_total);

    if stab < local_total - PROBDIST_EPSILON {
        local.pick(stab).unwrap_or_else(|| {
            invariant_violation(format_args!("local overstab {stab} of {local_total}"))
        })
    } else if field_total >= PROBDIST_EPSILON {
        field.sample(rng, exclusions.points())
    } else {
        log::trace!("no playout candidates (local {local_total}, field {field_total}), passing");
        Point::PASS
    }
}
