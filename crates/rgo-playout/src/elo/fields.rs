//! RolloutFields（プレイアウト中に使い回す手番ごとの分布）

use super::builder::DistributionBuilder;
use crate::board::Board;
use crate::error::PlayoutResult;
use crate::pattern::FeatureMatcher;
use crate::probdist::WeightedField;
use crate::types::{Color, Point};

/// 手番ごとの分布キャッシュ
///
/// 1つのプレイアウト（盤面スナップショット）に専有される。石が置かれたら盤面側が
/// `update_point` で影響のある交点を再計算するか、`invalidate` で捨てる。
#[derive(Debug, Clone, Default)]
pub struct RolloutFields {
    fields: [Option<WeightedField>; Color::NUM],
}

impl RolloutFields {
    pub fn new() -> RolloutFields {
        RolloutFields::default()
    }

    /// 手番の分布（未構築なら `None`）
    pub fn get(&self, color: Color) -> Option<&WeightedField> {
        self.fields[color.index()].as_ref()
    }

    /// 両手番の分布を捨てる
    pub fn invalidate(&mut self) {
        self.fields = Default::default();
    }

    /// 手番の分布を返す。未構築・盤サイズ違いなら構築する
    pub fn prepare<B, M>(
        &mut self,
        builder: &DistributionBuilder<'_, M>,
        board: &B,
        color: Color,
    ) -> PlayoutResult<&mut WeightedField>
    where
        B: Board + ?Sized,
        M: FeatureMatcher<B>,
    {
        let slot = &mut self.fields[color.index()];
        let field = match slot.take() {
            Some(field) if field.size() == board.size() => field,
            _ => builder.build(board, color)?.0,
        };
        Ok(slot.insert(field))
    }

    /// 構築済みの分布について1交点の重みを再計算する
    pub fn update_point<B, M>(
        &mut self,
        builder: &DistributionBuilder<'_, M>,
        board: &B,
        point: Point,
    ) -> PlayoutResult<()>
    where
        B: Board + ?Sized,
        M: FeatureMatcher<B>,
    {
        for color in [Color::Black, Color::White] {
            if let Some(field) = self.fields[color.index()].as_mut() {
                field.set(point, builder.point_weight(board, color, point)?);
            }
        }
        Ok(())
    }
}
