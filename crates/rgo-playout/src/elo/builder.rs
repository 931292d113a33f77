//! DistributionBuilder（盤面 → 重み付き分布）
//!
//! 候補手の重みはマッチした特徴量の gamma の積（Coulom 2007 の「チーム」強さ）。

use crate::board::Board;
use crate::error::PlayoutResult;
use crate::pattern::{FeatureMatcher, FeatureSet, PatternSet};
use crate::probdist::WeightedField;
use crate::types::{Color, Move, Point};

/// 1つの特徴量設定で分布を構築する
pub struct DistributionBuilder<'a, M> {
    set: &'a PatternSet,
    matcher: &'a M,
}

impl<'a, M> DistributionBuilder<'a, M> {
    pub fn new(set: &'a PatternSet, matcher: &'a M) -> Self {
        DistributionBuilder { set, matcher }
    }

    pub fn pattern_set(&self) -> &'a PatternSet {
        self.set
    }

    /// 1交点の重み
    ///
    /// パス・不合法手・自分の一目の眼は 0。
    /// 自分の眼を潰さない判定は、稀に一眼の中手形で最善手を落とすことがある
    /// （ブルファイブの 1-1 など）。速度との引き換えで許容している。
    pub fn point_weight<B>(&self, board: &B, color: Color, point: Point) -> PlayoutResult<f64>
    where
        B: Board + ?Sized,
        M: FeatureMatcher<B>,
    {
        if point.is_pass() {
            return Ok(0.0);
        }
        let mv = Move::new(point, color);
        if !board.is_valid_move(mv) || board.is_one_point_eye(point, color) {
            return Ok(0.0);
        }

        let mut features = FeatureSet::new();
        self.matcher
            .match_features(&self.set.config, &self.set.spec, board, mv, &mut features);

        let mut weight = 1.0;
        for feature in &features {
            weight *= self.set.gammas.gamma(feature)?;
        }
        Ok(weight)
    }

    /// 新しい分布を構築する
    ///
    /// 戻り値の手数は重みを計算した合法手の数（診断用）。
    pub fn build<B>(&self, board: &B, color: Color) -> PlayoutResult<(WeightedField, usize)>
    where
        B: Board + ?Sized,
        M: FeatureMatcher<B>,
    {
        let mut field = WeightedField::new(board.size());
        let moves = self.build_into(board, color, &mut field)?;
        Ok((field, moves))
    }

    /// 既存の分布を作り直す
    pub fn build_into<B>(
        &self,
        board: &B,
        color: Color,
        field: &mut WeightedField,
    ) -> PlayoutResult<usize>
    where
        B: Board + ?Sized,
        M: FeatureMatcher<B>,
    {
        debug_assert_eq!(field.size(), board.size());
        field.clear();
        let mut moves = 0;
        for &point in board.free_points() {
            let weight = self.point_weight(board, color, point)?;
            if weight > 0.0 {
                moves += 1;
            }
            field.set(point, weight);
        }
        Ok(moves)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::board::{AnnotationMatcher, GridBoard};
    use crate::error::PlayoutError;
    use crate::pattern::{
        Feature, FeatureKind, GammaTable, PatternConfig, PatternSpec, SpatialDict,
    };

    fn pattern_set(gammas: GammaTable) -> PatternSet {
        PatternSet::new(
            PatternSpec::match_fast(),
            PatternConfig::fast_config(Arc::new(SpatialDict::empty())),
            Arc::new(gammas),
        )
    }

    #[test]
    fn test_filters_illegal_eyes_and_ko() {
        let mut board = GridBoard::from_diagram(
            ".X...\n\
             X....\n\
             ..O..\n\
             .....\n\
             .....\n",
        )
        .unwrap();
        board.forbid(Point::new(4, 4));
        board.set_ko(Some(Move::new(Point::new(3, 3), Color::Black)));

        let set = pattern_set(GammaTable::new());
        let builder = DistributionBuilder::new(&set, &AnnotationMatcher);
        let (field, moves) = builder.build(&board, Color::Black).unwrap();

        // 25 - 石3 - 眼1 - 禁止1 - コウ1
        assert_eq!(moves, 19);
        assert_eq!(field.total(), 19.0);
        assert_eq!(field.get(Point::new(0, 0)), 0.0);
        assert_eq!(field.get(Point::new(4, 4)), 0.0);
        assert_eq!(field.get(Point::new(3, 3)), 0.0);
        assert_eq!(field.get(Point::new(1, 1)), 1.0);

        // 白から見れば (0,0) は眼ではなく、コウも白には掛からない
        let (_, white_moves) = builder.build(&board, Color::White).unwrap();
        assert_eq!(white_moves, 21);
    }

    #[test]
    fn test_weight_is_product_of_gammas() {
        let mut board = GridBoard::new(5);
        let p = Point::new(2, 2);
        board.annotate(p, Feature::new(FeatureKind::Capture, 1));
        board.annotate(p, Feature::new(FeatureKind::Atari, 0));
        // match_fast では無効なので gamma が無くても問題にならない
        board.annotate(p, Feature::new(FeatureKind::Border, 2));

        let gammas: GammaTable = [
            (Feature::new(FeatureKind::Capture, 1), 4.0),
            (Feature::new(FeatureKind::Atari, 0), 0.5),
        ]
        .into_iter()
        .collect();
        let set = pattern_set(gammas);
        let builder = DistributionBuilder::new(&set, &AnnotationMatcher);

        assert_eq!(builder.point_weight(&board, Color::Black, p).unwrap(), 2.0);
        let (field, _) = builder.build(&board, Color::Black).unwrap();
        assert_eq!(field.total(), 24.0 + 2.0);
        assert!(field.drift() < 1e-12);
    }

    #[test]
    fn test_missing_gamma_is_configuration_error() {
        let mut board = GridBoard::new(5);
        let feature = Feature::new(FeatureKind::Capture, 3);
        board.annotate(Point::new(1, 1), feature);

        let set = pattern_set(GammaTable::new());
        let builder = DistributionBuilder::new(&set, &AnnotationMatcher);
        match builder.build(&board, Color::White) {
            Err(PlayoutError::MissingGamma(f)) => assert_eq!(f, feature),
            other => panic!("expected MissingGamma, got {:?}", other.map(|(_, n)| n)),
        }
    }

    #[test]
    fn test_pass_has_no_weight() {
        let board = GridBoard::new(3);
        let set = pattern_set(GammaTable::new());
        let builder = DistributionBuilder::new(&set, &AnnotationMatcher);
        assert_eq!(builder.point_weight(&board, Color::Black, Point::PASS).unwrap(), 0.0);
    }
}
