//! elo モジュールのテスト（統計的な性質は固定シードで検証する）

mod policy;
mod prior;

use std::sync::Arc;

use crate::pattern::{Feature, FeatureKind, GammaTable, PatternConfig, PatternSet, PatternSpec, SpatialDict};

/// 取りの特徴量（注釈で重みを付けるのに使う）
pub(super) const CAPTURE: Feature = Feature::new(FeatureKind::Capture, 0);

/// 注釈なしなら全交点の重みが 1.0 になる設定
pub(super) fn pattern_set(gammas: &[(Feature, f64)]) -> PatternSet {
    PatternSet::new(
        PatternSpec::match_fast(),
        PatternConfig::fast_config(Arc::new(SpatialDict::empty())),
        Arc::new(gammas.iter().copied().collect::<GammaTable>()),
    )
}

/// 適合度のカイ二乗統計量
pub(super) fn chi_square(observed: &[u32], expected: &[f64]) -> f64 {
    observed
        .iter()
        .zip(expected)
        .map(|(&o, &e)| {
            let d = f64::from(o) - e;
            d * d / e
        })
        .sum()
}
