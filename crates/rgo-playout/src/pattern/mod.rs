//! 特徴量とパターン関連のデータセット
//!
//! - `Feature` / `FeatureKind`: 候補手の特徴量
//! - `PatternSpec` / `PatternConfig`: マッチ対象とマッチャ設定
//! - `GammaTable`: 特徴量 → gamma
//! - `SpatialDict`: 空間パターン辞書
//! - `FeatureMatcher`: 外部マッチャの境界
//! - `PatternSet`: 上記を束ねた "choose" / "assess" 用の組

mod feature;
mod gamma;
mod matcher;
mod spatial;
mod spec;

use std::sync::Arc;

pub use feature::{Feature, FeatureKind, FeatureSet, SELFATARI_SMART, SELFATARI_STUPID};
pub use gamma::GammaTable;
pub use matcher::FeatureMatcher;
pub use spatial::{SpatialDict, SpatialPattern};
pub use spec::{PatternConfig, PatternSpec, SpatialMode};

/// マッチ対象・マッチャ設定・ガンマ表の組
#[derive(Debug, Clone)]
pub struct PatternSet {
    pub spec: PatternSpec,
    pub config: PatternConfig,
    pub gammas: Arc<GammaTable>,
}

impl PatternSet {
    pub fn new(spec: PatternSpec, config: PatternConfig, gammas: Arc<GammaTable>) -> PatternSet {
        PatternSet {
            spec,
            config,
            gammas,
        }
    }
}
