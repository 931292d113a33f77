//! 特徴量マッチャの境界

use super::feature::FeatureSet;
use super::spec::{PatternConfig, PatternSpec};
use crate::board::Board;
use crate::types::Move;

/// 候補手にマッチする特徴量を列挙する外部コンポーネント
///
/// 実装は `spec` で無効化された特徴量を出してはならない。
/// 方策オブジェクトはスレッド間で共有されるため `Send + Sync` を要求する。
pub trait FeatureMatcher<B: Board + ?Sized>: Send + Sync {
    /// `mv` にマッチした特徴量を `out` に追加する
    fn match_features(
        &self,
        config: &PatternConfig,
        spec: &PatternSpec,
        board: &B,
        mv: Move,
        out: &mut FeatureSet,
    );
}
