//! ELO-gamma プレイアウト方策
//!
//! 候補手の重みを特徴量の gamma の積とし、その分布から1手をサンプリングする。
//! プレイアウト用の "choose" 設定（軽量な特徴量 + 高速ガンマ表）と、
//! 探索木の事前分布用の "assess" 設定（全特徴量 + 基本ガンマ表）を持つ。
//!
//! ```text
//! EloPolicy
//!  ├─ choose: PatternSet ──> MoveSampler ──> RolloutFields / WeightedField
//!  └─ assess: PatternSet ──> PriorEstimator ──> PriorSink
//! ```

mod builder;
mod config;
mod fields;
mod prior;
mod sampler;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use rand::Rng;

pub use builder::DistributionBuilder;
pub use config::{DEFAULT_GAMMA_FILE, DEFAULT_SELFATARI, EloConfig, SPATIAL_DICT_FILE};
pub use fields::RolloutFields;
pub use prior::{MoveStats, PriorEstimator, PriorMap, PriorSink};
pub use sampler::{FieldHook, MoveSampler, RestoreStrategy};

use crate::board::Board;
use crate::error::PlayoutResult;
use crate::pattern::{FeatureMatcher, GammaTable, PatternConfig, PatternSet, PatternSpec, SpatialDict};
use crate::types::{Color, Point};

/// ELO-gamma 方策
///
/// 初期化後は読み取り専用で、複数のプレイアウトスレッドから共有できる。
/// 分布（[`RolloutFields`]）はプレイアウトごとに呼び出し側が持つ。
pub struct EloPolicy<M> {
    config: EloConfig,
    choose: PatternSet,
    assess: PatternSet,
    matcher: M,
}

impl<M> EloPolicy<M> {
    /// オプション文字列から方策を作る
    pub fn new(arg: &str, matcher: M) -> PlayoutResult<EloPolicy<M>> {
        EloPolicy::from_config(EloConfig::parse(arg)?, matcher)
    }

    /// データセットを読み込んで方策を作る
    pub fn from_config(config: EloConfig, matcher: M) -> PlayoutResult<EloPolicy<M>> {
        let spat_dict = Arc::new(SpatialDict::load(&config.spatial_dict_path())?);
        let base = Arc::new(GammaTable::load(&config.gammafile)?);
        let fast = Arc::new(GammaTable::load(&config.fast_gammafile())?);

        let mut assess_spec = PatternSpec::match_all();
        assess_spec.apply_spatial_mode(config.xspat);

        // precisesa は xspat の後に掛けるので、空間パターンのみでも自己アタリは残る
        let mut choose_spec = PatternSpec::match_fast();
        choose_spec.apply_spatial_mode(config.xspat);
        if config.precise_selfatari {
            choose_spec.use_precise_selfatari();
        }

        let assess = PatternSet::new(
            assess_spec,
            PatternConfig::default_config(Arc::clone(&spat_dict)),
            base,
        );
        let choose = PatternSet::new(choose_spec, PatternConfig::fast_config(spat_dict), fast);

        log::debug!(
            "elo policy: {:?}, {} assess gammas, {} choose gammas",
            config,
            assess.gammas.len(),
            choose.gammas.len()
        );
        Ok(EloPolicy::from_parts(config, choose, assess, matcher))
    }

    /// 組み立て済みのパターン設定から方策を作る（データセットを読まない）
    pub fn from_parts(
        config: EloConfig,
        choose: PatternSet,
        assess: PatternSet,
        matcher: M,
    ) -> EloPolicy<M> {
        EloPolicy {
            config,
            choose,
            assess,
            matcher,
        }
    }

    #[inline]
    pub fn config(&self) -> &EloConfig {
        &self.config
    }

    /// 自己アタリの重み（保持するだけで採点には使わない）
    #[inline]
    pub fn selfatari(&self) -> f64 {
        self.config.selfatari
    }

    #[inline]
    pub fn choose_set(&self) -> &PatternSet {
        &self.choose
    }

    #[inline]
    pub fn assess_set(&self) -> &PatternSet {
        &self.assess
    }

    #[inline]
    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    /// "choose" 設定の分布構築器（盤面側の差分更新用）
    pub fn builder(&self) -> DistributionBuilder<'_, M> {
        DistributionBuilder::new(&self.choose, &self.matcher)
    }

    /// "choose" 設定のサンプラー
    pub fn sampler<B>(&self) -> MoveSampler<'_, B, M>
    where
        B: Board + ?Sized,
        M: FeatureMatcher<B>,
    {
        MoveSampler::new(&self.choose, &self.matcher)
    }

    /// 分布調整フック付きの "choose" 設定のサンプラー
    pub fn sampler_with_hook<'a, B>(
        &'a self,
        hook: &'a dyn FieldHook<B>,
    ) -> MoveSampler<'a, B, M>
    where
        B: Board + ?Sized,
        M: FeatureMatcher<B>,
    {
        self.sampler().with_hook(hook)
    }

    /// "assess" 設定の事前分布推定器
    pub fn estimator(&self) -> PriorEstimator<'_, M> {
        PriorEstimator::new(&self.assess, &self.matcher)
    }

    /// フックなしで1手を選ぶ
    pub fn choose<B, R>(
        &self,
        board: &B,
        color: Color,
        fields: &mut RolloutFields,
        rng: &mut R,
    ) -> PlayoutResult<Point>
    where
        B: Board + ?Sized,
        M: FeatureMatcher<B>,
        R: Rng + ?Sized,
    {
        self.sampler().choose(board, color, fields, rng)
    }

    /// 事前分布を `sink` に渡す
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
        self.estimator().assess(board, color, sink, games)
    }

    /// 方策を破棄する
    ///
    /// ガンマ表と空間パターン辞書は最後の参照が落ちた時点で解放される。
    pub fn shutdown(self) {
        log::debug!(
            "elo policy shutdown (gamma table refs: choose {}, assess {})",
            Arc::strong_count(&self.choose.gammas),
            Arc::strong_count(&self.assess.gammas)
        );
    }
}
