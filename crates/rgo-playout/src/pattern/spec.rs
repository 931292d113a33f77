//! マッチ対象の特徴量指定（PatternSpec）とマッチャ設定（PatternConfig）

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::feature::{Feature, FeatureKind, SELFATARI_SMART, SELFATARI_STUPID};
use super::spatial::SpatialDict;

/// 空間パターン特徴量の扱い（`xspat` オプション）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpatialMode {
    /// 指定なし
    #[default]
    Default,
    /// 空間パターンを使わない（`xspat=0`）
    Excluded,
    /// 空間パターンのみを使う（`xspat=1`）
    Only,
}

/// 種別ごとのペイロードマスク
///
/// マスク 0 の種別はマッチしない。自己アタリのようにペイロードが判定方式の
/// フラグ番号である種別は、対応ビットが立っているものだけがマッチする。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternSpec {
    masks: [u32; FeatureKind::NUM],
}

impl PatternSpec {
    /// 何もマッチしない
    pub const fn none() -> PatternSpec {
        PatternSpec {
            masks: [0; FeatureKind::NUM],
        }
    }

    /// 全ての特徴量（事前確率の評価用）
    pub const fn match_all() -> PatternSpec {
        PatternSpec {
            masks: [!0; FeatureKind::NUM],
        }
    }

    /// プレイアウト用の軽量な特徴量セット
    ///
    /// 取り・アタリ逃げ・アタリ・安価な自己アタリ判定・空間パターンのみ。
    pub const fn match_fast() -> PatternSpec {
        let mut masks = [0; FeatureKind::NUM];
        masks[FeatureKind::Capture.index()] = !0;
        masks[FeatureKind::AtariEscape.index()] = !0;
        masks[FeatureKind::SelfAtari.index()] = 1 << SELFATARI_STUPID;
        masks[FeatureKind::Atari.index()] = !0;
        masks[FeatureKind::Spatial.index()] = !0;
        PatternSpec { masks }
    }

    #[inline]
    pub fn mask(&self, kind: FeatureKind) -> u32 {
        self.masks[kind.index()]
    }

    #[inline]
    pub fn set_mask(&mut self, kind: FeatureKind, mask: u32) {
        self.masks[kind.index()] = mask;
    }

    /// 種別が有効か
    #[inline]
    pub fn enabled(&self, kind: FeatureKind) -> bool {
        self.mask(kind) != 0
    }

    /// 特徴量がこの指定でマッチ対象か
    pub fn allows(&self, feature: &Feature) -> bool {
        let mask = self.mask(feature.kind);
        match feature.kind {
            FeatureKind::SelfAtari => feature.payload < 32 && mask & (1 << feature.payload) != 0,
            _ => mask != 0,
        }
    }

    /// 自己アタリを精密判定に切り替える（安価な判定を外す）
    pub fn use_precise_selfatari(&mut self) {
        self.set_mask(FeatureKind::SelfAtari, !(1 << SELFATARI_STUPID));
        debug_assert!(self.mask(FeatureKind::SelfAtari) & (1 << SELFATARI_SMART) != 0);
    }

    /// `xspat` の指定を反映する
    pub fn apply_spatial_mode(&mut self, mode: SpatialMode) {
        for kind in FeatureKind::ALL {
            let drop = match mode {
                SpatialMode::Default => false,
                SpatialMode::Excluded => kind == FeatureKind::Spatial,
                SpatialMode::Only => kind != FeatureKind::Spatial,
            };
            if drop {
                self.set_mask(kind, 0);
            }
        }
    }
}

/// マッチャのパラメータ
///
/// 空間パターン辞書は "choose" と "assess" の両設定で共有する。
#[derive(Debug, Clone)]
pub struct PatternConfig {
    /// 空間パターンの最小半径
    pub spat_min: u32,
    /// 空間パターンの最大半径
    pub spat_max: u32,
    /// 盤端距離特徴量を出す最大距離（`None` で無効）
    pub bdist_max: Option<u32>,
    /// 直前手距離の下限
    pub ldist_min: u32,
    /// 直前手距離の上限
    pub ldist_max: u32,
    /// 所有率推定のシミュレーション数（0 で無効）
    pub mcsims: u32,
    /// 空間パターン辞書
    pub spat_dict: Arc<SpatialDict>,
}

impl PatternConfig {
    /// 空間パターン半径の上限
    pub const MAX_PATTERN_DIST: u32 = 7;

    /// 事前確率評価用の設定
    pub fn default_config(spat_dict: Arc<SpatialDict>) -> PatternConfig {
        PatternConfig {
            spat_min: 3,
            spat_max: Self::MAX_PATTERN_DIST,
            bdist_max: Some(4),
            ldist_min: 0,
            ldist_max: 256,
            mcsims: 0,
            spat_dict,
        }
    }

    /// プレイアウト用の軽量設定（小さい空間パターンのみ、盤端距離なし）
    pub fn fast_config(spat_dict: Arc<SpatialDict>) -> PatternConfig {
        PatternConfig {
            spat_min: 3,
            spat_max: 3,
            bdist_max: None,
            ldist_min: 0,
            ldist_max: 256,
            mcsims: 0,
            spat_dict,
        }
    }
}
