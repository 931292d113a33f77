//! 特徴量（Feature）
//!
//! 候補手の性質（空間パターン、自己アタリ、取り など）を種別とペイロードの組で表す。
//! 一つの交点に複数の特徴量が同時に立ちうる。

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

/// 特徴量の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum FeatureKind {
    /// パス
    Pass = 0,
    /// 相手の石を取る
    Capture = 1,
    /// アタリからの脱出
    AtariEscape = 2,
    /// 自己アタリ（ペイロードは判定方式のフラグ番号）
    SelfAtari = 3,
    /// アタリをかける
    Atari = 4,
    /// 盤端からの距離
    Border = 5,
    /// 直前の着手からの距離
    LastDistance = 6,
    /// 2手前の着手からの距離
    SecondLastDistance = 7,
    /// 直前の着手に隣接
    Contiguity = 8,
    /// モンテカルロ所有率
    McOwner = 9,
    /// 空間パターン（ペイロードは辞書ID）
    Spatial = 10,
}

impl FeatureKind {
    /// 種別の数
    pub const NUM: usize = 11;

    /// 全ての種別
    pub const ALL: [FeatureKind; FeatureKind::NUM] = [
        FeatureKind::Pass,
        FeatureKind::Capture,
        FeatureKind::AtariEscape,
        FeatureKind::SelfAtari,
        FeatureKind::Atari,
        FeatureKind::Border,
        FeatureKind::LastDistance,
        FeatureKind::SecondLastDistance,
        FeatureKind::Contiguity,
        FeatureKind::McOwner,
        FeatureKind::Spatial,
    ];

    /// インデックスとして使用
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// データセットファイル上の名前
    pub const fn name(self) -> &'static str {
        match self {
            FeatureKind::Pass => "pass",
            FeatureKind::Capture => "capture",
            FeatureKind::AtariEscape => "atariescape",
            FeatureKind::SelfAtari => "selfatari",
            FeatureKind::Atari => "atari",
            FeatureKind::Border => "border",
            FeatureKind::LastDistance => "ldist",
            FeatureKind::SecondLastDistance => "lldist",
            FeatureKind::Contiguity => "cont",
            FeatureKind::McOwner => "mcowner",
            FeatureKind::Spatial => "s",
        }
    }
}

impl FromStr for FeatureKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| format!("unknown feature `{s}`"))
    }
}

/// 自己アタリ: 安価な「明らかに悪い」判定のみ
pub const SELFATARI_STUPID: u32 = 0;
/// 自己アタリ: 精密判定
pub const SELFATARI_SMART: u32 = 1;

/// 特徴量（種別 + 離散値）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Feature {
    pub kind: FeatureKind,
    pub payload: u32,
}

impl Feature {
    #[inline]
    pub const fn new(kind: FeatureKind, payload: u32) -> Feature {
        Feature { kind, payload }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.name(), self.payload)
    }
}

impl FromStr for Feature {
    type Err = String;

    /// `name:payload` 形式
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, payload) = s
            .split_once(':')
            .ok_or_else(|| format!("expected name:payload, got `{s}`"))?;
        let kind = name.parse::<FeatureKind>()?;
        let payload = payload
            .parse::<u32>()
            .map_err(|e| format!("bad payload in `{s}`: {e}"))?;
        Ok(Feature::new(kind, payload))
    }
}

/// 1交点でマッチした特徴量の集合
///
/// 通常は数個しか立たないのでインライン領域に収まる。
pub type FeatureSet = SmallVec<[Feature; 8]>;
