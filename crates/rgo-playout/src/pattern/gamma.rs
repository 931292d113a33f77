//! ガンマ表（patterns.gamma）
//!
//! 各特徴量の学習済み強さ（Coulom の Bradley-Terry モデルにおける gamma）。
//! 候補手の重みはマッチした特徴量の gamma の積になる。
//!
//! 書式: `<gamma> (<name>:<payload>)` または `<gamma> <name>:<payload>`。
//! `#` 以降はコメント、空行は無視する。

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::feature::{Feature, FeatureKind};
use crate::error::{PlayoutError, PlayoutResult};

/// 特徴量 → gamma の対応表（読み込み後は不変）
#[derive(Debug, Clone, Default)]
pub struct GammaTable {
    gammas: HashMap<Feature, f64>,
}

impl GammaTable {
    /// 空の表
    pub fn new() -> GammaTable {
        GammaTable::default()
    }

    /// ファイルから読み込む
    pub fn load(path: &Path) -> PlayoutResult<GammaTable> {
        let file = File::open(path).map_err(|source| PlayoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = GammaTable::from_reader(BufReader::new(file), path)?;
        log::info!("loaded {} gammas from {}", table.len(), path.display());
        Ok(table)
    }

    /// 任意のリーダーから読み込む（`path` はエラー表示用）
    pub fn from_reader<R: BufRead>(reader: R, path: &Path) -> PlayoutResult<GammaTable> {
        let mut table = GammaTable::new();
        for (i, line) in reader.lines().enumerate() {
            let line_no = i + 1;
            let line = line.map_err(|source| PlayoutError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let content = line.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }
            let bad = |message: String| PlayoutError::Dataset {
                path: path.to_path_buf(),
                line: line_no,
                message,
            };

            let (gamma, pattern) = content
                .split_once(char::is_whitespace)
                .ok_or_else(|| bad(format!("expected `<gamma> <feature>`, got `{content}`")))?;
            let gamma: f64 = gamma
                .parse()
                .map_err(|e| bad(format!("bad gamma `{gamma}`: {e}")))?;
            if !gamma.is_finite() || gamma <= 0.0 {
                return Err(bad(format!("gamma must be positive and finite, got {gamma}")));
            }

            let pattern = pattern.trim();
            let pattern = pattern
                .strip_prefix('(')
                .and_then(|p| p.strip_suffix(')'))
                .unwrap_or(pattern)
                .trim();
            if pattern.split_whitespace().count() != 1 {
                return Err(bad(format!("expected exactly one feature, got `{pattern}`")));
            }
            let feature: Feature = pattern.parse().map_err(bad)?;

            if table.gammas.insert(feature, gamma).is_some() {
                return Err(bad(format!("duplicate gamma for {feature}")));
            }
        }
        Ok(table)
    }

    /// gamma を登録する
    pub fn insert(&mut self, feature: Feature, gamma: f64) {
        debug_assert!(gamma.is_finite() && gamma > 0.0);
        self.gammas.insert(feature, gamma);
    }

    /// gamma を引く（未登録なら `None`）
    #[inline]
    pub fn get(&self, feature: &Feature) -> Option<f64> {
        self.gammas.get(feature).copied()
    }

    /// gamma を引く（未登録は設定エラー）
    #[inline]
    pub fn gamma(&self, feature: &Feature) -> PlayoutResult<f64> {
        self.get(feature).ok_or(PlayoutError::MissingGamma(*feature))
    }

    /// 直前手に隣接する候補へのボーナス（`cont:1`、未登録なら 1.0）
    pub fn contiguity_bonus(&self) -> f64 {
        self.get(&Feature::new(FeatureKind::Contiguity, 1)).unwrap_or(1.0)
    }

    pub fn len(&self) -> usize {
        self.gammas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gammas.is_empty()
    }
}

impl FromIterator<(Feature, f64)> for GammaTable {
    fn from_iter<I: IntoIterator<Item = (Feature, f64)>>(iter: I) -> Self {
        let mut table = GammaTable::new();
        for (feature, gamma) in iter {
            table.insert(feature, gamma);
        }
        table
    }
}
