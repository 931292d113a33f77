//! 方策オプション文字列
//!
//! `key` または `key=value` をコロンで区切って並べる。キーは大文字小文字を区別しない。
//!
//! | キー | 値 | 意味 |
//! |------|----|------|
//! | `selfatari` | 実数 | 自己アタリの重み（保持するだけで採点には使わない） |
//! | `precisesa` | 整数（省略可） | プレイアウトで精密な自己アタリ判定を使う |
//! | `gammafile` | パス | 基本ガンマ表。プレイアウト用は末尾に `f` を付けたファイル |
//! | `xspat` | `-1` / `0` / `1` | 既定 / 空間パターン不使用 / 空間パターンのみ |
//!
//! 未知のキー・値の欠落は即エラーで、部分的な設定は受け付けない。

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{PlayoutError, PlayoutResult};
use crate::pattern::SpatialMode;

/// 既定のガンマ表
pub const DEFAULT_GAMMA_FILE: &str = "patterns.gamma";

/// 空間パターン辞書のファイル名（ガンマ表と同じディレクトリ）
pub const SPATIAL_DICT_FILE: &str = "patterns.spat";

/// Coulom の論文の表に基づく自己アタリの既定値
pub const DEFAULT_SELFATARI: f64 = 0.06;

/// 方策の設定
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EloConfig {
    /// 自己アタリの重み
    ///
    /// 受け付けて保持するが、採点には掛けない（ガンマ表の特徴量で代替している）。
    pub selfatari: f64,
    /// プレイアウト用特徴量で精密な自己アタリ判定を使う
    pub precise_selfatari: bool,
    /// 基本ガンマ表
    pub gammafile: PathBuf,
    /// 空間パターンの扱い
    pub xspat: SpatialMode,
}

impl Default for EloConfig {
    fn default() -> Self {
        EloConfig {
            selfatari: DEFAULT_SELFATARI,
            precise_selfatari: false,
            gammafile: PathBuf::from(DEFAULT_GAMMA_FILE),
            xspat: SpatialMode::Default,
        }
    }
}

impl EloConfig {
    /// オプション文字列を解釈する
    pub fn parse(arg: &str) -> PlayoutResult<EloConfig> {
        let mut config = EloConfig::default();
        if arg.is_empty() {
            return Ok(config);
        }

        let tokens: Vec<&str> = arg.split(':').collect();
        let last = tokens.len() - 1;
        for (i, token) in tokens.into_iter().enumerate() {
            // 末尾のコロンだけは許す
            if token.is_empty() && i == last {
                break;
            }
            let (name, value) = match token.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (token, None),
            };
            config.apply(name, value)?;
        }

        log::debug!("playout policy options: {config:?}");
        Ok(config)
    }

    fn apply(&mut self, name: &str, value: Option<&str>) -> PlayoutResult<()> {
        let bad_value = |value: &str| PlayoutError::InvalidOptionValue {
            name: name.to_string(),
            value: value.to_string(),
        };

        match (name.to_ascii_lowercase().as_str(), value) {
            ("selfatari", Some(v)) => {
                self.selfatari = v.parse().map_err(|_| bad_value(v))?;
            }
            ("precisesa", None) => self.precise_selfatari = true,
            ("precisesa", Some(v)) => {
                self.precise_selfatari = v.parse::<i64>().map_err(|_| bad_value(v))? != 0;
            }
            ("gammafile", Some(v)) if !v.is_empty() => self.gammafile = PathBuf::from(v),
            ("xspat", Some(v)) => {
                self.xspat = match v.parse::<i64>().map_err(|_| bad_value(v))? {
                    -1 => SpatialMode::Default,
                    0 => SpatialMode::Excluded,
                    1 => SpatialMode::Only,
                    _ => return Err(bad_value(v)),
                };
            }
            _ => return Err(PlayoutError::InvalidOption(name.to_string())),
        }
        Ok(())
    }

    /// プレイアウト用ガンマ表（`<gammafile>f`）
    pub fn fast_gammafile(&self) -> PathBuf {
        let mut name = OsString::from(self.gammafile.as_os_str());
        name.push("f");
        PathBuf::from(name)
    }

    /// 空間パターン辞書（ガンマ表と同じディレクトリの `patterns.spat`）
    pub fn spatial_dict_path(&self) -> PathBuf {
        self.gammafile
            .parent()
            .unwrap_or(Path::new(""))
            .join(SPATIAL_DICT_FILE)
    }
}
