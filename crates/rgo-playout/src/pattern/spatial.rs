//! 空間パターン辞書（patterns.spat）
//!
//! 書式: 1行1パターン `<id> <radius> <stones> [hash...]`。`#` 以降はコメント。
//! マッチングそのものは外部のマッチャが行い、ここでは ID と半径の対応のみ保持する。

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{PlayoutError, PlayoutResult};

/// 空間パターン1件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpatialPattern {
    pub id: u32,
    pub radius: u32,
    /// 石配置の文字列表現
    pub stones: String,
}

/// 空間パターン辞書
#[derive(Debug, Default)]
pub struct SpatialDict {
    patterns: Vec<SpatialPattern>,
    by_id: HashMap<u32, usize>,
}

impl SpatialDict {
    /// 空の辞書
    pub fn empty() -> SpatialDict {
        SpatialDict::default()
    }

    /// ファイルから読み込む
    pub fn load(path: &Path) -> PlayoutResult<SpatialDict> {
        let file = File::open(path).map_err(|source| PlayoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dict = SpatialDict::from_reader(BufReader::new(file), path)?;
        log::info!("loaded {} spatial patterns from {}", dict.len(), path.display());
        Ok(dict)
    }

    /// 任意のリーダーから読み込む（`path` はエラー表示用）
    pub fn from_reader<R: BufRead>(reader: R, path: &Path) -> PlayoutResult<SpatialDict> {
        let mut dict = SpatialDict::default();
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

            let mut fields = content.split_whitespace();
            let id = fields
                .next()
                .and_then(|s| s.parse::<u32>().ok())
                .ok_or_else(|| bad(format!("bad pattern id in `{content}`")))?;
            let radius = fields
                .next()
                .and_then(|s| s.parse::<u32>().ok())
                .ok_or_else(|| bad(format!("bad pattern radius in `{content}`")))?;
            let stones = fields
                .next()
                .ok_or_else(|| bad(format!("missing stone configuration in `{content}`")))?;

            if dict.by_id.contains_key(&id) {
                return Err(bad(format!("duplicate spatial pattern id {id}")));
            }
            dict.by_id.insert(id, dict.patterns.len());
            dict.patterns.push(SpatialPattern {
                id,
                radius,
                stones: stones.to_string(),
            });
        }
        Ok(dict)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&SpatialPattern> {
        self.by_id.get(&id).map(|&i| &self.patterns[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpatialPattern> {
        self.patterns.iter()
    }
}
