//! プレイアウト方策のエラー型
//!
//! 設定・データセット起因のエラーのみを扱う。
//! 差分管理の不変条件違反は回復不能として panic する（[`invariant_violation`]）。

use std::path::PathBuf;

use crate::pattern::Feature;

/// プレイアウト方策のエラー
#[derive(thiserror::Error, Debug)]
pub enum PlayoutError {
    /// 未知のオプション、または値が必要なオプションに値がない
    #[error("invalid policy argument {0} or missing value")]
    InvalidOption(String),

    /// オプション値の解釈に失敗
    #[error("invalid value for policy argument {name}: {value}")]
    InvalidOptionValue { name: String, value: String },

    /// データセットファイルが開けない
    #[error("cannot read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// データセットファイルの書式エラー
    #[error("{path}:{line}: {message}")]
    Dataset {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// ガンマ表に存在しない特徴量
    #[error("no gamma for feature {0}")]
    MissingGamma(Feature),
}

/// プレイアウト方策の Result 型
pub type PlayoutResult<T> = Result<T, PlayoutError>;

/// 不変条件違反で停止する
///
/// 統計的な偏りを黙って後続のサンプルに伝播させないため、回復はしない。
#[cold]
#[track_caller]
pub(crate) fn invariant_violation(message: std::fmt::Arguments<'_>) -> ! {
    log::error!("playout invariant violated: {message}");
    panic!("playout invariant violated: {message}");
}
