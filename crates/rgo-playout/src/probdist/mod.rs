//! 盤面上の重み付き確率分布
//!
//! - `WeightedField`: 交点ごとの重み・行ごとの小計・総和を保持し、O(1) 更新と
//!   行単位の二段走査によるサンプリングを行う
//! - `ExclusionSet`: 一時的に分布から外した交点と、復元用の行小計バックアップ
//! - `LocalDistribution`: 直前手の8近傍だけからなる小さな分布

mod exclusion;
mod field;
mod local;

pub use exclusion::{ExclusionSet, MAX_EXCLUSIONS};
pub use field::{RowBackup, WeightedField};
pub use local::{LocalDistribution, MAX_LOCAL};

/// これ未満の総和は「候補なし」とみなす
///
/// 行小計・総和の差分更新で積もる丸め誤差（f64 で 1e-12 程度）より十分大きく、
/// 実際の gamma の積よりは十分小さい値にしている。
pub const PROBDIST_EPSILON: f64 = 1e-6;
