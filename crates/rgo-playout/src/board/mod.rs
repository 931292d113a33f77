//! 盤面の境界
//!
//! 盤面表現・合法手判定・眼の判定は外部コンポーネントが提供する。
//! 方策が必要とする読み取り専用の操作だけを `Board` トレイトとして定義する。
//!
//! `GridBoard` は石を置くだけの静的なスナップショットで、テストと
//! サンプリングツールのための参照実装。

mod grid;

pub use grid::{AnnotationMatcher, DiagramError, GridBoard};

use crate::types::{Color, Move, Point};

/// 方策から見た盤面
pub trait Board {
    /// 路数
    fn size(&self) -> usize;

    /// 着手候補となる空点（行優先順）
    fn free_points(&self) -> &[Point];

    /// `mv` が合法手か（コウで禁じられた点は不合法）
    fn is_valid_move(&self, mv: Move) -> bool;

    /// `point` が `color` の石だけで囲まれた一目の眼か
    fn is_one_point_eye(&self, point: Point, color: Color) -> bool;

    /// コウで着手が禁じられている点と、その禁止が適用される手番
    fn ko(&self) -> Option<Move>;

    /// 直前の着手（パスまたは初手前なら `None`）
    fn last_move(&self) -> Option<Move>;
}
