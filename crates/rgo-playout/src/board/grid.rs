//! 静的な盤面スナップショット
//!
//! 石の配置・コウ・直前手・着手禁止点・交点ごとの特徴量注釈を保持する。
//! 着手による石の取り上げなどは行わない。

use std::collections::HashMap;

use super::Board;
use crate::pattern::{Feature, FeatureKind, FeatureMatcher, FeatureSet, PatternConfig, PatternSpec};
use crate::types::{Color, MAX_BOARD_SIZE, Move, Point};

/// 盤面図の解析エラー
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DiagramError {
    #[error("empty diagram")]
    Empty,

    #[error("board size {0} is not supported (max {MAX_BOARD_SIZE})")]
    UnsupportedSize(usize),

    #[error("row {row} has {width} points, expected {size}")]
    Ragged { row: usize, width: usize, size: usize },

    #[error("unexpected character {ch:?} in row {row}")]
    BadChar { row: usize, ch: char },
}

/// 静的な盤面
#[derive(Debug, Clone)]
pub struct GridBoard {
    size: usize,
    stones: Vec<Option<Color>>,
    free: Vec<Point>,
    forbidden: Vec<bool>,
    ko: Option<Move>,
    last_move: Option<Move>,
    annotations: HashMap<Point, FeatureSet>,
}

impl GridBoard {
    /// 空の `size` 路盤
    pub fn new(size: usize) -> GridBoard {
        assert!(
            (1..=MAX_BOARD_SIZE).contains(&size),
            "unsupported board size {size}"
        );
        let free = (0..size * size).map(|i| Point::from_index(i, size)).collect();
        GridBoard {
            size,
            stones: vec![None; size * size],
            free,
            forbidden: vec![false; size * size],
            ko: None,
            last_move: None,
            annotations: HashMap::new(),
        }
    }

    /// 盤面図から作る
    ///
    /// `X` = 黒, `O` = 白, `.` / `+` = 空点。行内の空白は無視する。
    pub fn from_diagram(diagram: &str) -> Result<GridBoard, DiagramError> {
        let rows: Vec<Vec<char>> = diagram
            .lines()
            .map(|l| l.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|r| !r.is_empty())
            .collect();
        let size = rows.len();
        if size == 0 {
            return Err(DiagramError::Empty);
        }
        if size > MAX_BOARD_SIZE {
            return Err(DiagramError::UnsupportedSize(size));
        }

        let mut board = GridBoard::new(size);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(DiagramError::Ragged {
                    row: y,
                    width: row.len(),
                    size,
                });
            }
            for (x, &ch) in row.iter().enumerate() {
                match ch {
                    'X' | 'x' => board.place(Point::new(x, y), Color::Black),
                    'O' | 'o' => board.place(Point::new(x, y), Color::White),
                    '.' | '+' => {}
                    _ => return Err(DiagramError::BadChar { row: y, ch }),
                }
            }
        }
        Ok(board)
    }

    /// 石を置く（取り上げ処理はしない）
    pub fn place(&mut self, point: Point, color: Color) {
        let idx = point.index(self.size);
        if self.stones[idx].is_none() {
            if let Ok(pos) = self.free.binary_search(&point) {
                self.free.remove(pos);
            }
        }
        self.stones[idx] = Some(color);
    }

    /// 石を取り除く
    pub fn remove(&mut self, point: Point) {
        let idx = point.index(self.size);
        if self.stones[idx].take().is_some() {
            if let Err(pos) = self.free.binary_search(&point) {
                self.free.insert(pos, point);
            }
        }
    }

    pub fn stone(&self, point: Point) -> Option<Color> {
        self.stones[point.index(self.size)]
    }

    /// 着手禁止点にする（外部の合法手判定の結果を模す）
    pub fn forbid(&mut self, point: Point) {
        self.forbidden[point.index(self.size)] = true;
    }

    pub fn set_ko(&mut self, ko: Option<Move>) {
        self.ko = ko;
    }

    pub fn set_last_move(&mut self, last_move: Option<Move>) {
        self.last_move = last_move;
    }

    /// 交点に特徴量の注釈を付ける
    pub fn annotate(&mut self, point: Point, feature: Feature) {
        self.annotations.entry(point).or_default().push(feature);
    }

    /// 交点の特徴量注釈
    pub fn annotations(&self, point: Point) -> &[Feature] {
        self.annotations.get(&point).map(|f| f.as_slice()).unwrap_or(&[])
    }

    /// 盤面図として書き出す
    pub fn to_diagram(&self) -> String {
        let mut out = String::with_capacity(self.size * (self.size + 1));
        for y in 0..self.size {
            for x in 0..self.size {
                out.push(self.stone(Point::new(x, y)).map_or('.', Color::to_char));
            }
            out.push('\n');
        }
        out
    }
}

impl Board for GridBoard {
    fn size(&self) -> usize {
        self.size
    }

    fn free_points(&self) -> &[Point] {
        &self.free
    }

    fn is_valid_move(&self, mv: Move) -> bool {
        if mv.is_pass() {
            return true;
        }
        if mv.point.x() >= self.size || mv.point.y() >= self.size {
            return false;
        }
        let idx = mv.point.index(self.size);
        if self.stones[idx].is_some() || self.forbidden[idx] {
            return false;
        }
        !matches!(self.ko, Some(ko) if ko.point == mv.point && ko.color == mv.color)
    }

    fn is_one_point_eye(&self, point: Point, color: Color) -> bool {
        if point.is_pass() || self.stone(point).is_some() {
            return false;
        }
        point
            .neighbors4(self.size)
            .iter()
            .all(|&n| self.stone(n) == Some(color))
    }

    fn ko(&self) -> Option<Move> {
        self.ko
    }

    fn last_move(&self) -> Option<Move> {
        self.last_move.filter(|m| !m.is_pass())
    }
}

/// `GridBoard` の注釈をそのまま特徴量として返すマッチャ
///
/// マッチ対象外の種別、辞書にない・半径範囲外の空間パターン、
/// 設定で無効な距離系特徴量は落とす。
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationMatcher;

impl AnnotationMatcher {
    fn accepts(config: &PatternConfig, spec: &PatternSpec, feature: &Feature) -> bool {
        if !spec.allows(feature) {
            return false;
        }
        match feature.kind {
            FeatureKind::Spatial => config
                .spat_dict
                .get(feature.payload)
                .is_some_and(|p| (config.spat_min..=config.spat_max).contains(&p.radius)),
            FeatureKind::Border => config.bdist_max.is_some_and(|max| feature.payload <= max),
            FeatureKind::LastDistance | FeatureKind::SecondLastDistance => {
                (config.ldist_min..=config.ldist_max).contains(&feature.payload)
            }
            FeatureKind::McOwner => config.mcsims > 0,
            _ => true,
        }
    }
}

impl FeatureMatcher<GridBoard> for AnnotationMatcher {
    fn match_features(
        &self,
        config: &PatternConfig,
        spec: &PatternSpec,
        board: &GridBoard,
        mv: Move,
        out: &mut FeatureSet,
    ) {
        out.extend(
            board
                .annotations(mv.point)
                .iter()
                .filter(|f| Self::accepts(config, spec, f))
                .copied(),
        );
    }
}
