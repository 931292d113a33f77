//! rgo-playout: モンテカルロ囲碁エンジン向けの ELO-gamma プレイアウト方策
//!
//! 候補手ごとにマッチした特徴量の gamma を掛け合わせた重みを持つ分布を作り、
//! そこから1手をサンプリングする。直前手の8近傍には隣接ボーナスを掛ける。
//!
//! - [`probdist`]: 行小計付きの重み付き分布と一時除外
//! - [`pattern`]: 特徴量・ガンマ表・空間パターン辞書
//! - [`elo`]: 分布構築・サンプリング・事前分布・方策オブジェクト
//! - [`board`]: 盤面の境界トレイトと静的な参照実装

pub mod board;
pub mod elo;
pub mod error;
pub mod pattern;
pub mod probdist;
pub mod types;

pub use board::{AnnotationMatcher, Board, GridBoard};
pub use elo::{EloConfig, EloPolicy, MoveSampler, PriorEstimator, PriorMap, RolloutFields};
pub use error::{PlayoutError, PlayoutResult};
pub use probdist::{PROBDIST_EPSILON, WeightedField};
pub use types::{Color, Move, Point};
