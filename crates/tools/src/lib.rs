//! プレイアウト方策の検証ツール群

pub mod sampling;
