//! PriorEstimator のテスト

use super::{CAPTURE, pattern_set};
use crate::board::{AnnotationMatcher, Board, GridBoard};
use crate::elo::{PriorEstimator, PriorMap, PriorSink};
use crate::types::{Color, Point};

#[test]
fn test_priors_sum_to_one() {
    let mut board = GridBoard::new(5);
    board.place(Point::new(2, 2), Color::White);
    board.annotate(Point::new(0, 0), CAPTURE);
    let set = pattern_set(&[(CAPTURE, 8.0)]);
    let estimator = PriorEstimator::new(&set, &AnnotationMatcher);

    let mut map = PriorMap::new(5, Color::Black);
    map.consider_free_points(&board);
    let forwarded = estimator.assess(&board, Color::Black, &mut map, 20).unwrap();
    assert_eq!(forwarded, 24);

    let sum: f64 = map.iter().map(|(_, stats)| stats.value).sum();
    assert!((sum - 1.0).abs() < 1e-12);
    // 23 × 1.0 + 8.0
    assert!((map.prior(Point::new(0, 0)).value - 8.0 / 31.0).abs() < 1e-12);
    assert_eq!(map.prior(Point::new(0, 0)).playouts, 20);
    assert_eq!(map.prior(Point::new(2, 2)).playouts, 0);
}

#[test]
fn test_skips_unconsidered_points() {
    let board = GridBoard::new(5);
    let set = pattern_set(&[]);
    let estimator = PriorEstimator::new(&set, &AnnotationMatcher);

    let mut map = PriorMap::new(5, Color::White);
    map.consider(Point::new(1, 3));
    map.consider(Point::new(4, 0));
    let forwarded = estimator.assess(&board, Color::White, &mut map, 10).unwrap();
    assert_eq!(forwarded, 2);

    let priors: Vec<_> = map.iter().collect();
    assert_eq!(priors.len(), 2);
    for (point, stats) in priors {
        assert!(map.considers(point));
        assert!((stats.value - 1.0 / 25.0).abs() < 1e-12);
    }
}

#[test]
fn test_degenerate_board_forwards_nothing() {
    // 空点はすべて黒の一目の眼
    let board = GridBoard::from_diagram(
        "
        . X .
        X X X
        . X .
    ",
    )
    .unwrap();
    let set = pattern_set(&[]);
    let estimator = PriorEstimator::new(&set, &AnnotationMatcher);

    let mut map = PriorMap::new(3, Color::Black);
    map.consider_free_points(&board);
    assert_eq!(board.free_points().len(), 4);
    assert_eq!(estimator.assess(&board, Color::Black, &mut map, 10).unwrap(), 0);
    assert_eq!(map.iter().count(), 0);
}

/// 探索木ノード側の独自実装でも使える
#[test]
fn test_custom_sink() {
    struct Collect(Vec<(Point, f64, u32)>);
    impl PriorSink for Collect {
        fn considers(&self, point: Point) -> bool {
            point.y() == 0
        }
        fn add_prior(&mut self, point: Point, value: f64, playouts: u32) {
            self.0.push((point, value, playouts));
        }
    }

    let board = GridBoard::new(4);
    let set = pattern_set(&[]);
    let estimator = PriorEstimator::new(&set, &AnnotationMatcher);
    let mut sink = Collect(Vec::new());
    estimator.assess(&board, Color::Black, &mut sink, 3).unwrap();

    assert_eq!(sink.0.len(), 4);
    assert!(sink.0.iter().all(|&(p, v, n)| p.y() == 0 && v == 1.0 / 16.0 && n == 3));
}
