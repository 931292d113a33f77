//! EloPolicy のテスト（データセットを読まない組み立て）

use std::sync::Arc;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use super::{CAPTURE, pattern_set};
use crate::board::{AnnotationMatcher, GridBoard};
use crate::elo::{EloConfig, EloPolicy, PriorMap, RolloutFields};
use crate::probdist::WeightedField;
use crate::error::PlayoutError;
use crate::pattern::{Feature, FeatureKind, PatternSpec};
use crate::types::{Color, Point};

fn policy() -> EloPolicy<AnnotationMatcher> {
    let choose = pattern_set(&[(CAPTURE, 4.0)]);
    let mut assess = pattern_set(&[(CAPTURE, 2.0)]);
    assess.spec = PatternSpec::match_all();
    EloPolicy::from_parts(EloConfig::default(), choose, assess, AnnotationMatcher)
}

#[test]
fn test_choose_and_assess_use_their_own_sets() {
    let policy = policy();
    assert_eq!(policy.selfatari(), 0.06);

    let mut board = GridBoard::new(3);
    let p = Point::new(1, 1);
    board.annotate(p, CAPTURE);

    let builder = policy.builder();
    assert_eq!(builder.point_weight(&board, Color::Black, p).unwrap(), 4.0);

    let mut map = PriorMap::new(3, Color::Black);
    map.consider(p);
    policy.assess(&board, Color::Black, &mut map, 1).unwrap();
    assert!((map.prior(p).value - 2.0 / 10.0).abs() < 1e-12);

    let mut fields = RolloutFields::new();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(8);
    let mut hits = 0;
    for _ in 0..1_000 {
        if policy.choose(&board, Color::Black, &mut fields, &mut rng).unwrap() == p {
            hits += 1;
        }
    }
    // 4 / 12 の確率
    assert!((250..420).contains(&hits), "{hits}");
}

#[test]
fn test_sampler_with_hook() {
    let policy = policy();
    let board = GridBoard::new(5);
    let target = Point::new(4, 0);
    let hook = |_board: &GridBoard, _color: Color, field: &mut WeightedField| {
        field.clear();
        field.set(target, 1.0);
    };
    let sampler = policy.sampler_with_hook::<GridBoard>(&hook);

    let mut fields = RolloutFields::new();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(4);
    for _ in 0..20 {
        assert_eq!(sampler.choose(&board, Color::Black, &mut fields, &mut rng).unwrap(), target);
    }
    assert_eq!(fields.get(Color::Black).unwrap().total(), 25.0);
}

#[test]
fn test_missing_gamma_is_reported() {
    let policy = policy();
    let mut board = GridBoard::new(3);
    let atari = Feature::new(FeatureKind::Atari, 0);
    board.annotate(Point::new(0, 0), atari);

    let mut fields = RolloutFields::new();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
    match policy.choose(&board, Color::White, &mut fields, &mut rng) {
        Err(PlayoutError::MissingGamma(feature)) => assert_eq!(feature, atari),
        other => panic!("expected missing gamma, got {other:?}"),
    }
}

#[test]
fn test_shutdown_releases_tables() {
    let policy = policy();
    let gammas = Arc::clone(&policy.choose_set().gammas);
    assert_eq!(Arc::strong_count(&gammas), 2);
    policy.shutdown();
    assert_eq!(Arc::strong_count(&gammas), 1);
}
