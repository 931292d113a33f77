//! データセットを読み込んだ方策の結合テスト

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rgo_playout::pattern::{Feature, FeatureKind, SELFATARI_SMART, SELFATARI_STUPID};
use rgo_playout::{
    AnnotationMatcher, Board, Color, EloPolicy, GridBoard, Move, PlayoutError, Point, PriorMap,
    RolloutFields,
};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

fn policy(extra: &str) -> EloPolicy<AnnotationMatcher> {
    let gammafile = data_dir().join("patterns.gamma");
    let arg = format!("gammafile={}{extra}", gammafile.display());
    EloPolicy::new(&arg, AnnotationMatcher).unwrap()
}

fn spatial(id: u32) -> Feature {
    Feature::new(FeatureKind::Spatial, id)
}

#[test]
fn test_loads_both_gamma_tables() {
    let policy = policy("");
    assert_eq!(policy.assess_set().gammas.len(), 18);
    assert_eq!(policy.choose_set().gammas.len(), 9);
    assert_eq!(policy.choose_set().config.spat_dict.len(), 4);
    assert!(Arc::ptr_eq(
        &policy.choose_set().config.spat_dict,
        &policy.assess_set().config.spat_dict
    ));
    assert_eq!(policy.selfatari(), 0.06);

    // 隣接ボーナスは高速ガンマ表の cont:1
    let sampler = policy.sampler::<GridBoard>();
    assert_eq!(sampler.contiguity_bonus(), 3.0);
}

#[test]
fn test_option_masks() {
    let policy = policy(":precisesa");
    let spec = &policy.choose_set().spec;
    assert!(!spec.allows(&Feature::new(FeatureKind::SelfAtari, SELFATARI_STUPID)));
    assert!(spec.allows(&Feature::new(FeatureKind::SelfAtari, SELFATARI_SMART)));
    assert!(!spec.enabled(FeatureKind::Border));
    assert!(policy.assess_set().spec.enabled(FeatureKind::Border));

    let policy = self::policy(":xspat=0");
    assert!(!policy.choose_set().spec.enabled(FeatureKind::Spatial));
    assert!(!policy.assess_set().spec.enabled(FeatureKind::Spatial));
    assert!(policy.choose_set().spec.enabled(FeatureKind::Capture));

    let policy = self::policy(":xspat=1:precisesa=1");
    for set in [policy.choose_set(), policy.assess_set()] {
        assert!(set.spec.enabled(FeatureKind::Spatial));
        assert!(!set.spec.enabled(FeatureKind::Capture));
    }
    // precisesa は空間パターンのみの指定より優先される（"choose" のみ）
    let choose = &policy.choose_set().spec;
    assert!(choose.enabled(FeatureKind::SelfAtari));
    assert!(choose.allows(&Feature::new(FeatureKind::SelfAtari, SELFATARI_SMART)));
    assert!(!choose.allows(&Feature::new(FeatureKind::SelfAtari, SELFATARI_STUPID)));
    assert!(!policy.assess_set().spec.enabled(FeatureKind::SelfAtari));

    let policy = self::policy(":xspat=1");
    assert!(!policy.choose_set().spec.enabled(FeatureKind::SelfAtari));
}

#[test]
fn test_spatial_radius_per_set() {
    let policy = policy("");
    let mut board = GridBoard::new(9);
    let p = Point::new(4, 4);
    // 半径 5 のパターンは "assess" でだけマッチする
    board.annotate(p, spatial(3));
    board.annotate(Point::new(0, 0), spatial(1));

    let builder = policy.builder();
    assert_eq!(builder.point_weight(&board, Color::Black, p).unwrap(), 1.0);
    assert_eq!(builder.point_weight(&board, Color::Black, Point::new(0, 0)).unwrap(), 3.1);

    let mut map = PriorMap::new(9, Color::Black);
    map.consider_free_points(&board);
    assert_eq!(policy.assess(&board, Color::Black, &mut map, 10).unwrap(), 81);
    let total = 79.0 + 11.3 + 2.57;
    assert!((map.prior(p).value - 11.3 / total).abs() < 1e-12);
}

#[test]
fn test_choose_follows_last_move() {
    let policy = policy("");
    let mut board = GridBoard::new(9);
    let last = Point::new(2, 6);
    board.place(last, Color::White);
    board.set_last_move(Some(Move::new(last, Color::White)));

    let mut fields = RolloutFields::new();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(2024);
    let mut near = 0;
    for _ in 0..5_000 {
        let p = policy.choose(&board, Color::Black, &mut fields, &mut rng).unwrap();
        assert!(board.free_points().contains(&p));
        if last.neighbors8(9).contains(&p) {
            near += 1;
        }
    }
    // 24 / (24 + 72) = 0.25
    assert!((1_100..1_400).contains(&near), "{near}");
}

#[test]
fn test_missing_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let arg = format!("gammafile={}", dir.path().join("patterns.gamma").display());
    match EloPolicy::new(&arg, AnnotationMatcher) {
        Err(PlayoutError::Io { path, .. }) => assert!(path.ends_with("patterns.spat")),
        Err(e) => panic!("unexpected error {e}"),
        Ok(_) => panic!("policy without datasets"),
    }
}

#[test]
fn test_malformed_gamma_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(data_dir().join("patterns.spat"), dir.path().join("patterns.spat")).unwrap();
    std::fs::copy(data_dir().join("patterns.gammaf"), dir.path().join("patterns.gammaf")).unwrap();
    let mut gamma = std::fs::File::create(dir.path().join("patterns.gamma")).unwrap();
    writeln!(gamma, "# header").unwrap();
    writeln!(gamma, "1.5 (capture:0)").unwrap();
    writeln!(gamma, "-2 (atari:0)").unwrap();
    drop(gamma);

    let arg = format!("gammafile={}", dir.path().join("patterns.gamma").display());
    match EloPolicy::new(&arg, AnnotationMatcher) {
        Err(PlayoutError::Dataset { line, .. }) => assert_eq!(line, 3),
        Err(e) => panic!("unexpected error {e}"),
        Ok(_) => panic!("accepted negative gamma"),
    }
}

#[test]
fn test_bad_options() {
    assert!(matches!(
        EloPolicy::new("frobnicate=1", AnnotationMatcher),
        Err(PlayoutError::InvalidOption(_))
    ));
    assert!(matches!(
        EloPolicy::new("xspat=2", AnnotationMatcher),
        Err(PlayoutError::InvalidOptionValue { .. })
    ));
}
