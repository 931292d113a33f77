//! WeightedField の性質テスト

use proptest::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use rgo_playout::probdist::{ExclusionSet, MAX_EXCLUSIONS};
use rgo_playout::{Point, WeightedField};

/// 盤サイズと (交点番号, 重み) の列
fn updates() -> impl Strategy<Value = (usize, Vec<(usize, f64)>)> {
    (1usize..=19).prop_flat_map(|size| {
        let n = size * size;
        (
            Just(size),
            prop::collection::vec((0..n, prop_oneof![Just(0.0), 0.0..1000.0f64]), 0..300),
        )
    })
}

fn field_from(size: usize, ops: &[(usize, f64)]) -> WeightedField {
    let mut field = WeightedField::new(size);
    for &(i, w) in ops {
        field.set(Point::from_index(i, size), w);
    }
    field
}

proptest! {
    // 総和・行小計・交点の和は一致する
    #[test]
    fn totals_stay_consistent((size, ops) in updates()) {
        let field = field_from(size, &ops);
        let sum: f64 = (0..size * size).map(|i| field.get(Point::from_index(i, size))).sum();
        let rows: f64 = (0..size).map(|r| field.row_total(r)).sum();
        let tolerance = 1e-9 * sum.max(1.0);
        prop_assert!((field.total() - sum).abs() < tolerance, "{} vs {sum}", field.total());
        prop_assert!((rows - sum).abs() < tolerance);
        prop_assert!(field.drift() < tolerance);
    }

    // 除外して戻すと行小計と総和が完全に元に戻る
    #[test]
    fn exclusion_restores_exactly(
        (size, ops) in updates(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..=MAX_EXCLUSIONS),
    ) {
        let mut field = field_from(size, &ops);
        let before_total = field.total();
        let before_rows: Vec<f64> = (0..size).map(|r| field.row_total(r)).collect();

        let mut exclusions = ExclusionSet::new(&field);
        for pick in &picks {
            exclusions.exclude(&mut field, Point::from_index(pick.index(size * size), size));
        }
        prop_assert!(exclusions.points().windows(2).all(|w| w[0] < w[1]));
        exclusions.restore(&mut field);

        prop_assert_eq!(field.total().to_bits(), before_total.to_bits());
        for (r, total) in before_rows.iter().enumerate() {
            prop_assert_eq!(field.row_total(r).to_bits(), total.to_bits());
        }
    }

    // サンプリングは除外点・重み 0 の交点を返さない
    #[test]
    fn sample_respects_exclusions(
        (size, ops) in updates(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..=MAX_EXCLUSIONS),
        seed in any::<u64>(),
    ) {
        let mut field = field_from(size, &ops);
        let mut exclusions = ExclusionSet::new(&field);
        for pick in &picks {
            exclusions.exclude(&mut field, Point::from_index(pick.index(size * size), size));
        }

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        for _ in 0..20 {
            let p = field.sample(&mut rng, exclusions.points());
            if p.is_pass() {
                prop_assert!(field.total() < rgo_playout::PROBDIST_EPSILON);
            } else {
                prop_assert!(!exclusions.contains(p));
                prop_assert!(field.get(p) > 0.0);
            }
        }
        exclusions.restore(&mut field);
    }
}
