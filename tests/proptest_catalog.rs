use serde_json::json;

use lprindex::catalog::{Catalog, ScanOptions, TrainValSplit};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

mod common;

use common::{record_with, DatasetFixture};

fn proptest_config(default_cases: u32) -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default_cases);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

proptest! {
    #![proptest_config(proptest_config(256))]

    #[test]
    fn split_partitions_every_index_once(len in 0usize..10_000, fraction in 0.0f64..=1.0) {
        let split = TrainValSplit::new(len, fraction).expect("valid fraction");

        prop_assert_eq!(split.train.start, 0);
        prop_assert_eq!(split.train.end, split.val.start);
        prop_assert_eq!(split.val.end, len);
        prop_assert_eq!(split.train.len(), (len as f64 * fraction).floor() as usize);
    }
}

proptest! {
    #![proptest_config(proptest_config(16))]

    #[test]
    fn limited_scan_is_prefix_of_full_scan(
        hard in proptest::collection::vec(any::<bool>(), 0..12),
        limit in 0usize..15,
    ) {
        let fixture = DatasetFixture::new();
        for (i, is_hard) in hard.iter().enumerate() {
            let name = format!("img{i:03}");
            let difficulty = if *is_hard { "hard" } else { "easy" };
            fixture.annotation(&name, &record_with(&name, "difficulty", json!(difficulty)));
            fixture.image(&name, "jpg");
        }

        let full = Catalog::open(fixture.root(), &ScanOptions::default()).expect("full scan");
        let valid = hard.iter().filter(|h| !**h).count();
        prop_assert_eq!(full.len(), valid);
        prop_assert!(full.iter().all(|s| s.record().id.starts_with("img")));

        let limited = Catalog::open(fixture.root(), &ScanOptions::default().with_limit(limit))
            .expect("limited scan");
        let expected = if limit == 0 { valid } else { limit.min(valid) };
        prop_assert_eq!(limited.len(), expected);

        let full_ids: Vec<_> = full.iter().map(|s| s.record().id.clone()).collect();
        let limited_ids: Vec<_> = limited.iter().map(|s| s.record().id.clone()).collect();
        prop_assert_eq!(&limited_ids[..], &full_ids[..expected]);
    }
}
