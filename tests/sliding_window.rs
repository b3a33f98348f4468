use rayon::prelude::*;
use slidecv::splitters::{InMemoryTable, SlideWindowSplitter, WindowPlan};
use slidecv::{SlidecvError, SplitConfig};

fn ascending(n: i64) -> InMemoryTable<i64> {
    InMemoryTable::new("ts", (0..n).collect())
}

#[test]
fn test_reference_walk_forward() {
    // 100 timestamps, 3 splits, 80% train: ratio 2.6, n_train 30, n_test 10
    let splitter = SlideWindowSplitter::new("ts", 3, 0.8).unwrap();
    let splits = splitter.split_all(&ascending(100)).unwrap();

    assert_eq!(splits.len(), 3);
    let expected = [(0, 29, 30, 39), (30, 59, 60, 69), (60, 89, 90, 99)];
    for (split, (tb, te, sb, se)) in splits.iter().zip(expected) {
        assert_eq!(split.train_window.begin, tb);
        assert_eq!(split.train_window.end, te);
        assert_eq!(split.test_window.begin, sb);
        assert_eq!(split.test_window.end, se);
        assert_eq!(split.train_ids, (tb as usize..=te as usize).collect::<Vec<_>>());
        assert_eq!(split.test_ids, (sb as usize..=se as usize).collect::<Vec<_>>());
    }
}

#[test]
fn test_window_lengths_are_constant() {
    for n_rows in [20i64, 97, 144, 500] {
        for n_splits in 1..=7usize {
            for ratio in [0.25, 0.5, 0.7, 0.9, 1.0] {
                let splitter = SlideWindowSplitter::new("ts", n_splits, ratio).unwrap();
                let config = SplitConfig::new("ts", n_splits, ratio).unwrap();
                let Ok(plan) = WindowPlan::new(n_rows as usize, &config) else {
                    continue;
                };
                let splits = splitter.split_all(&ascending(n_rows)).unwrap();

                assert_eq!(splits.len(), n_splits);
                assert_eq!(plan.n_train * n_splits + plan.n_test, n_rows as usize);
                for split in &splits {
                    assert_eq!(split.train_ids.len(), plan.n_train);
                    assert_eq!(split.test_ids.len(), plan.n_test);
                }
            }
        }
    }
}

#[test]
fn test_train_ends_before_test_begins() {
    let splitter = SlideWindowSplitter::new("ts", 4, 0.6).unwrap();
    for split in splitter.split(&ascending(250)).unwrap() {
        let split = split.unwrap();
        assert_eq!(split.bounds.test_begin_idx, split.bounds.train_end_idx + 1);
        assert!(split.train_window.end < split.test_window.begin);
        assert!(split.overlapping_ids().is_empty());
    }
}

#[test]
fn test_folds_walk_forward() {
    let splitter = SlideWindowSplitter::new("ts", 5, 0.7).unwrap();
    let splits = splitter.split_all(&ascending(300)).unwrap();

    for pair in splits.windows(2) {
        assert!(pair[0].train_window.begin < pair[1].train_window.begin);
        assert!(pair[0].test_window.begin < pair[1].test_window.begin);
        assert_eq!(pair[0].fold_num + 1, pair[1].fold_num);
    }
}

#[test]
fn test_repeated_calls_are_identical() {
    let table = InMemoryTable::new("ts", vec![5.5, 1.0, 3.25, 9.0, 2.0, 7.5, 4.0, 8.0, 6.0, 0.5]);
    let splitter = SlideWindowSplitter::new("ts", 2, 0.6).unwrap();

    let first = splitter.split_all(&table).unwrap();
    let second = splitter.split_all(&table).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_independent_iterators_do_not_interfere() {
    let table = ascending(100);
    let splitter = SlideWindowSplitter::new("ts", 3, 0.8).unwrap();

    let mut a = splitter.split(&table).unwrap();
    let mut b = splitter.split(&table).unwrap();

    let a0 = a.next().unwrap().unwrap();
    let a1 = a.next().unwrap().unwrap();
    let b0 = b.next().unwrap().unwrap();
    assert_eq!(a0, b0);
    assert_ne!(a1.fold_num, b0.fold_num);
    assert_eq!(b.count(), 2);
}

#[test]
fn test_concurrent_callers() {
    let table = ascending(1000);
    let splitter = SlideWindowSplitter::new("ts", 6, 0.75).unwrap();
    let expected = splitter.split_all(&table).unwrap();

    let results: Vec<_> = (0..8)
        .into_par_iter()
        .map(|_| splitter.split_all(&table).unwrap())
        .collect();

    for result in results {
        assert_eq!(result, expected);
    }
}

#[test]
fn test_unsorted_input_selects_original_ids() {
    // Row i holds timestamp (i * 37) % 100, a permutation of 0..100
    let values: Vec<i64> = (0..100).map(|i| (i * 37) % 100).collect();
    let table = InMemoryTable::new("ts", values.clone());
    let splitter = SlideWindowSplitter::new("ts", 3, 0.8).unwrap();

    let first = splitter.split(&table).unwrap().next().unwrap().unwrap();
    assert_eq!(first.train_window.begin, 0);
    assert_eq!(first.train_window.end, 29);
    assert_eq!(first.train_ids.len(), 30);
    assert!(first.train_ids.iter().all(|&row| values[row] <= 29));
    // Ids come out in original row order
    assert!(first.train_ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_duplicate_timestamp_on_boundary_lands_in_both_windows() {
    // Sorted positions 29 and 30 both hold 29
    let mut values: Vec<i64> = (0..100).collect();
    values[30] = 29;
    let table = InMemoryTable::new("ts", values);
    let splitter = SlideWindowSplitter::new("ts", 3, 0.8).unwrap();

    let splits = splitter.split_all(&table).unwrap();
    let first = &splits[0];

    assert_eq!(first.train_window.end, 29);
    assert_eq!(first.test_window.begin, 29);
    assert_eq!(first.train_ids.len(), 31);
    assert_eq!(first.test_ids.len(), 11);
    assert_eq!(first.overlapping_ids(), vec![29, 30]);

    // The next fold's training window starts on the same duplicated value
    assert_eq!(splits[1].train_window.begin, 29);
    assert!(splits[1].train_ids.contains(&29));
    assert!(splits[1].train_ids.contains(&30));
}

#[test]
fn test_ratio_boundaries() {
    assert!(SlideWindowSplitter::new("ts", 5, 1.0).is_ok());
    assert!(matches!(
        SlideWindowSplitter::new("ts", 5, 0.0),
        Err(SlidecvError::Configuration(_))
    ));
    assert!(matches!(
        SlideWindowSplitter::new("ts", 5, 1.5),
        Err(SlidecvError::Configuration(_))
    ));
}

#[test]
fn test_undersized_datasets_fail_with_indexing_error() {
    let splitter = SlideWindowSplitter::new("ts", 5, 0.7).unwrap();

    assert!(matches!(splitter.split(&ascending(0)), Err(SlidecvError::Indexing(_))));
    assert!(matches!(splitter.split(&ascending(3)), Err(SlidecvError::Indexing(_))));
}

#[test]
fn test_unknown_column() {
    let splitter = SlideWindowSplitter::with_defaults("date");
    assert!(matches!(
        splitter.split(&ascending(100)),
        Err(SlidecvError::ColumnNotFound(_))
    ));
}
