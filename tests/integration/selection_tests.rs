use dupekeep::duplicates::{
    DuplicateItem, DuplicateList, GroupId, PatternSelection, SelectionError, SelectionPolicy,
};
use std::collections::HashMap;
use std::time::Duration;

fn video(path: &str, group: &str) -> DuplicateItem {
    DuplicateItem::new(path, group)
        .with_size(1_000)
        .with_frame_size(1920 * 1080)
        .with_bitrate(4_000)
        .with_duration(Duration::from_secs(60))
        .with_fps(25.0)
        .with_audio_sample_rate(48_000)
}

fn checked_paths(items: &[DuplicateItem]) -> Vec<&str> {
    items
        .iter()
        .filter(|i| i.checked)
        .map(|i| i.path.to_str().unwrap())
        .collect()
}

/// Every group that had at least one flag written keeps an unchecked member.
fn assert_survivor_per_group(items: &[DuplicateItem]) {
    let mut survivors: HashMap<&GroupId, bool> = HashMap::new();
    for item in items {
        *survivors.entry(&item.group_id).or_default() |= !item.checked;
    }
    for (group, has_survivor) in survivors {
        assert!(has_survivor, "group {} lost every member", group);
    }
}

#[test]
fn test_identical_only_keeps_first_and_checks_copies() {
    let mut items = vec![
        video("/a/1.mp4", "g"),
        video("/a/2.mp4", "g"),
        video("/a/3.mp4", "g").with_bitrate(3_000),
    ];

    let summary = SelectionPolicy::IdenticalOnly.apply(&mut items);

    assert_eq!(checked_paths(&items), vec!["/a/2.mp4"]);
    assert_eq!(summary.groups_resolved, 1);
    assert_eq!(summary.items_checked, 1);
}

#[test]
fn test_identical_only_does_not_cross_groups() {
    let mut items = vec![video("/a/1.mp4", "g1"), video("/b/1.mp4", "g2")];
    let summary = SelectionPolicy::IdenticalOnly.apply(&mut items);

    assert!(checked_paths(&items).is_empty());
    assert_eq!(summary.groups_resolved, 0);
}

#[test]
fn test_identical_only_later_baseline_resolves_group() {
    // "/1" has no identical peer, so "/2" becomes the baseline.
    let mut items = vec![
        video("/1.mp4", "g").with_fps(30.0),
        video("/2.mp4", "g"),
        video("/3.mp4", "g"),
    ];
    SelectionPolicy::IdenticalOnly.apply(&mut items);

    assert_eq!(checked_paths(&items), vec!["/3.mp4"]);
    assert!(!items[0].checked);
}

#[test]
fn test_identical_ignoring_size_keeps_smallest() {
    let mut items = vec![
        video("/big.mp4", "g").with_size(3_000),
        video("/small.mp4", "g").with_size(1_000),
        video("/mid.mp4", "g").with_size(2_000),
    ];

    SelectionPolicy::IdenticalIgnoringSize.apply(&mut items);

    assert_eq!(checked_paths(&items), vec!["/big.mp4", "/mid.mp4"]);
    assert_survivor_per_group(&items);
}

#[test]
fn test_lowest_quality_duration_tie_falls_to_fps() {
    let mut items = vec![
        video("/slow.mp4", "g")
            .with_fps(24.0)
            .with_duration(Duration::from_millis(60_200)),
        video("/fast.mp4", "g")
            .with_fps(30.0)
            .with_duration(Duration::from_millis(60_900)),
    ];

    SelectionPolicy::LowestQuality.apply(&mut items);

    assert_eq!(checked_paths(&items), vec!["/slow.mp4"]);
}

#[test]
fn test_lowest_quality_longer_duration_wins_first() {
    let mut items = vec![
        video("/short.mp4", "g").with_bitrate(9_000),
        video("/long.mp4", "g").with_duration(Duration::from_secs(61)),
    ];

    SelectionPolicy::LowestQuality.apply(&mut items);

    assert_eq!(checked_paths(&items), vec!["/short.mp4"]);
}

#[test]
fn test_lowest_quality_ignores_different_frame_size() {
    let mut items = vec![
        video("/hd.mp4", "g"),
        video("/sd.mp4", "g").with_frame_size(640 * 480).with_bitrate(9_000),
    ];

    SelectionPolicy::LowestQuality.apply(&mut items);

    assert!(checked_paths(&items).is_empty());
}

#[test]
fn test_clear_all_then_rerun_is_deterministic() {
    let build = || {
        vec![
            video("/1.mp4", "a"),
            video("/2.mp4", "a"),
            video("/3.mp4", "b").with_size(10),
            video("/4.mp4", "b").with_size(5),
            video("/5.mp4", "c").with_bitrate(1),
        ]
    };

    for policy in [
        SelectionPolicy::IdenticalOnly,
        SelectionPolicy::IdenticalIgnoringSize,
        SelectionPolicy::LowestQuality,
    ] {
        let mut first = build();
        policy.apply(&mut first);

        let mut second = first.clone();
        SelectionPolicy::ClearAll.apply(&mut second);
        assert!(checked_paths(&second).is_empty());
        policy.apply(&mut second);

        assert_eq!(first, second, "policy {} not reproducible", policy.name());
        assert_survivor_per_group(&first);
    }
}

#[test]
fn test_pattern_selection_keeps_a_survivor() {
    let mut items = vec![
        video("/backup/1.mp4", "g"),
        video("/backup/2.mp4", "g"),
        video("/library/3.mp4", "h"),
        video("/backup/3.mp4", "h"),
    ];
    let policy = SelectionPolicy::PathPattern(PatternSelection::new("^/BACKUP/", false, true).unwrap());

    policy.apply(&mut items);

    assert_eq!(checked_paths(&items), vec!["/backup/1.mp4", "/backup/3.mp4"]);
    assert_survivor_per_group(&items);
}

#[test]
fn test_pattern_unselect() {
    let mut items = vec![
        video("/a/1.mp4", "g").with_checked(true),
        video("/b/2.mp4", "g").with_checked(true),
        video("/c/3.mp4", "g"),
    ];
    let policy = SelectionPolicy::PathPattern(PatternSelection::new("/a/", true, false).unwrap());

    let summary = policy.apply(&mut items);

    assert_eq!(checked_paths(&items), vec!["/b/2.mp4"]);
    assert_eq!(summary.items_unchecked, 1);
}

#[test]
fn test_invalid_pattern() {
    let result = PatternSelection::new("(unclosed", false, true);
    assert!(matches!(result, Err(SelectionError::InvalidPattern { .. })));
}

#[test]
fn test_policy_through_shared_list() {
    let list = DuplicateList::new(vec![video("/1.mp4", "g"), video("/2.mp4", "g")]);
    let reader = list.clone();

    list.apply_policy(&SelectionPolicy::IdenticalOnly);

    assert_eq!(reader.stats().checked_items, 1);
    assert!(list.set_checked(std::path::Path::new("/1.mp4"), true));
    assert_eq!(reader.stats().fully_checked_groups, 1);
}
