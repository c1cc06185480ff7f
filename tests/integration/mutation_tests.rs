use dupekeep::actions::{
    clear_selection, repair_groups, ActionError, DeleteConfig, GroupMutator, TransferMode,
};
use dupekeep::duplicates::{DuplicateItem, GroupStats};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::TempDir;

fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn item(path: &Path, group: &str, checked: bool) -> DuplicateItem {
    let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    DuplicateItem::new(path, group)
        .with_size(size)
        .with_checked(checked)
}

#[test]
fn test_permanent_delete_removes_files_and_repairs() {
    let dir = TempDir::new().unwrap();
    let a1 = write_file(dir.path(), "a1.mp4", b"same content");
    let a2 = write_file(dir.path(), "a2.mp4", b"same content");
    let b1 = write_file(dir.path(), "b1.mp4", b"other");
    let b2 = write_file(dir.path(), "b2.mp4", b"other");

    let mut items = vec![
        item(&a1, "a", false),
        item(&a2, "a", true),
        item(&b1, "b", false),
        item(&b2, "b", false),
    ];

    let mutator = GroupMutator::from_config(&DeleteConfig::permanent());
    let report = mutator.delete(&mut items, true, None);

    assert!(a1.exists());
    assert!(!a2.exists());
    assert_eq!(report.deleted.len(), 1);
    assert_eq!(report.bytes_freed(), 12);
    // Group "a" is down to one member and collapses.
    assert_eq!(report.collapsed, vec![a1.clone()]);
    let remaining: Vec<&Path> = items.iter().map(|i| i.path.as_path()).collect();
    assert_eq!(remaining, vec![b1.as_path(), b2.as_path()]);
    assert!(!report.has_failures());
}

#[test]
fn test_delete_failure_still_removes_from_list() {
    let dir = TempDir::new().unwrap();
    let keep = write_file(dir.path(), "keep.mp4", b"x");
    let other = write_file(dir.path(), "other.mp4", b"x");
    let missing = dir.path().join("missing.mp4");

    let mut items = vec![
        item(&keep, "g", false),
        item(&other, "g", false),
        item(&missing, "g", true),
    ];

    let mutator = GroupMutator::from_config(&DeleteConfig::permanent());
    let report = mutator.delete(&mut items, true, None);

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, missing);
    assert_eq!(report.removed, vec![missing]);
    assert_eq!(items.len(), 2);
    assert!(report.collapsed.is_empty());
}

#[test]
fn test_interrupted_delete_still_repairs() {
    let dir = TempDir::new().unwrap();
    let a1 = write_file(dir.path(), "a1.mp4", b"a");
    let a2 = write_file(dir.path(), "a2.mp4", b"a");
    let solo = write_file(dir.path(), "solo.mp4", b"s");

    let mut items = vec![
        item(&a1, "a", false),
        item(&a2, "a", true),
        item(&solo, "lonely", false),
    ];

    let flag = Arc::new(AtomicBool::new(true));
    let mutator = GroupMutator::from_config(&DeleteConfig::permanent()).with_shutdown(flag);
    let report = mutator.delete(&mut items, true, None);

    assert!(report.interrupted);
    assert!(a2.exists());
    assert!(report.removed.is_empty());
    assert_eq!(report.collapsed, vec![solo]);
    assert_eq!(items.len(), 2);
}

#[test]
fn test_remove_from_list_leaves_disk_alone() {
    let dir = TempDir::new().unwrap();
    let a1 = write_file(dir.path(), "a1.mp4", b"a");
    let a2 = write_file(dir.path(), "a2.mp4", b"a");
    let a3 = write_file(dir.path(), "a3.mp4", b"a");

    let mut items = vec![
        item(&a1, "a", false),
        item(&a2, "a", true),
        item(&a3, "a", false),
    ];

    let report = GroupMutator::from_config(&DeleteConfig::default()).remove_from_list(&mut items);

    assert!(a2.exists());
    assert!(report.deleted.is_empty());
    assert_eq!(report.removed, vec![a2]);
    assert_eq!(items.len(), 2);
    assert_eq!(GroupStats::compute(&items).degenerate_groups, 0);
}

#[test]
fn test_clear_selection_preserves_membership() {
    let mut items = vec![
        DuplicateItem::new("/a", "g").with_checked(true),
        DuplicateItem::new("/b", "g"),
        DuplicateItem::new("/c", "h").with_checked(true),
    ];
    let before: Vec<PathBuf> = items.iter().map(|i| i.path.clone()).collect();

    assert_eq!(clear_selection(&mut items), 2);
    assert_eq!(clear_selection(&mut items), 0);

    let after: Vec<PathBuf> = items.iter().map(|i| i.path.clone()).collect();
    assert_eq!(before, after);
}

#[test]
fn test_repair_treats_same_path_as_one_member() {
    let mut items = vec![
        DuplicateItem::new("/same", "g"),
        DuplicateItem::new("/same", "g"),
        DuplicateItem::new("/x", "h"),
        DuplicateItem::new("/y", "h"),
    ];

    let collapsed = repair_groups(&mut items);

    assert_eq!(collapsed.len(), 2);
    assert!(items.iter().all(|i| i.group_id.as_str() == "h"));
}

#[test]
fn test_copy_selection_renames_on_collision() {
    let src = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let first_dir = src.path().join("one");
    let second_dir = src.path().join("two");
    fs::create_dir(&first_dir).unwrap();
    fs::create_dir(&second_dir).unwrap();
    let first = write_file(&first_dir, "clip.mp4", b"first");
    let second = write_file(&second_dir, "clip.mp4", b"second");

    let items = vec![item(&first, "g", true), item(&second, "g", true)];
    let report = GroupMutator::from_config(&DeleteConfig::default())
        .copy_selection(&items, dest.path(), None)
        .unwrap();

    assert!(report.all_succeeded());
    assert_eq!(report.bytes_transferred(), 11);
    assert_eq!(fs::read(dest.path().join("clip.mp4")).unwrap(), b"first");
    assert_eq!(fs::read(dest.path().join("clip (1).mp4")).unwrap(), b"second");
    assert!(first.exists());
    assert!(second.exists());
    assert!(report.summary(TransferMode::Copy).contains("2"));
}

#[test]
fn test_move_selection_creates_destination() {
    let src = TempDir::new().unwrap();
    let dest_root = TempDir::new().unwrap();
    let dest = dest_root.path().join("nested").join("out");
    let keep = write_file(src.path(), "keep.mp4", b"k");
    let moved = write_file(src.path(), "moved.mp4", b"m");

    let items = vec![item(&keep, "g", false), item(&moved, "g", true)];
    let report = GroupMutator::from_config(&DeleteConfig::default())
        .move_selection(&items, &dest, None)
        .unwrap();

    assert_eq!(report.successes.len(), 1);
    assert!(!moved.exists());
    assert!(keep.exists());
    assert!(dest.join("moved.mp4").exists());
}

#[test]
fn test_transfer_into_file_is_rejected() {
    let src = TempDir::new().unwrap();
    let file = write_file(src.path(), "a.mp4", b"a");
    let not_a_dir = write_file(src.path(), "target", b"");

    let items = vec![item(&file, "g", true)];
    let result = GroupMutator::from_config(&DeleteConfig::default())
        .copy_selection(&items, &not_a_dir, None);

    assert!(matches!(result, Err(ActionError::DestinationNotDirectory(_))));
}

#[test]
fn test_copy_failure_continues_batch() {
    let src = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let present = write_file(src.path(), "present.mp4", b"p");
    let missing = src.path().join("missing.mp4");

    let items = vec![
        DuplicateItem::new(&missing, "g").with_checked(true),
        item(&present, "g", true),
    ];
    let report = GroupMutator::from_config(&DeleteConfig::default())
        .copy_selection(&items, dest.path(), None)
        .unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.successes.len(), 1);
    assert!(dest.path().join("present.mp4").exists());
}
