use dupekeep::duplicates::{DuplicateItem, SelectionPolicy};
use dupekeep::session::{Session, SESSION_VERSION};
use sha2::{Digest, Sha256};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

fn sample_items() -> Vec<DuplicateItem> {
    vec![
        DuplicateItem::new("/videos/a.mp4", "g1")
            .with_size(1_048_576)
            .with_frame_size(1280 * 720)
            .with_bitrate(2_500)
            .with_duration(Duration::from_millis(95_250))
            .with_fps(29.97)
            .with_audio_sample_rate(44_100),
        DuplicateItem::new("/videos/copy/a.mp4", "g1")
            .with_size(1_048_576)
            .with_frame_size(1280 * 720)
            .with_bitrate(2_500)
            .with_duration(Duration::from_millis(95_250))
            .with_fps(29.97)
            .with_audio_sample_rate(44_100),
        DuplicateItem::new("/pictures/p.jpg", "g2")
            .with_size(4_096)
            .with_frame_size(800 * 600)
            .with_image(true),
        DuplicateItem::new("/pictures/p (2).jpg", "g2")
            .with_size(4_096)
            .with_frame_size(800 * 600)
            .with_image(true),
    ]
}

#[test]
fn test_session_workflow_full() {
    let dir = tempdir().unwrap();
    let session_path = dir.path().join("session.json");

    // 1. Scan output arrives as a session
    Session::new(sample_items()).save(&session_path).unwrap();

    // 2. Apply a policy and write it back
    let mut session = Session::load(&session_path).unwrap();
    let summary = SelectionPolicy::IdenticalOnly.apply(&mut session.items);
    assert_eq!(summary.groups_resolved, 2);
    session.save(&session_path).unwrap();

    // 3. Reload and verify the flags survived
    let loaded = Session::load(&session_path).unwrap();
    assert_eq!(loaded, session);
    let checked: Vec<bool> = loaded.items.iter().map(|i| i.checked).collect();
    assert_eq!(checked, vec![false, true, false, true]);
    assert_eq!(loaded.items[0].fps, 29.97);
    assert_eq!(loaded.items[0].duration, Duration::from_millis(95_250));
}

#[test]
fn test_session_tampered_content() {
    let dir = tempdir().unwrap();
    let session_path = dir.path().join("session.json");
    Session::new(sample_items()).save(&session_path).unwrap();

    let content = fs::read_to_string(&session_path).unwrap();
    let tampered = content.replacen("\"checked\":false", "\"checked\":true", 1);
    assert_ne!(content, tampered);
    fs::write(&session_path, tampered).unwrap();

    let err = Session::load(&session_path).unwrap_err();
    assert!(err.to_string().contains("checksum mismatch"));
}

#[test]
fn test_session_truncated_file() {
    let dir = tempdir().unwrap();
    let session_path = dir.path().join("session.json");
    Session::new(sample_items()).save(&session_path).unwrap();

    let content = fs::read_to_string(&session_path).unwrap();
    fs::write(&session_path, &content[..content.len() / 2]).unwrap();

    let err = Session::load(&session_path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse session envelope"));
}

#[test]
fn test_session_missing_file() {
    let dir = tempdir().unwrap();
    let err = Session::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to read session file"));
}

#[test]
fn test_session_version_is_current() {
    let session = Session::new(Vec::new());
    assert_eq!(session.version, SESSION_VERSION);

    let json = session.to_json().unwrap();
    let loaded = Session::from_json(&json).unwrap();
    assert!(loaded.items.is_empty());
    assert_eq!(loaded.created_at, session.created_at);
}

#[test]
fn test_session_into_list_shares_state() {
    let list = Session::new(sample_items()).into_list();
    list.apply_policy(&SelectionPolicy::IdenticalOnly);

    let stats = list.stats();
    assert_eq!(stats.groups, 2);
    assert_eq!(stats.checked_items, 2);
    assert_eq!(stats.reclaimable_space, 1_048_576 + 4_096);
}

/// Envelope written by another tool: checksum over its own payload text.
fn external_envelope(payload: &str) -> String {
    let checksum = format!("{:x}", Sha256::digest(payload.as_bytes()));
    format!("{{\n  \"checksum\": \"{}\",\n  \"session\": {}\n}}", checksum, payload)
}

#[test]
fn test_session_written_by_scan_stage_with_minimal_items() {
    let dir = tempdir().unwrap();
    let session_path = dir.path().join("session.json");
    let payload = r#"{"version":1,"created_at":"2024-05-01T10:00:00Z","items":[{"path":"/a.mp4","group_id":"g","size_bytes":10},{"path":"/b.mp4","group_id":"g","size_bytes":10}]}"#;
    fs::write(&session_path, external_envelope(payload)).unwrap();

    let mut session = Session::load(&session_path).unwrap();
    assert_eq!(session.items.len(), 2);
    assert_eq!(session.items[1].duration, Duration::ZERO);
    assert!(session.items.iter().all(|i| !i.checked));

    // Identical in every metric once the defaults are filled in.
    SelectionPolicy::IdenticalOnly.apply(&mut session.items);
    assert!(session.items[1].checked);

    // Written back in this crate's own form and still loadable.
    session.save(&session_path).unwrap();
    assert_eq!(Session::load(&session_path).unwrap(), session);
}

#[test]
fn test_session_written_by_scan_stage_with_wide_fps() {
    let payload = r#"{"version":1,"created_at":"2024-05-01T10:00:00Z","items":[{"path":"/a.mp4","group_id":"g","size_bytes":10,"frame_size":2073600,"bitrate_kbps":4000,"duration_ms":60000,"fps":29.97002997,"audio_sample_rate":48000,"is_image":false,"checked":true}]}"#;

    let session = Session::from_json(&external_envelope(payload)).unwrap();

    assert!((session.items[0].fps - 29.97).abs() < 0.001);
    assert!(session.items[0].checked);
}

#[test]
fn test_session_written_by_scan_stage_with_wrong_checksum() {
    let payload = r#"{"version":1,"created_at":"2024-05-01T10:00:00Z","items":[]}"#;
    let envelope = external_envelope(payload).replace("\"items\":[]", "\"items\": []");

    let err = Session::from_json(&envelope).unwrap_err();
    assert!(err.to_string().contains("checksum mismatch"));
}
