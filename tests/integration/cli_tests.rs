use clap::Parser;
use dupekeep::cli::Cli;
use dupekeep::duplicates::DuplicateItem;
use dupekeep::error::ExitCode;
use dupekeep::session::Session;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// A session over real files: two identical copies in "a", two sizes in "b".
struct Fixture {
    dir: TempDir,
    session: PathBuf,
    config: PathBuf,
    files: Vec<PathBuf>,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let media = dir.path().join("media");
        fs::create_dir(&media).unwrap();

        let specs: [(&str, &str, &[u8]); 4] = [
            ("a1.mp4", "a", b"identical"),
            ("a2.mp4", "a", b"identical"),
            ("b1.mp4", "b", b"larger encoding"),
            ("b2.mp4", "b", b"small"),
        ];
        let mut files = Vec::new();
        let mut items = Vec::new();
        for (name, group, content) in specs {
            let path = media.join(name);
            fs::write(&path, content).unwrap();
            items.push(
                DuplicateItem::new(&path, group)
                    .with_size(content.len() as u64)
                    .with_frame_size(1920 * 1080)
                    .with_bitrate(4_000)
                    .with_fps(25.0),
            );
            files.push(path);
        }

        let session = dir.path().join("session.json");
        Session::new(items).save(&session).unwrap();

        let config = dir.path().join("config.toml");
        fs::write(&config, "show_progress = false\n").unwrap();

        Self {
            dir,
            session,
            config,
            files,
        }
    }

    fn run(&self, args: &[&str]) -> anyhow::Result<ExitCode> {
        let mut argv = vec![
            "dupekeep".to_string(),
            "--quiet".to_string(),
            "--config".to_string(),
            self.config.display().to_string(),
        ];
        argv.extend(args.iter().map(|a| a.to_string()));
        let cli = Cli::try_parse_from(argv).unwrap();
        dupekeep::run_app(cli)
    }

    fn session_arg(&self) -> &str {
        self.session.to_str().unwrap()
    }

    fn load(&self) -> Session {
        Session::load(&self.session).unwrap()
    }

    fn checked(&self) -> Vec<PathBuf> {
        self.load()
            .items
            .into_iter()
            .filter(|i| i.checked)
            .map(|i| i.path)
            .collect()
    }
}

#[test]
fn test_select_identical_writes_session() {
    let fx = Fixture::new();

    let code = fx
        .run(&["select", fx.session_arg(), "--policy", "identical"])
        .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(fx.checked(), vec![fx.files[1].clone()]);
}

#[test]
fn test_select_identical_ignoring_size_keeps_smallest() {
    let fx = Fixture::new();

    fx.run(&[
        "select",
        fx.session_arg(),
        "--policy",
        "identical-ignoring-size",
    ])
    .unwrap();

    // "a" ties on size and keeps its duplicate; "b" keeps the smaller file.
    assert_eq!(fx.checked(), vec![fx.files[0].clone(), fx.files[2].clone()]);
}

#[test]
fn test_select_pattern_and_unselect() {
    let fx = Fixture::new();

    fx.run(&["select", fx.session_arg(), "--pattern", r"B\d\.MP4$"])
        .unwrap();
    assert_eq!(fx.checked(), vec![fx.files[2].clone()]);

    fx.run(&[
        "select",
        fx.session_arg(),
        "--pattern",
        r"b1\.mp4$",
        "--case-sensitive",
        "--unselect",
    ])
    .unwrap();
    assert!(fx.checked().is_empty());
}

#[test]
fn test_select_invalid_pattern_fails() {
    let fx = Fixture::new();
    let before = fs::read_to_string(&fx.session).unwrap();

    let err = fx
        .run(&["select", fx.session_arg(), "--pattern", "[unclosed"])
        .unwrap_err();

    assert!(format!("{:#}", err).contains("invalid path pattern"));
    assert_eq!(fs::read_to_string(&fx.session).unwrap(), before);
}

#[test]
fn test_clear_unchecks_everything() {
    let fx = Fixture::new();
    fx.run(&["select", fx.session_arg(), "--policy", "identical"])
        .unwrap();

    let code = fx.run(&["clear", fx.session_arg()]).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(fx.checked().is_empty());
    assert_eq!(fx.load().items.len(), 4);
}

#[test]
fn test_delete_nothing_selected() {
    let fx = Fixture::new();

    let code = fx
        .run(&["delete", fx.session_arg(), "--permanent", "--yes"])
        .unwrap();

    assert_eq!(code, ExitCode::NothingSelected);
    assert!(fx.files.iter().all(|f| f.exists()));
}

#[test]
fn test_delete_permanent_repairs_session() {
    let fx = Fixture::new();
    fx.run(&["select", fx.session_arg(), "--policy", "identical"])
        .unwrap();

    let code = fx
        .run(&["delete", fx.session_arg(), "--permanent", "--yes"])
        .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(fx.files[0].exists());
    assert!(!fx.files[1].exists());

    // "a" lost its only peer and is dropped; "b" is intact.
    let remaining: Vec<PathBuf> = fx.load().items.into_iter().map(|i| i.path).collect();
    assert_eq!(remaining, vec![fx.files[2].clone(), fx.files[3].clone()]);
}

#[test]
fn test_delete_missing_file_is_partial_success() {
    let fx = Fixture::new();
    fx.run(&["select", fx.session_arg(), "--policy", "identical"])
        .unwrap();
    fs::remove_file(&fx.files[1]).unwrap();

    let code = fx
        .run(&["delete", fx.session_arg(), "--permanent", "--yes"])
        .unwrap();

    assert_eq!(code, ExitCode::PartialSuccess);
    assert!(fx.checked().is_empty());
}

#[test]
fn test_remove_keeps_files_on_disk() {
    let fx = Fixture::new();
    fx.run(&["select", fx.session_arg(), "--pattern", r"b1\.mp4$"])
        .unwrap();

    let code = fx.run(&["remove", fx.session_arg()]).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(fx.files[2].exists());
    // "b" collapses once b1 is gone.
    let remaining: Vec<PathBuf> = fx.load().items.into_iter().map(|i| i.path).collect();
    assert_eq!(remaining, vec![fx.files[0].clone(), fx.files[1].clone()]);
}

#[test]
fn test_remove_nothing_selected() {
    let fx = Fixture::new();
    let before = fs::read_to_string(&fx.session).unwrap();

    let code = fx.run(&["remove", fx.session_arg()]).unwrap();

    assert_eq!(code, ExitCode::NothingSelected);
    assert_eq!(fs::read_to_string(&fx.session).unwrap(), before);
}

#[test]
fn test_copy_and_move() {
    let fx = Fixture::new();
    let out = fx.dir.path().join("out");
    let out_arg = out.to_str().unwrap();

    assert_eq!(
        fx.run(&["copy", fx.session_arg(), out_arg]).unwrap(),
        ExitCode::NothingSelected
    );

    fx.run(&["select", fx.session_arg(), "--pattern", r"(a2|b2)\.mp4$"])
        .unwrap();
    let code = fx.run(&["copy", fx.session_arg(), out_arg]).unwrap();
    assert_eq!(code, ExitCode::Success);
    assert!(out.join("a2.mp4").exists());
    assert!(out.join("b2.mp4").exists());
    assert!(fx.files[1].exists());

    let code = fx.run(&["move", fx.session_arg(), out_arg]).unwrap();
    assert_eq!(code, ExitCode::Success);
    assert!(out.join("a2 (1).mp4").exists());
    assert!(!fx.files[1].exists());
    // The session still lists the moved paths.
    assert_eq!(fx.load().items.len(), 4);
}

#[test]
fn test_transfer_onto_file_fails() {
    let fx = Fixture::new();
    fx.run(&["select", fx.session_arg(), "--policy", "identical"])
        .unwrap();

    let target = fx.files[0].to_str().unwrap();
    assert!(fx.run(&["copy", fx.session_arg(), target]).is_err());
}

#[test]
fn test_export_formats() {
    let fx = Fixture::new();
    fx.run(&["select", fx.session_arg(), "--policy", "identical"])
        .unwrap();

    for (format, needle) in [
        ("json", "\"checked\": true"),
        ("csv", "group_id,path,size_bytes"),
        ("html", "<!DOCTYPE html>"),
    ] {
        let output = fx.dir.path().join(format!("report.{}", format));
        let code = fx
            .run(&[
                "export",
                fx.session_arg(),
                "--format",
                format,
                "--output",
                output.to_str().unwrap(),
            ])
            .unwrap();

        assert_eq!(code, ExitCode::Success);
        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains(needle), "{} report missing {}", format, needle);
    }
}

#[test]
fn test_list_succeeds() {
    let fx = Fixture::new();
    let code = fx
        .run(&["list", fx.session_arg(), "--checked-only"])
        .unwrap();
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_corrupted_session_is_an_error() {
    let fx = Fixture::new();
    fs::write(&fx.session, "{ not json").unwrap();

    let err = fx.run(&["list", fx.session_arg()]).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse session envelope"));
}

#[test]
fn test_missing_config_file_is_an_error() {
    let fx = Fixture::new();
    let cli = Cli::try_parse_from([
        "dupekeep",
        "--config",
        fx.dir.path().join("absent.toml").to_str().unwrap(),
        "list",
        fx.session_arg(),
    ])
    .unwrap();

    assert!(dupekeep::run_app(cli).is_err());
}

#[test]
fn test_session_path_is_a_directory() {
    let fx = Fixture::new();
    let dir_arg: &Path = fx.dir.path();
    assert!(fx.run(&["list", dir_arg.to_str().unwrap()]).is_err());
}
