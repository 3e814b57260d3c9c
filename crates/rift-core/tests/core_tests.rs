use rift_core::{
    EntryError, EntryKind, SyncConfig, SyncError, TreeEntry, ValidPathSet, relative_to_native,
    to_slash,
};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[test]
fn test_entry_rebase_matches_valid_set() {
    let entry = TreeEntry::new(
        "/work/app/src/main.rs",
        "src/main.rs",
        EntryKind::File {
            size: 12,
            modified: SystemTime::UNIX_EPOCH,
        },
        2,
    );

    let dest = Path::new("/backup/app");
    let mut valid = ValidPathSet::new();
    valid.insert(entry.rebase(dest));

    // A path built component by component is the same set member.
    assert!(valid.contains(&dest.join("src").join("main.rs")));
    assert!(!valid.contains(&dest.join("src")));
}

#[test]
fn test_relative_round_trip_through_native() {
    for relative in ["a", "a/b", "deep/er/file.txt"] {
        assert_eq!(to_slash(&relative_to_native(relative)), relative);
    }
}

#[test]
fn test_entry_kind_discrimination() {
    let file = EntryKind::File {
        size: 1,
        modified: SystemTime::now(),
    };
    assert!(file.is_file());
    assert!(!file.is_dir());
    assert!(!file.is_symlink());

    assert!(EntryKind::Directory.is_dir());
    assert!(EntryKind::Symlink.is_symlink());
    assert!(!EntryKind::Other.is_file());
}

#[test]
fn test_config_serde_defaults() {
    let config: SyncConfig =
        serde_json::from_str(r#"{"source": "/src", "destination": "/dest"}"#).unwrap();

    assert_eq!(config.source, PathBuf::from("/src"));
    assert!(config.exclude_patterns.is_empty());
    assert!(config.preserve_permissions);
    assert!(config.reject_overlap);

    let json = serde_json::to_value(config.with_patterns(["*.log"])).unwrap();
    assert_eq!(json["exclude_patterns"], serde_json::json!(["*.log"]));
    assert_eq!(json["reject_overlap"], serde_json::json!(true));
}

#[test]
fn test_error_messages_carry_paths() {
    let err = SyncError::Source(EntryError::io(
        PathBuf::from("/src/locked"),
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    ));
    assert_eq!(err.to_string(), "walking source: permission denied: /src/locked");

    let err = SyncError::Destination(EntryError::Walk {
        path: PathBuf::from("/dest/x"),
        message: "boom".to_string(),
    });
    assert_eq!(err.to_string(), "scanning destination: /dest/x: boom");
}
