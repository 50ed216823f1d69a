use std::fs;

use goshs::config::FilesConfig;
use goshs::files::overrides::{resolve, OverrideConfig, ResolveError, SENTINEL};
use tempfile::TempDir;

fn dir_with_sentinel(content: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(SENTINEL), content).unwrap();
    dir
}

#[test]
fn test_no_sentinel_yields_default() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<p>hi</p>").unwrap();
    fs::write(dir.path().join(".goshs.bak"), "{\"block\":true}").unwrap();

    assert_eq!(resolve(dir.path()).unwrap(), OverrideConfig::default());
}

#[test]
fn test_sentinel_fields_are_parsed() {
    let dir = dir_with_sentinel(r#"{"auth":"alice:secret","block":true,"listing":false,"upload":true}"#);

    let overrides = resolve(dir.path()).unwrap();

    assert_eq!(
        overrides,
        OverrideConfig {
            auth: Some("alice:secret".to_string()),
            block: true,
            listing: Some(false),
            upload: Some(true),
        }
    );
}

#[test]
fn test_missing_and_unknown_fields_are_tolerated() {
    let dir = dir_with_sentinel(r#"{"upload":true,"colour":"blue"}"#);

    let overrides = resolve(dir.path()).unwrap();

    assert_eq!(overrides.upload, Some(true));
    assert_eq!(overrides.auth, None);
    assert!(!overrides.block);
}

#[test]
fn test_invalid_json_is_a_parse_error() {
    let dir = dir_with_sentinel("{ not json");

    let err = resolve(dir.path()).unwrap_err();

    assert!(err.is_parse());
    assert!(matches!(err, ResolveError::Parse { ref path, .. } if path.ends_with(SENTINEL)));
}

#[test]
fn test_missing_directory_is_a_filesystem_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = resolve(&dir.path().join("gone")).unwrap_err();

    assert!(!err.is_parse());
    assert!(matches!(err, ResolveError::Io { ref source, .. } if source.kind() == std::io::ErrorKind::NotFound));
}

#[test]
fn test_unreadable_sentinel_is_a_filesystem_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join(SENTINEL)).unwrap();

    let err = resolve(dir.path()).unwrap_err();

    assert!(matches!(err, ResolveError::Io { .. }));
}

#[cfg(unix)]
#[test]
fn test_permission_denied_is_a_filesystem_error() {
    use std::os::unix::fs::PermissionsExt;

    // root ignores directory permissions
    if nix::unistd::geteuid().is_root() {
        return;
    }

    let dir = dir_with_sentinel("{ not json");
    fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o000)).unwrap();

    let result = resolve(dir.path());

    fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o755)).unwrap();
    let err = result.unwrap_err();
    assert!(matches!(err, ResolveError::Io { ref source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied));
}

#[test]
fn test_sentinel_in_subdirectory_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested").join(SENTINEL), "{\"block\":true}").unwrap();

    assert_eq!(resolve(dir.path()).unwrap(), OverrideConfig::default());
}

#[test]
fn test_resolution_is_repeatable() {
    let dir = dir_with_sentinel(r#"{"auth":"u:p"}"#);

    assert_eq!(resolve(dir.path()).unwrap(), resolve(dir.path()).unwrap());
}

#[test]
fn test_changes_on_disk_are_picked_up() {
    let dir = dir_with_sentinel(r#"{"block":false}"#);
    assert!(!resolve(dir.path()).unwrap().block);

    fs::write(dir.path().join(SENTINEL), r#"{"block":true}"#).unwrap();

    assert!(resolve(dir.path()).unwrap().block);
}

#[test]
fn test_merge_prefers_override_values() {
    let base = FilesConfig {
        upload: false,
        auth: Some("admin:admin".to_string()),
        ..FilesConfig::default()
    };
    let overrides = OverrideConfig {
        auth: Some("guest:guest".to_string()),
        listing: Some(false),
        upload: Some(true),
        block: false,
    };

    let effective = base.merge(&overrides);

    assert!(!effective.listing);
    assert!(effective.upload);
    assert_eq!(effective.auth.as_deref(), Some("guest:guest"));
    assert!(!effective.blocked);
}

#[test]
fn test_merge_with_default_override_keeps_server_settings() {
    let base = FilesConfig {
        auth: Some("admin:admin".to_string()),
        ..FilesConfig::default()
    };

    let effective = base.merge(&OverrideConfig::default());

    assert!(effective.listing);
    assert!(!effective.upload);
    assert_eq!(effective.auth.as_deref(), Some("admin:admin"));
}
