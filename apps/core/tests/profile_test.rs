mod support;

use std::path::{Path, PathBuf};

use foxmarks_core::profile::{locate_with_registry, ProfileError};
use support::{write_registry, ProfileBuilder};

fn profile_at(root: &Path, name: &str) -> PathBuf {
    let dir = root.join(name);
    ProfileBuilder::new().write_into(&dir);
    dir
}

#[test]
fn explicit_dir_with_places_store_wins() {
    let explicit = ProfileBuilder::new().build();
    let root = tempfile::tempdir().unwrap();
    let registry = root.path().join("profiles.ini");

    let located = locate_with_registry(Some(explicit.path()), &registry);

    assert_eq!(located.unwrap(), explicit.path());
}

#[test]
fn explicit_dir_without_store_falls_back_to_registry_default() {
    let root = tempfile::tempdir().unwrap();
    let release = profile_at(root.path(), "abcd.default-release");
    let registry = write_registry(root.path(), "abcd.default-release");
    let bogus = root.path().join("not-a-profile");
    std::fs::create_dir_all(&bogus).unwrap();

    let located = locate_with_registry(Some(&bogus), &registry).unwrap();

    assert_eq!(located, release);
}

#[test]
fn absolute_registry_path_is_used_verbatim() {
    let root = tempfile::tempdir().unwrap();
    let elsewhere = ProfileBuilder::new().build();
    let registry = root.path().join("profiles.ini");
    std::fs::write(
        &registry,
        format!(
            "[Profile0]\nName=default\nIsRelative=0\nPath={}\n",
            elsewhere.path().display()
        ),
    )
    .unwrap();

    let located = locate_with_registry(None, &registry).unwrap();

    assert_eq!(located, elsewhere.path());
}

#[test]
fn sibling_profiles_are_not_used_when_registry_is_missing() {
    let root = tempfile::tempdir().unwrap();
    profile_at(root.path(), "aaaa.other");
    profile_at(root.path(), "zzzz.default-release");

    let result = locate_with_registry(None, &root.path().join("profiles.ini"));

    assert!(matches!(result, Err(ProfileError::NotFound { .. })));
}

#[test]
fn empty_registry_is_not_found_even_with_a_profile_beside_it() {
    let root = tempfile::tempdir().unwrap();
    profile_at(root.path(), "x.default");
    let registry = root.path().join("profiles.ini");
    std::fs::write(&registry, "").unwrap();

    let result = locate_with_registry(None, &registry);

    assert!(matches!(result, Err(ProfileError::NotFound { .. })));
}

#[test]
fn registry_pointing_at_missing_dir_is_not_found() {
    let root = tempfile::tempdir().unwrap();
    profile_at(root.path(), "other.default-release");
    let registry = write_registry(root.path(), "gone.default");

    let result = locate_with_registry(None, &registry);

    assert!(matches!(result, Err(ProfileError::NotFound { .. })));
}
