use i18n_retrofit::{run_scan, scan, FileType, RetrofitError, ScanQuery};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("laravel-app")
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_run_scan_on_laravel_fixture() {
    let result = run_scan(ScanQuery::new(vec![fixture_path()])).unwrap();

    // vendor/ and storage/ are default exclusions for Laravel projects
    assert_eq!(result.total_files, 5);
    assert_eq!(result.by_file_type.get(&FileType::Php), Some(&2));
    assert_eq!(result.by_file_type.get(&FileType::Blade), Some(&2));
    assert_eq!(result.by_file_type.get(&FileType::Volt), Some(&1));
    assert_eq!(
        result.total_strings,
        result.candidates.len() + result.skipped.len()
    );

    let texts: Vec<_> = result.candidates.iter().map(|c| c.text.as_str()).collect();
    for expected in [
        "Profile updated successfully",
        "Welcome Home",
        "Log In",
        "Enter your email",
        "Settings saved",
        "Account Settings",
    ] {
        assert!(texts.contains(&expected), "missing candidate {:?}", expected);
    }
    assert!(!texts.contains(&"Vendor text here"));
    assert!(!texts.contains(&"Compiled text here"));
    assert!(!texts.contains(&"Premium member"));
}

#[test]
fn test_run_scan_without_default_exclusions() {
    let query = ScanQuery::new(vec![fixture_path()]).with_default_exclusions(false);
    let result = run_scan(query).unwrap();

    let texts: Vec<_> = result.candidates.iter().map(|c| c.text.as_str()).collect();
    assert!(texts.contains(&"Vendor text here"));
}

#[test]
fn test_results_are_deterministic() {
    let first = run_scan(ScanQuery::new(vec![fixture_path()])).unwrap();
    let second = run_scan(ScanQuery::new(vec![fixture_path()])).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_settings_file_discovered_in_scan_root() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "resources/views/a.blade.php", "<p>Visible text here</p>\n");
    write(temp_dir.path(), "resources/views/legacy/b.blade.php", "<p>Legacy text here</p>\n");
    write(
        temp_dir.path(),
        ".i18n-retrofit.json",
        r#"{"exclude_dirs": ["legacy"], "min_confidence": 60}"#,
    );

    let query = ScanQuery::new(vec![temp_dir.path().to_path_buf()]);
    assert_eq!(query.settings().unwrap().min_confidence, Some(60));

    let result = run_scan(query).unwrap();
    let texts: Vec<_> = result.candidates.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["Visible text here"]);
}

#[test]
fn test_query_level_errors() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "resources/views/a.blade.php", "<p>Some text here</p>\n");

    let bad_glob = ScanQuery::new(vec![temp_dir.path().to_path_buf()])
        .with_includes(vec!["resources/[".to_string()]);
    assert!(matches!(run_scan(bad_glob), Err(RetrofitError::InvalidGlob { .. })));

    write(temp_dir.path(), "broken.json", "{ not json");
    let bad_config = ScanQuery::new(vec![temp_dir.path().to_path_buf()])
        .with_config_file(temp_dir.path().join("broken.json"));
    assert!(matches!(run_scan(bad_config), Err(RetrofitError::InvalidConfig { .. })));
}

#[test]
fn test_unreadable_file_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "resources/views/ok.blade.php", "<p>Readable text</p>\n");
    fs::write(
        temp_dir.path().join("resources/views/binary.blade.php"),
        [0xff, 0xfe, 0x00, 0x80],
    )
    .unwrap();

    let result = scan(&[temp_dir.path().to_path_buf()], &[], &[]);
    assert_eq!(result.total_files, 1);
    assert_eq!(result.candidates.len(), 1);
}

#[test]
fn test_scan_paths_mix_files_and_dirs() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "views/a.blade.php", "<p>First text here</p>\n");
    write(temp_dir.path(), "views/b.blade.php", "<p>Second text here</p>\n");

    let result = scan(
        &[
            temp_dir.path().join("views"),
            temp_dir.path().join("views/a.blade.php"),
        ],
        &[],
        &[],
    );
    // a.blade.php is reached twice but reported once
    let texts: Vec<_> = result.candidates.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts.iter().filter(|t| **t == "First text here").count(), 1);
    assert!(texts.contains(&"Second text here"));
    assert_eq!(result.total_files, 2);
    assert_eq!(result.total_strings, 2);
}

#[test]
fn test_laravel_defaults_spare_similar_view_directories() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "artisan", "#!/usr/bin/env php\n");
    write(temp_dir.path(), "public/index.php", "<?php\n$title = 'Public entry text';\n");
    write(temp_dir.path(), "tests/Feature/views/a.blade.php", "<p>Test view text</p>\n");
    write(
        temp_dir.path(),
        "resources/views/publications/index.blade.php",
        "<h1>Latest publications</h1>\n",
    );
    write(
        temp_dir.path(),
        "resources/views/contests/show.blade.php",
        "<p>Contest rules apply</p>\n",
    );

    let result = run_scan(ScanQuery::new(vec![temp_dir.path().to_path_buf()])).unwrap();
    let mut texts: Vec<_> = result.candidates.iter().map(|c| c.text.as_str()).collect();
    texts.sort();
    assert_eq!(texts, vec!["Contest rules apply", "Latest publications"]);
    assert_eq!(result.total_files, 2);
}
