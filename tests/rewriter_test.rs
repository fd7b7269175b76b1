use i18n_retrofit::{analyze, scan, ApprovedChange, ChangeLocation, Rewriter};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const LOGIN: &str = include_str!("fixtures/laravel-app/resources/views/auth/login.blade.php");

fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn login_change() -> ApprovedChange {
    ApprovedChange {
        id: "c1".to_string(),
        key: "auth.buttons.login".to_string(),
        value: "Log In".to_string(),
        params: Vec::new(),
        locations: vec![ChangeLocation {
            file: PathBuf::from("auth/login"),
            line: 12,
        }],
        original: None,
    }
}

#[test]
fn test_apply_button_change_by_view_name() {
    let temp_dir = TempDir::new().unwrap();
    let path = write(temp_dir.path(), "auth/login.blade.php", LOGIN);

    let result = Rewriter::new()
        .base_dir(temp_dir.path())
        .apply(&[login_change()]);

    assert!(result.success);
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].changes_applied, 1);
    assert_eq!(result.applied_ids(), vec!["c1".to_string()]);

    let content = fs::read_to_string(&path).unwrap();
    let line_12 = content.lines().nth(11).unwrap();
    assert_eq!(line_12, "        <button>{{ __('auth.buttons.login') }}</button>");
    // every other line is untouched
    for (before, after) in LOGIN.lines().zip(content.lines()).filter(|(b, _)| !b.contains("Log In")) {
        assert_eq!(before, after);
    }
}

#[test]
fn test_apply_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let path = write(temp_dir.path(), "auth/login.blade.php", LOGIN);
    let rewriter = Rewriter::new().base_dir(temp_dir.path());

    let first = rewriter.apply(&[login_change()]);
    assert!(first.total_changes >= 1);
    let after_first = fs::read_to_string(&path).unwrap();

    let second = rewriter.apply(&[login_change()]);
    assert!(second.success);
    assert_eq!(second.total_changes, 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), after_first);
}

#[test]
fn test_one_failing_file_does_not_block_others() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "auth/login.blade.php", LOGIN);

    let mut missing = login_change();
    missing.id = "c2".to_string();
    missing.locations[0].file = PathBuf::from("auth/register");

    let result = Rewriter::new()
        .base_dir(temp_dir.path())
        .apply(&[login_change(), missing]);

    assert!(!result.success);
    assert_eq!(result.total_changes, 1);
    let failed: Vec<_> = result.files.iter().filter(|f| !f.success).collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].error.as_deref().unwrap().contains("File not found"));
}

#[test]
fn test_scan_analyze_apply_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = write(temp_dir.path(), "resources/views/auth/login.blade.php", LOGIN);
    let roots = [temp_dir.path().to_path_buf()];

    let before = scan(&roots, &[], &[]);
    assert_eq!(before.candidates.len(), 4);

    let changes: Vec<ApprovedChange> = analyze(&before.candidates)
        .iter()
        .map(ApprovedChange::from)
        .collect();
    let result = Rewriter::new().apply(&changes);
    assert!(result.success);
    assert_eq!(result.total_changes, 4);

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("<button>{{ __('auth.login.buttons.login') }}</button>"));
    assert!(content.contains("placeholder=\"{{ __('auth.login.placeholders."));

    // nothing left to translate once every candidate is applied
    let after = scan(&roots, &[], &[]);
    assert!(after.candidates.is_empty(), "left over: {:?}", after.candidates);
}

#[test]
fn test_text_with_echoes_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = write(
        temp_dir.path(),
        "resources/views/dashboard.blade.php",
        "<div>\n    <p>Hello {{ $user->name }}, you have {{ $count }} new messages</p>\n</div>\n",
    );
    let roots = [temp_dir.path().to_path_buf()];

    let before = scan(&roots, &[], &[]);
    assert_eq!(before.candidates.len(), 1);
    let keyed = analyze(&before.candidates);
    assert_eq!(keyed[0].value, "Hello :name, you have :count new messages");

    let changes: Vec<ApprovedChange> = keyed.iter().map(ApprovedChange::from).collect();
    let result = Rewriter::new().apply(&changes);
    assert_eq!(result.total_changes, 1);

    let content = fs::read_to_string(&path).unwrap();
    let line = content.lines().nth(1).unwrap();
    assert!(line.starts_with("    <p>{{ __('"), "{}", line);
    assert!(line.ends_with("', ['name' => $user->name, 'count' => $count]) }}</p>"), "{}", line);

    let after = scan(&roots, &[], &[]);
    assert!(after.candidates.is_empty(), "left over: {:?}", after.candidates);
}

#[test]
fn test_dry_run_reports_without_writing() {
    let temp_dir = TempDir::new().unwrap();
    let path = write(temp_dir.path(), "auth/login.blade.php", LOGIN);

    let result = Rewriter::new()
        .base_dir(temp_dir.path())
        .dry_run(true)
        .apply(&[login_change()]);

    assert_eq!(result.total_changes, 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), LOGIN);
}

#[test]
fn test_changes_from_json_batch() {
    let temp_dir = TempDir::new().unwrap();
    let path = write(
        temp_dir.path(),
        "app/Http/Controllers/ProfileController.php",
        "<?php\nreturn back()->with('success', 'Profile updated successfully');\n",
    );
    let json = r#"[{"id": "p1", "key": "profile.messages.success.updated",
                    "value": "Profile updated successfully", "params": [],
                    "locations": [{"file": "app/Http/Controllers/ProfileController.php", "line": 2}]}]"#;

    let changes = ApprovedChange::from_json(json).unwrap();
    let result = Rewriter::new().base_dir(temp_dir.path()).apply(&changes);

    assert!(result.success);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "<?php\nreturn back()->with('success', __('profile.messages.success.updated'));\n"
    );
}
