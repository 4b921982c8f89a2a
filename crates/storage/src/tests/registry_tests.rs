use std::sync::Mutex;

use helpdesk_core::{NoopHooks, SchemaHooks};

use crate::migrations::{self, Migration};
use crate::{AddCachedLabelsList, CreateCaptainTables};

#[test]
fn migrations_are_listed_oldest_first() {
    let versions: Vec<&str> = migrations::all().iter().map(|m| m.version()).collect();
    assert_eq!(versions, vec!["20231211010807", "20250104200055"]);

    let mut sorted = versions.clone();
    sorted.sort_unstable();
    assert_eq!(versions, sorted);
}

#[test]
fn versions_are_fourteen_digit_timestamps() {
    for migration in migrations::all() {
        let version = migration.version();
        assert_eq!(version.len(), 14, "{version}");
        assert!(version.bytes().all(|b| b.is_ascii_digit()), "{version}");
    }
}

#[test]
fn only_captain_tables_runs_outside_a_transaction() {
    assert!(AddCachedLabelsList.transactional());
    assert!(!CreateCaptainTables.transactional());
}

#[test]
fn names_are_snake_case() {
    assert_eq!(AddCachedLabelsList.name(), "add_cached_labels_list");
    assert_eq!(CreateCaptainTables.name(), "create_captain_tables");
}

#[derive(Default)]
struct RecordingHooks {
    calls: Mutex<Vec<String>>,
}

impl SchemaHooks for RecordingHooks {
    fn reset_column_information(&self, table: &str) {
        self.calls.lock().unwrap().push(format!("reset:{table}"));
    }

    fn register_label_cache(&self, table: &str) -> bool {
        self.calls.lock().unwrap().push(format!("label_cache:{table}"));
        true
    }
}

#[test]
fn noop_hooks_report_missing_label_cache() {
    assert!(!NoopHooks.register_label_cache("conversations"));
}

#[test]
fn custom_hooks_override_defaults() {
    let hooks = RecordingHooks::default();
    hooks.reset_column_information("conversations");
    assert!(hooks.register_label_cache("conversations"));
    assert_eq!(
        *hooks.calls.lock().unwrap(),
        vec!["reset:conversations".to_owned(), "label_cache:conversations".to_owned()]
    );
}
