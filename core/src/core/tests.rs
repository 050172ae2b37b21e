use super::*;
use crate::types::TimeLimit;
use std::time::Duration;
use tempfile::TempDir;

mod common {
    use super::*;

    pub(super) const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    pub(super) fn create_test_config(temp_dir: &TempDir, backend: BackendKind) -> Config {
        Config {
            base_path: temp_dir.path().to_path_buf(),
            backend,
            retention: Retention::from_days(5),
        }
    }

    pub(super) fn create_test_store(
        backend: BackendKind,
    ) -> (RecoveryStore<Box<dyn Backend + Send>>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = RecoveryStore::open(&create_test_config(&temp_dir, backend)).unwrap();
        (store, temp_dir)
    }

    pub(super) fn make_key(s: &str) -> IssueKey {
        IssueKey::try_from(s).unwrap()
    }

    pub(super) fn make_snapshot(issue: &str, saved_at: SystemTime) -> Snapshot {
        Snapshot {
            issue: make_key(issue),
            elapsed: Duration::from_secs(600),
            started_at: saved_at - Duration::from_secs(660),
            accumulated_pause: Duration::from_secs(60),
            saved_at,
            limit: None,
        }
    }

    /// Backend whose every operation fails.
    pub(super) struct FailingBackend;

    fn failure() -> BackendError {
        BackendError::FileStorage(FileStorageError::Io(std::io::Error::other("disk full")))
    }

    impl Backend for FailingBackend {
        fn put_snapshot(&mut self, _: &str, _: &Snapshot) -> Result<(), BackendError> {
            Err(failure())
        }

        fn get_snapshot(&self, _: &str) -> Result<Option<Snapshot>, BackendError> {
            Err(failure())
        }

        fn remove_snapshot(&mut self, _: &str) -> Result<bool, BackendError> {
            Err(failure())
        }

        fn load_history(&self) -> Result<Vec<IssueKey>, BackendError> {
            Err(failure())
        }

        fn save_history(&mut self, _: &[IssueKey]) -> Result<(), BackendError> {
            Err(failure())
        }
    }
}

mod save_load {
    use super::common::*;
    use super::*;

    #[test]
    fn test_round_trip_both_backends() {
        for kind in [BackendKind::Database, BackendKind::Files] {
            let (mut store, _temp) = create_test_store(kind);
            let now = SystemTime::now();
            let mut snapshot = make_snapshot("UE-1", now);
            snapshot.limit = Some(TimeLimit::from_minutes(30).unwrap());

            assert!(store.save(&snapshot));

            assert_eq!(store.load(&make_key("UE-1"), now), Some(snapshot), "{kind}");
        }
    }

    #[test]
    fn test_save_overwrites() {
        let (mut store, _temp) = create_test_store(BackendKind::Database);
        let now = SystemTime::now();
        let first = make_snapshot("UE-1", now);
        let mut second = first.clone();
        second.elapsed = Duration::from_secs(1200);

        store.save(&first);
        store.save(&second);

        assert_eq!(store.load(&make_key("UE-1"), now), Some(second));
    }

    #[test]
    fn test_load_missing_is_none() {
        let (mut store, _temp) = create_test_store(BackendKind::Files);
        assert_eq!(store.load(&make_key("UE-404"), SystemTime::now()), None);
    }

    #[test]
    fn test_snapshots_are_per_issue() {
        let (mut store, _temp) = create_test_store(BackendKind::Database);
        let now = SystemTime::now();
        store.save(&make_snapshot("UE-1", now));
        store.save(&make_snapshot("UE-2", now));

        store.delete(&make_key("UE-1"));

        assert_eq!(store.load(&make_key("UE-1"), now), None);
        assert!(store.load(&make_key("UE-2"), now).is_some());
    }

    #[test]
    fn test_similar_keys_do_not_cross_load() {
        let (mut store, _temp) = create_test_store(BackendKind::Files);
        let now = SystemTime::now();
        store.save(&make_snapshot("UE/1", now));

        assert_eq!(store.load(&make_key("UE:1"), now), None);
        assert_eq!(store.load(&make_key("UE_1"), now), None);
        assert!(store.load(&make_key("UE/1"), now).is_some());
    }

    #[test]
    fn test_similar_keys_keep_separate_snapshots() {
        for kind in [BackendKind::Database, BackendKind::Files] {
            let (mut store, _temp) = create_test_store(kind);
            let now = SystemTime::now();
            let slash = make_snapshot("UE-1/2", now);
            let mut underscore = make_snapshot("UE-1_2", now);
            underscore.elapsed = Duration::from_secs(5);

            store.save(&slash);
            store.save(&underscore);
            assert_eq!(store.load(&make_key("UE-1/2"), now), Some(slash.clone()), "{kind}");

            store.delete(&make_key("UE-1_2"));
            store.delete(&make_key("UE 1/2"));
            assert_eq!(store.load(&make_key("UE-1/2"), now), Some(slash), "{kind}");
            assert_eq!(store.load(&make_key("UE-1_2"), now), None, "{kind}");
        }
    }

    #[test]
    fn test_corrupt_file_is_absent_and_kept() {
        let temp_dir = TempDir::new().unwrap();
        let config = create_test_config(&temp_dir, BackendKind::Files);
        let mut store = RecoveryStore::open(&config).unwrap();
        let path = config
            .snapshots_path()
            .join("saved_timer_UE-1.json");
        std::fs::write(&path, "garbage").unwrap();

        assert_eq!(store.load(&make_key("UE-1"), SystemTime::now()), None);
        assert!(path.exists());
    }
}

mod expiry {
    use super::common::*;
    use super::*;

    #[test]
    fn test_just_inside_retention_loads() {
        let (mut store, _temp) = create_test_store(BackendKind::Database);
        let saved_at = SystemTime::now();
        store.save(&make_snapshot("UE-1", saved_at));

        let now = saved_at + 5 * DAY - Duration::from_secs(1);
        assert!(store.load(&make_key("UE-1"), now).is_some());
    }

    #[test]
    fn test_exactly_at_retention_loads() {
        let (mut store, _temp) = create_test_store(BackendKind::Database);
        let saved_at = SystemTime::now();
        store.save(&make_snapshot("UE-1", saved_at));

        assert!(store.load(&make_key("UE-1"), saved_at + 5 * DAY).is_some());
    }

    #[test]
    fn test_expired_is_purged() {
        for kind in [BackendKind::Database, BackendKind::Files] {
            let (mut store, _temp) = create_test_store(kind);
            let saved_at = SystemTime::now();
            store.save(&make_snapshot("UE-1", saved_at));

            let later = saved_at + 5 * DAY + Duration::from_secs(1);
            assert_eq!(store.load(&make_key("UE-1"), later), None, "{kind}");

            // Gone even when asked at the original time.
            assert_eq!(store.load(&make_key("UE-1"), saved_at), None, "{kind}");
        }
    }

    #[test]
    fn test_future_saved_at_is_not_expired() {
        let (mut store, _temp) = create_test_store(BackendKind::Files);
        let now = SystemTime::now();
        store.save(&make_snapshot("UE-1", now + DAY));

        assert!(store.load(&make_key("UE-1"), now).is_some());
    }

    #[test]
    fn test_configured_retention_is_used() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = create_test_config(&temp_dir, BackendKind::Database);
        config.retention = Retention::from_days(1);
        let mut store = RecoveryStore::open(&config).unwrap();
        let saved_at = SystemTime::now();
        store.save(&make_snapshot("UE-1", saved_at));

        assert_eq!(store.retention(), Retention::from_days(1));
        assert_eq!(store.load(&make_key("UE-1"), saved_at + 2 * DAY), None);
    }
}

mod delete {
    use super::common::*;
    use super::*;

    #[test]
    fn test_delete_is_idempotent() {
        let (mut store, _temp) = create_test_store(BackendKind::Files);
        let now = SystemTime::now();
        store.save(&make_snapshot("UE-1", now));

        store.delete(&make_key("UE-1"));
        store.delete(&make_key("UE-1"));

        assert_eq!(store.load(&make_key("UE-1"), now), None);
    }

    #[test]
    fn test_delete_missing_is_fine() {
        let (mut store, _temp) = create_test_store(BackendKind::Database);
        store.delete(&make_key("UE-404"));
    }
}

mod history {
    use super::common::*;
    use super::*;

    #[test]
    fn test_history_persists_across_reopen() {
        for kind in [BackendKind::Database, BackendKind::Files] {
            let temp_dir = TempDir::new().unwrap();
            let config = create_test_config(&temp_dir, kind);
            let history = IssueHistory::from_keys([make_key("UE-1"), make_key("UE-2")]);

            {
                let mut store = RecoveryStore::open(&config).unwrap();
                assert!(store.save_history(&history));
            }

            let store = RecoveryStore::open(&config).unwrap();
            assert_eq!(store.load_history(), history, "{kind}");
        }
    }

    #[test]
    fn test_empty_history_by_default() {
        let (store, _temp) = create_test_store(BackendKind::Database);
        assert!(store.load_history().is_empty());
    }
}

mod failures {
    use super::common::*;
    use super::*;

    #[test]
    fn test_failures_are_swallowed() {
        let mut store = RecoveryStore::new(FailingBackend, Retention::default());
        let now = SystemTime::now();

        assert!(!store.save(&make_snapshot("UE-1", now)));
        assert_eq!(store.load(&make_key("UE-1"), now), None);
        store.delete(&make_key("UE-1"));
        assert!(store.load_history().is_empty());
        assert!(!store.save_history(&IssueHistory::new()));
    }
}
