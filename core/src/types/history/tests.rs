use super::*;

mod common {
    use super::*;

    pub(super) fn make_key(s: &str) -> IssueKey {
        IssueKey::try_from(s).unwrap()
    }

    pub(super) fn make_history(keys: &[&str]) -> IssueHistory {
        IssueHistory::from_keys(keys.iter().map(|k| make_key(k)))
    }
}

mod record {
    use super::common::{make_history, make_key};
    use super::*;

    #[test]
    fn test_record_appends_in_first_seen_order() {
        let mut history = IssueHistory::new();
        assert!(history.record(make_key("UE-1")));
        assert!(history.record(make_key("UE-2")));

        let keys: Vec<&str> = history.iter().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["UE-1", "UE-2"]);
    }

    #[test]
    fn test_record_ignores_duplicates() {
        let mut history = make_history(&["UE-1", "UE-2"]);

        assert!(!history.record(make_key("UE-1")));
        assert_eq!(history.len(), 2);
        assert_eq!(history.as_slice()[0], make_key("UE-1"));
    }

    #[test]
    fn test_from_keys_deduplicates() {
        let history = make_history(&["UE-3", "UE-1", "UE-3", "UE-2", "UE-1"]);

        let keys: Vec<&str> = history.iter().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["UE-3", "UE-1", "UE-2"]);
    }

    #[test]
    fn test_contains() {
        let history = make_history(&["UE-1"]);
        assert!(history.contains(&make_key("UE-1")));
        assert!(!history.contains(&make_key("UE-2")));
    }
}

mod recall {
    use super::common::make_history;
    use super::*;

    #[test]
    fn test_previous_on_empty_history() {
        let mut history = IssueHistory::new();
        assert_eq!(history.recall_previous(), None);
        assert_eq!(history.recalled(), None);
    }

    #[test]
    fn test_previous_walks_from_newest_to_oldest() {
        let mut history = make_history(&["UE-1", "UE-2", "UE-3"]);

        assert_eq!(history.recall_previous().unwrap().as_str(), "UE-3");
        assert_eq!(history.recall_previous().unwrap().as_str(), "UE-2");
        assert_eq!(history.recall_previous().unwrap().as_str(), "UE-1");
        // Stays on the oldest entry.
        assert_eq!(history.recall_previous().unwrap().as_str(), "UE-1");
    }

    #[test]
    fn test_next_without_navigation_does_nothing() {
        let mut history = make_history(&["UE-1", "UE-2"]);
        assert_eq!(history.recall_next(), None);
        assert_eq!(history.recalled(), None);
    }

    #[test]
    fn test_next_past_newest_ends_navigation() {
        let mut history = make_history(&["UE-1", "UE-2"]);

        history.recall_previous();
        history.recall_previous();
        assert_eq!(history.recall_next().unwrap().as_str(), "UE-2");
        assert_eq!(history.recall_next(), None);
        assert_eq!(history.recalled(), None);

        // Navigation restarts from the newest entry.
        assert_eq!(history.recall_previous().unwrap().as_str(), "UE-2");
    }

    #[test]
    fn test_reset_recall() {
        let mut history = make_history(&["UE-1", "UE-2"]);
        history.recall_previous();
        history.reset_recall();

        assert_eq!(history.recalled(), None);
        assert_eq!(history.recall_previous().unwrap().as_str(), "UE-2");
    }
}
