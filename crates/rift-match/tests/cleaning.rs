//! Property tests for construction-time value cleaning.

use proptest::prelude::*;
use rift_match::uri::normalize_path;
use rift_match::{FieldPattern, Lookup, QueryParams, RequestParts};

proptest! {
    #[test]
    fn prop_path_cleaning_is_idempotent(path in "[a-zA-Z0-9/._~%-]{0,24}") {
        let once = normalize_path(&path);
        prop_assert!(once.starts_with('/'));
        prop_assert_eq!(normalize_path(&once), once.clone());
        prop_assert_eq!(
            FieldPattern::path(path.as_str(), Lookup::Equal).unwrap(),
            FieldPattern::path(once.as_str(), Lookup::Equal).unwrap()
        );
    }

    #[test]
    fn prop_relative_and_rooted_paths_are_equal(segment in "[a-z0-9]{1,12}") {
        prop_assert_eq!(
            FieldPattern::path(segment.as_str(), Lookup::Equal).unwrap(),
            FieldPattern::path(format!("/{segment}"), Lookup::Equal).unwrap()
        );
    }

    #[test]
    fn prop_request_path_agrees_with_path_cleaning(path in "[a-zA-Z0-9é._ -][a-zA-Z0-9é/._ -]{0,23}") {
        let request = RequestParts::new("GET", &format!("https://x.y/{path}")).unwrap();
        let pattern = FieldPattern::path(format!("/{path}"), Lookup::Equal).unwrap();
        prop_assert!(pattern.matches(&request).is_match(), "{} against {}", pattern, request.path);
    }

    #[test]
    fn prop_host_cleaning_ignores_case(host in "[a-zA-Z]{1,10}\\.[a-zA-Z]{2,3}") {
        prop_assert_eq!(
            FieldPattern::host(&host),
            FieldPattern::host(host.to_lowercase())
        );
        let request = RequestParts::new("GET", &format!("https://{}/", host.to_uppercase())).unwrap();
        prop_assert!(FieldPattern::host(&host).matches(&request).is_match());
    }

    #[test]
    fn prop_params_match_any_superset(
        key in "[a-z]{1,6}",
        value in "[a-z0-9]{1,6}",
        extra in "[a-z]{1,6}",
    ) {
        let pattern = FieldPattern::params([(key.as_str(), value.as_str())]).unwrap();
        let query = QueryParams::from_pairs([(extra.as_str(), "x"), (key.as_str(), value.as_str())]);
        let request = RequestParts::new("GET", &format!("https://foo.bar/?{query}")).unwrap();
        prop_assert!(pattern.matches(&request).is_match());
    }
}
