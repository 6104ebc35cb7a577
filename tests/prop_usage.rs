use crud_usage::explain::ExplainVerbosity;
use crud_usage::usage;
use proptest::prelude::*;

proptest! {
    #[test]
    fn verbosity_round_trips_through_its_name(idx in 0usize..3, upper in any::<bool>()) {
        let v = ExplainVerbosity::ALL[idx];
        let text = if upper { v.as_str().to_ascii_uppercase() } else { v.to_string() };
        prop_assert_eq!(text.parse::<ExplainVerbosity>().unwrap(), v);
    }

    #[test]
    fn selection_is_an_ordered_subsequence(mask in proptest::collection::vec(any::<bool>(), 42)) {
        let all = usage::catalogue();
        let names: Vec<String> = all
            .iter()
            .zip(mask.iter().cycle())
            .filter(|(_, keep)| **keep)
            .map(|(s, _)| s.name.to_string())
            .collect();
        let picked = usage::select(usage::catalogue(), &names).unwrap();
        let got: Vec<&str> = picked.iter().map(|s| s.name).collect();
        // a name can also be a group name, which pulls in the whole group
        let expected: Vec<&str> = all
            .iter()
            .filter(|s| names.is_empty() || names.iter().any(|n| s.name == n || s.group == n))
            .map(|s| s.name)
            .collect();
        prop_assert_eq!(got, expected);
    }
}
