use rosemary_core::{FuzzyOptions, LeafId, Rosemary, SearchKey};

fn garden_store() -> (Rosemary, LeafId, LeafId, LeafId) {
    let mut store = Rosemary::seeded(31);
    let tips = store.add_leaf("gardening tips", ["outdoors"]);
    let tagged = store.add_leaf("misc", ["gardening"]);
    let short = store.add_leaf("garden", Vec::<String>::new());
    store.add_leaf("Python is also great", ["code"]);
    (store, tips, tagged, short)
}

fn hit_ids(store: &Rosemary, query: &str, options: &FuzzyOptions) -> Vec<LeafId> {
    store
        .fuzzy_search(query, options)
        .into_iter()
        .map(|hit| hit.leaf.id().clone())
        .collect()
}

#[test]
fn exact_query_scores_zero() {
    let mut store = Rosemary::seeded(30);
    let id = store.add_leaf("Rosemary likes dry soil", ["herbs"]);

    let hits = store.fuzzy_search("rosemary", &FuzzyOptions::default());
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].leaf.id(), &id);
    assert!(hits[0].score.abs() < 1e-9);
    assert_eq!(hits[0].key, SearchKey::Content);
}

#[test]
fn typo_still_matches() {
    let mut store = Rosemary::seeded(32);
    store.add_leaf("Rosemary likes dry soil", Vec::<String>::new());

    let hits = store.fuzzy_search("rosmary", &FuzzyOptions::default());
    assert_eq!(hits.len(), 1);
    assert!(hits[0].score > 0.0);
    assert!(hits[0].score <= 0.4);
}

#[test]
fn unrelated_query_finds_nothing() {
    let (store, ..) = garden_store();
    assert!(store
        .fuzzy_search("zzzzqqqq", &FuzzyOptions::default())
        .is_empty());
}

#[test]
fn results_are_ordered_by_score_then_insertion() {
    let (store, tips, tagged, short) = garden_store();

    let hits = store.fuzzy_search("gardening", &FuzzyOptions::default());
    let ids: Vec<_> = hits.iter().map(|hit| hit.leaf.id().clone()).collect();
    assert_eq!(ids, vec![tips, tagged.clone(), short]);
    assert_eq!(hits[1].key, SearchKey::Tags);
    assert!(hits.windows(2).all(|pair| pair[0].score <= pair[1].score));
}

#[test]
fn keys_restrict_matched_fields() {
    let (store, tips, tagged, short) = garden_store();

    let content_only = FuzzyOptions::default().with_keys([SearchKey::Content]);
    assert_eq!(hit_ids(&store, "gardening", &content_only), vec![tips, short]);

    let tags_only = FuzzyOptions::default().with_keys([SearchKey::Tags]);
    assert_eq!(hit_ids(&store, "gardening", &tags_only), vec![tagged]);
}

#[test]
fn limit_truncates_after_sorting() {
    let (store, tips, ..) = garden_store();
    let options = FuzzyOptions::default().with_limit(1);
    assert_eq!(hit_ids(&store, "gardening", &options), vec![tips]);
}

#[test]
fn case_sensitivity_is_configurable() {
    let (store, _, _, short) = garden_store();

    let insensitive = FuzzyOptions::default().with_threshold(0.0);
    assert!(hit_ids(&store, "GARDEN", &insensitive).contains(&short));

    let sensitive = FuzzyOptions::default()
        .with_ignore_case(false)
        .with_threshold(0.0);
    assert!(hit_ids(&store, "GARDEN", &sensitive).is_empty());
}

#[test]
fn short_or_blank_queries_yield_nothing() {
    let (store, ..) = garden_store();
    let options = FuzzyOptions::default().with_min_match_chars(3);

    assert!(store.fuzzy_search("ga", &options).is_empty());
    assert!(store.fuzzy_search("   ", &FuzzyOptions::default()).is_empty());
}

#[test]
fn options_normalize_threshold_and_parse_keys() {
    assert_eq!(FuzzyOptions::default().with_threshold(5.0).threshold, 1.0);
    assert_eq!(FuzzyOptions::default().with_threshold(-1.0).threshold, 0.0);
    assert_eq!(FuzzyOptions::default().with_threshold(f64::NAN).threshold, 0.4);

    assert_eq!(
        FuzzyOptions::parse_keys("content, tag").unwrap(),
        vec![SearchKey::Content, SearchKey::Tags]
    );
    let err = FuzzyOptions::parse_keys("content,title").unwrap_err();
    assert_eq!(err.0, "title");
}
