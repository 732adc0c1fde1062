//! Tag filter properties over every fixture feature

mod fixtures;

use fixtures::feature_sources;
use livedoc::model::Tag;
use livedoc::{parse_feature, Feature, FilterDecision, TagFilter};

fn features() -> Vec<Feature> {
    feature_sources()
        .into_iter()
        .map(|(path, source)| {
            parse_feature(&source).unwrap_or_else(|e| panic!("{}: {}", path.display(), e))
        })
        .collect()
}

fn filters() -> Vec<TagFilter> {
    let tags = ["", "@slow", "@banking", "@missing", "SLOW"];
    let mut out = Vec::new();
    for exclude in tags {
        for include_only in tags {
            out.push(TagFilter::parse(exclude, include_only).unwrap());
        }
    }
    out
}

#[test]
fn test_filter_is_idempotent() {
    for filter in filters() {
        for feature in features() {
            if let FilterDecision::Included(once) = filter.apply(feature) {
                let again = filter.apply(once.clone()).into_included().unwrap();
                assert_eq!(again.elements.len(), once.elements.len());
                assert_eq!(again.name, once.name);
            }
        }
    }
}

#[test]
fn test_excluded_tag_never_survives() {
    for filter in filters() {
        let Some(exclude) = filter.exclude().map(|e| e.tag().clone()) else {
            continue;
        };
        for feature in features() {
            if let FilterDecision::Included(kept) = filter.apply(feature) {
                assert!(!kept.has_tag(&exclude));
                assert!(kept.elements.iter().all(|s| !s.has_tag(&exclude)));
                assert!(!kept.elements.is_empty());
            }
        }
    }
}

#[test]
fn test_include_only_keeps_tagged_scenarios() {
    let filter = TagFilter::parse("", "@slow").unwrap();
    let kept: Vec<Feature> = features()
        .into_iter()
        .filter_map(|f| filter.apply(f).into_included())
        .collect();

    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].elements.len(), 1);
    assert!(kept[0].elements[0].has_tag(&Tag::new("slow")));
}

#[test]
fn test_include_only_feature_tag_keeps_everything() {
    let filter = TagFilter::parse("", "@banking").unwrap();
    let total: usize = features().iter().map(|f| f.elements.len()).sum();
    let kept: usize = features()
        .into_iter()
        .filter_map(|f| filter.apply(f).into_included())
        .map(|f| f.elements.len())
        .sum();
    assert_eq!(kept, total);
}

#[test]
fn test_exclude_wins_over_include_only() {
    let filter = TagFilter::parse("@slow", "@slow").unwrap();
    assert!(features()
        .into_iter()
        .all(|f| filter.apply(f).into_included().is_none()));
}

#[test]
fn test_unsupported_expressions_rejected() {
    for raw in ["@a and @b", "@a,@b", "not @a", "@a*", "@@a"] {
        assert!(TagFilter::parse(raw, "").is_err(), "{} accepted", raw);
    }
}
