//! The cascade / flatten engine (§4.5): folds a sequence of rules into a
//! single property→value map honoring specificity and `!important`, then
//! recomposes shorthands where safe.
//!
//! This is a generic cascade operation — it doesn't match selectors against
//! any DOM; the caller supplies the already-matched rule sequence for a
//! hypothetical element and gets back its fully-resolved declarations.

use std::collections::BTreeMap;

use crate::declaration::Declaration;
use crate::shorthand;
use crate::Rule;

/// A property's current cascade winner: its value, whether it arrived
/// `!important`, and the specificity it won with (kept only to adjudicate
/// later candidates, not part of the final output).
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedProperty {
    value: String,
    important: bool,
    specificity: u32,
}

/// Flatten an ordered rule sequence into the fully-resolved declaration list
/// a hypothetical element matched by every rule would receive.
pub fn flatten(rules: &mut [Rule]) -> Vec<Declaration> {
    let mut winners: BTreeMap<String, ResolvedProperty> = BTreeMap::new();

    for rule in rules.iter_mut() {
        let specificity = rule.specificity();
        for decl in &rule.declarations {
            apply_declaration(&mut winners, &decl.property, &decl.value, decl.important, specificity);
        }
    }

    let mut values: shorthand::ValueMap = winners
        .iter()
        .map(|(k, v)| (k.clone(), (v.value.clone(), v.important)))
        .collect();
    shorthand::contract_all(&mut values);

    values
        .into_iter()
        .map(|(property, (value, important))| Declaration { property, value, important })
        .collect()
}

/// Apply one candidate declaration to the winners map, expanding it first if
/// it's a shorthand (expansions inherit the declaration's own specificity
/// and `!important` flag).
fn apply_declaration(winners: &mut BTreeMap<String, ResolvedProperty>, property: &str, value: &str, important: bool, specificity: u32) {
    let property = property.to_ascii_lowercase();
    if shorthand::is_shorthand(&property) {
        for (longhand, longhand_value) in shorthand::expand(&property, value) {
            apply_candidate(winners, longhand, longhand_value, important, specificity);
        }
    } else {
        apply_candidate(winners, property, value.to_string(), important, specificity);
    }
}

/// A candidate replaces the current winner iff it's `!important` and the
/// existing one isn't, or both agree on `!important` and the candidate's
/// specificity is >= the existing one's (ties go to the later, i.e. current,
/// insertion — consistent with CSS source-order tiebreaking).
fn apply_candidate(winners: &mut BTreeMap<String, ResolvedProperty>, property: String, value: String, important: bool, specificity: u32) {
    let candidate = ResolvedProperty { value, important, specificity };
    match winners.get(&property) {
        None => {
            winners.insert(property, candidate);
        }
        Some(existing) => {
            let replaces = match (candidate.important, existing.important) {
                (true, false) => true,
                (false, true) => false,
                _ => candidate.specificity >= existing.specificity,
            };
            if replaces {
                winners.insert(property, candidate);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::Declaration;
    use crate::Rule;

    fn rule(id: u64, selector: &str, decls: Vec<(&str, &str, bool)>) -> Rule {
        Rule::new(
            id,
            selector,
            decls
                .into_iter()
                .map(|(p, v, i)| Declaration { property: p.to_string(), value: v.to_string(), important: i })
                .collect(),
        )
    }

    fn find<'a>(decls: &'a [Declaration], property: &str) -> &'a Declaration {
        decls.iter().find(|d| d.property == property).unwrap_or_else(|| panic!("missing {property}"))
    }

    #[test]
    fn important_beats_specificity() {
        let mut rules = vec![
            rule(1, "p", vec![("color", "red", true)]),
            rule(2, "#id.class", vec![("color", "blue", false)]),
        ];
        let decls = flatten(&mut rules);
        assert_eq!(find(&decls, "color").value, "red");
        assert!(find(&decls, "color").important);
    }

    #[test]
    fn higher_specificity_wins_when_not_important() {
        let mut rules = vec![
            rule(1, "p", vec![("color", "red", false)]),
            rule(2, "div p", vec![("color", "blue", false)]),
        ];
        let decls = flatten(&mut rules);
        assert_eq!(find(&decls, "color").value, "blue");
    }

    #[test]
    fn lower_specificity_does_not_replace() {
        let mut rules = vec![
            rule(1, "div p", vec![("color", "blue", false)]),
            rule(2, "p", vec![("color", "red", false)]),
        ];
        let decls = flatten(&mut rules);
        assert_eq!(find(&decls, "color").value, "blue");
    }

    #[test]
    fn equal_specificity_later_insertion_wins() {
        let mut rules = vec![
            rule(1, "p", vec![("color", "red", false)]),
            rule(2, "p", vec![("color", "blue", false)]),
        ];
        let decls = flatten(&mut rules);
        assert_eq!(find(&decls, "color").value, "blue");
    }

    #[test]
    fn shorthand_expands_before_cascading() {
        let mut rules = vec![rule(1, "p", vec![("margin", "10px", false)])];
        let decls = flatten(&mut rules);
        assert_eq!(find(&decls, "margin").value, "10px");
        assert!(decls.iter().all(|d| !d.property.starts_with("margin-")));
    }

    #[test]
    fn longhand_after_shorthand_wins_at_equal_specificity() {
        let mut rules = vec![rule(
            1,
            "p",
            vec![("margin", "10px", false), ("margin-top", "20px", false)],
        )];
        let decls = flatten(&mut rules);
        assert_eq!(find(&decls, "margin-top").value, "20px");
        assert_eq!(find(&decls, "margin-right").value, "10px");
    }
}
