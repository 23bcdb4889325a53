//! Folding of degenerate atom names into NEF wildcard names.
//!
//! Names that share an observed value (`HB2`, `HB3`) are written once in NEF
//! with `%` standing for the digits that vary (`HB%`). Collapsing is only
//! meaningful within a stem group, see [`group_by_stem`].

use std::collections::BTreeSet;

use crate::model::shift::ShiftData;

/// Number of trailing characters examined by [`collapse_names`] unless the
/// caller asks otherwise.
pub const DEFAULT_COLLAPSE_DEPTH: usize = 2;

/// The NEF wildcard character.
pub const WILDCARD: char = '%';

/// Collapses a non-empty set of names into one wildcard name.
///
/// The last `depth` characters are compared right to left; positions where
/// every name has a digit and the digits differ become `%`. Scanning stops at
/// the first position where any name has a non-digit. A run of trailing `%`
/// is reduced to one. An empty input yields an empty string.
pub fn collapse_names<I, S>(names: I, depth: usize) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let names: BTreeSet<Vec<char>> = names
        .into_iter()
        .map(|name| name.as_ref().chars().collect())
        .collect();

    let Some(first) = names.first() else {
        return String::new();
    };
    if names.len() == 1 {
        return first.iter().collect();
    }

    let mut result = first.clone();
    for offset in 1..=depth {
        let mut digits = BTreeSet::new();
        let all_digits = names.iter().all(|name| {
            name.len()
                .checked_sub(offset)
                .and_then(|idx| name.get(idx))
                .filter(|c| c.is_ascii_digit())
                .map(|&c| digits.insert(c))
                .is_some()
        });
        if !all_digits {
            break;
        }
        if digits.len() > 1 && offset <= result.len() {
            let idx = result.len() - offset;
            result[idx] = WILDCARD;
        }
    }

    let collapsed: String = result.into_iter().collect();
    let stripped = collapsed.trim_end_matches(WILDCARD);
    if stripped.len() == collapsed.len() {
        collapsed
    } else {
        format!("{stripped}{WILDCARD}")
    }
}

/// The grouping key of a name: the name with its final ASCII digit removed.
///
/// `HG12` and `HG13` share the stem `HG1` while `HG22` belongs to `HG2`, so
/// methyl groups on different branches are never merged.
pub fn name_stem(name: &str) -> &str {
    match name.as_bytes().last() {
        Some(b) if b.is_ascii_digit() => &name[..name.len() - 1],
        _ => name,
    }
}

/// Partitions names by [`name_stem`].
///
/// Groups appear in order of first appearance; each group keeps input order.
pub fn group_by_stem<I, S>(names: I) -> Vec<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for name in names {
        let name = name.as_ref();
        let stem = name_stem(name);
        match groups.iter_mut().find(|(key, _)| key == stem) {
            Some((_, group)) => group.push(name.to_string()),
            None => groups.push((stem.to_string(), vec![name.to_string()])),
        }
    }
    groups.into_iter().map(|(_, group)| group).collect()
}

/// Groups names by stem and collapses each group.
pub fn collapse_by_stem<I, S>(names: I, depth: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    group_by_stem(names)
        .into_iter()
        .map(|group| collapse_names(group, depth))
        .collect()
}

/// Compresses chemical shifts whose atoms are degenerate.
///
/// Shifts on the same residue with the same stem, value and uncertainty are
/// replaced by a single shift carrying the collapsed atom name. Output order
/// follows the first shift of each group.
pub fn collapse_shifts(shifts: &[ShiftData], depth: usize) -> Vec<ShiftData> {
    let mut groups: Vec<Vec<&ShiftData>> = Vec::new();
    for shift in shifts {
        let stem = name_stem(&shift.atom.atom_name);
        let existing = groups.iter_mut().find(|group| {
            let head = group[0];
            head.atom.residue == shift.atom.residue
                && name_stem(&head.atom.atom_name) == stem
                && head.value == shift.value
                && head.value_uncertainty == shift.value_uncertainty
        });
        match existing {
            Some(group) => group.push(shift),
            None => groups.push(vec![shift]),
        }
    }

    groups
        .into_iter()
        .map(|group| {
            let head = group[0].clone();
            if group.len() == 1 {
                return head;
            }
            let name = collapse_names(group.iter().map(|s| s.atom.atom_name.as_str()), depth);
            let atom = head.atom.clone().with_atom_name(name);
            head.with_atom(atom)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::residue::{AtomLabel, Residue};
    use proptest::prelude::*;

    fn collapse(names: &[&str]) -> String {
        collapse_names(names.iter().copied(), DEFAULT_COLLAPSE_DEPTH)
    }

    #[test]
    fn singleton_passes_through() {
        assert_eq!(collapse(&["CA"]), "CA");
        assert_eq!(collapse(&["HB2"]), "HB2");
    }

    #[test]
    fn stereo_pairs_collapse_to_wildcard() {
        assert_eq!(collapse(&["HB2", "HB3"]), "HB%");
        assert_eq!(collapse(&["HD11", "HD12", "HD13"]), "HD1%");
    }

    #[test]
    fn trailing_wildcards_are_merged() {
        assert_eq!(collapse(&["HG11", "HG12", "HG21", "HG22"]), "HG%");
    }

    #[test]
    fn identical_digits_are_kept() {
        assert_eq!(collapse(&["HD21", "HE21"]), "HD21");
    }

    #[test]
    fn scanning_stops_at_non_digits() {
        assert_eq!(collapse(&["HA", "HB"]), "HA");
        assert_eq!(collapse(&["H1", "H2"]), "H%");
    }

    #[test]
    fn depth_limits_the_scan() {
        assert_eq!(collapse_names(["H123", "H223"], 2), "H123");
        assert_eq!(collapse_names(["H123", "H223"], 3), "H%23");
    }

    #[test]
    fn empty_input_yields_empty_name() {
        assert_eq!(collapse_names(Vec::<String>::new(), 2), "");
    }

    #[test]
    fn grouping_keeps_branches_apart() {
        let groups = group_by_stem(["HG12", "HG13", "HG22", "HG23"]);
        assert_eq!(groups, vec![vec!["HG12", "HG13"], vec!["HG22", "HG23"]]);
        assert_eq!(
            collapse_by_stem(["HG12", "HG13", "HG22", "HG23"], 2),
            vec!["HG1%", "HG2%"]
        );
    }

    #[test]
    fn grouping_follows_first_appearance() {
        let groups = group_by_stem(["HB3", "HA", "HB2"]);
        assert_eq!(groups, vec![vec!["HB3", "HB2"], vec!["HA"]]);
    }

    #[test]
    fn degenerate_shifts_are_compressed() {
        let residue = Residue::new("A", 5, "SER");
        let shifts = vec![
            ShiftData::new(AtomLabel::new(residue.clone(), "HB2"), 3.85),
            ShiftData::new(AtomLabel::new(residue.clone(), "HA"), 4.40),
            ShiftData::new(AtomLabel::new(residue.clone(), "HB3"), 3.85),
        ];
        let collapsed = collapse_shifts(&shifts, 2);
        assert_eq!(collapsed.len(), 2);
        assert_eq!(collapsed[0].atom.atom_name, "HB%");
        assert_eq!(collapsed[0].value, 3.85);
        assert_eq!(collapsed[1].atom.atom_name, "HA");
    }

    #[test]
    fn distinct_shifts_are_kept_apart() {
        let residue = Residue::new("A", 5, "SER");
        let shifts = vec![
            ShiftData::new(AtomLabel::new(residue.clone(), "HB2"), 3.85),
            ShiftData::new(AtomLabel::new(residue, "HB3"), 3.91),
        ];
        assert_eq!(collapse_shifts(&shifts, 2), shifts);
    }

    proptest! {
        #[test]
        fn collapsing_is_idempotent(
            stem in "[A-Z]{1,3}",
            digits in prop::collection::btree_set("[0-9]{1,2}", 1..6),
        ) {
            let names: Vec<String> = digits.iter().map(|d| format!("{stem}{d}")).collect();
            let once = collapse_names(&names, DEFAULT_COLLAPSE_DEPTH);
            let twice = collapse_names([once.as_str()], DEFAULT_COLLAPSE_DEPTH);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn collapsed_name_keeps_the_stem(
            stem in "[A-Z]{1,3}",
            digits in prop::collection::btree_set("[0-9]", 2..6),
        ) {
            let names: Vec<String> = digits.iter().map(|d| format!("{stem}{d}")).collect();
            let collapsed = collapse_names(&names, DEFAULT_COLLAPSE_DEPTH);
            prop_assert_eq!(collapsed, format!("{stem}%"));
        }
    }
}
