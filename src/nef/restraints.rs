//! Restraint-list frames and aggregation of restraint violations.

use std::collections::BTreeSet;

use tracing::{debug, info};

use super::collapse::{collapse_names, name_stem};
use super::error::Error;
use super::values::{atom_cells, atom_tags, opt_display, opt_f64};
use crate::model::residue::{AtomLabel, UNUSED};
use crate::model::restraint::{
    DihedralRestraint, DistanceRestraint, RdcRestraint, RestraintValues, RestraintViolation,
};
use crate::star::{Loop, Saveframe};

pub const DISTANCE_LIST: &str = "nef_distance_restraint_list";
pub const DISTANCE_LOOP: &str = "nef_distance_restraint";
pub const DIHEDRAL_LIST: &str = "nef_dihedral_restraint_list";
pub const DIHEDRAL_LOOP: &str = "nef_dihedral_restraint";
pub const RDC_LIST: &str = "nef_rdc_restraint_list";
pub const RDC_LOOP: &str = "nef_rdc_restraint";
pub const VIOLATION_LIST: &str = "np_violation_list";
pub const VIOLATION_LOOP: &str = "np_violation";

const VALUE_TAGS: [&str; 5] = [
    "weight",
    "target_value",
    "target_value_uncertainty",
    "lower_limit",
    "upper_limit",
];

fn restraint_tags(atoms: usize) -> Vec<String> {
    let mut tags: Vec<String> = ["index", "restraint_id", "restraint_combination_id"]
        .into_iter()
        .map(str::to_string)
        .collect();
    for n in 1..=atoms {
        tags.extend(atom_tags(n));
    }
    tags.extend(VALUE_TAGS.into_iter().map(str::to_string));
    tags
}

fn restraint_row(
    index: usize,
    id: usize,
    combination_id: Option<usize>,
    atoms: &[AtomLabel],
    values: &RestraintValues,
) -> Vec<String> {
    let mut row = vec![
        index.to_string(),
        id.to_string(),
        opt_display(combination_id),
    ];
    for atom in atoms {
        row.extend(atom_cells(atom));
    }
    row.extend([
        opt_f64(values.weight),
        opt_f64(values.target),
        opt_f64(values.target_uncertainty),
        opt_f64(values.lower_limit),
        opt_f64(values.upper_limit),
    ]);
    row
}

fn restraint_frame(category: &str, name: &str) -> Saveframe {
    let mut frame = Saveframe::new(category, format!("{category}_{name}"));
    frame.add_tag("potential_type", "undefined");
    frame.add_tag("restraint_origin", UNUSED);
    frame
}

pub fn distance_restraints_to_frame(
    name: &str,
    restraints: &[DistanceRestraint],
) -> Result<Saveframe, Error> {
    let mut frame = restraint_frame(DISTANCE_LIST, name);
    let mut lp = Loop::with_tags(DISTANCE_LOOP, restraint_tags(2))?;
    for (i, restraint) in restraints.iter().enumerate() {
        lp.add_row(restraint_row(
            i + 1,
            restraint.id,
            restraint.combination_id,
            &restraint.atoms,
            &restraint.values,
        ))?;
    }
    frame.add_loop(lp);
    info!("built {} with {} restraints", frame.name(), restraints.len());
    Ok(frame)
}

pub fn dihedral_restraints_to_frame(
    name: &str,
    restraints: &[DihedralRestraint],
) -> Result<Saveframe, Error> {
    let mut frame = restraint_frame(DIHEDRAL_LIST, name);
    let mut tags = restraint_tags(4);
    tags.push("name".to_string());
    let mut lp = Loop::with_tags(DIHEDRAL_LOOP, tags)?;
    for (i, restraint) in restraints.iter().enumerate() {
        let mut row = restraint_row(i + 1, restraint.id, None, &restraint.atoms, &restraint.values);
        row.push(opt_display(restraint.name.as_deref()));
        lp.add_row(row)?;
    }
    frame.add_loop(lp);
    info!("built {} with {} restraints", frame.name(), restraints.len());
    Ok(frame)
}

pub fn rdc_restraints_to_frame(
    name: &str,
    restraints: &[RdcRestraint],
) -> Result<Saveframe, Error> {
    let mut frame = restraint_frame(RDC_LIST, name);
    let mut lp = Loop::with_tags(RDC_LOOP, restraint_tags(2))?;
    for (i, restraint) in restraints.iter().enumerate() {
        let row = restraint_row(i + 1, restraint.id, None, &restraint.atoms, &restraint.values);
        lp.add_row(row)?;
    }
    frame.add_loop(lp);
    info!("built {} with {} restraints", frame.name(), restraints.len());
    Ok(frame)
}

/// Writes violations as an `np_violation_list_<name>` frame.
pub fn violations_to_frame(
    name: &str,
    violations: &[RestraintViolation],
) -> Result<Saveframe, Error> {
    let mut frame = Saveframe::new(VIOLATION_LIST, format!("{VIOLATION_LIST}_{name}"));
    let mut tags: Vec<String> = [
        "index",
        "model_id",
        "restraint_list",
        "restraint_id",
        "restraint_sub_id",
    ]
    .into_iter()
    .map(str::to_string)
    .collect();
    for n in 1..=2 {
        tags.extend(atom_tags(n));
    }
    tags.extend(
        ["value", "target_value", "lower_limit", "upper_limit", "violation"]
            .into_iter()
            .map(str::to_string),
    );

    let mut lp = Loop::with_tags(VIOLATION_LOOP, tags)?;
    for (i, violation) in violations.iter().enumerate() {
        let mut row = vec![
            (i + 1).to_string(),
            violation.model.to_string(),
            violation.list_name.clone(),
            violation.restraint_number.to_string(),
            violation.sub_id.to_string(),
        ];
        for atom in &violation.atoms {
            row.extend(atom_cells(atom));
        }
        row.extend([
            violation.calculated.to_string(),
            violation.target.to_string(),
            violation.lower.to_string(),
            violation.upper.to_string(),
            violation.violation.to_string(),
        ]);
        lp.add_row(row)?;
    }
    frame.add_loop(lp);
    info!("built {} with {} violations", frame.name(), violations.len());
    Ok(frame)
}

fn same_values(a: &RestraintViolation, b: &RestraintViolation) -> bool {
    a.calculated == b.calculated
        && a.target == b.target
        && a.lower == b.lower
        && a.upper == b.upper
        && a.violation == b.violation
}

fn same_partition(a: &RestraintViolation, b: &RestraintViolation) -> bool {
    a.atoms
        .iter()
        .zip(&b.atoms)
        .all(|(x, y)| x.residue == y.residue && name_stem(&x.atom_name) == name_stem(&y.atom_name))
        && same_values(a, b)
}

/// Merges the alternatives of each restraint into wildcarded rows.
///
/// Violations are grouped by model, list and restraint number in order of
/// first appearance. Within a group, rows whose atoms sit on the same
/// residues with the same name stems and whose values are identical become
/// one row; the atom names on each side are collapsed with
/// [`collapse_names`].
pub fn collapse_violations(
    violations: &[RestraintViolation],
    depth: usize,
) -> Vec<RestraintViolation> {
    let mut partitions: Vec<Vec<&RestraintViolation>> = Vec::new();
    for violation in violations {
        let existing = partitions.iter_mut().find(|part| {
            let head = part[0];
            head.model == violation.model
                && head.list_name == violation.list_name
                && head.restraint_number == violation.restraint_number
                && same_partition(head, violation)
        });
        match existing {
            Some(part) => part.push(violation),
            None => partitions.push(vec![violation]),
        }
    }

    // keep restraint order stable when a later partition shares a key
    let mut keys: Vec<(usize, &str, usize)> = Vec::new();
    for part in &partitions {
        let head = part[0];
        let key = (head.model, head.list_name.as_str(), head.restraint_number);
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    let mut result = Vec::with_capacity(partitions.len());
    for key in keys {
        for part in partitions
            .iter()
            .filter(|p| (p[0].model, p[0].list_name.as_str(), p[0].restraint_number) == key)
        {
            let head = part[0];
            if part.len() > 1 {
                debug!(
                    "merging {} alternatives of restraint {} in {}",
                    part.len(),
                    head.restraint_number,
                    head.list_name
                );
            }
            let atoms = [0, 1].map(|side| {
                let names: BTreeSet<&str> =
                    part.iter().map(|v| v.atoms[side].atom_name.as_str()).collect();
                let name = collapse_names(names, depth);
                head.atoms[side].clone().with_atom_name(name)
            });
            result.push(head.clone().with_atoms(atoms));
        }
    }
    result
}
