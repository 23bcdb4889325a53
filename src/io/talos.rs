//! TALOS backbone torsion predictions (`pred.tab`).

use crate::io::nmrpipe::{self, GdbFile, GdbRecord};
use crate::io::{Format, error::Error};
use crate::model::residue::{AtomLabel, Residue, UNUSED};
use crate::model::restraint::{DihedralRestraint, RestraintValues};
use crate::model::types::residue_name_from_code;
use std::collections::BTreeMap;
use std::io::BufRead;
use tracing::{debug, info};

const COLUMNS: [&str; 7] = ["RESID", "RESNAME", "PHI", "PSI", "DPHI", "DPSI", "CLASS"];
/// Prediction classes reliable enough to restrain.
const ACCEPTED_CLASSES: [&str; 2] = ["Strong", "Generous"];
/// Marker TALOS writes for angles it could not predict.
const NO_PREDICTION: f64 = 9999.0;
/// Restraint bounds span this many uncertainties around the prediction.
const BOUND_WIDTH: f64 = 2.0;

#[derive(Debug, Clone, Copy)]
enum Angle {
    Phi,
    Psi,
}

impl Angle {
    fn name(&self) -> &'static str {
        match self {
            Angle::Phi => "PHI",
            Angle::Psi => "PSI",
        }
    }

    /// `(residue offset, atom)` for the four atoms of the angle.
    fn atoms(&self) -> [(i32, &'static str); 4] {
        match self {
            Angle::Phi => [(-1, "C"), (0, "N"), (0, "CA"), (0, "C")],
            Angle::Psi => [(0, "N"), (0, "CA"), (0, "C"), (1, "N")],
        }
    }

    fn columns(&self) -> (&'static str, &'static str) {
        match self {
            Angle::Phi => ("PHI", "DPHI"),
            Angle::Psi => ("PSI", "DPSI"),
        }
    }
}

/// Reads TALOS predictions into PHI/PSI dihedral restraints on `chain_code`.
pub fn read<R: BufRead>(reader: R, chain_code: &str) -> Result<Vec<DihedralRestraint>, Error> {
    let file = nmrpipe::read(reader, Format::Talos)?;
    file.require(&COLUMNS)?;
    let names = residue_names(&file)?;

    let mut restraints = Vec::new();
    for record in &file.records {
        let class: String = file.field(record, "CLASS")?;
        if !ACCEPTED_CLASSES.contains(&class.as_str()) {
            debug!("line {}: skipping TALOS class '{class}'", record.line);
            continue;
        }
        let number: i32 = file.field(record, "RESID")?;
        for angle in [Angle::Phi, Angle::Psi] {
            if let Some(values) = angle_values(&file, record, angle)? {
                let atoms = angle.atoms().map(|(offset, atom)| {
                    let residue_number = number + offset;
                    let name = names.get(&residue_number).map_or(UNUSED, String::as_str);
                    AtomLabel::new(Residue::new(chain_code, residue_number, name), atom)
                });
                restraints.push(
                    DihedralRestraint::new(restraints.len() + 1, atoms, values)
                        .with_name(angle.name()),
                );
            }
        }
    }

    info!("read {} dihedral restraints", restraints.len());
    Ok(restraints)
}

fn angle_values(
    file: &GdbFile,
    record: &GdbRecord,
    angle: Angle,
) -> Result<Option<RestraintValues>, Error> {
    let (value_column, error_column) = angle.columns();
    let value: f64 = file.field(record, value_column)?;
    let uncertainty: f64 = file.field(record, error_column)?;
    if value >= NO_PREDICTION {
        return Ok(None);
    }
    let spread = BOUND_WIDTH * uncertainty;
    Ok(Some(
        RestraintValues::target(value, Some(uncertainty))
            .with_limits(Some(value - spread), Some(value + spread)),
    ))
}

/// Residue names by number, from `DATA SEQUENCE` and the rows themselves.
fn residue_names(file: &GdbFile) -> Result<BTreeMap<i32, String>, Error> {
    let mut names: BTreeMap<i32, String> = file.sequence()?.into_iter().collect();
    for record in &file.records {
        let number: i32 = file.field(record, "RESID")?;
        let code: String = file.field(record, "RESNAME")?;
        names.insert(number, residue_name_from_code(&code));
    }
    Ok(names)
}
