//! PALES residual dipolar coupling tables.

use crate::io::nmrpipe::{self, GdbFile, GdbRecord};
use crate::io::{Format, error::Error};
use crate::model::residue::{AtomLabel, Residue};
use crate::model::restraint::{RdcRestraint, RestraintValues};
use std::io::BufRead;
use tracing::info;

const COLUMNS: [&str; 9] = [
    "RESID_I",
    "RESNAME_I",
    "ATOMNAME_I",
    "RESID_J",
    "RESNAME_J",
    "ATOMNAME_J",
    "D",
    "DD",
    "W",
];

/// Reads a PALES table into RDC restraints. `SEGNAME_I`/`SEGNAME_J`, when
/// present, give the chain; otherwise atoms go on `chain_code`.
pub fn read<R: BufRead>(reader: R, chain_code: &str) -> Result<Vec<RdcRestraint>, Error> {
    let file = nmrpipe::read(reader, Format::Pales)?;
    file.require(&COLUMNS)?;

    let restraints = file
        .records
        .iter()
        .enumerate()
        .map(|(i, record)| -> Result<RdcRestraint, Error> {
            let atoms = [
                atom(&file, record, "I", chain_code)?,
                atom(&file, record, "J", chain_code)?,
            ];
            let coupling = file.field(record, "D")?;
            let values = RestraintValues::target(coupling, Some(file.field(record, "DD")?))
                .with_weight(file.field(record, "W")?);
            Ok(RdcRestraint::new(i + 1, atoms, values))
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!("read {} RDC restraints", restraints.len());
    Ok(restraints)
}

fn atom(
    file: &GdbFile,
    record: &GdbRecord,
    side: &str,
    chain_code: &str,
) -> Result<AtomLabel, Error> {
    let chain = file
        .value(record, &format!("SEGNAME_{side}"))
        .unwrap_or(chain_code);
    let number: i32 = file.field(record, &format!("RESID_{side}"))?;
    let residue_name: String = file.field(record, &format!("RESNAME_{side}"))?;
    let atom_name: String = file.field(record, &format!("ATOMNAME_{side}"))?;
    let residue = Residue::new(chain, number, residue_name.to_ascii_uppercase());
    Ok(AtomLabel::new(residue, atom_name.to_ascii_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TABLE: &str = "\
DATA SEQUENCE MQIFVK
VARS   RESID_I RESNAME_I ATOMNAME_I RESID_J RESNAME_J ATOMNAME_J D DD W
FORMAT %5d %6s %6s %5d %6s %6s %9.3f %9.3f %.2f

    2    GLN      N    2    GLN     HN   -11.2000    1.0000 1.00
    3    ILE      N    3    ILE     HN     4.5000    0.5000 2.00
";

    #[test]
    fn builds_restraints_from_rows() {
        let restraints = read(Cursor::new(TABLE), "A").unwrap();
        assert_eq!(restraints.len(), 2);

        let first = &restraints[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.atoms[0].atom_name, "N");
        assert_eq!(first.atoms[1].atom_name, "HN");
        assert_eq!(first.atoms[1].residue.residue_name, "GLN");
        assert_eq!(first.atoms[0].residue.chain_code, "A");
        assert_eq!(first.values.target, Some(-11.2));
        assert_eq!(first.values.target_uncertainty, Some(1.0));
        assert_eq!(first.values.weight, Some(1.0));

        assert_eq!(restraints[1].values.weight, Some(2.0));
    }

    #[test]
    fn segment_names_become_chains() {
        let text = "\
VARS SEGNAME_I RESID_I RESNAME_I ATOMNAME_I SEGNAME_J RESID_J RESNAME_J ATOMNAME_J D DD W
B 7 ALA N B 7 ALA HN 3.0 0.5 1.0
";
        let restraints = read(Cursor::new(text), "A").unwrap();
        assert_eq!(restraints[0].atoms[0].residue.chain_code, "B");
    }

    #[test]
    fn missing_columns_are_reported() {
        let text = "VARS RESID_I RESNAME_I ATOMNAME_I\n";
        assert!(matches!(
            read(Cursor::new(text), "A"),
            Err(Error::Parse {
                format: Format::Pales,
                line: 1,
                ..
            })
        ));
    }

    #[test]
    fn bad_numbers_report_their_row() {
        let text = "\
VARS RESID_I RESNAME_I ATOMNAME_I RESID_J RESNAME_J ATOMNAME_J D DD W
x GLN N 2 GLN HN 1.0 1.0 1.0
";
        assert!(matches!(
            read(Cursor::new(text), "A"),
            Err(Error::Parse { line: 2, .. })
        ));
    }
}
