use crate::io::error::Error;
use crate::model::peak::NewPeak;
use crate::model::residue::{AtomLabel, Residue, UNUSED};
use crate::model::types::StandardResidue;
use std::io::Write;

/// Writes peaks as a Sparky peak list.
///
/// Columns follow the dimensionality of the first peak; `Data Height` and
/// `Volume` are written only when some peak carries them.
pub fn write<W: Write>(mut writer: W, peaks: &[NewPeak]) -> Result<(), Error> {
    let dimensions = peaks.first().map_or(0, NewPeak::dimensions);
    let with_height = peaks.iter().any(|p| p.height.is_some());
    let with_volume = peaks.iter().any(|p| p.volume.is_some());

    let assignments: Vec<String> = peaks.iter().map(format_assignment).collect();
    let width = assignments
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max("Assignment".len());

    write!(writer, "{:>width$}", "Assignment")?;
    for dim in 1..=dimensions {
        write!(writer, " {:>10}", format!("w{dim}"))?;
    }
    if with_height {
        write!(writer, " {:>12}", "Data Height")?;
    }
    if with_volume {
        write!(writer, " {:>12}", "Volume")?;
    }
    writeln!(writer)?;
    writeln!(writer)?;

    for (peak, assignment) in peaks.iter().zip(&assignments) {
        write!(writer, "{assignment:>width$}")?;
        for shift in &peak.shifts {
            write!(writer, " {:>10.3}", shift.value)?;
        }
        if with_height {
            write!(writer, " {:>12}", optional(peak.height))?;
        }
        if with_volume {
            write!(writer, " {:>12}", optional(peak.volume))?;
        }
        if !peak.comment.is_empty() {
            write!(writer, "  {}", peak.comment)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "0".to_string(), |v| format!("{v:.0}"))
}

/// `G16H-N`: the residue is written only where it differs from the
/// previous atom's.
pub(super) fn format_assignment(peak: &NewPeak) -> String {
    let mut previous: Option<&Residue> = None;
    peak.shifts
        .iter()
        .map(|shift| {
            let atom = &shift.atom;
            if atom.is_unassigned() {
                previous = None;
                return "?".to_string();
            }
            let part = if previous == Some(&atom.residue) {
                atom.atom_name.clone()
            } else {
                format!("{}{}", residue_code(atom), atom.atom_name)
            };
            previous = Some(&atom.residue);
            part
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn residue_code(atom: &AtomLabel) -> String {
    let residue = &atom.residue;
    let code = match residue.residue_name.parse::<StandardResidue>() {
        Ok(standard) => standard.one_letter().to_string(),
        Err(_) if residue.residue_name == UNUSED => String::new(),
        Err(_) => residue.residue_name.clone(),
    };
    format!("{code}{}", residue.nef_sequence_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::sparky::reader::parse_assignment;
    use crate::model::residue::Residue;
    use crate::model::shift::ShiftData;
    use crate::nef::lookup::SequenceLookup;

    fn peak(atoms: Vec<AtomLabel>, values: &[f64]) -> NewPeak {
        NewPeak::new(
            atoms
                .into_iter()
                .zip(values)
                .map(|(atom, value)| ShiftData::new(atom, *value))
                .collect(),
        )
    }

    #[test]
    fn shared_residue_prefix_is_omitted() {
        let g16 = Residue::new("A", 16, "GLY");
        let p = peak(
            vec![AtomLabel::new(g16.clone(), "H"), AtomLabel::new(g16, "N")],
            &[8.1, 110.4],
        );
        assert_eq!(format_assignment(&p), "G16H-N");
    }

    #[test]
    fn unassigned_atoms_are_question_marks() {
        let p = peak(vec![AtomLabel::unassigned(), AtomLabel::unassigned()], &[7.0, 120.0]);
        assert_eq!(format_assignment(&p), "?-?");
    }

    #[test]
    fn written_assignments_read_back() {
        let p = peak(
            vec![
                AtomLabel::new(Residue::new("A", 5, "LEU"), "HB2"),
                AtomLabel::new(Residue::new("A", 6, "TRP"), "CB"),
            ],
            &[1.2, 40.1],
        );
        let text = format_assignment(&p);
        assert_eq!(text, "L5HB2-W6CB");
        let atoms = parse_assignment(&text, 2, "A", &SequenceLookup::new()).unwrap();
        assert_eq!(atoms[0].residue.residue_name, "LEU");
        assert_eq!(atoms[1].residue.residue_name, "TRP");
        assert_eq!(atoms[1].atom_name, "CB");
    }

    #[test]
    fn writes_header_and_rows() {
        let g16 = Residue::new("A", 16, "GLY");
        let p = peak(
            vec![AtomLabel::new(g16.clone(), "H"), AtomLabel::new(g16, "N")],
            &[8.123, 110.456],
        )
        .with_height(Some(123456.0), None);

        let mut out = Vec::new();
        write(&mut out, &[p]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0].split_whitespace().collect::<Vec<_>>(),
            vec!["Assignment", "w1", "w2", "Data", "Height"]
        );
        assert_eq!(lines[1], "");
        assert_eq!(
            lines[2].split_whitespace().collect::<Vec<_>>(),
            vec!["G16H-N", "8.123", "110.456", "123456"]
        );
    }
}
