use crate::io::util::{collect_lines, parse_field};
use crate::io::{Format, PeakList, error::Error};
use crate::model::peak::{DimensionInfo, NewPeak};
use crate::model::residue::{AtomLabel, UNUSED};
use crate::model::shift::ShiftData;
use crate::model::types::{Isotope, residue_name_from_code};
use crate::nef::lookup::{SequenceLookup, resolve_atom};
use std::io::BufRead;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Height,
    Volume,
    Other,
}

/// Reads a Sparky peak list (`Assignment w1 .. wN [Data Height] [Volume]`).
///
/// Residues are placed on `chain_code`; one-letter residue codes in the
/// assignment win over the names in `lookup`.
pub fn read<R: BufRead>(
    reader: R,
    chain_code: &str,
    lookup: &SequenceLookup,
) -> Result<PeakList, Error> {
    let lines = collect_lines(reader)?;
    let mut rows = lines.iter().filter(|(_, line)| !line.trim().is_empty());

    let (header_ln, header) = rows
        .next()
        .ok_or_else(|| Error::parse(Format::Sparky, 1, "empty file"))?;
    let (axes, columns) = parse_header(header)
        .map_err(|details| Error::parse_line(Format::Sparky, *header_ln, header, details))?;

    let mut peaks = Vec::new();
    for (ln, raw) in rows {
        let fields: Vec<&str> = raw.split_whitespace().collect();
        let expected = 1 + axes.len() + columns.len();
        if fields.len() < expected {
            return Err(Error::parse_line(
                Format::Sparky,
                *ln,
                raw,
                format!("expected at least {expected} fields, found {}", fields.len()),
            ));
        }

        let atoms = parse_assignment(fields[0], axes.len(), chain_code, lookup)
            .map_err(|details| Error::parse_line(Format::Sparky, *ln, raw, details))?;

        let mut shifts = Vec::with_capacity(axes.len());
        for (atom, text) in atoms.into_iter().zip(&fields[1..=axes.len()]) {
            let value: f64 = parse_field(Format::Sparky, *ln, raw, text, "position")?;
            shifts.push(ShiftData::new(atom, value));
        }

        let mut peak = NewPeak::new(shifts).with_id(peaks.len() as i64 + 1);
        for (column, text) in columns.iter().zip(&fields[1 + axes.len()..]) {
            match column {
                Column::Height => {
                    let height = parse_field(Format::Sparky, *ln, raw, text, "height")?;
                    peak = peak.with_height(Some(height), None);
                }
                Column::Volume => {
                    let volume = parse_field(Format::Sparky, *ln, raw, text, "volume")?;
                    peak = peak.with_volume(Some(volume), None);
                }
                Column::Other => {}
            }
        }
        if fields.len() > expected {
            peak = peak.with_comment(fields[expected..].join(" "));
        }
        peaks.push(peak);
    }

    let dimensions = axes
        .iter()
        .enumerate()
        .map(|(dim, axis)| DimensionInfo::new(guess_axis_code(&peaks, dim)).with_axis_name(*axis))
        .collect();

    Ok(PeakList {
        name: None,
        dimensions,
        peaks,
    })
}

fn parse_header(header: &str) -> Result<(Vec<&str>, Vec<Column>), String> {
    let mut tokens = header.split_whitespace().peekable();
    if tokens.next() != Some("Assignment") {
        return Err("header must start with 'Assignment'".to_string());
    }

    let mut axes = Vec::new();
    while let Some(token) = tokens.next_if(|t| is_axis_column(t)) {
        axes.push(token);
    }
    if axes.is_empty() {
        return Err("header lists no w1..wN columns".to_string());
    }

    let mut columns = Vec::new();
    while let Some(token) = tokens.next() {
        // Unit labels such as `(hz)` annotate the column before them.
        if token.starts_with('(') && token.ends_with(')') {
            continue;
        }
        let column = match token {
            "Data" if tokens.peek() == Some(&"Height") => {
                tokens.next();
                Column::Height
            }
            "Height" => Column::Height,
            "Volume" => Column::Volume,
            _ => Column::Other,
        };
        columns.push(column);
    }
    Ok((axes, columns))
}

fn is_axis_column(token: &str) -> bool {
    token
        .strip_prefix('w')
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Splits `G16H-N` into one atom per dimension. A part without its own
/// residue reuses the previous part's residue; `?` is unassigned.
pub(super) fn parse_assignment(
    text: &str,
    dimensions: usize,
    chain_code: &str,
    lookup: &SequenceLookup,
) -> Result<Vec<AtomLabel>, String> {
    let parts: Vec<&str> = text.split('-').collect();
    if parts.len() != dimensions {
        return Err(format!(
            "assignment '{text}' has {} parts for {dimensions} dimensions",
            parts.len()
        ));
    }

    let mut atoms = Vec::with_capacity(dimensions);
    let mut previous: Option<AtomLabel> = None;
    for part in parts {
        if part == "?" || part.is_empty() {
            atoms.push(AtomLabel::unassigned());
            continue;
        }
        let atom = match split_residue(part) {
            Some((code, number, atom_name)) => {
                let atom = resolve_atom(chain_code, number, atom_name, lookup);
                if code.is_empty() {
                    atom
                } else {
                    AtomLabel {
                        residue: atom.residue.with_residue_name(residue_name_from_code(code)),
                        ..atom
                    }
                }
            }
            None => match &previous {
                Some(previous) => previous.clone().with_atom_name(part.to_ascii_uppercase()),
                None => return Err(format!("'{part}' names no residue")),
            },
        };
        previous = Some(atom.clone());
        atoms.push(atom);
    }
    Ok(atoms)
}

/// `G16HA` is `("G", "16", "HA")`; parts with no number or no atom name
/// after it carry no residue.
fn split_residue(part: &str) -> Option<(&str, &str, &str)> {
    let letters = part.find(|c: char| !c.is_ascii_alphabetic())?;
    let rest = &part[letters..];
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits == 0 || digits == rest.len() {
        return None;
    }
    Some((&part[..letters], &rest[..digits], &rest[digits..]))
}

fn guess_axis_code(peaks: &[NewPeak], dim: usize) -> String {
    let isotope = peaks
        .iter()
        .filter_map(|peak| peak.shifts.get(dim))
        .find(|shift| !shift.atom.is_unassigned())
        .and_then(|shift| Isotope::guess_from_label(&shift.atom.atom_name));
    match isotope {
        Some(isotope) => isotope.axis_code().to_string(),
        None => {
            warn!("cannot tell the isotope of Sparky axis w{}", dim + 1);
            UNUSED.to_string()
        }
    }
}
