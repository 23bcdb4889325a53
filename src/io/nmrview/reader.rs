use crate::io::util::{collect_lines, parse_field, split_tcl_fields};
use crate::io::{Format, PeakList, error::Error};
use crate::model::peak::{DimensionInfo, NewPeak};
use crate::model::residue::AtomLabel;
use crate::model::shift::ShiftData;
use crate::model::types::Isotope;
use crate::nef::lookup::{SequenceLookup, resolve_atom};
use std::collections::HashMap;
use std::io::BufRead;
use tracing::{debug, warn};

const LABEL_KEY: &str = "label";
const DATASET_KEY: &str = "dataset";
const FREQUENCY_KEY: &str = "sf";

/// Reads an NMRView `.xpk` peak list.
///
/// Assignments are `<sequence code>.<atom>` and are placed on `chain_code`;
/// residue names come from `lookup`.
pub fn read<R: BufRead>(
    reader: R,
    chain_code: &str,
    lookup: &SequenceLookup,
) -> Result<PeakList, Error> {
    let lines: Vec<(usize, String)> = collect_lines(reader)?
        .into_iter()
        .filter(|(_, line)| !line.trim().is_empty())
        .collect();
    let mut cursor = lines.iter();

    let (_, header) = cursor
        .next()
        .ok_or_else(|| Error::parse(Format::NmrView, 1, "empty file"))?;
    let keys: Vec<&str> = header.split_whitespace().collect();
    if !keys.contains(&LABEL_KEY) {
        return Err(Error::parse_line(
            Format::NmrView,
            1,
            header,
            "header must list the 'label' key",
        ));
    }

    let mut values: HashMap<&str, (usize, &str, Vec<String>)> = HashMap::new();
    for key in &keys {
        let (ln, line) = cursor.next().ok_or_else(|| {
            Error::parse(Format::NmrView, lines.len(), format!("missing values for '{key}'"))
        })?;
        let fields = split_tcl_fields(line)
            .map_err(|details| Error::parse_line(Format::NmrView, *ln, line, details))?;
        values.insert(*key, (*ln, line.as_str(), fields));
    }

    let labels = values
        .get(LABEL_KEY)
        .map(|(_, _, fields)| fields.clone())
        .unwrap_or_default();
    if labels.is_empty() {
        return Err(Error::parse(Format::NmrView, 2, "no axis labels"));
    }

    let frequencies: Vec<Option<f64>> = match values.get(FREQUENCY_KEY) {
        Some((ln, raw, fields)) => {
            if fields.len() != labels.len() {
                return Err(Error::parse_line(
                    Format::NmrView,
                    *ln,
                    raw,
                    format!("expected {} frequencies, found {}", labels.len(), fields.len()),
                ));
            }
            fields
                .iter()
                .map(|f| parse_field(Format::NmrView, *ln, raw, f, "spectrometer frequency"))
                .map(|r| r.map(Some))
                .collect::<Result<_, _>>()?
        }
        None => vec![None; labels.len()],
    };

    let dimensions: Vec<DimensionInfo> = labels
        .iter()
        .zip(&frequencies)
        .map(|(label, frequency)| {
            let axis_code = match Isotope::guess_from_label(label) {
                Some(isotope) => isotope.axis_code().to_string(),
                None => {
                    warn!("cannot tell the isotope of NMRView axis '{label}'");
                    label.clone()
                }
            };
            DimensionInfo::new(axis_code)
                .with_axis_name(label.clone())
                .with_spectrometer_frequency(*frequency)
        })
        .collect();

    let name = values
        .get(DATASET_KEY)
        .and_then(|(_, _, fields)| fields.first())
        .map(|dataset| dataset_stem(dataset));

    let (columns_ln, columns_line) = cursor
        .next()
        .ok_or_else(|| Error::parse(Format::NmrView, lines.len(), "missing column header"))?;
    let columns: Vec<&str> = columns_line.split_whitespace().collect();
    let column = |name: &str| columns.iter().position(|c| *c == name);

    let mut axes = Vec::with_capacity(labels.len());
    for label in &labels {
        let position = column(&format!("{label}.P")).ok_or_else(|| {
            Error::parse_line(
                Format::NmrView,
                *columns_ln,
                columns_line,
                format!("no position column '{label}.P'"),
            )
        })?;
        axes.push((
            position,
            column(&format!("{label}.L")),
            column(&format!("{label}.W")),
        ));
    }
    let volume_col = column("vol");
    let height_col = column("int");
    let comment_col = column("comment");

    let mut peaks = Vec::new();
    for (ln, raw) in cursor {
        let fields = split_tcl_fields(raw)
            .map_err(|details| Error::parse_line(Format::NmrView, *ln, raw, details))?;
        if fields.len() != columns.len() + 1 {
            return Err(Error::parse_line(
                Format::NmrView,
                *ln,
                raw,
                format!(
                    "expected {} fields (peak id and {} columns), found {}",
                    columns.len() + 1,
                    columns.len(),
                    fields.len()
                ),
            ));
        }
        let id: i64 = parse_field(Format::NmrView, *ln, raw, &fields[0], "peak id")?;
        // data fields are shifted by the leading peak id
        let field = |col: usize| fields[col + 1].as_str();
        let optional = |col: Option<usize>, what: &str| -> Result<Option<f64>, Error> {
            match col.map(field).filter(|v| !v.is_empty()) {
                Some(text) => parse_field(Format::NmrView, *ln, raw, text, what).map(Some),
                None => Ok(None),
            }
        };

        let mut shifts = Vec::with_capacity(axes.len());
        for &(position, assignment, width) in &axes {
            let value: f64 = parse_field(Format::NmrView, *ln, raw, field(position), "position")?;
            let atom = assignment
                .map(field)
                .map(|text| parse_assignment(text, chain_code, lookup))
                .unwrap_or_else(AtomLabel::unassigned);
            shifts.push(
                ShiftData::new(atom, value).with_line_width(optional(width, "line width")?),
            );
        }

        let mut peak = NewPeak::new(shifts)
            .with_id(id)
            .with_height(optional(height_col, "intensity")?, None)
            .with_volume(optional(volume_col, "volume")?, None);
        if let Some(comment) = comment_col.map(field).filter(|c| !c.is_empty()) {
            peak = peak.with_comment(comment);
        }
        peaks.push(peak);
    }

    Ok(PeakList {
        name,
        dimensions,
        peaks,
    })
}

/// Resolves an assignment such as `23.HN`; `?`, empty or dot-less labels
/// are unassigned.
fn parse_assignment(text: &str, chain_code: &str, lookup: &SequenceLookup) -> AtomLabel {
    let text = text.trim();
    if text.is_empty() || text == "?" {
        return AtomLabel::unassigned();
    }
    match text.split_once('.') {
        Some((sequence_code, atom)) if !sequence_code.is_empty() && !atom.is_empty() => {
            resolve_atom(chain_code, sequence_code, atom, lookup)
        }
        _ => {
            debug!("treating NMRView label '{text}' as unassigned");
            AtomLabel::unassigned()
        }
    }
}

fn dataset_stem(dataset: &str) -> String {
    let file = dataset.rsplit(['/', '\\']).next().unwrap_or(dataset);
    match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::residue::{Linking, Residue, SequenceResidue};
    use crate::nef::lookup::build_lookup;
    use std::io::Cursor;

    const XPK: &str = "\
label dataset sw sf
HN N15
data/hsqc.nv
{4000.0} {2000.0}
{600.13} {60.81}
 HN.L HN.P HN.W HN.B HN.E HN.J HN.U N15.L N15.P N15.W N15.B N15.E N15.J N15.U vol int stat comment flag0
0 {23.HN} 8.512 0.021 0.05 ++ {0.0} {} {23.N} 120.31 0.25 0.5 ++ {0.0} {} 1.5e5 2.0e4 0 {} 0
1 {} 7.9 0.02 0.05 ++ {0.0} {} ? 115.0 0.25 0.5 ++ {0.0} {} 0.0 1.1e4 0 {weak peak} 0
";

    fn lookup() -> SequenceLookup {
        build_lookup(&[SequenceResidue::new(
            Residue::new("A", 23, "LYS"),
            Linking::Free,
        )])
    }

    #[test]
    fn reads_axes_and_peaks() {
        let list = read(Cursor::new(XPK), "A", &lookup()).unwrap();
        assert_eq!(list.name.as_deref(), Some("hsqc"));

        assert_eq!(list.dimensions.len(), 2);
        assert_eq!(list.dimensions[0].axis_code, "1H");
        assert_eq!(list.dimensions[0].axis_name.as_deref(), Some("HN"));
        assert_eq!(list.dimensions[1].axis_code, "15N");
        assert_eq!(list.dimensions[1].spectrometer_frequency, Some(60.81));

        assert_eq!(list.peaks.len(), 2);
        let first = &list.peaks[0];
        assert_eq!(first.id, Some(0));
        assert_eq!(first.height, Some(2.0e4));
        assert_eq!(first.volume, Some(1.5e5));
        assert_eq!(first.shifts[0].value, 8.512);
        assert_eq!(first.shifts[0].line_width, Some(0.021));
        assert_eq!(first.shifts[0].atom.atom_name, "HN");
        assert_eq!(first.shifts[0].atom.residue.residue_name, "LYS");
        assert_eq!(first.shifts[1].atom.residue.nef_sequence_code(), "23");

        let second = &list.peaks[1];
        assert!(second.shifts[0].atom.is_unassigned());
        assert!(second.shifts[1].atom.is_unassigned());
        assert_eq!(second.comment, "weak peak");
    }

    #[test]
    fn short_rows_are_rejected_with_line() {
        let text = "label\nH\n H.L H.P\n0 {1.H}\n";
        match read(Cursor::new(text), "A", &SequenceLookup::new()).unwrap_err() {
            Error::Parse { line, content, .. } => {
                assert_eq!(line, 4);
                assert_eq!(content, "0 {1.H}");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn missing_position_column_is_an_error() {
        let text = "label\nH\n H.L\n";
        assert!(matches!(
            read(Cursor::new(text), "A", &SequenceLookup::new()),
            Err(Error::Parse { line: 3, .. })
        ));
    }

    #[test]
    fn header_without_label_is_rejected() {
        let text = "dataset sw\nx.nv\n{1}\n";
        assert!(read(Cursor::new(text), "A", &SequenceLookup::new()).is_err());
    }

    #[test]
    fn dataset_stem_drops_path_and_extension() {
        assert_eq!(dataset_stem("data/hsqc.nv"), "hsqc");
        assert_eq!(dataset_stem("noesy"), "noesy");
    }
}
