//! Conversions between typed values and NEF loop cells.

use super::error::Error;
use crate::model::residue::{AtomLabel, Residue, UNUSED};
use crate::nef::lookup::parse_sequence_code;
use crate::star::Record;

pub(crate) fn opt_f64(value: Option<f64>) -> String {
    value.map_or_else(|| UNUSED.to_string(), |v| v.to_string())
}

pub(crate) fn opt_display<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| UNUSED.to_string(), |v| v.to_string())
}

pub(crate) fn or_unused(value: &str) -> String {
    if value.is_empty() {
        UNUSED.to_string()
    } else {
        value.to_string()
    }
}

pub(crate) fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// The four assignment cells of an atom: chain, sequence code, residue, atom.
pub(crate) fn atom_cells(atom: &AtomLabel) -> [String; 4] {
    let residue = &atom.residue;
    [
        or_unused(&residue.chain_code),
        or_unused(&residue.nef_sequence_code()),
        or_unused(&residue.residue_name),
        or_unused(&atom.atom_name),
    ]
}

/// Assignment column names for atom `n` (1-based).
pub(crate) fn atom_tags(n: usize) -> [String; 4] {
    [
        format!("chain_code_{n}"),
        format!("sequence_code_{n}"),
        format!("residue_name_{n}"),
        format!("atom_name_{n}"),
    ]
}

/// Rebuilds atom `n` of a row; absent columns read as unused.
pub(crate) fn read_atom(record: &Record<'_>, n: usize) -> AtomLabel {
    let [chain, sequence, residue_name, atom_name] = atom_tags(n);
    let cell = |tag: &str| record.get(tag).unwrap_or(UNUSED).to_string();

    let parsed = parse_sequence_code(&cell(&sequence));
    let residue = Residue::new(cell(&chain), parsed.code, cell(&residue_name))
        .with_prefix(parsed.prefix)
        .with_offset(parsed.offset);
    AtomLabel::new(residue, cell(&atom_name))
}

/// Reads an optional float; absent columns and `.` are `None`.
pub(crate) fn read_f64(record: &Record<'_>, tag: &str, origin: &str) -> Result<Option<f64>, Error> {
    match record.get_used(tag) {
        None => Ok(None),
        Some(text) => text
            .parse::<f64>()
            .map(Some)
            .map_err(|e| Error::bad_value(origin, tag, text, e.to_string())),
    }
}

pub(crate) fn read_usize(record: &Record<'_>, tag: &str, origin: &str) -> Result<Option<usize>, Error> {
    match record.get_used(tag) {
        None => Ok(None),
        Some(text) => text
            .parse::<usize>()
            .map(Some)
            .map_err(|e| Error::bad_value(origin, tag, text, e.to_string())),
    }
}

pub(crate) fn read_bool(record: &Record<'_>, tag: &str, origin: &str) -> Result<Option<bool>, Error> {
    match record.get_used(tag) {
        None => Ok(None),
        Some(text) => match text.to_ascii_lowercase().as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(Error::bad_value(origin, tag, text, "expected true or false")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::star::Loop;

    #[test]
    fn optional_values_render_unused() {
        assert_eq!(opt_f64(None), ".");
        assert_eq!(opt_f64(Some(1.25)), "1.25");
        assert_eq!(or_unused(""), ".");
        assert_eq!(opt_display(Some(3usize)), "3");
    }

    #[test]
    fn atoms_round_trip_through_cells() {
        let atom = AtomLabel::new(
            Residue::new("A", 65, ".").with_prefix("@").with_offset(-1),
            "CA",
        );
        let mut lp = Loop::with_tags("x", atom_tags(1)).unwrap();
        lp.add_row(atom_cells(&atom)).unwrap();
        let record = lp.records().next().unwrap();
        assert_eq!(read_atom(&record, 1), atom);
        assert_eq!(read_atom(&record, 2), AtomLabel::unassigned());
    }

    #[test]
    fn bad_numbers_name_the_column() {
        let mut lp = Loop::with_tags("x", ["height"]).unwrap();
        lp.add_row(["tall"]).unwrap();
        let record = lp.records().next().unwrap();
        let err = read_f64(&record, "height", "frame").unwrap_err();
        assert!(matches!(err, Error::BadValue { ref tag, .. } if tag == "height"));
    }
}
