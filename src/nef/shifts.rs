//! The `nef_chemical_shift_list` frame.

use tracing::info;

use super::error::Error;
use super::values::{atom_cells, opt_display, opt_f64, read_atom, read_f64};
use crate::model::peak::PPM;
use crate::model::shift::ShiftData;
use crate::star::{Loop, Saveframe};

pub const SHIFT_LIST: &str = "nef_chemical_shift_list";
pub const SHIFT_LOOP: &str = "nef_chemical_shift";

const SHIFT_TAGS: [&str; 8] = [
    "chain_code",
    "sequence_code",
    "residue_name",
    "atom_name",
    "value",
    "value_uncertainty",
    "element",
    "isotope_number",
];

pub fn shifts_to_frame(name: &str, shifts: &[ShiftData]) -> Result<Saveframe, Error> {
    let mut frame = Saveframe::new(SHIFT_LIST, format!("{SHIFT_LIST}_{name}"));
    frame.add_tag("atom_chem_shift_units", PPM);

    let mut lp = Loop::with_tags(SHIFT_LOOP, SHIFT_TAGS)?;
    for shift in shifts {
        let [chain, sequence, residue, atom] = atom_cells(&shift.atom);
        lp.add_row([
            chain,
            sequence,
            residue,
            atom,
            shift.value.to_string(),
            opt_f64(shift.value_uncertainty),
            opt_display(shift.atom.element.as_deref()),
            opt_display(shift.atom.isotope_number),
        ])?;
    }
    frame.add_loop(lp);
    info!("built {} with {} shifts", frame.name(), shifts.len());
    Ok(frame)
}

pub fn frame_to_shifts(frame: &Saveframe) -> Result<Vec<ShiftData>, Error> {
    let lp = frame
        .get_loop(SHIFT_LOOP)
        .ok_or_else(|| Error::missing_loop(frame.name(), SHIFT_LOOP))?;
    if !lp.has_tag("value") {
        return Err(Error::missing_column(SHIFT_LOOP, "value"));
    }

    lp.records()
        .map(|record| -> Result<ShiftData, Error> {
            let value = read_f64(&record, "value", frame.name())?.ok_or_else(|| {
                Error::bad_value(frame.name(), "value", ".", "a chemical shift needs a value")
            })?;
            let mut atom = read_atom(&record, 1);
            if let Some(element) = record.get_used("element") {
                let isotope = record
                    .get_used("isotope_number")
                    .map(|text| {
                        text.parse::<u32>().map_err(|e| {
                            Error::bad_value(frame.name(), "isotope_number", text, e.to_string())
                        })
                    })
                    .transpose()?;
                atom.element = Some(element.to_string());
                atom.isotope_number = isotope;
            }
            Ok(ShiftData::new(atom, value)
                .with_uncertainty(read_f64(&record, "value_uncertainty", frame.name())?))
        })
        .collect()
}
