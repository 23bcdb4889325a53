use std::io::Cursor;

use nef_forge::io::{nmrview, sparky, xplor};
use nef_forge::model::residue::{Linking, Residue, SequenceResidue};
use nef_forge::nef::config::ConvertConfig;
use nef_forge::nef::lookup::{SequenceLookup, build_lookup};
use nef_forge::nef::meta::{new_entry, select_frame};
use nef_forge::nef::peaks::{PEAK_LOOP, SPECTRUM, frame_to_peaks, peaks_to_frame};
use nef_forge::nef::restraints::{VIOLATION_LOOP, collapse_violations, violations_to_frame};
use nef_forge::nef::sequence::{entry_sequence, sequence_to_frame};
use nef_forge::star::{self, Entry};

const XPK: &str = "\
label dataset sw sf
15N 1H
hsqc.nv
{2000.0} {4000.0}
{60.81} {600.13}
 15N.L 15N.P 15N.W 1H.L 1H.P 1H.W vol int comment
0 {23.HN} 120.310 0.5 {23.H} 8.512 0.05 1.5e5 2.0e4 {}
";

const REPORT: &str = "\
 NOE restraints in potential term: noe
 -------------------------------------------------------------------------

     1 ( A 22 LEU HB2 ) ( A 24 ALA HA )      5.600   3.500   1.800   5.000   0.600
       ( A 22 LEU HB3 )                      5.600   3.500   1.800   5.000   0.600
 number of restraints: 1
";

fn reparse(entry: &Entry) -> Entry {
    star::parse(&entry.to_string()).unwrap()
}

fn entry_with_sequence() -> Entry {
    let sequence: Vec<SequenceResidue> = [(22, "LEU"), (23, "LYS"), (24, "ALA")]
        .into_iter()
        .enumerate()
        .map(|(i, (number, name))| {
            let linking = match i {
                0 => Linking::Start,
                2 => Linking::End,
                _ => Linking::Middle,
            };
            SequenceResidue::new(Residue::new("A", number, name), linking)
        })
        .collect();
    let mut entry = new_entry("demo", "nforge", "test");
    entry.add_frame(sequence_to_frame(&sequence).unwrap());
    entry
}

#[test]
fn nmrview_peaks_reach_the_nef_peak_loop() {
    let config = ConvertConfig::default();
    let list = nmrview::read(Cursor::new(XPK), "A", &SequenceLookup::new()).unwrap();
    let name = list.name.clone().unwrap();
    assert_eq!(name, "hsqc");

    let frame = peaks_to_frame(
        &name,
        &list.peaks,
        &list.dimensions,
        config.spectrum.proton_frequency,
        &config.spectrum,
    )
    .unwrap();
    let mut entry = new_entry("demo", "nforge", "test");
    entry.add_frame(frame);

    let entry = reparse(&entry);
    let frame = entry.frame("nef_nmr_spectrum_hsqc").unwrap();
    let peaks = frame.get_loop(PEAK_LOOP).unwrap();
    assert_eq!(peaks.nrows(), 1);

    let row = peaks.records().next().unwrap();
    assert_eq!(row.get("chain_code_1"), Some("A"));
    assert_eq!(row.get("sequence_code_1"), Some("23"));
    assert_eq!(row.get("atom_name_1"), Some("HN"));
    assert_eq!(row.get("atom_name_2"), Some("H"));
    assert_eq!(row.get("position_1"), Some("120.31"));
}

#[test]
fn spectra_export_to_sparky_and_back() {
    let mut entry = entry_with_sequence();
    let lookup = build_lookup(&entry_sequence(&entry).unwrap());
    let config = ConvertConfig::default();

    let list = nmrview::read(Cursor::new(XPK), "A", &lookup).unwrap();
    let frame = peaks_to_frame(
        "hsqc",
        &list.peaks,
        &list.dimensions,
        config.spectrum.proton_frequency,
        &config.spectrum,
    )
    .unwrap();
    entry.add_frame(frame);
    let entry = reparse(&entry);

    let frame = select_frame(&entry, SPECTRUM, Some("hsqc")).unwrap();
    let peaks = frame_to_peaks(frame).unwrap();
    let mut text = Vec::new();
    sparky::write(&mut text, &peaks).unwrap();
    let text = String::from_utf8(text).unwrap();
    assert!(text.contains("K23HN-H"));

    let back = sparky::read(Cursor::new(text), "A", &lookup).unwrap();
    assert_eq!(back.peaks.len(), 1);
    let shifts = &back.peaks[0].shifts;
    assert_eq!(shifts[0].atom.residue.residue_name, "LYS");
    assert_eq!(shifts[0].atom.atom_name, "HN");
    assert_eq!(shifts[1].atom.atom_name, "H");
    assert!((shifts[0].value - 120.31).abs() < 1e-9);
    assert!((shifts[1].value - 8.512).abs() < 1e-9);
}

#[test]
fn xplor_violations_collapse_into_one_row() {
    let mut entry = entry_with_sequence();
    let violations = xplor::read_violations(Cursor::new(REPORT), 1, "A").unwrap();
    assert_eq!(violations.len(), 2);

    let collapsed = collapse_violations(&violations, ConvertConfig::default().collapse_depth);
    entry.add_frame(violations_to_frame("noe", &collapsed).unwrap());
    let entry = reparse(&entry);

    let frame = entry.frame("np_violation_list_noe").unwrap();
    let rows = frame.get_loop(VIOLATION_LOOP).unwrap();
    assert_eq!(rows.nrows(), 1);
    let row = rows.records().next().unwrap();
    assert_eq!(row.get("atom_name_1"), Some("HB%"));
    assert_eq!(row.get("atom_name_2"), Some("HA"));
    assert_eq!(row.get("restraint_list"), Some("noe"));
    let violation: f64 = row.get("violation").unwrap().parse().unwrap();
    assert!((violation - 0.6).abs() < 1e-9);
}
