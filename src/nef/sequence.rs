//! Sequences and the `nef_molecular_system` frame.

use tracing::debug;

use super::error::Error;
use super::values::{bool_str, or_unused, read_bool};
use crate::model::residue::{Linking, Residue, SequenceResidue, UNUSED};
use crate::nef::lookup::parse_sequence_code;
use crate::star::{Entry, Loop, Saveframe};

pub const MOLECULAR_SYSTEM: &str = "nef_molecular_system";
pub const SEQUENCE_LOOP: &str = "nef_sequence";

const SEQUENCE_TAGS: [&str; 7] = [
    "index",
    "chain_code",
    "sequence_code",
    "residue_name",
    "linking",
    "residue_variant",
    "cis_peptide",
];

/// Assigns positional linking to an ordered list of residues.
///
/// Each chain's first residue is `start` and its last `end`, unless the
/// chain is listed in `no_start` / `no_end`, in which case the terminus is
/// `middle`. A chain of one residue with neither exclusion is `free`.
pub fn derive_linking(
    residues: &[Residue],
    no_start: &[&str],
    no_end: &[&str],
) -> Vec<SequenceResidue> {
    let mut chains: Vec<(&str, Vec<&Residue>)> = Vec::new();
    for residue in residues {
        match chains.iter_mut().find(|(code, _)| *code == residue.chain_code) {
            Some((_, members)) => members.push(residue),
            None => chains.push((residue.chain_code.as_str(), vec![residue])),
        }
    }

    let mut result = Vec::with_capacity(residues.len());
    for (chain, members) in chains {
        let open_start = !no_start.contains(&chain);
        let open_end = !no_end.contains(&chain);
        let last = members.len() - 1;
        for (i, residue) in members.into_iter().enumerate() {
            let linking = match (i == 0 && open_start, i == last && open_end) {
                (true, true) => Linking::Free,
                (true, false) => Linking::Start,
                (false, true) => Linking::End,
                (false, false) => Linking::Middle,
            };
            result.push(SequenceResidue::new(residue.clone(), linking));
        }
    }
    result
}

/// Builds the `nef_molecular_system` frame.
pub fn sequence_to_frame(sequence: &[SequenceResidue]) -> Result<Saveframe, Error> {
    let mut frame = Saveframe::new(MOLECULAR_SYSTEM, MOLECULAR_SYSTEM);
    let mut lp = Loop::with_tags(SEQUENCE_LOOP, SEQUENCE_TAGS)?;
    for (i, entry) in sequence.iter().enumerate() {
        let residue = &entry.residue;
        let variants = if entry.variants.is_empty() {
            UNUSED.to_string()
        } else {
            entry.variants.join(",")
        };
        lp.add_row([
            (i + 1).to_string(),
            or_unused(&residue.chain_code),
            or_unused(&residue.nef_sequence_code()),
            or_unused(&residue.residue_name),
            entry.linking.to_string(),
            variants,
            bool_str(entry.is_cis).to_string(),
        ])?;
    }
    frame.add_loop(lp);
    Ok(frame)
}

/// Reads the residues of a `nef_molecular_system` frame.
pub fn frame_to_sequence(frame: &Saveframe) -> Result<Vec<SequenceResidue>, Error> {
    let lp = frame
        .get_loop(SEQUENCE_LOOP)
        .ok_or_else(|| Error::missing_loop(frame.name(), SEQUENCE_LOOP))?;
    for tag in ["chain_code", "sequence_code", "residue_name"] {
        if !lp.has_tag(tag) {
            return Err(Error::missing_column(SEQUENCE_LOOP, tag));
        }
    }

    lp.records()
        .map(|record| -> Result<SequenceResidue, Error> {
            let cell = |tag: &str| record.get(tag).unwrap_or(UNUSED);
            let parsed = parse_sequence_code(cell("sequence_code"));
            let residue = Residue::new(cell("chain_code"), parsed.code, cell("residue_name"))
                .with_prefix(parsed.prefix)
                .with_offset(parsed.offset);

            let linking = match record.get_used("linking") {
                Some(text) => text
                    .parse::<Linking>()
                    .map_err(|detail| Error::bad_value(frame.name(), "linking", text, detail))?,
                None => Linking::default(),
            };
            let variants = record
                .get_used("residue_variant")
                .map(|v| v.split(',').map(str::to_string).collect())
                .unwrap_or_default();
            let is_cis = read_bool(&record, "cis_peptide", frame.name())?.unwrap_or(false);

            Ok(SequenceResidue::new(residue, linking)
                .with_cis(is_cis)
                .with_variants(variants))
        })
        .collect()
}

/// The sequence of an entry's molecular system, empty when it has none.
pub fn entry_sequence(entry: &Entry) -> Result<Vec<SequenceResidue>, Error> {
    match entry.frames_in_category(MOLECULAR_SYSTEM).next() {
        Some(frame) => frame_to_sequence(frame),
        None => {
            debug!(
                "entry '{}' has no molecular system, residue names stay unknown",
                entry.name()
            );
            Ok(Vec::new())
        }
    }
}
