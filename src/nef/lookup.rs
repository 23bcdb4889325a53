//! Residue and atom resolution against a known sequence.

use std::collections::BTreeMap;

use tracing::warn;

use crate::model::residue::{
    AtomLabel, PSEUDO_RESIDUE_PREFIX, Residue, SequenceCode, SequenceResidue, UNUSED,
};

/// `(chain_code, sequence_code) -> residue_name` built from a sequence.
///
/// Misses resolve to the unused marker so partially known sequences can
/// still be used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceLookup {
    residues: BTreeMap<(String, SequenceCode), String>,
}

impl SequenceLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a residue name; later inserts for the same key win.
    pub fn insert(
        &mut self,
        chain_code: impl Into<String>,
        sequence_code: SequenceCode,
        residue_name: impl Into<String>,
    ) {
        self.residues
            .insert((chain_code.into(), sequence_code), residue_name.into());
    }

    pub fn get(&self, chain_code: &str, sequence_code: &SequenceCode) -> &str {
        self.residues
            .get(&(chain_code.to_string(), sequence_code.clone()))
            .map(String::as_str)
            .unwrap_or(UNUSED)
    }

    pub fn contains(&self, chain_code: &str, sequence_code: &SequenceCode) -> bool {
        self.residues
            .contains_key(&(chain_code.to_string(), sequence_code.clone()))
    }

    /// Distinct chain codes in sorted order.
    pub fn chain_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.residues.keys().map(|(c, _)| c.as_str()).collect();
        codes.dedup();
        codes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

/// Builds a lookup from a sequence; duplicated keys keep the last name.
pub fn build_lookup<'a, I>(sequence: I) -> SequenceLookup
where
    I: IntoIterator<Item = &'a SequenceResidue>,
{
    let mut lookup = SequenceLookup::new();
    for entry in sequence {
        let residue = &entry.residue;
        lookup.insert(
            residue.chain_code.clone(),
            residue.sequence_code.clone(),
            residue.residue_name.clone(),
        );
    }
    lookup
}

/// A sequence code split into prefix, code and relative offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSequenceCode {
    pub prefix: String,
    pub code: SequenceCode,
    pub offset: i32,
}

/// Splits `@65-1` into prefix `@`, code `65` and offset `-1`.
///
/// A leading sign belongs to the code (`-5` is residue minus five); only a
/// sign after the first character starts an offset.
pub fn parse_sequence_code(text: &str) -> ParsedSequenceCode {
    let text = text.trim();
    let (prefix, rest) = match text.strip_prefix(PSEUDO_RESIDUE_PREFIX) {
        Some(rest) => (PSEUDO_RESIDUE_PREFIX.to_string(), rest),
        None => (String::new(), text),
    };
    let (code, offset) = split_offset(rest);
    ParsedSequenceCode {
        prefix,
        code: SequenceCode::from(code),
        offset,
    }
}

/// Splits a relative-residue suffix off an atom name: `CA-1` is `(CA, -1)`.
pub fn split_atom_offset(atom_name: &str) -> (&str, i32) {
    split_offset(atom_name.trim())
}

fn split_offset(text: &str) -> (&str, i32) {
    let Some(idx) = text.rfind(['+', '-']).filter(|&idx| idx > 0) else {
        return (text, 0);
    };
    let digits = &text[idx + 1..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return (text, 0);
    }
    match text[idx..].parse::<i32>() {
        Ok(offset) => (&text[..idx], offset),
        Err(_) => (text, 0),
    }
}

/// Resolves a textual residue/atom reference into an [`AtomLabel`].
///
/// Offsets on the sequence code and on the atom name are summed. The residue
/// name is looked up at `code + offset` for numeric codes of real residues,
/// by label for non-numeric codes, and is unused for pseudo residues. When
/// the offsets or the target number overflow `i32`, the residue name stays
/// unused and the offset saturates.
pub fn resolve_atom(
    chain_code: &str,
    sequence_code: &str,
    atom_name: &str,
    lookup: &SequenceLookup,
) -> AtomLabel {
    let parsed = parse_sequence_code(sequence_code);
    let (atom, atom_offset) = split_atom_offset(atom_name);
    let offset = parsed.offset.checked_add(atom_offset).unwrap_or_else(|| {
        warn!("offset of '{sequence_code}' plus '{atom_name}' overflows, saturating");
        parsed.offset.saturating_add(atom_offset)
    });

    let residue_name = if parsed.prefix == PSEUDO_RESIDUE_PREFIX {
        UNUSED.to_string()
    } else {
        match &parsed.code {
            SequenceCode::Number(n) => match n.checked_add(offset) {
                Some(target) => lookup
                    .get(chain_code, &SequenceCode::Number(target))
                    .to_string(),
                None => {
                    warn!("residue {n}{offset:+} of chain {chain_code} is out of range");
                    UNUSED.to_string()
                }
            },
            label @ SequenceCode::Label(_) if offset == 0 => {
                lookup.get(chain_code, label).to_string()
            }
            SequenceCode::Label(_) => UNUSED.to_string(),
        }
    };

    let residue = Residue::new(chain_code, parsed.code, residue_name)
        .with_prefix(parsed.prefix)
        .with_offset(offset);
    AtomLabel::new(residue, atom.to_ascii_uppercase())
}
