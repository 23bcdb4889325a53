use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Marker written for missing or unused values in NEF.
pub const UNUSED: &str = ".";

/// Prefix marking a pseudo residue (an unassigned placeholder such as `@65`).
pub const PSEUDO_RESIDUE_PREFIX: &str = "@";

/// Canonical unassigned atom; every field is the unused marker.
pub static UNASSIGNED_ATOM: LazyLock<AtomLabel> = LazyLock::new(AtomLabel::unassigned);

/// A residue sequence code: numeric for sequential residues, free text otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SequenceCode {
    Number(i32),
    Label(String),
}

impl SequenceCode {
    pub fn unused() -> Self {
        SequenceCode::Label(UNUSED.to_string())
    }

    pub fn is_unused(&self) -> bool {
        matches!(self, SequenceCode::Label(label) if label == UNUSED)
    }

    pub fn as_number(&self) -> Option<i32> {
        match self {
            SequenceCode::Number(n) => Some(*n),
            SequenceCode::Label(_) => None,
        }
    }
}

impl fmt::Display for SequenceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceCode::Number(n) => write!(f, "{n}"),
            SequenceCode::Label(label) => f.write_str(label),
        }
    }
}

impl FromStr for SequenceCode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.parse::<i32>() {
            Ok(n) => SequenceCode::Number(n),
            Err(_) => SequenceCode::Label(trimmed.to_string()),
        })
    }
}

impl From<i32> for SequenceCode {
    fn from(value: i32) -> Self {
        SequenceCode::Number(value)
    }
}

impl From<&str> for SequenceCode {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(code) => code,
            Err(never) => match never {},
        }
    }
}

/// A residue identity, optionally a pseudo residue (`@65`) or a relative
/// residue (`offset = -1` for the `i-1` residue seen in HNCA-type spectra).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Residue {
    pub chain_code: String,
    pub sequence_code: SequenceCode,
    pub residue_name: String,
    pub sequence_code_prefix: String,
    pub offset: i32,
}

impl Residue {
    pub fn new(
        chain_code: impl Into<String>,
        sequence_code: impl Into<SequenceCode>,
        residue_name: impl Into<String>,
    ) -> Self {
        Self {
            chain_code: chain_code.into(),
            sequence_code: sequence_code.into(),
            residue_name: residue_name.into(),
            sequence_code_prefix: String::new(),
            offset: 0,
        }
    }

    pub fn unused() -> Self {
        Self::new(UNUSED, SequenceCode::unused(), UNUSED)
    }

    pub fn with_offset(self, offset: i32) -> Self {
        Self { offset, ..self }
    }

    pub fn with_prefix(self, prefix: impl Into<String>) -> Self {
        Self {
            sequence_code_prefix: prefix.into(),
            ..self
        }
    }

    pub fn with_residue_name(self, residue_name: impl Into<String>) -> Self {
        Self {
            residue_name: residue_name.into(),
            ..self
        }
    }

    pub fn with_chain_code(self, chain_code: impl Into<String>) -> Self {
        Self {
            chain_code: chain_code.into(),
            ..self
        }
    }

    pub fn is_pseudo(&self) -> bool {
        self.sequence_code_prefix == PSEUDO_RESIDUE_PREFIX
    }

    pub fn is_unused(&self) -> bool {
        self.chain_code == UNUSED && self.sequence_code.is_unused() && self.residue_name == UNUSED
    }

    /// The sequence number with the offset applied, for numeric non-pseudo
    /// codes; `None` when the sum leaves the `i32` range.
    pub fn absolute_sequence_code(&self) -> Option<i32> {
        if self.is_pseudo() {
            return None;
        }
        self.sequence_code
            .as_number()
            .and_then(|n| n.checked_add(self.offset))
    }

    /// The sequence code as written in NEF: prefix, code, then any signed offset.
    pub fn nef_sequence_code(&self) -> String {
        match self.offset {
            0 => format!("{}{}", self.sequence_code_prefix, self.sequence_code),
            offset => format!(
                "{}{}{:+}",
                self.sequence_code_prefix, self.sequence_code, offset
            ),
        }
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.chain_code,
            self.nef_sequence_code(),
            self.residue_name
        )
    }
}

/// How a residue links to its neighbours in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Linking {
    Start,
    #[default]
    Middle,
    End,
    Free,
}

impl Linking {
    pub fn as_str(&self) -> &'static str {
        match self {
            Linking::Start => "start",
            Linking::Middle => "middle",
            Linking::End => "end",
            Linking::Free => "free",
        }
    }
}

impl fmt::Display for Linking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Linking {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Linking::Start),
            "middle" => Ok(Linking::Middle),
            "end" => Ok(Linking::End),
            "free" | "single" => Ok(Linking::Free),
            other => Err(format!("unknown residue linking '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceResidue {
    pub residue: Residue,
    pub is_cis: bool,
    pub linking: Linking,
    pub variants: Vec<String>,
}

impl SequenceResidue {
    pub fn new(residue: Residue, linking: Linking) -> Self {
        Self {
            residue,
            is_cis: false,
            linking,
            variants: Vec::new(),
        }
    }

    pub fn with_cis(self, is_cis: bool) -> Self {
        Self { is_cis, ..self }
    }

    pub fn with_variants(self, variants: Vec<String>) -> Self {
        Self { variants, ..self }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomLabel {
    pub residue: Residue,
    pub atom_name: String,
    pub element: Option<String>,
    pub isotope_number: Option<u32>,
}

impl AtomLabel {
    pub fn new(residue: Residue, atom_name: impl Into<String>) -> Self {
        Self {
            residue,
            atom_name: atom_name.into(),
            element: None,
            isotope_number: None,
        }
    }

    pub fn unassigned() -> Self {
        Self::new(Residue::unused(), UNUSED)
    }

    pub fn is_unassigned(&self) -> bool {
        self.atom_name == UNUSED && self.residue.is_unused()
    }

    pub fn with_atom_name(self, atom_name: impl Into<String>) -> Self {
        Self {
            atom_name: atom_name.into(),
            ..self
        }
    }

    pub fn with_isotope(self, element: impl Into<String>, isotope_number: u32) -> Self {
        Self {
            element: Some(element.into()),
            isotope_number: Some(isotope_number),
            ..self
        }
    }
}

impl fmt::Display for AtomLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.residue, self.atom_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_code_parses_numbers_and_labels() {
        assert_eq!(SequenceCode::from("12"), SequenceCode::Number(12));
        assert_eq!(SequenceCode::from("-3"), SequenceCode::Number(-3));
        assert_eq!(SequenceCode::from("12A"), SequenceCode::Label("12A".into()));
        assert!(SequenceCode::from(".").is_unused());
    }

    #[test]
    fn nef_sequence_code_includes_prefix_and_offset() {
        let residue = Residue::new("A", 65, UNUSED).with_prefix("@");
        assert_eq!(residue.nef_sequence_code(), "@65");
        assert_eq!(residue.clone().with_offset(-1).nef_sequence_code(), "@65-1");
        assert_eq!(
            Residue::new("A", 23, "ALA").with_offset(1).nef_sequence_code(),
            "23+1"
        );
    }

    #[test]
    fn absolute_sequence_code_ignores_pseudo_residues() {
        let relative = Residue::new("A", 23, "ALA").with_offset(-1);
        assert_eq!(relative.absolute_sequence_code(), Some(22));

        let pseudo = Residue::new("A", 65, UNUSED).with_prefix("@");
        assert_eq!(pseudo.absolute_sequence_code(), None);
    }

    #[test]
    fn absolute_sequence_code_is_none_past_i32() {
        let last = Residue::new("A", i32::MAX, "ALA").with_offset(1);
        assert_eq!(last.absolute_sequence_code(), None);
        let first = Residue::new("A", i32::MIN, "ALA").with_offset(-1);
        assert_eq!(first.absolute_sequence_code(), None);
    }

    #[test]
    fn residues_order_structurally() {
        let a1 = Residue::new("A", 1, "ALA");
        let a2 = Residue::new("A", 2, "GLY");
        let b1 = Residue::new("B", 1, "ALA");
        let mut residues = vec![b1.clone(), a2.clone(), a1.clone()];
        residues.sort();
        assert_eq!(residues, vec![a1, a2, b1]);
    }

    #[test]
    fn unassigned_atom_is_all_unused() {
        assert!(UNASSIGNED_ATOM.is_unassigned());
        assert_eq!(UNASSIGNED_ATOM.residue.nef_sequence_code(), UNUSED);
        assert!(!AtomLabel::new(Residue::new("A", 1, "ALA"), "CA").is_unassigned());
    }

    #[test]
    fn linking_parses_nef_keywords() {
        assert_eq!("start".parse::<Linking>(), Ok(Linking::Start));
        assert_eq!("single".parse::<Linking>(), Ok(Linking::Free));
        assert!("cyclic".parse::<Linking>().is_err());
        assert_eq!(Linking::End.to_string(), "end");
    }
}
