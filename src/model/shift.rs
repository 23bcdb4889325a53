use super::residue::AtomLabel;

/// One chemical-shift observation.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub struct ShiftData {
    pub atom: AtomLabel,
    pub value: f64,
    pub value_uncertainty: Option<f64>,
    pub line_width: Option<f64>,
}

impl ShiftData {
    pub fn new(atom: AtomLabel, value: f64) -> Self {
        Self {
            atom,
            value,
            value_uncertainty: None,
            line_width: None,
        }
    }

    pub fn with_uncertainty(self, value_uncertainty: Option<f64>) -> Self {
        Self {
            value_uncertainty,
            ..self
        }
    }

    pub fn with_line_width(self, line_width: Option<f64>) -> Self {
        Self { line_width, ..self }
    }

    pub fn with_atom(self, atom: AtomLabel) -> Self {
        Self { atom, ..self }
    }
}
