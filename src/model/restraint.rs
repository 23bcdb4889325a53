use super::residue::AtomLabel;

/// Target value, bounds and weight shared by all restraint kinds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct RestraintValues {
    pub target: Option<f64>,
    pub target_uncertainty: Option<f64>,
    pub lower_limit: Option<f64>,
    pub upper_limit: Option<f64>,
    pub weight: Option<f64>,
}

impl RestraintValues {
    pub fn target(target: f64, target_uncertainty: Option<f64>) -> Self {
        Self {
            target: Some(target),
            target_uncertainty,
            ..Self::default()
        }
    }

    pub fn with_limits(self, lower_limit: Option<f64>, upper_limit: Option<f64>) -> Self {
        Self {
            lower_limit,
            upper_limit,
            ..self
        }
    }

    pub fn with_weight(self, weight: f64) -> Self {
        Self {
            weight: Some(weight),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub struct DistanceRestraint {
    pub id: usize,
    /// Shared by the alternatives of one OR'd restraint.
    pub combination_id: Option<usize>,
    pub atoms: [AtomLabel; 2],
    pub values: RestraintValues,
}

impl DistanceRestraint {
    pub fn new(id: usize, atoms: [AtomLabel; 2], values: RestraintValues) -> Self {
        Self {
            id,
            combination_id: None,
            atoms,
            values,
        }
    }

    pub fn with_combination_id(self, combination_id: Option<usize>) -> Self {
        Self {
            combination_id,
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub struct DihedralRestraint {
    pub id: usize,
    /// Conventional angle name, e.g. `PHI`.
    pub name: Option<String>,
    pub atoms: [AtomLabel; 4],
    pub values: RestraintValues,
}

impl DihedralRestraint {
    pub fn new(id: usize, atoms: [AtomLabel; 4], values: RestraintValues) -> Self {
        Self {
            id,
            name: None,
            atoms,
            values,
        }
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub struct RdcRestraint {
    pub id: usize,
    pub atoms: [AtomLabel; 2],
    pub values: RestraintValues,
}

impl RdcRestraint {
    pub fn new(id: usize, atoms: [AtomLabel; 2], values: RestraintValues) -> Self {
        Self { id, atoms, values }
    }
}

/// A calculated distance compared against its restraint bounds.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub struct RestraintViolation {
    /// Structure model the calculation came from (1-based).
    pub model: usize,
    /// Name of the potential term or restraint list.
    pub list_name: String,
    pub restraint_number: usize,
    /// Index of the OR'd alternative within the restraint (1-based).
    pub sub_id: usize,
    /// Index of the atom pair within the restraint (1-based).
    pub pair_number: usize,
    pub atoms: [AtomLabel; 2],
    pub calculated: f64,
    pub target: f64,
    pub lower: f64,
    pub upper: f64,
    pub violation: f64,
}

impl RestraintViolation {
    pub fn with_atoms(self, atoms: [AtomLabel; 2]) -> Self {
        Self { atoms, ..self }
    }
}

/// Amount by which `calculated` lies outside `[lower, upper]`, signed, zero inside.
pub fn violation_amount(calculated: f64, lower: f64, upper: f64) -> f64 {
    if calculated < lower {
        calculated - lower
    } else if calculated > upper {
        calculated - upper
    } else {
        0.0
    }
}
