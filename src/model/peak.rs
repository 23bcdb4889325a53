use super::shift::ShiftData;

/// Default unit of spectral axes.
pub const PPM: &str = "ppm";

/// A peak in an N-dimensional spectrum.
///
/// The number of shifts is the peak's dimensionality; their order is the
/// axis order of the spectrum.
#[derive(Debug, Clone, PartialEq, PartialOrd, Default)]
pub struct NewPeak {
    pub shifts: Vec<ShiftData>,
    pub id: Option<i64>,
    pub height: Option<f64>,
    pub height_uncertainty: Option<f64>,
    pub volume: Option<f64>,
    pub volume_uncertainty: Option<f64>,
    pub figure_of_merit: Option<f64>,
    pub comment: String,
}

impl NewPeak {
    pub fn new(shifts: Vec<ShiftData>) -> Self {
        Self {
            shifts,
            ..Self::default()
        }
    }

    #[inline]
    pub fn dimensions(&self) -> usize {
        self.shifts.len()
    }

    pub fn with_id(self, id: i64) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    pub fn with_height(self, height: Option<f64>, height_uncertainty: Option<f64>) -> Self {
        Self {
            height,
            height_uncertainty,
            ..self
        }
    }

    pub fn with_volume(self, volume: Option<f64>, volume_uncertainty: Option<f64>) -> Self {
        Self {
            volume,
            volume_uncertainty,
            ..self
        }
    }

    pub fn with_figure_of_merit(self, figure_of_merit: Option<f64>) -> Self {
        Self {
            figure_of_merit,
            ..self
        }
    }

    pub fn with_comment(self, comment: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
            ..self
        }
    }
}

/// Metadata for one spectral axis.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub struct DimensionInfo {
    /// Isotope axis code, e.g. `1H` or `15N`.
    pub axis_code: String,
    /// Program-specific axis label, e.g. `HN`.
    pub axis_name: Option<String>,
    pub axis_unit: String,
    /// Measured spectrometer frequency in MHz, when the source format records one.
    pub spectrometer_frequency: Option<f64>,
}

impl DimensionInfo {
    pub fn new(axis_code: impl Into<String>) -> Self {
        Self {
            axis_code: axis_code.into(),
            axis_name: None,
            axis_unit: PPM.to_string(),
            spectrometer_frequency: None,
        }
    }

    pub fn with_axis_name(self, axis_name: impl Into<String>) -> Self {
        Self {
            axis_name: Some(axis_name.into()),
            ..self
        }
    }

    pub fn with_spectrometer_frequency(self, frequency: Option<f64>) -> Self {
        Self {
            spectrometer_frequency: frequency,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::residue::{AtomLabel, Residue};

    #[test]
    fn peak_dimensionality_follows_shift_count() {
        let residue = Residue::new("A", 1, "ALA");
        let peak = NewPeak::new(vec![
            ShiftData::new(AtomLabel::new(residue.clone(), "H"), 8.1),
            ShiftData::new(AtomLabel::new(residue, "N"), 120.4),
        ])
        .with_id(7)
        .with_height(Some(1.5e5), None);

        assert_eq!(peak.dimensions(), 2);
        assert_eq!(peak.id, Some(7));
        assert_eq!(peak.height, Some(1.5e5));
        assert!(peak.comment.is_empty());
    }

    #[test]
    fn dimension_info_defaults_to_ppm() {
        let dim = DimensionInfo::new("15N").with_axis_name("N15");
        assert_eq!(dim.axis_unit, "ppm");
        assert_eq!(dim.axis_name.as_deref(), Some("N15"));
        assert_eq!(dim.spectrometer_frequency, None);
    }
}
