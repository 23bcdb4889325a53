use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported isotope code: '{0}'")]
pub struct ParseIsotopeError(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported residue code: '{0}'")]
pub struct ParseResidueError(String);

/// NMR-active isotopes with a known gyromagnetic ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Isotope {
    H1,
    H2,
    C13,
    N15,
    F19,
    P31,
}

impl Isotope {
    pub const ALL: [Isotope; 6] = [
        Isotope::H1,
        Isotope::H2,
        Isotope::C13,
        Isotope::N15,
        Isotope::F19,
        Isotope::P31,
    ];

    /// Gyromagnetic ratio relative to 1H.
    pub fn gamma_ratio(&self) -> f64 {
        match self {
            Isotope::H1 => 1.0,
            Isotope::H2 => 0.153506088,
            Isotope::C13 => 0.251449530,
            Isotope::N15 => 0.101329118,
            Isotope::F19 => 0.940866982,
            Isotope::P31 => 0.404808636,
        }
    }

    pub fn element(&self) -> &'static str {
        match self {
            Isotope::H1 | Isotope::H2 => "H",
            Isotope::C13 => "C",
            Isotope::N15 => "N",
            Isotope::F19 => "F",
            Isotope::P31 => "P",
        }
    }

    pub fn mass_number(&self) -> u32 {
        match self {
            Isotope::H1 => 1,
            Isotope::H2 => 2,
            Isotope::C13 => 13,
            Isotope::N15 => 15,
            Isotope::F19 => 19,
            Isotope::P31 => 31,
        }
    }

    /// The NEF axis code, e.g. `15N`.
    pub fn axis_code(&self) -> &'static str {
        match self {
            Isotope::H1 => "1H",
            Isotope::H2 => "2H",
            Isotope::C13 => "13C",
            Isotope::N15 => "15N",
            Isotope::F19 => "19F",
            Isotope::P31 => "31P",
        }
    }

    /// Guesses the isotope observed on an axis from a free-form label.
    ///
    /// Accepts NEF axis codes (`15N`), reversed codes (`N15`) and atom-style
    /// labels whose leading letter names the element (`HN`, `CA`, `H1`).
    pub fn guess_from_label(label: &str) -> Option<Isotope> {
        let label = label.trim();
        if let Ok(isotope) = label.parse::<Isotope>() {
            return Some(isotope);
        }

        let upper = label.to_ascii_uppercase();
        let letters: String = upper.chars().filter(|c| c.is_ascii_alphabetic()).collect();
        let digits: String = upper.chars().filter(|c| c.is_ascii_digit()).collect();

        if !digits.is_empty() && !letters.is_empty() {
            let reversed = format!("{digits}{letters}");
            if let Ok(isotope) = reversed.parse::<Isotope>() {
                return Some(isotope);
            }
        }

        match upper.chars().next()? {
            'H' => Some(Isotope::H1),
            'D' => Some(Isotope::H2),
            'C' => Some(Isotope::C13),
            'N' => Some(Isotope::N15),
            'F' => Some(Isotope::F19),
            'P' => Some(Isotope::P31),
            _ => None,
        }
    }
}

impl fmt::Display for Isotope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.axis_code())
    }
}

impl FromStr for Isotope {
    type Err = ParseIsotopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Isotope::ALL
            .into_iter()
            .find(|isotope| isotope.axis_code().eq_ignore_ascii_case(&upper))
            .ok_or_else(|| ParseIsotopeError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardResidue {
    ALA,
    ARG,
    ASN,
    ASP,
    CYS,
    GLN,
    GLU,
    GLY,
    HIS,
    ILE,
    LEU,
    LYS,
    MET,
    PHE,
    PRO,
    SER,
    THR,
    TRP,
    TYR,
    VAL,
}

impl StandardResidue {
    pub const ALL: [StandardResidue; 20] = [
        StandardResidue::ALA,
        StandardResidue::ARG,
        StandardResidue::ASN,
        StandardResidue::ASP,
        StandardResidue::CYS,
        StandardResidue::GLN,
        StandardResidue::GLU,
        StandardResidue::GLY,
        StandardResidue::HIS,
        StandardResidue::ILE,
        StandardResidue::LEU,
        StandardResidue::LYS,
        StandardResidue::MET,
        StandardResidue::PHE,
        StandardResidue::PRO,
        StandardResidue::SER,
        StandardResidue::THR,
        StandardResidue::TRP,
        StandardResidue::TYR,
        StandardResidue::VAL,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StandardResidue::ALA => "ALA",
            StandardResidue::ARG => "ARG",
            StandardResidue::ASN => "ASN",
            StandardResidue::ASP => "ASP",
            StandardResidue::CYS => "CYS",
            StandardResidue::GLN => "GLN",
            StandardResidue::GLU => "GLU",
            StandardResidue::GLY => "GLY",
            StandardResidue::HIS => "HIS",
            StandardResidue::ILE => "ILE",
            StandardResidue::LEU => "LEU",
            StandardResidue::LYS => "LYS",
            StandardResidue::MET => "MET",
            StandardResidue::PHE => "PHE",
            StandardResidue::PRO => "PRO",
            StandardResidue::SER => "SER",
            StandardResidue::THR => "THR",
            StandardResidue::TRP => "TRP",
            StandardResidue::TYR => "TYR",
            StandardResidue::VAL => "VAL",
        }
    }

    pub fn one_letter(&self) -> char {
        match self {
            StandardResidue::ALA => 'A',
            StandardResidue::ARG => 'R',
            StandardResidue::ASN => 'N',
            StandardResidue::ASP => 'D',
            StandardResidue::CYS => 'C',
            StandardResidue::GLN => 'Q',
            StandardResidue::GLU => 'E',
            StandardResidue::GLY => 'G',
            StandardResidue::HIS => 'H',
            StandardResidue::ILE => 'I',
            StandardResidue::LEU => 'L',
            StandardResidue::LYS => 'K',
            StandardResidue::MET => 'M',
            StandardResidue::PHE => 'F',
            StandardResidue::PRO => 'P',
            StandardResidue::SER => 'S',
            StandardResidue::THR => 'T',
            StandardResidue::TRP => 'W',
            StandardResidue::TYR => 'Y',
            StandardResidue::VAL => 'V',
        }
    }

    pub fn from_one_letter(code: char) -> Option<StandardResidue> {
        let code = code.to_ascii_uppercase();
        StandardResidue::ALL
            .into_iter()
            .find(|residue| residue.one_letter() == code)
    }
}

impl fmt::Display for StandardResidue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StandardResidue {
    type Err = ParseResidueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        StandardResidue::ALL
            .into_iter()
            .find(|residue| residue.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseResidueError(s.to_string()))
    }
}

/// Translates a one-letter residue code to its three-letter name, leaving
/// unknown codes untouched.
pub fn residue_name_from_code(code: &str) -> String {
    let mut chars = code.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => StandardResidue::from_one_letter(c)
            .map(|r| r.name().to_string())
            .unwrap_or_else(|| code.to_ascii_uppercase()),
        _ => code.to_ascii_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isotope_round_trips_through_axis_code() {
        for isotope in Isotope::ALL {
            assert_eq!(isotope.axis_code().parse::<Isotope>(), Ok(isotope));
        }
        assert!("14N".parse::<Isotope>().is_err());
    }

    #[test]
    fn guesses_isotopes_from_labels() {
        assert_eq!(Isotope::guess_from_label("HN"), Some(Isotope::H1));
        assert_eq!(Isotope::guess_from_label("H"), Some(Isotope::H1));
        assert_eq!(Isotope::guess_from_label("N15"), Some(Isotope::N15));
        assert_eq!(Isotope::guess_from_label("15N"), Some(Isotope::N15));
        assert_eq!(Isotope::guess_from_label("CA"), Some(Isotope::C13));
        assert_eq!(Isotope::guess_from_label("c13"), Some(Isotope::C13));
        assert_eq!(Isotope::guess_from_label("X"), None);
        assert_eq!(Isotope::guess_from_label(""), None);
    }

    #[test]
    fn gamma_ratios_are_relative_to_proton() {
        assert_eq!(Isotope::H1.gamma_ratio(), 1.0);
        assert!((Isotope::N15.gamma_ratio() * 600.0 - 60.797).abs() < 1e-3);
        assert!((Isotope::C13.gamma_ratio() * 600.0 - 150.870).abs() < 1e-3);
    }

    #[test]
    fn residue_codes_translate_both_ways() {
        assert_eq!(StandardResidue::from_one_letter('g'), Some(StandardResidue::GLY));
        assert_eq!(StandardResidue::TRP.one_letter(), 'W');
        assert_eq!("leu".parse::<StandardResidue>(), Ok(StandardResidue::LEU));
        assert_eq!(residue_name_from_code("K"), "LYS");
        assert_eq!(residue_name_from_code("ala"), "ALA");
        assert_eq!(residue_name_from_code("X"), "X");
    }
}
