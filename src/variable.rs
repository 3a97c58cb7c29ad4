use std::{fmt, str::FromStr};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

#[derive(Debug, thiserror::Error)]
#[error("{0:?} is not a Helios data column")]
pub struct UnknownVariable(String);

/// Physical quantities of the merged Helios table, in column order.
///
/// `Btotal` is derived from the three field components and is declared right
/// after `Bz` so that iterating the variants yields the output column order.
#[derive(EnumIter, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Variable {
    /// Radial distance Sun-spacecraft
    Rh,
    /// Earth-spacecraft-Sun angle
    Esh,
    /// Carrington longitude
    Clong,
    /// Carrington latitude
    Clat,
    /// Carrington rotation number
    Crot,
    /// Proton density, first population
    Np1,
    /// Proton bulk speed, first population
    Vp1,
    /// Proton temperature, first population
    Tp1,
    /// Velocity azimuth angle
    Vaz,
    /// Velocity elevation angle
    Vel,
    Bx,
    By,
    Bz,
    /// Total field magnitude (derived)
    Btotal,
    /// Uncertainty on `Bx`
    SBx,
    /// Uncertainty on `By`
    SBy,
    /// Uncertainty on `Bz`
    SBz,
    /// Alpha particle density
    Nal,
    /// Alpha particle speed
    Val,
    /// Alpha particle temperature
    Tal,
    /// Proton density, second population
    Np2,
    /// Proton bulk speed, second population
    Vp2,
    /// Proton temperature, second population
    Tp2,
}
impl Variable {
    /// Iterates over the raw file columns, i.e. everything but `Btotal`
    pub fn raw() -> impl Iterator<Item = Variable> {
        Variable::iter().filter(|v| *v != Variable::Btotal)
    }
    /// Display unit of the variable
    pub fn unit(&self) -> &'static str {
        use Variable::*;
        match self {
            Rh => "AU",
            Esh | Clong | Clat | Vaz | Vel => "deg",
            Crot => "#",
            Np1 | Nal | Np2 => "cm-3",
            Vp1 | Val | Vp2 => "km/s",
            Tp1 | Tal | Tp2 => "K",
            Bx | By | Bz | Btotal | SBx | SBy | SBz => "nT",
        }
    }
}
impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Variable::*;
        match self {
            Rh => write!(f, "rh"),
            Esh => write!(f, "esh"),
            Clong => write!(f, "clong"),
            Clat => write!(f, "clat"),
            Crot => write!(f, "crot"),
            Np1 => write!(f, "np1"),
            Vp1 => write!(f, "vp1"),
            Tp1 => write!(f, "Tp1"),
            Vaz => write!(f, "vaz"),
            Vel => write!(f, "vel"),
            Bx => write!(f, "Bx"),
            By => write!(f, "By"),
            Bz => write!(f, "Bz"),
            Btotal => write!(f, "Btotal"),
            SBx => write!(f, "sBx"),
            SBy => write!(f, "sBy"),
            SBz => write!(f, "sBz"),
            Nal => write!(f, "nal"),
            Val => write!(f, "val"),
            Tal => write!(f, "Tal"),
            Np2 => write!(f, "np2"),
            Vp2 => write!(f, "vp2"),
            Tp2 => write!(f, "Tp2"),
        }
    }
}
impl FromStr for Variable {
    type Err = UnknownVariable;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variable::iter()
            .find(|v| v.to_string() == s)
            .ok_or_else(|| UnknownVariable(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_order() {
        let columns: Vec<_> = Variable::iter().map(|v| v.to_string()).collect();
        assert_eq!(
            columns,
            [
                "rh", "esh", "clong", "clat", "crot", "np1", "vp1", "Tp1", "vaz", "vel", "Bx",
                "By", "Bz", "Btotal", "sBx", "sBy", "sBz", "nal", "val", "Tal", "np2", "vp2",
                "Tp2"
            ]
        );
    }
    #[test]
    fn raw_skips_derived() {
        assert_eq!(Variable::raw().count(), Variable::iter().count() - 1);
        assert!(Variable::raw().all(|v| v != Variable::Btotal));
    }
    #[test]
    fn round_trip() {
        for variable in Variable::iter() {
            assert_eq!(variable.to_string().parse::<Variable>().unwrap(), variable);
        }
    }
}
