//! Carrier-gas property library.

use std::path::Path;

use tracing::debug;

use crate::error::{PropsError, PropsResult};
use crate::radiation::RadiationCurves;
use crate::species::Species;
use crate::table::PropertyTable;

const BUILTIN_AR: &str = include_str!("../data/ar.csv");
const BUILTIN_H2: &str = include_str!("../data/h2.csv");
const BUILTIN_N2: &str = include_str!("../data/n2.csv");
const BUILTIN_O2: &str = include_str!("../data/o2.csv");

/// One property table per carrier gas plus the radiative-loss curves.
///
/// Build it once and share it behind an `Arc`; solvers never reload tables.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyLibrary {
    tables: [PropertyTable; 4],
    radiation: RadiationCurves,
}

impl PropertyLibrary {
    /// Coarse 1 atm equilibrium tables shipped with the crate.
    pub fn builtin() -> PropsResult<Self> {
        Self::from_tables([
            PropertyTable::from_csv_str(BUILTIN_AR)?,
            PropertyTable::from_csv_str(BUILTIN_H2)?,
            PropertyTable::from_csv_str(BUILTIN_N2)?,
            PropertyTable::from_csv_str(BUILTIN_O2)?,
        ])
    }

    /// Load `ar.csv`, `h2.csv`, `n2.csv` and `o2.csv` from `dir`.
    pub fn from_dir(dir: &Path) -> PropsResult<Self> {
        let load = |name: &str| {
            let path = dir.join(name);
            debug!(path = %path.display(), "loading property table");
            PropertyTable::from_csv_path(&path)
        };
        Self::from_tables([
            load("ar.csv")?,
            load("h2.csv")?,
            load("n2.csv")?,
            load("o2.csv")?,
        ])
    }

    /// Tables in [`Species::CARRIERS`] order.
    pub fn from_tables(tables: [PropertyTable; 4]) -> PropsResult<Self> {
        Ok(Self {
            tables,
            radiation: RadiationCurves::baked()?,
        })
    }

    pub fn table(&self, species: Species) -> PropsResult<&PropertyTable> {
        species
            .carrier_index()
            .map(|i| &self.tables[i])
            .ok_or(PropsError::NotAvailable {
                species: species.key(),
                what: "property table",
            })
    }

    /// Table whose index and temperature columns the mixtures inherit.
    pub fn reference(&self) -> &PropertyTable {
        &self.tables[0]
    }

    pub fn tables(&self) -> impl Iterator<Item = (Species, &PropertyTable)> + '_ {
        Species::CARRIERS.into_iter().zip(self.tables.iter())
    }

    pub fn radiation(&self) -> &RadiationCurves {
        &self.radiation
    }
}
