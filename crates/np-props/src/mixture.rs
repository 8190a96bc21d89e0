//! Mole-fraction weighted mixture tables.

use np_core::numeric::{Tolerances, nearly_equal};

use crate::composition::Composition;
use crate::error::{PropsError, PropsResult};
use crate::library::PropertyLibrary;
use crate::table::PropertyTable;

/// Combines the per-species tables of a [`PropertyLibrary`].
pub struct MixtureBuilder<'a> {
    library: &'a PropertyLibrary,
}

impl<'a> MixtureBuilder<'a> {
    pub fn new(library: &'a PropertyLibrary) -> Self {
        Self { library }
    }

    /// Each numeric column is `Σ xᵢ·columnᵢ`; index and temperature come from
    /// the reference table. The fractions are used exactly as given.
    pub fn build(&self, composition: &Composition) -> PropsResult<PropertyTable> {
        let reference = self.library.reference();
        let tol = Tolerances::default();
        for (species, table) in self.library.tables() {
            let same_grid = table.len() == reference.len()
                && table
                    .temperatures()
                    .iter()
                    .zip(reference.temperatures())
                    .all(|(a, b)| nearly_equal(*a, *b, tol));
            if !same_grid {
                return Err(PropsError::GridMismatch {
                    species: species.key(),
                });
            }
        }

        let mut rows = reference.rows();
        for row in rows.iter_mut() {
            row[2..].fill(0.0);
        }
        for ((_, x), (_, table)) in composition.iter().zip(self.library.tables()) {
            for (row, species_row) in rows.iter_mut().zip(table.rows()) {
                for (dst, src) in row[2..].iter_mut().zip(&species_row[2..]) {
                    *dst += x * src;
                }
            }
        }
        PropertyTable::from_rows(&rows)
    }
}
