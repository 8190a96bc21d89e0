//! Temperature-indexed thermophysical property tables.

use std::path::Path;

use np_core::Curve;

use crate::error::{PropsError, PropsResult};

/// Temperature range [K] over which mixture properties are evaluated.
pub const PROPERTY_DOMAIN: (f64, f64) = (300.0, 30_000.0);

/// Number of columns in a property table row (index and temperature included).
pub const ROW_WIDTH: usize = 8;

/// Tabulated property columns, in file order after `index` and `temperature`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyColumn {
    /// Mass density [kg/m³]
    Density,
    /// Dynamic viscosity [Pa·s]
    Viscosity,
    /// Thermal conductivity [W/(m·K)]
    ThermalConductivity,
    /// Electrical conductivity [S/m]
    ElectricalConductivity,
    /// Specific enthalpy [J/kg]
    Enthalpy,
    /// Specific heat capacity [J/(kg·K)]
    HeatCapacity,
}

impl PropertyColumn {
    pub const ALL: [PropertyColumn; 6] = [
        PropertyColumn::Density,
        PropertyColumn::Viscosity,
        PropertyColumn::ThermalConductivity,
        PropertyColumn::ElectricalConductivity,
        PropertyColumn::Enthalpy,
        PropertyColumn::HeatCapacity,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            PropertyColumn::Density => "density",
            PropertyColumn::Viscosity => "viscosity",
            PropertyColumn::ThermalConductivity => "thermal_conductivity",
            PropertyColumn::ElectricalConductivity => "electrical_conductivity",
            PropertyColumn::Enthalpy => "enthalpy",
            PropertyColumn::HeatCapacity => "heat_capacity",
        }
    }

    fn slot(&self) -> usize {
        match self {
            PropertyColumn::Density => 0,
            PropertyColumn::Viscosity => 1,
            PropertyColumn::ThermalConductivity => 2,
            PropertyColumn::ElectricalConductivity => 3,
            PropertyColumn::Enthalpy => 4,
            PropertyColumn::HeatCapacity => 5,
        }
    }
}

/// Property table with strictly increasing temperatures.
///
/// Lookups clamp the temperature to [`PROPERTY_DOMAIN`] and interpolate
/// linearly between rows; nothing is extrapolated.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyTable {
    index: Vec<f64>,
    curves: [Curve; 6],
}

impl PropertyTable {
    /// Build from rows `[index, T, ρ, μ, κ, σ, H, Cp]`.
    pub fn from_rows(rows: &[[f64; ROW_WIDTH]]) -> PropsResult<Self> {
        if rows.len() < 2 {
            return Err(PropsError::InvalidTable {
                what: format!("need at least two rows, got {}", rows.len()),
            });
        }
        for (i, row) in rows.iter().enumerate() {
            if let Some(v) = row.iter().find(|v| !v.is_finite()) {
                return Err(PropsError::InvalidTable {
                    what: format!("row {}: non-finite value {v}", i + 1),
                });
            }
        }
        if let Some(i) = rows.windows(2).position(|w| w[1][1] <= w[0][1]) {
            return Err(PropsError::InvalidTable {
                what: format!("temperature not strictly increasing at row {}", i + 2),
            });
        }

        let index = rows.iter().map(|r| r[0]).collect();
        let temperature: Vec<f64> = rows.iter().map(|r| r[1]).collect();
        let column = |c: usize| rows.iter().map(|r| r[c]).collect::<Vec<f64>>();
        let curves = [
            Curve::with_domain(temperature.clone(), column(2), PROPERTY_DOMAIN)?,
            Curve::with_domain(temperature.clone(), column(3), PROPERTY_DOMAIN)?,
            Curve::with_domain(temperature.clone(), column(4), PROPERTY_DOMAIN)?,
            Curve::with_domain(temperature.clone(), column(5), PROPERTY_DOMAIN)?,
            Curve::with_domain(temperature.clone(), column(6), PROPERTY_DOMAIN)?,
            Curve::with_domain(temperature, column(7), PROPERTY_DOMAIN)?,
        ];
        Ok(Self { index, curves })
    }

    /// Parse comma-separated text. A leading non-numeric line is taken as
    /// the header; blank lines are skipped.
    pub fn from_csv_str(text: &str) -> PropsResult<Self> {
        let mut rows = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            let parsed: Result<Vec<f64>, _> = fields.iter().map(|f| f.parse::<f64>()).collect();
            let values = match parsed {
                Ok(values) => values,
                Err(_) if rows.is_empty() && lineno == 0 => continue,
                Err(_) => {
                    return Err(PropsError::InvalidTable {
                        what: format!("line {}: unparsable number", lineno + 1),
                    });
                }
            };
            let row: [f64; ROW_WIDTH] =
                values
                    .try_into()
                    .map_err(|v: Vec<f64>| PropsError::InvalidTable {
                        what: format!(
                            "line {}: expected {ROW_WIDTH} columns, got {}",
                            lineno + 1,
                            v.len()
                        ),
                    })?;
            rows.push(row);
        }
        Self::from_rows(&rows)
    }

    pub fn from_csv_path(path: &Path) -> PropsResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| PropsError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_csv_str(&text)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &[f64] {
        &self.index
    }

    pub fn temperatures(&self) -> &[f64] {
        self.curves[0].xs()
    }

    /// Tabulated values of one column.
    pub fn column(&self, column: PropertyColumn) -> &[f64] {
        self.curves[column.slot()].ys()
    }

    /// Value of `column` at temperature `t` [K].
    pub fn interpolate(&self, t: f64, column: PropertyColumn) -> f64 {
        self.curves[column.slot()].eval(t)
    }

    /// Values of `column` at every temperature in `ts`, in order.
    pub fn interpolate_many(&self, ts: &[f64], column: PropertyColumn) -> Vec<f64> {
        self.curves[column.slot()].eval_many(ts)
    }

    /// Rows in `[index, T, ρ, μ, κ, σ, H, Cp]` layout.
    pub fn rows(&self) -> Vec<[f64; ROW_WIDTH]> {
        let t = self.temperatures();
        (0..self.len())
            .map(|i| {
                let mut row = [0.0; ROW_WIDTH];
                row[0] = self.index[i];
                row[1] = t[i];
                for (k, curve) in self.curves.iter().enumerate() {
                    row[k + 2] = curve.ys()[i];
                }
                row
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "\
index,temperature,density,viscosity,thermal_conductivity,electrical_conductivity,enthalpy,heat_capacity
1,300,1.0,1e-5,0.02,0,1000,500
2,1000,0.5,3e-5,0.04,1,2000,600

3,30000,0.1,5e-5,1.0,100,9000,700
";

    #[test]
    fn parses_header_and_rows() {
        let table = PropertyTable::from_csv_str(SMALL).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.temperatures(), &[300.0, 1000.0, 30000.0]);
        assert_eq!(table.column(PropertyColumn::Enthalpy), &[1000.0, 2000.0, 9000.0]);
    }

    #[test]
    fn interpolates_linearly() {
        let table = PropertyTable::from_csv_str(SMALL).unwrap();
        let rho = table.interpolate(650.0, PropertyColumn::Density);
        assert!((rho - 0.75).abs() < 1e-12);
    }

    #[test]
    fn clamps_outside_domain() {
        let table = PropertyTable::from_csv_str(SMALL).unwrap();
        assert_eq!(table.interpolate(100.0, PropertyColumn::Density), 1.0);
        assert_eq!(table.interpolate(40_000.0, PropertyColumn::Density), 0.1);
    }

    #[test]
    fn many_preserves_length() {
        let table = PropertyTable::from_csv_str(SMALL).unwrap();
        let out = table.interpolate_many(&[300.0, 1000.0, 5000.0, 1e6], PropertyColumn::HeatCapacity);
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], 500.0);
        assert_eq!(out[3], 700.0);
    }

    #[test]
    fn rejects_non_increasing_temperature() {
        let rows = [
            [1.0, 300.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
            [2.0, 300.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        ];
        let err = PropertyTable::from_rows(&rows).unwrap_err();
        assert!(matches!(err, PropsError::InvalidTable { .. }));
    }

    #[test]
    fn rejects_short_rows() {
        let err = PropertyTable::from_csv_str("1,300,1\n2,400,2\n").unwrap_err();
        assert!(err.to_string().contains("expected 8 columns"));
    }

    #[test]
    fn rejects_single_row() {
        let err = PropertyTable::from_rows(&[[1.0; ROW_WIDTH]]).unwrap_err();
        assert!(matches!(err, PropsError::InvalidTable { .. }));
    }

    #[test]
    fn rows_round_trip() {
        let table = PropertyTable::from_csv_str(SMALL).unwrap();
        let again = PropertyTable::from_rows(&table.rows()).unwrap();
        assert_eq!(table, again);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PropertyTable::from_csv_path(Path::new("/nonexistent/ar.csv")).unwrap_err();
        assert!(matches!(err, PropsError::Io { .. }));
    }
}
