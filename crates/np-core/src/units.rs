// np-core/src/units.rs

use uom::si::f64::{Length as UomLength, Power as UomPower};

// Public canonical unit types (SI, f64)
pub type Length = UomLength;
pub type Power = UomPower;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

#[inline]
pub fn w(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

pub mod constants {
    /// Atomic mass unit [kg].
    pub const AMU_KG: f64 = 1.660538921e-27;

    /// Litres per minute in one cubic metre per second.
    pub const LPM_PER_M3PS: f64 = 60_000.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _l = m(2.0);
        let _pw = w(15_000.0);
    }

    #[test]
    fn millimetres_convert_to_metres() {
        use uom::si::length::meter;
        assert!((mm(6.5).get::<meter>() - 6.5e-3).abs() < 1e-15);
    }
}
