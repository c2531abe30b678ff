// rh-core/src/units.rs

use uom::si::f64::{
    DiffusionCoefficient as UomDiffusionCoefficient, Length as UomLength, Time as UomTime,
};

// Public canonical unit types (SI, f64)
pub type Length = UomLength;
pub type Time = UomTime;
/// Thermal diffusivity, m^2/s.
pub type Diffusivity = UomDiffusionCoefficient;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn m2ps(v: f64) -> Diffusivity {
    use uom::si::diffusion_coefficient::square_meter_per_second;
    Diffusivity::new::<square_meter_per_second>(v)
}

#[inline]
pub fn meters(l: Length) -> f64 {
    use uom::si::length::meter;
    l.get::<meter>()
}

#[inline]
pub fn seconds(t: Time) -> f64 {
    use uom::si::time::second;
    t.get::<second>()
}

#[inline]
pub fn m2_per_s(a: Diffusivity) -> f64 {
    use uom::si::diffusion_coefficient::square_meter_per_second;
    a.get::<square_meter_per_second>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_round_trip_si() {
        assert_eq!(meters(m(0.1)), 0.1);
        assert_eq!(seconds(s(3.0)), 3.0);
        assert_eq!(m2_per_s(m2ps(1.1e-4)), 1.1e-4);
    }

    #[test]
    fn scaled_units_convert() {
        use uom::si::length::centimeter;
        use uom::si::time::minute;
        let dx = Length::new::<centimeter>(5.0);
        let t = Time::new::<minute>(2.0);
        assert!((meters(dx) - 0.05).abs() < 1e-15);
        assert!((seconds(t) - 120.0).abs() < 1e-12);
    }
}
