// fd-core/src/units.rs
//
// The dissolution model works in CGS lengths (cm) and geological time (years).
// Typed quantities cross crate boundaries; the numeric kernels take the raw
// values returned by `as_cm` / `as_years`.

use uom::si::f64::{Length as UomLength, Time as UomTime};

pub type Length = UomLength;
pub type Time = UomTime;

#[inline]
pub fn cm(v: f64) -> Length {
    use uom::si::length::centimeter;
    Length::new::<centimeter>(v)
}

#[inline]
pub fn years(v: f64) -> Time {
    use uom::si::time::year;
    Time::new::<year>(v)
}

#[inline]
pub fn as_cm(l: Length) -> f64 {
    use uom::si::length::centimeter;
    l.get::<centimeter>()
}

#[inline]
pub fn as_years(t: Time) -> f64 {
    use uom::si::time::year;
    t.get::<year>()
}
