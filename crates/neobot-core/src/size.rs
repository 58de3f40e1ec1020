use std::fmt;

use crate::i18n::Locale;

/// Qualitative size bucket of an object, ordered smallest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SizeClass {
    Car,
    Bus,
    Building,
    Stadium,
    MultiStadium,
    Giant,
}

impl SizeClass {
    pub const ALL: [SizeClass; 6] = [
        SizeClass::Car,
        SizeClass::Bus,
        SizeClass::Building,
        SizeClass::Stadium,
        SizeClass::MultiStadium,
        SizeClass::Giant,
    ];

    pub fn label(self, locale: Locale) -> &'static str {
        locale.strings().size_labels[self as usize]
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(Locale::En))
    }
}

/// Bucket a diameter in meters. Bounds are strict: exactly 5 m is bus-sized.
pub fn classify(diameter_m: f64) -> SizeClass {
    if diameter_m < 5.0 {
        SizeClass::Car
    } else if diameter_m < 20.0 {
        SizeClass::Bus
    } else if diameter_m < 50.0 {
        SizeClass::Building
    } else if diameter_m < 100.0 {
        SizeClass::Stadium
    } else if diameter_m < 300.0 {
        SizeClass::MultiStadium
    } else {
        SizeClass::Giant
    }
}
