use core::fmt;

/// A clock frequency in hertz.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Hertz(pub u64);

impl Hertz {
    const MHZ_TO_HZ: u64 = 1_000_000;

    pub const fn from_mhz(mhz: u64) -> Self {
        Self(mhz * Self::MHZ_TO_HZ)
    }

    /// The frequency in whole megahertz, rounded down
    pub const fn as_mhz(&self) -> u64 {
        self.0 / Self::MHZ_TO_HZ
    }
}

impl fmt::Display for Hertz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mhz_conversion_rounds_down() {
        assert_eq!(Hertz::from_mhz(25), Hertz(25_000_000));
        assert_eq!(Hertz(133_333_333).as_mhz(), 133);
    }
}
