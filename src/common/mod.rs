//! Common utilities and types for the survey robot

/// Common types used across the codebase
pub mod types {
    use serde::Deserialize;
    use std::fmt;

    /// One side of the differential drive
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Wheel {
        Left,
        Right,
    }

    impl Wheel {
        pub const BOTH: [Wheel; 2] = [Wheel::Left, Wheel::Right];

        /// The wheel on the other side
        pub fn opposite(self) -> Wheel {
            match self {
                Wheel::Left => Wheel::Right,
                Wheel::Right => Wheel::Left,
            }
        }
    }

    impl fmt::Display for Wheel {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Wheel::Left => write!(f, "left"),
                Wheel::Right => write!(f, "right"),
            }
        }
    }

    /// Indicator LED color
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
    pub struct Rgb(pub u8, pub u8, pub u8);

    impl Rgb {
        pub const OFF: Rgb = Rgb(0, 0, 0);
        pub const BLUE: Rgb = Rgb(0, 0, 255);
        pub const GREEN: Rgb = Rgb(0, 255, 0);
        pub const ORANGE: Rgb = Rgb(255, 128, 0);
        pub const YELLOW: Rgb = Rgb(255, 255, 0);
    }

    /// Battery voltage in volts
    #[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
    pub struct Voltage(pub f64);

    impl fmt::Display for Voltage {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:.2}V", self.0)
        }
    }
}
