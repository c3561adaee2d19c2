//! Serial command codes understood by the robot's motor controller.
//!
//! Each primitive maps to a five-character code: a steering letter, `F` or
//! `B` for drive direction, and a three-digit magnitude. Straight moves carry
//! the distance in centimetres (one 10 cm cell), cardinal turns carry the arc
//! in degrees and diagonal slides carry `001`.

use core::str::FromStr;

use crate::{KinematicsError, MotionPrimitive};

impl MotionPrimitive {
    /// The motor-controller command string for this primitive.
    pub const fn command_code(self) -> &'static str {
        match self {
            MotionPrimitive::Forward => "SF010",
            MotionPrimitive::Backward => "SB010",
            MotionPrimitive::TurnLeft => "LF090",
            MotionPrimitive::TurnRight => "RF090",
            MotionPrimitive::ReverseTurnLeft => "LB090",
            MotionPrimitive::ReverseTurnRight => "RB090",
            MotionPrimitive::DiagonalNW => "KF001",
            MotionPrimitive::DiagonalNE => "JF001",
            MotionPrimitive::DiagonalSW => "KB001",
            MotionPrimitive::DiagonalSE => "JB001",
        }
    }
}

impl FromStr for MotionPrimitive {
    type Err = KinematicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MotionPrimitive::ALL
            .into_iter()
            .find(|p| p.command_code().eq_ignore_ascii_case(s.trim()))
            .ok_or(KinematicsError::UnknownCommand("not a known primitive code"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_parse_back() {
        for p in MotionPrimitive::ALL {
            assert_eq!(p.command_code().parse::<MotionPrimitive>(), Ok(p));
        }
    }

    #[test]
    fn test_codes_are_unique() {
        for (i, a) in MotionPrimitive::ALL.iter().enumerate() {
            for b in &MotionPrimitive::ALL[i + 1..] {
                assert_ne!(a.command_code(), b.command_code());
            }
        }
    }

    #[test]
    fn test_parse_is_lenient_about_case_and_whitespace() {
        assert_eq!(" rf090\n".parse::<MotionPrimitive>(), Ok(MotionPrimitive::TurnRight));
    }

    #[test]
    fn test_unknown_code() {
        assert!(matches!("RF180".parse::<MotionPrimitive>(), Err(KinematicsError::UnknownCommand(_))));
        assert!(matches!("".parse::<MotionPrimitive>(), Err(KinematicsError::UnknownCommand(_))));
    }
}
