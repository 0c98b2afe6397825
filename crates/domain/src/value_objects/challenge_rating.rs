//! Challenge rating parsing.
//!
//! Challenge ratings arrive as free-form strings from encounter builders.
//! Unrecognised tokens degrade to CR 0 so auto-resolution never fails on
//! bad input.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::combat::tables::{XP_ABOVE_TABLE_PER_CR, XP_BY_CR};

/// A parsed challenge rating.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeRating(f64);

impl ChallengeRating {
    pub const ZERO: Self = Self(0.0);

    /// Parse a CR token. "1/8", "1/4" and "1/2" are the only fractions;
    /// everything else must be a decimal integer or it becomes 0. Surrounding
    /// whitespace is not stripped.
    pub fn parse(token: &str) -> Self {
        let value = match token {
            "1/8" => 0.125,
            "1/4" => 0.25,
            "1/2" => 0.5,
            other => other.parse::<i64>().map(|v| v as f64).unwrap_or(0.0),
        };
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Experience awarded for defeating one creature of this rating.
    ///
    /// Fractional and integer ratings up to 10 come from the table; anything
    /// higher extrapolates linearly from CR 10.
    pub fn experience(&self) -> i64 {
        if self.0 > 10.0 {
            let top = XP_BY_CR.last().map(|(_, xp)| *xp).unwrap_or_default();
            return top + ((self.0 - 10.0) * XP_ABOVE_TABLE_PER_CR as f64) as i64;
        }

        XP_BY_CR
            .iter()
            .rev()
            .find(|(cr, _)| *cr <= self.0)
            .map(|(_, xp)| *xp)
            .unwrap_or_default()
    }
}

impl fmt::Display for ChallengeRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            v if v == 0.125 => write!(f, "1/8"),
            v if v == 0.25 => write!(f, "1/4"),
            v if v == 0.5 => write!(f, "1/2"),
            v => write!(f, "{}", v),
        }
    }
}
