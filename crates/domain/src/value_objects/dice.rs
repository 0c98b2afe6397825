//! Dice notation and roll results
//!
//! Supports notation like "1d20", "d20", "2d6+3" and "1d8-1". Rolling is
//! driven by a caller-supplied `(min, max) -> value` source so the domain
//! never owns a random generator.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error when parsing dice notation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    /// The notation string is empty
    #[error("Empty dice formula")]
    Empty,
    /// Invalid format - expected XdY or XdY+Z
    #[error("Invalid dice format: {0}")]
    InvalidFormat(String),
    /// Dice count must be at least 1
    #[error("Dice count must be at least 1")]
    InvalidDiceCount,
    /// Die size must be at least 2
    #[error("Die size must be at least 2")]
    InvalidDieSize,
}

/// A parsed dice formula like "2d6+3"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceFormula {
    /// Number of dice to roll (X in XdY)
    pub dice_count: u8,
    /// Size of each die (Y in XdY)
    pub die_size: u8,
    /// Modifier added after rolling (+Z or -Z)
    pub modifier: i32,
}

impl DiceFormula {
    /// The single twenty-sided die used for initiative and strength checks.
    pub const D20: Self = Self {
        dice_count: 1,
        die_size: 20,
        modifier: 0,
    };

    pub fn new(dice_count: u8, die_size: u8, modifier: i32) -> Result<Self, DiceParseError> {
        if dice_count == 0 {
            return Err(DiceParseError::InvalidDiceCount);
        }
        if die_size < 2 {
            return Err(DiceParseError::InvalidDieSize);
        }
        Ok(Self {
            dice_count,
            die_size,
            modifier,
        })
    }

    /// Parse notation like "1d20+5", "2d6-1" or the "d20" shorthand.
    pub fn parse(input: &str) -> Result<Self, DiceParseError> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return Err(DiceParseError::Empty);
        }

        let (count_str, rest) = input.split_once('d').ok_or_else(|| {
            DiceParseError::InvalidFormat(format!("Missing 'd' separator in '{}'", input))
        })?;

        let dice_count: u8 = if count_str.is_empty() {
            1
        } else {
            count_str.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Invalid dice count: '{}'", count_str))
            })?
        };

        // Split the die size from an optional signed modifier.
        let (size_str, modifier) = match rest.find(['+', '-']) {
            Some(0) => {
                return Err(DiceParseError::InvalidFormat(format!(
                    "Invalid die size: '{}'",
                    rest
                )))
            }
            Some(pos) => {
                let (size, signed) = rest.split_at(pos);
                let modifier: i32 = signed.trim_start_matches('+').parse().map_err(|_| {
                    DiceParseError::InvalidFormat(format!("Invalid modifier: '{}'", signed))
                })?;
                (size, modifier)
            }
            None => (rest, 0),
        };

        let die_size: u8 = size_str.parse().map_err(|_| {
            DiceParseError::InvalidFormat(format!("Invalid die size: '{}'", size_str))
        })?;

        Self::new(dice_count, die_size, modifier)
    }

    /// Roll using `source(min, max)`, which must return a value in `min..=max`.
    pub fn roll_with(&self, mut source: impl FnMut(i32, i32) -> i32) -> DiceRollResult {
        let individual_rolls: Vec<i32> = (0..self.dice_count)
            .map(|_| source(1, self.die_size as i32))
            .collect();
        let dice_total: i32 = individual_rolls.iter().sum();

        DiceRollResult {
            formula: self.clone(),
            individual_rolls,
            dice_total,
            modifier_applied: self.modifier,
            total: dice_total + self.modifier,
        }
    }

    pub fn min_roll(&self) -> i32 {
        self.dice_count as i32 + self.modifier
    }

    pub fn max_roll(&self) -> i32 {
        (self.dice_count as i32 * self.die_size as i32) + self.modifier
    }
}

impl fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.dice_count, self.die_size)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{}", m),
            m => write!(f, "{}", m),
        }
    }
}

/// Result of rolling dice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceRollResult {
    /// The formula that was rolled
    pub formula: DiceFormula,
    /// Individual die results
    pub individual_rolls: Vec<i32>,
    /// Sum of dice before modifier
    pub dice_total: i32,
    /// Modifier that was applied
    pub modifier_applied: i32,
    /// Final total (dice_total + modifier)
    pub total: i32,
}

impl DiceRollResult {
    /// Format as a breakdown string (e.g., "1d20(14) = 14" or "2d6[3, 5] + 2 = 10")
    pub fn breakdown(&self) -> String {
        let rolls = match self.individual_rolls.as_slice() {
            [single] => format!("({})", single),
            many => format!(
                "[{}]",
                many.iter()
                    .map(|r| r.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };
        let dice = format!("{}d{}", self.formula.dice_count, self.formula.die_size);

        match self.modifier_applied {
            0 => format!("{}{} = {}", dice, rolls, self.total),
            m if m > 0 => format!("{}{} + {} = {}", dice, rolls, m, self.total),
            m => format!("{}{} - {} = {}", dice, rolls, -m, self.total),
        }
    }

    /// Check if this is a natural 20 on a single d20
    pub fn is_natural_20(&self) -> bool {
        self.formula.die_size == 20
            && self.formula.dice_count == 1
            && self.individual_rolls.first() == Some(&20)
    }

    /// Check if this is a natural 1 on a single d20
    pub fn is_natural_1(&self) -> bool {
        self.formula.die_size == 20
            && self.formula.dice_count == 1
            && self.individual_rolls.first() == Some(&1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_d20() {
        let formula = DiceFormula::parse("1d20").unwrap();
        assert_eq!(formula, DiceFormula::D20);
    }

    #[test]
    fn test_parse_shorthand_d20() {
        assert_eq!(DiceFormula::parse("d20").unwrap(), DiceFormula::D20);
    }

    #[test]
    fn test_parse_with_modifiers() {
        let plus = DiceFormula::parse("2d6+3").unwrap();
        assert_eq!((plus.dice_count, plus.die_size, plus.modifier), (2, 6, 3));

        let minus = DiceFormula::parse(" 1D8-1 ").unwrap();
        assert_eq!((minus.dice_count, minus.die_size, minus.modifier), (1, 8, -1));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(DiceFormula::parse(""), Err(DiceParseError::Empty));
        assert!(matches!(
            DiceFormula::parse("20"),
            Err(DiceParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            DiceFormula::parse("1d-5"),
            Err(DiceParseError::InvalidFormat(_))
        ));
        assert_eq!(
            DiceFormula::parse("0d20"),
            Err(DiceParseError::InvalidDiceCount)
        );
        assert_eq!(DiceFormula::parse("1d1"), Err(DiceParseError::InvalidDieSize));
    }

    #[test]
    fn test_roll_with_uses_source_bounds() {
        let formula = DiceFormula::parse("3d6+2").unwrap();
        let mut seen = Vec::new();
        let result = formula.roll_with(|min, max| {
            seen.push((min, max));
            max
        });

        assert_eq!(seen, vec![(1, 6); 3]);
        assert_eq!(result.individual_rolls, vec![6, 6, 6]);
        assert_eq!(result.dice_total, 18);
        assert_eq!(result.total, 20);
        assert_eq!(result.total, formula.max_roll());

        let lowest = formula.roll_with(|min, _| min);
        assert_eq!(lowest.total, 5);
        assert_eq!(lowest.total, formula.min_roll());
    }

    #[test]
    fn test_breakdown() {
        let single = DiceFormula::D20.roll_with(|_, _| 14);
        assert_eq!(single.breakdown(), "1d20(14) = 14");

        let multi = DiceFormula::parse("2d6-1").unwrap().roll_with(|_, _| 3);
        assert_eq!(multi.breakdown(), "2d6[3, 3] - 1 = 5");
    }

    #[test]
    fn test_natural_results() {
        assert!(DiceFormula::D20.roll_with(|_, _| 20).is_natural_20());
        assert!(DiceFormula::D20.roll_with(|_, _| 1).is_natural_1());
        assert!(!DiceFormula::parse("1d12")
            .unwrap()
            .roll_with(|_, _| 20)
            .is_natural_20());
    }

    #[test]
    fn test_display() {
        assert_eq!(DiceFormula::parse("2d6+3").unwrap().to_string(), "2d6+3");
        assert_eq!(DiceFormula::parse("1d8-1").unwrap().to_string(), "1d8-1");
        assert_eq!(DiceFormula::D20.to_string(), "1d20");
    }
}
