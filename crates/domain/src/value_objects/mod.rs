//! Value objects - Immutable objects defined by their attributes

mod challenge_rating;
mod dice;
mod document;

pub use challenge_rating::ChallengeRating;
pub use dice::{DiceFormula, DiceParseError, DiceRollResult};
pub use document::Document;
