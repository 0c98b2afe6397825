//! Default dice adapter: parses notation and rolls it with a `RandomPort`.

use std::sync::Arc;

use skirmish_domain::{DiceFormula, DiceRollResult};

use crate::infrastructure::ports::{DiceError, DicePort, RandomPort};

pub struct FormulaDice {
    random: Arc<dyn RandomPort>,
}

impl FormulaDice {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self { random }
    }
}

impl DicePort for FormulaDice {
    fn roll(&self, notation: &str) -> Result<DiceRollResult, DiceError> {
        let formula = DiceFormula::parse(notation)?;
        let result = formula.roll_with(|min, max| self.random.gen_range(min, max));
        tracing::trace!(notation, breakdown = %result.breakdown(), "Rolled dice");
        Ok(result)
    }
}
