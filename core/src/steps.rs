//! Parsing of the `--steps` argument.

use std::collections::BTreeSet;

use crate::error::StepParseError;

/// Training checkpoint step number.
pub type Step = u64;

/// Distinct steps requested for a run, in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepList {
    steps: Vec<Step>,
    duplicates: usize,
}

impl StepList {
    pub fn from_steps<I: IntoIterator<Item = Step>>(input: I) -> Self {
        let mut seen = BTreeSet::new();
        let mut total = 0usize;
        for step in input {
            total += 1;
            seen.insert(step);
        }
        Self {
            duplicates: total - seen.len(),
            steps: seen.into_iter().collect(),
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of tokens dropped because their step was already listed.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn has_duplicates(&self) -> bool {
        self.duplicates > 0
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Parse a comma-separated list such as `"140,141"`.
///
/// Any token that does not parse aborts the whole list.
pub fn parse_steps(input: &str) -> Result<StepList, StepParseError> {
    if input.trim().is_empty() {
        return Err(StepParseError::Empty);
    }

    let parsed = input
        .split(',')
        .enumerate()
        .map(|(idx, raw)| {
            let token = raw.trim();
            token
                .parse::<Step>()
                .map_err(|_| StepParseError::InvalidToken {
                    position: idx + 1,
                    token: token.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StepList::from_steps(parsed))
}
