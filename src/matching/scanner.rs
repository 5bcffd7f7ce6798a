use tracing::debug;

use crate::core::input::RawInput;
use crate::core::observation::Observation;
use crate::matching::library::PatternLibrary;

/// Applies a pattern library to every raw input of a scan
pub struct CandidateScanner<'a> {
    library: &'a PatternLibrary,
}

impl<'a> CandidateScanner<'a> {
    pub fn new(library: &'a PatternLibrary) -> Self {
        Self { library }
    }

    /// Classify every input exactly once, preserving input order.
    pub fn scan(&self, inputs: &[RawInput]) -> Vec<Observation> {
        let observations: Vec<Observation> = inputs
            .iter()
            .cloned()
            .map(|input| self.library.classify(input))
            .collect();

        let matched = observations.iter().filter(|o| o.is_matched()).count();
        debug!(
            "Scanned {} inputs: {} matched, {} unmatched",
            observations.len(),
            matched,
            observations.len() - matched
        );

        observations
    }
}
