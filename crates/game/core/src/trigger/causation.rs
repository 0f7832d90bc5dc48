use super::SourceId;

/// Causation record of one in-flight root action.
///
/// `chain` holds the sources of the triggers currently executing, innermost
/// last. `depth` counts request events currently being fired.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Causation {
    chain: Vec<SourceId>,
    depth: usize,
}

impl Causation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn chain(&self) -> &[SourceId] {
        &self.chain
    }

    /// True if a trigger from `source` is already executing.
    pub fn is_active(&self, source: &SourceId) -> bool {
        self.chain.contains(source)
    }

    pub(crate) fn enter_event(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn leave_event(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn push(&mut self, source: SourceId) {
        self.chain.push(source);
    }

    pub(crate) fn pop(&mut self) -> Option<SourceId> {
        self.chain.pop()
    }
}
