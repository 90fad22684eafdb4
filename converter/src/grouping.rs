//! Sequence grouping of data files.
//!
//! A data file belongs to the group named by its base name up to the first
//! `-`. Grouping is adjacency-only: a new group is opened whenever the id
//! differs from the previous file's id, even if that id was seen before.

use klippel_report_core::SequenceCall;

/// Returns the group id for a data file base name (no extension).
///
/// # Examples
///
/// ```
/// use klippel_report_converter::group_id;
///
/// assert_eq!(group_id("Seq1-001"), "Seq1");
/// assert_eq!(group_id("Seq1-001-b"), "Seq1");
/// assert_eq!(group_id("Impedance"), "Impedance");
/// assert_eq!(group_id("-001"), "");
/// ```
pub fn group_id(stem: &str) -> &str {
    stem.split('-').next().unwrap_or_default()
}

/// Single-slot cursor over the sequence groups of one conversion.
///
/// # Examples
///
/// ```
/// use klippel_report_converter::SequenceGrouper;
/// use klippel_report_core::SequenceCall;
///
/// let mut root = SequenceCall::new("Main");
/// let mut grouper = SequenceGrouper::new();
/// for stem in ["Seq1-001", "Seq2-001", "Seq1-002"] {
///     grouper.enter(&mut root, stem);
/// }
/// assert_eq!(root.sequence_names(), vec!["Seq1", "Seq2", "Seq1"]);
/// ```
#[derive(Debug, Default)]
pub struct SequenceGrouper {
    /// Index into the root's sequences of the open group
    current: Option<usize>,
}

impl SequenceGrouper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the group the file `stem` belongs to, opening a new group
    /// under `root` when its id differs from the currently open group.
    pub fn enter<'a>(&mut self, root: &'a mut SequenceCall, stem: &str) -> &'a mut SequenceCall {
        let id = group_id(stem);
        let reuse = self
            .current
            .filter(|&index| root.sequences.get(index).is_some_and(|seq| seq.name == id));

        let index = match reuse {
            Some(index) => index,
            None => {
                root.add_sequence_call(id);
                let index = root.sequences.len() - 1;
                tracing::debug!(group = id, index, "Opened sequence group");
                index
            }
        };
        self.current = Some(index);
        &mut root.sequences[index]
    }

    /// Name of the currently open group.
    pub fn current_name<'a>(&self, root: &'a SequenceCall) -> Option<&'a str> {
        self.current
            .and_then(|index| root.sequences.get(index))
            .map(|seq| seq.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use klippel_report_core::NumericLimitStep;

    use super::*;

    #[test]
    fn test_adjacent_files_share_group() {
        let mut root = SequenceCall::new("Main");
        let mut grouper = SequenceGrouper::new();

        grouper
            .enter(&mut root, "Seq1-001")
            .add_step(NumericLimitStep::new("a"));
        grouper
            .enter(&mut root, "Seq1-002")
            .add_step(NumericLimitStep::new("b"));

        assert_eq!(root.sequence_names(), vec!["Seq1"]);
        assert_eq!(root.sequences[0].steps.len(), 2);
    }

    #[test]
    fn test_interleaved_ids_open_duplicate_groups() {
        let mut root = SequenceCall::new("Main");
        let mut grouper = SequenceGrouper::new();

        for stem in ["Seq1-001", "Seq2-001", "Seq1-002"] {
            grouper
                .enter(&mut root, stem)
                .add_step(NumericLimitStep::new(stem));
        }

        assert_eq!(root.sequence_names(), vec!["Seq1", "Seq2", "Seq1"]);
        assert_eq!(root.sequences[0].steps[0].name, "Seq1-001");
        assert_eq!(root.sequences[2].steps[0].name, "Seq1-002");
        assert_eq!(grouper.current_name(&root), Some("Seq1"));
    }

    #[test]
    fn test_fresh_grouper_has_no_current_group() {
        let root = SequenceCall::new("Main");
        let grouper = SequenceGrouper::new();
        assert_eq!(grouper.current_name(&root), None);
    }
}
