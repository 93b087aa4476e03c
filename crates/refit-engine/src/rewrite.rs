//! Applying resolved mutations to a flat text buffer.

use refit_ast::{NodeId, Slot, SourceSpan, Tree};
use thiserror::Error;

use crate::mutation::Mutation;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    #[error("mutation targets {0}, which is not part of the tree")]
    UnknownTarget(NodeId),

    #[error("slot {slot} of {target} is empty")]
    EmptySlot { target: NodeId, slot: Slot },

    #[error("edit range {range} is outside the source text ({len} bytes) or splits a character")]
    OutOfBounds { range: SourceSpan, len: usize },

    #[error("edits at {first} and {second} overlap")]
    Overlap { first: SourceSpan, second: SourceSpan },
}

/// A text replacement over a byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: SourceSpan,
    pub replacement: String,
}

impl Edit {
    pub fn new(range: SourceSpan, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }
}

/// Rewrite the tree's source text with `mutations`.
///
/// Mutations are expected to come out of [`crate::MutationSet::resolve`];
/// overlapping input is rejected rather than applied.
pub fn apply_to_text(tree: &Tree, mutations: &[Mutation]) -> Result<String, RewriteError> {
    let edits = mutations
        .iter()
        .map(|mutation| Ok(Edit::new(mutation.range(tree)?, mutation.replacement())))
        .collect::<Result<Vec<_>, RewriteError>>()?;
    apply_edits(tree.source(), edits)
}

/// Apply non-overlapping edits in reverse document order, so offsets of
/// edits still pending stay valid.
pub fn apply_edits(source: &str, mut edits: Vec<Edit>) -> Result<String, RewriteError> {
    for edit in &edits {
        let range = edit.range.start as usize..edit.range.end as usize;
        if source.get(range).is_none() {
            return Err(RewriteError::OutOfBounds {
                range: edit.range,
                len: source.len(),
            });
        }
    }

    for (index, edit) in edits.iter().enumerate() {
        if let Some(other) = edits[index + 1..]
            .iter()
            .find(|other| other.range.overlaps(&edit.range))
        {
            return Err(RewriteError::Overlap {
                first: edit.range,
                second: other.range,
            });
        }
    }

    // At equal starts the wider edit goes first, so an insertion at the start
    // of a removed range ends up in front of the replacement.
    edits.sort_by(|a, b| (b.range.start, b.range.end).cmp(&(a.range.start, a.range.end)));

    let mut output = source.to_string();
    for edit in edits {
        output.replace_range(
            edit.range.start as usize..edit.range.end as usize,
            &edit.replacement,
        );
    }
    Ok(output)
}
