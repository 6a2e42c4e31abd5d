use super::tile::MergeSlot;

/// What a single line pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LineOutcome {
    /// Any tile shifted or merged.
    pub changed: bool,
    /// Number of merges performed.
    pub merges: u32,
    /// Sum of the values produced by those merges.
    pub gained: u64,
}

impl LineOutcome {
    #[inline]
    pub(crate) fn absorb(&mut self, other: LineOutcome) {
        self.changed |= other.changed;
        self.merges += other.merges;
        self.gained = self.gained.saturating_add(other.gained);
    }
}

/// Slide every tile in `line` toward index 0, merging equal neighbours.
///
/// Each tile walks backward one cell at a time: into an empty cell it keeps
/// going, into an equal unmerged tile it merges and stops, anything else
/// stops it. The marker set by `increase` keeps a freshly merged tile from
/// merging a second time in the same pass.
pub(crate) fn compact_line(line: &mut [MergeSlot]) -> LineOutcome {
    let mut outcome = LineOutcome::default();
    for start in 1..line.len() {
        if line[start].is_empty() {
            continue;
        }
        let mut pos = start;
        while pos > 0 {
            let target = pos - 1;
            if line[target].is_empty() {
                line[target] = line[pos];
                line[pos] = MergeSlot::EMPTY;
                outcome.changed = true;
                pos = target;
            } else if line[target].can_merge(line[pos]) {
                line[target].increase();
                line[pos] = MergeSlot::EMPTY;
                outcome.changed = true;
                outcome.merges += 1;
                outcome.gained = outcome.gained.saturating_add(line[target].tile().value());
                break;
            } else {
                break;
            }
        }
    }
    outcome
}
