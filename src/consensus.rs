//! Column consensus and per-cell classification.
//!
//! The consensus of a column is the set of characters reaching the highest
//! count once end gaps are set aside. Internal gaps count like any other
//! character. Several members means a tie.

/// One column's consensus set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Consensus {
    /// Members in order of first occurrence down the column.
    members: Vec<u8>,
    /// Occurrences of each member (shared by all of them).
    count: usize,
}

impl Consensus {
    /// Computes the consensus of a column.
    ///
    /// `cells` yields each row's character together with its end-gap
    /// status; end gaps are ignored.
    pub fn from_column<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = (u8, bool)>,
    {
        // (character, count) in first-occurrence order
        let mut counts: Vec<(u8, usize)> = Vec::new();
        for (c, end_gap) in cells {
            if end_gap {
                continue;
            }
            match counts.iter_mut().find(|(seen, _)| *seen == c) {
                Some((_, n)) => *n += 1,
                None => counts.push((c, 1)),
            }
        }

        let count = counts.iter().map(|&(_, n)| n).max().unwrap_or(0);
        let members = counts
            .into_iter()
            .filter(|&(_, n)| n == count)
            .map(|(c, _)| c)
            .collect();

        Self { members, count }
    }

    /// Members in display order.
    pub fn members(&self) -> &[u8] {
        &self.members
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_tie(&self) -> bool {
        self.members.len() > 1
    }

    pub fn contains(&self, c: u8) -> bool {
        self.members.contains(&c)
    }

    /// The single consensus character.
    ///
    /// On a tie the lowest character code wins, so the answer does not
    /// depend on row order.
    pub fn primary(&self) -> Option<u8> {
        self.members.iter().copied().min()
    }

    /// Classifies one cell of this column.
    pub fn classify(&self, c: u8, end_gap: bool) -> CellClass {
        if end_gap {
            return CellClass::EndGap;
        }
        if self.is_empty() {
            return CellClass::Aligned;
        }
        match (self.contains(c), self.is_tie()) {
            (false, _) => CellClass::Mismatch,
            (true, true) => CellClass::TieMatch,
            (true, false) => CellClass::Aligned,
        }
    }
}

/// Classification of one aligned character.
///
/// Every variant except `EndGap` carries the `aligned-char` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellClass {
    /// Gap before the first or after the last residue
    EndGap,
    /// Agrees with a single consensus, or the column has none
    Aligned,
    /// Not a member of the column consensus
    Mismatch,
    /// One of several tied consensus characters
    TieMatch,
}

impl CellClass {
    /// Tag names, as consumed by renderers.
    pub fn tags(self) -> &'static [&'static str] {
        match self {
            CellClass::EndGap => &["end-gap"],
            CellClass::Aligned => &["aligned-char"],
            CellClass::Mismatch => &["aligned-char", "mismatch"],
            CellClass::TieMatch => &["aligned-char", "tie-match"],
        }
    }

    pub fn is_end_gap(self) -> bool {
        self == CellClass::EndGap
    }
}

impl std::fmt::Display for CellClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tags().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(chars: &str) -> Consensus {
        Consensus::from_column(chars.bytes().map(|c| (c, false)))
    }

    #[test]
    fn test_single_majority() {
        let cons = column("AAC");
        assert_eq!(cons.members(), b"A");
        assert_eq!(cons.count(), 2);
        assert!(!cons.is_tie());
    }

    #[test]
    fn test_tie_keeps_first_occurrence_order() {
        let cons = column("GACCAG");
        assert_eq!(cons.members(), b"GAC");
        assert!(cons.is_tie());
        assert_eq!(cons.primary(), Some(b'A'));
    }

    #[test]
    fn test_internal_gap_is_counted() {
        let cons = column("--A");
        assert_eq!(cons.members(), b"-");
    }

    #[test]
    fn test_end_gaps_are_ignored() {
        let cons = Consensus::from_column([(b'-', true), (b'-', true), (b'A', false)]);
        assert_eq!(cons.members(), b"A");
    }

    #[test]
    fn test_all_end_gaps_gives_empty() {
        let cons = Consensus::from_column([(b'-', true), (b'-', true)]);
        assert!(cons.is_empty());
        assert_eq!(cons.primary(), None);
        assert_eq!(cons.classify(b'-', true), CellClass::EndGap);
    }

    #[test]
    fn test_case_sensitive() {
        let cons = column("aAA");
        assert_eq!(cons.members(), b"A");
        assert_eq!(cons.classify(b'a', false), CellClass::Mismatch);
    }

    #[test]
    fn test_classification_table() {
        let single = column("AAG");
        assert_eq!(single.classify(b'A', false), CellClass::Aligned);
        assert_eq!(single.classify(b'G', false), CellClass::Mismatch);
        assert_eq!(single.classify(b'-', true), CellClass::EndGap);

        let tie = column("AG");
        assert_eq!(tie.classify(b'A', false), CellClass::TieMatch);
        assert_eq!(tie.classify(b'G', false), CellClass::TieMatch);

        let tie = column("AGGAT");
        assert_eq!(tie.classify(b'T', false), CellClass::Mismatch);

        let empty = Consensus::default();
        assert_eq!(empty.classify(b'C', false), CellClass::Aligned);
    }

    #[test]
    fn test_tags() {
        assert_eq!(CellClass::EndGap.tags(), &["end-gap"]);
        assert_eq!(CellClass::Mismatch.to_string(), "aligned-char mismatch");
        assert_eq!(CellClass::TieMatch.tags(), &["aligned-char", "tie-match"]);
    }
}
