use super::face_encoder::FaceEncoder;
use super::identity_encoding::IdentityEncoding;

/// Reference faces in load order.
///
/// Order is significant: when a candidate matches several entries, the
/// earliest one wins regardless of which is the closer match. Built once at
/// startup and never mutated afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KnownIdentitySet {
    entries: Vec<IdentityEncoding>,
}

impl KnownIdentitySet {
    pub fn new(entries: Vec<IdentityEncoding>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IdentityEncoding] {
        &self.entries
    }

    /// Lowest-index entry that `encoder` accepts as a match for `candidate`.
    pub fn first_match(
        &self,
        candidate: &[f32],
        encoder: &dyn FaceEncoder,
    ) -> Option<&IdentityEncoding> {
        self.entries
            .iter()
            .find(|known| encoder.is_match(known.vector(), candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::bounding_box::BoundingBox;
    use crate::shared::frame::Frame;
    use std::collections::HashSet;

    /// Matches when the known vector's id (first component) is in `accept`.
    struct IdMatcher {
        accept: HashSet<u32>,
    }

    impl FaceEncoder for IdMatcher {
        fn encode(
            &self,
            _frame: &Frame,
            _face: &BoundingBox,
        ) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
            Ok(vec![])
        }

        fn is_match(&self, known: &[f32], _candidate: &[f32]) -> bool {
            self.accept.contains(&(known[0] as u32))
        }
    }

    fn set_of(names: &[&str]) -> KnownIdentitySet {
        KnownIdentitySet::new(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| IdentityEncoding::new(vec![i as f32], *n, format!("{n}.jpg")))
                .collect(),
        )
    }

    #[test]
    fn test_lowest_index_wins_on_ambiguous_match() {
        let set = set_of(&["a", "b", "carol_1", "d", "e", "frank"]);
        let matcher = IdMatcher {
            accept: HashSet::from([2, 5]),
        };

        for _ in 0..10 {
            let hit = set.first_match(&[0.0], &matcher).unwrap();
            assert_eq!(hit.name(), "carol_1");
        }
    }

    #[test]
    fn test_single_match_is_returned() {
        let set = set_of(&["a", "b", "c"]);
        let matcher = IdMatcher {
            accept: HashSet::from([1]),
        };
        assert_eq!(set.first_match(&[0.0], &matcher).unwrap().name(), "b");
    }

    #[test]
    fn test_no_match_is_none() {
        let set = set_of(&["a", "b"]);
        let matcher = IdMatcher {
            accept: HashSet::new(),
        };
        assert!(set.first_match(&[0.0], &matcher).is_none());
    }

    #[test]
    fn test_empty_set_never_matches() {
        let matcher = IdMatcher {
            accept: HashSet::from([0]),
        };
        let set = KnownIdentitySet::default();
        assert!(set.is_empty());
        assert!(set.first_match(&[0.0], &matcher).is_none());
    }
}
