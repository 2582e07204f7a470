/// The edit script transforming one sorted sequence into another: elements to
/// insert and elements to remove. Additions keep their relative order from
/// `after`, deletions theirs from `before`.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct DiffResult<T> {
    pub additions: Vec<T>,
    pub deletions: Vec<T>,
}

impl<T> DiffResult<T> {
    /// True when `before` and `after` were already equal element-for-element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.deletions.is_empty()
    }
}

/// [`diff_by`] for element types whose `==` is the intended equality.
#[must_use]
pub fn diff<T: PartialEq + Clone>(before: &[T], after: &[T]) -> DiffResult<T> {
    diff_by(before, after, PartialEq::eq)
}

/// Computes the additions and deletions that turn `before` into `after`.
/// Adding everything in `additions` to `before` and removing everything in
/// `deletions` from it yields `after`, under the same `equal` predicate.
///
/// Both inputs must already be sorted the same way (method and order) and
/// de-duplicated; the result for unsorted input is unspecified. `equal` is
/// external so callers can compare by a subset of fields, e.g. by id only.
#[must_use]
pub fn diff_by<T: Clone>(
    before: &[T],
    after: &[T],
    equal: impl Fn(&T, &T) -> bool,
) -> DiffResult<T> {
    let mut additions = Vec::new();
    let mut deletions = Vec::new();

    let mut bi = 0;
    let mut ai = 0;

    while bi < before.len() && ai < after.len() {
        if equal(&before[bi], &after[ai]) {
            bi += 1;
            ai += 1;
            continue;
        }

        // look ahead for before[bi] in after to see if we can jump ahead
        if let Some(j) = (ai..after.len()).find(|&j| equal(&before[bi], &after[j])) {
            // everything between ai and j was introduced ahead of the match;
            // the match itself is consumed by the next equality check
            additions.extend_from_slice(&after[ai..j]);
            ai = j;
        } else {
            // this is a deletion
            deletions.push(before[bi].clone());
            bi += 1;

            // is after[ai] an addition? only if it never shows up later in
            // before; otherwise leave it to be matched as the scan continues
            if !before[bi..].iter().any(|b| equal(b, &after[ai])) {
                additions.push(after[ai].clone());
                ai += 1;
            }
        }
    }

    // whichever side remains is classified in bulk
    additions.extend_from_slice(&after[ai..]);
    deletions.extend_from_slice(&before[bi..]);

    DiffResult { additions, deletions }
}
