use listpager::reconcile::{dedup, diff, diff_with, Diagnostic, EditScript, Side};

/// Small deterministic generator so failures reproduce.
struct Lcg(u64);

impl Lcg {
    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound
    }

    fn snapshot(&mut self) -> Vec<u32> {
        let len = self.below(9) as usize;
        let mut items: Vec<u32> = (0..12).collect();
        for i in (1..items.len()).rev() {
            let j = self.below(i as u64 + 1) as usize;
            items.swap(i, j);
        }
        items.truncate(len);
        items
    }
}

/// Test that replaying a script on the old snapshot yields the new one.
#[test]
fn test_script_reproduces_new_snapshot() {
    let mut rng = Lcg(0x5eed);
    for _ in 0..2000 {
        let old = rng.snapshot();
        let new = rng.snapshot();
        let script = diff(&old, &new, true);
        assert_eq!(script.apply(&old, &new), new, "old={old:?} new={new:?}");
    }
}

/// Test that an empty old snapshot always reloads.
#[test]
fn test_empty_old_falls_back_to_full_reload() {
    let script = diff::<u32>(&[], &[1, 2, 3], true);
    assert_eq!(script, EditScript::full_reload());
}

/// Test that disallowing incremental updates reloads.
#[test]
fn test_disallowed_incremental_falls_back_to_full_reload() {
    let script = diff(&[1, 2], &[2, 3], false);
    assert!(script.full_reload);
    assert_eq!(script.change_count(), 0);
}

/// Test deletions and insertions index into the right snapshot.
#[test]
fn test_deletions_and_insertions() {
    let script = diff(&["a", "b", "c", "d"], &["b", "x", "d", "y"], true);
    assert_eq!(script.deletions, vec![0, 2]);
    assert_eq!(script.insertions, vec![1, 3]);
    assert!(script.moves.is_empty());
    assert_eq!(script.updates, vec![0, 2]);
}

/// Test that duplicates are reported and collapsed to their first
/// occurrence.
#[test]
fn test_duplicate_identities_are_reported() {
    let mut diagnostics = Vec::new();
    let old = ["a", "b", "a"];
    let new = ["b", "b", "c"];
    let script = diff_with(&old, &new, true, |diagnostic| diagnostics.push(diagnostic));

    assert_eq!(
        diagnostics,
        vec![
            Diagnostic::DuplicateIdentity {
                side: Side::Old,
                index: 2,
                item: "\"a\"".to_string(),
            },
            Diagnostic::DuplicateIdentity {
                side: Side::New,
                index: 1,
                item: "\"b\"".to_string(),
            },
        ]
    );
    assert_eq!(script.deletions, vec![0]);
    assert_eq!(script.insertions, vec![1]);
    assert_eq!(
        script.apply(&dedup(&old), &dedup(&new)),
        vec!["b", "c"]
    );
}

/// Test that dedup keeps first occurrences in order.
#[test]
fn test_dedup_keeps_first_occurrence() {
    assert_eq!(dedup(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
}
