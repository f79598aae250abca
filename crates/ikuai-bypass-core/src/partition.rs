// ── Partitioner ──
//
// Deterministic chunking of an ordered list into size-bounded chunks.

use std::num::NonZeroUsize;

/// Split `items` into chunks of at most `max` entries, preserving order.
///
/// Emits `len / max` full chunks, then one chunk with the remainder if there
/// is one or if no full chunk was emitted. The result is never empty: an
/// empty input yields exactly one empty chunk, so callers may submit an
/// empty chunk downstream.
pub fn partition<T>(items: Vec<T>, max: NonZeroUsize) -> Vec<Vec<T>> {
    let max = max.get();
    let full = items.len() / max;
    let remainder = items.len() % max;

    let mut chunks = Vec::with_capacity(full + 1);
    let mut rest = items.into_iter();
    for _ in 0..full {
        chunks.push(rest.by_ref().take(max).collect());
    }
    if remainder > 0 || full == 0 {
        chunks.push(rest.collect());
    }
    chunks
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap_or(NonZeroUsize::MIN)
    }

    #[test]
    fn twelve_thousand_entries_by_five_thousand() {
        let ips: Vec<String> = (0..12_000).map(|i| format!("10.0.{}.{}", i / 256, i % 256)).collect();
        let chunks = partition(ips, nz(5000));
        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![5000, 5000, 2000]);
    }

    #[test]
    fn empty_input_yields_one_empty_chunk() {
        let chunks = partition(Vec::<String>::new(), nz(1000));
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_empty());
    }

    #[test]
    fn exact_multiple_has_no_trailing_chunk() {
        let chunks = partition((0..10).collect(), nz(5));
        assert_eq!(chunks, vec![vec![0, 1, 2, 3, 4], vec![5, 6, 7, 8, 9]]);
    }

    #[test]
    fn shorter_than_limit_is_single_chunk() {
        let chunks = partition(vec!["a", "b"], nz(1000));
        assert_eq!(chunks, vec![vec!["a", "b"]]);
    }

    #[test]
    fn concatenation_reproduces_input_for_all_small_shapes() {
        for len in 0..40 {
            for max in 1..9 {
                let input: Vec<usize> = (0..len).collect();
                let chunks = partition(input.clone(), nz(max));

                assert!(!chunks.is_empty(), "len={len} max={max}");
                let (last, init) = chunks.split_last().unwrap();
                assert!(init.iter().all(|c| c.len() == max), "len={len} max={max}");
                assert!(last.len() <= max, "len={len} max={max}");

                let flat: Vec<usize> = chunks.into_iter().flatten().collect();
                assert_eq!(flat, input, "len={len} max={max}");
            }
        }
    }
}
