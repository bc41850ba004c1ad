#[cfg(test)]
#[path = "../../tests/unit/utils/permutation_test.rs"]
mod permutation_test;

/// Rearranges `vec` in place so that the element previously at `permutation[i]` ends up at
/// index `i`. Works through cycle decomposition, so no second buffer is allocated.
pub fn apply_permutation<T>(vec: &mut [T], permutation: &[usize]) {
    assert_eq!(vec.len(), permutation.len());

    let mut done = vec![false; vec.len()];
    for i in 0..vec.len() {
        if done[i] {
            continue;
        }
        done[i] = true;
        let mut prev_j = i;
        let mut j = permutation[i];
        while i != j {
            vec.swap(prev_j, j);
            done[j] = true;
            prev_j = j;
            j = permutation[j];
        }
    }
}
