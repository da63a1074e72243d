use rand::Rng;

/// Fisher-Yates shuffle: walks from the last index down to 1 and swaps each
/// element with a uniformly chosen one at or before it.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}
