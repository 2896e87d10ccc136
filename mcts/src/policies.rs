use rand::{seq::IteratorRandom, Rng};

/// Uniformly picks one element, returning it with its position.
pub fn select_random<T, Iter, R>(elts: Iter, rng: &mut R) -> Option<(usize, T)>
where
    Iter: Iterator<Item = T>,
    R: Rng,
{
    elts.enumerate().choose(rng)
}

/// Picks the element with the highest key, breaking exact ties uniformly.
///
/// Keys that compare unordered (NaN) never win.
pub fn select_by_key<T, Iter, KeyFn, R>(
    elts: Iter,
    mut key_fn: KeyFn,
    rng: &mut R,
) -> Option<(usize, T)>
where
    Iter: Iterator<Item = T>,
    KeyFn: FnMut(&T) -> f64,
    R: Rng,
{
    let mut tied: Vec<(usize, T)> = Vec::new();
    let mut best_so_far = f64::NEG_INFINITY;
    for (idx, elt) in elts.enumerate() {
        let score = key_fn(&elt);
        if score > best_so_far || (tied.is_empty() && score == best_so_far) {
            best_so_far = score;
            tied.clear();
            tied.push((idx, elt));
        } else if score == best_so_far {
            tied.push((idx, elt));
        }
    }
    if tied.len() <= 1 {
        return tied.pop();
    }
    let pick = rng.gen_range(0..tied.len());
    Some(tied.swap_remove(pick))
}

/// Picks the first element with the highest key.
pub fn select_first_max<T, Iter, KeyFn>(elts: Iter, mut key_fn: KeyFn) -> Option<(usize, T)>
where
    Iter: Iterator<Item = T>,
    KeyFn: FnMut(&T) -> f64,
{
    let mut choice = None;
    let mut best_so_far = f64::NEG_INFINITY;
    for (idx, elt) in elts.enumerate() {
        let score = key_fn(&elt);
        if choice.is_none() || score > best_so_far {
            best_so_far = score;
            choice = Some((idx, elt));
        }
    }
    choice
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;

    #[test]
    fn select_by_key_prefers_strict_maximum() {
        let mut rng = XorShiftRng::seed_from_u64(7);
        let scores = [0.1, 0.9, 0.5];
        for _ in 0..50 {
            let (idx, _) = select_by_key(scores.iter(), |s| **s, &mut rng).unwrap();
            assert_eq!(idx, 1);
        }
    }

    #[test]
    fn select_by_key_samples_every_tie() {
        let mut rng = XorShiftRng::seed_from_u64(7);
        let scores = [0.5, 0.1, 0.5, 0.5];
        let mut seen = [false; 4];
        for _ in 0..200 {
            let (idx, _) = select_by_key(scores.iter(), |s| **s, &mut rng).unwrap();
            seen[idx] = true;
        }
        assert_eq!(seen, [true, false, true, true]);
    }

    #[test]
    fn select_by_key_handles_all_negative_infinity() {
        let mut rng = XorShiftRng::seed_from_u64(7);
        let scores = [f64::NEG_INFINITY, f64::NEG_INFINITY];
        assert!(select_by_key(scores.iter(), |s| **s, &mut rng).is_some());
        assert!(select_by_key(std::iter::empty::<f64>(), |s| *s, &mut rng).is_none());
    }

    #[test]
    fn select_first_max_is_deterministic() {
        let scores = [0.2, 0.7, 0.7, f64::NEG_INFINITY];
        assert_eq!(select_first_max(scores.iter(), |s| **s).map(|(i, _)| i), Some(1));
        let scores = [f64::NEG_INFINITY, f64::NEG_INFINITY];
        assert_eq!(select_first_max(scores.iter(), |s| **s).map(|(i, _)| i), Some(0));
    }

    #[test]
    fn select_random_covers_range() {
        let mut rng = XorShiftRng::seed_from_u64(11);
        let mut seen = [false; 3];
        for _ in 0..100 {
            let (idx, _) = select_random(0..3, &mut rng).unwrap();
            seen[idx] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }
}
