//! Slice-level vector helpers used by the particle swarm.
//!
//! All binary operations work in place on the first argument and require
//! both slices to have the same length.

use rand::Rng;

/// Half-width of the range used by `randomise_default`.
pub const DEFAULT_RANDOMISE_RANGE: f64 = 0.1;

/// `v1 += v2`
pub fn add(v1: &mut [f64], v2: &[f64]) {
    debug_assert_eq!(v1.len(), v2.len());
    for (a, b) in v1.iter_mut().zip(v2) {
        *a += b;
    }
}

/// `v1 -= v2`
pub fn sub(v1: &mut [f64], v2: &[f64]) {
    debug_assert_eq!(v1.len(), v2.len());
    for (a, b) in v1.iter_mut().zip(v2) {
        *a -= b;
    }
}

/// `v *= k`
pub fn mul(v: &mut [f64], k: f64) {
    v.iter_mut().for_each(|x| *x *= k);
}

/// Multiplies every component by `k * r`, drawing a fresh `r` in `[0, 1)`
/// for each component.
pub fn mul_rand<R: Rng + ?Sized>(v: &mut [f64], k: f64, rng: &mut R) {
    for x in v.iter_mut() {
        *x *= k * rng.gen::<f64>();
    }
}

/// `dst = src`
pub fn copy(dst: &mut [f64], src: &[f64]) {
    dst.copy_from_slice(src);
}

/// Fills `v` uniformly in `[-max_value, max_value]`.
pub fn randomise<R: Rng + ?Sized>(v: &mut [f64], max_value: f64, rng: &mut R) {
    for x in v.iter_mut() {
        *x = rng.gen_range(-max_value..=max_value);
    }
}

/// Fills `v` uniformly in `[-DEFAULT_RANDOMISE_RANGE, DEFAULT_RANDOMISE_RANGE]`.
pub fn randomise_default<R: Rng + ?Sized>(v: &mut [f64], rng: &mut R) {
    randomise(v, DEFAULT_RANDOMISE_RANGE, rng);
}

/// Clamps every component to `[-max_value, max_value]`. A NaN component
/// becomes `0.0`.
pub fn clamp_components(v: &mut [f64], max_value: f64) {
    for x in v.iter_mut() {
        *x = if x.is_nan() { 0.0 } else { x.clamp(-max_value, max_value) };
    }
}

/// Sets every NaN or infinite component to `0.0`.
pub fn zero_non_finite(v: &mut [f64]) {
    v.iter_mut().filter(|x| !x.is_finite()).for_each(|x| *x = 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn add_and_sub_are_inverse() {
        let mut v = vec![1.0, 2.0, 3.0];
        add(&mut v, &[0.5, -1.0, 4.0]);
        assert_eq!(v, vec![1.5, 1.0, 7.0]);
        sub(&mut v, &[0.5, -1.0, 4.0]);
        assert_eq!(v, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn mul_rand_never_flips_sign_or_grows_past_k() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut v = vec![2.0; 64];
        mul_rand(&mut v, 3.0, &mut rng);
        assert!(v.iter().all(|&x| (0.0..6.0).contains(&x)));
        // Independent draws per component.
        assert!(v.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn randomise_stays_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut v = vec![0.0; 256];
        randomise(&mut v, 0.5, &mut rng);
        assert!(v.iter().all(|x| x.abs() <= 0.5));
        randomise_default(&mut v, &mut rng);
        assert!(v.iter().all(|x| x.abs() <= DEFAULT_RANDOMISE_RANGE));
    }

    #[test]
    fn clamp_limits_both_signs() {
        let mut v = vec![-5.0, -0.5, 0.0, 0.5, 5.0];
        clamp_components(&mut v, 1.0);
        assert_eq!(v, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn clamp_maps_nan_into_range() {
        let mut v = vec![f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.25];
        clamp_components(&mut v, 2.0);
        assert_eq!(v, vec![0.0, 2.0, -2.0, 0.25]);
    }

    #[test]
    fn zero_non_finite_keeps_finite_values() {
        let mut v = vec![f64::NAN, 1.5, f64::INFINITY, -3.0, f64::NEG_INFINITY];
        zero_non_finite(&mut v);
        assert_eq!(v, vec![0.0, 1.5, 0.0, -3.0, 0.0]);
    }
}
