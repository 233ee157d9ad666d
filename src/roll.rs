//! Rolling functions: the light state updates Farfalle uses to derive a
//! sequence of distinct masks from a single secret.

use crate::xoodoo::LANES;

/// A deterministic single-step update of the 384-bit mask state.
pub trait RollingFunction: Clone {
    /// Advance the mask by one step.
    fn step(&self, lanes: &mut [u32; LANES]);

    /// Returns the mask rolled `i` steps from `base`.
    fn roll(&self, base: &[u32; LANES], i: usize) -> [u32; LANES] {
        let mut mask = *base;
        for _ in 0..i {
            self.step(&mut mask);
        }
        mask
    }
}

/// The rolling function applied to the input mask during compression.
///
/// The lane update uses a plain left shift: bits shifted past 32 are lost,
/// not wrapped.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompressionRoll;

impl RollingFunction for CompressionRoll {
    #[inline]
    fn step(&self, a: &mut [u32; LANES]) {
        let fresh = a[0] ^ (a[0] << 13) ^ a[4].rotate_left(3);
        cycle_planes(a, fresh);
    }
}

/// The rolling function applied to the expansion state.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpansionRoll;

impl RollingFunction for ExpansionRoll {
    #[inline]
    fn step(&self, a: &mut [u32; LANES]) {
        let fresh = (a[4] & a[8]) ^ a[0].rotate_left(5) ^ a[4].rotate_left(13) ^ 0x0000_0007;
        cycle_planes(a, fresh);
    }
}

/// Plane 0, its first lane replaced by `fresh`, moves to the top shifted by
/// one column; the other planes move down one.
#[inline(always)]
fn cycle_planes(a: &mut [u32; LANES], fresh: u32) {
    let top = [a[1], a[2], a[3], fresh];
    for i in 0..8 {
        a[i] = a[i + 4];
    }
    a[8..].copy_from_slice(&top);
}
