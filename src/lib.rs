#![cfg_attr(not(feature = "std"), no_std)]

//! The Xoodoo permutation and the two modes built on it: Cyclist (giving
//! Xoodyak) and Farfalle (giving Xoofff with its SANE, SANSE, WBC, and
//! WBC-AE packagings).

extern crate alloc;

pub mod bits;
pub mod cyclist;
pub mod farfalle;
pub mod roll;
pub mod sane;
pub mod sanse;
pub mod wbc;
pub mod xoodoo;
pub mod xoodyak;
pub mod xoofff;

#[cfg(all(test, feature = "std"))]
mod fuzzing;

pub use crate::bits::BitString;

/// A permutation bijectively maps all blocks of the given width to other blocks of the given width.
pub trait Permutation<const WIDTH: usize>: Clone {
    /// Returns a new state.
    #[inline(always)]
    fn new_state() -> [u8; WIDTH] {
        [0u8; WIDTH]
    }

    /// Permute the given state.
    fn permute(state: &mut [u8; WIDTH]);
}

/// The ways an operation on these primitives can fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Unsupported permutation or mode parameters.
    #[error("unsupported permutation or mode parameters")]
    InvalidConfig,
    /// A keyed-only operation was requested of a duplex in hash mode.
    #[error("operation requires keyed mode")]
    InvalidMode,
    /// The key (plus key id) does not fit the absorb rate or the state width.
    #[error("key does not fit")]
    KeyTooLong,
    /// Authentication failed. No plaintext is released, and a session
    /// returning this refuses all further operations.
    #[error("authentication tag mismatch")]
    TagMismatch,
    /// The ciphertext is shorter than the mandatory tag expansion.
    #[error("ciphertext shorter than the tag expansion")]
    ShortInput,
}

/// The result of a fallible operation.
pub type Result<T> = core::result::Result<T, Error>;
