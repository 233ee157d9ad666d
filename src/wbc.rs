//! WBC: a tweakable wide-block cipher, and its authenticated variant.
//!
//! A four-round Feistel network over the two halves of the input, with the
//! public tweak fed to every round function. The rounds acting on the right
//! half use a cheaper "short" function (`h`); the rounds acting on the left
//! half use the full function (`g`).

use subtle::ConstantTimeEq;

use crate::bits::BitString;
use crate::farfalle::Prf;
use crate::{Error, Result};

/// A tweakable wide-block cipher. Stateless; a single instance may serve
/// any number of keys and tweaks.
#[derive(Clone, Debug)]
pub struct Wbc<H: Prf, G: Prf> {
    h: H,
    g: G,
    align_bits: usize,
}

impl<H: Prf, G: Prf> Wbc<H, G> {
    /// Assembles a cipher from the short and full round functions.
    pub fn with_parts(h: H, g: G, align_bits: usize) -> Self {
        debug_assert!(align_bits > 0);
        Wbc { h, g, align_bits }
    }

    /// Length of the left half of an `n`-bit block: half of `n` for short
    /// inputs, otherwise the largest power-of-two multiple of the state
    /// width not exceeding `n / 2`.
    fn split(&self, n: usize) -> usize {
        let w = self.g.width_bits();
        if n < 2 * w {
            n / 2
        } else {
            let mut nl = w;
            while 4 * nl <= n {
                nl *= 2;
            }
            nl
        }
    }

    /// Encrypts `plaintext` under `key` and `tweak`, preserving its length.
    ///
    /// Inputs need at least two bits to leave both Feistel halves
    /// non-empty. Shorter inputs still round-trip but degenerate: with no
    /// left half the two right-half rounds cancel and the output equals
    /// the input.
    pub fn encipher(
        &self,
        key: &BitString,
        tweak: &BitString,
        plaintext: &BitString,
    ) -> Result<BitString> {
        let nl = self.split(plaintext.len());
        let mut left = plaintext.substring(0, nl);
        let mut right = plaintext.substring(nl, plaintext.len() - nl);

        self.short_round(key, tweak, &left, &mut right)?;
        self.full_round(key, tweak, &right, &mut left)?;
        self.short_round(key, tweak, &left, &mut right)?;
        self.full_round(key, tweak, &right, &mut left)?;

        Ok(left.concat(&right))
    }

    /// Inverts [`Wbc::encipher`].
    pub fn decipher(
        &self,
        key: &BitString,
        tweak: &BitString,
        ciphertext: &BitString,
    ) -> Result<BitString> {
        let nl = self.split(ciphertext.len());
        let mut left = ciphertext.substring(0, nl);
        let mut right = ciphertext.substring(nl, ciphertext.len() - nl);

        self.full_round(key, tweak, &right, &mut left)?;
        self.short_round(key, tweak, &left, &mut right)?;
        self.full_round(key, tweak, &right, &mut left)?;
        self.short_round(key, tweak, &left, &mut right)?;

        Ok(left.concat(&right))
    }

    fn short_round(
        &self,
        key: &BitString,
        tweak: &BitString,
        src: &BitString,
        dst: &mut BitString,
    ) -> Result<()> {
        let messages = [tweak.clone(), src.clone().appended_bit(false)];
        let keystream = self.h.apply(key, &messages, dst.len(), 0)?;
        *dst = dst.xor(&keystream);
        Ok(())
    }

    fn full_round(
        &self,
        key: &BitString,
        tweak: &BitString,
        src: &BitString,
        dst: &mut BitString,
    ) -> Result<()> {
        let messages = [tweak.clone(), src.clone().appended_bit(true)];
        let keystream = self.g.apply(key, &messages, dst.len(), 0)?;
        *dst = dst.xor(&keystream);
        Ok(())
    }
}

/// A wide-block authenticated cipher: the plaintext is extended with
/// `tag_bits` zero bits before enciphering, and those bits are checked on
/// deciphering. The associated data takes the tweak's place.
#[derive(Clone, Debug)]
pub struct WbcAe<H: Prf, G: Prf> {
    wbc: Wbc<H, G>,
    tag_bits: usize,
}

impl<H: Prf, G: Prf> WbcAe<H, G> {
    /// Assembles the cipher. `tag_bits` must be a positive multiple of
    /// `align_bits`.
    pub fn with_parts(h: H, g: G, tag_bits: usize, align_bits: usize) -> Self {
        debug_assert!(tag_bits > 0 && align_bits > 0 && tag_bits % align_bits == 0);
        WbcAe { wbc: Wbc::with_parts(h, g, align_bits), tag_bits }
    }

    /// Encrypts and authenticates `plaintext`, binding `ad`. The output is
    /// `tag_bits` longer than the input.
    pub fn wrap(&self, key: &BitString, ad: &BitString, plaintext: &BitString) -> Result<BitString> {
        self.wbc.encipher(key, ad, &plaintext.concat(&BitString::zeroes(self.tag_bits)))
    }

    /// Verifies and decrypts one wrapped message. On failure no plaintext
    /// is released.
    pub fn unwrap(&self, key: &BitString, ad: &BitString, ciphertext: &BitString) -> Result<BitString> {
        if ciphertext.len() < self.tag_bits {
            return Err(Error::ShortInput);
        }
        let padded = self.wbc.decipher(key, ad, ciphertext)?;
        let split = padded.len() - self.tag_bits;
        let expansion = padded.substring(split, self.tag_bits);
        let all_zero = expansion.as_bytes().ct_eq(BitString::zeroes(self.tag_bits).as_bytes());
        if !bool::from(all_zero) {
            return Err(Error::TagMismatch);
        }
        Ok(padded.substring(0, split))
    }
}
