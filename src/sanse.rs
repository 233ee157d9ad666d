//! SANSE: a nonce-less session AEAD over a Farfalle-style function.
//!
//! Without a nonce, the tag must cover the plaintext itself: each wrap
//! first commits the message to the transcript, derives the tag from the
//! whole transcript, and then uses that tag as the diversifier for the
//! keystream. Repeating a transcript (and only that) repeats its
//! ciphertext.

use alloc::vec::Vec;

use zeroize::ZeroizeOnDrop;

use crate::bits::BitString;
use crate::farfalle::Prf;
use crate::{Error, Result};

/// One side of a SANSE session.
#[derive(Clone, ZeroizeOnDrop)]
pub struct Sanse<F: Prf> {
    #[zeroize(skip)]
    prf: F,
    #[zeroize(skip)]
    tag_bits: usize,
    key: BitString,
    history: Vec<BitString>,
    epoch: bool,
    #[zeroize(skip)]
    poisoned: bool,
}

impl<F: Prf> Sanse<F> {
    /// Opens a session under the given key. `tag_bits` must be a positive
    /// multiple of 8.
    pub fn start(prf: F, tag_bits: usize, key: &BitString) -> Result<Self> {
        if tag_bits == 0 || tag_bits % 8 != 0 {
            return Err(Error::InvalidConfig);
        }
        Ok(Sanse {
            prf,
            tag_bits,
            key: key.clone(),
            history: Vec::new(),
            epoch: false,
            poisoned: false,
        })
    }

    /// Encrypts `plaintext`, binding `ad`, and returns the ciphertext and
    /// tag.
    pub fn wrap(&mut self, ad: &BitString, plaintext: &BitString) -> Result<(BitString, BitString)> {
        self.check_live()?;
        self.advance(ad, plaintext);
        let tag = self.prf.apply(&self.key, &self.history, self.tag_bits, 0)?;
        let ciphertext = self.crypt(plaintext, &tag)?;
        Ok((ciphertext, tag))
    }

    /// Verifies and decrypts one wrapped message. On a tag mismatch no
    /// plaintext is released and the session is poisoned.
    pub fn unwrap(
        &mut self,
        ad: &BitString,
        ciphertext: &BitString,
        tag: &BitString,
    ) -> Result<BitString> {
        self.check_live()?;
        let plaintext = self.crypt(ciphertext, tag)?;
        self.advance(ad, &plaintext);
        let expected = self.prf.apply(&self.key, &self.history, self.tag_bits, 0)?;
        if !bool::from(expected.ct_eq(tag)) {
            self.poisoned = true;
            return Err(Error::TagMismatch);
        }
        Ok(plaintext)
    }

    /// XORs the data with the stream diversified by the tag.
    fn crypt(&self, data: &BitString, tag: &BitString) -> Result<BitString> {
        if data.is_empty() {
            return Ok(BitString::new());
        }
        let keystream =
            self.prf.apply(&self.key, core::slice::from_ref(tag), data.len(), 0)?;
        Ok(data.xor(&keystream))
    }

    /// Extends the transcript with the framed associated data and plaintext
    /// and flips the epoch bit.
    fn advance(&mut self, ad: &BitString, plaintext: &BitString) {
        let epoch = self.epoch;
        if !ad.is_empty() || plaintext.is_empty() {
            self.history.push(ad.clone().appended_bit(false).appended_bit(epoch));
        }
        if !plaintext.is_empty() {
            self.history.push(plaintext.clone().appended_bit(true).appended_bit(epoch));
        }
        self.epoch = !self.epoch;
    }

    fn check_live(&self) -> Result<()> {
        if self.poisoned {
            Err(Error::TagMismatch)
        } else {
            Ok(())
        }
    }
}
