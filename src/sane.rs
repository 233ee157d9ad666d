//! SANE: an ordered session AEAD over a Farfalle-style function.
//!
//! Both ends derive a startup tag from the key and nonce, then exchange
//! wrapped messages whose tags authenticate the entire session transcript.
//! The output stream of each transcript state serves double duty: its first
//! `t` bits are the tag released for that state, and the bits after them
//! become the keystream of the next message.

use alloc::vec;
use alloc::vec::Vec;

use zeroize::ZeroizeOnDrop;

use crate::bits::BitString;
use crate::farfalle::Prf;
use crate::{Error, Result};

/// One side of a SANE session.
///
/// A session is sequential: the two sides must wrap and unwrap the same
/// messages in the same order. After a tag mismatch the session refuses
/// all further use.
#[derive(Clone, ZeroizeOnDrop)]
pub struct Sane<F: Prf> {
    #[zeroize(skip)]
    prf: F,
    #[zeroize(skip)]
    tag_bits: usize,
    #[zeroize(skip)]
    align_bits: usize,
    key: BitString,
    history: Vec<BitString>,
    #[zeroize(skip)]
    offset: usize,
    epoch: bool,
    #[zeroize(skip)]
    poisoned: bool,
}

impl<F: Prf> Sane<F> {
    /// Opens the sending side of a session, returning it along with the
    /// startup tag to transmit.
    ///
    /// `tag_bits` must be a positive multiple of `align_bits` and of 8.
    pub fn start_sender(
        prf: F,
        tag_bits: usize,
        align_bits: usize,
        key: &BitString,
        nonce: &BitString,
    ) -> Result<(Self, BitString)> {
        if tag_bits == 0
            || align_bits == 0
            || tag_bits % align_bits != 0
            || tag_bits % 8 != 0
        {
            return Err(Error::InvalidConfig);
        }
        let session = Sane {
            prf,
            tag_bits,
            align_bits,
            key: key.clone(),
            history: vec![nonce.clone().appended_bit(true)],
            offset: tag_bits,
            epoch: false,
            poisoned: false,
        };
        let tag = session.prf.apply(&session.key, &session.history, tag_bits, 0)?;
        Ok((session, tag))
    }

    /// Opens the receiving side of a session, verifying the sender's
    /// startup tag.
    pub fn start_receiver(
        prf: F,
        tag_bits: usize,
        align_bits: usize,
        key: &BitString,
        nonce: &BitString,
        tag: &BitString,
    ) -> Result<Self> {
        let (session, expected) = Self::start_sender(prf, tag_bits, align_bits, key, nonce)?;
        if !bool::from(expected.ct_eq(tag)) {
            return Err(Error::TagMismatch);
        }
        Ok(session)
    }

    /// Encrypts `plaintext` under the session, binding `ad`, and returns
    /// the ciphertext and tag.
    pub fn wrap(&mut self, ad: &BitString, plaintext: &BitString) -> Result<(BitString, BitString)> {
        self.check_live()?;
        let ciphertext = self.crypt(plaintext)?;
        self.advance(ad, &ciphertext);
        let tag = self.prf.apply(&self.key, &self.history, self.tag_bits, 0)?;
        self.offset = self.tag_bits;
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
        let plaintext = self.crypt(ciphertext)?;
        self.advance(ad, ciphertext);
        let expected = self.prf.apply(&self.key, &self.history, self.tag_bits, 0)?;
        self.offset = self.tag_bits;
        if !bool::from(expected.ct_eq(tag)) {
            self.poisoned = true;
            return Err(Error::TagMismatch);
        }
        Ok(plaintext)
    }

    /// XORs the data with the current transcript's stream, past the bits
    /// already spent on the previous tag.
    fn crypt(&self, data: &BitString) -> Result<BitString> {
        if data.is_empty() {
            return Ok(BitString::new());
        }
        let keystream = self.prf.apply(&self.key, &self.history, data.len(), self.offset)?;
        Ok(data.xor(&keystream))
    }

    /// Extends the transcript with the framed associated data and
    /// ciphertext and flips the epoch bit.
    fn advance(&mut self, ad: &BitString, ciphertext: &BitString) {
        let epoch = self.epoch;
        if !ad.is_empty() || ciphertext.is_empty() {
            self.history.push(ad.clone().appended_bit(false).appended_bit(epoch));
        }
        if !ciphertext.is_empty() {
            self.history.push(ciphertext.clone().appended_bit(true).appended_bit(epoch));
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
