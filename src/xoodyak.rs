//! Xoodyak: Cyclist instantiated over 12-round Xoodoo.

use alloc::vec::Vec;

use subtle::ConstantTimeEq;

use crate::cyclist::Cyclist;
use crate::xoodoo::{Xoodoo12, WIDTH};
use crate::{Error, Result};

/// Absorb rate in hash mode, in bytes.
pub const HASH_RATE: usize = (384 - 256) / 8;

/// Absorb rate in keyed mode, in bytes.
pub const KEYIN_RATE: usize = (384 - 32) / 8;

/// Squeeze rate in keyed mode, in bytes.
pub const KEYOUT_RATE: usize = (384 - 192) / 8;

/// Ratchet length, in bytes.
pub const RATCHET_LEN: usize = 16;

/// Authentication tag length for [`Xoodyak::seal`]/[`Xoodyak::open`], in
/// bytes.
pub const TAG_LEN: usize = 16;

/// A Xoodyak duplex. Constructed with an empty key it is a hash; with a
/// key it is a keyed duplex supporting encryption and ratcheting.
#[derive(Clone, Debug)]
pub struct Xoodyak {
    duplex: Cyclist<Xoodoo12, WIDTH>,
}

impl Xoodyak {
    /// Returns a Xoodyak instance for the given key, key id, and counter.
    /// An empty key yields a hash-mode instance.
    pub fn new(key: &[u8], id: &[u8], counter: &[u8]) -> Result<Xoodyak> {
        Ok(Xoodyak {
            duplex: Cyclist::new(HASH_RATE, KEYIN_RATE, KEYOUT_RATE, RATCHET_LEN, key, id, counter)?,
        })
    }

    /// Returns a hash-mode Xoodyak instance.
    pub fn hash() -> Xoodyak {
        Xoodyak { duplex: Cyclist::unkeyed(HASH_RATE, KEYIN_RATE, KEYOUT_RATE, RATCHET_LEN) }
    }

    /// Absorb the given slice.
    pub fn absorb(&mut self, bin: &[u8]) {
        self.duplex.absorb(bin);
    }

    /// Encrypt the given mutable slice in place. Keyed mode only.
    pub fn encrypt_mut(&mut self, in_out: &mut [u8]) -> Result<()> {
        self.duplex.encrypt_mut(in_out)
    }

    /// Return an encrypted copy of the given slice. Keyed mode only.
    pub fn encrypt(&mut self, bin: &[u8]) -> Result<Vec<u8>> {
        self.duplex.encrypt(bin)
    }

    /// Decrypt the given mutable slice in place. Keyed mode only.
    pub fn decrypt_mut(&mut self, in_out: &mut [u8]) -> Result<()> {
        self.duplex.decrypt_mut(in_out)
    }

    /// Return a decrypted copy of the given slice. Keyed mode only.
    pub fn decrypt(&mut self, bin: &[u8]) -> Result<Vec<u8>> {
        self.duplex.decrypt(bin)
    }

    /// Fill the given mutable slice with squeezed data.
    pub fn squeeze_mut(&mut self, out: &mut [u8]) {
        self.duplex.squeeze_mut(out);
    }

    /// Return `n` bytes of squeezed data.
    pub fn squeeze(&mut self, n: usize) -> Vec<u8> {
        self.duplex.squeeze(n)
    }

    /// Fill the given mutable slice with squeezed key data. Keyed mode only.
    pub fn squeeze_key_mut(&mut self, out: &mut [u8]) -> Result<()> {
        self.duplex.squeeze_key_mut(out)
    }

    /// Return `n` bytes of squeezed key data. Keyed mode only.
    pub fn squeeze_key(&mut self, n: usize) -> Result<Vec<u8>> {
        self.duplex.squeeze_key(n)
    }

    /// Ratchet the state, providing forward secrecy. Keyed mode only.
    pub fn ratchet(&mut self) -> Result<()> {
        self.duplex.ratchet()
    }

    /// Seal the given mutable slice in place. The last [`TAG_LEN`] bytes of
    /// the slice are overwritten with the authentication tag.
    pub fn seal_mut(&mut self, in_out: &mut [u8]) -> Result<()> {
        if in_out.len() < TAG_LEN {
            return Err(Error::ShortInput);
        }
        let (c, t) = in_out.split_at_mut(in_out.len() - TAG_LEN);
        self.duplex.encrypt_mut(c)?;
        self.duplex.squeeze_mut(t);
        Ok(())
    }

    /// Returns a sealed copy of the given slice, [`TAG_LEN`] bytes longer
    /// than the input.
    pub fn seal(&mut self, bin: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(bin.len() + TAG_LEN);
        out.extend_from_slice(bin);
        out.resize(bin.len() + TAG_LEN, 0);
        self.seal_mut(&mut out)?;
        Ok(out)
    }

    /// Returns an opened copy of the given slice, or an error if the
    /// ciphertext cannot be authenticated.
    pub fn open(&mut self, bin: &[u8]) -> Result<Vec<u8>> {
        if bin.len() < TAG_LEN {
            return Err(Error::ShortInput);
        }
        let (c, t) = bin.split_at(bin.len() - TAG_LEN);
        let p = self.duplex.decrypt(c)?;
        let mut t_p = [0u8; TAG_LEN];
        self.duplex.squeeze_mut(&mut t_p);
        if !bool::from(t.ct_eq(&t_p)) {
            return Err(Error::TagMismatch);
        }
        Ok(p)
    }
}
