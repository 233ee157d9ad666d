//! The Cyclist duplex construction.

use core::cmp;
use core::marker::PhantomData;

use alloc::vec;
use alloc::vec::Vec;

use zeroize::ZeroizeOnDrop;

use crate::{Error, Permutation, Result};

const ZERO: u8 = 0x00;
const ABSORB_KEY: u8 = 0x02;
const ABSORB: u8 = 0x03;
const RATCHET: u8 = 0x10;
const SQUEEZE_KEY: u8 = 0x20;
const SQUEEZE: u8 = 0x40;
const CRYPT: u8 = 0x80;

/// Whether the last primitive call added input to the state or ran the
/// permutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Hash,
    Keyed,
}

/// The Cyclist mode of operation over a permutation.
///
/// A duplex starts in hash mode; absorbing a key at construction switches
/// it to keyed mode, which unlocks encryption, key squeezing, and
/// ratcheting. There is no way back to hash mode.
#[derive(Clone, Debug, ZeroizeOnDrop)]
pub struct Cyclist<P, const WIDTH: usize>
where
    P: Permutation<WIDTH>,
{
    state: [u8; WIDTH],
    #[zeroize(skip)]
    phase: Phase,
    #[zeroize(skip)]
    mode: Mode,
    #[zeroize(skip)]
    r_absorb: usize,
    #[zeroize(skip)]
    r_squeeze: usize,
    #[zeroize(skip)]
    r_kin: usize,
    #[zeroize(skip)]
    r_kout: usize,
    #[zeroize(skip)]
    l_ratchet: usize,
    #[zeroize(skip)]
    _permutation: PhantomData<P>,
}

impl<P, const WIDTH: usize> Cyclist<P, WIDTH>
where
    P: Permutation<WIDTH>,
{
    /// Returns a new Cyclist instance with the given rates. A non-empty key
    /// switches the duplex to keyed mode, absorbing `key ∥ id` and then the
    /// counter byte-by-byte.
    pub fn new(
        r_hash: usize,
        r_kin: usize,
        r_kout: usize,
        l_ratchet: usize,
        key: &[u8],
        id: &[u8],
        counter: &[u8],
    ) -> Result<Self> {
        if r_hash == 0
            || r_kin == 0
            || r_kout == 0
            || r_hash.max(r_kin).max(r_kout) + 2 > WIDTH
        {
            return Err(Error::InvalidConfig);
        }
        let mut cyclist = Self::unkeyed(r_hash, r_kin, r_kout, l_ratchet);
        if !key.is_empty() {
            cyclist.absorb_key(key, id, counter)?;
        }
        Ok(cyclist)
    }

    pub(crate) fn unkeyed(r_hash: usize, r_kin: usize, r_kout: usize, l_ratchet: usize) -> Self {
        debug_assert!(r_hash.max(r_kin).max(r_kout) + 2 <= WIDTH);

        Cyclist {
            state: P::new_state(),
            phase: Phase::Up,
            mode: Mode::Hash,
            r_absorb: r_hash,
            r_squeeze: r_hash,
            r_kin,
            r_kout,
            l_ratchet,
            _permutation: PhantomData,
        }
    }

    /// Absorb the given slice.
    pub fn absorb(&mut self, bin: &[u8]) {
        self.absorb_any(bin, self.r_absorb, ABSORB);
    }

    /// Encrypt the given mutable slice in place. Keyed mode only.
    pub fn encrypt_mut(&mut self, in_out: &mut [u8]) -> Result<()> {
        if self.mode != Mode::Keyed {
            return Err(Error::InvalidMode);
        }
        self.crypt(in_out, false);
        Ok(())
    }

    /// Return an encrypted copy of the given slice. Keyed mode only.
    pub fn encrypt(&mut self, bin: &[u8]) -> Result<Vec<u8>> {
        let mut out = bin.to_vec();
        self.encrypt_mut(&mut out)?;
        Ok(out)
    }

    /// Decrypt the given mutable slice in place. Keyed mode only.
    pub fn decrypt_mut(&mut self, in_out: &mut [u8]) -> Result<()> {
        if self.mode != Mode::Keyed {
            return Err(Error::InvalidMode);
        }
        self.crypt(in_out, true);
        Ok(())
    }

    /// Return a decrypted copy of the given slice. Keyed mode only.
    pub fn decrypt(&mut self, bin: &[u8]) -> Result<Vec<u8>> {
        let mut out = bin.to_vec();
        self.decrypt_mut(&mut out)?;
        Ok(out)
    }

    /// Fill the given mutable slice with squeezed data.
    pub fn squeeze_mut(&mut self, out: &mut [u8]) {
        self.squeeze_any(out, SQUEEZE);
    }

    /// Return `n` bytes of squeezed data.
    pub fn squeeze(&mut self, n: usize) -> Vec<u8> {
        let mut out = vec![0u8; n];
        self.squeeze_mut(&mut out);
        out
    }

    /// Fill the given mutable slice with squeezed key data. Keyed mode only.
    pub fn squeeze_key_mut(&mut self, out: &mut [u8]) -> Result<()> {
        if self.mode != Mode::Keyed {
            return Err(Error::InvalidMode);
        }
        self.squeeze_any(out, SQUEEZE_KEY);
        Ok(())
    }

    /// Return `n` bytes of squeezed key data. Keyed mode only.
    pub fn squeeze_key(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut out = vec![0u8; n];
        self.squeeze_key_mut(&mut out)?;
        Ok(out)
    }

    /// Ratchet the state, providing forward secrecy. Keyed mode only.
    pub fn ratchet(&mut self) -> Result<()> {
        if self.mode != Mode::Keyed {
            return Err(Error::InvalidMode);
        }
        let mut rolled = vec![0u8; self.l_ratchet];
        self.squeeze_any(&mut rolled, RATCHET);
        self.absorb_any(&rolled, self.r_absorb, ZERO);
        Ok(())
    }

    /// Adds the given byte to the state at the given offset.
    #[inline(always)]
    fn add_byte(&mut self, byte: u8, offset: usize) {
        self.state[offset] ^= byte;
    }

    /// Adds the given bytes to the beginning of the state.
    #[inline(always)]
    fn add_bytes(&mut self, bytes: &[u8]) {
        for (st_byte, byte) in self.state.iter_mut().zip(bytes) {
            *st_byte ^= byte;
        }
    }

    /// Fills the given mutable slice with bytes from the state.
    #[inline(always)]
    fn extract_bytes(&mut self, out: &mut [u8]) {
        out.copy_from_slice(&self.state[..out.len()]);
    }

    /// Initiate the UP mode with an output block and a domain separator.
    #[inline(always)]
    fn up(&mut self, out: Option<&mut [u8]>, cu: u8) {
        debug_assert!(out.as_ref().map(|x| x.len()).unwrap_or(0) <= self.r_squeeze);
        self.phase = Phase::Up;
        if self.mode == Mode::Keyed {
            self.add_byte(cu, WIDTH - 1);
        }
        P::permute(&mut self.state);
        if let Some(out) = out {
            self.extract_bytes(out);
        }
    }

    /// Initiate the DOWN mode with an input block and a domain separator.
    /// In hash mode only the low bit of the separator reaches the state.
    #[inline(always)]
    fn down(&mut self, bin: Option<&[u8]>, cd: u8) {
        debug_assert!(bin.map(|x| x.len()).unwrap_or(0) + 2 <= WIDTH);
        self.phase = Phase::Down;
        if let Some(bin) = bin {
            self.add_bytes(bin);
            self.add_byte(0x01, bin.len());
        } else {
            self.add_byte(0x01, 0);
        }
        let cd = if self.mode == Mode::Hash { cd & 0x01 } else { cd };
        self.add_byte(cd, WIDTH - 1);
    }

    /// Absorb a slice at the given rate with the given DOWN separator. An
    /// empty slice still absorbs one empty block.
    #[inline]
    fn absorb_any(&mut self, bin: &[u8], rate: usize, cd: u8) {
        let mut chunks_it = bin.chunks(rate);
        if self.phase != Phase::Up {
            self.up(None, ZERO);
        }
        self.down(chunks_it.next(), cd);
        for chunk in chunks_it {
            self.up(None, ZERO);
            self.down(Some(chunk), ZERO);
        }
    }

    /// Switch to keyed mode and absorb `key ∥ id ∥ len(id)`, then the
    /// counter at a rate of one byte.
    fn absorb_key(&mut self, key: &[u8], id: &[u8], counter: &[u8]) -> Result<()> {
        if key.len() + id.len() > self.r_kin - 1 {
            return Err(Error::KeyTooLong);
        }

        self.mode = Mode::Keyed;
        self.r_absorb = self.r_kin;
        self.r_squeeze = self.r_kout;

        let mut iv = [0u8; WIDTH];
        let mut iv_len = 0;
        iv[..key.len()].copy_from_slice(key);
        iv_len += key.len();
        iv[iv_len..iv_len + id.len()].copy_from_slice(id);
        iv_len += id.len();
        iv[iv_len] = id.len() as u8;
        iv_len += 1;

        self.absorb_any(&iv[..iv_len], self.r_absorb, ABSORB_KEY);

        if !counter.is_empty() {
            self.absorb_any(counter, 1, ZERO);
        }
        Ok(())
    }

    /// Encrypt or decrypt in place. An empty slice still advances the
    /// duplex by one block.
    fn crypt(&mut self, in_out: &mut [u8], decrypt: bool) {
        let rate = self.r_kout;
        let blocks = cmp::max(1, in_out.len().div_ceil(rate));
        let mut tmp = [0u8; WIDTH];
        let mut cu = CRYPT;
        for i in 0..blocks {
            let start = i * rate;
            let end = cmp::min(start + rate, in_out.len());
            self.up(Some(&mut tmp[..end - start]), cu);
            cu = ZERO;
            let chunk = &mut in_out[start..end];
            if decrypt {
                for (in_out_byte, tmp_byte) in chunk.iter_mut().zip(&tmp) {
                    *in_out_byte ^= *tmp_byte;
                }
                self.down(Some(chunk), ZERO);
            } else {
                self.down(Some(chunk), ZERO);
                for (in_out_byte, tmp_byte) in chunk.iter_mut().zip(&tmp) {
                    *in_out_byte ^= *tmp_byte;
                }
            }
        }
    }

    /// Squeeze a slice with the given UP separator. A zero-length squeeze
    /// still runs the permutation once.
    #[inline]
    fn squeeze_any(&mut self, out: &mut [u8], cu: u8) {
        let mut chunks_it = out.chunks_mut(self.r_squeeze);
        self.up(chunks_it.next(), cu);
        for chunk in chunks_it {
            self.down(None, ZERO);
            self.up(Some(chunk), ZERO);
        }
    }
}
