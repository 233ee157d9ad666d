//! The Farfalle construction: a parallelizable keyed function built from a
//! permutation and two rolling functions.
//!
//! A secret mask is derived from the key and rolled once per input block to
//! whiten the compression layer, with one further roll between successive
//! messages; a final roll forks it into the mask whitening the expansion
//! output. The construction is stateless; sessions are built on top of it
//! in [`crate::sane`] and [`crate::sanse`].

use byteorder::{ByteOrder, LittleEndian};

use crate::bits::BitString;
use crate::roll::RollingFunction;
use crate::xoodoo::{Xoodoo, LANES, WIDTH, WIDTH_BITS};
use crate::{Error, Result};

/// A width-preserving transformation of the 12-lane state.
pub trait Transform: Clone {
    /// Transform the state in place.
    fn apply(&self, lanes: &mut [u32; LANES]);
}

impl Transform for Xoodoo {
    #[inline(always)]
    fn apply(&self, lanes: &mut [u32; LANES]) {
        self.permute_lanes(lanes);
    }
}

/// The identity transformation, standing in for the layer between
/// compression and expansion in the "short" variant.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl Transform for Identity {
    #[inline(always)]
    fn apply(&self, _lanes: &mut [u32; LANES]) {}
}

/// A keyed function from sequences of bit strings to a bit stream.
pub trait Prf: Clone {
    /// Width of the underlying state in bits.
    fn width_bits(&self) -> usize;

    /// Evaluate the function over `messages`, returning bits `q` to `q + n`
    /// of its output stream.
    fn apply(
        &self,
        key: &BitString,
        messages: &[BitString],
        n_bits: usize,
        q_bits: usize,
    ) -> Result<BitString>;
}

/// The Farfalle construction over four transformations (`p_b` derives the
/// mask, `p_c` compresses, `p_d` separates the layers, `p_e` expands) and
/// two rolling functions.
#[derive(Clone, Debug)]
pub struct Farfalle<B, C, D, E, Rc, Re> {
    p_b: B,
    p_c: C,
    p_d: D,
    p_e: E,
    roll_c: Rc,
    roll_e: Re,
}

impl<B, C, D, E, Rc, Re> Farfalle<B, C, D, E, Rc, Re>
where
    B: Transform,
    C: Transform,
    D: Transform,
    E: Transform,
    Rc: RollingFunction,
    Re: RollingFunction,
{
    /// Assembles a Farfalle instance from its parts.
    pub fn with_parts(p_b: B, p_c: C, p_d: D, p_e: E, roll_c: Rc, roll_e: Re) -> Self {
        Farfalle { p_b, p_c, p_d, p_e, roll_c, roll_e }
    }

    /// Derives the secret input mask from the key.
    fn derive_mask(&self, key: &BitString) -> Result<[u32; LANES]> {
        let packed = key.keypack(WIDTH_BITS)?;
        let mut mask = lanes_of(&packed);
        self.p_b.apply(&mut mask);
        Ok(mask)
    }
}

impl<B, C, D, E, Rc, Re> Prf for Farfalle<B, C, D, E, Rc, Re>
where
    B: Transform,
    C: Transform,
    D: Transform,
    E: Transform,
    Rc: RollingFunction,
    Re: RollingFunction,
{
    fn width_bits(&self) -> usize {
        WIDTH_BITS
    }

    fn apply(
        &self,
        key: &BitString,
        messages: &[BitString],
        n_bits: usize,
        q_bits: usize,
    ) -> Result<BitString> {
        if messages.is_empty() {
            return Err(Error::InvalidConfig);
        }

        let mut mask = self.derive_mask(key)?;
        let mut acc = [0u32; LANES];
        for (index, message) in messages.iter().enumerate() {
            // One further roll separates successive messages.
            if index > 0 {
                self.roll_c.step(&mut mask);
            }
            for block in message.pad10(WIDTH_BITS).blocks(WIDTH_BITS) {
                let mut x = lanes_of(&block);
                for (lane, m) in x.iter_mut().zip(&mask) {
                    *lane ^= m;
                }
                self.p_c.apply(&mut x);
                for (a, lane) in acc.iter_mut().zip(&x) {
                    *a ^= lane;
                }
                self.roll_c.step(&mut mask);
            }
        }
        // One extra roll forks the compression mask into the output mask.
        self.roll_c.step(&mut mask);
        self.p_d.apply(&mut acc);

        let mut stream = acc;
        for _ in 0..q_bits / WIDTH_BITS {
            self.roll_e.step(&mut stream);
        }
        let skip = q_bits % WIDTH_BITS;

        let mut out = BitString::new();
        while out.len() < skip + n_bits {
            let mut z = stream;
            self.p_e.apply(&mut z);
            for (lane, m) in z.iter_mut().zip(&mask) {
                *lane ^= m;
            }
            out.extend(&BitString::from_bytes(&bytes_of(&z)));
            self.roll_e.step(&mut stream);
        }
        Ok(out.substring(skip, n_bits))
    }
}

fn lanes_of(block: &BitString) -> [u32; LANES] {
    debug_assert_eq!(block.len(), WIDTH_BITS);
    let mut lanes = [0u32; LANES];
    LittleEndian::read_u32_into(block.as_bytes(), &mut lanes);
    lanes
}

fn bytes_of(lanes: &[u32; LANES]) -> [u8; WIDTH] {
    let mut bytes = [0u8; WIDTH];
    LittleEndian::write_u32_into(lanes, &mut bytes);
    bytes
}
