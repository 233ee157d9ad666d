//! Xoofff: Farfalle instantiated over 6-round Xoodoo, and its modes.

use crate::bits::BitString;
use crate::farfalle::{Farfalle, Identity};
use crate::roll::{CompressionRoll, ExpansionRoll};
use crate::sane::Sane;
use crate::sanse::Sanse;
use crate::wbc::{Wbc, WbcAe};
use crate::xoodoo::Xoodoo;
use crate::Result;

/// Round count of the reduced Xoodoo used throughout Xoofff.
pub const ROUNDS: u32 = 6;

/// SANE tag length, in bits.
pub const SANE_TAG_BITS: usize = 128;

/// SANE alignment unit, in bits.
pub const SANE_ALIGN_BITS: usize = 8;

/// SANSE tag length, in bits.
pub const SANSE_TAG_BITS: usize = 256;

/// WBC alignment unit, in bits.
pub const WBC_ALIGN_BITS: usize = 8;

/// WBC-AE expansion length, in bits.
pub const WBC_AE_TAG_BITS: usize = 128;

/// The Xoofff deck function.
pub type Xoofff = Farfalle<Xoodoo, Xoodoo, Xoodoo, Xoodoo, CompressionRoll, ExpansionRoll>;

/// Xoofff with the layer between compression and expansion removed, used
/// for the short rounds of the wide-block cipher.
pub type ShortXoofff = Farfalle<Xoodoo, Xoodoo, Identity, Xoodoo, CompressionRoll, ExpansionRoll>;

impl Xoofff {
    /// Returns the standard Xoofff instance.
    pub fn new() -> Xoofff {
        let p = Xoodoo::with_rounds(ROUNDS);
        Farfalle::with_parts(p, p, p, p, CompressionRoll, ExpansionRoll)
    }
}

impl Default for Xoofff {
    fn default() -> Self {
        Xoofff::new()
    }
}

impl ShortXoofff {
    /// Returns the short Xoofff instance.
    pub fn new() -> ShortXoofff {
        let p = Xoodoo::with_rounds(ROUNDS);
        Farfalle::with_parts(p, p, Identity, p, CompressionRoll, ExpansionRoll)
    }
}

impl Default for ShortXoofff {
    fn default() -> Self {
        ShortXoofff::new()
    }
}

/// A Xoofff-SANE session.
pub type XoofffSane = Sane<Xoofff>;

impl XoofffSane {
    /// Opens the sending side of a session, returning it along with the
    /// startup tag to transmit.
    pub fn sender(key: &BitString, nonce: &BitString) -> Result<(XoofffSane, BitString)> {
        Sane::start_sender(Xoofff::new(), SANE_TAG_BITS, SANE_ALIGN_BITS, key, nonce)
    }

    /// Opens the receiving side of a session, verifying the sender's
    /// startup tag.
    pub fn receiver(key: &BitString, nonce: &BitString, tag: &BitString) -> Result<XoofffSane> {
        Sane::start_receiver(Xoofff::new(), SANE_TAG_BITS, SANE_ALIGN_BITS, key, nonce, tag)
    }
}

/// A Xoofff-SANSE session.
pub type XoofffSanse = Sanse<Xoofff>;

impl XoofffSanse {
    /// Opens a session under the given key.
    pub fn new(key: &BitString) -> Result<XoofffSanse> {
        Sanse::start(Xoofff::new(), SANSE_TAG_BITS, key)
    }
}

/// The Xoofff wide-block cipher.
pub type XoofffWbc = Wbc<ShortXoofff, Xoofff>;

impl XoofffWbc {
    /// Returns the standard instance.
    pub fn new() -> XoofffWbc {
        Wbc::with_parts(ShortXoofff::new(), Xoofff::new(), WBC_ALIGN_BITS)
    }
}

impl Default for XoofffWbc {
    fn default() -> Self {
        XoofffWbc::new()
    }
}

/// The Xoofff authenticated wide-block cipher.
pub type XoofffWbcAe = WbcAe<ShortXoofff, Xoofff>;

impl XoofffWbcAe {
    /// Returns the standard instance.
    pub fn new() -> XoofffWbcAe {
        WbcAe::with_parts(ShortXoofff::new(), Xoofff::new(), WBC_AE_TAG_BITS, WBC_ALIGN_BITS)
    }
}

impl Default for XoofffWbcAe {
    fn default() -> Self {
        XoofffWbcAe::new()
    }
}
