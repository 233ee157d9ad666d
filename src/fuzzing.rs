#![cfg(all(test, feature = "std"))]

use std::iter;

use proptest::collection::vec;
use proptest::prelude::*;

use crate::bits::BitString;
use crate::xoodyak::Xoodyak;
use crate::xoofff::{XoofffSane, XoofffSanse, XoofffWbc, XoofffWbcAe};

/// An input operation for Xoodyak's hash mode.
#[derive(Clone, Debug, PartialEq)]
enum HashOp {
    Absorb(Vec<u8>),
    Squeeze(usize),
}

/// An output from Xoodyak's hash mode.
#[derive(Clone, Debug, PartialEq)]
enum HashOutput {
    Squeezed(Vec<u8>),
}

/// A transcript of input operations for Xoodyak's hash mode.
#[derive(Clone, Debug, PartialEq)]
struct HashTranscript {
    ops: Vec<HashOp>,
}

/// An input operation for Xoodyak's keyed mode.
#[derive(Clone, Debug, PartialEq)]
enum KeyedOp {
    Absorb(Vec<u8>),
    Squeeze(usize),
    SqueezeKey(usize),
    Encrypt(Vec<u8>),
    Decrypt(Vec<u8>),
    Ratchet,
}

/// An output from Xoodyak's keyed mode.
#[derive(Clone, Debug, PartialEq)]
enum KeyedOutput {
    Squeezed(Vec<u8>),
    Encrypted(Vec<u8>),
    Decrypted(Vec<u8>),
}

/// A transcript of input operations for Xoodyak's keyed mode, plus shared
/// key, id, and counter.
#[derive(Clone, Debug, PartialEq)]
struct KeyedTranscript {
    key: Vec<u8>,
    id: Vec<u8>,
    counter: Vec<u8>,
    ops: Vec<KeyedOp>,
}

/// Apply the transcript's operations to Xoodyak in hash mode, plus a final
/// `Squeeze(16)` to establish the duplex's final state, and return the
/// duplex's outputs.
fn apply_hash_transcript(transcript: &HashTranscript) -> Vec<HashOutput> {
    let mut hash = Xoodyak::hash();
    transcript
        .ops
        .iter()
        .chain(iter::once(&HashOp::Squeeze(16)))
        .flat_map(|op| match op {
            HashOp::Absorb(data) => {
                hash.absorb(data);
                None
            }
            HashOp::Squeeze(n) => Some(HashOutput::Squeezed(hash.squeeze(*n))),
        })
        .collect()
}

/// Apply the transcript's operations to Xoodyak in keyed mode, plus a final
/// `Squeeze(16)` to establish the duplex's final state, and return the
/// duplex's outputs.
fn apply_keyed_transcript(transcript: &KeyedTranscript) -> Vec<KeyedOutput> {
    let mut keyed =
        Xoodyak::new(&transcript.key, &transcript.id, &transcript.counter).expect("keyed duplex");
    transcript
        .ops
        .iter()
        .chain(iter::once(&KeyedOp::Squeeze(16)))
        .flat_map(|op| match op {
            KeyedOp::Absorb(data) => {
                keyed.absorb(data);
                None
            }
            KeyedOp::Squeeze(n) => Some(KeyedOutput::Squeezed(keyed.squeeze(*n))),
            KeyedOp::SqueezeKey(n) => {
                Some(KeyedOutput::Squeezed(keyed.squeeze_key(*n).expect("keyed mode")))
            }
            KeyedOp::Encrypt(data) => {
                Some(KeyedOutput::Encrypted(keyed.encrypt(data).expect("keyed mode")))
            }
            KeyedOp::Decrypt(data) => {
                Some(KeyedOutput::Decrypted(keyed.decrypt(data).expect("keyed mode")))
            }
            KeyedOp::Ratchet => {
                keyed.ratchet().expect("keyed mode");
                None
            }
        })
        .collect()
}

/// Apply the transcript's operations to two duplexes--`outbound` and
/// `inbound`--checking that both duplexes can correctly encrypt and decrypt
/// each other's outputs and remain synchronized.
fn check_keyed_transcript_symmetry(transcript: &KeyedTranscript) {
    let mut outbound =
        Xoodyak::new(&transcript.key, &transcript.id, &transcript.counter).expect("keyed duplex");
    let mut inbound =
        Xoodyak::new(&transcript.key, &transcript.id, &transcript.counter).expect("keyed duplex");

    for op in &transcript.ops {
        match op {
            KeyedOp::Absorb(data) => {
                outbound.absorb(data);
                inbound.absorb(data);
            }
            KeyedOp::Squeeze(n) => {
                assert_eq!(outbound.squeeze(*n), inbound.squeeze(*n));
            }
            KeyedOp::SqueezeKey(n) => {
                assert_eq!(
                    outbound.squeeze_key(*n).expect("keyed mode"),
                    inbound.squeeze_key(*n).expect("keyed mode")
                );
            }
            KeyedOp::Encrypt(plaintext) => {
                let ciphertext = outbound.encrypt(plaintext).expect("keyed mode");
                assert_eq!(plaintext, &inbound.decrypt(&ciphertext).expect("keyed mode"));
            }
            KeyedOp::Decrypt(ciphertext) => {
                let plaintext = outbound.decrypt(ciphertext).expect("keyed mode");
                assert_eq!(ciphertext, &inbound.encrypt(&plaintext).expect("keyed mode"));
            }
            KeyedOp::Ratchet => {
                outbound.ratchet().expect("keyed mode");
                inbound.ratchet().expect("keyed mode");
            }
        }
    }

    assert_eq!(outbound.squeeze(16), inbound.squeeze(16));
}

fn arb_data() -> impl Strategy<Value = Vec<u8>> {
    vec(any::<u8>(), 0..200)
}

fn arb_key() -> impl Strategy<Value = Vec<u8>> {
    vec(any::<u8>(), 1..16)
}

fn arb_id() -> impl Strategy<Value = Vec<u8>> {
    vec(any::<u8>(), 0..16)
}

fn arb_counter() -> impl Strategy<Value = Vec<u8>> {
    vec(any::<u8>(), 0..16)
}

fn arb_bits() -> impl Strategy<Value = BitString> {
    (vec(any::<u8>(), 0..64), 0usize..=8)
        .prop_map(|(bytes, spare)| BitString::from_bits(&bytes, (8 * bytes.len()).saturating_sub(spare)))
}

fn arb_hash_op() -> impl Strategy<Value = HashOp> {
    prop_oneof![arb_data().prop_map(HashOp::Absorb), (1usize..256).prop_map(HashOp::Squeeze)]
}

fn arb_keyed_op() -> impl Strategy<Value = KeyedOp> {
    prop_oneof![
        arb_data().prop_map(KeyedOp::Absorb),
        (1usize..256).prop_map(KeyedOp::Squeeze),
        (1usize..256).prop_map(KeyedOp::SqueezeKey),
        arb_data().prop_map(KeyedOp::Encrypt),
        arb_data().prop_map(KeyedOp::Decrypt),
        Just(KeyedOp::Ratchet),
    ]
}

prop_compose! {
    fn arb_hash_transcript()(ops in vec(arb_hash_op(), 0..62)) -> HashTranscript {
        HashTranscript { ops }
    }
}

prop_compose! {
    fn arb_keyed_transcript()(key in arb_key(), id in arb_id(), counter in arb_counter(), ops in vec(arb_keyed_op(), 0..62)) -> KeyedTranscript {
        KeyedTranscript { key, id, counter, ops }
    }
}

proptest! {
    #[test]
    fn hash_transcript_consistency(t0 in arb_hash_transcript(), t1 in arb_hash_transcript()) {
        let out0 = apply_hash_transcript(&t0);
        let out1 = apply_hash_transcript(&t1);

        if t0 == t1 {
            assert_eq!(out0, out1);
        } else  {
            assert_ne!(out0, out1);
        }
    }

    #[test]
    fn keyed_transcript_consistency(t0 in arb_keyed_transcript(), t1 in arb_keyed_transcript()) {
        let out0 = apply_keyed_transcript(&t0);
        let out1 = apply_keyed_transcript(&t1);

        if t0 == t1 {
            assert_eq!(out0, out1);
        } else  {
            assert_ne!(out0, out1);
        }
    }

    #[test]
    fn keyed_transcript_symmetry(t in arb_keyed_transcript()) {
        check_keyed_transcript_symmetry(&t);
    }

    #[test]
    fn sane_sessions_stay_synchronized(
        key in arb_bits(),
        nonce in arb_bits(),
        messages in vec((arb_bits(), arb_bits()), 1..6),
    ) {
        prop_assume!(key.len() + 9 <= 384);
        let (mut sender, tag) = XoofffSane::sender(&key, &nonce).expect("sender");
        let mut receiver = XoofffSane::receiver(&key, &nonce, &tag).expect("receiver");
        for (ad, plaintext) in &messages {
            let (ciphertext, tag) = sender.wrap(ad, plaintext).expect("wrap");
            prop_assert_eq!(ciphertext.len(), plaintext.len());
            let opened = receiver.unwrap(ad, &ciphertext, &tag).expect("unwrap");
            prop_assert_eq!(&opened, plaintext);
        }
    }

    #[test]
    fn sanse_sessions_stay_synchronized(
        key in arb_bits(),
        messages in vec((arb_bits(), arb_bits()), 1..6),
    ) {
        prop_assume!(key.len() + 9 <= 384);
        let mut sender = XoofffSanse::new(&key).expect("sender");
        let mut receiver = XoofffSanse::new(&key).expect("receiver");
        for (ad, plaintext) in &messages {
            let (ciphertext, tag) = sender.wrap(ad, plaintext).expect("wrap");
            let opened = receiver.unwrap(ad, &ciphertext, &tag).expect("unwrap");
            prop_assert_eq!(&opened, plaintext);
        }
    }

    #[test]
    fn wbc_round_trips(key in arb_bits(), tweak in arb_bits(), plaintext in arb_bits()) {
        prop_assume!(key.len() + 9 <= 384);
        let wbc = XoofffWbc::new();
        let ciphertext = wbc.encipher(&key, &tweak, &plaintext).expect("encipher");
        prop_assert_eq!(ciphertext.len(), plaintext.len());
        let opened = wbc.decipher(&key, &tweak, &ciphertext).expect("decipher");
        prop_assert_eq!(opened, plaintext);
    }

    #[test]
    fn wbc_ae_detects_any_flipped_bit(
        key in arb_bits(),
        ad in arb_bits(),
        plaintext in arb_bits(),
        flip in any::<prop::sample::Index>(),
    ) {
        prop_assume!(key.len() + 9 <= 384);
        let ae = XoofffWbcAe::new();
        let wrapped = ae.wrap(&key, &ad, &plaintext).expect("wrap");
        prop_assert_eq!(
            ae.unwrap(&key, &ad, &wrapped).expect("unwrap"),
            plaintext
        );

        let bit = flip.index(wrapped.len());
        let mut bent = wrapped.as_bytes().to_vec();
        bent[bit / 8] ^= 1 << (bit % 8);
        let bent = BitString::from_bits(&bent, wrapped.len());
        prop_assert!(ae.unwrap(&key, &ad, &bent).is_err());
    }
}
