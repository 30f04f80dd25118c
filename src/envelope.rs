//! Textbook RSA block encryption with the `joes-rsa` framing.
//!
//! The payload is fragmented into fixed-size blocks, each block is treated
//! as one big-endian integer and pushed through `m^e mod n` (or `c^d mod n`
//! on the way back), and the resulting blocks are framed with a small
//! versioned header:
//!
//! ```text
//! magic      [0..8]   "joes-rsa"
//! version    [8..10]  u16 big-endian, currently 0
//! padding    [10..12] u16 big-endian, trailing pad bytes in the plaintext
//! ciphertext [12..]   one (B + 1)-byte big-endian integer per block
//! ```
//!
//! This is not a standard format; it exists so that decryption can reject
//! foreign input quickly, and so the pad length survives the trip. The pad
//! byte is ASCII `'x'`, which plaintext may legitimately end with, so the
//! header field is the sole source of truth for stripping.

use byteorder::{BigEndian, ByteOrder};
use num_bigint::BigUint;

use crate::error::{Error, Result};

/// Leading identifier of every encrypted payload.
pub const MAGIC: &[u8; 8] = b"joes-rsa";

/// The only envelope version this crate reads or writes.
pub const VERSION: u16 = 0;

/// Armor label for text-mode output.
pub const ARMOR_LABEL: &str = "JOES RSA ENCRYPTED DATA";

const HEADER_LEN: usize = 12;
const PAD_BYTE: u8 = b'x';

/// Plaintext bytes carried per block: the modulus width in whole bytes.
#[must_use]
pub fn block_size(n: &BigUint) -> usize {
    (n.bits() / 8) as usize
}

/// Encrypt `plaintext` under `(n, e)` and frame it.
///
/// ```
/// use num_bigint::BigUint;
///
/// // The classic 61 * 53 textbook key; 'A' is 65 and 65^17 mod 3233 = 2790.
/// let sealed = joes_rsa::envelope::encrypt(
///     b"A",
///     &BigUint::from(3233_usize),
///     &BigUint::from(17_usize),
/// )
/// .unwrap();
///
/// assert_eq!(&sealed[..8], b"joes-rsa");
/// assert_eq!(&sealed[12..], [0x0a, 0xe6]);
/// ```
pub fn encrypt(plaintext: &[u8], n: &BigUint, e: &BigUint) -> Result<Vec<u8>> {
    let bytes_per_block = block_size(n);
    if bytes_per_block == 0 {
        return Err(Error::Crypto(
            "modulus is too small to hold a plaintext block".into(),
        ));
    }
    if bytes_per_block >= 0xffff {
        return Err(Error::Envelope(
            "block size does not fit the padding header field".into(),
        ));
    }

    let mut padded = plaintext.to_vec();
    let mut padding = 0_usize;
    while padded.is_empty() || padded.len() % bytes_per_block != 0 {
        padded.push(PAD_BYTE);
        padding += 1;
    }

    log::debug!(
        "encrypting {} bytes as {} blocks of {} (pad {})",
        plaintext.len(),
        padded.len() / bytes_per_block,
        bytes_per_block,
        padding,
    );

    let mut envelope = Vec::with_capacity(HEADER_LEN + (padded.len() / bytes_per_block) * (bytes_per_block + 1));
    envelope.extend_from_slice(MAGIC);
    let mut header = [0_u8; 4];
    BigEndian::write_u16(&mut header[0..2], VERSION);
    BigEndian::write_u16(&mut header[2..4], padding as u16);
    envelope.extend_from_slice(&header);

    for block in padded.chunks(bytes_per_block) {
        let m = BigUint::from_bytes_be(block);
        let c = m.modpow(e, n);
        // c < n always fits B + 1 bytes, leaving the top byte clear.
        envelope.extend_from_slice(&to_width_be(&c, bytes_per_block + 1)?);
    }

    Ok(envelope)
}

/// Undo [`encrypt`] given the private half `(n, d)`.
pub fn decrypt(envelope: &[u8], n: &BigUint, d: &BigUint) -> Result<Vec<u8>> {
    if envelope.len() < HEADER_LEN {
        return Err(Error::Envelope("payload shorter than the header".into()));
    }
    if &envelope[..8] != MAGIC {
        return Err(Error::Envelope("bad magic, not a joes-rsa payload".into()));
    }
    let version = BigEndian::read_u16(&envelope[8..10]);
    if version != VERSION {
        return Err(Error::Envelope(format!("unsupported version {}", version)));
    }
    let padding = BigEndian::read_u16(&envelope[10..12]) as usize;

    let bytes_per_block = block_size(n);
    if bytes_per_block == 0 {
        return Err(Error::Crypto(
            "modulus is too small to hold a plaintext block".into(),
        ));
    }

    let body = &envelope[HEADER_LEN..];
    if body.len() % (bytes_per_block + 1) != 0 {
        return Err(Error::Envelope(format!(
            "ciphertext length {} is not a multiple of {}",
            body.len(),
            bytes_per_block + 1,
        )));
    }

    let mut plaintext = Vec::with_capacity((body.len() / (bytes_per_block + 1)) * bytes_per_block);
    for block in body.chunks(bytes_per_block + 1) {
        let c = BigUint::from_bytes_be(block);
        let m = c.modpow(d, n);
        plaintext.extend_from_slice(&to_width_be(&m, bytes_per_block)?);
    }

    if padding > plaintext.len() {
        return Err(Error::Envelope(format!(
            "pad length {} exceeds the {} decrypted bytes",
            padding,
            plaintext.len(),
        )));
    }
    let stripped = plaintext.len() - padding;
    plaintext.truncate(stripped);

    Ok(plaintext)
}

// Big-endian bytes of `value`, left-padded with zeros to exactly `width`.
fn to_width_be(value: &BigUint, width: usize) -> Result<Vec<u8>> {
    let bytes = value.to_bytes_be();
    if bytes.len() > width {
        return Err(Error::Envelope(format!(
            "block value needs {} bytes, expected at most {}",
            bytes.len(),
            width,
        )));
    }

    let mut out = vec![0_u8; width - bytes.len()];
    out.extend_from_slice(&bytes);
    Ok(out)
}
