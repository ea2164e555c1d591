//! The Keccak-p\[1600\] state shared by the sponge and tree layers.

use byteorder::{ByteOrder, LittleEndian};
use zeroize::Zeroize;

use crate::keccak1600;

/// Width of the Keccak-p\[1600\] state, in bytes.
pub const WIDTH: usize = 200;

/// KangarooTwelve's sponge rate: 1344 bits / 168 bytes.
pub const RATE: usize = 168;

/// KangarooTwelve's sponge capacity: 256 bits / 32 bytes, and the size of a
/// leaf chaining value.
pub const CAPACITY: usize = 32;

/// The 5x5x64-bit Keccak-p\[1600\] state, stored as 200 little-endian bytes.
///
/// Aligned to 8 bytes so that lane-wise byte/u64 conversion never straddles
/// an unaligned boundary, matching the teacher crate's `#[repr(align(8))]`
/// permutation newtypes.
#[derive(Clone)]
#[repr(align(8))]
pub(crate) struct KeccakState([u8; WIDTH]);

impl Default for KeccakState {
    fn default() -> Self {
        KeccakState([0u8; WIDTH])
    }
}

impl Zeroize for KeccakState {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Drop for KeccakState {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl KeccakState {
    /// Applies the 12-round Keccak-p\[1600,12\] permutation used throughout
    /// KangarooTwelve.
    ///
    /// Pure function of the state: no I/O, no allocation, no failure modes.
    #[inline(always)]
    pub(crate) fn permute(&mut self) {
        let mut lanes = [0u64; 25];
        LittleEndian::read_u64_into(&self.0, &mut lanes);
        keccak1600::permute::<12>(&mut lanes);
        LittleEndian::write_u64_into(&lanes, &mut self.0);
    }

    #[inline(always)]
    pub(crate) fn add_byte(&mut self, byte: u8, offset: usize) {
        self.0[offset] ^= byte;
    }

    #[inline(always)]
    pub(crate) fn add_bytes(&mut self, offset: usize, data: &[u8]) {
        for (st, b) in self.0[offset..offset + data.len()].iter_mut().zip(data) {
            *st ^= *b;
        }
    }

    #[inline(always)]
    pub(crate) fn extract_bytes(&self, offset: usize, out: &mut [u8]) {
        out.copy_from_slice(&self.0[offset..offset + out.len()]);
    }
}
