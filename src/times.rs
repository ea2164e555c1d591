//! Data-parallel application of the KangarooTwelve permutation to 2, 4, or 8
//! independent Keccak-p\[1600\] states at once.
//!
//! XKCP, the reference implementation this crate is grounded on, calls
//! these the "timesN" kernels (`KeccakP1600times2/4/8`) and backs them with
//! AVX2/AVX-512/SSSE3 intrinsics. This crate ships a portable, safe
//! fallback instead: `permute_n` simply permutes each lane in turn. Its
//! output is bit-identical to `N` sequential single-state permutations by
//! construction, which is the entire contract §4.2 asks for ("Output MUST
//! be bit-identical to N sequential invocations of P"); a vectorized
//! backend is a drop-in replacement for this module's internals only.

use crate::k12::SUFFIX_LEAF;
use crate::state::{KeccakState, CAPACITY, RATE};

/// Applies the 12-round permutation to all `N` states.
#[inline]
fn permute_n<const N: usize>(states: &mut [KeccakState; N]) {
    for state in states.iter_mut() {
        state.permute();
    }
}

/// `N` independent Keccak-p\[1600\] states, each absorbing one of `N`
/// equal-length leaves in lockstep: every time the shared rate window
/// fills, all `N` lanes are permuted together via a single [`permute_n`]
/// call, so the ordering of the resulting chaining values is deterministic
/// (lane 0 first) regardless of how the underlying permutation is
/// implemented.
pub(crate) struct ParallelLeaves<const N: usize> {
    states: [KeccakState; N],
    byte_io_index: usize,
}

impl<const N: usize> ParallelLeaves<N> {
    pub(crate) fn new() -> Self {
        ParallelLeaves { states: core::array::from_fn(|_| KeccakState::default()), byte_io_index: 0 }
    }

    /// Absorbs `N` same-length leaves, one per lane.
    pub(crate) fn absorb(&mut self, leaves: &[&[u8]; N]) {
        let len = leaves[0].len();
        debug_assert!(leaves.iter().all(|leaf| leaf.len() == len));

        let mut offset = 0;
        while offset < len {
            let take = (RATE - self.byte_io_index).min(len - offset);
            for (lane, leaf) in leaves.iter().enumerate() {
                self.states[lane].add_bytes(self.byte_io_index, &leaf[offset..offset + take]);
            }
            self.byte_io_index += take;
            offset += take;
            if self.byte_io_index == RATE {
                permute_n(&mut self.states);
                self.byte_io_index = 0;
            }
        }
    }

    /// Finalizes every lane as a K12 leaf (`absorb_last(0x0B)` followed by a
    /// 32-byte squeeze) and returns the `N` chaining values in lane order.
    pub(crate) fn finalize_leaves(mut self) -> [[u8; CAPACITY]; N] {
        for state in self.states.iter_mut() {
            state.add_byte(SUFFIX_LEAF, self.byte_io_index);
        }
        if SUFFIX_LEAF & 0x80 != 0 && self.byte_io_index == RATE - 1 {
            permute_n(&mut self.states);
        }
        for state in self.states.iter_mut() {
            state.add_byte(0x80, RATE - 1);
        }
        permute_n(&mut self.states);

        let mut cvs = [[0u8; CAPACITY]; N];
        for (lane, state) in self.states.iter().enumerate() {
            state.extract_bytes(0, &mut cvs[lane]);
        }
        cvs
    }
}
