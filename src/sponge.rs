//! The plain sponge `F`: absorb/pad/squeeze over a single Keccak-p[1600,12]
//! state at rate 168.
//!
//! Grounded on `KangarooTwelve_F_Absorb` / `KangarooTwelve_F_AbsorbLastFewBits`
//! / `KangarooTwelve_F_Squeeze` in
//! `original_source/.../KangarooTwelve.c`: the exact byteIOIndex arithmetic
//! and padding rule below mirrors that C reference byte-for-byte. Unlike
//! `CyclistCore` in the teacher crate, `Sponge` has no up/down duplex
//! framing — K12's sponge is absorb-then-squeeze only, never interleaved
//! (see DESIGN.md, Open Question 1).

use crate::error::{Error, Result};
use crate::state::{KeccakState, CAPACITY, RATE};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Phase {
    Absorbing,
    Squeezing,
}

pub(crate) struct Sponge {
    state: KeccakState,
    byte_io_index: usize,
    phase: Phase,
}

impl Default for Sponge {
    fn default() -> Self {
        Sponge { state: KeccakState::default(), byte_io_index: 0, phase: Phase::Absorbing }
    }
}

impl Sponge {
    /// XORs `data` into the rate window, permuting every time the window
    /// fills. Accepts input of any length, including across multiple
    /// calls and across permutation boundaries.
    pub(crate) fn absorb(&mut self, mut data: &[u8]) -> Result<()> {
        if self.phase != Phase::Absorbing {
            return Err(Error::WrongPhase);
        }
        while !data.is_empty() {
            let take = (RATE - self.byte_io_index).min(data.len());
            self.state.add_bytes(self.byte_io_index, &data[..take]);
            self.byte_io_index += take;
            data = &data[take..];
            if self.byte_io_index == RATE {
                self.state.permute();
                self.byte_io_index = 0;
            }
        }
        Ok(())
    }

    /// Zero-pads the current rate window up to the next 8-byte (lane)
    /// boundary, without permuting. Used when transitioning from
    /// single-node to tree mode so that chaining values subsequently
    /// absorbed land on lane boundaries.
    pub(crate) fn zero_pad_to_lane_boundary(&mut self) {
        self.byte_io_index = (self.byte_io_index + 7) & !7;
    }

    /// Finalizes absorption with domain-separation byte `suffix`, moving
    /// the sponge into the SQUEEZING phase.
    pub(crate) fn absorb_last(&mut self, suffix: u8) {
        debug_assert_ne!(suffix, 0);
        self.state.add_byte(suffix, self.byte_io_index);
        if suffix & 0x80 != 0 && self.byte_io_index == RATE - 1 {
            self.state.permute();
        }
        self.state.add_byte(0x80, RATE - 1);
        self.state.permute();
        self.byte_io_index = 0;
        self.phase = Phase::Squeezing;
    }

    /// Emits `output.len()` bytes, permuting whenever the rate window is
    /// exhausted. Requires the sponge to already be in the SQUEEZING
    /// phase; callers reaching this in ABSORBING phase must call
    /// `absorb_last(0x01)` first.
    pub(crate) fn squeeze(&mut self, output: &mut [u8]) -> Result<()> {
        if self.phase != Phase::Squeezing {
            return Err(Error::WrongPhase);
        }
        let mut offset = 0;
        while offset < output.len() {
            if self.byte_io_index == RATE {
                self.state.permute();
                self.byte_io_index = 0;
            }
            let take = (RATE - self.byte_io_index).min(output.len() - offset);
            self.state.extract_bytes(self.byte_io_index, &mut output[offset..offset + take]);
            self.byte_io_index += take;
            offset += take;
        }
        Ok(())
    }

    /// Finalizes a K12 leaf: `absorb_last(0x0B)` followed by a 32-byte
    /// squeeze, returned as a chaining value.
    pub(crate) fn finalize_as_leaf(mut self) -> [u8; CAPACITY] {
        self.absorb_last(crate::k12::SUFFIX_LEAF);
        let mut cv = [0u8; CAPACITY];
        self.squeeze(&mut cv).expect("sponge is SQUEEZING immediately after absorb_last");
        cv
    }
}
