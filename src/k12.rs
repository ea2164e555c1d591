//! The KangarooTwelve tree driver: the state machine that turns a message
//! and a customization string into a fixed- or arbitrary-length output,
//! switching between a single-node sponge and a tree of leaves depending on
//! message length.
//!
//! Grounded line-for-line on `KangarooTwelve_Update` / `KangarooTwelve_Final`
//! / `right_encode` in `original_source/.../KangarooTwelve.c`. The
//! incremental/`Hasher`-shaped surface (`new` + repeated `update` + `final`)
//! mirrors the teacher's `CyclistHash` idiom (`CyclistHash::default()` then
//! `.absorb()`/`.squeeze()`), generalized from a duplex to K12's tree
//! construction.

use crate::dispatch;
use crate::error::{Error, Result};
use crate::sponge::Sponge;
use crate::times::ParallelLeaves;

/// K12's chunk size: every leaf (and the single-node regime's first chunk)
/// covers exactly this many message bytes.
pub const CHUNK_SIZE: usize = 8192;

/// Domain-separation byte appended when finalizing a leaf.
pub(crate) const SUFFIX_LEAF: u8 = 0x0B;
/// Absorbed into `finalNode` at the moment single-node gives way to tree mode.
const SEPARATOR_FIRST_CHUNK: u8 = 0x03;
/// Domain-separation byte for a finalNode that never left single-node mode.
const SUFFIX_FINAL_SINGLE: u8 = 0x07;
/// Domain-separation byte for a finalNode finalized in tree mode.
const SUFFIX_FINAL_TREE: u8 = 0x06;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Phase {
    Absorbing,
    Final,
    Squeezing,
}

/// An incremental KangarooTwelve instance.
///
/// Create with [`KangarooTwelve::new`], feed message bytes via
/// [`KangarooTwelve::update`] any number of times, then call
/// [`KangarooTwelve::finalize`] with the customization string. If the
/// instance was created with `output_len == 0`, further output can be
/// drawn with [`KangarooTwelve::squeeze`].
pub struct KangarooTwelve {
    final_node: Sponge,
    queue_node: Sponge,
    fixed_output_length: usize,
    block_number: u64,
    queue_absorbed_len: usize,
    phase: Phase,
}

impl KangarooTwelve {
    /// Starts a new instance. `output_len = 0` selects streaming squeeze.
    pub fn new(output_len: usize) -> Self {
        KangarooTwelve {
            final_node: Sponge::default(),
            queue_node: Sponge::default(),
            fixed_output_length: output_len,
            block_number: 0,
            queue_absorbed_len: 0,
            phase: Phase::Absorbing,
        }
    }

    /// Absorbs message bytes, advancing the single-node/tree state machine.
    /// May be called any number of times before [`KangarooTwelve::finalize`].
    pub fn update(&mut self, data: &[u8]) -> Result<()> {
        if self.phase != Phase::Absorbing {
            return Err(Error::WrongPhase);
        }
        self.absorb(data)
    }

    /// The actual state machine, reused by both `update` and `finalize`
    /// (customization bytes are absorbed through the identical path, per
    /// the construction's own chunking rule).
    fn absorb(&mut self, mut data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }

        if self.block_number == 0 {
            let space = CHUNK_SIZE - self.queue_absorbed_len;
            if data.len() < space {
                self.final_node.absorb(data).expect("finalNode stays ABSORBING in single-node regime");
                self.queue_absorbed_len += data.len();
                return Ok(());
            }
            self.final_node.absorb(&data[..space]).expect("finalNode stays ABSORBING in single-node regime");
            self.queue_absorbed_len = CHUNK_SIZE;
            data = &data[space..];
            if data.is_empty() {
                // First chunk exactly full; whether more data follows is
                // still unknown, so the single-node/tree decision is
                // deferred to the next call.
                return Ok(());
            }
            self.final_node
                .absorb(&[SEPARATOR_FIRST_CHUNK])
                .expect("finalNode stays ABSORBING in single-node regime");
            self.final_node.zero_pad_to_lane_boundary();
            self.block_number = 1;
            self.queue_absorbed_len = 0;
        }

        'outer: loop {
            if data.is_empty() {
                break;
            }
            if self.queue_absorbed_len == 0 {
                let mut width = dispatch::max_width();
                while width >= 2 {
                    if data.len() >= width * CHUNK_SIZE {
                        self.absorb_parallel_batch(width, &data[..width * CHUNK_SIZE]);
                        data = &data[width * CHUNK_SIZE..];
                        continue 'outer;
                    }
                    width /= 2;
                }
            }
            let space = CHUNK_SIZE - self.queue_absorbed_len;
            let take = space.min(data.len());
            self.queue_node.absorb(&data[..take]).expect("queueNode stays ABSORBING until a full leaf");
            self.queue_absorbed_len += take;
            data = &data[take..];
            if self.queue_absorbed_len == CHUNK_SIZE {
                self.finalize_current_leaf();
            }
        }
        Ok(())
    }

    fn absorb_parallel_batch(&mut self, width: usize, chunk: &[u8]) {
        match width {
            8 => self.absorb_parallel_batch_n::<8>(chunk),
            4 => self.absorb_parallel_batch_n::<4>(chunk),
            2 => self.absorb_parallel_batch_n::<2>(chunk),
            _ => unreachable!("dispatch::max_width only ever returns 1, 2, 4, or 8"),
        }
        self.block_number += width as u64;
    }

    fn absorb_parallel_batch_n<const N: usize>(&mut self, chunk: &[u8]) {
        let mut leaves = ParallelLeaves::<N>::new();
        let leaf_slices: [&[u8]; N] = core::array::from_fn(|i| &chunk[i * CHUNK_SIZE..(i + 1) * CHUNK_SIZE]);
        leaves.absorb(&leaf_slices);
        for cv in leaves.finalize_leaves() {
            self.final_node.absorb(&cv).expect("finalNode stays ABSORBING throughout tree-mode processing");
        }
    }

    fn finalize_current_leaf(&mut self) {
        let leaf = core::mem::replace(&mut self.queue_node, Sponge::default());
        let cv = leaf.finalize_as_leaf();
        self.final_node.absorb(&cv).expect("finalNode stays ABSORBING throughout tree-mode processing");
        self.block_number += 1;
        self.queue_absorbed_len = 0;
    }

    /// Finalizes the instance with the given customization string.
    ///
    /// If the instance was created with a nonzero `output_len`, `output`
    /// must be exactly that many bytes and receives the full output; the
    /// instance is then terminal (further `squeeze` calls fail). If
    /// `output_len == 0`, `output` must be empty and the instance becomes
    /// ready for [`KangarooTwelve::squeeze`].
    pub fn finalize(&mut self, customization: &[u8], output: &mut [u8]) -> Result<()> {
        if self.phase != Phase::Absorbing {
            return Err(Error::WrongPhase);
        }
        debug_assert!(
            (self.fixed_output_length > 0 && output.len() == self.fixed_output_length)
                || (self.fixed_output_length == 0 && output.is_empty())
        );

        self.absorb(customization)?;
        let (len_buf, len_len) = right_encode(customization.len() as u64);
        self.absorb(&len_buf[..len_len])?;

        if self.block_number == 0 {
            self.final_node.absorb_last(SUFFIX_FINAL_SINGLE);
        } else {
            if self.queue_absorbed_len > 0 {
                self.finalize_current_leaf();
            }
            let (be_buf, be_len) = right_encode(self.block_number - 1);
            self.final_node.absorb(&be_buf[..be_len]).expect("finalNode stays ABSORBING until absorb_last");
            self.final_node.absorb(&[0xFF, 0xFF]).expect("finalNode stays ABSORBING until absorb_last");
            self.final_node.absorb_last(SUFFIX_FINAL_TREE);
        }

        if self.fixed_output_length > 0 {
            self.final_node.squeeze(output).expect("finalNode is SQUEEZING immediately after absorb_last");
            self.phase = Phase::Final;
        } else {
            self.phase = Phase::Squeezing;
        }
        Ok(())
    }

    /// Draws more output from a streaming (`output_len == 0`) instance.
    /// Requires [`KangarooTwelve::finalize`] to have already run.
    pub fn squeeze(&mut self, output: &mut [u8]) -> Result<()> {
        if self.phase != Phase::Squeezing {
            return Err(Error::WrongPhase);
        }
        self.final_node.squeeze(output)
    }

    /// Computes a fixed-length K12 digest in one call.
    #[cfg(feature = "std")]
    pub fn oneshot(input: &[u8], customization: &[u8], output_len: usize) -> Result<std::vec::Vec<u8>> {
        if output_len == 0 {
            return Err(Error::ZeroLengthRequest);
        }
        let mut k12 = KangarooTwelve::new(output_len);
        k12.update(input)?;
        let mut output = std::vec![0u8; output_len];
        k12.finalize(customization, &mut output)?;
        Ok(output)
    }
}

/// Emits the base-256 big-endian minimal representation of `value`,
/// followed by a single byte equal to that representation's length.
/// `value == 0` encodes as the single byte `{0x00}`.
pub(crate) fn right_encode(value: u64) -> ([u8; 9], usize) {
    let be = value.to_be_bytes();
    let mut buf = [0u8; 9];
    match be.iter().position(|&b| b != 0) {
        None => {
            buf[0] = 0;
            (buf, 1)
        }
        Some(start) => {
            let n = 8 - start;
            buf[..n].copy_from_slice(&be[start..]);
            buf[n] = n as u8;
            (buf, n + 1)
        }
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    fn oneshot_hex(input: &[u8], customization: &[u8], output_len: usize) -> std::string::String {
        hex::encode_upper(KangarooTwelve::oneshot(input, customization, output_len).unwrap())
    }

    fn ptn(n: usize) -> std::vec::Vec<u8> {
        (0..n).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn right_encode_zero_is_single_zero_byte() {
        let (buf, len) = right_encode(0);
        assert_eq!(&buf[..len], &[0x00]);
    }

    #[test]
    fn right_encode_round_trips() {
        for value in [0u64, 1, 41, 255, 256, 65535, 65536, u64::MAX] {
            let (buf, len) = right_encode(value);
            let encoded = &buf[..len];
            let n = encoded[len - 1] as usize;
            assert_eq!(n, len - 1);
            let mut reconstructed = 0u64;
            for &b in &encoded[..n] {
                reconstructed = (reconstructed << 8) | b as u64;
            }
            assert_eq!(reconstructed, value);
        }
    }

    #[test]
    fn kat_empty_message_empty_customization_32_bytes() {
        assert_eq!(
            oneshot_hex(&[], &[], 32),
            "1AC2D450FC3B4205D19DA7BFCA1B3753\
             1F2CB1F2A13557E0C8D5A3CAC19E53BB"
        );
    }

    #[test]
    fn kat_empty_message_empty_customization_64_bytes_extends_the_32_byte_prefix() {
        assert_eq!(
            oneshot_hex(&[], &[], 64),
            "1AC2D450FC3B4205D19DA7BFCA1B3753\
             1F2CB1F2A13557E0C8D5A3CAC19E53BB\
             DFB59010CC28A2C31C48A9C3A90C6C48\
             52AE5A0539CFD7F76E8D28F9E9F55C01"
        );
    }

    #[test]
    fn kat_17_byte_message_empty_customization() {
        let message = [0x00u8; 17];
        assert_eq!(
            oneshot_hex(&message, &[], 32),
            "6BF75FA2239198DB4772E36478F8E19B\
             0F371205F6A9A93A273F51DF37122888"
        );
    }

    #[test]
    fn kat_empty_message_41_byte_customization() {
        let customization = [0x00u8; 41];
        assert_eq!(
            oneshot_hex(&[], &customization, 32),
            "E8DC563642F7228C84684C898405D3AB\
             834A1C6D0FC872435DA6932E8F92E2CE"
        );
    }

    #[test]
    fn boundary_lengths_produce_distinct_outputs_and_exercise_every_branch() {
        let b = CHUNK_SIZE;
        let lengths = [0, 1, b - 1, b, b + 1, 2 * b - 1, 2 * b, 8 * b - 1, 8 * b, 8 * b + 1];
        let mut outputs = std::vec::Vec::new();
        for &len in &lengths {
            let message = ptn(len);
            outputs.push(KangarooTwelve::oneshot(&message, &[], 32).unwrap());
        }
        for i in 0..outputs.len() {
            for j in (i + 1)..outputs.len() {
                assert_ne!(outputs[i], outputs[j], "lengths {} and {} collided", lengths[i], lengths[j]);
            }
        }
    }

    #[test]
    fn tree_mode_output_is_independent_of_enabled_parallel_widths() {
        let _guard = dispatch::lock_for_test();
        let message = ptn(8 * CHUNK_SIZE + 97);
        let had_times2 = dispatch::has_times2();
        let had_times4 = dispatch::has_times4();
        let had_times8 = dispatch::has_times8();

        let baseline = KangarooTwelve::oneshot(&message, &[], 32).unwrap();

        dispatch::disable_avx512();
        dispatch::disable_avx2();
        dispatch::disable_ssse3();
        let scalar_only = KangarooTwelve::oneshot(&message, &[], 32).unwrap();

        dispatch::enable_all();
        let restored = KangarooTwelve::oneshot(&message, &[], 32).unwrap();

        assert_eq!(baseline, scalar_only);
        assert_eq!(baseline, restored);

        if !had_times2 {
            dispatch::disable_ssse3();
        }
        if !had_times4 {
            dispatch::disable_avx2();
        }
        if !had_times8 {
            dispatch::disable_avx512();
        }
    }

    #[test]
    fn streaming_equivalence_across_update_partitions() {
        let message = ptn(2 * CHUNK_SIZE + 513);

        let mut whole = KangarooTwelve::new(32);
        whole.update(&message).unwrap();
        let mut whole_out = [0u8; 32];
        whole.finalize(b"ctx", &mut whole_out).unwrap();

        let mut split = KangarooTwelve::new(32);
        split.update(&message[..1]).unwrap();
        split.update(&message[1..CHUNK_SIZE]).unwrap();
        split.update(&message[CHUNK_SIZE..CHUNK_SIZE + 3]).unwrap();
        split.update(&message[CHUNK_SIZE + 3..]).unwrap();
        let mut split_out = [0u8; 32];
        split.finalize(b"ctx", &mut split_out).unwrap();

        assert_eq!(whole_out, split_out);
    }

    #[test]
    fn streaming_squeeze_monotonicity() {
        let message = ptn(100);

        let mut a = KangarooTwelve::new(0);
        a.update(&message).unwrap();
        a.finalize(&[], &mut []).unwrap();
        let mut whole = [0u8; 1000];
        a.squeeze(&mut whole).unwrap();

        let mut b = KangarooTwelve::new(0);
        b.update(&message).unwrap();
        b.finalize(&[], &mut []).unwrap();
        let mut parts = [0u8; 1000];
        b.squeeze(&mut parts[..1]).unwrap();
        b.squeeze(&mut parts[1..8]).unwrap();
        b.squeeze(&mut parts[8..1000]).unwrap();

        assert_eq!(whole.as_slice(), parts.as_slice());
    }

    #[test]
    fn phase_errors() {
        let mut k12 = KangarooTwelve::new(32);
        k12.update(b"data").unwrap();
        let mut out = [0u8; 32];
        k12.finalize(&[], &mut out).unwrap();
        assert_eq!(k12.update(b"more"), Err(Error::WrongPhase));
        assert_eq!(k12.finalize(&[], &mut [0u8; 32]), Err(Error::WrongPhase));
        assert_eq!(k12.squeeze(&mut [0u8; 1]), Err(Error::WrongPhase));

        let mut streaming = KangarooTwelve::new(0);
        assert_eq!(streaming.squeeze(&mut [0u8; 1]), Err(Error::WrongPhase));
    }

    #[test]
    fn oneshot_rejects_zero_length() {
        assert_eq!(KangarooTwelve::oneshot(b"x", &[], 0), Err(Error::ZeroLengthRequest));
    }
}
