#![cfg(all(test, feature = "std"))]

use proptest::collection::vec;
use proptest::prelude::*;

use crate::{dispatch, k12_oneshot, KangarooTwelve};

#[derive(Clone, Debug, PartialEq)]
struct Transcript {
    chunks: Vec<Vec<u8>>,
    customization: Vec<u8>,
}

fn run(transcript: &Transcript, output_len: usize) -> Vec<u8> {
    let mut k12 = KangarooTwelve::new(output_len);
    for chunk in &transcript.chunks {
        k12.update(chunk).unwrap();
    }
    if output_len > 0 {
        let mut output = vec![0u8; output_len];
        k12.finalize(&transcript.customization, &mut output).unwrap();
        output
    } else {
        k12.finalize(&transcript.customization, &mut []).unwrap();
        let mut output = vec![0u8; 48];
        k12.squeeze(&mut output).unwrap();
        output
    }
}

fn arb_chunk() -> impl Strategy<Value = Vec<u8>> {
    vec(any::<u8>(), 0..500)
}

prop_compose! {
    fn arb_transcript()(chunks in vec(arb_chunk(), 0..6), customization in vec(any::<u8>(), 0..64)) -> Transcript {
        Transcript { chunks, customization }
    }
}

proptest! {
    /// Splitting a message into arbitrarily many `update()` calls must
    /// produce the same output as absorbing it in one call (spec §8,
    /// "Streaming equivalence").
    #[test]
    fn streaming_partition_invariance(t in arb_transcript()) {
        let whole: Vec<u8> = t.chunks.concat();
        let merged = Transcript { chunks: vec![whole], customization: t.customization.clone() };

        let out_split = run(&t, 32);
        let out_merged = run(&merged, 32);
        assert_eq!(out_split, out_merged);
    }

    #[test]
    fn determinism(t in arb_transcript()) {
        let out0 = run(&t, 48);
        let out1 = run(&t, 48);
        assert_eq!(out0, out1);
    }

    /// Enabling or disabling any subset of P×2/P×4/P×8 must not change the
    /// output for any (M, C, L) (spec §8, "Leaf-batch invariance").
    #[test]
    fn leaf_batch_invariance(message in vec(any::<u8>(), 0..17000)) {
        let _guard = dispatch::lock_for_test();
        let had2 = dispatch::has_times2();
        let had4 = dispatch::has_times4();
        let had8 = dispatch::has_times8();

        let baseline = k12_oneshot(&message, &[], 32).unwrap();

        dispatch::disable_avx512();
        dispatch::disable_avx2();
        dispatch::disable_ssse3();
        let scalar_only = k12_oneshot(&message, &[], 32).unwrap();
        assert_eq!(baseline, scalar_only);

        dispatch::enable_all();
        let restored = k12_oneshot(&message, &[], 32).unwrap();
        assert_eq!(baseline, restored);

        if !had2 {
            dispatch::disable_ssse3();
        }
        if !had4 {
            dispatch::disable_avx2();
        }
        if !had8 {
            dispatch::disable_avx512();
        }
    }
}
