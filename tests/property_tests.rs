use bitpress::Engine;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_huffman_roundtrip(data in prop::collection::vec(any::<u8>(), 0..2000)) {
        let compressed = Engine::Huffman.compress(&data).unwrap();
        let restored = Engine::Huffman.decompress(&compressed).unwrap();
        prop_assert_eq!(restored, data);
    }

    #[test]
    fn test_arithmetic_roundtrip(data in prop::collection::vec(any::<u8>(), 0..2000)) {
        let compressed = Engine::Arithmetic.compress(&data).unwrap();
        let restored = Engine::Arithmetic.decompress(&compressed).unwrap();
        prop_assert_eq!(restored, data);
    }

    #[test]
    fn test_skewed_alphabet_roundtrip(
        data in prop::collection::vec(prop_oneof![40 => Just(b'a'), 3 => Just(b'b'), 1 => Just(b'c')], 1..4000),
    ) {
        for engine in Engine::ALL {
            let compressed = engine.compress(&data).unwrap();
            prop_assert_eq!(engine.decompress(&compressed).unwrap(), data.clone());
        }
    }

    #[test]
    fn test_decompress_never_panics_on_garbage(data in prop::collection::vec(any::<u8>(), 0..256)) {
        // Arbitrary bytes must produce output or a typed error, never a panic.
        for engine in Engine::ALL {
            let _ = engine.decompress(&data);
        }
    }
}
