use proptest::prelude::*;

use bch_primitives::util::{ByteReader, ByteWriter, VarInt};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn hex_encode_decode_roundtrip(data in prop::collection::vec(any::<u8>(), 0..100)) {
        let encoded = hex::encode(&data);
        let decoded = hex::decode(&encoded).unwrap();
        prop_assert_eq!(&data[..], &decoded[..]);
        prop_assert_eq!(hex::encode(&decoded), encoded);
    }

    #[test]
    fn varint_roundtrip(value in any::<u64>()) {
        let encoded = VarInt(value).to_bytes();
        let (decoded, consumed) = VarInt::from_bytes(&encoded).unwrap();
        prop_assert_eq!(decoded.value(), value);
        prop_assert_eq!(consumed, encoded.len());
        prop_assert_eq!(consumed, VarInt(value).length());
    }

    #[test]
    fn varint_reader_advances_correctly(value in any::<u64>(), trailer in any::<u32>()) {
        let mut writer = ByteWriter::new();
        writer.write_varint(VarInt(value));
        writer.write_u32_le(trailer);

        let data = writer.into_bytes();
        let mut reader = ByteReader::new(&data);
        prop_assert_eq!(reader.read_varint().unwrap().value(), value);
        prop_assert_eq!(reader.read_u32_le().unwrap(), trailer);
        prop_assert_eq!(reader.remaining(), 0);
    }
}
