use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sdexpr::codec::{conforms_to_type, deserialize, to_bits, to_bytes};
use sdexpr::integer::{make_unsigned_integer, parse_unsigned_integer};
use sdexpr::value::Value;
use sdschema::bits::ByteToBitSource;
use sdschema::layout::{Layout, calculate};
use sdschema::types::Type;

/// Random tuple-of-bits type with a matching random value.
fn random_bitset_value(rng: &mut ChaCha8Rng, depth: u32) -> (Type, Value) {
    if depth == 0 || rng.random_bool(0.35) {
        return (Type::Bit, Value::Bit(rng.random_bool(0.5)));
    }
    let arity = rng.random_range(0..4);
    let (types, values): (Vec<_>, Vec<_>) = (0..arity)
        .map(|_| random_bitset_value(rng, depth - 1))
        .unzip();
    (Type::Tuple(types), Value::Tuple(values))
}

#[test]
fn bitset_values_roundtrip_through_bits_and_bytes() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xB175);
    for _ in 0..300 {
        let (ty, value) = random_bitset_value(&mut rng, 4);
        assert!(conforms_to_type(&value, &ty));
        let Ok(Layout::Bitset(length)) = calculate(&ty) else {
            panic!("{ty} must fold to a bitset");
        };

        let bits = to_bits(&value).unwrap();
        assert_eq!(bits.len() as u64, length);
        let mut source = bits.iter().copied();
        assert_eq!(deserialize(&mut source, &ty), Ok(Some(value.clone())));
        assert!(source.next().is_none());

        let bytes = to_bytes(&value).unwrap();
        assert_eq!(bytes.len() as u64, length.div_ceil(8));
        let mut source = ByteToBitSource::new(bytes.into_iter());
        assert_eq!(deserialize(&mut source, &ty), Ok(Some(value)));
    }
}

#[test]
fn integers_roundtrip_through_bytes() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..100 {
        let number: u32 = rng.random();
        let bytes = to_bytes(&make_unsigned_integer(number)).unwrap();
        assert_eq!(bytes, number.to_be_bytes());

        let mut source = ByteToBitSource::new(bytes.into_iter());
        let decoded = deserialize(&mut source, &Type::unsigned_integer(32))
            .unwrap()
            .unwrap();
        let Value::Tuple(elements) = decoded else {
            panic!("integers decode as tuples");
        };
        assert_eq!(parse_unsigned_integer::<u32>(&elements), Ok(number));
    }
}
