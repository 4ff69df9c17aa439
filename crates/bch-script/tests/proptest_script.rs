use proptest::prelude::*;

use bch_script::vm::{ScriptNumber, Machine, CommonProgramState, ExternalState};
use bch_script::vm::standard_instruction_set;
use bch_script::Script;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn script_number_encode_decode_roundtrip(value in -0x7FFF_FFFFi64..=0x7FFF_FFFF) {
        let bytes = ScriptNumber::new(value).to_bytes();
        let parsed = ScriptNumber::from_bytes(&bytes).unwrap();
        prop_assert_eq!(parsed.value(), value);
        prop_assert!(bytes.len() <= 4);
    }

    #[test]
    fn script_hex_roundtrip(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let script = Script::from_bytes(&data);
        let hex_str = script.to_hex();
        let script2 = Script::from_hex(&hex_str).unwrap();
        prop_assert_eq!(script.to_bytes(), script2.to_bytes());
    }

    #[test]
    fn evaluation_never_panics_and_matches_debug(script in prop::collection::vec(any::<u8>(), 0..64)) {
        let machine = Machine::new(standard_instruction_set());
        let state = CommonProgramState::new(script, vec![], ExternalState::empty());

        let evaluated = machine.evaluate(&state);
        let steps = machine.debug(&state);
        prop_assert_eq!(&evaluated, &steps.last().unwrap().state);

        // The caller's state is untouched.
        prop_assert_eq!(state.ip, 0);
        prop_assert!(state.error.is_none());
    }
}
