// SPDX-License-Identifier: MIT
use anchor_lang::prelude::Pubkey;
use delegated_authority::{DelegatedAuthority, LoaderState};
use proptest::prelude::*;

proptest! {
    // Same (program id, seed) always yields the same address and bump, and the persisted bump
    // re-derives it.
    #[test]
    fn derivation_is_pure(program in any::<[u8; 32]>()) {
        let program_id = Pubkey::new_from_array(program);
        let first = DelegatedAuthority::derive(&program_id, b"config");
        let second = DelegatedAuthority::derive(&program_id, b"config");
        prop_assert_eq!(first, second);
        if let Some(authority) = first {
            let rederived = DelegatedAuthority::from_bump(&program_id, b"config", authority.bump());
            prop_assert_eq!(rederived, Some(authority));
        }
    }

    #[test]
    fn loader_parse_never_panics(data in proptest::collection::vec(any::<u8>(), 0..96)) {
        let _ = LoaderState::parse(&data);
    }

    #[test]
    fn program_data_authority_survives_trailing_bytes(
        key in any::<[u8; 32]>(),
        slot in any::<u64>(),
        elf in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let authority = Pubkey::new_from_array(key);
        let mut data = LoaderState::ProgramData { slot, authority: Some(authority) }.encode();
        data.extend_from_slice(&elf);
        prop_assert_eq!(
            LoaderState::parse(&data),
            Some(LoaderState::ProgramData { slot, authority: Some(authority) })
        );
    }
}
