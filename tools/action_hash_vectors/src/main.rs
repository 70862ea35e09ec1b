// SPDX-License-Identifier: MIT
// Prints the canonical encodings and action hashes a governance VAA must carry, so the
// governing chain's tooling can be checked against the program byte for byte.
//
// Usage: action_hash_vectors [GOVERNOR_PROGRAM_ID]
use std::str::FromStr;

use anchor_lang::prelude::Pubkey;
use lockbox_governor::message::GovernanceAction;
use serde::Serialize;

#[derive(Serialize)]
struct ActionCase {
    action: &'static str,
    selector: u8,
    encoding_hex: String,
    expected_action_hash_hex: String,
}

#[derive(Serialize)]
struct Golden {
    governor: String,
    actions: Vec<ActionCase>,
}

fn key(hex32: &str) -> Pubkey {
    let raw = hex::decode(hex32).unwrap();
    Pubkey::new_from_array(raw.try_into().unwrap())
}

fn addr32(addr_hex_no0x: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    let raw = hex::decode(addr_hex_no0x).unwrap();
    assert_eq!(raw.len(), 20);
    out[12..].copy_from_slice(&raw);
    out
}

fn main() {
    let governor = match std::env::args().nth(1) {
        Some(id) => Pubkey::from_str(&id).unwrap_or_else(|e| panic!("bad program id {id}: {e}")),
        None => lockbox_governor::ID,
    };

    let a = key("1111111111111111111111111111111111111111111111111111111111111111");
    let b = key("2222222222222222222222222222222222222222222222222222222222222222");
    let c = key("3333333333333333333333333333333333333333333333333333333333333333");
    let cases = vec![
        (
            "transfer",
            GovernanceAction::Transfer {
                source: a,
                destination: b,
                amount: 123_456,
            },
        ),
        (
            "transfer_token_accounts",
            GovernanceAction::TransferTokenAccounts {
                accounts: vec![a, b],
                destination: c,
            },
        ),
        (
            "set_upgrade_authority",
            GovernanceAction::SetUpgradeAuthority {
                program: a,
                destination: b,
            },
        ),
        (
            "upgrade_program",
            GovernanceAction::UpgradeProgram {
                program: a,
                buffer: b,
                spill: c,
            },
        ),
        (
            "set_governance_emitter",
            GovernanceAction::SetGovernanceEmitter {
                chain: 10002,
                address: addr32("471b3f60f08c50dd0ecba1bcd113b66fcc02b63d"),
            },
        ),
    ];

    let actions = cases
        .into_iter()
        .map(|(name, action)| ActionCase {
            action: name,
            selector: action.selector(),
            encoding_hex: hex::encode(action.encode_for(&governor)),
            expected_action_hash_hex: hex::encode(action.hash_for(&governor)),
        })
        .collect();

    let golden = Golden {
        governor: governor.to_string(),
        actions,
    };
    let json = serde_json::to_string_pretty(&golden).unwrap();
    println!("{}", json);
}
