// SPDX-License-Identifier: MIT
use anchor_lang::prelude::*;

#[event]
pub struct GovernorInitialized {
    pub config: Pubkey,
    pub wormhole_program: Pubkey,
    pub emitter_chain: u16,
    pub emitter_address: [u8; 32],
}

#[event]
pub struct MessageProcessed {
    pub emitter_chain: u16,
    pub sequence: u64,
    pub action: u8,
    pub action_hash: [u8; 32],
    pub vaa_hash: [u8; 32],
}

/// A message that was already applied was submitted again; nothing was executed.
#[event]
pub struct DuplicateMessageIgnored {
    pub emitter_chain: u16,
    pub sequence: u64,
    pub action_hash: [u8; 32],
}

#[event]
pub struct UpgradeAuthorityChanged {
    pub sequence: u64,
    pub program: Pubkey,
    pub previous_authority: Pubkey,
    pub new_authority: Pubkey,
}

#[event]
pub struct ProgramUpgraded {
    pub sequence: u64,
    pub program: Pubkey,
    pub buffer: Pubkey,
    pub spill: Pubkey,
}

#[event]
pub struct TokensTransferred {
    pub sequence: u64,
    pub mint: Pubkey,
    pub source: Pubkey,
    pub destination: Pubkey,
    pub amount: u64,
}

#[event]
pub struct TokenAccountsTransferred {
    pub sequence: u64,
    pub destination: Pubkey,
    pub accounts: Vec<Pubkey>,
}

#[event]
pub struct EmitterUpdated {
    pub sequence: u64,
    pub previous_chain: u16,
    pub previous_address: [u8; 32],
    pub chain: u16,
    pub address: [u8; 32],
}
