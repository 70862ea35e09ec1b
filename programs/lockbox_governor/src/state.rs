// SPDX-License-Identifier: MIT
use anchor_lang::prelude::*;
use delegated_authority::DelegatedAuthority;

use crate::error::GovernorError;

/// Governor configuration. The PDA is also the governor's delegated authority: programs and
/// token accounts placed under governance record this address as their authority.
#[account]
pub struct Config {
    /// Core Bridge program owning posted VAA accounts.
    pub wormhole_program: Pubkey,
    /// The sole trusted source of governance messages.
    pub allowed_emitter_chain: u16,
    pub allowed_emitter_address: [u8; 32],
    /// Governance messages applied so far.
    pub messages_processed: u64,
    pub authority_bump: u8,
}

impl Config {
    pub const SEED_PREFIX: &'static [u8] = b"config";

    pub const MAXIMUM_SIZE: usize = 8 // discriminator
        + 32 // wormhole_program
        + 2 // allowed_emitter_chain
        + 32 // allowed_emitter_address
        + 8 // messages_processed
        + 1 // authority_bump
    ;

    pub fn is_trusted(&self, chain: u16, address: &[u8; 32]) -> bool {
        chain == self.allowed_emitter_chain && *address == self.allowed_emitter_address
    }

    pub fn delegated_authority(&self) -> Result<DelegatedAuthority> {
        DelegatedAuthority::from_bump(&crate::ID, Self::SEED_PREFIX, self.authority_bump)
            .ok_or(error!(GovernorError::DerivationFailure))
    }
}

/// Replay marker, one per (emitter chain, sequence). Never closed.
#[account]
pub struct Received {
    pub processed: bool,
    pub emitter_chain: u16,
    pub sequence: u64,
    /// Action hash the message authorised.
    pub action_hash: [u8; 32],
    /// Message hash of the posted VAA.
    pub vaa_hash: [u8; 32],
}

impl Received {
    pub const SEED_PREFIX: &'static [u8] = b"received";

    pub const MAXIMUM_SIZE: usize = 8 + 1 + 2 + 8 + 32 + 32;

    pub fn address(emitter_chain: u16, sequence: u64) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[
                Self::SEED_PREFIX,
                &emitter_chain.to_le_bytes(),
                &sequence.to_le_bytes(),
            ],
            &crate::ID,
        )
    }
}
