// SPDX-License-Identifier: MIT
use anchor_lang::prelude::*;
use delegated_authority::DelegatedAuthority;

use crate::error::FeeCollectorError;

/// Custodian record. Its address is the authority of every token account it holds.
#[account]
pub struct FeeCollector {
    pub bump: u8,
    /// Local caller trusted to move custody.
    pub admin: Pubkey,
    /// Raw token units moved out by `transfer`, all mints combined.
    pub total_transferred: u64,
}

impl FeeCollector {
    pub const SEED_PREFIX: &'static [u8] = b"fee_collector";

    pub const LEN: usize = 8 + 1 + 32 + 8;

    pub fn delegated_authority(&self) -> Result<DelegatedAuthority> {
        DelegatedAuthority::from_bump(&crate::ID, Self::SEED_PREFIX, self.bump)
            .ok_or(error!(FeeCollectorError::DerivationFailure))
    }
}
