// SPDX-License-Identifier: MIT
use anchor_lang::prelude::*;

#[event]
pub struct FeeCollectorInitialized {
    pub collector: Pubkey,
    pub admin: Pubkey,
}

#[event]
pub struct TransferEvent {
    pub signer: Pubkey,
    pub token: Pubkey,
    pub destination: Pubkey,
    pub amount: u64,
}

#[event]
pub struct TransferTokenAccountsEvent {
    pub signer: Pubkey,
    pub accounts: Vec<Pubkey>,
    pub destination: Pubkey,
}

#[event]
pub struct UpgradeAuthorityChanged {
    pub program: Pubkey,
    pub previous_authority: Pubkey,
    pub new_authority: Pubkey,
}

#[event]
pub struct AdminChanged {
    pub previous_admin: Pubkey,
    pub new_admin: Pubkey,
}
