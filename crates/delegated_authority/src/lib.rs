// SPDX-License-Identifier: MIT
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
//! A program-derived address acting as an owner / authority on behalf of a program.
//!
//! The address is `find_program_address([seed], program_id)`. It has no private key; the owning
//! program signs for it by handing `[seed, bump]` to `invoke_signed`. Records that act through
//! the authority persist the bump so the address can be re-derived cheaply with
//! [`DelegatedAuthority::from_bump`].
use anchor_lang::prelude::*;

pub mod cpi;
pub mod custody;
pub mod loader;

pub use loader::{LoaderState, UpgradeableLoader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelegatedAuthority {
    address: Pubkey,
    seed: &'static [u8],
    bump: [u8; 1],
}

impl DelegatedAuthority {
    /// Canonical derivation. `None` when no bump yields an off-curve address.
    pub fn derive(program_id: &Pubkey, seed: &'static [u8]) -> Option<Self> {
        Pubkey::try_find_program_address(&[seed], program_id).map(|(address, bump)| Self {
            address,
            seed,
            bump: [bump],
        })
    }

    /// Re-derive from a persisted bump.
    pub fn from_bump(program_id: &Pubkey, seed: &'static [u8], bump: u8) -> Option<Self> {
        Pubkey::create_program_address(&[seed, &[bump]], program_id)
            .ok()
            .map(|address| Self {
                address,
                seed,
                bump: [bump],
            })
    }

    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub fn bump(&self) -> u8 {
        self.bump[0]
    }

    pub fn is(&self, key: &Pubkey) -> bool {
        self.address == *key
    }

    /// Seeds to pass to `invoke_signed` / `CpiContext::new_with_signer`.
    pub fn signer_seeds(&self) -> [&[u8]; 2] {
        [self.seed, &self.bump]
    }
}
