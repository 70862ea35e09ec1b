// SPDX-License-Identifier: MIT
//! Pre-flight checks over a batch of token accounts held by a delegated authority.
//!
//! Every account is checked before the caller issues its first CPI so a hand-over either moves
//! the whole batch or nothing.
use anchor_lang::prelude::*;
use anchor_spl::token::{self, TokenAccount};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustodyViolation {
    Empty,
    TooMany,
    Duplicate(Pubkey),
    NotTokenAccount(Pubkey),
    NotHeld(Pubkey),
}

/// Checks that `accounts` is a non-empty, duplicate-free list of SPL token accounts whose owner
/// field is `authority`.
pub fn check_held_accounts(
    accounts: &[AccountInfo<'_>],
    authority: &Pubkey,
    max: usize,
) -> std::result::Result<(), CustodyViolation> {
    if accounts.is_empty() {
        return Err(CustodyViolation::Empty);
    }
    if accounts.len() > max {
        return Err(CustodyViolation::TooMany);
    }
    for (i, info) in accounts.iter().enumerate() {
        if accounts[..i].iter().any(|prev| prev.key == info.key) {
            return Err(CustodyViolation::Duplicate(*info.key));
        }
        if info.owner != &token::ID {
            return Err(CustodyViolation::NotTokenAccount(*info.key));
        }
        let held = {
            let data = info
                .try_borrow_data()
                .map_err(|_| CustodyViolation::NotTokenAccount(*info.key))?;
            TokenAccount::try_deserialize(&mut &data[..])
                .map_err(|_| CustodyViolation::NotTokenAccount(*info.key))?
        };
        if held.owner != *authority {
            return Err(CustodyViolation::NotHeld(*info.key));
        }
    }
    Ok(())
}
