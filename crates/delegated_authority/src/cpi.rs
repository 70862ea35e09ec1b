// SPDX-License-Identifier: MIT
//! Cross-program calls signed by a [`DelegatedAuthority`](crate::DelegatedAuthority).
use anchor_lang::prelude::*;
use anchor_lang::solana_program::{bpf_loader_upgradeable, program::invoke_signed};
use anchor_spl::token::{self, spl_token::instruction::AuthorityType};

/// Accounts consumed by the loader's `SetAuthority` on a programdata account.
pub struct SetUpgradeAuthority<'a, 'info> {
    pub program: &'a AccountInfo<'info>,
    pub program_data: &'a AccountInfo<'info>,
    pub current_authority: &'a AccountInfo<'info>,
    pub new_authority: &'a AccountInfo<'info>,
    pub loader: &'a AccountInfo<'info>,
}

pub fn set_upgrade_authority(
    accounts: SetUpgradeAuthority<'_, '_>,
    signer_seeds: &[&[u8]],
) -> Result<()> {
    invoke_signed(
        &bpf_loader_upgradeable::set_upgrade_authority(
            accounts.program.key,
            accounts.current_authority.key,
            Some(accounts.new_authority.key),
        ),
        &[
            accounts.program_data.clone(),
            accounts.current_authority.clone(),
            accounts.new_authority.clone(),
            accounts.loader.clone(),
        ],
        &[signer_seeds],
    )
    .map_err(Into::into)
}

/// Accounts consumed by the loader's `Upgrade`.
pub struct Upgrade<'a, 'info> {
    pub program: &'a AccountInfo<'info>,
    pub program_data: &'a AccountInfo<'info>,
    pub buffer: &'a AccountInfo<'info>,
    pub spill: &'a AccountInfo<'info>,
    pub rent: &'a AccountInfo<'info>,
    pub clock: &'a AccountInfo<'info>,
    pub authority: &'a AccountInfo<'info>,
    pub loader: &'a AccountInfo<'info>,
}

pub fn upgrade(accounts: Upgrade<'_, '_>, signer_seeds: &[&[u8]]) -> Result<()> {
    invoke_signed(
        &bpf_loader_upgradeable::upgrade(
            accounts.program.key,
            accounts.buffer.key,
            accounts.authority.key,
            accounts.spill.key,
        ),
        &[
            accounts.program_data.clone(),
            accounts.program.clone(),
            accounts.buffer.clone(),
            accounts.spill.clone(),
            accounts.rent.clone(),
            accounts.clock.clone(),
            accounts.authority.clone(),
            accounts.loader.clone(),
        ],
        &[signer_seeds],
    )
    .map_err(Into::into)
}

/// SPL token transfer out of an account whose owner is the delegated authority.
pub fn token_transfer<'info>(
    token_program: &AccountInfo<'info>,
    from: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    authority: &AccountInfo<'info>,
    amount: u64,
    signer_seeds: &[&[u8]],
) -> Result<()> {
    token::transfer(
        CpiContext::new_with_signer(
            token_program.clone(),
            token::Transfer {
                from: from.clone(),
                to: to.clone(),
                authority: authority.clone(),
            },
            &[signer_seeds],
        ),
        amount,
    )
}

/// Hand the owner field of a token account over to `new_owner`.
pub fn token_set_owner<'info>(
    token_program: &AccountInfo<'info>,
    account: &AccountInfo<'info>,
    authority: &AccountInfo<'info>,
    new_owner: Pubkey,
    signer_seeds: &[&[u8]],
) -> Result<()> {
    token::set_authority(
        CpiContext::new_with_signer(
            token_program.clone(),
            token::SetAuthority {
                current_authority: authority.clone(),
                account_or_mint: account.clone(),
            },
            &[signer_seeds],
        ),
        AuthorityType::AccountOwner,
        Some(new_owner),
    )
}
