// SPDX-License-Identifier: MIT
#![allow(unexpected_cfgs)]
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
//! Fee collector: a PDA that holds protocol token accounts and, optionally, a program's upgrade
//! authority. Only the recorded admin can move what it holds.
use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};
use delegated_authority::custody::{check_held_accounts, CustodyViolation};
use delegated_authority::loader::{account_state, program_data_address};
use delegated_authority::{cpi, DelegatedAuthority, LoaderState, UpgradeableLoader};

pub mod error;
pub mod events;
pub mod state;

use error::FeeCollectorError;
use events::*;
pub use state::FeeCollector;

declare_id!("D8c4SPhrSMMRokH65CSepDNYjabAVRQb8ZFwBKWckzDC");

/// Upper bound on token accounts handed over in one instruction.
pub const MAX_TOKEN_ACCOUNTS: usize = 8;

#[program]
pub mod fee_collector {
    use super::*;

    pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
        let authority = DelegatedAuthority::derive(ctx.program_id, FeeCollector::SEED_PREFIX)
            .ok_or(error!(FeeCollectorError::DerivationFailure))?;
        require!(
            authority.is(&ctx.accounts.collector.key())
                && authority.bump() == ctx.bumps.collector,
            FeeCollectorError::DerivationFailure
        );

        let collector = &mut ctx.accounts.collector;
        collector.bump = authority.bump();
        collector.admin = ctx.accounts.payer.key();
        collector.total_transferred = 0;

        emit!(FeeCollectorInitialized {
            collector: authority.address(),
            admin: collector.admin,
        });
        Ok(())
    }

    /// Moves `amount` out of a collector-held token account.
    pub fn transfer(ctx: Context<Transfer>, amount: u64) -> Result<()> {
        let authority = ctx.accounts.collector.delegated_authority()?;
        let source = &ctx.accounts.source;
        require_keys_eq!(
            source.owner,
            authority.address(),
            FeeCollectorError::AuthorityMismatch
        );
        require_keys_eq!(
            ctx.accounts.destination.mint,
            source.mint,
            FeeCollectorError::MintMismatch
        );
        require!(
            amount <= source.amount,
            FeeCollectorError::InsufficientFunds
        );

        cpi::token_transfer(
            &ctx.accounts.token_program.to_account_info(),
            &source.to_account_info(),
            &ctx.accounts.destination.to_account_info(),
            &ctx.accounts.collector.to_account_info(),
            amount,
            &authority.signer_seeds(),
        )?;

        let collector = &mut ctx.accounts.collector;
        collector.total_transferred = collector.total_transferred.saturating_add(amount);
        emit!(TransferEvent {
            signer: ctx.accounts.admin.key(),
            token: ctx.accounts.source.mint,
            destination: ctx.accounts.destination.key(),
            amount,
        });
        Ok(())
    }

    /// Hands every token account passed as a remaining account to `destination`. Either all of
    /// them move or none does.
    ///
    /// The collector keeps no list of the accounts it holds: the batch is whatever the admin
    /// supplies, at most `MAX_TOKEN_ACCOUNTS` per call. Accounts left out stay with the collector.
    pub fn transfer_token_accounts<'info>(
        ctx: Context<'_, '_, 'info, 'info, TransferTokenAccounts<'info>>,
    ) -> Result<()> {
        let authority = ctx.accounts.collector.delegated_authority()?;
        let held = ctx.remaining_accounts;
        check_held_accounts(held, &authority.address(), MAX_TOKEN_ACCOUNTS)
            .map_err(custody_error)?;

        let token_program = ctx.accounts.token_program.to_account_info();
        let collector = ctx.accounts.collector.to_account_info();
        let destination = ctx.accounts.destination.key();
        for info in held {
            cpi::token_set_owner(
                &token_program,
                info,
                &collector,
                destination,
                &authority.signer_seeds(),
            )?;
        }

        emit!(TransferTokenAccountsEvent {
            signer: ctx.accounts.admin.key(),
            accounts: held.iter().map(|info| info.key()).collect(),
            destination,
        });
        Ok(())
    }

    /// Moves the upgrade authority of a program the collector currently controls.
    pub fn change_upgrade_authority(ctx: Context<ChangeUpgradeAuthority>) -> Result<()> {
        let authority = ctx.accounts.collector.delegated_authority()?;
        let program = ctx.accounts.program_account.key();
        require_keys_eq!(
            ctx.accounts.program_data.key(),
            program_data_address(&program),
            FeeCollectorError::InvalidProgramData
        );
        match account_state(&ctx.accounts.program_data) {
            Some(LoaderState::ProgramData { authority: current, .. }) => require!(
                current == Some(authority.address()),
                FeeCollectorError::AuthorityMismatch
            ),
            _ => return err!(FeeCollectorError::InvalidLoaderState),
        }

        let collector = ctx.accounts.collector.to_account_info();
        cpi::set_upgrade_authority(
            cpi::SetUpgradeAuthority {
                program: &ctx.accounts.program_account,
                program_data: &ctx.accounts.program_data,
                current_authority: &collector,
                new_authority: &ctx.accounts.destination,
                loader: &ctx.accounts.bpf_loader_upgradeable.to_account_info(),
            },
            &authority.signer_seeds(),
        )?;

        emit!(UpgradeAuthorityChanged {
            program,
            previous_authority: authority.address(),
            new_authority: ctx.accounts.destination.key(),
        });
        Ok(())
    }

    pub fn set_admin(ctx: Context<SetAdmin>, new_admin: Pubkey) -> Result<()> {
        let collector = &mut ctx.accounts.collector;
        let previous_admin = collector.admin;
        collector.admin = new_admin;
        emit!(AdminChanged {
            previous_admin,
            new_admin,
        });
        Ok(())
    }
}

fn custody_error(violation: CustodyViolation) -> Error {
    match violation {
        CustodyViolation::Empty => error!(FeeCollectorError::NoTokenAccounts),
        CustodyViolation::TooMany => error!(FeeCollectorError::TooManyTokenAccounts),
        CustodyViolation::Duplicate(_) => error!(FeeCollectorError::DuplicateTokenAccount),
        CustodyViolation::NotTokenAccount(key) | CustodyViolation::NotHeld(key) => {
            msg!("custody: not held {}", key);
            error!(FeeCollectorError::InvalidTokenAccount)
        }
    }
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    #[account(
        init,
        payer = payer,
        space = FeeCollector::LEN,
        seeds = [FeeCollector::SEED_PREFIX],
        bump
    )]
    pub collector: Box<Account<'info, FeeCollector>>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct Transfer<'info> {
    pub admin: Signer<'info>,
    #[account(
        mut,
        seeds = [FeeCollector::SEED_PREFIX],
        bump = collector.bump,
        has_one = admin @ FeeCollectorError::Unauthorized
    )]
    pub collector: Box<Account<'info, FeeCollector>>,
    #[account(mut)]
    pub source: Box<Account<'info, TokenAccount>>,
    #[account(mut)]
    pub destination: Box<Account<'info, TokenAccount>>,
    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct TransferTokenAccounts<'info> {
    pub admin: Signer<'info>,
    #[account(
        seeds = [FeeCollector::SEED_PREFIX],
        bump = collector.bump,
        has_one = admin @ FeeCollectorError::Unauthorized
    )]
    pub collector: Box<Account<'info, FeeCollector>>,
    /// CHECK: new owner of the handed-over accounts.
    pub destination: UncheckedAccount<'info>,
    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct ChangeUpgradeAuthority<'info> {
    pub admin: Signer<'info>,
    #[account(
        seeds = [FeeCollector::SEED_PREFIX],
        bump = collector.bump,
        has_one = admin @ FeeCollectorError::Unauthorized
    )]
    pub collector: Box<Account<'info, FeeCollector>>,
    /// CHECK: program whose upgrade authority moves.
    pub program_account: UncheckedAccount<'info>,
    /// CHECK: must be the loader's programdata account for `program_account`.
    #[account(mut)]
    pub program_data: UncheckedAccount<'info>,
    /// CHECK: new upgrade authority.
    pub destination: UncheckedAccount<'info>,
    pub bpf_loader_upgradeable: Program<'info, UpgradeableLoader>,
}

#[derive(Accounts)]
pub struct SetAdmin<'info> {
    pub admin: Signer<'info>,
    #[account(
        mut,
        seeds = [FeeCollector::SEED_PREFIX],
        bump = collector.bump,
        has_one = admin @ FeeCollectorError::Unauthorized
    )]
    pub collector: Box<Account<'info, FeeCollector>>,
}
