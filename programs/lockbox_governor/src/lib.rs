// SPDX-License-Identifier: MIT
#![allow(unexpected_cfgs)]
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
//! Lockbox governor: applies privileged actions certified by Wormhole governance VAAs.
//!
//! Every governed instruction rebuilds its action from the submitted accounts and arguments,
//! checks it against the action hash carried by the posted VAA, records the VAA in the replay
//! ledger and only then executes, signing as the `config` PDA. A VAA that was already applied
//! makes the instruction a successful no-op.
use anchor_lang::prelude::*;
use anchor_lang::solana_program::bpf_loader_upgradeable;
use anchor_spl::token::{Token, TokenAccount};
use delegated_authority::loader::account_state;
use delegated_authority::{DelegatedAuthority, LoaderState, UpgradeableLoader};

pub mod error;
pub mod events;
mod executor;
pub mod governance;
pub mod message;
pub mod posted_vaa;
pub mod replay;
pub mod state;

use error::GovernorError;
use events::GovernorInitialized;
use message::GovernanceAction;
pub use state::{Config, Received};

declare_id!("DWDGo2UkBUFZ3VitBfWRBMvRnHr7E2DSh57NK27xMYaB");

#[program]
pub mod lockbox_governor {
    use super::*;

    /// Creates the Config. When the governor is deployed through the upgradeable loader only its
    /// upgrade authority may initialize; an immutable or natively loaded deployment is open.
    pub fn initialize(ctx: Context<Initialize>, args: InitializeArgs) -> Result<()> {
        if let Some(LoaderState::ProgramData {
            authority: Some(deployer),
            ..
        }) = account_state(&ctx.accounts.program_data)
        {
            require_keys_eq!(
                ctx.accounts.payer.key(),
                deployer,
                GovernorError::UnauthorizedInitializer
            );
        }
        require!(
            args.emitter_address != [0u8; 32],
            GovernorError::InvalidEmitter
        );
        let authority = DelegatedAuthority::derive(ctx.program_id, Config::SEED_PREFIX)
            .ok_or(error!(GovernorError::DerivationFailure))?;
        require!(
            authority.is(&ctx.accounts.config.key()) && authority.bump() == ctx.bumps.config,
            GovernorError::DerivationFailure
        );

        let config = &mut ctx.accounts.config;
        config.wormhole_program = args.wormhole_program;
        config.allowed_emitter_chain = args.emitter_chain;
        config.allowed_emitter_address = args.emitter_address;
        config.messages_processed = 0;
        config.authority_bump = authority.bump();

        emit!(GovernorInitialized {
            config: authority.address(),
            wormhole_program: args.wormhole_program,
            emitter_chain: args.emitter_chain,
            emitter_address: args.emitter_address,
        });
        Ok(())
    }

    pub fn set_upgrade_authority(
        ctx: Context<SetUpgradeAuthority>,
        vaa_hash: [u8; 32],
    ) -> Result<()> {
        let action = GovernanceAction::SetUpgradeAuthority {
            program: ctx.accounts.program_account.key(),
            destination: ctx.accounts.destination.key(),
        };
        match governance::admit(&mut ctx.accounts.governance, vaa_hash, action)? {
            Some(approved) => executor::set_upgrade_authority(approved, ctx.accounts),
            None => Ok(()),
        }
    }

    pub fn upgrade_program(ctx: Context<UpgradeProgram>, vaa_hash: [u8; 32]) -> Result<()> {
        let action = GovernanceAction::UpgradeProgram {
            program: ctx.accounts.program_account.key(),
            buffer: ctx.accounts.buffer.key(),
            spill: ctx.accounts.spill.key(),
        };
        match governance::admit(&mut ctx.accounts.governance, vaa_hash, action)? {
            Some(approved) => executor::upgrade_program(approved, ctx.accounts),
            None => Ok(()),
        }
    }

    pub fn transfer(ctx: Context<Transfer>, vaa_hash: [u8; 32], amount: u64) -> Result<()> {
        let action = GovernanceAction::Transfer {
            source: ctx.accounts.source.key(),
            destination: ctx.accounts.destination.key(),
            amount,
        };
        match governance::admit(&mut ctx.accounts.governance, vaa_hash, action)? {
            Some(approved) => executor::transfer(approved, ctx.accounts),
            None => Ok(()),
        }
    }

    /// Hands the token accounts passed as remaining accounts, in order, to `destination`.
    pub fn transfer_token_accounts<'info>(
        ctx: Context<'_, '_, 'info, 'info, TransferTokenAccounts<'info>>,
        vaa_hash: [u8; 32],
    ) -> Result<()> {
        let action = GovernanceAction::TransferTokenAccounts {
            accounts: ctx.remaining_accounts.iter().map(|a| a.key()).collect(),
            destination: ctx.accounts.destination.key(),
        };
        match governance::admit(&mut ctx.accounts.governance, vaa_hash, action)? {
            Some(approved) => {
                executor::transfer_token_accounts(approved, ctx.accounts, ctx.remaining_accounts)
            }
            None => Ok(()),
        }
    }

    pub fn set_governance_emitter(
        ctx: Context<SetGovernanceEmitter>,
        vaa_hash: [u8; 32],
        chain: u16,
        address: [u8; 32],
    ) -> Result<()> {
        let action = GovernanceAction::SetGovernanceEmitter { chain, address };
        match governance::admit(&mut ctx.accounts.governance, vaa_hash, action)? {
            Some(approved) => {
                executor::set_governance_emitter(approved, &mut ctx.accounts.governance.config)
            }
            None => Ok(()),
        }
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct InitializeArgs {
    pub wormhole_program: Pubkey,
    pub emitter_chain: u16,
    pub emitter_address: [u8; 32],
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    #[account(
        init,
        payer = payer,
        space = Config::MAXIMUM_SIZE,
        seeds = [Config::SEED_PREFIX],
        bump
    )]
    pub config: Box<Account<'info, Config>>,
    /// CHECK: the governor's own programdata; may be absent when not deployed by the loader.
    #[account(
        seeds = [crate::ID.as_ref()],
        bump,
        seeds::program = bpf_loader_upgradeable::id(),
    )]
    pub program_data: UncheckedAccount<'info>,
    pub system_program: Program<'info, System>,
}

/// Accounts shared by every governed instruction.
#[derive(Accounts)]
pub struct Governance<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    #[account(mut, seeds = [Config::SEED_PREFIX], bump = config.authority_bump)]
    pub config: Box<Account<'info, Config>>,
    /// CHECK: posted VAA; owner checked here, address and layout checked in `governance::admit`.
    #[account(owner = config.wormhole_program @ GovernorError::InvalidPostedMessage)]
    pub posted: UncheckedAccount<'info>,
    /// CHECK: replay marker, created or verified by the replay ledger.
    #[account(mut)]
    pub received: UncheckedAccount<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct SetUpgradeAuthority<'info> {
    pub governance: Governance<'info>,
    /// CHECK: bound by the action hash.
    pub program_account: UncheckedAccount<'info>,
    /// CHECK: must be the loader's programdata account for `program_account`.
    #[account(mut)]
    pub program_data: UncheckedAccount<'info>,
    /// CHECK: new upgrade authority, bound by the action hash.
    pub destination: UncheckedAccount<'info>,
    pub bpf_loader_upgradeable: Program<'info, UpgradeableLoader>,
}

#[derive(Accounts)]
pub struct UpgradeProgram<'info> {
    pub governance: Governance<'info>,
    /// CHECK: bound by the action hash.
    #[account(mut)]
    pub program_account: UncheckedAccount<'info>,
    /// CHECK: must be the loader's programdata account for `program_account`.
    #[account(mut)]
    pub program_data: UncheckedAccount<'info>,
    /// CHECK: loader buffer, bound by the action hash; authority checked by the executor.
    #[account(mut)]
    pub buffer: UncheckedAccount<'info>,
    /// CHECK: receives the buffer's lamports, bound by the action hash.
    #[account(mut)]
    pub spill: UncheckedAccount<'info>,
    pub rent: Sysvar<'info, Rent>,
    pub clock: Sysvar<'info, Clock>,
    pub bpf_loader_upgradeable: Program<'info, UpgradeableLoader>,
}

#[derive(Accounts)]
pub struct Transfer<'info> {
    pub governance: Governance<'info>,
    #[account(mut)]
    pub source: Box<Account<'info, TokenAccount>>,
    #[account(mut)]
    pub destination: Box<Account<'info, TokenAccount>>,
    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct TransferTokenAccounts<'info> {
    pub governance: Governance<'info>,
    /// CHECK: new owner, bound by the action hash.
    pub destination: UncheckedAccount<'info>,
    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct SetGovernanceEmitter<'info> {
    pub governance: Governance<'info>,
}
