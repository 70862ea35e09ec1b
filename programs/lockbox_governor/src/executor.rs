// SPDX-License-Identifier: MIT
//! Executes approved governance actions, signing as the governor's delegated authority.
use anchor_lang::prelude::*;
use delegated_authority::custody::{check_held_accounts, CustodyViolation};
use delegated_authority::loader::{account_state, program_data_address};
use delegated_authority::{cpi, DelegatedAuthority, LoaderState};

use crate::error::GovernorError;
use crate::events::*;
use crate::governance::ApprovedAction;
use crate::message::{GovernanceAction, MAX_TOKEN_ACCOUNTS};
use crate::state::Config;
use crate::{SetUpgradeAuthority, Transfer, TransferTokenAccounts, UpgradeProgram};

pub(crate) fn set_upgrade_authority(
    approved: ApprovedAction,
    accounts: &SetUpgradeAuthority<'_>,
) -> Result<()> {
    let authority = accounts.governance.config.delegated_authority()?;
    let program = accounts.program_account.key();
    require_keys_eq!(
        accounts.program_data.key(),
        program_data_address(&program),
        GovernorError::InvalidProgramData
    );
    match account_state(&accounts.program_data) {
        Some(LoaderState::ProgramData { authority: current, .. }) => require!(
            current == Some(authority.address()),
            GovernorError::AuthorityMismatch
        ),
        _ => return err!(GovernorError::InvalidLoaderState),
    }

    let config = accounts.governance.config.to_account_info();
    cpi::set_upgrade_authority(
        cpi::SetUpgradeAuthority {
            program: &accounts.program_account,
            program_data: &accounts.program_data,
            current_authority: &config,
            new_authority: &accounts.destination,
            loader: &accounts.bpf_loader_upgradeable.to_account_info(),
        },
        &authority.signer_seeds(),
    )?;

    emit!(UpgradeAuthorityChanged {
        sequence: approved.sequence(),
        program,
        previous_authority: authority.address(),
        new_authority: accounts.destination.key(),
    });
    Ok(())
}

pub(crate) fn upgrade_program(approved: ApprovedAction, accounts: &UpgradeProgram<'_>) -> Result<()> {
    let authority = accounts.governance.config.delegated_authority()?;
    let program = accounts.program_account.key();
    require_keys_eq!(
        accounts.program_data.key(),
        program_data_address(&program),
        GovernorError::InvalidProgramData
    );
    require_loader_authority(&accounts.program_data, &authority, true)?;
    require_loader_authority(&accounts.buffer, &authority, false)?;

    let config = accounts.governance.config.to_account_info();
    cpi::upgrade(
        cpi::Upgrade {
            program: &accounts.program_account,
            program_data: &accounts.program_data,
            buffer: &accounts.buffer,
            spill: &accounts.spill,
            rent: &accounts.rent.to_account_info(),
            clock: &accounts.clock.to_account_info(),
            authority: &config,
            loader: &accounts.bpf_loader_upgradeable.to_account_info(),
        },
        &authority.signer_seeds(),
    )?;

    emit!(ProgramUpgraded {
        sequence: approved.sequence(),
        program,
        buffer: accounts.buffer.key(),
        spill: accounts.spill.key(),
    });
    Ok(())
}

pub(crate) fn transfer(approved: ApprovedAction, accounts: &Transfer<'_>) -> Result<()> {
    let amount = match approved.action() {
        GovernanceAction::Transfer { amount, .. } => *amount,
        _ => return err!(GovernorError::ActionHashMismatch),
    };
    let authority = accounts.governance.config.delegated_authority()?;
    let source = &accounts.source;
    require_keys_eq!(
        source.owner,
        authority.address(),
        GovernorError::AuthorityMismatch
    );
    require_keys_eq!(
        accounts.destination.mint,
        source.mint,
        GovernorError::MintMismatch
    );
    require!(amount <= source.amount, GovernorError::InsufficientFunds);

    cpi::token_transfer(
        &accounts.token_program.to_account_info(),
        &source.to_account_info(),
        &accounts.destination.to_account_info(),
        &accounts.governance.config.to_account_info(),
        amount,
        &authority.signer_seeds(),
    )?;

    emit!(TokensTransferred {
        sequence: approved.sequence(),
        mint: source.mint,
        source: source.key(),
        destination: accounts.destination.key(),
        amount,
    });
    Ok(())
}

pub(crate) fn transfer_token_accounts<'info>(
    approved: ApprovedAction,
    accounts: &TransferTokenAccounts<'info>,
    held: &[AccountInfo<'info>],
) -> Result<()> {
    let authority = accounts.governance.config.delegated_authority()?;
    check_held_accounts(held, &authority.address(), MAX_TOKEN_ACCOUNTS)
        .map_err(custody_error)?;

    let token_program = accounts.token_program.to_account_info();
    let config = accounts.governance.config.to_account_info();
    let destination = accounts.destination.key();
    for info in held {
        cpi::token_set_owner(
            &token_program,
            info,
            &config,
            destination,
            &authority.signer_seeds(),
        )?;
    }

    emit!(TokenAccountsTransferred {
        sequence: approved.sequence(),
        destination,
        accounts: held.iter().map(|info| info.key()).collect(),
    });
    Ok(())
}

pub(crate) fn set_governance_emitter(approved: ApprovedAction, config: &mut Config) -> Result<()> {
    let (chain, address) = match approved.action() {
        GovernanceAction::SetGovernanceEmitter { chain, address } => (*chain, *address),
        _ => return err!(GovernorError::ActionHashMismatch),
    };
    require!(address != [0u8; 32], GovernorError::InvalidEmitter);

    let previous_chain = config.allowed_emitter_chain;
    let previous_address = config.allowed_emitter_address;
    config.allowed_emitter_chain = chain;
    config.allowed_emitter_address = address;

    emit!(EmitterUpdated {
        sequence: approved.sequence(),
        previous_chain,
        previous_address,
        chain,
        address,
    });
    Ok(())
}

fn require_loader_authority(
    info: &AccountInfo<'_>,
    authority: &DelegatedAuthority,
    program_data: bool,
) -> Result<()> {
    let current = match (account_state(info), program_data) {
        (Some(state @ LoaderState::ProgramData { .. }), true)
        | (Some(state @ LoaderState::Buffer { .. }), false) => state.authority(),
        _ => return err!(GovernorError::InvalidLoaderState),
    };
    require!(
        current == Some(authority.address()),
        GovernorError::AuthorityMismatch
    );
    Ok(())
}

fn custody_error(violation: CustodyViolation) -> Error {
    match violation {
        CustodyViolation::Empty => error!(GovernorError::NoTokenAccounts),
        CustodyViolation::TooMany => error!(GovernorError::TooManyTokenAccounts),
        CustodyViolation::Duplicate(key) => {
            msg!("custody: duplicate {}", key);
            error!(GovernorError::DuplicateTokenAccount)
        }
        CustodyViolation::NotTokenAccount(key) | CustodyViolation::NotHeld(key) => {
            msg!("custody: not held {}", key);
            error!(GovernorError::InvalidTokenAccount)
        }
    }
}
