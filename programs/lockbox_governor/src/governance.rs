// SPDX-License-Identifier: MIT
//! Governance message validation.
//!
//! [`validate`] turns a posted VAA plus the caller's action into an [`ApprovedAction`];
//! [`admit`] additionally consults the replay ledger. An `ApprovedAction` can only be built here
//! and is consumed by value by the executor, so every privileged call has passed both.
use anchor_lang::prelude::*;

use crate::error::GovernorError;
use crate::events::{DuplicateMessageIgnored, MessageProcessed};
use crate::message::{payload_action_hash, GovernanceAction, MAX_TOKEN_ACCOUNTS};
use crate::posted_vaa::{posted_vaa_address, PostedVaaV1};
use crate::replay::{Mark, ReplayLedger};
use crate::state::Config;
use crate::Governance;

/// A validated, not yet executed, governance action.
#[derive(Debug)]
pub struct ApprovedAction {
    emitter_chain: u16,
    sequence: u64,
    action: GovernanceAction,
    action_hash: [u8; 32],
    vaa_hash: [u8; 32],
}

impl ApprovedAction {
    pub fn emitter_chain(&self) -> u16 {
        self.emitter_chain
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn action(&self) -> &GovernanceAction {
        &self.action
    }

    pub fn action_hash(&self) -> [u8; 32] {
        self.action_hash
    }

    pub fn vaa_hash(&self) -> [u8; 32] {
        self.vaa_hash
    }
}

/// Source, payload and action-hash checks, in that order.
pub fn validate(
    config: &Config,
    posted: &PostedVaaV1<'_>,
    vaa_hash: [u8; 32],
    action: GovernanceAction,
) -> Result<ApprovedAction> {
    require!(
        config.is_trusted(posted.emitter_chain(), &posted.emitter_address()),
        GovernorError::UntrustedSource
    );
    let certified =
        payload_action_hash(posted.payload()).ok_or(error!(GovernorError::InvalidPayload))?;
    if let GovernanceAction::TransferTokenAccounts { accounts, .. } = &action {
        require!(
            accounts.len() <= MAX_TOKEN_ACCOUNTS,
            GovernorError::TooManyTokenAccounts
        );
    }
    let action_hash = action.hash();
    require!(
        action_hash == certified,
        GovernorError::ActionHashMismatch
    );
    Ok(ApprovedAction {
        emitter_chain: posted.emitter_chain(),
        sequence: posted.sequence(),
        action,
        action_hash,
        vaa_hash,
    })
}

/// Validates the posted message and marks it in the replay ledger.
///
/// `Ok(None)` means the message was already applied; the caller must return without executing.
pub fn admit(
    governance: &mut Governance<'_>,
    vaa_hash: [u8; 32],
    action: GovernanceAction,
) -> Result<Option<ApprovedAction>> {
    require_keys_eq!(
        governance.posted.key(),
        posted_vaa_address(&governance.config.wormhole_program, &vaa_hash),
        GovernorError::InvalidPostedMessage
    );
    let approved = {
        let data = governance.posted.try_borrow_data()?;
        let posted = PostedVaaV1::parse(&data)?;
        validate(&governance.config, &posted, vaa_hash, action)?
    };

    let payer = governance.payer.to_account_info();
    let system_program = governance.system_program.to_account_info();
    let ledger = ReplayLedger::new(&payer, &system_program);
    match ledger.try_mark(&governance.received.to_account_info(), &approved)? {
        Mark::AlreadyProcessed => {
            emit!(DuplicateMessageIgnored {
                emitter_chain: approved.emitter_chain,
                sequence: approved.sequence,
                action_hash: approved.action_hash,
            });
            Ok(None)
        }
        Mark::Fresh => {
            let config = &mut governance.config;
            config.messages_processed = config.messages_processed.saturating_add(1);
            emit!(MessageProcessed {
                emitter_chain: approved.emitter_chain,
                sequence: approved.sequence,
                action: approved.action.selector(),
                action_hash: approved.action_hash,
                vaa_hash,
            });
            Ok(Some(approved))
        }
    }
}
