// SPDX-License-Identifier: MIT
//! Replay ledger: one `Received` marker per (emitter chain, sequence).
//!
//! The marker is created inside the same transaction that executes the action, so a message is
//! either applied and marked, or neither. Creation goes through the system program, which refuses
//! an address already in use; together with the runtime write lock on the marker this makes
//! concurrent submissions of one message serialize, and the loser observes the record.
use anchor_lang::prelude::*;
use anchor_lang::solana_program::{program::invoke, program::invoke_signed, system_instruction};

use crate::error::GovernorError;
use crate::governance::ApprovedAction;
use crate::state::Received;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Fresh,
    AlreadyProcessed,
}

pub struct ReplayLedger<'a, 'info> {
    payer: &'a AccountInfo<'info>,
    system_program: &'a AccountInfo<'info>,
}

impl<'a, 'info> ReplayLedger<'a, 'info> {
    pub fn new(payer: &'a AccountInfo<'info>, system_program: &'a AccountInfo<'info>) -> Self {
        Self {
            payer,
            system_program,
        }
    }

    /// Records `approved` as applied, or reports that the same message already was. A marker left
    /// by a different message under the same key is a `SequenceCollision`.
    pub fn try_mark(
        &self,
        marker: &AccountInfo<'info>,
        approved: &ApprovedAction,
    ) -> Result<Mark> {
        let (expected, bump) = Received::address(approved.emitter_chain(), approved.sequence());
        require_keys_eq!(
            marker.key(),
            expected,
            GovernorError::InvalidReceivedAccount
        );

        if marker.data_len() > 0 {
            require_keys_eq!(
                *marker.owner,
                crate::ID,
                GovernorError::InvalidReceivedAccount
            );
            let record = {
                let data = marker.try_borrow_data()?;
                Received::try_deserialize(&mut &data[..])
                    .map_err(|_| error!(GovernorError::InvalidReceivedAccount))?
            };
            require!(record.processed, GovernorError::InvalidReceivedAccount);
            // Sequences are per emitter: after a rotation a different message can land on a
            // key the previous emitter already used.
            if record.vaa_hash != approved.vaa_hash()
                || record.action_hash != approved.action_hash()
            {
                msg!(
                    "replay:collision chain={} sequence={}",
                    record.emitter_chain,
                    record.sequence
                );
                return err!(GovernorError::SequenceCollision);
            }
            msg!(
                "replay:duplicate chain={} sequence={}",
                record.emitter_chain,
                record.sequence
            );
            return Ok(Mark::AlreadyProcessed);
        }

        self.claim(marker, approved, bump)?;
        let record = Received {
            processed: true,
            emitter_chain: approved.emitter_chain(),
            sequence: approved.sequence(),
            action_hash: approved.action_hash(),
            vaa_hash: approved.vaa_hash(),
        };
        {
            let mut data = marker.try_borrow_mut_data()?;
            let mut writer: &mut [u8] = &mut data[..];
            record.try_serialize(&mut writer)?;
        }
        msg!(
            "replay:create chain={} sequence={}",
            record.emitter_chain,
            record.sequence
        );
        Ok(Mark::Fresh)
    }

    fn claim(&self, marker: &AccountInfo<'info>, approved: &ApprovedAction, bump: u8) -> Result<()> {
        let chain = approved.emitter_chain().to_le_bytes();
        let sequence = approved.sequence().to_le_bytes();
        let bump = [bump];
        let seeds: &[&[u8]] = &[Received::SEED_PREFIX, &chain, &sequence, &bump];
        let space = Received::MAXIMUM_SIZE;
        let required = Rent::get()?.minimum_balance(space);
        let accounts = [
            self.payer.clone(),
            marker.clone(),
            self.system_program.clone(),
        ];

        let current = marker.lamports();
        if current == 0 {
            invoke_signed(
                &system_instruction::create_account(
                    self.payer.key,
                    marker.key,
                    required,
                    space as u64,
                    &crate::ID,
                ),
                &accounts,
                &[seeds],
            )?;
            return Ok(());
        }

        // Someone pre-funded the address: create_account would fail on it.
        if required > current {
            invoke(
                &system_instruction::transfer(self.payer.key, marker.key, required - current),
                &accounts,
            )?;
        }
        invoke_signed(
            &system_instruction::allocate(marker.key, space as u64),
            &accounts[1..],
            &[seeds],
        )?;
        invoke_signed(
            &system_instruction::assign(marker.key, &crate::ID),
            &accounts[1..],
            &[seeds],
        )?;
        Ok(())
    }
}
