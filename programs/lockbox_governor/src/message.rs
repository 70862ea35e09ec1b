// SPDX-License-Identifier: MIT
//! Governance actions and the hash a governance VAA certifies for them.
//!
//! A governance VAA does not carry instructions. Its payload is the keccak-256 of the canonical
//! encoding of exactly one action; the caller rebuilds the action from the accounts and
//! arguments it submits and the program only proceeds when the two hashes agree.
use anchor_lang::prelude::*;
use tiny_keccak::{Hasher, Keccak};

pub const ACTION_TRANSFER: u8 = 0;
pub const ACTION_TRANSFER_TOKEN_ACCOUNTS: u8 = 1;
pub const ACTION_SET_UPGRADE_AUTHORITY: u8 = 2;
pub const ACTION_UPGRADE_PROGRAM: u8 = 3;
pub const ACTION_SET_GOVERNANCE_EMITTER: u8 = 4;

/// Governance payload length: a bare action hash.
pub const GOVERNANCE_PAYLOAD_LEN: usize = 32;

/// Upper bound on accounts handed over by one `TransferTokenAccounts` (count is encoded as u8).
pub const MAX_TOKEN_ACCOUNTS: usize = 8;

pub fn keccak256(parts: &[&[u8]]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut hasher = Keccak::v256();
    for p in parts {
        hasher.update(p);
    }
    hasher.finalize(&mut out);
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GovernanceAction {
    /// Move `amount` from a governor-held token account.
    Transfer {
        source: Pubkey,
        destination: Pubkey,
        amount: u64,
    },
    /// Give up ownership of governor-held token accounts.
    TransferTokenAccounts {
        accounts: Vec<Pubkey>,
        destination: Pubkey,
    },
    SetUpgradeAuthority {
        program: Pubkey,
        destination: Pubkey,
    },
    UpgradeProgram {
        program: Pubkey,
        buffer: Pubkey,
        spill: Pubkey,
    },
    SetGovernanceEmitter {
        chain: u16,
        address: [u8; 32],
    },
}

impl GovernanceAction {
    pub fn selector(&self) -> u8 {
        match self {
            Self::Transfer { .. } => ACTION_TRANSFER,
            Self::TransferTokenAccounts { .. } => ACTION_TRANSFER_TOKEN_ACCOUNTS,
            Self::SetUpgradeAuthority { .. } => ACTION_SET_UPGRADE_AUTHORITY,
            Self::UpgradeProgram { .. } => ACTION_UPGRADE_PROGRAM,
            Self::SetGovernanceEmitter { .. } => ACTION_SET_GOVERNANCE_EMITTER,
        }
    }

    /// SCHEMA FROZEN. `selector u8 | governor [32] | fields`, integers big-endian.
    pub fn encode_for(&self, governor: &Pubkey) -> Vec<u8> {
        let mut buf = Vec::with_capacity(1 + 32 + 32 * 3);
        buf.push(self.selector());
        buf.extend_from_slice(governor.as_ref());
        match self {
            Self::Transfer {
                source,
                destination,
                amount,
            } => {
                buf.extend_from_slice(source.as_ref());
                buf.extend_from_slice(destination.as_ref());
                buf.extend_from_slice(&amount.to_be_bytes());
            }
            Self::TransferTokenAccounts {
                accounts,
                destination,
            } => {
                buf.extend_from_slice(destination.as_ref());
                // Counts past MAX_TOKEN_ACCOUNTS are rejected before hashing.
                buf.push(accounts.len().min(u8::MAX as usize) as u8);
                for account in accounts {
                    buf.extend_from_slice(account.as_ref());
                }
            }
            Self::SetUpgradeAuthority {
                program,
                destination,
            } => {
                buf.extend_from_slice(program.as_ref());
                buf.extend_from_slice(destination.as_ref());
            }
            Self::UpgradeProgram {
                program,
                buffer,
                spill,
            } => {
                buf.extend_from_slice(program.as_ref());
                buf.extend_from_slice(buffer.as_ref());
                buf.extend_from_slice(spill.as_ref());
            }
            Self::SetGovernanceEmitter { chain, address } => {
                buf.extend_from_slice(&chain.to_be_bytes());
                buf.extend_from_slice(address);
            }
        }
        buf
    }

    pub fn hash_for(&self, governor: &Pubkey) -> [u8; 32] {
        keccak256(&[&self.encode_for(governor)])
    }

    /// Hash as certified for this deployment.
    pub fn hash(&self) -> [u8; 32] {
        self.hash_for(&crate::ID)
    }
}

/// Action hash carried by a governance payload, `None` if the payload is not exactly one hash.
pub fn payload_action_hash(payload: &[u8]) -> Option<[u8; 32]> {
    payload.try_into().ok()
}
