// SPDX-License-Identifier: MIT
//! Read-only view of BPF Loader Upgradeable account state.
//!
//! Layout (bincode): `u32` LE variant tag, then
//! * `1` Buffer: `Option<Pubkey>` authority
//! * `2` Program: programdata `Pubkey`
//! * `3` ProgramData: `u64` LE slot, `Option<Pubkey>` upgrade authority
//!
//! `Option<Pubkey>` is a one byte tag followed by 32 bytes when present.
use anchor_lang::prelude::*;
use anchor_lang::solana_program::bpf_loader_upgradeable;

const TAG_UNINITIALIZED: u32 = 0;
const TAG_BUFFER: u32 = 1;
const TAG_PROGRAM: u32 = 2;
const TAG_PROGRAM_DATA: u32 = 3;

/// Size of the ProgramData header that precedes the ELF.
pub const PROGRAM_DATA_METADATA_LEN: usize = 4 + 8 + 1 + 32;
/// Size of the Buffer header that precedes the ELF.
pub const BUFFER_METADATA_LEN: usize = 4 + 1 + 32;

#[derive(Debug, Clone)]
pub struct UpgradeableLoader;

impl anchor_lang::Id for UpgradeableLoader {
    fn id() -> Pubkey {
        bpf_loader_upgradeable::id()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    Uninitialized,
    Buffer { authority: Option<Pubkey> },
    Program { program_data: Pubkey },
    ProgramData { slot: u64, authority: Option<Pubkey> },
}

impl LoaderState {
    pub fn parse(data: &[u8]) -> Option<Self> {
        let (tag, rest) = split_array::<4>(data)?;
        match u32::from_le_bytes(tag) {
            TAG_UNINITIALIZED => Some(Self::Uninitialized),
            TAG_BUFFER => {
                let (authority, _) = read_optional_key(rest)?;
                Some(Self::Buffer { authority })
            }
            TAG_PROGRAM => {
                let (key, _) = split_array::<32>(rest)?;
                Some(Self::Program {
                    program_data: Pubkey::new_from_array(key),
                })
            }
            TAG_PROGRAM_DATA => {
                let (slot, rest) = split_array::<8>(rest)?;
                let (authority, _) = read_optional_key(rest)?;
                Some(Self::ProgramData {
                    slot: u64::from_le_bytes(slot),
                    authority,
                })
            }
            _ => None,
        }
    }

    /// Authority of a buffer or programdata account. `None` for the other variants and for
    /// immutable (authority-less) accounts.
    pub fn authority(&self) -> Option<Pubkey> {
        match self {
            Self::Buffer { authority } | Self::ProgramData { authority, .. } => *authority,
            _ => None,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PROGRAM_DATA_METADATA_LEN);
        match self {
            Self::Uninitialized => out.extend_from_slice(&TAG_UNINITIALIZED.to_le_bytes()),
            Self::Buffer { authority } => {
                out.extend_from_slice(&TAG_BUFFER.to_le_bytes());
                write_optional_key(&mut out, authority);
            }
            Self::Program { program_data } => {
                out.extend_from_slice(&TAG_PROGRAM.to_le_bytes());
                out.extend_from_slice(program_data.as_ref());
            }
            Self::ProgramData { slot, authority } => {
                out.extend_from_slice(&TAG_PROGRAM_DATA.to_le_bytes());
                out.extend_from_slice(&slot.to_le_bytes());
                write_optional_key(&mut out, authority);
            }
        }
        out
    }
}

/// Address of the programdata account the loader keeps for `program`.
pub fn program_data_address(program: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[program.as_ref()], &bpf_loader_upgradeable::id()).0
}

/// State of a loader-owned account. `None` if the account is not owned by the loader or does not
/// parse.
pub fn account_state(info: &AccountInfo<'_>) -> Option<LoaderState> {
    if *info.owner != bpf_loader_upgradeable::id() {
        return None;
    }
    let data = info.try_borrow_data().ok()?;
    LoaderState::parse(&data)
}

fn split_array<const N: usize>(data: &[u8]) -> Option<([u8; N], &[u8])> {
    if data.len() < N {
        return None;
    }
    let (head, rest) = data.split_at(N);
    head.try_into().ok().map(|arr| (arr, rest))
}

fn read_optional_key(data: &[u8]) -> Option<(Option<Pubkey>, &[u8])> {
    let (tag, rest) = split_array::<1>(data)?;
    match tag[0] {
        0 => Some((None, rest)),
        1 => {
            let (key, rest) = split_array::<32>(rest)?;
            Some((Some(Pubkey::new_from_array(key)), rest))
        }
        _ => None,
    }
}

fn write_optional_key(out: &mut Vec<u8>, key: &Option<Pubkey>) {
    match key {
        Some(key) => {
            out.push(1);
            out.extend_from_slice(key.as_ref());
        }
        None => out.push(0),
    }
}
