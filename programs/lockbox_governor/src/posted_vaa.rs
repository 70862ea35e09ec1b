// SPDX-License-Identifier: MIT
//! Zero-copy reader for the Core Bridge `PostedVaaV1` account.
//!
//! The account is written by the bridge once guardian signatures are verified; this program
//! only reads the emitter, sequence and payload.
use anchor_lang::prelude::*;

use crate::error::GovernorError;

pub const POSTED_VAA_SEED_PREFIX: &[u8] = b"PostedVAA";
pub const POSTED_VAA_DISCRIMINATOR: [u8; 4] = *b"vaa\x01";

const DISC_LEN: usize = POSTED_VAA_DISCRIMINATOR.len();
const SEQUENCE: usize = 45;
const EMITTER_CHAIN: usize = 53;
const EMITTER_ADDRESS: usize = 55;
const PAYLOAD_LEN: usize = 87;
/// Bytes between the discriminator and the payload.
pub const POSTED_VAA_HEADER_LEN: usize = 91;

pub struct PostedVaaV1<'a> {
    header: &'a [u8],
    payload: &'a [u8],
}

impl<'a> PostedVaaV1<'a> {
    pub fn parse(span: &'a [u8]) -> Result<Self> {
        require!(
            span.len() >= DISC_LEN + POSTED_VAA_HEADER_LEN,
            GovernorError::InvalidPostedMessage
        );
        require!(
            span[..DISC_LEN] == POSTED_VAA_DISCRIMINATOR,
            GovernorError::InvalidPostedMessage
        );
        let body = &span[DISC_LEN..];
        let payload_len = u32::from_le_bytes(read::<4>(body, PAYLOAD_LEN)) as usize;
        let payload = body[POSTED_VAA_HEADER_LEN..]
            .get(..payload_len)
            .ok_or(error!(GovernorError::InvalidPostedMessage))?;
        Ok(Self {
            header: &body[..POSTED_VAA_HEADER_LEN],
            payload,
        })
    }

    pub fn sequence(&self) -> u64 {
        u64::from_le_bytes(read::<8>(self.header, SEQUENCE))
    }

    pub fn emitter_chain(&self) -> u16 {
        u16::from_le_bytes(read::<2>(self.header, EMITTER_CHAIN))
    }

    pub fn emitter_address(&self) -> [u8; 32] {
        read::<32>(self.header, EMITTER_ADDRESS)
    }

    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }
}

/// Address the bridge posts a VAA with the given message hash to.
pub fn posted_vaa_address(wormhole_program: &Pubkey, vaa_hash: &[u8; 32]) -> Pubkey {
    Pubkey::find_program_address(&[POSTED_VAA_SEED_PREFIX, vaa_hash], wormhole_program).0
}

// Offsets are inside the header slice, whose length parse() already checked.
fn read<const N: usize>(header: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&header[offset..offset + N]);
    out
}
