// SPDX-License-Identifier: MIT
use anchor_lang::prelude::*;

#[error_code]
pub enum GovernorError {
    #[msg("Posted message does not come from the trusted governance emitter")]
    UntrustedSource,
    #[msg("Action does not match the hash certified by the posted message")]
    ActionHashMismatch,
    #[msg("Current authority is not the governor's delegated authority")]
    AuthorityMismatch,
    #[msg("Insufficient funds")]
    InsufficientFunds,
    #[msg("No valid bump for the delegated authority")]
    DerivationFailure,
    #[msg("Governance payload must be a single 32-byte action hash")]
    InvalidPayload,
    #[msg("Posted message account is not a verified VAA")]
    InvalidPostedMessage,
    #[msg("Received account does not match expected seeds")]
    InvalidReceivedAccount,
    #[msg("Program data account does not belong to the target program")]
    InvalidProgramData,
    #[msg("Unexpected upgradeable loader account state")]
    InvalidLoaderState,
    #[msg("Token mint mismatch")]
    MintMismatch,
    #[msg("No token accounts supplied")]
    NoTokenAccounts,
    #[msg("Too many token accounts in one hand-over")]
    TooManyTokenAccounts,
    #[msg("Token account listed twice")]
    DuplicateTokenAccount,
    #[msg("Account is not a token account held by the governor")]
    InvalidTokenAccount,
    #[msg("Governance emitter must be non-zero")]
    InvalidEmitter,
    #[msg("Sequence already consumed by a different governance message")]
    SequenceCollision,
    #[msg("Only the program's upgrade authority may initialize")]
    UnauthorizedInitializer,
}
