// SPDX-License-Identifier: MIT
use anchor_lang::prelude::*;

#[error_code]
pub enum FeeCollectorError {
    #[msg("Unauthorized")]
    Unauthorized,
    #[msg("Insufficient funds")]
    InsufficientFunds,
    #[msg("Current authority is not the fee collector")]
    AuthorityMismatch,
    #[msg("No valid bump for the fee collector")]
    DerivationFailure,
    #[msg("Token mint mismatch")]
    MintMismatch,
    #[msg("Program data account does not belong to the target program")]
    InvalidProgramData,
    #[msg("Unexpected upgradeable loader account state")]
    InvalidLoaderState,
    #[msg("No token accounts supplied")]
    NoTokenAccounts,
    #[msg("Too many token accounts in one hand-over")]
    TooManyTokenAccounts,
    #[msg("Token account listed twice")]
    DuplicateTokenAccount,
    #[msg("Account is not a token account held by the fee collector")]
    InvalidTokenAccount,
}
