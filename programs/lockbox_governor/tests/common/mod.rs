// SPDX-License-Identifier: MIT
// Shared program-test harness: governor + SPL token, posted VAAs and loader accounts seeded
// directly with `add_account`.
#![allow(dead_code)]

use anchor_lang::prelude::{AccountInfo, Pubkey};
use anchor_lang::{AccountDeserialize, InstructionData};
use delegated_authority::loader::{program_data_address, BUFFER_METADATA_LEN, PROGRAM_DATA_METADATA_LEN};
use delegated_authority::LoaderState;
use lockbox_governor::message::{keccak256, GovernanceAction};
use lockbox_governor::posted_vaa::{posted_vaa_address, POSTED_VAA_DISCRIMINATOR};
use lockbox_governor::{Config, Received};
use solana_program_test::{processor, BanksClientError, ProgramTest, ProgramTestContext};
use solana_sdk::{
    account::{Account, ReadableAccount},
    bpf_loader_upgradeable,
    entrypoint::ProgramResult,
    instruction::{AccountMeta, Instruction, InstructionError},
    program_pack::Pack,
    rent::Rent,
    signature::Keypair,
    signer::Signer,
    system_instruction, system_program,
    transaction::{Transaction, TransactionError},
};

pub const WORMHOLE: Pubkey = solana_sdk::pubkey!("worm2ZoG2kUd4vFXhvjh93UUH596ayRfgQ2MgjNMTth");
pub const EMITTER_CHAIN: u16 = 10002;
/// Timelock contract on the governing chain, left-padded to 32 bytes.
pub const EMITTER: [u8; 32] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x47, 0x1b, 0x3f, 0x60, 0xf0, 0x8c, 0x50, 0xdd, 0x0e,
    0xcb, 0xa1, 0xbc, 0xd1, 0x13, 0xb6, 0x6f, 0xcc, 0x02, 0xb6, 0x3d,
];
const FUNDED: u64 = 1_000_000_000;

fn entry_wrapper(program_id: &Pubkey, accounts: &[AccountInfo], input: &[u8]) -> ProgramResult {
    // test-only shim: coerce lifetimes to match Anchor's expected signature
    let accounts_coerced: &[AccountInfo<'_>] = unsafe { std::mem::transmute(accounts) };
    lockbox_governor::entry(program_id, accounts_coerced, input)
}

pub fn program_test() -> ProgramTest {
    let mut program_test = ProgramTest::new(
        "lockbox_governor",
        lockbox_governor::ID,
        processor!(entry_wrapper),
    );
    program_test.add_program(
        "spl_token",
        anchor_spl::token::ID,
        processor!(spl_token::processor::Processor::process),
    );
    program_test
}

pub fn config_address() -> Pubkey {
    Pubkey::find_program_address(&[Config::SEED_PREFIX], &lockbox_governor::ID).0
}

pub fn received_address(chain: u16, sequence: u64) -> Pubkey {
    Received::address(chain, sequence).0
}

pub struct PostedMessage {
    pub vaa_hash: [u8; 32],
    pub address: Pubkey,
    pub sequence: u64,
    pub emitter_chain: u16,
}

pub fn posted_vaa_data(chain: u16, emitter: [u8; 32], sequence: u64, payload: &[u8]) -> Vec<u8> {
    let mut data = POSTED_VAA_DISCRIMINATOR.to_vec();
    data.push(1); // consistency level
    data.extend_from_slice(&1_700_000_000u32.to_le_bytes());
    data.extend_from_slice(&[0u8; 32]); // signature set
    data.extend_from_slice(&0u32.to_le_bytes()); // guardian set index
    data.extend_from_slice(&0u32.to_le_bytes()); // nonce
    data.extend_from_slice(&sequence.to_le_bytes());
    data.extend_from_slice(&chain.to_le_bytes());
    data.extend_from_slice(&emitter);
    data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    data.extend_from_slice(payload);
    data
}

/// Seeds a posted VAA owned by the bridge at its canonical address.
pub fn add_posted_vaa(
    program_test: &mut ProgramTest,
    chain: u16,
    emitter: [u8; 32],
    sequence: u64,
    payload: &[u8],
) -> PostedMessage {
    add_posted_vaa_owned_by(program_test, WORMHOLE, chain, emitter, sequence, payload)
}

pub fn add_posted_vaa_owned_by(
    program_test: &mut ProgramTest,
    owner: Pubkey,
    chain: u16,
    emitter: [u8; 32],
    sequence: u64,
    payload: &[u8],
) -> PostedMessage {
    let data = posted_vaa_data(chain, emitter, sequence, payload);
    let vaa_hash = keccak256(&[&data]);
    let address = posted_vaa_address(&WORMHOLE, &vaa_hash);
    program_test.add_account(
        address,
        Account {
            lamports: FUNDED,
            data,
            owner,
            executable: false,
            rent_epoch: 0,
        },
    );
    PostedMessage {
        vaa_hash,
        address,
        sequence,
        emitter_chain: chain,
    }
}

/// Governance VAA from the trusted emitter certifying `action`.
pub fn add_governance_vaa(
    program_test: &mut ProgramTest,
    sequence: u64,
    action: &GovernanceAction,
) -> PostedMessage {
    add_posted_vaa(program_test, EMITTER_CHAIN, EMITTER, sequence, &action.hash())
}

/// Seeds the loader's programdata account for `program`.
pub fn add_program_data(
    program_test: &mut ProgramTest,
    program: &Pubkey,
    authority: Option<Pubkey>,
) -> Pubkey {
    let address = program_data_address(program);
    let mut data = LoaderState::ProgramData { slot: 0, authority }.encode();
    data.resize(PROGRAM_DATA_METADATA_LEN + 64, 0);
    add_loader_account(program_test, address, data);
    address
}

pub fn add_buffer(program_test: &mut ProgramTest, authority: Option<Pubkey>) -> Pubkey {
    let address = Pubkey::new_unique();
    let mut data = LoaderState::Buffer { authority }.encode();
    data.resize(BUFFER_METADATA_LEN + 64, 0);
    add_loader_account(program_test, address, data);
    address
}

/// ELF accepted by the loader's verifier: the SPL token build bundled with program-test.
pub fn deployable_elf() -> Vec<u8> {
    solana_program_test::programs::spl_programs(&Rent::default())
        .into_iter()
        .find(|(id, _)| *id == spl_token::id())
        .map(|(_, account)| account.data().to_vec())
        .expect("spl_token elf")
}

/// Seeds an executable loader-owned `program` and a programdata account with room for `code`.
pub fn add_upgradeable_program(
    program_test: &mut ProgramTest,
    program: &Pubkey,
    authority: Option<Pubkey>,
    code: &[u8],
) -> Pubkey {
    let program_data = program_data_address(program);
    let mut data = LoaderState::ProgramData { slot: 0, authority }.encode();
    data.resize(PROGRAM_DATA_METADATA_LEN, 0);
    data.extend_from_slice(code);
    add_loader_account(program_test, program_data, data);
    program_test.add_account(
        *program,
        Account {
            lamports: FUNDED,
            data: LoaderState::Program { program_data }.encode(),
            owner: bpf_loader_upgradeable::id(),
            executable: true,
            rent_epoch: 0,
        },
    );
    program_data
}

/// Seeds a loader buffer holding `code`.
pub fn add_buffer_with_code(
    program_test: &mut ProgramTest,
    authority: Option<Pubkey>,
    code: &[u8],
) -> Pubkey {
    let address = Pubkey::new_unique();
    let mut data = LoaderState::Buffer { authority }.encode();
    data.resize(BUFFER_METADATA_LEN, 0);
    data.extend_from_slice(code);
    add_loader_account(program_test, address, data);
    address
}

fn add_loader_account(program_test: &mut ProgramTest, address: Pubkey, data: Vec<u8>) {
    program_test.add_account(
        address,
        Account {
            lamports: Rent::default().minimum_balance(data.len()).max(FUNDED),
            data,
            owner: bpf_loader_upgradeable::id(),
            executable: false,
            rent_epoch: 0,
        },
    );
}

pub async fn send(
    ctx: &mut ProgramTestContext,
    instructions: &[Instruction],
    extra_signers: &[&Keypair],
) -> Result<(), BanksClientError> {
    let mut signers = vec![&ctx.payer];
    signers.extend_from_slice(extra_signers);
    let tx = Transaction::new_signed_with_payer(
        instructions,
        Some(&ctx.payer.pubkey()),
        &signers,
        ctx.last_blockhash,
    );
    ctx.banks_client.process_transaction(tx).await
}

pub fn custom_error(err: BanksClientError) -> Option<u32> {
    match err {
        BanksClientError::TransactionError(TransactionError::InstructionError(
            _,
            InstructionError::Custom(code),
        )) => Some(code),
        BanksClientError::SimulationError {
            err: TransactionError::InstructionError(_, InstructionError::Custom(code)),
            ..
        } => Some(code),
        _ => None,
    }
}

pub fn governor_ix(data: impl InstructionData, accounts: Vec<AccountMeta>) -> Instruction {
    Instruction {
        program_id: lockbox_governor::ID,
        accounts,
        data: data.data(),
    }
}

pub async fn initialize(ctx: &mut ProgramTestContext) -> Result<(), BanksClientError> {
    let ix = initialize_ix(&ctx.payer.pubkey());
    send(ctx, &[ix], &[]).await
}

pub fn initialize_ix(payer: &Pubkey) -> Instruction {
    governor_ix(
        lockbox_governor::instruction::Initialize {
            args: lockbox_governor::InitializeArgs {
                wormhole_program: WORMHOLE,
                emitter_chain: EMITTER_CHAIN,
                emitter_address: EMITTER,
            },
        },
        vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(config_address(), false),
            AccountMeta::new_readonly(program_data_address(&lockbox_governor::ID), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

/// Metas of the shared governance accounts, in declaration order.
pub fn governance_metas(payer: &Pubkey, posted: &PostedMessage) -> Vec<AccountMeta> {
    governance_metas_with(
        payer,
        &posted.address,
        &received_address(posted.emitter_chain, posted.sequence),
    )
}

pub fn governance_metas_with(payer: &Pubkey, posted: &Pubkey, received: &Pubkey) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new(*payer, true),
        AccountMeta::new(config_address(), false),
        AccountMeta::new_readonly(*posted, false),
        AccountMeta::new(*received, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ]
}

pub fn set_upgrade_authority_ix(
    payer: &Pubkey,
    posted: &PostedMessage,
    program: Pubkey,
    program_data: Pubkey,
    destination: Pubkey,
) -> Instruction {
    let mut accounts = governance_metas(payer, posted);
    accounts.extend([
        AccountMeta::new_readonly(program, false),
        AccountMeta::new(program_data, false),
        AccountMeta::new_readonly(destination, false),
        AccountMeta::new_readonly(bpf_loader_upgradeable::id(), false),
    ]);
    governor_ix(
        lockbox_governor::instruction::SetUpgradeAuthority {
            vaa_hash: posted.vaa_hash,
        },
        accounts,
    )
}

pub fn set_governance_emitter_ix(
    payer: &Pubkey,
    posted: &PostedMessage,
    chain: u16,
    address: [u8; 32],
) -> Instruction {
    governor_ix(
        lockbox_governor::instruction::SetGovernanceEmitter {
            vaa_hash: posted.vaa_hash,
            chain,
            address,
        },
        governance_metas(payer, posted),
    )
}

pub async fn fetch_config(ctx: &mut ProgramTestContext) -> Config {
    let account = ctx
        .banks_client
        .get_account(config_address())
        .await
        .unwrap()
        .expect("config missing");
    Config::try_deserialize(&mut account.data.as_slice()).unwrap()
}

pub async fn fetch_received(ctx: &mut ProgramTestContext, chain: u16, sequence: u64) -> Option<Received> {
    ctx.banks_client
        .get_account(received_address(chain, sequence))
        .await
        .unwrap()
        .map(|account| Received::try_deserialize(&mut account.data.as_slice()).unwrap())
}

pub async fn fetch_loader_state(ctx: &mut ProgramTestContext, address: Pubkey) -> LoaderState {
    let account = ctx
        .banks_client
        .get_account(address)
        .await
        .unwrap()
        .expect("loader account missing");
    LoaderState::parse(&account.data).expect("loader state")
}

pub async fn create_mint(ctx: &mut ProgramTestContext, mint: &Keypair) -> Result<(), BanksClientError> {
    let rent = ctx.banks_client.get_rent().await?;
    let ixs = [
        system_instruction::create_account(
            &ctx.payer.pubkey(),
            &mint.pubkey(),
            rent.minimum_balance(spl_token::state::Mint::LEN),
            spl_token::state::Mint::LEN as u64,
            &spl_token::id(),
        ),
        spl_token::instruction::initialize_mint(
            &spl_token::id(),
            &mint.pubkey(),
            &ctx.payer.pubkey(),
            None,
            0,
        )
        .unwrap(),
    ];
    send(ctx, &ixs, &[mint]).await
}

pub async fn create_token_account_with_owner(
    ctx: &mut ProgramTestContext,
    account: &Keypair,
    mint: &Pubkey,
    owner: &Pubkey,
) -> Result<(), BanksClientError> {
    let rent = ctx.banks_client.get_rent().await?;
    let ixs = [
        system_instruction::create_account(
            &ctx.payer.pubkey(),
            &account.pubkey(),
            rent.minimum_balance(spl_token::state::Account::LEN),
            spl_token::state::Account::LEN as u64,
            &spl_token::id(),
        ),
        spl_token::instruction::initialize_account(&spl_token::id(), &account.pubkey(), mint, owner)
            .unwrap(),
    ];
    send(ctx, &ixs, &[account]).await
}

pub async fn mint_to(
    ctx: &mut ProgramTestContext,
    mint: &Pubkey,
    account: &Pubkey,
    amount: u64,
) -> Result<(), BanksClientError> {
    let ix = spl_token::instruction::mint_to(
        &spl_token::id(),
        mint,
        account,
        &ctx.payer.pubkey(),
        &[],
        amount,
    )
    .unwrap();
    send(ctx, &[ix], &[]).await
}

pub async fn token_account(ctx: &mut ProgramTestContext, address: Pubkey) -> spl_token::state::Account {
    let account = ctx
        .banks_client
        .get_account(address)
        .await
        .unwrap()
        .expect("token account missing");
    spl_token::state::Account::unpack(&account.data).unwrap()
}
