//! End-to-end REPL sessions against mocked collaborators.

// Silence unused crate dependency warnings for test binary
use anyhow as _;
use clap as _;
use thiserror as _;
use tracing as _;
use tracing_subscriber as _;

use std::io::Cursor;

use alloy_primitives::{Address as AlloyAddress, Bytes, U256};
use alloy_rlp::{Decodable, Header};
use wst_cli::{FAREWELL, PROMPT, USAGE, run};
use wst_core::code::ReturnCode;
use wst_core::device::{Lifecycle, PinState};
use wst_core::testing::{MOCK_TX_HASH, MockDevice, MockRpc};
use wst_core::{Operation, Signature, Wallet, WalletConfig};

const PATH: &str = "[0,2147483692,2147483708,2147483648,0,0]";
const RECIPIENT: &str = "0x7F825230F5F2A26523999c98e0E3f7E2697085A9";
const DEVICE_ADDRESS: &str = "0xABCD000000000000000000000000000000001234";

/// Runs `input` through a session and returns the printed lines after the
/// banner, with prompts stripped.
fn transcript(wallet: &mut Wallet<MockDevice, MockRpc>, input: &str) -> Vec<String> {
    let mut output = Vec::new();
    run(wallet, Cursor::new(input), &mut output).unwrap();
    let output = String::from_utf8(output).unwrap();

    let body = output
        .strip_prefix(USAGE)
        .and_then(|rest| rest.strip_prefix('\n'))
        .expect("session starts with the usage banner");
    body.replace(PROMPT, "")
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn new_wallet(device: MockDevice, rpc: MockRpc) -> Wallet<MockDevice, MockRpc> {
    Wallet::new(device, rpc, WalletConfig::default())
}

#[test]
fn addr_prints_device_address() {
    let mut wallet = new_wallet(
        MockDevice::new().with_address(DEVICE_ADDRESS),
        MockRpc::new(),
    );
    let lines = transcript(&mut wallet, &format!("addr {PATH}\nexit\n"));

    assert_eq!(
        lines,
        [
            format!("your ETH address is: {DEVICE_ADDRESS}"),
            FAREWELL.to_string(),
        ]
    );
}

#[test]
fn send_broadcasts_eip155_transaction() {
    let rpc = MockRpc::new()
        .with_nonce(5)
        .with_gas_price(U256::from(20_000_000_000u64));
    let device = MockDevice::new()
        .with_address(DEVICE_ADDRESS)
        .with_signature(Signature::new([1u8; 32], [2u8; 32], 0x00));
    let mut wallet = new_wallet(device, rpc);

    let lines = transcript(&mut wallet, &format!("send {PATH} {RECIPIENT} 0.00001\n"));

    let broadcast = wallet.rpc().broadcast_transactions();
    assert_eq!(broadcast.len(), 1);
    let rlp = hex::decode(broadcast[0].strip_prefix("0x").unwrap()).unwrap();

    let buf = &mut rlp.as_slice();
    assert!(Header::decode(buf).unwrap().list);
    assert_eq!(u64::decode(buf).unwrap(), 5);
    assert_eq!(U256::decode(buf).unwrap(), U256::from(20_000_000_000u64));
    assert_eq!(u64::decode(buf).unwrap(), 21_000);
    assert_eq!(
        AlloyAddress::decode(buf).unwrap(),
        RECIPIENT.parse::<AlloyAddress>().unwrap()
    );
    assert_eq!(
        U256::decode(buf).unwrap(),
        U256::from(10_000_000_000_000u64)
    );
    assert!(Bytes::decode(buf).unwrap().is_empty());
    assert_eq!(u64::decode(buf).unwrap(), 37);

    assert_eq!(
        lines,
        [
            "transaction succeeded.".to_string(),
            format!("from: {DEVICE_ADDRESS}"),
            format!("to: {}", RECIPIENT.parse::<wst_core::Address>().unwrap()),
            "value: 0.00001 Ether".to_string(),
            "gas price: 20000000000 Wei".to_string(),
            "gas limit: 21000".to_string(),
            format!(
                "you can see your transaction detail here: https://etherscan.io/tx/{MOCK_TX_HASH}"
            ),
            FAREWELL.to_string(),
        ]
    );
}

#[test]
fn send_nonce_comes_from_device_address() {
    let mut wallet = new_wallet(
        MockDevice::new().with_address(DEVICE_ADDRESS),
        MockRpc::new(),
    );
    transcript(&mut wallet, &format!("send {PATH} {RECIPIENT} 1\n"));

    assert_eq!(wallet.rpc().queried_addresses(), [DEVICE_ADDRESS]);
    assert_eq!(wallet.device().signed_payloads().len(), 1);
}

#[test]
fn balance_prints_ether() {
    let rpc = MockRpc::new().with_balance(U256::from(1_250_000_000_000_000_000u64));
    let mut wallet = new_wallet(MockDevice::new().with_address(DEVICE_ADDRESS), rpc);

    let lines = transcript(&mut wallet, &format!("balance {PATH}\n"));
    assert_eq!(
        lines[0],
        format!("your ETH address is: {DEVICE_ADDRESS}, balance is: 1.25 Ether")
    );
}

#[test]
fn info_prints_six_lines() {
    let mut wallet = new_wallet(MockDevice::new(), MockRpc::new());
    let lines = transcript(&mut wallet, "info\n");

    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], "PIN state is: logged in");
    assert_eq!(lines[2], "device sn: WOOKONG-0001");
    assert_eq!(lines[5], "lcd state is: logo is shown on screen");
}

#[test]
fn errors_do_not_end_the_session() {
    let device = MockDevice::new().with_pin_state(PinState::Locked);
    let mut wallet = new_wallet(device, MockRpc::new());

    let input = format!("addr {PATH}\nbogus\nsend {PATH} 0x12 1\ninfo\nexit\n");
    let lines = transcript(&mut wallet, &input);

    assert_eq!(lines[0], "invalid PIN state, please unlock PIN first");
    assert_eq!(lines[1], "unknown command: 'bogus'");
    assert!(lines[2].starts_with("invalid address: 0x12"));
    assert_eq!(lines[3], "PIN state is: locked");
    assert_eq!(lines.last().unwrap(), FAREWELL);
}

#[test]
fn send_refuses_sub_wei_amounts() {
    let mut wallet = new_wallet(MockDevice::new(), MockRpc::new());
    let lines = transcript(
        &mut wallet,
        &format!("send {PATH} {RECIPIENT} 0.0000000000000000019\nsend {PATH} {RECIPIENT} 1_000\n"),
    );

    assert!(lines[0].starts_with("invalid amount: 0.0000000000000000019"));
    assert!(lines[1].starts_with("invalid amount: 1_000"));
    assert!(wallet.device().signed_payloads().is_empty());
    assert!(wallet.rpc().broadcast_transactions().is_empty());
}

#[test]
fn device_failures_are_translated() {
    let device =
        MockDevice::new().fail(Operation::SignEthereum, ReturnCode::DevOpCancel.raw());
    let mut wallet = new_wallet(device, MockRpc::new());

    let lines = transcript(&mut wallet, &format!("send {PATH} {RECIPIENT} 1\n"));
    assert_eq!(lines[0], "ETH sign failed: operation canceled");
    assert!(wallet.rpc().broadcast_transactions().is_empty());
}

#[test]
fn unreachable_device_reports_status_failure() {
    let device = MockDevice::new().fail_device_info(ReturnCode::DevCommunicateFail.raw());
    let mut wallet = new_wallet(device, MockRpc::new());

    let lines = transcript(&mut wallet, "info\nformat\n");
    assert!(lines[0].starts_with("get device info failed: "));
    assert_eq!(lines[0], lines[1]);
}

#[test]
fn init_checks_lifecycle() {
    let mut wallet = new_wallet(MockDevice::new(), MockRpc::new());
    let lines = transcript(&mut wallet, "init generate 32\ninit restore\n");
    assert_eq!(
        lines[0],
        "init failed: device lifecycle is normal state, seed generated"
    );
    assert_eq!(lines[1], "unknown parameter: restore");

    let device = MockDevice::new().with_lifecycle(Lifecycle::AwaitingSeed);
    let mut wallet = new_wallet(device, MockRpc::new());
    let lines = transcript(&mut wallet, "init import\nformat\n");
    assert_eq!(lines[0], "import completed successfully");
    assert_eq!(lines[1], "format completed successfully");
}

#[test]
fn end_of_input_says_goodbye() {
    let mut wallet = new_wallet(MockDevice::new(), MockRpc::new());
    assert_eq!(transcript(&mut wallet, ""), [FAREWELL]);
}
