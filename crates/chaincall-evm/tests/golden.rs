//! Golden integration tests.
//!
//! Each test drives the full pipeline (ABI → form → coerce → codec, or
//! receipt log → codec → display) against byte-level expectations taken from
//! real mainnet calls and logs.

use alloy_primitives::U256;
use chaincall_core::{
    coerce, decode_for_display, flatten_function, format_event_line, reconstruct_for, AbiValue,
    CallCodec, CodecError, ContractAbi, DisplayValue, EventSpec, FieldKey, FormState, LogRecord,
    TypeSpec,
};
use chaincall_evm::EvmCodec;

// ─── Helpers ──────────────────────────────────────────────────────────────────

const TOKEN_ABI: &str = r#"[
    {"type": "function", "name": "transfer", "stateMutability": "nonpayable",
     "inputs": [{"name": "to", "type": "address"}, {"name": "amount", "type": "uint256"}],
     "outputs": [{"name": "", "type": "bool"}]},
    {"type": "function", "name": "balanceOf", "stateMutability": "view",
     "inputs": [{"name": "owner", "type": "address"}],
     "outputs": [{"name": "", "type": "uint256"}]},
    {"type": "function", "name": "fill", "stateMutability": "payable",
     "inputs": [
        {"name": "order", "type": "tuple", "components": [
            {"name": "amount", "type": "uint256"},
            {"name": "maker", "type": "address"}
        ]},
        {"name": "ids", "type": "uint256[]"}
     ],
     "outputs": []},
    {"type": "event", "name": "Transfer", "anonymous": false, "inputs": [
        {"name": "from", "type": "address", "indexed": true},
        {"name": "to", "type": "address", "indexed": true},
        {"name": "value", "type": "uint256", "indexed": false}
    ]}
]"#;

const VITALIK: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
const TRANSFER_TOPIC: &str = "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

fn word(n: u64) -> Vec<u8> {
    let mut d = vec![0u8; 32];
    d[24..].copy_from_slice(&n.to_be_bytes());
    d
}

fn word_hex(n: u64) -> String {
    hex::encode(word(n))
}

/// Fill every flattened field of `function` in order and encode the call.
fn encode_with(abi: &ContractAbi, function: &str, values: &[&str]) -> Result<Vec<u8>, String> {
    let f = abi.function(function).map_err(|e| e.to_string())?;
    let mut form = FormState::new(f);
    for (field, value) in flatten_function(f).unwrap().iter().zip(values) {
        form.set(field.key, *value);
    }
    let rebuilt = reconstruct_for(f, &form).map_err(|e| e.to_string())?;
    let args = coerce(&rebuilt.args, &rebuilt.types, &f.inputs).map_err(|e| e.to_string())?;
    EvmCodec.encode_call(f, &args).map_err(|e| e.to_string())
}

fn erc20_transfer_log() -> LogRecord {
    LogRecord {
        address: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48".into(),
        topics: vec![
            TRANSFER_TOPIC.into(),
            "0x000000000000000000000000d8da6bf26964af9d7eed9e03e53415d37aa96045".into(),
            "0x000000000000000000000000ab5801a7d398351b8be11c439e05c5b3259aec9b".into(),
        ],
        // 1 ETH in wei
        data: word(1_000_000_000_000_000_000),
        log_index: Some(0),
    }
}

// ─── Encoding ─────────────────────────────────────────────────────────────────

#[test]
fn erc20_transfer_calldata() {
    let abi = ContractAbi::parse(TOKEN_ABI).unwrap();
    let calldata = encode_with(&abi, "transfer", &[VITALIK, "1000000"]).unwrap();

    let expected = format!(
        "a9059cbb{}{}",
        "000000000000000000000000d8da6bf26964af9d7eed9e03e53415d37aa96045",
        word_hex(1_000_000)
    );
    assert_eq!(hex::encode(calldata), expected);
}

#[test]
fn tuple_and_array_layout() {
    let abi = ContractAbi::parse(TOKEN_ABI).unwrap();
    let calldata = encode_with(&abi, "fill", &["42", VITALIK, "[1, 2, 3]"]).unwrap();
    let params = &calldata[4..];

    // static tuple inline (2 words), array offset, length, 3 elements
    assert_eq!(params.len(), 7 * 32);
    assert_eq!(&params[0..32], word(42).as_slice());
    assert_eq!(&params[64..96], word(0x60).as_slice());
    assert_eq!(&params[96..128], word(3).as_slice());
    assert_eq!(&params[192..224], word(3).as_slice());
}

#[test]
fn params_encoding_omits_selector() {
    let abi = ContractAbi::parse(TOKEN_ABI).unwrap();
    let f = abi.function("balanceOf").unwrap();
    let args = vec![chaincall_core::CoercedArgument::Text(VITALIK.into())];
    let params = EvmCodec.encode_params(f, &args).unwrap();
    let call = EvmCodec.encode_call(f, &args).unwrap();
    assert_eq!(&call[..4], &[0x70, 0xa0, 0x82, 0x31]);
    assert_eq!(&call[4..], params.as_slice());
}

#[test]
fn bad_address_surfaces_codec_error() {
    let abi = ContractAbi::parse(TOKEN_ABI).unwrap();
    let err = encode_with(&abi, "transfer", &["0xabc", "1"]).unwrap_err();
    assert!(err.contains("'to'"), "{err}");
}

#[test]
fn malformed_amount_never_reaches_the_codec() {
    let abi = ContractAbi::parse(TOKEN_ABI).unwrap();
    let err = encode_with(&abi, "transfer", &[VITALIK, "1e18"]).unwrap_err();
    assert!(err.contains("malformed integer"), "{err}");
}

// ─── Decoding ─────────────────────────────────────────────────────────────────

#[test]
fn balance_round_trips_through_display() {
    let abi = ContractAbi::parse(TOKEN_ABI).unwrap();
    let f = abi.function("balanceOf").unwrap();
    let big = "123456789012345678901234567890";
    let data = U256::from_str_radix(big, 10).unwrap().to_be_bytes::<32>();

    let value = EvmCodec.decode_output(f, &data).unwrap();
    assert_eq!(decode_for_display(&value), DisplayValue::Scalar(big.into()));
}

#[test]
fn erc20_transfer_event_golden() {
    let abi = ContractAbi::parse(TOKEN_ABI).unwrap();
    let decoded = EvmCodec
        .decode_event_log(&abi.events, &erc20_transfer_log())
        .unwrap();

    assert_eq!(decoded.event, "Transfer");
    let names: Vec<&str> = decoded.args.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["from", "to", "value"]);
    assert_eq!(decoded.args[0].1, AbiValue::Address(VITALIK.into()));

    let display: Vec<DisplayValue> = decoded.values().map(decode_for_display).collect();
    assert_eq!(
        format_event_line(&decoded.event, &display),
        "Event: Transfer(0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045, \
         0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B, 1000000000000000000)"
    );
}

#[test]
fn shared_topic_picks_the_event_that_decodes() {
    // ERC-721 Transfer has the same signature but indexes tokenId
    let erc20 = ContractAbi::parse(TOKEN_ABI).unwrap().events.remove(0);
    let erc721 = EventSpec::new(
        "Transfer",
        vec![
            TypeSpec::new("from", "address").indexed(),
            TypeSpec::new("to", "address").indexed(),
            TypeSpec::new("tokenId", "uint256").indexed(),
        ],
    );

    let mut log = erc20_transfer_log();
    log.topics.push(format!("0x{}", word_hex(7)));
    log.data.clear();

    let decoded = EvmCodec.decode_event_log(&[erc20, erc721], &log).unwrap();
    assert_eq!(decoded.args[2].0, "tokenId");
    assert_eq!(decoded.args[2].1, AbiValue::Uint(U256::from(7u8)));
}

#[test]
fn foreign_log_is_skipped_in_batch() {
    let abi = ContractAbi::parse(TOKEN_ABI).unwrap();
    let mut foreign = erc20_transfer_log();
    // Approval(address,address,uint256)
    foreign.topics[0] =
        "0x8c5be1e5ebec7d5bd14f71427d1e84f3dd0314c0f7b2291e5b200ac8c7c3b925".into();

    let err = EvmCodec.decode_event_log(&abi.events, &foreign).unwrap_err();
    assert!(matches!(err, CodecError::NoMatchingEvent { .. }));

    let result = EvmCodec.decode_logs(&abi.events, &[erc20_transfer_log(), foreign]);
    assert_eq!(result.decoded.len(), 1);
    assert_eq!(result.skipped, 1);
}

#[test]
fn field_keys_address_tuple_members() {
    let abi = ContractAbi::parse(TOKEN_ABI).unwrap();
    let fields = flatten_function(abi.function("fill").unwrap()).unwrap();
    assert_eq!(fields[1].key, FieldKey::member(0, 1));
    assert_eq!(fields[1].display_path, "order.maker");
}
