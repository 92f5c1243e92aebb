// tests/inspect.rs

use std::io::Write;

use clap::Parser;
use errchain::cli::{CliArgs, Command, LogLevel, OutputFormat};
use errchain::errors::InspectError;
use errchain::inspect::{build_chain, decode_bytes, encode_messages, read_input, ChainReport};
use errchain::logging::resolve_level;
use errchain::{serialize, DecodeOptions, Error};
use errchain_test_utils::fixtures::LoginRequest;
use tempfile::NamedTempFile;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn build_chain_puts_the_first_message_outermost() {
    let err = build_chain(&strings(&["loading profile", "query user 42", "refused"])).unwrap();
    assert_eq!(err.message(), "loading profile: query user 42: refused");
    assert_eq!(err.root_cause().unwrap().layer_message(), "refused");
}

#[test]
fn build_chain_rejects_empty_input() {
    assert!(matches!(build_chain(&[]), Err(InspectError::NoMessages)));
}

#[test]
fn encode_then_decode_report() {
    let mut out = Vec::new();
    let written = encode_messages(&strings(&["outer", "inner"]), &mut out).unwrap();
    assert_eq!(written, out.len());

    let report = decode_bytes(&out, DecodeOptions::default());
    assert_eq!(report.declared_layers, 2);
    assert_eq!(report.parsed_layers, 2);
    assert!(report.stopped.is_none());
    assert_eq!(report.message, "outer: inner");
    assert_eq!(report.layers.len(), 2);
    assert_eq!(report.layers[1].message, "inner");
    assert!(report.layers[0].type_name.is_none());
}

#[test]
fn report_lists_wire_payloads() {
    let err = Error::with_wire_payload("login failed", LoginRequest::new("bob", "10.1.1.1", 22))
        .wrap("auth");
    let report = decode_bytes(&serialize(&err), DecodeOptions::default());

    let layer = &report.layers[1];
    assert_eq!(layer.type_name.as_deref(), Some("test.LoginRequest"));
    assert_eq!(layer.payload_bytes, "bob|10.1.1.1|22".len());
    assert_eq!(report.debug, "auth: login failed [test.LoginRequest: (15 bytes)]");

    let text = report.render_text();
    assert!(text.contains("message: auth: login failed"));
    assert!(text.contains("#1 \"login failed\" [test.LoginRequest, 15 bytes]"));
}

#[test]
fn report_renders_as_toml() {
    let report = decode_bytes(
        &serialize(&Error::new("root").wrap("top")),
        DecodeOptions::default(),
    );
    let rendered = report.render_toml().unwrap();

    let value: toml::Value = toml::from_str(&rendered).unwrap();
    assert_eq!(value["declared_layers"].as_integer(), Some(2));
    assert_eq!(value["message"].as_str(), Some("top: root"));
    assert_eq!(value["layers"].as_array().unwrap().len(), 2);
    assert!(value.get("stopped").is_none());
}

#[test]
fn report_for_truncated_input_names_the_reason() {
    let bytes = serialize(&Error::new("inner").wrap("outer"));
    let report = decode_bytes(&bytes[..bytes.len() - 3], DecodeOptions::default());

    assert_eq!(report.parsed_layers, 1);
    assert!(report.stopped.as_deref().unwrap().contains("truncated"));
    assert!(report.render_text().contains("stopped: "));
}

#[test]
fn report_honours_max_layers() {
    let bytes = serialize(&build_chain(&strings(&["a", "b", "c"])).unwrap());
    let report = decode_bytes(&bytes, DecodeOptions { max_layers: Some(1) });
    assert_eq!(report.message, "a");
    assert_eq!(report.stopped.as_deref(), Some("layer limit of 1 reached"));
}

#[test]
fn report_of_empty_input_is_nil() {
    let report = ChainReport::from_decoded(&errchain::Decoder::default().decode_report(&[]));
    assert_eq!(report.message, "(nil)");
    assert!(report.layers.is_empty());
}

#[test]
fn read_input_from_file() {
    let bytes = serialize(&Error::new("from disk"));
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();

    let read = read_input(Some(file.path())).unwrap();
    assert_eq!(read, bytes);
}

#[test]
fn read_input_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.bin");
    assert!(matches!(read_input(Some(missing.as_path())), Err(InspectError::Io(_))));
}

#[test]
fn cli_parses_decode() {
    let args = CliArgs::try_parse_from([
        "errchain",
        "--log-level",
        "debug",
        "decode",
        "chain.bin",
        "--format",
        "toml",
        "--max-layers",
        "8",
    ])
    .unwrap();

    assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    match args.command {
        Command::Decode {
            path,
            format,
            max_layers,
        } => {
            assert_eq!(path.unwrap().to_str(), Some("chain.bin"));
            assert_eq!(format, OutputFormat::Toml);
            assert_eq!(max_layers, Some(8));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn cli_encode_requires_messages() {
    assert!(CliArgs::try_parse_from(["errchain", "encode"]).is_err());

    let args = CliArgs::try_parse_from(["errchain", "encode", "a", "b", "-o", "out.bin"]).unwrap();
    match args.command {
        Command::Encode { messages, output } => {
            assert_eq!(messages, ["a", "b"]);
            assert_eq!(output.unwrap().to_str(), Some("out.bin"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn run_encode_writes_the_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chain.bin");
    let args = CliArgs::try_parse_from([
        "errchain",
        "encode",
        "outer",
        "inner",
        "--output",
        path.to_str().unwrap(),
    ])
    .unwrap();

    errchain::run(args).unwrap();

    let decoded = errchain::deserialize(&std::fs::read(&path).unwrap());
    assert_eq!(decoded.message(), "outer: inner");
}

#[test]
fn log_level_resolution_order() {
    use tracing::Level;

    assert_eq!(resolve_level(Some(LogLevel::Trace), Some("error")), Level::TRACE);
    assert_eq!(resolve_level(None, Some("debug")), Level::DEBUG);
    assert_eq!(resolve_level(None, Some(" WARNING ")), Level::WARN);
    assert_eq!(resolve_level(None, Some("nonsense")), Level::INFO);
    assert_eq!(resolve_level(None, None), Level::INFO);
}
