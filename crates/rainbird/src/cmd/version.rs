use rainbird_envelope::{JSONRPC_VERSION, TUNNEL_METHOD};
use rainbird_sip::SipRegistry;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    println!("rainbird {}", env!("CARGO_PKG_VERSION"));
    if args.extended {
        for line in protocol_lines(SipRegistry::standard()) {
            println!("{line}");
        }
    }
    Ok(SUCCESS)
}

/// What this build speaks to a controller.
fn protocol_lines(registry: &SipRegistry) -> Vec<String> {
    vec![
        format!("commands: {}", registry.commands().len()),
        format!("responses: {}", registry.responses().len()),
        format!("rpc: {TUNNEL_METHOD} (jsonrpc {JSONRPC_VERSION}) over POST /stick"),
        "envelope: aes-256-cbc, sha256 key".to_string(),
        format!("async: {}", cfg!(feature = "async")),
    ]
}
