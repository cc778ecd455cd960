use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("chfiling {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: chfiling");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("CHFILING_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "profile: {}",
        option_env!("CHFILING_BUILD_PROFILE").unwrap_or("unknown")
    );
    println!("envelope_version: {}", chfiling_envelope::ENVELOPE_VERSION);
    println!("envelope_namespace: {}", chfiling_envelope::ENVELOPE_NS);
    println!("features: http={}, cli=true", cfg!(feature = "http"));

    Ok(SUCCESS)
}
