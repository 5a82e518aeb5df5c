use serde::Serialize;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Serialize)]
struct BuildInfo {
    name: &'static str,
    version: &'static str,
    target: &'static str,
    os: &'static str,
    arch: &'static str,
    git_hash: &'static str,
    features: Vec<&'static str>,
    max_frame_size: usize,
}

impl BuildInfo {
    fn collect() -> Self {
        let mut features = vec!["cli"];
        if cfg!(feature = "async") {
            features.push("async");
        }
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            target: option_env!("BANGLELINK_BUILD_TARGET").unwrap_or("unknown"),
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
            features,
            max_frame_size: banglelink_frame::MAX_FRAME_SIZE,
        }
    }
}

pub fn run(args: VersionArgs, format: OutputFormat) -> CliResult<i32> {
    let info = BuildInfo::collect();
    if !args.extended {
        println!("{} {}", info.name, info.version);
        return Ok(SUCCESS);
    }

    if format == OutputFormat::Json {
        println!(
            "{}",
            serde_json::to_string(&info).unwrap_or_else(|_| "{}".to_string())
        );
        return Ok(SUCCESS);
    }

    println!("name: {}", info.name);
    println!("version: {}", info.version);
    println!("target: {}", info.target);
    println!("target_os: {}", info.os);
    println!("target_arch: {}", info.arch);
    println!("git_hash: {}", info.git_hash);
    println!("features: {}", info.features.join(","));
    println!("max_frame_size: {}", info.max_frame_size);
    Ok(SUCCESS)
}
