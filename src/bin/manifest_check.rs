use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use job_manifest::{ContentTypeScope, ManifestValidator, ValidationMode, ValidatorConfig};
use log::debug;
use std::process::ExitCode;
use std::time::Duration;

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();

    let matches = Command::new("manifest-check")
        .version(job_manifest::VERSION)
        .about("Validate a job manifest, optionally verifying its remote resources")
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .help("Manifest file (.json, or .yaml/.yml with yaml-support)")
                .required(true),
        )
        .arg(
            Arg::new("remote")
                .short('r')
                .long("remote")
                .help("Fetch and validate remote collections and example images")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("every-entry")
                .long("every-entry")
                .help("Probe the content type of every collection entry, not just the first")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECS")
                .help("Per-request timeout in seconds")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("content-type")
                .long("content-type")
                .value_name("TYPE")
                .help("Accepted image content type (repeatable, replaces the defaults)")
                .action(ArgAction::Append),
        )
        .get_matches();

    let path = matches
        .get_one::<String>("file")
        .context("FILE argument is required")?;

    let mut config = ValidatorConfig::default();
    if matches.get_flag("every-entry") {
        config = config.with_scope(ContentTypeScope::EveryEntry);
    }
    if let Some(secs) = matches.get_one::<u64>("timeout") {
        config = config.with_timeout(Duration::from_secs(*secs));
    }
    if let Some(types) = matches.get_many::<String>("content-type") {
        config = config.with_content_types(types.cloned());
    }
    let mode = if matches.get_flag("remote") {
        ValidationMode::Remote
    } else {
        ValidationMode::Offline
    };
    debug!("Validating {} with {:?}", path, config);

    let validator = ManifestValidator::new(config).context("failed to build validator")?;

    match validator.validate_file(path, mode) {
        Ok(validated) => {
            println!("{}", validated.to_json()?);
            Ok(ExitCode::SUCCESS)
        }
        Err(rejection) => {
            let body =
                serde_json::to_string_pretty(&rejection).context("failed to render rejection")?;
            println!("{}", body);
            Ok(ExitCode::from(1))
        }
    }
}
