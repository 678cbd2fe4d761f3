use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the subcommands from src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
const FORMATS: &[&str] = &["html", "json", "markdown"];

fn input() -> Arg {
    Arg::new("input")
        .help("Input file path")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn variables() -> Arg {
    Arg::new("variables")
        .long("variables")
        .help("JSON array of template variables")
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let formats = clap::builder::PossibleValuesParser::new(FORMATS);
    let mut cmd = Command::new("pneumatic")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Decode, encode and convert pneumatic rich text")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List registered formats")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to a pneumatic.toml configuration file")
                .value_hint(ValueHint::FilePath),
        )
        .subcommand(
            Command::new("convert")
                .arg(input())
                .arg(Arg::new("from").long("from").value_parser(formats.clone()))
                .arg(Arg::new("to").long("to").value_parser(formats))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                )
                .arg(variables()),
        )
        .subcommand(Command::new("decode").arg(input()).arg(variables()))
        .subcommand(Command::new("encode").arg(input()))
        .subcommand(Command::new("normalize").arg(input()))
        .subcommand(Command::new("tokens").arg(input()).arg(variables()))
        .subcommand(Command::new("reassign-ids").arg(input()))
        .subcommand(
            Command::new("copy")
                .arg(input())
                .arg(Arg::new("anchor").long("anchor").required(true))
                .arg(Arg::new("focus").long("focus"))
                .arg(Arg::new("safari").long("safari").action(ArgAction::SetTrue)),
        );

    generate_to(Bash, &mut cmd, "pneumatic", &outdir)?;
    generate_to(Zsh, &mut cmd, "pneumatic", &outdir)?;
    generate_to(Fish, &mut cmd, "pneumatic", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
