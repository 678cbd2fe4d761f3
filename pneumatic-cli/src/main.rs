// Command-line interface for pneumatic rich text
//
// This binary exercises the pneumatic-text library on files: decoding the persisted markdown into
// the document model, encoding it back, converting between the registered formats and showing how
// the inline resolver splits a text into runs.
//
// Usage:
//  pneumatic <input> --to <format> [--from <format>] [--output <file>]  - Convert (default)
//  pneumatic convert <input> --to <format> [--from <format>] [-o <file>] - Same as above
//  pneumatic decode <input.md> [--variables <catalog.json>]              - Markdown to JSON
//  pneumatic encode <input.json>                                         - JSON to markdown
//  pneumatic normalize <input.md>                                        - Checklist marker pre-pass
//  pneumatic tokens <input> [--variables <catalog.json>]                 - Inline runs
//  pneumatic reassign-ids <input.md>                                     - Fresh checklist ids
//  pneumatic copy <snapshot.json> --anchor <key:off> [--focus <key:off>] - Clipboard payload
//  pneumatic --list-formats                                              - Registered formats
//
// Extra Parameters:
//
// Configuration keys can be overridden with --extra-<key> <value>; the CLI strips the "extra-"
// prefix. Example:
//  pneumatic decode notes.md --extra-normalize-checklists false
//  pneumatic reassign-ids template.md --extra-list-prefix team

mod copy;
mod tokens;

use clap::{Arg, ArgAction, Command, ValueHint};
use pneumatic_config::{Loader, PneumaticConfig};
use pneumatic_text::checklist::reassign_ids;
use pneumatic_text::document::UuidIdGenerator;
use pneumatic_text::formats::json::{parse_from_json, serialize_to_json};
use pneumatic_text::legacy::{BrowserQuirks, ClipboardOptions, LegacyDocument};
use pneumatic_text::formats::markdown::{encode, normalize_checklist_markers, try_encode};
use pneumatic_text::{decode, DecodeOptions, FormatRegistry, VariableCatalog, VariableCatalogEntry};
use std::collections::HashMap;
use std::fs;
use tracing_subscriber::EnvFilter;

const SUBCOMMANDS: &[&str] = &[
    "convert",
    "decode",
    "encode",
    "normalize",
    "tokens",
    "reassign-ids",
    "copy",
    "help",
];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if let Some(key) = arg.strip_prefix("--extra-") {
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with('-'));
            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input file path")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn variables_arg() -> Arg {
    Arg::new("variables")
        .long("variables")
        .value_name("PATH")
        .help("JSON array of template variables used to resolve {{api_name}} titles")
        .value_hint(ValueHint::FilePath)
}

fn build_cli() -> Command {
    Command::new("pneumatic")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Decode, encode and convert pneumatic rich text")
        .long_about(
            "pneumatic works with the markdown dialect used for task descriptions and comments:\n\
            standard markdown plus checklists ([clist:list|item]..[/clist]), template variables\n\
            ({{api_name}}) and mentions ([name|id]).\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override a configuration key.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            pneumatic decode task.md                   # Document model as JSON\n  \
            pneumatic task.md --to html                # Convert to HTML (stdout)\n  \
            pneumatic tokens comment.txt --variables vars.json",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List registered formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a pneumatic.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between formats.\n\n\
                    Supported formats:\n  \
                    - markdown: the persisted format (.md), parse and serialize\n  \
                    - json:     document model snapshot (.json), parse and serialize\n  \
                    - html:     HTML export (.html), serialize only\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.",
                )
                .arg(input_arg())
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(variables_arg()),
        )
        .subcommand(
            Command::new("decode")
                .about("Decode markdown into the document model (JSON)")
                .arg(input_arg())
                .arg(variables_arg()),
        )
        .subcommand(
            Command::new("encode")
                .about("Encode a JSON document model back to markdown")
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("normalize")
                .about("Put every checklist marker on its own line")
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("tokens")
                .about("Show the text, variable and mention runs of a text")
                .arg(input_arg())
                .arg(variables_arg()),
        )
        .subcommand(
            Command::new("reassign-ids")
                .about("Give every checklist fresh list and item ids")
                .long_about(
                    "Decode markdown, replace every checklist list and item id with a new one\n\
                    and print the result. Ids look like <prefix>-<uuid>; the prefixes come from\n\
                    the [ids] configuration section.",
                )
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("copy")
                .about("Show what copying a selection of a legacy comment snapshot writes")
                .long_about(
                    "Read a legacy comment snapshot (JSON blocks with entity ranges), select\n\
                    from --anchor to --focus and print the clipboard payload as JSON. Which\n\
                    flavours are written comes from the [clipboard] configuration section.",
                )
                .arg(input_arg())
                .arg(
                    Arg::new("anchor")
                        .long("anchor")
                        .value_name("KEY:OFFSET")
                        .help("Selection anchor")
                        .required(true),
                )
                .arg(
                    Arg::new("focus")
                        .long("focus")
                        .value_name("KEY:OFFSET")
                        .help("Selection focus (a caret at the anchor if omitted)"),
                )
                .arg(
                    Arg::new("safari")
                        .long("safari")
                        .help("Apply Safari's copy behaviour")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    // A bare file argument means `convert`.
    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);
                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    let config = load_cli_config(
        matches.get_one::<String>("config").map(|s| s.as_str()),
        &mut extra_params,
    );
    init_logging(&config);
    for key in extra_params.keys() {
        tracing::warn!(key = %key, "ignoring unknown --extra parameter");
    }

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let input = required(sub_matches, "input");
            let to = required(sub_matches, "to");
            let from = match sub_matches.get_one::<String>("from") {
                Some(f) => f.to_string(),
                None => {
                    let registry = FormatRegistry::default();
                    registry.detect_format_from_filename(input).unwrap_or_else(|| {
                        eprintln!("Error: Could not detect format from filename '{input}'");
                        eprintln!("Please specify --from explicitly");
                        std::process::exit(1);
                    })
                }
            };
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            let options = decode_options(&config, sub_matches.get_one::<String>("variables"));
            handle_convert_command(input, &from, to, output, &options);
        }
        Some(("decode", sub_matches)) => {
            let options = decode_options(&config, sub_matches.get_one::<String>("variables"));
            handle_decode_command(required(sub_matches, "input"), &options);
        }
        Some(("encode", sub_matches)) => {
            handle_encode_command(required(sub_matches, "input"));
        }
        Some(("normalize", sub_matches)) => {
            let source = read_input(required(sub_matches, "input"));
            print!("{}", normalize_checklist_markers(&source));
        }
        Some(("tokens", sub_matches)) => {
            let options = decode_options(&config, sub_matches.get_one::<String>("variables"));
            let source = read_input(required(sub_matches, "input"));
            print!(
                "{}",
                tokens::describe_runs(&source, &options.template_variables)
            );
        }
        Some(("reassign-ids", sub_matches)) => {
            handle_reassign_ids_command(required(sub_matches, "input"), &config);
        }
        Some(("copy", sub_matches)) => {
            let anchor = position(required(sub_matches, "anchor"));
            let focus = sub_matches
                .get_one::<String>("focus")
                .map(String::as_str)
                .map(position);
            let quirks = BrowserQuirks {
                safari: sub_matches.get_flag("safari"),
            };
            handle_copy_command(required(sub_matches, "input"), anchor, focus, &quirks, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn required<'a>(matches: &'a clap::ArgMatches, id: &str) -> &'a str {
    match matches.get_one::<String>(id) {
        Some(value) => value,
        None => {
            eprintln!("Error: missing required argument '{id}'");
            std::process::exit(2);
        }
    }
}

fn read_input(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

fn handle_convert_command(
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
    options: &DecodeOptions,
) {
    let registry = FormatRegistry::default();

    if let Err(e) = registry.get(from) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    if let Err(e) = registry.get(to) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let source = read_input(input);
    let doc = registry.parse(&source, from, options).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });
    let result = registry.serialize(&doc, to).unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });

    match output {
        Some(path) => {
            fs::write(path, result).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => println!("{result}"),
    }
}

fn handle_decode_command(input: &str, options: &DecodeOptions) {
    let doc = decode(&read_input(input), options);
    match serialize_to_json(&doc) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        }
    }
}

fn handle_encode_command(input: &str) {
    let doc = parse_from_json(&read_input(input)).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });
    // Surface the error here; the library entry point would print nothing.
    if let Err(e) = try_encode(&doc) {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    }
    println!("{}", encode(&doc));
}

fn handle_reassign_ids_command(input: &str, config: &PneumaticConfig) {
    let mut doc = decode(&read_input(input), &DecodeOptions::from(&config.markdown));
    let mut taken = doc.api_names();
    let mut ids = UuidIdGenerator::from(&config.ids);
    reassign_ids(&mut doc.blocks, &mut taken, &mut ids);
    if let Err(e) = try_encode(&doc) {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    }
    println!("{}", encode(&doc));
}

fn position(raw: &str) -> copy::Position {
    copy::parse_position(raw).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(2);
    })
}

fn handle_copy_command(
    input: &str,
    anchor: copy::Position,
    focus: Option<copy::Position>,
    quirks: &BrowserQuirks,
    config: &PneumaticConfig,
) {
    let document: LegacyDocument = serde_json::from_str(&read_input(input)).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });
    let options = ClipboardOptions::from(config.clipboard);
    let Some(payload) = copy::copy_payload(document, anchor, focus, &options, quirks) else {
        eprintln!("Error: nothing could be written");
        std::process::exit(1);
    };
    match copy::payload_to_json(&payload) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        }
    }
}

fn handle_list_formats_command() {
    println!("Available formats:\n");
    let registry = FormatRegistry::default();
    for format_name in registry.list_formats() {
        if let Ok(format) = registry.get(&format_name) {
            let mut modes = Vec::new();
            if format.supports_parsing() {
                modes.push("parse");
            }
            if format.supports_serialization() {
                modes.push("serialize");
            }
            println!(
                "  {format_name:<10} {:<16} .{}",
                modes.join("+"),
                format.file_extensions().join(", .")
            );
        }
    }
}

fn load_variables(path: &str) -> VariableCatalog {
    let entries: Vec<VariableCatalogEntry> = serde_json::from_str(&read_input(path))
        .unwrap_or_else(|e| {
            eprintln!("Invalid variables file '{path}': {e}");
            std::process::exit(1);
        });
    tracing::debug!(count = entries.len(), "loaded template variables");
    entries.into()
}

fn decode_options(config: &PneumaticConfig, variables: Option<&String>) -> DecodeOptions {
    let mut options = DecodeOptions::from(&config.markdown);
    if let Some(path) = variables {
        options.template_variables = load_variables(path);
    }
    options
}

fn init_logging(config: &PneumaticConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// `--extra-*` keys and the configuration keys they override.
const CONFIG_OVERRIDES: &[(&str, &str)] = &[
    ("normalize-checklists", "markdown.normalize_checklists"),
    ("list-prefix", "ids.list_prefix"),
    ("item-prefix", "ids.item_prefix"),
    ("write-html", "clipboard.write_html"),
    ("write-json", "clipboard.write_json"),
    ("log-level", "logging.level"),
];

fn load_cli_config(
    explicit_path: Option<&str>,
    extra_params: &mut HashMap<String, String>,
) -> PneumaticConfig {
    let loader = Loader::new().with_optional_file("pneumatic.toml");
    let mut loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    for (flag, key) in CONFIG_OVERRIDES {
        let Some(raw) = extra_params.remove(*flag) else {
            continue;
        };
        let applied = if key.ends_with("normalize_checklists") || key.contains("write_") {
            loader.set_override(key, parse_bool_arg(flag, &raw))
        } else {
            loader.set_override(key, raw)
        };
        loader = applied.unwrap_or_else(|err| {
            eprintln!("Invalid override --extra-{flag}: {err}");
            std::process::exit(1);
        });
    }

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
