use anyhow::{anyhow, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use flexui_cli::commands;
use flexui_cli::{BreakpointChoice, ModifyOptions};
use std::path::PathBuf;

fn document_arg() -> Arg {
    Arg::new("document")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Path to a FlexibleContent JSON document")
}

fn cli() -> Command {
    Command::new("flexui")
        .version(flexui_cli::VERSION)
        .about("FlexibleContent document tools")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("validate")
                .about("Parse and validate a document")
                .arg(document_arg()),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve a dotted path to a component id")
                .arg(document_arg())
                .arg(
                    Arg::new("path")
                        .required(true)
                        .help("Address such as sections.hero.components.0"),
                ),
        )
        .subcommand(
            Command::new("extract")
                .about("Recover a JSON object from a saved model reply")
                .arg(
                    Arg::new("reply")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Text file holding the reply"),
                ),
        )
        .subcommand(
            Command::new("styles")
                .about("Print a component's effective styles at a breakpoint")
                .arg(document_arg())
                .arg(Arg::new("component").required(true).help("Component id"))
                .arg(
                    Arg::new("breakpoint")
                        .long("breakpoint")
                        .conflicts_with("width")
                        .help("Breakpoint name (default, max-sm, ..., max-2xl)"),
                )
                .arg(
                    Arg::new("width")
                        .long("width")
                        .value_parser(value_parser!(u32))
                        .help("Viewport width in CSS pixels"),
                ),
        )
        .subcommand(
            Command::new("modify")
                .about("Apply a natural-language instruction via the configured oracle")
                .arg(document_arg())
                .arg(
                    Arg::new("instruction")
                        .long("instruction")
                        .short('i')
                        .required(true)
                        .help("What to change"),
                )
                .arg(
                    Arg::new("target-id")
                        .long("target-id")
                        .help("Restrict the change to this component id"),
                )
                .arg(
                    Arg::new("path")
                        .long("path")
                        .help("Restrict the change to the component at this address"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML configuration file"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the modified document here instead of stdout"),
                ),
        )
        .subcommand(Command::new("info").about("Show versions and operations"))
}

fn required<'a, T>(args: &'a ArgMatches, name: &str) -> Result<&'a T>
where
    T: Clone + Send + Sync + 'static,
{
    args.get_one::<T>(name)
        .ok_or_else(|| anyhow!("missing argument '{name}'"))
}

async fn run(matches: &ArgMatches) -> Result<String> {
    match matches.subcommand() {
        Some(("validate", args)) => commands::validate(required::<PathBuf>(args, "document")?),
        Some(("resolve", args)) => commands::resolve(
            required::<PathBuf>(args, "document")?,
            required::<String>(args, "path")?,
        ),
        Some(("extract", args)) => commands::extract(required::<PathBuf>(args, "reply")?),
        Some(("styles", args)) => {
            let choice = match (
                args.get_one::<String>("breakpoint"),
                args.get_one::<u32>("width"),
            ) {
                (Some(name), _) => BreakpointChoice::named(name)?,
                (None, Some(width)) => BreakpointChoice::Width(*width),
                (None, None) => BreakpointChoice::Named(flexui_schema::Breakpoint::Default),
            };
            commands::styles(
                required::<PathBuf>(args, "document")?,
                required::<String>(args, "component")?,
                choice,
            )
        }
        Some(("modify", args)) => {
            let options = ModifyOptions {
                document: required::<PathBuf>(args, "document")?.clone(),
                instruction: required::<String>(args, "instruction")?.clone(),
                target_id: args.get_one::<String>("target-id").cloned(),
                path: args.get_one::<String>("path").cloned(),
                config: args.get_one::<PathBuf>("config").cloned(),
                out: args.get_one::<PathBuf>("out").cloned(),
            };
            commands::modify(&options).await
        }
        Some(("info", _)) => Ok(commands::info()),
        Some((other, _)) => Err(anyhow!("unknown subcommand '{other}'")),
        None => Err(anyhow!("no subcommand given")),
    }
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();
    flexui_cli::logging::init(matches.get_flag("log-json"));

    match run(&matches).await {
        Ok(output) => println!("{output}"),
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn modify_requires_instruction() {
        let result = cli().try_get_matches_from(["flexui", "modify", "doc.json"]);
        assert!(result.is_err());
    }
}
