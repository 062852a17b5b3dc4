//! `fw`: convert a captured design selection into Tailwind markup.
//!
//! `fw convert` reads a host snapshot (JSON) from disk; `fw remote` fetches
//! nodes from the REST API. Markup goes to stdout, warnings to stderr, and
//! `RUST_LOG` controls diagnostic logging.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fw_core::{
    Conversion, GenerationMode, NoVariables, Settings, SnapshotNode, StaticVariables, convert,
};
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Parser, Debug)]
#[command(name = "fw", version)]
#[command(about = "Figwind: design nodes to Tailwind markup")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Settings JSON file
    #[arg(long, global = true, env = "FW_SETTINGS")]
    settings: Option<PathBuf>,

    /// Emit JSX (`className`, self-closing tags)
    #[arg(long, global = true, conflicts_with = "html")]
    jsx: bool,

    /// Emit HTML (`class`, explicit close tags)
    #[arg(long, global = true)]
    html: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a captured host snapshot
    Convert {
        /// Snapshot JSON: one node or an array of top-level nodes
        snapshot: PathBuf,

        /// Color variable names as a JSON object of id → name
        #[arg(long)]
        variables: Option<PathBuf>,

        /// Print the normalized tree as JSON instead of markup
        #[arg(long)]
        dump_tree: bool,

        /// Also print the text styles found in the selection
        #[arg(long)]
        text_styles: bool,
    },
    /// Fetch nodes from the REST API and convert them
    Remote {
        file_id: String,

        /// Comma-separated node ids (`1:2` or `1-2`)
        node_ids: String,

        #[arg(long, env = "FIGMA_TOKEN", hide_env_values = true)]
        token: String,
    },
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

async fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.settings {
        Some(path) => Settings::from_json(&read(path).await?)
            .with_context(|| format!("invalid settings in {}", path.display()))?,
        None => Settings::default(),
    };
    if cli.html {
        settings.generation_mode = GenerationMode::Html;
    } else if cli.jsx {
        settings.generation_mode = GenerationMode::Jsx;
    }
    Ok(settings)
}

fn report(conversion: &Conversion, dump_tree: bool, text_styles: bool) -> Result<()> {
    for warning in &conversion.warnings {
        eprintln!("warning: {warning}");
    }
    if dump_tree {
        println!("{}", serde_json::to_string_pretty(&conversion.tree)?);
    } else {
        println!("{}", conversion.code);
    }
    if text_styles {
        println!("{}", conversion.text_styles_report());
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli).await?;
    match cli.command {
        Command::Convert {
            snapshot,
            variables,
            dump_tree,
            text_styles,
        } => {
            let nodes = SnapshotNode::load_selection(&read(&snapshot).await?)
                .with_context(|| format!("invalid snapshot in {}", snapshot.display()))?;
            log::debug!("loaded {} top-level node(s)", nodes.len());

            let conversion = match variables {
                Some(path) => {
                    let names = StaticVariables::from_json(&read(&path).await?)
                        .with_context(|| format!("invalid variables in {}", path.display()))?;
                    convert(&nodes, settings, Rc::new(names)).await?
                }
                None => convert(&nodes, settings, Rc::new(NoVariables)).await?,
            };
            report(&conversion, dump_tree, text_styles)
        }
        Command::Remote {
            file_id,
            node_ids,
            token,
        } => {
            let code =
                fw_remote::generate_from_remote(&token, &file_id, &node_ids, settings).await?;
            println!("{code}");
            Ok(())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    run(Cli::parse()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["fw", "convert", "in.json", "--html", "--dump-tree"]).unwrap();
        assert!(cli.html);
        assert!(matches!(cli.command, Command::Convert { dump_tree: true, .. }));
    }

    #[test]
    fn jsx_and_html_conflict() {
        assert!(Cli::try_parse_from(["fw", "--jsx", "--html", "convert", "in.json"]).is_err());
    }

    #[tokio::test]
    async fn mode_flag_overrides_defaults() {
        let cli = Cli::try_parse_from(["fw", "--html", "convert", "in.json"]).unwrap();
        let settings = load_settings(&cli).await.unwrap();
        assert_eq!(settings.generation_mode, GenerationMode::Html);
    }
}
