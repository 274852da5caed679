use anyhow::{Context, anyhow};
use clap::{ArgAction, Parser, Subcommand};
use inkpad::Config;
use inkpad::draw::{BackgroundStyle, generate};
use inkpad::input::{Tool, ToolState, ToolStateMachine};
use inkpad::session::{PersistOptions, inspect_file};
use inkpad::util::{color_to_name, parse_color};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "inkpad")]
#[command(version, about = "Freehand ink engine for note-taking surfaces")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the repeating tile for a paper style as JSON
    Background {
        /// Paper style (none, rule, grid)
        #[arg(value_name = "STYLE")]
        style: String,
    },

    /// Print the drawing attributes a tool would paint with as JSON
    Resolve {
        /// Tool (pen, highlighter, eraser, select, text)
        #[arg(long, default_value = "pen")]
        tool: String,

        /// Color name or #RRGGBB
        #[arg(long, default_value = "black")]
        color: String,

        /// Tip size in pixels
        #[arg(long, default_value_t = 4.0)]
        size: f64,

        /// Enable the calligraphy tip (pen only)
        #[arg(long, action = ArgAction::SetTrue)]
        calligraphy: bool,
    },

    /// Summarise a saved stroke file
    Inspect {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Write the documented example config to the config directory
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Background { style } => {
            let style: BackgroundStyle = style
                .parse()
                .map_err(|_| anyhow!("Unknown background style '{}' (expected none, rule or grid)", style))?;
            let tile = generate(style);
            println!("{}", serde_json::to_string_pretty(&tile)?);
        }
        Command::Resolve {
            tool,
            color,
            size,
            calligraphy,
        } => {
            let tool: Tool = tool.parse().map_err(|_| {
                anyhow!(
                    "Unknown tool '{}' (expected pen, highlighter, eraser, select or text)",
                    tool
                )
            })?;
            let color = parse_color(&color).map_err(|err| anyhow!(err))?;
            let config = Config::load()?;
            let machine = ToolStateMachine::new(
                ToolState {
                    active_tool: tool,
                    current_color: color,
                    current_size: size,
                    calligraphy_enabled: calligraphy,
                    ..config.tool_state()
                },
                config.attribute_rules(),
            );
            let attributes = machine.attributes();
            log::debug!(
                "Resolved {} with {} color",
                tool.as_str(),
                color_to_name(&attributes.color)
            );
            println!("{}", serde_json::to_string_pretty(&attributes)?);
        }
        Command::Inspect { file } => {
            let config = Config::load()?;
            let options = PersistOptions::from_config(&config.persistence);
            let info = inspect_file(&file, &options)
                .with_context(|| format!("Failed to inspect {}", file.display()))?;

            println!("File:          {}", info.path.display());
            println!("Size:          {} bytes", info.size_bytes);
            println!("Compressed:    {}", if info.compressed { "yes" } else { "no" });
            println!("Version:       {}", info.version);
            println!("Last modified: {}", info.last_modified);
            println!("Strokes:       {}", info.stroke_count);
            println!("Points:        {}", info.point_count);
        }
        Command::InitConfig => {
            let path = Config::get_config_path()?;
            Config::create_default_file(&path)?;
            println!("Created config at {}", path.display());
        }
    }

    Ok(())
}
