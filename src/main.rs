mod link;
mod markup;
mod preset;
mod registry;
mod store;

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr as _;

use clap::{
    Parser as _,
    builder::styling::{Color, RgbColor, Style, Styles},
};
use log::debug;
use url::Url;

use crate::link::{FieldValue, Target, Tracker};
use crate::preset::Preset;

#[derive(clap::Parser, Debug)]
#[command(name = "linkgen", version, about, styles = CLAP_STYLING)]
/// linkgen, a deep-link generator for issue trackers.
///
/// Composes create-issue URLs for Jira and ServiceNow, pre-populated with
/// field values. Field values may be rich-text HTML fragments; they get
/// converted to the tracker's markup dialect on the way out.
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    Generate(GenerateCommand),

    #[command(subcommand)]
    Fields(FieldsCommand),

    #[command(subcommand)]
    Preset(PresetCommand),
}

pub const CLAP_STYLING: Styles = Styles::styled()
    .usage(Style::new().fg_color(Some(Color::Rgb(RgbColor(0, 255, 0)))))
    .literal(Style::new().bold().fg_color(Some(Color::Rgb(RgbColor(220, 220, 0)))))
    .error(Style::new().fg_color(Some(Color::Rgb(RgbColor(255, 0, 0)))))
;

type DynResult<T = ()> = Result<T, Box<dyn Error>>;

fn main() -> DynResult {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(cmd) => cmd.run(),
        Command::Fields(FieldsCommand::List(cmd)) => cmd.run(),
        Command::Fields(FieldsCommand::Import(cmd)) => cmd.run(),
        Command::Preset(PresetCommand::List(cmd)) => cmd.run(),
        Command::Preset(PresetCommand::Save(cmd)) => cmd.run(),
        Command::Preset(PresetCommand::Delete(cmd)) => cmd.run(),
    }
}

/// Generate a create-issue link and print it.
#[derive(clap::Args, Debug)]
struct GenerateCommand {
    /// Tracker to target: jira or servicenow.
    #[arg(long, value_parser = Target::from_str)]
    target: Option<Target>,

    /// Base URL of the tracker, e.g. https://jira.example.com
    #[arg(long)]
    base_url: Option<String>,

    /// Jira project id.
    #[arg(long)]
    project: Option<String>,

    /// Jira issue type id.
    #[arg(long)]
    issue_type: Option<String>,

    /// ServiceNow table name, e.g. change_request.
    #[arg(long)]
    table: Option<String>,

    /// A field to populate, as name=value. The value may be an HTML
    /// fragment. Repeatable; appended after any preset fields.
    #[arg(long = "field", value_name = "NAME=VALUE")]
    fields: Vec<String>,

    /// Start from a saved preset (by id or name). Explicit flags win.
    #[arg(long)]
    preset: Option<String>,

    /// Presets file.
    #[arg(long, default_value = "presets.json")]
    presets_file: PathBuf,
}

impl GenerateCommand {
    fn run(self) -> DynResult {
        let mut target = self.target;
        let mut base_url = self.base_url;
        let mut project = self.project;
        let mut issue_type = self.issue_type;
        let mut table = self.table;
        let mut fields: Vec<FieldValue> = vec![];

        if let Some(key) = &self.preset {
            let preset = preset::find(&self.presets_file, key)?;
            debug!("using preset {} ({})", preset.id, preset.name);
            target = target.or(Some(preset.target));
            base_url = base_url.or(Some(preset.base_url));
            project = project.or(preset.project_id);
            issue_type = issue_type.or(preset.issue_type_id);
            table = table.or(preset.table_name);
            fields.extend(preset.fields);
        }

        fields.extend(parse_field_args(&self.fields)?);

        let target = target.ok_or("Missing --target (or --preset)")?;
        let base_url = clean_base_url(&base_url.ok_or("Missing --base-url")?)?;

        let tracker = match target {
            Target::Jira => Tracker::Jira {
                project_id: project.ok_or("The jira target needs --project")?,
                issue_type_id: issue_type.ok_or("The jira target needs --issue-type")?,
            },
            Target::ServiceNow => Tracker::ServiceNow {
                table_name: table.ok_or("The servicenow target needs --table")?,
            },
        };

        debug!("building {target} link with {} field(s)", fields.len());
        println!("{}", link::build_link(&base_url, &tracker, &fields));
        Ok(())
    }
}

#[derive(clap::Subcommand, Debug)]
enum FieldsCommand {
    List(FieldsListCommand),
    Import(FieldsImportCommand),
}

/// List the known field definitions.
#[derive(clap::Args, Debug)]
struct FieldsListCommand {
    /// Registry file. Falls back to the stock definitions when missing.
    #[arg(long, default_value = "fields.json")]
    file: PathBuf,
}

impl FieldsListCommand {
    fn run(self) -> DynResult {
        for def in registry::load(&self.file)? {
            println!("{:<32} {} ({})", def.id, def.label, def.category);
        }
        Ok(())
    }
}

/// Merge bookmarklet-scraped field metadata into the registry.
#[derive(clap::Args, Debug)]
struct FieldsImportCommand {
    /// JSON file written by the field-scraping bookmarklet.
    #[arg(long)]
    scraped: PathBuf,

    /// Registry file to merge into.
    #[arg(long, default_value = "fields.json")]
    file: PathBuf,
}

impl FieldsImportCommand {
    fn run(self) -> DynResult {
        let json = fs::read_to_string(&self.scraped)?;
        let defs = registry::parse_scraped(&json)?;
        let (added, replaced) = registry::merge(&self.file, defs)?;
        println!("Imported {added} new field(s), updated {replaced}.");
        Ok(())
    }
}

#[derive(clap::Subcommand, Debug)]
enum PresetCommand {
    List(PresetListCommand),
    Save(PresetSaveCommand),
    Delete(PresetDeleteCommand),
}

/// List saved presets.
#[derive(clap::Args, Debug)]
struct PresetListCommand {
    #[arg(long, default_value = "presets.json")]
    file: PathBuf,
}

impl PresetListCommand {
    fn run(self) -> DynResult {
        for preset in preset::load_all(&self.file)? {
            println!(
                "{:<16} {:<24} {:<12} {}",
                preset.id, preset.name, preset.target, preset.base_url
            );
        }
        Ok(())
    }
}

/// Save (or update) a preset.
#[derive(clap::Args, Debug)]
struct PresetSaveCommand {
    #[arg(long)]
    id: String,

    #[arg(long)]
    name: String,

    /// Tracker to target: jira or servicenow.
    #[arg(long, value_parser = Target::from_str)]
    target: Target,

    /// Base URL of the tracker.
    #[arg(long)]
    base_url: String,

    /// Jira project id.
    #[arg(long)]
    project: Option<String>,

    /// Jira issue type id.
    #[arg(long)]
    issue_type: Option<String>,

    /// ServiceNow table name.
    #[arg(long)]
    table: Option<String>,

    /// A field to pre-populate, as name=value. Repeatable.
    #[arg(long = "field", value_name = "NAME=VALUE")]
    fields: Vec<String>,

    #[arg(long, default_value = "presets.json")]
    file: PathBuf,
}

impl PresetSaveCommand {
    fn run(self) -> DynResult {
        let preset = Preset {
            id: self.id,
            name: self.name,
            target: self.target,
            base_url: clean_base_url(&self.base_url)?,
            project_id: self.project,
            issue_type_id: self.issue_type,
            table_name: self.table,
            fields: parse_field_args(&self.fields)?,
        };
        // Fail now, not at generate time, if the routing ids don't fit the
        // target.
        preset.tracker()?;
        preset::upsert(&self.file, preset)?;
        Ok(())
    }
}

/// Delete a preset by id.
#[derive(clap::Args, Debug)]
struct PresetDeleteCommand {
    id: String,

    #[arg(long, default_value = "presets.json")]
    file: PathBuf,
}

impl PresetDeleteCommand {
    fn run(self) -> DynResult {
        if !preset::delete(&self.file, &self.id)? {
            return Err(format!("No such preset: {}", self.id).into());
        }
        Ok(())
    }
}

fn parse_field_args(args: &[String]) -> DynResult<Vec<FieldValue>> {
    let mut fields = vec![];
    for arg in args {
        let Some((name, value)) = arg.split_once('=') else {
            return Err(format!("--field wants NAME=VALUE, got: {arg}").into());
        };
        fields.push(FieldValue {
            name: name.into(),
            value: value.into(),
        });
    }
    Ok(fields)
}

/// Check the base URL up front (link building itself never validates) and
/// trim any trailing slash so path joining doesn't double it.
fn clean_base_url(raw: &str) -> DynResult<String> {
    let parsed = Url::parse(raw)?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(format!("Unsupported URL scheme: {}", parsed.scheme()).into());
    }
    Ok(raw.trim_end_matches('/').to_string())
}
