//! Command dispatch

use std::io::{self, Read};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, FlowState, LineError, TocService};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::TocDocument;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::tree_traits::TreeNodeConvert;
use crate::util::path::is_stdio;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see 'tocsmith --help'".to_string(),
        ));
    };

    // Commands that need no settings
    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "tocsmith", &mut io::stdout());
            return Ok(());
        }
        Commands::Config {
            command: ConfigCommands::Template,
        } => {
            output::info(&Settings::template());
            return Ok(());
        }
        _ => {}
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);
    let service = container.toc_service();

    match command {
        Commands::Market { title } => cmd_market(&service, title),
        Commands::Template { title, json } => cmd_template(&service, title.as_deref(), *json),
        Commands::Serialize {
            document,
            template_style,
        } => cmd_serialize(&service, document, *template_style),
        Commands::Parse { input, output } => cmd_parse(&service, input, output.as_deref()),
        Commands::Import { input, output } => cmd_import(&service, input, output.as_deref()),
        Commands::Tree { document } => cmd_tree(&service, document),
        Commands::Config { command } => cmd_config(&service, command, cli.config.as_deref()),
        Commands::Completion { .. } => Ok(()),
    }
}

// ============================================================
// Input / output helpers
// ============================================================

fn read_input(service: &TocService, path: &Path) -> CliResult<String> {
    if is_stdio(path) {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| InfraError::io("read stdin", e))?;
        return Ok(text);
    }
    if !path.exists() {
        return Err(CliError::InvalidArgs(format!(
            "file not found: {}",
            path.display()
        )));
    }
    Ok(service.read_text(path)?)
}

fn load_document(service: &TocService, path: &Path) -> CliResult<TocDocument> {
    if is_stdio(path) {
        let json = read_input(service, path)?;
        return Ok(service.document_from_json(&json, "stdin")?);
    }
    if !path.exists() {
        return Err(CliError::InvalidArgs(format!(
            "file not found: {}",
            path.display()
        )));
    }
    Ok(service.load_document(path)?)
}

fn emit_document(
    service: &TocService,
    document: &TocDocument,
    output: Option<&Path>,
) -> CliResult<()> {
    match output.filter(|p| !is_stdio(p)) {
        Some(path) => {
            service.save_document(document, path)?;
            output::success(&format!(
                "{} chapters, {} nodes -> {}",
                document.chapters.len(),
                document.node_count(),
                path.display()
            ));
        }
        None => output::info(&service.to_json(document)?),
    }
    Ok(())
}

fn report_line_errors(errors: &[LineError]) -> CliError {
    output::error(&format!("template rejected ({} problem(s))", errors.len()));
    for e in errors {
        output::failure(e);
    }
    CliError::Rejected {
        count: errors.len(),
    }
}

// ============================================================
// Commands
// ============================================================

fn cmd_market(service: &TocService, title: &str) -> CliResult<()> {
    let extractor = service.settings().market_extractor()?;
    output::info(&extractor.extract(title));
    Ok(())
}

#[instrument(level = "debug", skip(service))]
fn cmd_template(service: &TocService, title: Option<&str>, json: bool) -> CliResult<()> {
    let Some(title) = title else {
        output::info(&service.load_template()?);
        return Ok(());
    };

    let mut flow = service.generate(title)?;
    if !json {
        output::info(flow.text());
        return Ok(());
    }

    flow.edit().map_err(ApplicationError::from)?;
    let parser = service.template_parser();
    let state = flow.submit(&parser).map_err(ApplicationError::from)?;
    if let FlowState::Error { errors, .. } = state {
        return Err(report_line_errors(errors));
    }
    let document = flow.confirm().map_err(ApplicationError::from)?;
    emit_document(service, &document, None)
}

fn cmd_serialize(service: &TocService, path: &Path, template_style: bool) -> CliResult<()> {
    let document = load_document(service, path)?;
    output::info(&service.render_text(&document, template_style));
    Ok(())
}

#[instrument(level = "debug", skip(service))]
fn cmd_parse(service: &TocService, input: &Path, output: Option<&Path>) -> CliResult<()> {
    let text = read_input(service, input)?;
    let document = service.parse_text(&text);
    debug!("parsed {} nodes", document.node_count());
    if document.is_empty() && !text.trim().is_empty() {
        output::warning("no outline lines recognized");
    }
    emit_document(service, &document, output)
}

#[instrument(level = "debug", skip(service))]
fn cmd_import(service: &TocService, input: &Path, output: Option<&Path>) -> CliResult<()> {
    let text = read_input(service, input)?;
    match service.import_template_text(&text) {
        Ok(document) => emit_document(service, &document, output),
        Err(errors) => Err(report_line_errors(&errors)),
    }
}

fn cmd_tree(service: &TocService, path: &Path) -> CliResult<()> {
    let document = load_document(service, path)?;
    output::info(&document.to_tree_string());
    Ok(())
}

fn cmd_config(
    service: &TocService,
    command: &ConfigCommands,
    explicit: Option<&Path>,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::header("# effective configuration");
            output::info(&service.settings().to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => {
                    let marker = if path.exists() { "" } else { " (not found)" };
                    output::action("global", &format!("{}{}", path.display(), marker));
                }
                None => output::warning("no config directory on this platform"),
            }
            if let Some(path) = explicit {
                output::action("explicit", &path.display());
            }
        }
    }
    Ok(())
}
