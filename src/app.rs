use std::path::Path;

use serde::Serialize;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::AppError;
use crate::host::{Diagnostics, LocalHost};
use crate::host::local::Diagnostic;
use crate::output::{
    output_store_json, print_cleanup_table, print_store_table, print_system_check,
};
use crate::records::{ToolParam, log_warning, params_as_text, write_params};
use crate::scratch::{SessionRequest, SystemCheck, cleanup_stale_sessions, run_system_checks};
use crate::utils::{check_field, free_disk_space_gb, parse_assignment, str_to_bool};
use crate::xml::{self, NodeValue, read_values, write_values};

#[derive(Serialize)]
struct InitJson<'a> {
    #[serde(flatten)]
    check: &'a SystemCheck,
    diagnostics: Vec<Diagnostic>,
}

fn build_host(config: &Config) -> LocalHost {
    let host = LocalHost::new(config.extensions.clone());
    match &config.server_scratch_database {
        Some(path) => host.with_server_scratch(path.clone()),
        None => host,
    }
}

fn handle_init(
    cli: &Cli,
    config: &Config,
    folder: Option<&Path>,
    rerun: bool,
    scratch_path: Option<&Path>,
    json: bool,
) -> Result<(), AppError> {
    let host = build_host(config);
    let request = SessionRequest {
        folder,
        rerun,
        scratch_path,
    };

    let check = run_system_checks(&host, config, &request)?;
    if json {
        let out = InitJson {
            check: &check,
            diagnostics: host.diagnostics(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_system_check(&check, cli.use_color());
    }
    Ok(())
}

fn parse_node_values(assignments: &[String]) -> Result<Vec<NodeValue>, AppError> {
    assignments
        .iter()
        .map(|a| {
            let (name, label, value) = parse_assignment(a)?;
            Ok(NodeValue {
                name,
                value,
                display_name: label,
            })
        })
        .collect()
}

fn parse_tool_params(assignments: &[String]) -> Result<Vec<ToolParam>, AppError> {
    assignments
        .iter()
        .map(|a| {
            let (name, label, value) = parse_assignment(a)?;
            let display_name = label.unwrap_or_else(|| name.clone());
            let value = (!value.is_empty()).then_some(value);
            Ok(ToolParam::new(name, display_name, value))
        })
        .collect()
}

/// Dispatch a parsed command
pub(crate) fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    match &cli.command {
        Commands::Init {
            folder,
            rerun,
            scratch_path,
            json,
        } => handle_init(
            cli,
            config,
            folder.as_deref(),
            *rerun,
            scratch_path.as_deref(),
            *json,
        ),
        Commands::Read { file, names, quiet } => {
            let host = build_host(config);
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            let diagnostics: Option<&dyn Diagnostics> = if *quiet { None } else { Some(&host) };
            let values = read_values(file, &names, diagnostics)?;
            for value in values {
                println!("{value}");
            }
            Ok(())
        }
        Commands::Write { file, values } => {
            let values = parse_node_values(values)?;
            write_values(file, &values)?;
            Ok(())
        }
        Commands::Show { file, json } => {
            let doc = xml::load(file)?;
            if *json {
                println!("{}", output_store_json(&doc)?);
            } else {
                print_store_table(&doc, &file.display().to_string(), cli.use_color());
            }
            Ok(())
        }
        Commands::Params {
            folder,
            tool_name,
            params,
        } => {
            let params = parse_tool_params(params)?;
            tracing::debug!(values = ?params_as_text(&params), "recording parameters");
            write_params(&params, folder, tool_name.as_deref())?;
            Ok(())
        }
        Commands::Warn { folder, message } => {
            let key = log_warning(folder, message)?;
            println!("{key}");
            Ok(())
        }
        Commands::DiskSpace { path } => {
            let gb = free_disk_space_gb(path).map_err(|source| AppError::DiskSpace {
                path: path.clone(),
                source,
            })?;
            println!("{gb:.2}");
            Ok(())
        }
        Commands::CheckField { dataset, field } => {
            let host = build_host(config);
            println!("{}", check_field(&host, dataset, field)?);
            Ok(())
        }
        Commands::Cleanup { base, json } => {
            let base = base.clone().unwrap_or_else(|| config.scratch_path.clone());
            let report = cleanup_stale_sessions(&base);
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_cleanup_table(&report, cli.use_color());
            }
            Ok(())
        }
        Commands::ParseBool { value } => {
            println!("{}", str_to_bool(value)?);
            Ok(())
        }
    }
}
