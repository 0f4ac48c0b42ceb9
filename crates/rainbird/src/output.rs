use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use rainbird_controller::DecodedResponse;
use rainbird_sip::{to_hex, CommandSpec};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn print_response(response: &DecodedResponse, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", to_json(response)),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["_type".to_string(), response.response_type.to_string()]);
            for (name, value) in &response.fields {
                table.add_row(vec![name.to_string(), value.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{}:", response.response_type);
            let width = response.fields.keys().map(|k| k.len()).max().unwrap_or(0);
            for (name, value) in &response.fields {
                println!("  {name:<width$}  {value}");
            }
        }
    }
}

#[derive(Serialize)]
struct ParamOutput {
    name: &'static str,
    width: usize,
}

#[derive(Serialize)]
struct CommandOutput {
    name: &'static str,
    opcode: String,
    params: Vec<ParamOutput>,
    length: usize,
    response: String,
}

impl From<&CommandSpec> for CommandOutput {
    fn from(spec: &CommandSpec) -> Self {
        Self {
            name: spec.name,
            opcode: to_hex(spec.opcode.into(), 2),
            params: spec
                .params
                .iter()
                .map(|p| ParamOutput {
                    name: p.name,
                    width: p.width,
                })
                .collect(),
            length: spec.length,
            response: to_hex(spec.response.into(), 2),
        }
    }
}

pub fn print_commands(commands: &[&CommandSpec], format: OutputFormat) {
    let rows: Vec<CommandOutput> = commands.iter().map(|c| CommandOutput::from(*c)).collect();
    match format {
        OutputFormat::Json => println!("{}", to_json(&rows)),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OPCODE", "NAME", "PARAMS", "LENGTH", "RESPONSE"]);
            for row in &rows {
                table.add_row(vec![
                    row.opcode.clone(),
                    row.name.to_string(),
                    param_summary(&row.params),
                    row.length.to_string(),
                    row.response.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in &rows {
                println!(
                    "{} {:<34} -> {} ({} bytes) {}",
                    row.opcode,
                    row.name,
                    row.response,
                    row.length,
                    param_summary(&row.params)
                );
            }
        }
    }
}

fn param_summary(params: &[ParamOutput]) -> String {
    params
        .iter()
        .map(|p| format!("{}:{}", p.name, p.width))
        .collect::<Vec<_>>()
        .join(", ")
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}
