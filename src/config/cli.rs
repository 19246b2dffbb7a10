use crate::core::engine::{OutputMode, PrintTarget, RunRequest};
use crate::core::normalizer::FieldEdit;
use crate::domain::ports::ConfigProvider;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "sada-client")]
#[command(about = "Liquidación de trámites ante la Cámara de Comercio (constitución, compraventa, renovación)")]
pub struct CliConfig {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base URL of the calculation service (overrides the config file)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: TransactionCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum TransactionCommand {
    /// Constitución de sociedad
    Constitucion(IncorporationArgs),
    /// Compraventa de establecimiento de comercio
    Compraventa(TransferArgs),
    /// Renovación de matrícula mercantil
    Renovacion(RenewalArgs),
}

impl TransactionCommand {
    pub fn output(&self) -> &OutputArgs {
        match self {
            TransactionCommand::Constitucion(args) => &args.output,
            TransactionCommand::Compraventa(args) => &args.output,
            TransactionCommand::Renovacion(args) => &args.output,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Print the result as JSON instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Open the printable result in the browser and send it to the printer
    #[arg(long)]
    pub print: bool,

    /// Write the printable result to this file instead of opening it
    #[arg(long, value_name = "PATH")]
    pub print_output: Option<PathBuf>,
}

impl OutputArgs {
    pub fn to_request<C: ConfigProvider + ?Sized>(&self, config: &C) -> RunRequest {
        let print = match (&self.print_output, self.print) {
            (Some(path), _) => PrintTarget::File(path.clone()),
            (None, true) => PrintTarget::Browser(config.print_output_dir().map(PathBuf::from)),
            (None, false) => PrintTarget::None,
        };

        RunRequest {
            output: if self.json {
                OutputMode::Json
            } else {
                OutputMode::Text
            },
            print,
            auto_print: config.auto_print(),
        }
    }
}

/// Amounts accept es-CO grouping, e.g. `10.000.000`.
#[derive(Debug, Clone, Args)]
pub struct IncorporationArgs {
    #[arg(long, value_name = "MONTO")]
    pub capital_suscrito: Option<String>,

    #[arg(long, value_name = "MONTO")]
    pub capital_pagado: Option<String>,

    /// `1` or `2` (two or more)
    #[arg(long, value_name = "1|2")]
    pub accionistas: Option<String>,

    #[arg(long)]
    pub matricula_establecimiento: bool,

    #[arg(long)]
    pub aporte_establecimiento: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl IncorporationArgs {
    pub fn edits(&self) -> Vec<FieldEdit> {
        let mut edits = Vec::new();
        if let Some(text) = &self.capital_suscrito {
            edits.push(FieldEdit::text("capitalSuscrito", text));
        }
        if let Some(text) = &self.capital_pagado {
            edits.push(FieldEdit::text("capitalPagado", text));
        }
        if let Some(code) = &self.accionistas {
            edits.push(FieldEdit::select("numeroAccionistas", code));
        }
        edits.push(FieldEdit::toggle(
            "matriculaEstablecimiento",
            self.matricula_establecimiento,
        ));
        edits.push(FieldEdit::toggle(
            "aporteEstablecimiento",
            self.aporte_establecimiento,
        ));
        edits
    }
}

#[derive(Debug, Clone, Args)]
pub struct TransferArgs {
    #[arg(long, value_name = "MONTO")]
    pub valor_venta: Option<String>,

    #[arg(long)]
    pub matricular_comprador: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl TransferArgs {
    pub fn edits(&self) -> Vec<FieldEdit> {
        let mut edits = Vec::new();
        if let Some(text) = &self.valor_venta {
            edits.push(FieldEdit::text("valorVentaEstablecimiento", text));
        }
        edits.push(FieldEdit::toggle(
            "matricularComprador",
            self.matricular_comprador,
        ));
        edits
    }
}

#[derive(Debug, Clone, Args)]
pub struct RenewalArgs {
    #[arg(long, value_name = "MONTO")]
    pub activos: Option<String>,

    /// Establishments in the same jurisdiction (default 1)
    #[arg(long, value_name = "N")]
    pub misma_jurisdiccion: Option<String>,

    /// Establishments in other jurisdictions (default 0)
    #[arg(long, value_name = "N")]
    pub otra_jurisdiccion: Option<String>,

    /// `PN` (natural) or `PJ` (jurídica)
    #[arg(long, value_name = "PN|PJ")]
    pub tipo_persona: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl RenewalArgs {
    pub fn edits(&self) -> Vec<FieldEdit> {
        let mut edits = Vec::new();
        if let Some(text) = &self.activos {
            edits.push(FieldEdit::text("activos", text));
        }
        if let Some(text) = &self.misma_jurisdiccion {
            edits.push(FieldEdit::text("establecimientosMismaJurisdiccion", text));
        }
        if let Some(text) = &self.otra_jurisdiccion {
            edits.push(FieldEdit::text("establecimientosOtraJurisdiccion", text));
        }
        if let Some(code) = &self.tipo_persona {
            edits.push(FieldEdit::select("tipoPersona", code));
        }
        edits
    }
}
