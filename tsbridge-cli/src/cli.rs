//! Command-line interface: `generate` and `check` over XML type schemas.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use tsbridge_codegen::Converter;
use tsbridge_core::TypeKey;
use tsbridge_schema::{Schema, SchemaIr};

/// Generate TypeScript classes, interfaces and enums from XML type schemas
#[derive(Parser, Debug)]
#[command(name = "tsbridge", version)]
pub struct CommandLineInterface {
    /// log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// convert a schema to TypeScript
    Generate(GenerateArgs),
    /// parse and validate a schema without generating anything
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// XML type schema
    #[arg(short, long)]
    schema: PathBuf,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// XML type schema
    #[arg(short, long)]
    schema: PathBuf,

    /// output .ts file (stdout if omitted); custom code in it is preserved
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// prefix of every emitted type name
    #[arg(long, default_value = "")]
    prefix: String,

    /// suffix of every emitted type name, placed after the prefix
    #[arg(long, default_value = "")]
    suffix: String,

    /// refer to other types by their prefixed and suffixed names
    #[arg(long)]
    prefixed_references: bool,

    /// indentation of one nesting level
    #[arg(long, default_value = "    ")]
    indent: String,

    /// emit interfaces instead of classes
    #[arg(long)]
    interface: bool,

    /// omit the static createFrom factory
    #[arg(long)]
    no_create_from: bool,

    /// omit the export keyword
    #[arg(long)]
    no_export: bool,

    /// extension of the backup written before overwriting --out
    #[arg(long, default_value = "backup")]
    backup_ext: String,

    /// overwrite --out without a backup
    #[arg(long)]
    no_backup: bool,

    /// root type to emit, replacing the schema's roots (repeatable)
    #[arg(long = "root")]
    roots: Vec<String>,
}

impl CommandLineInterface {
    pub fn run(self) -> anyhow::Result<()> {
        match self.cmd {
            Command::Generate(args) => args.run(),
            Command::Check(args) => args.run(),
        }
    }
}

fn load_schema(path: &Path) -> anyhow::Result<SchemaIr> {
    let schema: Schema = tsbridge_schema::parse_schema_file(path)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    SchemaIr::from_schema(&schema).with_context(|| format!("invalid schema {}", path.display()))
}

impl CheckArgs {
    fn run(self) -> anyhow::Result<()> {
        let ir = load_schema(&self.schema)?;
        println!(
            "{}: {} types, {} roots",
            self.schema.display(),
            ir.types.len(),
            ir.roots.len()
        );
        Ok(())
    }
}

impl GenerateArgs {
    fn converter(&self) -> Converter {
        let converter = Converter::new()
            .prefix(&self.prefix)
            .suffix(&self.suffix)
            .indent(&self.indent)
            .prefixed_references(self.prefixed_references)
            .use_interface(self.interface)
            .create_from_method(!self.no_create_from)
            .export(!self.no_export);
        if self.no_backup {
            converter.without_backup()
        } else {
            converter.backup_extension(&self.backup_ext)
        }
    }

    fn run(self) -> anyhow::Result<()> {
        let ir = load_schema(&self.schema)?;
        let mut converter = self.converter();
        if self.roots.is_empty() {
            converter.add_schema(ir);
        } else {
            converter.add_types(ir.types);
            for root in &self.roots {
                converter.add_type(TypeKey::new(root));
            }
        }

        match &self.out {
            Some(out) => {
                converter
                    .convert_to_file(out)
                    .with_context(|| format!("failed to generate {}", out.display()))?;
                info!(path = %out.display(), "generated");
            }
            None => {
                let code = converter.convert(None)?;
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{code}")?;
            }
        }
        Ok(())
    }
}
