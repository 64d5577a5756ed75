/* Generate command - parse a .cfg file and write the C artifacts */

use anyhow::{bail, Context};
use cfg_gen::codegen::c::{CCodeGenerator, CCodeGeneratorOptions};
use cfg_gen::codegen::template::TemplateOptions;
use cfg_gen::{parse_definitions, resolve, Diagnostic, Model};
use clap::ValueEnum;
use std::path::{Path, PathBuf};

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum ModelFormat {
  Json,
  Yaml,
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
  pub input: PathBuf,
  pub cfile: Option<PathBuf>,
  pub hfile: Option<PathBuf>,
  pub conf: Option<PathBuf>,
  pub commented_template: bool,
  pub print_model: Option<ModelFormat>,
  pub verbose: bool,
}

/* Output locations after defaults and extension checks */
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
  pub cfile: PathBuf,
  pub hfile: PathBuf,
  pub conf: Option<PathBuf>,
}

fn has_extension(path: &Path, ext: &str) -> bool {
  path.extension().is_some_and(|e| e == ext) && path.file_stem().is_some_and(|s| !s.is_empty())
}

pub fn output_paths(options: &GenerateOptions) -> anyhow::Result<OutputPaths> {
  if !has_extension(&options.input, "cfg") {
    bail!("Input should be a .cfg file: {}", options.input.display());
  }

  let hfile = options.hfile.clone().unwrap_or_else(|| options.input.with_extension("h"));
  if !has_extension(&hfile, "h") {
    bail!("Header file should be a .h file: {}", hfile.display());
  }

  let cfile = options.cfile.clone().unwrap_or_else(|| options.input.with_extension("c"));
  if !has_extension(&cfile, "c") {
    bail!("Source file should be a .c file: {}", cfile.display());
  }

  Ok(OutputPaths { cfile, hfile, conf: options.conf.clone() })
}

/* Execute the generate command */
pub fn run(options: &GenerateOptions) -> anyhow::Result<()> {
  let paths = output_paths(options)?;

  if options.verbose {
    println!("[~] Configuration:");
    println!("  Input: {}", options.input.display());
    println!("  Header: {}", paths.hfile.display());
    println!("  Source: {}", paths.cfile.display());
    if let Some(conf) = &paths.conf {
      println!("  Template: {}", conf.display());
    }
    println!();
  }

  let source = std::fs::read_to_string(&options.input)
    .with_context(|| format!("Unable to open input file {}", options.input.display()))?;

  let parsed = parse_definitions(&source);
  report_diagnostics(&parsed.diagnostics);

  if options.verbose {
    println!(
      "[~] Parsed {} macro(s), {} struct(s), {} variable(s)",
      parsed.builder.macros().len(),
      parsed.builder.structs().len(),
      parsed.builder.vars().len()
    );
  }

  let model = resolve(parsed.builder).context("Type resolution failed")?;

  if options.verbose {
    let basic: Vec<&str> = model.basic_types().iter().map(String::as_str).collect();
    println!("[✓] Type resolution successful (basic types: {})", basic.join(", "));
  }

  if let Some(format) = options.print_model {
    print_model(&model, format)?;
  }

  let header_file = paths
    .hfile
    .file_name()
    .map(|s| s.to_string_lossy().to_string())
    .unwrap_or_default();
  let generator = CCodeGenerator::new(
    &model,
    CCodeGeneratorOptions {
      header_file,
      source_name: options.input.file_name().map(|s| s.to_string_lossy().to_string()),
      template: TemplateOptions { commented: options.commented_template },
    },
  );
  let generated = generator.emit_code();
  report_diagnostics(&generated.diagnostics);

  write_output(&paths.hfile, &generated.header, options.verbose)?;
  write_output(&paths.cfile, &generated.source, options.verbose)?;
  if let Some(conf) = &paths.conf {
    write_output(conf, &generated.template, options.verbose)?;
  }

  if options.verbose {
    println!("[✓] Code generation complete!");
  }
  Ok(())
}

fn report_diagnostics(diagnostics: &[Diagnostic]) {
  for diagnostic in diagnostics {
    eprintln!("[!] {}", diagnostic);
  }
}

fn write_output(path: &Path, contents: &str, verbose: bool) -> anyhow::Result<()> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("Unable to create directory {}", parent.display()))?;
  }
  std::fs::write(path, contents).with_context(|| format!("Unable to write {}", path.display()))?;
  if verbose {
    println!("[✓] Wrote {}", path.display());
  }
  Ok(())
}

fn print_model(model: &Model, format: ModelFormat) -> anyhow::Result<()> {
  match format {
    ModelFormat::Json => {
      println!("\n[~] Resolved model (JSON)");
      println!("========================");
      println!("{}", serde_json::to_string_pretty(model)?);
    }
    ModelFormat::Yaml => {
      println!("\n[~] Resolved model (YAML)");
      println!("========================");
      println!("{}", serde_yml::to_string(model)?);
    }
  }
  println!();
  Ok(())
}
