use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;

use clap::Parser;
use owo_colors::OwoColorize;
use snipdoc_cli::Commands;
use snipdoc_cli::OutputFormat;
use snipdoc_cli::SnipCli;
use snipdoc_core::BuildReport;
use snipdoc_core::Builder;
use snipdoc_core::Registry;
use snipdoc_core::SnipError;
use snipdoc_core::Warnings;
use snipdoc_core::config::SnipConfig;
use snipdoc_core::is_supported_file;
use snipdoc_core::watch::WatchGate;
use snipdoc_core::watch::watch;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = SnipCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose);

	let result = match &args.command {
		Some(Commands::Build {
			input,
			output,
			watch,
			format,
		}) => run_build(&args, input, output, *watch, *format),
		Some(Commands::List { input, format }) => run_list(input, *format),
		None => {
			eprintln!("No subcommand specified. Run `snipdoc --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Render through miette for rich diagnostics with help text and error
		// codes.
		match e.downcast::<SnipError>() {
			Ok(snip_err) => {
				let report: miette::Report = (*snip_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Build warnings are printed by the command itself, so library logs default
/// to errors only. `RUST_LOG` overrides the default.
fn init_tracing(verbose: bool) {
	let default_directive = if verbose {
		"snipdoc_core=debug"
	} else {
		"snipdoc_core=error"
	};
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.without_time()
		.init();
}

fn load_config(input: &Path) -> Result<SnipConfig, Box<dyn std::error::Error>> {
	Ok(SnipConfig::load_or_default(input)?)
}

fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}

fn print_warnings(warnings: &Warnings) {
	for warning in warnings.iter() {
		eprintln!("{} {warning}", colored!("warning:", yellow));
	}
}

fn print_section(title: &str) {
	println!();
	println!("{}", colored!(title, bold));
}

fn run_build(
	args: &SnipCli,
	input: &Path,
	output: &Path,
	watch_changes: bool,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let config = load_config(input)?;
	tracing::debug!(input = %input.display(), output = %output.display(), "starting build");
	let builder = Builder::disk(config.clone());
	let report = builder.build(input, output)?;
	print_report(args, &report, output, format)?;

	if !watch_changes {
		return Ok(());
	}

	// Watch mode
	println!("\nWatching for file changes... (press Ctrl+C to stop)");

	let watch_root = std::fs::canonicalize(input)?;
	let output_root = std::fs::canonicalize(output).unwrap_or_else(|_| output.to_path_buf());
	let (tx, rx) = mpsc::channel::<PathBuf>();

	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			if let Ok(event) = res {
				if matches!(
					event.kind,
					notify::EventKind::Modify(_)
						| notify::EventKind::Create(_)
						| notify::EventKind::Remove(_)
				) {
					for path in event.paths {
						if is_supported_file(&path) && !path.starts_with(&output_root) {
							let _ = tx.send(path);
						}
					}
				}
			}
		})?;

	use notify::Watcher;
	watcher.watch(&watch_root, notify::RecursiveMode::Recursive)?;

	let mut gate = WatchGate::new(config.watch_interval());
	let mut changes = rx.iter();
	watch(&mut changes, &mut gate, |path| {
		println!(
			"\nFile change detected in {}, rebuilding...",
			make_relative(path, &watch_root)
		);
		match builder.build(input, output) {
			Ok(report) => {
				if let Err(e) = print_report(args, &report, output, format) {
					eprintln!("{} {e}", colored!("error:", red));
				}
			}
			Err(e) => {
				let report: miette::Report = e.into();
				eprintln!("{report:?}");
			}
		}
	});

	Ok(())
}

fn print_report(
	args: &SnipCli,
	report: &BuildReport,
	output: &Path,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	match format {
		OutputFormat::Json => {
			println!("{}", serde_json::to_string_pretty(report)?);
		}
		OutputFormat::Text => {
			print_warnings(&report.warnings);

			if args.verbose {
				for path in &report.written {
					println!("  {}", make_relative(path, output));
				}
			}

			let summary = format!(
				"Built {} file(s) into {} with {} warning(s).",
				report.written.len(),
				output.display(),
				report.warnings.len()
			);
			if report.is_clean() {
				println!("{}", colored!(summary, green));
			} else {
				println!("{}", colored!(summary, yellow));
			}
		}
	}

	Ok(())
}

fn run_list(input: &Path, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
	let config = load_config(input)?;
	let collection = Builder::disk(config).collect(input)?;
	let context = &collection.context;

	if format == OutputFormat::Json {
		let output = serde_json::json!({
			"documents": collection.documents.iter().map(|document| document.relative.display().to_string()).collect::<Vec<_>>(),
			"snippets": context.snippets,
			"templates": context.templates,
			"globals": context.globals,
			"warnings": collection.warnings,
		});
		println!("{}", serde_json::to_string_pretty(&output)?);
		return Ok(());
	}

	print_warnings(&collection.warnings);
	println!(
		"Found {} document(s) in {}.",
		collection.documents.len(),
		input.display()
	);

	print_registry("Snippets", &context.snippets);
	print_registry("Templates", &context.templates);

	print_section(&format!("Globals ({})", context.globals.len()));
	let mut globals: Vec<_> = context.globals.iter().collect();
	globals.sort_by(|a, b| a.0.cmp(b.0));
	for (name, value) in globals {
		println!("  {name} = {value}");
	}

	Ok(())
}

fn print_registry(title: &str, registry: &Registry) {
	print_section(&format!("{title} ({})", registry.len()));
	for (name, lines) in registry.iter() {
		println!("  {name} ({} line(s))", lines.len());
	}
}
