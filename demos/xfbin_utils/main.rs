//! XFBIN inspection utility.
//!
//! Provides five subcommands:
//! - `info`: list pages, chunks and decode warnings of a file.
//! - `dump`: print the decoded document as JSON.
//! - `dds`: export every texture chunk as a DDS image.
//! - `roundtrip`: decode and re-encode a file, then compare the bytes.
//! - `inject`: copy the page holding a chunk path from one file into another.

use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use xfbin_rs::prelude::*;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::Info(opts) => run_info(opts),
		Command::Dump(opts) => run_dump(opts),
		Command::Dds(opts) => run_dds(opts),
		Command::Roundtrip(opts) => run_roundtrip(opts),
		Command::Inject(opts) => run_inject(opts),
	}
}

#[derive(Parser)]
#[command(name = "xfbin_utils")]
#[command(author = "xfbin-rs project")]
#[command(version)]
#[command(about = "Inspect, convert and edit XFBIN containers", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// List the pages and chunks of an XFBIN file
	Info(InfoArgs),
	/// Print the decoded document as JSON
	Dump(DumpArgs),
	/// Export texture chunks as DDS images
	Dds(DdsArgs),
	/// Decode and re-encode a file and compare the output
	Roundtrip(RoundtripArgs),
	/// Replace or append the page holding a chunk path
	Inject(InjectArgs),
}

#[derive(Args)]
struct InfoArgs {
	/// Path to the XFBIN file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Number of payload bytes to preview for unknown chunks
	#[arg(long, value_name = "COUNT", default_value_t = 16)]
	preview: usize,

	/// Reject the file on the first chunk error
	#[arg(long, default_value_t = false)]
	strict: bool,
}

#[derive(Args)]
struct DumpArgs {
	/// Path to the XFBIN file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Write the JSON here instead of stdout
	#[arg(short, long, value_name = "OUTPUT")]
	output: Option<PathBuf>,
}

#[derive(Args)]
struct DdsArgs {
	/// Path to the XFBIN file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Directory receiving the DDS images
	#[arg(short, long, value_name = "DIR", default_value = "bin/dds_extract")]
	output: PathBuf,
}

#[derive(Args)]
struct RoundtripArgs {
	/// Path to the XFBIN file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Write the re-encoded bytes here
	#[arg(short, long, value_name = "OUTPUT")]
	output: Option<PathBuf>,
}

#[derive(Args)]
struct InjectArgs {
	/// File receiving the page
	#[arg(value_name = "TARGET")]
	target: PathBuf,

	/// File providing the page
	#[arg(value_name = "SOURCE")]
	source: PathBuf,

	/// Chunk path identifying the page in the source file
	#[arg(short, long, value_name = "PATH")]
	path: String,

	/// Where to write the edited file, defaults to overwriting the target
	#[arg(short, long, value_name = "OUTPUT")]
	output: Option<PathBuf>,
}

fn read_document(path: &Path, config: ParseConfig) -> Result<Document> {
	let reader = XfbinReader::new(ChunkRegistry::with_builtin(), config);
	let document = reader.read_file(path).with_context(|| format!("Failed to decode {}", path.display()))?;
	for warning in document.warnings() {
		log::warn!("{}: {warning}", path.display());
	}
	Ok(document)
}

fn run_info(args: InfoArgs) -> Result<()> {
	let config = if args.strict {
		ParseConfig::strict()
	} else {
		ParseConfig::default()
	};
	let document = read_document(&args.file, config)?;

	println!("{}", args.file.display());
	println!("  pages: {}, chunks: {}", document.pages().len(), document.chunk_count());

	for (index, page) in document.pages().iter().enumerate() {
		println!("  page {index}:");
		for view in page.views() {
			let key = view.key();
			match view {
				ChunkView::Unknown(unknown) => {
					let end = unknown.data.len().min(args.preview);
					println!(
						"    {key} v{:#X} {} bytes [{}{}]",
						unknown.version,
						unknown.data.len(),
						hex::encode(&unknown.data[..end]),
						if end < unknown.data.len() { "..." } else { "" }
					);
				}
				ChunkView::Texture(texture) => {
					println!("    {key} {}x{}", texture.width, texture.height);
				}
				ChunkView::Model(model) => {
					println!("    {key} {} meshes", model.nud.mesh_count());
				}
				_ => println!("    {key}"),
			}
		}
		for reference in page.references() {
			println!("    reference {} -> {}", reference.name, reference.chunk);
		}
	}

	if !document.warnings().is_empty() {
		println!("  warnings: {}", document.warnings().len());
	}
	Ok(())
}

fn run_dump(args: DumpArgs) -> Result<()> {
	let document = read_document(&args.file, ParseConfig::default())?;
	let json = serde_json::to_string_pretty(&document).context("Failed to serialize document")?;
	match args.output {
		Some(path) => {
			fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
			log::info!("Wrote {}", path.display());
		}
		None => println!("{json}"),
	}
	Ok(())
}

fn run_dds(args: DdsArgs) -> Result<()> {
	let document = read_document(&args.file, ParseConfig::default())?;
	fs::create_dir_all(&args.output)
		.with_context(|| format!("Failed to create output directory {}", args.output.display()))?;

	let mut exported = 0usize;
	for view in document.get_chunks_by_type(file::nucc::constants::TEXTURE) {
		let ChunkView::Texture(texture) = view else {
			continue;
		};
		match texture.to_dds() {
			Ok(dds) => {
				let path = args.output.join(format!("{}.dds", texture.name));
				fs::write(&path, dds).with_context(|| format!("Failed to write {}", path.display()))?;
				log::info!("Exported {} ({}x{})", path.display(), texture.width, texture.height);
				exported += 1;
			}
			Err(err) => log::warn!("Skipping {}: {err}", texture.name),
		}
	}

	log::info!("Exported {exported} textures to {}", args.output.display());
	Ok(())
}

fn run_roundtrip(args: RoundtripArgs) -> Result<()> {
	let original = fs::read(&args.file).with_context(|| format!("Failed to read {}", args.file.display()))?;
	let document = XfbinReader::new(ChunkRegistry::with_builtin(), ParseConfig::strict())
		.read(&original)
		.with_context(|| format!("Failed to decode {}", args.file.display()))?;
	let encoded = XfbinWriter::default().write(&document).context("Failed to encode document")?;

	if let Some(path) = &args.output {
		fs::write(path, &encoded).with_context(|| format!("Failed to write {}", path.display()))?;
	}

	if encoded == original {
		log::info!("{}: re-encoded output is byte identical ({} bytes)", args.file.display(), encoded.len());
		return Ok(());
	}

	let first_difference = original
		.iter()
		.zip(&encoded)
		.position(|(a, b)| a != b)
		.unwrap_or(original.len().min(encoded.len()));
	let reparsed = xfbin_rs::decode(&encoded).context("Re-encoded output does not decode")?;
	if reparsed != document {
		bail!("Re-encoded document differs from the original at byte {first_difference:#X}");
	}
	log::info!(
		"{}: bytes differ from {first_difference:#X} ({} -> {} bytes) but the document is unchanged",
		args.file.display(),
		original.len(),
		encoded.len()
	);
	Ok(())
}

fn run_inject(args: InjectArgs) -> Result<()> {
	let mut target = read_document(&args.target, ParseConfig::default())?;
	let source = read_document(&args.source, ParseConfig::default())?;

	let Some(page) = source.get_chunk_page(&args.path) else {
		bail!("No page in {} holds a chunk with path {}", args.source.display(), args.path);
	};

	match target.get_chunk_page_index(&args.path) {
		Some(index) => {
			target.replace_page(index, page.clone());
			log::info!("Replaced page {index} of {}", args.target.display());
		}
		None => {
			let index = target.add_page(page.clone());
			log::info!("Appended page {index} to {}", args.target.display());
		}
	}

	let output = args.output.unwrap_or(args.target);
	XfbinWriter::default()
		.write_file(&target, &output)
		.with_context(|| format!("Failed to write {}", output.display()))?;
	log::info!("Wrote {}", output.display());
	Ok(())
}
