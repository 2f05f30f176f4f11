//! Sprite asset CLI Utility
//!
//! A command-line tool for inspecting `.spr` sprite containers and `.obd`
//! object bundles.
//!
//! # Features
//!
//! - **info**: Display information about an SPR file
//! - **export**: Export one sprite to a PNG image
//! - **hexdump**: Dump the compressed payload of one sprite
//! - **obd-info**: Decode an OBD file and describe the thing inside
//! - **sheet**: Compose the sprites of an OBD file into a PNG sprite sheet
//!
//! # Client Profile
//!
//! An SPR file can only be opened with the signature of the client it
//! belongs to. Pass a JSON profile with `--profile`:
//!
//! ```json
//! {
//!   "version": {
//!     "value": 1098,
//!     "description": "Client 10.98",
//!     "dat_signature": 17059,
//!     "spr_signature": 1471927811
//!   },
//!   "features": { "extended": true, "transparency": false }
//! }
//! ```
//!
//! or give the client version and signature directly with `--client` and
//! `--signature`.
//!
//! # Usage
//!
//! ```bash
//! # Show SPR file information
//! cargo run --example spr_utils -- --profile 1098.json info Tibia.spr
//!
//! # Export sprite 120 without a profile file
//! cargo run --example spr_utils -- --client 860 --signature 0x4C220594 export Tibia.spr 120
//!
//! # Dump the compressed bytes of sprite 120
//! cargo run --example spr_utils -- --profile 1098.json hexdump Tibia.spr 120
//!
//! # Describe an OBD file and export its sprite sheet
//! cargo run --example spr_utils -- obd-info sword.obd
//! cargo run --example spr_utils -- sheet sword.obd -o sword.png
//! ```

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use image::RgbaImage;
use log::info;
use otsprite_rs::prelude::*;
use serde::{Deserialize, Serialize};
use std::{
	fs,
	path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(name = "spr_utils")]
#[command(author = "otsprite-rs project")]
#[command(version = "1.0")]
#[command(about = "Sprite asset utility - inspect SPR containers and OBD bundles", long_about = None)]
struct Cli {
	#[command(flatten)]
	client: ClientArgs,

	#[command(subcommand)]
	command: Commands,
}

/// How to identify the client an SPR file belongs to
#[derive(Args)]
struct ClientArgs {
	/// JSON client profile
	#[arg(long, global = true, env = "OTSPRITE_PROFILE", value_name = "PROFILE")]
	profile: Option<PathBuf>,

	/// Client version, e.g. 1098
	#[arg(long, global = true, env = "OTSPRITE_CLIENT", value_name = "VERSION")]
	client: Option<u16>,

	/// SPR signature, decimal or 0x-prefixed hex
	#[arg(long, global = true, env = "OTSPRITE_SIGNATURE", value_parser = parse_signature)]
	signature: Option<u32>,

	/// Force 32-bit sprite counts
	#[arg(long, global = true)]
	extended: bool,

	/// Sprites keep their alpha channel
	#[arg(long, global = true)]
	transparency: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Display information about an SPR file
	Info {
		/// Input SPR file path
		#[arg(value_name = "INPUT_SPR")]
		input: PathBuf,

		/// Count blank sprites (reads every record)
		#[arg(short, long)]
		detailed: bool,
	},

	/// Export one sprite to a PNG image
	Export {
		/// Input SPR file path
		#[arg(value_name = "INPUT_SPR")]
		input: PathBuf,

		/// Sprite id
		#[arg(value_name = "ID")]
		id: u32,

		/// Output PNG path (optional, defaults to `sprite_<ID>.png`)
		#[arg(short, long, value_name = "OUTPUT")]
		output: Option<PathBuf>,
	},

	/// Dump the compressed payload of one sprite
	Hexdump {
		/// Input SPR file path
		#[arg(value_name = "INPUT_SPR")]
		input: PathBuf,

		/// Sprite id
		#[arg(value_name = "ID")]
		id: u32,
	},

	/// Decode an OBD file and describe the thing inside
	ObdInfo {
		/// Input OBD file path
		#[arg(value_name = "INPUT_OBD")]
		input: PathBuf,
	},

	/// Compose the sprites of an OBD file into a PNG sprite sheet
	Sheet {
		/// Input OBD file path
		#[arg(value_name = "INPUT_OBD")]
		input: PathBuf,

		/// Output PNG path (optional, defaults to the input with a `.png` extension)
		#[arg(short, long, value_name = "OUTPUT")]
		output: Option<PathBuf>,
	},
}

/// Client profile for JSON serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Profile {
	/// Client version and signatures
	version: Version,
	/// Optional format switches
	#[serde(default)]
	features: ClientFeatures,
}

fn parse_signature(value: &str) -> Result<u32, String> {
	let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
		Some(hex) => u32::from_str_radix(hex, 16),
		None => value.parse(),
	};
	parsed.map_err(|e| format!("invalid signature '{value}': {e}"))
}

impl ClientArgs {
	/// Resolves the profile from a JSON file or from the individual flags
	fn resolve(&self) -> Result<Profile> {
		let mut profile = match (&self.profile, self.client, self.signature) {
			(Some(path), _, _) => load_profile(path)?,
			(None, Some(client), Some(signature)) => Profile {
				version: Version::new(client, "", 0, signature),
				features: ClientFeatures::NONE,
			},
			_ => bail!("an SPR file needs --profile, or both --client and --signature"),
		};

		profile.features.extended |= self.extended;
		profile.features.transparency |= self.transparency;
		Ok(profile)
	}
}

/// Load a client profile from a JSON file
fn load_profile(path: &Path) -> Result<Profile> {
	let json = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
	let profile = serde_json::from_str(&json).with_context(|| format!("invalid profile {}", path.display()))?;
	Ok(profile)
}

/// Open an SPR file with the resolved profile
fn open_store(input: &Path, client: &ClientArgs) -> Result<SprStore> {
	let profile = client.resolve()?;
	info!("Opening {} as {}", input.display(), profile.version);

	let store = SprStore::open(input, profile.version, profile.features)
		.with_context(|| format!("failed to open {}", input.display()))?;
	Ok(store)
}

/// Handle info command
fn handle_info(input: &Path, detailed: bool, client: &ClientArgs) -> Result<()> {
	let mut store = open_store(input, client)?;
	let file_size = fs::metadata(input)?.len();

	println!("SPR File Information");
	println!("   File: {}", input.display());
	if let Some(version) = store.version() {
		println!("   Client: {version}");
	}
	println!("   Extended: {}", store.is_extended());
	println!("   Transparency: {}", store.transparency());
	println!("   Header size: {} bytes", store.header_size());
	println!("   Sprites: {}", store.count());
	println!("   File size: {} bytes ({:.2} KB)", file_size, file_size as f64 / 1024.0);

	if detailed {
		let mut blank = 0u32;
		let mut compressed = 0usize;
		for id in 1..=store.count() {
			match store.get_sprite(id) {
				Some(sprite) if !sprite.is_empty() => compressed += sprite.len(),
				_ => blank += 1,
			}
		}

		println!("   Blank sprites: {blank}");
		println!("   Payload bytes: {compressed}");
	}

	Ok(())
}

/// Handle export command
fn handle_export(input: &Path, id: u32, output: Option<PathBuf>, client: &ClientArgs) -> Result<()> {
	let mut store = open_store(input, client)?;
	let pixels = store.sprite_pixels(id).with_context(|| format!("sprite {id} is out of range"))?;

	let rgba: Vec<u8> = pixels.chunks_exact(4).flat_map(|p| [p[2], p[1], p[0], p[3]]).collect();
	let image = RgbaImage::from_raw(32, 32, rgba).context("failed to create sprite image")?;

	let output = output.unwrap_or_else(|| PathBuf::from(format!("sprite_{id}.png")));
	image.save(&output)?;

	info!("Exported sprite {id} -> {}", output.display());
	Ok(())
}

/// Handle hexdump command
fn handle_hexdump(input: &Path, id: u32, client: &ClientArgs) -> Result<()> {
	let mut store = open_store(input, client)?;
	let sprite = store.get_sprite(id).with_context(|| format!("sprite {id} is out of range"))?;

	println!("Sprite {id}: {} compressed bytes", sprite.len());
	for (row, chunk) in sprite.compressed_pixels().chunks(16).enumerate() {
		println!("   {:06x}  {}", row * 16, hex::encode(chunk));
	}

	Ok(())
}

/// Handle obd-info command
fn handle_obd_info(input: &Path) -> Result<()> {
	let data = obd::load(input).with_context(|| format!("failed to decode {}", input.display()))?;
	let thing = data.thing();

	println!("OBD File Information");
	println!("   File: {}", input.display());
	println!("   Category: {}", data.category());
	println!("   Stack order: {:?}", thing.stack_order);
	if let Some(market) = &thing.market {
		println!("   Market name: {}", market.name);
	}
	if let Some(light) = thing.light {
		println!("   Light: level {} color {}", light.level, light.color);
	}

	for (kind, group) in thing.frame_groups.iter() {
		let d = group.dimensions();
		println!("\n   Frame group: {kind}");
		println!("      Size: {}x{} tiles ({} px)", d.width, d.height, d.exact_size);
		println!("      Layers: {}", d.layers);
		println!("      Patterns: {}x{}x{}", d.pattern_x, d.pattern_y, d.pattern_z);
		println!("      Frames: {}", d.frames);
		if let Some(animation) = group.animation() {
			let durations: Vec<String> =
				animation.durations.iter().map(|d| format!("{}-{}", d.minimum, d.maximum)).collect();
			println!("      Durations (ms): {}", durations.join(", "));
		}
		println!("      Sprite ids: {:?}", group.sprite_ids());
	}

	Ok(())
}

/// Handle sheet command
fn handle_sheet(input: &Path, output: Option<PathBuf>) -> Result<()> {
	let data = obd::load(input).with_context(|| format!("failed to decode {}", input.display()))?;
	let Some(sheet) = data.sprite_sheet(FrameGroupKind::Default) else {
		bail!("{} has no default frame group", input.display());
	};

	let image = RgbaImage::from_raw(sheet.width(), sheet.height(), sheet.rgba_pixels())
		.context("failed to create sheet image")?;
	let output = output.unwrap_or_else(|| input.with_extension("png"));
	image.save(&output)?;

	info!("Saved {}x{} sheet ({} cells) -> {}", sheet.width(), sheet.height(), sheet.rects().len(), output.display());
	Ok(())
}

fn main() -> Result<()> {
	// Initialize logger with default level set to info if RUST_LOG is not set
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();

	match cli.command {
		Commands::Info {
			input,
			detailed,
		} => handle_info(&input, detailed, &cli.client),

		Commands::Export {
			input,
			id,
			output,
		} => handle_export(&input, id, output, &cli.client),

		Commands::Hexdump {
			input,
			id,
		} => handle_hexdump(&input, id, &cli.client),

		Commands::ObdInfo {
			input,
		} => handle_obd_info(&input),

		Commands::Sheet {
			input,
			output,
		} => handle_sheet(&input, output),
	}
}
