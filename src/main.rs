//! # Mask CLI
//!
//! Command-line interface for encoding LED mask frames.
//!
//! ## Usage
//!
//! ```bash
//! # Encode text with the built-in 6x12 font, print hex to stdout
//! mask text "HELLO"
//!
//! # Encode text with a TTF font, write bitmap.bin + colors.bin
//! mask text "Hello" --font NotoSans-Regular.ttf --size 14 --out frame/
//!
//! # Encode a photo as JSON, dumping intermediate images
//! mask image photo.jpg --json --dump debug/
//!
//! # Encode many images in parallel
//! mask batch *.png --out frames/
//!
//! # Render a packed bitmap back to PNG
//! mask preview frame/bitmap.bin --png preview.png
//! ```

use clap::{Args, Parser, Subcommand};
use image::Rgb;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ledmask::{
    MaskError, MaskFrame, MaskFrameBuilder, MaskGeometry, codec,
    diagnostics::PngDirSink,
    font::{SpleenFace, TtfFace},
    mask::{MASK_HEIGHT, MASK_WIDTH},
    protocol::{bitmap, color},
    render::text::TextStyle,
};

/// Mask - LED mask frame encoder
#[derive(Parser, Debug)]
#[command(name = "mask")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Nominal mask width in columns (sets the crop aspect ratio)
    #[arg(long, global = true, default_value_t = MASK_WIDTH)]
    columns: u32,

    /// Mask height in rows (at most 16)
    #[arg(long, global = true, default_value_t = MASK_HEIGHT)]
    rows: u32,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a line of text
    Text {
        /// Text to render
        text: String,

        /// TTF/OTF font file (defaults to the built-in Spleen 6x12)
        #[arg(long, value_name = "FILE")]
        font: Option<PathBuf>,

        /// Font size in points
        #[arg(long, default_value = "14")]
        size: f32,

        /// Render resolution
        #[arg(long, default_value = "72")]
        dpi: f32,

        /// Baseline offset from the top in pixels (defaults to the row count)
        #[arg(long)]
        baseline: Option<f32>,

        /// Text color
        #[arg(long, value_name = "RRGGBB", default_value = "FFFFFF")]
        color: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Encode an image file
    Image {
        /// Image to encode
        file: PathBuf,

        /// Use one solid color per column instead of sampled pixel colors
        #[arg(long, value_name = "RRGGBB")]
        solid: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Encode many image files in parallel
    Batch {
        /// Images to encode
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output directory for <name>.bitmap.bin and <name>.colors.bin
        #[arg(long, value_name = "DIR")]
        out: PathBuf,

        /// Use one solid color per column instead of sampled pixel colors
        #[arg(long, value_name = "RRGGBB")]
        solid: Option<String>,
    },

    /// Render a packed bitmap file as a PNG
    Preview {
        /// Packed bitmap (2 bytes per column)
        bitmap: PathBuf,

        /// PNG file to write
        #[arg(long, value_name = "FILE")]
        png: PathBuf,

        /// Pixel scale factor
        #[arg(long, default_value = "8")]
        scale: u32,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Write bitmap.bin and colors.bin into this directory
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Print the frame as JSON
    #[arg(long)]
    json: bool,

    /// Dump intermediate images as PNGs into this directory
    #[arg(long, value_name = "DIR")]
    dump: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), MaskError> {
    let cli = Cli::parse();
    let geometry = MaskGeometry::new(cli.columns, cli.rows)?;

    match cli.command {
        Commands::Text {
            text,
            font,
            size,
            dpi,
            baseline,
            color,
            output,
        } => {
            let builder = builder_for(geometry, output.dump.as_deref())
                .with_text_color(parse_color(&color)?);
            let style = TextStyle {
                point_size: size,
                dpi,
                baseline,
            };

            let frame = match font {
                Some(path) => {
                    let face = TtfFace::open(&path)?;
                    builder.build_from_text(&text, &face, &style)?
                }
                None => builder.build_from_text(&text, &SpleenFace::new()?, &style)?,
            };
            emit_frame(&frame, &output)
        }

        Commands::Image {
            file,
            solid,
            output,
        } => {
            let mut builder = builder_for(geometry, output.dump.as_deref());
            if let Some(hex) = solid {
                builder = builder.with_image_colors(color::ColorMode::Solid(parse_color(&hex)?));
            }

            let img = codec::load_image(&file)?;
            let frame = builder.build_from_image(&img)?;
            emit_frame(&frame, &output)
        }

        Commands::Batch { files, out, solid } => {
            let mut builder = MaskFrameBuilder::new().with_geometry(geometry);
            if let Some(hex) = solid {
                builder = builder.with_image_colors(color::ColorMode::Solid(parse_color(&hex)?));
            }
            let stems = output_stems(&files)?;
            std::fs::create_dir_all(&out)?;

            let failures: Vec<(PathBuf, MaskError)> = files
                .par_iter()
                .zip(&stems)
                .filter_map(|(file, stem)| {
                    encode_file(&builder, file, &out, stem)
                        .err()
                        .map(|e| (file.clone(), e))
                })
                .collect();

            println!(
                "Encoded {} of {} images into {}",
                files.len() - failures.len(),
                files.len(),
                out.display()
            );
            for (file, e) in &failures {
                eprintln!("  {}: {}", file.display(), e);
            }
            if failures.is_empty() {
                Ok(())
            } else {
                Err(MaskError::Image(format!(
                    "{} of {} images failed",
                    failures.len(),
                    files.len()
                )))
            }
        }

        Commands::Preview {
            bitmap: input,
            png,
            scale,
        } => {
            let data = std::fs::read(&input)?;
            let bits = bitmap::unpack(&data, geometry.height)?;
            codec::save_bitmap_png(&png, &bits, geometry.height, scale)?;
            println!(
                "Saved {} columns x {} rows to {}",
                bits.width(),
                geometry.height,
                png.display()
            );
            Ok(())
        }
    }
}

fn builder_for(geometry: MaskGeometry, dump: Option<&Path>) -> MaskFrameBuilder {
    let builder = MaskFrameBuilder::new().with_geometry(geometry);
    match dump {
        Some(dir) => builder.with_sink(PngDirSink::new(dir)),
        None => builder,
    }
}

fn parse_color(hex: &str) -> Result<Rgb<u8>, MaskError> {
    color::parse_hex_color(hex).ok_or_else(|| {
        MaskError::InvalidArgument(format!("invalid color '{}', expected RRGGBB", hex))
    })
}

/// Output name for each batch input; no two inputs may share one.
fn output_stems(files: &[PathBuf]) -> Result<Vec<String>, MaskError> {
    let mut seen: HashMap<String, &Path> = HashMap::new();
    files
        .iter()
        .map(|file| {
            let stem = file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "frame".to_string());
            if let Some(first) = seen.insert(stem.clone(), file) {
                return Err(MaskError::InvalidArgument(format!(
                    "{} and {} would both write {}.bitmap.bin",
                    first.display(),
                    file.display(),
                    stem
                )));
            }
            Ok(stem)
        })
        .collect()
}

/// Encode one batch entry into `<out>/<stem>.{bitmap,colors}.bin`
fn encode_file(
    builder: &MaskFrameBuilder,
    file: &Path,
    out: &Path,
    stem: &str,
) -> Result<(), MaskError> {
    let img = codec::load_image(file)?;
    let frame = builder.build_from_image(&img)?;

    std::fs::write(out.join(format!("{}.bitmap.bin", stem)), frame.bitmap().as_bytes())?;
    std::fs::write(out.join(format!("{}.colors.bin", stem)), frame.colors().as_bytes())?;
    Ok(())
}

fn emit_frame(frame: &MaskFrame, output: &OutputArgs) -> Result<(), MaskError> {
    if output.json {
        let json = serde_json::to_string_pretty(frame).map_err(std::io::Error::from)?;
        println!("{}", json);
    }

    if let Some(dir) = &output.out {
        std::fs::create_dir_all(dir)?;
        let bitmap_path = dir.join("bitmap.bin");
        let colors_path = dir.join("colors.bin");
        std::fs::write(&bitmap_path, frame.bitmap().as_bytes())?;
        std::fs::write(&colors_path, frame.colors().as_bytes())?;
        eprintln!(
            "Wrote {} columns to {} and {}",
            frame.columns(),
            bitmap_path.display(),
            colors_path.display()
        );
    } else if !output.json {
        println!("columns: {}", frame.columns());
        println!("bitmap:  {}", hex(frame.bitmap().as_bytes()));
        println!("colors:  {}", hex(frame.colors().as_bytes()));
    }

    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
