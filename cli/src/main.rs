use std::fs;
use std::path::{Path as FsPath, PathBuf};

use anyhow::{Context, Result};
use byte_unit::Byte;
use clap::{Args, Parser, Subcommand};
use decoder::{cursor::bytes_from_hex, Map, Path};
use log::info;
use renderer::{RenderOptions, RoomColors, Viewport};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct Input {
    /// Inputs are hexadecimal text instead of raw bytes
    #[arg(long)]
    hex: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the header of a map record as JSON
    Header {
        map_file: PathBuf,
        #[command(flatten)]
        input: Input,
    },
    /// Print the rooms of a map record as JSON
    Rooms {
        map_file: PathBuf,
        #[command(flatten)]
        input: Input,
    },
    /// Print a decoded path record as JSON
    Path {
        path_file: PathBuf,
        #[command(flatten)]
        input: Input,
    },
    /// Render a map, and optionally a path, to a PNG
    Render {
        map_file: PathBuf,
        out_file: PathBuf,
        #[arg(short, long)]
        path: Option<PathBuf>,
        /// Viewport width in map units
        #[arg(long, requires = "height")]
        width: Option<f64>,
        /// Viewport height in map units
        #[arg(long, requires = "width")]
        height: Option<f64>,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset_x: f64,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset_y: f64,
        /// JSON file with `room_60` to `room_63` colour overrides
        #[arg(long)]
        colors: Option<PathBuf>,
        #[command(flatten)]
        input: Input,
    },
}

fn read_record(file: &FsPath, input: &Input) -> Result<Vec<u8>> {
    if input.hex {
        let text = fs::read_to_string(file)
            .with_context(|| format!("could not read {}", file.display()))?;
        Ok(bytes_from_hex(&text).with_context(|| format!("{} is not hex text", file.display()))?)
    } else {
        fs::read(file).with_context(|| format!("could not read {}", file.display()))
    }
}

fn load_map(file: &FsPath, input: &Input) -> Result<Map> {
    let data = read_record(file, input)?;
    Map::parse(&data).with_context(|| format!("could not decode map {}", file.display()))
}

fn load_path(file: &FsPath, input: &Input) -> Result<Path> {
    let data = read_record(file, input)?;
    Path::parse(&data).with_context(|| format!("could not decode path {}", file.display()))
}

fn load_room_colors(file: &FsPath) -> Result<RoomColors> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("could not read {}", file.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid colour file {}", file.display()))
}

fn run(cli: Cli) -> Result<String> {
    match cli.command {
        Commands::Header { map_file, input } => {
            let map = load_map(&map_file, &input)?;
            Ok(serde_json::to_string_pretty(map.header())?)
        }
        Commands::Rooms { map_file, input } => {
            let map = load_map(&map_file, &input)?;
            Ok(serde_json::to_string_pretty(map.rooms())?)
        }
        Commands::Path { path_file, input } => {
            let path = load_path(&path_file, &input)?;
            Ok(serde_json::to_string_pretty(&serde_json::json!({
                "header": path.header(),
                "start_count": path.start_count(),
                "current_count": path.current_count(),
                "is_full": path.is_full(),
                "points": path.points(),
            }))?)
        }
        Commands::Render {
            map_file,
            out_file,
            path,
            width,
            height,
            offset_x,
            offset_y,
            colors,
            input,
        } => {
            let map = load_map(&map_file, &input)?;
            let path = path.map(|file| load_path(&file, &input)).transpose()?;

            let options = RenderOptions {
                viewport: width
                    .zip(height)
                    .map(|(w, h)| Viewport::new(w, h).with_offset(offset_x, offset_y)),
                room_colors: colors
                    .map(|file| load_room_colors(&file))
                    .transpose()?
                    .unwrap_or_default(),
            };

            let rendered = renderer::render(&map, path.as_ref(), &options)
                .context("could not render map")?;
            fs::write(&out_file, &rendered.png)
                .with_context(|| format!("could not write {}", out_file.display()))?;

            let report = &rendered.report;
            info!(
                "wrote {} ({})",
                out_file.display(),
                Byte::from_bytes(rendered.png.len() as u128).get_appropriate_unit(false)
            );

            Ok(format!(
                "{}x{} image written to {}",
                report.width,
                report.height,
                out_file.display()
            ))
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(output) => println!("{}", output),
        Err(err) => {
            eprintln!("error: {:#}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decoder::pixel::{FLOOR_CODE, WALL_CODE};
    use decoder::structures::MapVersion;
    use decoder::writer::{MapWriter, PathWriter};
    use std::io::Write;

    fn write_temp(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let file = dir.path().join(name);
        fs::File::create(&file)
            .unwrap()
            .write_all(contents)
            .unwrap();
        file
    }

    fn map_bytes() -> Vec<u8> {
        let mut pixels = vec![FLOOR_CODE; 40 * 30];
        pixels[..40].fill(WALL_CODE);
        MapWriter::new(MapVersion::Partitioned, 40, 30)
            .origin(200, 150)
            .dock(210, 150)
            .pixels(pixels)
            .build()
    }

    fn run_args(args: &[&str]) -> Result<String> {
        run(Cli::try_parse_from(args)?)
    }

    #[test]
    fn header_prints_json() {
        let dir = tempfile::tempdir().unwrap();
        let map = write_temp(&dir, "layout.bin", &map_bytes());

        let output = run_args(&["vacmap", "header", map.to_str().unwrap()]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["width"], 40);
        assert_eq!(json["origin"]["x"], 20.0);
        assert_eq!(json["version"], "Partitioned");
    }

    #[test]
    fn accepts_hex_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = PathWriter::new().point(10, 10).point(20, 20).build();
        let file = write_temp(&dir, "path.hex", hex::encode(path).as_bytes());

        let output = run_args(&["vacmap", "path", "--hex", file.to_str().unwrap()]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["current_count"], 2);
        assert_eq!(json["is_full"], true);
        assert_eq!(json["points"][1]["y"], -2.0);
    }

    #[test]
    fn render_writes_cropped_png() {
        let dir = tempfile::tempdir().unwrap();
        let map = write_temp(&dir, "layout.bin", &map_bytes());
        let path = write_temp(
            &dir,
            "path.bin",
            &PathWriter::new().point(0, 0).point(30, 0).build(),
        );
        let colors = write_temp(&dir, "colors.json", br##"{"room_60": "#ff0000"}"##);
        let out = dir.path().join("combined.png");

        run_args(&[
            "vacmap",
            "render",
            map.to_str().unwrap(),
            out.to_str().unwrap(),
            "--path",
            path.to_str().unwrap(),
            "--width",
            "30",
            "--height",
            "20",
            "--offset-x",
            "-5",
            "--offset-y",
            "5",
            "--colors",
            colors.to_str().unwrap(),
        ])
        .unwrap();

        let image = image::open(&out).unwrap();
        assert_eq!((image.width(), image.height()), (240, 160));
    }

    #[test]
    fn corrupt_map_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let data = MapWriter::new(MapVersion::FloorMaterial, 4, 4)
            .pixels(vec![FLOOR_CODE; 16])
            .build();
        let map = write_temp(&dir, "layout.bin", &data);
        let out = dir.path().join("out.png");

        let err = run_args(&[
            "vacmap",
            "render",
            map.to_str().unwrap(),
            out.to_str().unwrap(),
        ])
        .unwrap_err();
        assert!(format!("{:#}", err).contains("unsupported map version 2"));
        assert!(!out.exists());
    }
}
