use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use framecut::camtools::{DirectorySink, GcodeArtifact, LabelRef};
use framecut::designer::{
    build_frame, scale_reference, ProfileLayout, ReferenceDimensions, ReferenceModel,
};
use framecut::editor::{AssetSource, EditorSession, FileAssetSource, InMemoryStore, SessionConfig};
use framecut::settings::{Config, SettingsPersistence};
use framecut::core::EventBus;
use framecut::{init_logging, BeamName, FrameParameters, PartOrdering};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "framecut", version, about = "Mitered frame geometry and miter-saw G-code")]
struct Cli {
    /// Settings file (.toml or .json); defaults to the platform config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone, Copy)]
struct FrameArgs {
    /// Outer width (mm)
    #[arg(long)]
    width: Option<f64>,
    /// Outer height (mm)
    #[arg(long)]
    height: Option<f64>,
    /// Beam thickness (mm)
    #[arg(long)]
    beam: Option<f64>,
    /// Saw kerf (mm)
    #[arg(long)]
    kerf: Option<f64>,
}

impl FrameArgs {
    /// Command-line values over the configured defaults
    fn resolve(&self, defaults: &FrameParameters) -> FrameParameters {
        FrameParameters::new(
            self.width.unwrap_or(defaults.width),
            self.height.unwrap_or(defaults.height),
            self.beam.unwrap_or(defaults.beam_thickness),
            self.kerf.unwrap_or(defaults.saw_thickness),
        )
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the beams in part order with their lengths and hole centres
    Parts {
        #[command(flatten)]
        frame: FrameArgs,
    },
    /// Generate miter-cut programs
    Gcode {
        #[command(flatten)]
        frame: FrameArgs,
        /// TOP, LEFT, BOTTOM, RIGHT or all
        #[arg(long, default_value = "all")]
        part: String,
        /// Output directory; the program is printed when omitted
        #[arg(long)]
        out: Option<PathBuf>,
        /// Also copy the program text to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Render a part label as SVG
    Label {
        #[arg(long)]
        client: String,
        /// Construction size text; the configured frame size when omitted
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        detail: Option<String>,
        #[arg(long)]
        serial: Option<String>,
        #[arg(long)]
        order: String,
        #[arg(long)]
        construction: u32,
        #[arg(long = "detail-no")]
        detail_no: u32,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Fit a GLB reference model to new dimensions
    Scale {
        #[arg(long)]
        glb: String,
        #[arg(long = "ref-width")]
        ref_width: Option<f64>,
        #[arg(long = "ref-height")]
        ref_height: Option<f64>,
        #[arg(long = "ref-depth")]
        ref_depth: Option<f64>,
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
        #[arg(long)]
        depth: Option<f64>,
    },
    /// Write the procedural frame as a GLB reference model
    ExportGlb {
        #[command(flatten)]
        frame: FrameArgs,
        #[arg(long)]
        out: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let settings = match path {
        Some(path) => SettingsPersistence::load_or_default(path),
        None => SettingsPersistence::load_default(),
    }
    .context("loading settings")?;
    Ok(settings.config().clone())
}

fn session(config: &Config, params: FrameParameters) -> anyhow::Result<EditorSession> {
    Ok(EditorSession::new(
        0,
        params,
        SessionConfig::from(config),
        Arc::new(InMemoryStore::new()),
        Arc::new(EventBus::new()),
    )?)
}

fn print_parts(params: &FrameParameters) -> anyhow::Result<()> {
    let beams = build_frame(params.width, params.height, params.beam_thickness)?;
    let layout = ProfileLayout::new(params.beam_thickness);
    println!(
        "Frame {} x {}, beam {}, kerf {}",
        params.width, params.height, params.beam_thickness, params.saw_thickness
    );
    println!("Hole radius {:.3}", layout.hole_radius());
    for name in PartOrdering::beams() {
        let Some(beam) = beams.iter().find(|b| b.name == name) else {
            continue;
        };
        let holes: Vec<String> = beam
            .holes()
            .iter()
            .map(|h| format!("({:.3}, {:.3})", h.center.x, h.center.y))
            .collect();
        println!(
            "{:>6}  length {:>9.3}  holes {}",
            beam.name,
            beam.length,
            holes.join(" ")
        );
    }
    Ok(())
}

fn write_programs(
    artifacts: &[GcodeArtifact],
    out: Option<&Path>,
    copy: bool,
) -> anyhow::Result<()> {
    for artifact in artifacts {
        match out {
            Some(dir) => {
                let path = artifact.write_to(dir)?;
                println!("{}", path.display());
            }
            None => print!("{}", artifact.program_text),
        }
    }
    if copy {
        let text: String = artifacts.iter().map(|a| a.program_text.as_str()).collect();
        let mut clipboard = arboard::Clipboard::new().context("opening clipboard")?;
        clipboard.set_text(text).context("copying to clipboard")?;
        info!("Copied {} program(s) to the clipboard", artifacts.len());
    }
    Ok(())
}

async fn scale_command(
    config: &Config,
    glb: &str,
    reference: ReferenceDimensions,
    width: f64,
    height: f64,
    depth: f64,
) -> anyhow::Result<()> {
    let bytes = FileAssetSource::new().fetch(glb).await?;
    let model = ReferenceModel::from_glb(&bytes)?;
    let derived = scale_reference(
        &model,
        &reference,
        &config.reference_model.part_names,
        width,
        height,
        depth,
    )?;
    for id in derived.ordered_ids() {
        let Some(part) = derived.part(&id) else {
            continue;
        };
        let size = part.mesh.size();
        println!(
            "{:>8}  size {:.3} x {:.3} x {:.3}  at ({:.3}, {:.3}, {:.3})",
            id.to_string(),
            size.x,
            size.y,
            size.z,
            part.position.x,
            part.position.y,
            part.position.z
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    info!("FrameCut {} (built {})", framecut::VERSION, framecut::BUILD_DATE);

    match cli.command {
        Command::Parts { frame } => {
            let params = frame.resolve(&config.frame);
            params.validate()?;
            print_parts(&params)?;
        }
        Command::Gcode {
            frame,
            part,
            out,
            copy,
        } => {
            let mut session = session(&config, frame.resolve(&config.frame))?;
            let artifacts = if part.eq_ignore_ascii_case("all") {
                session.export_all_gcode()
            } else {
                let beam: BeamName = part.parse()?;
                session.scene_mut().select(Some(beam.into()))?;
                vec![session.export_selected_gcode()?]
            };
            write_programs(
                &artifacts,
                out.as_deref(),
                copy || config.export.copy_to_clipboard,
            )?;
        }
        Command::Label {
            client,
            size,
            detail,
            serial,
            order,
            construction,
            detail_no,
            out,
        } => {
            let session = session(&config, config.frame)?;
            let mut data = session.label_data(client, detail, serial);
            if let Some(size) = size {
                data.construction_size = size;
            }
            let reference = LabelRef {
                order_number: order,
                construction_no: construction,
                detail_no,
            };
            let dir = out.unwrap_or_else(|| config.export.output_dir.clone());
            let mut sink = DirectorySink::new(&dir);
            session.export_label(&data, &reference, &mut sink)?;
            for path in sink.written() {
                println!("{}", path.display());
            }
        }
        Command::Scale {
            glb,
            ref_width,
            ref_height,
            ref_depth,
            width,
            height,
            depth,
        } => {
            let configured = config.reference_model.dimensions;
            let reference = ReferenceDimensions::new(
                ref_width.unwrap_or(configured.width),
                ref_height.unwrap_or(configured.height),
                ref_depth.unwrap_or(configured.depth),
            );
            let depth = depth.unwrap_or(reference.depth);
            scale_command(&config, &glb, reference, width, height, depth).await?;
        }
        Command::ExportGlb { frame, out } => {
            if !out.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("glb")) {
                bail!("output file needs a .glb extension");
            }
            let params = frame.resolve(&config.frame);
            params.validate()?;
            let beams = build_frame(params.width, params.height, params.beam_thickness)?;
            let bytes = ReferenceModel::from_beams(&beams).to_glb()?;
            std::fs::write(&out, bytes).with_context(|| format!("writing {}", out.display()))?;
            println!("{}", out.display());
        }
    }
    Ok(())
}
