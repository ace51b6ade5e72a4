//! # FrameCut
//!
//! Parametric editor for mitered window and door frames: describe a frame
//! by its outer size, beam thickness and saw kerf, get four mitered beams,
//! pick parts in a 3D scene and emit 4-axis miter-saw G-code and part
//! labels.
//!
//! ## Architecture
//!
//! FrameCut is organized as a workspace with multiple crates:
//!
//! 1. **framecut-core** - Frame parameters, part identity and ordering, events
//! 2. **framecut-designer** - Beam profiles and meshes, GLB I/O, reference model scaling
//! 3. **framecut-camtools** - Miter-cut G-code and labels
//! 4. **framecut-visualizer** - Scene, camera framing, picking and selection
//! 5. **framecut-settings** - Configuration files
//! 6. **framecut-editor** - The editing session tying the above together
//! 7. **framecut** - Logging setup and the command-line binary

pub use framecut_camtools as camtools;
pub use framecut_core as core;
pub use framecut_designer as designer;
pub use framecut_editor as editor;
pub use framecut_settings as settings;
pub use framecut_visualizer as visualizer;

pub use framecut_core::{BeamName, FrameError, FrameParameters, PartId, PartOrdering};
pub use framecut_editor::{EditorError, EditorSession, SessionConfig};
pub use framecut_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Pretty console output on stderr, so program text on stdout stays clean
/// - RUST_LOG environment variable support, `info` when unset
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
