//! # Part Labels
//!
//! A label identifies a cut part on the shop floor: client, construction
//! size, and optionally the detail name and serial number. Labels are
//! rendered as fixed-size SVG documents; turning them into PNG or sending
//! them to a printer happens outside this crate through a [`LabelSink`].

use crate::error::{CamToolError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Label size in millimeters
pub const LABEL_WIDTH_MM: f64 = 58.0;
pub const LABEL_HEIGHT_MM: f64 = 40.0;

/// Printed label contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelData {
    pub client_name: String,
    pub construction_size: String,
    pub detail_name: Option<String>,
    pub serial_number: Option<String>,
}

impl LabelData {
    pub fn validate(&self) -> Result<()> {
        if self.client_name.trim().is_empty() {
            return Err(CamToolError::InvalidLabel(
                "client name is empty".to_string(),
            ));
        }
        if self.construction_size.trim().is_empty() {
            return Err(CamToolError::InvalidLabel(
                "construction size is empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Order/construction/detail numbers that name a label file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelRef {
    pub order_number: String,
    pub construction_no: u32,
    pub detail_no: u32,
}

impl LabelRef {
    /// `Label_{order}_C{n}_D{m}[_{detailName}]`, without extension
    pub fn base_name(&self, detail_name: Option<&str>) -> String {
        let mut name = format!(
            "Label_{}_C{}_D{}",
            sanitize(&self.order_number),
            self.construction_no,
            self.detail_no
        );
        if let Some(detail) = detail_name.map(str::trim).filter(|d| !d.is_empty()) {
            name.push('_');
            name.push_str(&sanitize(detail));
        }
        name
    }
}

/// Keep file names portable: anything but ASCII alphanumerics, '-' and '.' becomes '_'
fn sanitize(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// A rendered label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelArtifact {
    pub svg: String,
    pub base_name: String,
}

impl LabelArtifact {
    pub fn svg_file_name(&self) -> String {
        format!("{}.svg", self.base_name)
    }

    /// Name of the rasterized label produced downstream
    pub fn png_file_name(&self) -> String {
        format!("{}.png", self.base_name)
    }
}

/// Render a label as an SVG document
pub fn render_label(data: &LabelData, reference: &LabelRef) -> Result<LabelArtifact> {
    data.validate()?;

    let mut lines = vec![
        (8.0, 5.5, true, data.client_name.trim().to_string()),
        (17.0, 4.5, false, data.construction_size.trim().to_string()),
    ];
    if let Some(detail) = data.detail_name.as_deref().filter(|d| !d.trim().is_empty()) {
        lines.push((25.0, 4.0, false, detail.trim().to_string()));
    }
    if let Some(serial) = data.serial_number.as_deref().filter(|s| !s.trim().is_empty()) {
        lines.push((33.0, 3.5, false, format!("S/N {}", serial.trim())));
    }

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}mm\" height=\"{h}mm\" viewBox=\"0 0 {w} {h}\">\n",
        w = LABEL_WIDTH_MM,
        h = LABEL_HEIGHT_MM
    ));
    svg.push_str(&format!(
        "  <rect x=\"0.5\" y=\"0.5\" width=\"{}\" height=\"{}\" fill=\"white\" stroke=\"black\" stroke-width=\"0.3\"/>\n",
        LABEL_WIDTH_MM - 1.0,
        LABEL_HEIGHT_MM - 1.0
    ));
    for (y, size, bold, text) in lines {
        svg.push_str(&format!(
            "  <text x=\"3\" y=\"{}\" font-family=\"sans-serif\" font-size=\"{}\"{}>{}</text>\n",
            y,
            size,
            if bold { " font-weight=\"bold\"" } else { "" },
            escape_xml(&text)
        ));
    }
    svg.push_str("</svg>\n");

    Ok(LabelArtifact {
        svg,
        base_name: reference.base_name(data.detail_name.as_deref()),
    })
}

/// Destination for rendered labels
pub trait LabelSink {
    fn accept(&mut self, artifact: &LabelArtifact) -> Result<()>;
}

/// Writes labels as `.svg` files into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            written: Vec::new(),
        }
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl LabelSink for DirectorySink {
    fn accept(&mut self, artifact: &LabelArtifact) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(artifact.svg_file_name());
        fs::write(&path, &artifact.svg)?;
        info!("Wrote label {}", path.display());
        self.written.push(path);
        Ok(())
    }
}
