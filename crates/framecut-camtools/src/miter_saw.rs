use crate::error::{CamToolError, Result};
use framecut_core::{BeamName, Orientation};
use serde::{Deserialize, Serialize};

/// Machine settings for the 4-axis miter cutting operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiterCutParameters {
    /// Height for safe travel and rotary moves (mm)
    pub safe_z: f64,
    /// Z of the saw blade while cutting (mm)
    pub cut_z: f64,
    /// Feed rate for the plunge (mm/min)
    pub plunge_rate: f64,
    /// Feed rate along the cut (mm/min)
    pub feed_rate: f64,
    /// Spindle speed (RPM)
    pub spindle_speed: f64,
}

impl Default for MiterCutParameters {
    fn default() -> Self {
        Self {
            safe_z: 60.0,
            cut_z: -5.0,
            plunge_rate: 300.0,
            feed_rate: 800.0,
            spindle_speed: 3000.0,
        }
    }
}

impl MiterCutParameters {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("plunge rate", self.plunge_rate),
            ("feed rate", self.feed_rate),
            ("spindle speed", self.spindle_speed),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CamToolError::InvalidParameters(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !(self.safe_z.is_finite() && self.cut_z.is_finite()) || self.safe_z <= self.cut_z {
            return Err(CamToolError::InvalidParameters(format!(
                "safe Z {} must be above cut Z {}",
                self.safe_z, self.cut_z
            )));
        }
        Ok(())
    }
}

/// One end cut of a beam: rapid to `start` at `angle`, cut to `end`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndCut {
    pub start: (f64, f64),
    pub end: (f64, f64),
    /// Rotary axis angle in degrees
    pub angle: i32,
}

impl EndCut {
    fn mirror_x(self) -> Self {
        Self {
            start: (-self.start.0, self.start.1),
            end: (-self.end.0, self.end.1),
            ..self
        }
    }

    fn mirror_y(self) -> Self {
        Self {
            start: (self.start.0, -self.start.1),
            end: (self.end.0, -self.end.1),
            ..self
        }
    }

    fn swap_axes(self) -> Self {
        Self {
            start: (self.start.1, self.start.0),
            end: (self.end.1, self.end.0),
            ..self
        }
    }
}

/// Cut coordinates for both ends of a beam
///
/// The first end is cut at +45 degrees and the second at -45. The second
/// end is the first mirrored about the middle of the beam. Vertical beams
/// swap the X and Y roles, BOTTOM mirrors TOP across X and RIGHT mirrors
/// LEFT across Y.
///
/// Nothing is validated: a kerf at or above the beam thickness yields
/// coordinates that describe no physical cut.
pub fn cut_plan(
    beam: BeamName,
    frame_width: f64,
    frame_height: f64,
    beam_thickness: f64,
    saw_thickness: f64,
) -> [EndCut; 2] {
    let t = beam_thickness;
    let dy = saw_thickness;
    let length = match beam.orientation() {
        Orientation::Horizontal => frame_width,
        Orientation::Vertical => frame_height,
    };

    let first = EndCut {
        start: (t - dy, dy),
        end: (-dy, t + dy),
        angle: 45,
    };
    let second = EndCut {
        start: (length - t + dy, dy),
        end: (length + dy, t + dy),
        angle: -45,
    };

    let plan = [first, second];
    match beam {
        BeamName::Top => plan,
        BeamName::Bottom => plan.map(EndCut::mirror_y),
        BeamName::Left => plan.map(EndCut::swap_axes),
        BeamName::Right => plan.map(|cut| cut.swap_axes().mirror_x()),
    }
}

/// Format a linear axis value with three decimals, never as "-0.000"
fn mm(value: f64) -> String {
    let formatted = format!("{:.3}", value);
    if formatted == "-0.000" {
        "0.000".to_string()
    } else {
        formatted
    }
}

/// Generator for miter-cut G-Code
pub struct MiterCutGenerator {
    params: MiterCutParameters,
}

impl MiterCutGenerator {
    pub fn new(params: MiterCutParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &MiterCutParameters {
        &self.params
    }

    /// Generate the program for one part
    ///
    /// `part` is matched case-insensitively against TOP, BOTTOM, LEFT and
    /// RIGHT. Any other name produces the program envelope with no cuts.
    pub fn generate(
        &self,
        part: &str,
        frame_width: f64,
        frame_height: f64,
        beam_thickness: f64,
        saw_thickness: f64,
    ) -> String {
        let p = &self.params;
        let beam = part.parse::<BeamName>().ok();
        let mut gcode = String::new();

        gcode.push_str("%\n");
        match beam {
            Some(beam) => {
                let length = match beam.orientation() {
                    Orientation::Horizontal => frame_width,
                    Orientation::Vertical => frame_height,
                };
                gcode.push_str(&format!(
                    "(PART {} L={} T={} KERF={})\n",
                    beam,
                    mm(length),
                    mm(beam_thickness),
                    mm(saw_thickness)
                ));
            }
            None => {
                gcode.push_str(&format!("(PART {} UNRECOGNIZED)\n", part.trim()));
            }
        }
        gcode.push_str("G90\n");
        gcode.push_str("G54\n");
        gcode.push_str("G49\n");
        gcode.push_str(&format!("M3 S{:.0}\n", p.spindle_speed));

        if let Some(beam) = beam {
            for cut in cut_plan(beam, frame_width, frame_height, beam_thickness, saw_thickness) {
                self.push_cut(&mut gcode, &cut);
            }
        }

        gcode.push_str("G80\n");
        gcode.push_str("G54\n");
        gcode.push_str("M5\n");
        gcode.push_str("M30\n");
        gcode.push_str("%\n");
        gcode
    }

    fn push_cut(&self, gcode: &mut String, cut: &EndCut) {
        let p = &self.params;
        gcode.push_str(&format!(
            "G0 X{} Y{} Z{} A{}\n",
            mm(cut.start.0),
            mm(cut.start.1),
            mm(p.safe_z),
            cut.angle
        ));
        gcode.push_str(&format!("G1 Z{} F{:.0}\n", mm(p.cut_z), p.plunge_rate));
        gcode.push_str(&format!(
            "G1 X{} Y{} F{:.0}\n",
            mm(cut.end.0),
            mm(cut.end.1),
            p.feed_rate
        ));
        gcode.push_str(&format!("G0 Z{}\n", mm(p.safe_z)));
        gcode.push_str("G0 X0.000 Y0.000 A0\n");
    }
}

impl Default for MiterCutGenerator {
    fn default() -> Self {
        Self::new(MiterCutParameters::default())
    }
}

/// Generate a miter-cut program with the default machine settings
pub fn generate(
    part: &str,
    frame_width: f64,
    frame_height: f64,
    beam_thickness: f64,
    saw_thickness: f64,
) -> String {
    MiterCutGenerator::default().generate(
        part,
        frame_width,
        frame_height,
        beam_thickness,
        saw_thickness,
    )
}
