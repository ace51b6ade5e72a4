//! # Editor Session
//!
//! Owns the two copies of the frame parameters and everything derived from
//! the confirmed one.
//!
//! - The *draft* is edited freely and never touches geometry or exports.
//! - [`EditorSession::confirm`] validates the draft and builds its geometry,
//!   persists it through the [`ConstructionStore`] and only then advances
//!   the *confirmed* copy and swaps the scene.
//! - Geometry comes from the procedural builder until a reference model
//!   has been loaded; afterwards it is the reference model fitted to the
//!   confirmed parameters. A failed load leaves the procedural parts in
//!   place.
//! - G-code and labels are produced from confirmed parameters only.

use crate::asset::{AssetOutcome, AssetSource, AssetTicket};
use crate::error::{AssetError, EditorError, Result, StoreError};
use crate::store::{ConstructionStore, ConstructionUpdate};
use framecut_camtools::{
    GcodeArtifact, LabelArtifact, LabelData, LabelRef, LabelSink, MiterCutGenerator,
    MiterCutParameters,
};
use framecut_core::{
    AssetEvent, BeamName, EditorEvent, EventBus, FrameParameters, GizmoMode, PartOrdering,
    ViewMode,
};
use framecut_designer::{
    build_frame, Beam, ImportedModel, PartNameMap, ReferenceDimensions, ReferenceModel,
};
use framecut_settings::Config;
use framecut_visualizer::Scene;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Session options, usually taken from the settings file
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub reference_dimensions: ReferenceDimensions,
    pub part_names: PartNameMap,
    pub machine: MiterCutParameters,
    pub view_mode: ViewMode,
    pub gizmo_mode: GizmoMode,
    pub fov_degrees: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SessionConfig {
    fn from(config: &Config) -> Self {
        Self {
            reference_dimensions: config.reference_model.dimensions,
            part_names: config.reference_model.part_names.clone(),
            machine: config.machine.clone(),
            view_mode: config.view.view_mode,
            gizmo_mode: config.view.gizmo_mode,
            fov_degrees: config.view.fov_degrees,
        }
    }
}

pub struct EditorSession {
    construction_id: u64,
    draft: FrameParameters,
    confirmed: FrameParameters,
    beams: [Beam; 4],
    imported: Option<ImportedModel>,
    scene: Scene,
    config: SessionConfig,
    generator: MiterCutGenerator,
    store: Arc<dyn ConstructionStore>,
    bus: Arc<EventBus>,
    last_ticket: u64,
    pending: Option<AssetTicket>,
    confirm_attempt: u64,
}

/// A validated draft with its geometry, waiting for the store
struct PendingConfirm {
    attempt: u64,
    construction_id: u64,
    params: FrameParameters,
    beams: [Beam; 4],
    imported: Option<ImportedModel>,
    store: Arc<dyn ConstructionStore>,
}

impl PendingConfirm {
    async fn save(&self) -> std::result::Result<(), StoreError> {
        self.store
            .update(self.construction_id, ConstructionUpdate::from(&self.params))
            .await
    }
}

impl EditorSession {
    /// Start a session on a stored construction
    ///
    /// Both parameter copies start at `initial`, which must be valid.
    pub fn new(
        construction_id: u64,
        initial: FrameParameters,
        config: SessionConfig,
        store: Arc<dyn ConstructionStore>,
        bus: Arc<EventBus>,
    ) -> Result<Self> {
        initial.validate()?;
        let beams = build_frame(initial.width, initial.height, initial.beam_thickness)?;

        let mut scene = Scene::new(bus.clone());
        scene.camera_mut().fov = config.fov_degrees;
        scene.set_view_mode(config.view_mode);
        scene.set_gizmo_mode(config.gizmo_mode);
        scene.rebuild_from_beams(&beams);

        Ok(Self {
            construction_id,
            draft: initial,
            confirmed: initial,
            beams,
            imported: None,
            scene,
            generator: MiterCutGenerator::new(config.machine.clone()),
            config,
            store,
            bus,
            last_ticket: 0,
            pending: None,
            confirm_attempt: 0,
        })
    }

    pub fn construction_id(&self) -> u64 {
        self.construction_id
    }

    pub fn draft(&self) -> &FrameParameters {
        &self.draft
    }

    /// Edit the draft; nothing is rebuilt until [`EditorSession::confirm`]
    pub fn draft_mut(&mut self) -> &mut FrameParameters {
        &mut self.draft
    }

    pub fn set_draft(&mut self, params: FrameParameters) {
        self.draft = params;
    }

    /// Discard draft edits
    pub fn revert_draft(&mut self) {
        self.draft = self.confirmed;
    }

    pub fn confirmed(&self) -> &FrameParameters {
        &self.confirmed
    }

    pub fn has_unconfirmed_changes(&self) -> bool {
        self.draft != self.confirmed
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Procedural beams for the confirmed parameters
    pub fn beams(&self) -> &[Beam; 4] {
        &self.beams
    }

    pub fn imported(&self) -> Option<&ImportedModel> {
        self.imported.as_ref()
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Validate, persist and apply the draft
    ///
    /// Geometry for the draft is built before anything is saved, so the
    /// store never holds parameters the session could not apply. On any
    /// failure the confirmed parameters and the scene stay as they were.
    /// A session shared with background tasks is confirmed through
    /// [`confirm_draft`] instead, which releases the lock while saving.
    pub async fn confirm(&mut self) -> Result<()> {
        let pending = self.begin_confirm()?;
        let saved = pending.save().await;
        self.finish_confirm(pending, saved)
    }

    fn begin_confirm(&mut self) -> Result<PendingConfirm> {
        let params = self.draft;
        let prepared = params
            .validate()
            .map_err(EditorError::from)
            .and_then(|()| self.prepare_geometry(&params));
        let (beams, imported) = match prepared {
            Ok(geometry) => geometry,
            Err(e) => {
                self.notify(EditorEvent::ConfirmFailed {
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };

        self.confirm_attempt += 1;
        Ok(PendingConfirm {
            attempt: self.confirm_attempt,
            construction_id: self.construction_id,
            params,
            beams,
            imported,
            store: self.store.clone(),
        })
    }

    fn prepare_geometry(
        &self,
        params: &FrameParameters,
    ) -> Result<([Beam; 4], Option<ImportedModel>)> {
        let beams = build_frame(params.width, params.height, params.beam_thickness)?;
        let imported = match &self.imported {
            Some(current) => {
                let mut next = current.clone();
                next.rederive(params.width, params.height, params.beam_thickness)?;
                Some(next)
            }
            None => None,
        };
        Ok((beams, imported))
    }

    fn finish_confirm(
        &mut self,
        pending: PendingConfirm,
        saved: std::result::Result<(), StoreError>,
    ) -> Result<()> {
        if let Err(e) = saved {
            warn!("Construction {} not saved: {}", self.construction_id, e);
            self.notify(EditorEvent::ConfirmFailed {
                reason: e.to_string(),
            });
            return Err(e.into());
        }
        if pending.attempt != self.confirm_attempt {
            info!(
                "Confirmation {} superseded by {}",
                pending.attempt, self.confirm_attempt
            );
            return Err(EditorError::Superseded);
        }

        let PendingConfirm {
            params,
            beams,
            imported,
            ..
        } = pending;
        self.commit(params, beams, imported);
        info!(
            "Confirmed {}x{} beam {} kerf {}",
            params.width, params.height, params.beam_thickness, params.saw_thickness
        );
        self.notify(EditorEvent::ParametersConfirmed(params));
        Ok(())
    }

    /// Install prepared geometry; a model loaded or cleared while saving wins
    fn commit(
        &mut self,
        params: FrameParameters,
        beams: [Beam; 4],
        prepared: Option<ImportedModel>,
    ) {
        let same_model = match (&self.imported, &prepared) {
            (Some(current), Some(next)) => Arc::ptr_eq(current.raw(), next.raw()),
            _ => false,
        };
        if same_model {
            self.imported = prepared;
        } else if let Some(current) = self.imported.as_mut() {
            let fitted = current
                .rederive(params.width, params.height, params.beam_thickness)
                .map(|_| ());
            if let Err(e) = fitted {
                warn!("Reference model dropped, cannot fit it: {}", e);
                self.imported = None;
            }
        }

        self.confirmed = params;
        self.beams = beams;
        match self.imported.as_ref().and_then(ImportedModel::derived) {
            Some(derived) => self.scene.rebuild_from_derived(derived),
            None => self.scene.rebuild_from_beams(&self.beams),
        }
    }

    /// Start loading a reference model
    ///
    /// The current parts stay interactive while the fetch runs. Any ticket
    /// issued earlier becomes stale.
    pub fn begin_asset_load(&mut self, url: impl Into<String>) -> AssetTicket {
        self.issue_ticket(url.into())
    }

    /// The ticket whose result would currently be applied
    pub fn pending_load(&self) -> Option<&AssetTicket> {
        self.pending.as_ref()
    }

    fn issue_ticket(&mut self, url: String) -> AssetTicket {
        self.last_ticket += 1;
        let ticket = AssetTicket {
            id: self.last_ticket,
            url,
        };
        self.notify(EditorEvent::Asset(AssetEvent::Loading {
            url: ticket.url.clone(),
        }));
        self.pending = Some(ticket.clone());
        ticket
    }

    /// Apply the result of a fetch
    ///
    /// Results for anything but the latest ticket are discarded. A current
    /// result is fitted to the parameters confirmed now, including any
    /// confirmed while the fetch ran. Failures are reported and leave the
    /// procedural parts in place.
    pub fn complete_asset_load(
        &mut self,
        ticket: &AssetTicket,
        fetched: std::result::Result<Vec<u8>, AssetError>,
    ) -> AssetOutcome {
        if !self.pending.as_ref().is_some_and(|p| p.id == ticket.id) {
            warn!("Discarding stale fetch {} of {}", ticket.id, ticket.url);
            self.notify(EditorEvent::Asset(AssetEvent::Discarded {
                url: ticket.url.clone(),
            }));
            return AssetOutcome::Discarded;
        }
        self.pending = None;

        match self.apply_asset(fetched) {
            Ok(parts) => {
                info!("Loaded reference model {} ({} parts)", ticket.url, parts);
                self.notify(EditorEvent::Asset(AssetEvent::Loaded {
                    url: ticket.url.clone(),
                    parts,
                }));
                AssetOutcome::Loaded { parts }
            }
            Err(e) => {
                warn!("Reference model {} unavailable: {}", ticket.url, e);
                self.notify(EditorEvent::Asset(AssetEvent::Failed {
                    url: ticket.url.clone(),
                    error: e.to_string(),
                }));
                if !self.scene.is_procedural() {
                    self.imported = None;
                    self.scene.rebuild_from_beams(&self.beams);
                }
                AssetOutcome::Failed(e)
            }
        }
    }

    fn apply_asset(
        &mut self,
        fetched: std::result::Result<Vec<u8>, AssetError>,
    ) -> std::result::Result<usize, AssetError> {
        let model = ReferenceModel::from_glb(&fetched?)?;
        let mut imported = ImportedModel::new(
            Arc::new(model),
            self.config.reference_dimensions,
            self.config.part_names.clone(),
        );
        let params = self.confirmed;
        let derived = imported.rederive(params.width, params.height, params.beam_thickness)?;
        let parts = derived.parts.len();
        self.scene.rebuild_from_derived(derived);
        self.imported = Some(imported);
        Ok(parts)
    }

    /// Go back to procedural geometry
    pub fn clear_reference(&mut self) {
        self.pending = None;
        if self.imported.take().is_some() {
            self.scene.rebuild_from_beams(&self.beams);
        }
    }

    /// Program for the selected beam
    pub fn export_selected_gcode(&self) -> Result<GcodeArtifact> {
        let Some(selected) = self.scene.selected() else {
            self.notify(EditorEvent::ExportRefused {
                reason: EditorError::NoSelection.to_string(),
            });
            return Err(EditorError::NoSelection);
        };
        let Some(beam) = selected.beam() else {
            let error = EditorError::NotABeam(selected.clone());
            self.notify(EditorEvent::ExportRefused {
                reason: error.to_string(),
            });
            return Err(error);
        };
        Ok(self.export_beam(beam))
    }

    /// Programs for all four beams in part order
    pub fn export_all_gcode(&self) -> Vec<GcodeArtifact> {
        PartOrdering::beams()
            .into_iter()
            .map(|beam| self.export_beam(beam))
            .collect()
    }

    fn export_beam(&self, beam: BeamName) -> GcodeArtifact {
        let artifact = GcodeArtifact::generate(&self.generator, beam, &self.confirmed);
        self.notify(EditorEvent::ExportCompleted {
            file_name: artifact.file_name(),
        });
        artifact
    }

    /// Label contents for the confirmed construction size
    pub fn label_data(
        &self,
        client_name: impl Into<String>,
        detail_name: Option<String>,
        serial_number: Option<String>,
    ) -> LabelData {
        LabelData {
            client_name: client_name.into(),
            construction_size: format!("{} x {}", self.confirmed.width, self.confirmed.height),
            detail_name,
            serial_number,
        }
    }

    /// Render a label and hand it to `sink`
    pub fn export_label(
        &self,
        data: &LabelData,
        reference: &LabelRef,
        sink: &mut dyn LabelSink,
    ) -> Result<LabelArtifact> {
        let artifact = framecut_camtools::render_label(data, reference)?;
        sink.accept(&artifact)?;
        self.notify(EditorEvent::ExportCompleted {
            file_name: artifact.png_file_name(),
        });
        Ok(artifact)
    }

    fn notify(&self, event: EditorEvent) {
        if let Err(e) = self.bus.publish(event) {
            debug!("Editor event not delivered: {}", e);
        }
    }
}

/// Session shared between the UI and background fetches
pub type SharedSession = Arc<Mutex<EditorSession>>;

/// Confirm the draft of a shared session
///
/// The lock is held only to prepare and to apply; other tasks keep using
/// the session while the store saves. When two confirmations overlap, the
/// one started last is applied and the other returns
/// [`EditorError::Superseded`].
pub async fn confirm_draft(session: &SharedSession) -> Result<()> {
    let pending = session.lock().begin_confirm()?;
    let saved = pending.save().await;
    session.lock().finish_confirm(pending, saved)
}

/// Fetch a reference model without holding the session during the fetch
pub async fn load_reference(
    session: &SharedSession,
    source: &dyn AssetSource,
    url: &str,
) -> AssetOutcome {
    let ticket = session.lock().begin_asset_load(url);
    let fetched = source.fetch(&ticket.url).await;
    session.lock().complete_asset_load(&ticket, fetched)
}
