//! Application state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `StagePlotApp` is the single owner of everything the editor shows: the
//! interaction controller (and through it the stage document), the icon
//! catalog, the project metadata and the admin capability flag. The browser
//! host creates one per page; tests create as many as they like with a
//! `MemoryStorage` and a fixed clock.
//!
//! Every document or catalog mutation is followed by a save through the
//! injected [`Storage`] port. A failed save is logged and the in-memory state
//! stays authoritative.
//!
//! The admin flag is set by the host after the server confirms an admin
//! session. It is never read from or written to storage.
//!
//! When the stored snapshot cannot be read at all (corrupt text, or a schema
//! from a newer build) the app starts fresh but leaves storage alone until
//! the user restores a plot or starts a new project, so the stored copy is
//! not overwritten by an empty one.
//!
//! Custom icons only enter the catalog through the admin operations or
//! through [`StagePlotApp::sync_custom_icons`], and every icon that arrives
//! already encoded is re-checked against the upload rules.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use crate::catalog::{CustomIcon, CustomIconPatch, IconCatalog};
use crate::doc::{ContactInfo, Project, StageDocument, StageSize};
use crate::engine::{Action, EngineCore};
use crate::ingest::{IconDetails, IngestError, UploadedFile, check_encoded, ingest};
use crate::input_list::InputChannel;
use crate::stage_size::{StageSizeError, StageSizeForm};
use crate::storage::{BrowserStorage, Snapshot, Storage};

/// Who uploaded icons are attributed to.
const ADMIN_AUTHOR: &str = "admin";

/// Errors from application-level operations.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("admin access required")]
    AdminRequired,
    #[error("unknown custom icon: {0}")]
    UnknownIcon(String),
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    StageSize(#[from] StageSizeError),
}

/// Source of ISO-8601 timestamps.
pub type Clock = Box<dyn Fn() -> String>;

pub struct StagePlotApp {
    core: EngineCore,
    catalog: IconCatalog,
    project: Project,
    is_admin: bool,
    storage: Box<dyn Storage>,
    /// Set when the stored snapshot was unreadable; saves are skipped.
    storage_locked: bool,
    clock: Clock,
}

/// Keep only icons whose artwork passes the upload rules.
fn accepted_icons(icons: Vec<CustomIcon>) -> Vec<CustomIcon> {
    icons
        .into_iter()
        .filter(|icon| match check_encoded(&icon.svg_data) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("dropping custom icon {}: {e}", icon.id);
                false
            }
        })
        .collect()
}

impl StagePlotApp {
    /// Build the app and hydrate it from storage.
    ///
    /// An unreadable snapshot is logged and the app starts on a fresh
    /// project with saving paused, see [`Self::is_storage_locked`].
    #[must_use]
    pub fn new(storage: Box<dyn Storage>, clock: Clock) -> Self {
        let mut storage_locked = false;
        let snapshot = match storage.load() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => Snapshot { project: Project::new(clock()), ..Snapshot::default() },
            Err(e) => {
                log::warn!("stored stage plot is unreadable, local saves paused: {e}");
                storage_locked = true;
                Snapshot { project: Project::new(clock()), ..Snapshot::default() }
            }
        };

        let mut app = Self {
            core: EngineCore::new(),
            catalog: IconCatalog::with_custom(accepted_icons(snapshot.custom_icons.clone())),
            project: Project::default(),
            is_admin: false,
            storage,
            storage_locked,
            clock,
        };
        app.hydrate(snapshot);
        app
    }

    /// App backed by `localStorage` with the browser clock.
    #[must_use]
    pub fn browser() -> Self {
        Self::new(Box::new(BrowserStorage::new()), Box::new(|| String::from(js_sys::Date::new_0().to_iso_string())))
    }

    /// Load the document and project. The catalog is left as it is.
    fn hydrate(&mut self, snapshot: Snapshot) {
        let mut doc = StageDocument::new();
        doc.set_stage_size(snapshot.stage_size);
        doc.replace_items(snapshot.stage_items);
        self.core.load_document(doc);
        self.project = snapshot.project;
    }

    /// Current persisted view of the app.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            project: self.project.clone(),
            stage_items: self.core.items().to_vec(),
            stage_size: self.core.doc.stage_size(),
            custom_icons: self.catalog.custom_icons().to_vec(),
            ..Snapshot::default()
        }
    }

    /// The snapshot to send to the shared server plot. Custom icons travel
    /// only through the admin icon endpoints, so they are left out.
    #[must_use]
    pub fn shared_snapshot(&self) -> Snapshot {
        Snapshot { custom_icons: Vec::new(), ..self.snapshot() }
    }

    /// Replace the document and project with a snapshot (for example one
    /// fetched from the server) and save it locally. The local catalog is
    /// kept; icons in `snapshot` are ignored.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.hydrate(snapshot.normalized());
        self.storage_locked = false;
        self.persist();
    }

    /// Replace the custom icons with the shared catalog listed by the server.
    /// Icons whose artwork fails the upload rules are dropped.
    pub fn sync_custom_icons(&mut self, icons: Vec<CustomIcon>) {
        self.catalog = IconCatalog::with_custom(accepted_icons(icons));
        self.persist();
    }

    /// Whether local saves are paused because the stored plot was unreadable.
    #[must_use]
    pub fn is_storage_locked(&self) -> bool {
        self.storage_locked
    }

    fn persist(&mut self) {
        self.project.updated_at = (self.clock)();
        if self.storage_locked {
            log::debug!("stored stage plot is unreadable, save skipped");
            return;
        }
        if let Err(e) = self.storage.save(&self.snapshot()) {
            log::warn!("failed to save stage plot: {e}");
        }
    }

    // --- Controller ---

    /// Run a controller operation and save if it changed the document.
    pub fn apply<F>(&mut self, op: F) -> Vec<Action>
    where
        F: FnOnce(&mut EngineCore) -> Vec<Action>,
    {
        let actions = op(&mut self.core);
        if actions.iter().any(Action::mutates_document) {
            self.persist();
        }
        actions
    }

    #[must_use]
    pub fn core(&self) -> &EngineCore {
        &self.core
    }

    #[must_use]
    pub fn input_list(&self) -> Vec<InputChannel> {
        self.core.input_list()
    }

    // --- Stage size ---

    /// Open the stage size dialog on the current dimensions.
    #[must_use]
    pub fn stage_size_form(&self) -> StageSizeForm {
        StageSizeForm::open(self.core.doc.stage_size())
    }

    /// Submit the dialog. An invalid draft leaves the stage untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StageSize`] when either draft is invalid.
    pub fn submit_stage_size(&mut self, form: &StageSizeForm) -> Result<StageSize, AppError> {
        let size = form.submit()?;
        self.apply(|core| vec![core.set_stage_size(size)]);
        Ok(size)
    }

    // --- Project ---

    #[must_use]
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Rename the project. Blank names are ignored.
    pub fn set_project_name(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        self.project.name = name.to_owned();
        self.persist();
    }

    pub fn set_band_name(&mut self, band_name: &str) {
        band_name.trim().clone_into(&mut self.project.band_name);
        self.persist();
    }

    pub fn set_contact_info(&mut self, contact_info: ContactInfo) {
        self.project.contact_info = contact_info;
        self.persist();
    }

    /// Start over: fresh project, empty stage at the default size. Custom
    /// icons are kept.
    pub fn new_project(&mut self) {
        self.core.load_document(StageDocument::new());
        self.project = Project::new((self.clock)());
        self.storage_locked = false;
        self.persist();
    }

    // --- Catalog ---

    #[must_use]
    pub fn catalog(&self) -> &IconCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Grant or revoke the admin capability for this session.
    pub fn set_admin(&mut self, is_admin: bool) {
        self.is_admin = is_admin;
    }

    fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin { Ok(()) } else { Err(AppError::AdminRequired) }
    }

    /// Validate an upload and add it to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AdminRequired`] without the admin capability and
    /// [`AppError::Ingest`] when the file is rejected. Either way the catalog
    /// is unchanged.
    pub fn upload_custom_icon(
        &mut self,
        file: &UploadedFile<'_>,
        name: Option<String>,
        category: Option<String>,
    ) -> Result<CustomIcon, AppError> {
        self.require_admin()?;
        let details = IconDetails { name, category, created_by: ADMIN_AUTHOR.to_owned(), created_at: (self.clock)() };
        let icon = ingest(file, details)?;
        self.add_custom_icon(icon.clone())?;
        Ok(icon)
    }

    /// Add an already validated icon (for example one returned by the server).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AdminRequired`] without the admin capability.
    pub fn add_custom_icon(&mut self, icon: CustomIcon) -> Result<(), AppError> {
        self.require_admin()?;
        log::debug!("adding custom icon {} ({})", icon.name, icon.id);
        self.catalog.add_custom(icon);
        self.persist();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`AppError::AdminRequired`] without the admin capability and
    /// [`AppError::UnknownIcon`] when no icon has this id.
    pub fn update_custom_icon(&mut self, id: &str, patch: &CustomIconPatch) -> Result<(), AppError> {
        self.require_admin()?;
        if !self.catalog.update_custom(id, patch) {
            return Err(AppError::UnknownIcon(id.to_owned()));
        }
        self.persist();
        Ok(())
    }

    /// Remove a custom icon. Items already placed with it keep their artwork
    /// reference.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AdminRequired`] without the admin capability and
    /// [`AppError::UnknownIcon`] when no icon has this id.
    pub fn remove_custom_icon(&mut self, id: &str) -> Result<CustomIcon, AppError> {
        self.require_admin()?;
        let removed = self.catalog.remove_custom(id).ok_or_else(|| AppError::UnknownIcon(id.to_owned()))?;
        self.persist();
        Ok(removed)
    }
}
