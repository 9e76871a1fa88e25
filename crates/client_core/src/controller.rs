//! The upload widget controller: owns the selected file and the widget state,
//! and pushes a fresh [`WidgetView`] to its surface after every transition.

use shared::{
    domain::{FileCandidate, SelectedFile, Sensitivity},
    error::{ErrorCode, SelectionError},
    protocol::ProcessOutcome,
};
use tracing::{debug, info, warn};

use crate::{
    state::{render, SubmissionTicket, UploadState, WidgetView},
    transport::{outcome_from_result, ProcessRequest, ProcessTransport},
};

/// Whatever displays the widget: a window, a terminal, a test recorder.
pub trait WidgetSurface {
    fn render(&mut self, view: &WidgetView);

    /// Blocking notice that does not change the widget state.
    fn alert(&mut self, message: &str);

    /// Forget the picker's last value so the same file can be chosen again.
    fn clear_picker(&mut self) {}
}

pub struct UploadController<S: WidgetSurface> {
    surface: S,
    state: UploadState,
    selected: Option<SelectedFile>,
    sensitivity: Sensitivity,
    drag_active: bool,
    next_ticket: u64,
}

impl<S: WidgetSurface> UploadController<S> {
    pub fn new(surface: S, sensitivity: Sensitivity) -> Self {
        let mut controller = Self {
            surface,
            state: UploadState::Idle,
            selected: None,
            sensitivity,
            drag_active: false,
            next_ticket: 1,
        };
        controller.publish();
        controller
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    /// Slider input. Read when a submission starts, never cached per file.
    pub fn set_sensitivity(&mut self, sensitivity: Sensitivity) {
        self.sensitivity = sensitivity;
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn view(&self) -> WidgetView {
        render(&self.state, self.selected.as_ref(), self.drag_active)
    }

    pub fn drag_enter(&mut self) {
        if self.state.is_submitting() || self.drag_active {
            return;
        }
        self.drag_active = true;
        self.publish();
    }

    pub fn drag_leave(&mut self) {
        if !self.drag_active {
            return;
        }
        self.drag_active = false;
        self.publish();
    }

    /// A drop onto the zone: clears the hover highlight, then selects.
    pub fn drop_files(
        &mut self,
        candidates: impl IntoIterator<Item = FileCandidate>,
    ) -> Result<bool, SelectionError> {
        self.drag_leave();
        self.select_files(candidates)
    }

    /// Only the first candidate of a batch is considered. Returns whether a
    /// file was accepted; an empty batch or a busy widget accepts nothing.
    pub fn select_files(
        &mut self,
        candidates: impl IntoIterator<Item = FileCandidate>,
    ) -> Result<bool, SelectionError> {
        match candidates.into_iter().next() {
            Some(candidate) => self.select_file(candidate),
            None => Ok(false),
        }
    }

    pub fn select_file(&mut self, candidate: FileCandidate) -> Result<bool, SelectionError> {
        if self.state.is_submitting() {
            debug!(name = %candidate.name, "ignoring selection while a submission is in flight");
            return Ok(false);
        }

        let selected = match SelectedFile::try_from(candidate) {
            Ok(selected) => selected,
            Err(err) => {
                self.reject_selection(&err);
                return Err(err);
            }
        };

        info!(
            name = selected.name(),
            mime_type = selected.mime_type(),
            size_bytes = selected.size_bytes(),
            "file selected"
        );
        self.selected = Some(selected);
        self.state = UploadState::FileChosen;
        self.publish();
        Ok(true)
    }

    /// Surfaces a selection failure that happened before a candidate existed,
    /// such as an unreadable path.
    pub fn reject_selection(&mut self, err: &SelectionError) {
        warn!(error = %err, "file rejected");
        self.surface.alert(&err.alert_message());
    }

    /// Moves to `Submitting` and hands back the request to send. `None` when
    /// there is nothing to submit or the widget is not in a submittable state.
    pub fn begin_submit(&mut self) -> Option<ProcessRequest> {
        let Some(selected) = self.selected.as_ref() else {
            debug!("submit ignored: no file selected");
            return None;
        };
        if !self.state.accepts_submit() {
            debug!(state = ?self.state, "submit ignored in current state");
            return None;
        }

        let ticket = SubmissionTicket(self.next_ticket);
        self.next_ticket += 1;
        let request = ProcessRequest {
            ticket,
            file_name: selected.name().to_string(),
            file_bytes: selected.bytes().to_vec(),
            sensitivity: self.sensitivity,
        };

        info!(
            ticket = ticket.0,
            name = %request.file_name,
            sensitivity = %request.sensitivity.form_value(),
            "submitting document"
        );
        self.drag_active = false;
        self.state = UploadState::Submitting { ticket };
        self.publish();
        Some(request)
    }

    /// Applies the result of the submission identified by `ticket`. Returns
    /// false when that submission is no longer the one in flight.
    pub fn settle(&mut self, ticket: SubmissionTicket, outcome: ProcessOutcome) -> bool {
        if self.state != (UploadState::Submitting { ticket }) {
            debug!(ticket = ticket.0, "discarding stale settlement");
            return false;
        }

        self.state = match outcome {
            ProcessOutcome::Completed {
                download_url,
                filename,
                removed_count,
            } => {
                info!(ticket = ticket.0, %download_url, ?removed_count, "processing succeeded");
                UploadState::Success {
                    download_url,
                    filename,
                    removed_count,
                }
            }
            ProcessOutcome::Failed(failure) => {
                if failure.code == ErrorCode::Application {
                    warn!(ticket = ticket.0, message = %failure.message, "processing failed");
                }
                UploadState::Error { failure }
            }
        };
        self.publish();
        true
    }

    /// Begin, send and settle in one call. A no-op without a selected file.
    pub async fn submit<T: ProcessTransport + ?Sized>(&mut self, transport: &T) -> bool {
        let Some(request) = self.begin_submit() else {
            return false;
        };
        let ticket = request.ticket;
        let outcome = outcome_from_result(transport.process(request).await);
        self.settle(ticket, outcome)
    }

    /// Back to `Idle` from any state. Clears the file and the picker.
    pub fn reset(&mut self) {
        debug!(state = ?self.state, "resetting widget");
        self.selected = None;
        self.drag_active = false;
        self.state = UploadState::Idle;
        self.surface.clear_picker();
        self.publish();
    }

    fn publish(&mut self) {
        let view = self.view();
        self.surface.render(&view);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
