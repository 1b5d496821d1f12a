//! Upload/parse/edit session state.
//!
//! [`UploadWorkflow`] never performs I/O itself. Accepted requests come back
//! as a [`PendingRequest`] that the caller executes against a
//! [`ParseBackend`] and feeds back through [`UploadWorkflow::complete`].

mod result_set;
mod selection;

pub use result_set::{EditableResultSet, FieldChange, ParsedResultSet};
pub use selection::SelectedFile;

use crate::api::{OperationId, ParseBackend, ParseResponse};
use crate::error::{ApiResult, WorkflowError};

pub const SELECT_FILE_MESSAGE: &str = "Selecione um arquivo.";
pub const PROCESSING_MESSAGE: &str = "Processando...";
pub const SUCCESS_MESSAGE: &str = "Arquivo processado!";
pub const ERROR_MARKER: &str = "ERRO: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    FileSelected,
    Uploading,
    Success,
    Error,
}

/// A request the workflow accepted and is now waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingRequest {
    Upload(SelectedFile),
    StagingReload(OperationId),
}

impl PendingRequest {
    pub async fn execute<B: ParseBackend>(&self, backend: &B) -> ApiResult<ParseResponse> {
        match self {
            PendingRequest::Upload(file) => backend.upload_and_parse(&file.path).await,
            PendingRequest::StagingReload(id) => backend.get_staging_data(id).await,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            PendingRequest::Upload(file) => format!("upload of '{}'", file.name),
            PendingRequest::StagingReload(id) => format!("staging reload of operation {}", id),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UploadWorkflow {
    state: WorkflowState,
    selected_file: Option<SelectedFile>,
    message: String,
    original: ParsedResultSet,
    editable: EditableResultSet,
    operation_id: Option<OperationId>,
}

impl UploadWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn original(&self) -> &ParsedResultSet {
        &self.original
    }

    pub fn editable(&self) -> &EditableResultSet {
        &self.editable
    }

    pub fn operation_id(&self) -> Option<&OperationId> {
        self.operation_id.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.state == WorkflowState::Uploading
    }

    pub fn can_upload(&self) -> bool {
        self.selected_file.is_some() && !self.is_busy()
    }

    pub fn can_reload_staging(&self) -> bool {
        self.state == WorkflowState::Success && self.operation_id.is_some()
    }

    /// Chooses the document for the next upload. Results already on screen
    /// stay until a new request starts.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<(), WorkflowError> {
        if self.is_busy() {
            return Err(WorkflowError::UploadInFlight);
        }
        self.selected_file = Some(file);
        if self.state == WorkflowState::Idle {
            self.state = WorkflowState::FileSelected;
        }
        Ok(())
    }

    pub fn clear_selection(&mut self) -> Result<(), WorkflowError> {
        if self.is_busy() {
            return Err(WorkflowError::UploadInFlight);
        }
        self.selected_file = None;
        if self.state == WorkflowState::FileSelected {
            self.state = WorkflowState::Idle;
        }
        Ok(())
    }

    pub fn begin_upload(&mut self) -> Result<PendingRequest, WorkflowError> {
        let Some(file) = self.selected_file.clone() else {
            self.message = SELECT_FILE_MESSAGE.to_string();
            return Err(WorkflowError::NoFileSelected);
        };
        if self.is_busy() {
            return Err(WorkflowError::UploadInFlight);
        }
        self.operation_id = None;
        self.start_request();
        Ok(PendingRequest::Upload(file))
    }

    /// Re-fetches the staged results of the last operation. Only offered
    /// while those results are on screen.
    pub fn begin_staging_reload(&mut self) -> Result<PendingRequest, WorkflowError> {
        if self.is_busy() {
            return Err(WorkflowError::UploadInFlight);
        }
        if self.state != WorkflowState::Success {
            return Err(WorkflowError::NoResults);
        }
        let id = self.operation_id.clone().ok_or(WorkflowError::NoOperation)?;
        self.start_request();
        Ok(PendingRequest::StagingReload(id))
    }

    fn start_request(&mut self) {
        self.original = ParsedResultSet::default();
        self.editable.clear();
        self.message = PROCESSING_MESSAGE.to_string();
        self.state = WorkflowState::Uploading;
    }

    pub fn complete(&mut self, result: ApiResult<ParseResponse>) -> Result<(), WorkflowError> {
        if !self.is_busy() {
            return Err(WorkflowError::NotAwaitingResponse);
        }

        match result {
            Ok(response) => {
                self.original = ParsedResultSet::new(response.parsed_data);
                self.editable = EditableResultSet::from_original(&self.original);
                if let Some(id) = response.operation_id {
                    self.operation_id = Some(id);
                }
                self.message = SUCCESS_MESSAGE.to_string();
                self.state = WorkflowState::Success;
            }
            Err(err) => {
                self.message = format!("{}{}", ERROR_MARKER, err.detail());
                self.state = WorkflowState::Error;
            }
        }
        Ok(())
    }

    /// Sets the working value of `field_name`. Unknown names leave the set
    /// untouched and report false.
    pub fn edit_field(&mut self, field_name: &str, new_value: &str) -> bool {
        if self.state != WorkflowState::Success {
            return false;
        }
        self.editable.set_value(field_name, new_value)
    }

    pub fn reset_edits(&mut self) {
        if self.state == WorkflowState::Success {
            self.editable = EditableResultSet::from_original(&self.original);
        }
    }

    pub fn changed_fields(&self) -> Vec<FieldChange> {
        self.editable.changes_from(&self.original)
    }
}
