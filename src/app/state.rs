use derivative::Derivative;
use parse_uploader::api::ParseResponse;
use parse_uploader::error::{ApiError, ApiResult, WorkflowError};
use parse_uploader::workflow::{PendingRequest, UploadWorkflow};
use std::sync::mpsc::{Receiver, TryRecvError};

#[derive(Derivative)]
#[derivative(Debug, Default)]
pub struct AppState {
    pub workflow: UploadWorkflow,
    pub show_original: bool,
    /// Problems outside the workflow, such as an unreadable pick.
    pub error_message: Option<String>,
    #[derivative(Debug = "ignore")]
    pub outcome_receiver: Option<Receiver<ApiResult<ParseResponse>>>,
}

impl AppState {
    /// Starts an upload; a stale selection error goes away once it is accepted.
    pub fn begin_upload(&mut self) -> Result<PendingRequest, WorkflowError> {
        let request = self.workflow.begin_upload()?;
        self.error_message = None;
        Ok(request)
    }

    pub fn begin_staging_reload(&mut self) -> Result<PendingRequest, WorkflowError> {
        let request = self.workflow.begin_staging_reload()?;
        self.error_message = None;
        Ok(request)
    }

    /// Applies the worker's result once it arrives. Returns true when the
    /// workflow changed.
    pub fn poll_outcome(&mut self) -> bool {
        let Some(receiver) = &self.outcome_receiver else {
            return false;
        };

        let outcome = match receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(ApiError::Transport(
                "Worker stopped before the request finished".to_string(),
            )),
        };
        self.outcome_receiver = None;

        match &outcome {
            Ok(response) => println!(
                "Request completed: {} fields received",
                response.parsed_data.len()
            ),
            Err(e) => eprintln!("Request failed: {}", e),
        }

        if let Err(e) = self.workflow.complete(outcome) {
            eprintln!("Discarding response: {}", e);
        }
        true
    }
}
