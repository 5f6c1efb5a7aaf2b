use crate::capture::ImageExporter;
use crate::form::HypercertForm;
use crate::submit::{SubmitOutcome, Submitter};
use crate::validate::ValidationReport;
use crate::{Error, FormValues, Result};
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::sync::oneshot;

type EditFn = Box<dyn FnOnce(&mut FormValues) + Send>;

enum Command {
    LoadQuery(Option<String>, oneshot::Sender<FormValues>),
    Edit(EditFn, oneshot::Sender<()>),
    Values(oneshot::Sender<FormValues>),
    // Replies with the report and, once the initial query is loaded, the
    // query string the host should push into the URL
    Validate(oneshot::Sender<(ValidationReport, Option<String>)>),
    Submit(oneshot::Sender<Result<SubmitOutcome>>),
    Close(oneshot::Sender<()>),
}

/// An async-friendly form abstraction backed by a dedicated worker thread.
///
/// The worker thread owns the [`HypercertForm`] and its collaborators and
/// executes commands sent from async tasks, so callers get an async
/// interface while form state stays single-owner. Commands are processed
/// serially, which also makes concurrent submit calls queue instead of
/// racing.
#[derive(Clone)]
pub struct AsyncForm {
    cmd_tx: Sender<Command>,
}

struct UrlBuffer {
    written: Option<String>,
}

impl crate::form::QuerySink for UrlBuffer {
    fn write_query(&mut self, query: &str) {
        self.written = Some(query.to_string());
    }
}

impl AsyncForm {
    /// Create a new form (spawns a background thread that owns the state).
    pub fn new(submitter: Submitter, exporter: Box<dyn ImageExporter + Send>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();

        thread::spawn(move || {
            let mut form = HypercertForm::new();

            // Command loop
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::LoadQuery(query, resp) => {
                        form.load_initial_query(query.as_deref());
                        let _ = resp.send(form.values().clone());
                    }
                    Command::Edit(apply, resp) => {
                        apply(form.values_mut());
                        let _ = resp.send(());
                    }
                    Command::Values(resp) => {
                        let _ = resp.send(form.values().clone());
                    }
                    Command::Validate(resp) => {
                        let mut sink = UrlBuffer { written: None };
                        let report = form.validate(&mut sink).clone();
                        let _ = resp.send((report, sink.written));
                    }
                    Command::Submit(resp) => {
                        let res = form.submit(&submitter, exporter.as_ref());
                        let _ = resp.send(res);
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(());
                        break;
                    }
                }
            }
        });

        Self { cmd_tx }
    }

    /// Load the page's initial query string; returns the merged values.
    pub async fn load_query(&self, query: Option<String>) -> Result<FormValues> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::LoadQuery(query, tx));
        rx.await
            .map_err(|e| Error::Other(format!("LoadQuery canceled: {e}")))
    }

    /// Apply an edit to the form values on the worker thread.
    pub async fn edit<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut FormValues) + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Edit(Box::new(apply), tx));
        rx.await
            .map_err(|e| Error::Other(format!("Edit canceled: {e}")))
    }

    /// Snapshot the current form values.
    pub async fn values(&self) -> Result<FormValues> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Values(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Values canceled: {e}")))
    }

    /// Validate; returns the report and the query string to mirror into the
    /// URL (absent until the initial query has been loaded).
    pub async fn validate(&self) -> Result<(ValidationReport, Option<String>)> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Validate(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Validate canceled: {e}")))
    }

    /// Run the submission pipeline on the worker thread.
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Submit(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Submit canceled: {e}")))?
    }

    /// Shut down the background worker.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {e}")))
    }
}
