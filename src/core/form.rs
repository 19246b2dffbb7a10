use crate::core::client;
use crate::core::normalizer::{self, EditRejection, FieldEdit};
use crate::domain::ports::CalculationService;
use crate::domain::schema::{Section, Transaction};
use crate::utils::error::{Result, GENERIC_CALCULATION_ERROR};

/// Issued by `begin_submit`; carries the request body and its sequence tag.
#[derive(Debug, Clone)]
pub struct SubmitTicket<I> {
    pub seq: u64,
    pub body: I,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Failed,
    /// A newer submission was issued meanwhile; the outcome was dropped.
    Stale,
}

/// State of one transaction form: its input model, the last result and the
/// bookkeeping for the outstanding request.
#[derive(Debug)]
pub struct FormSession<T: Transaction> {
    input: T::Input,
    result: Option<T::Output>,
    error: Option<String>,
    loading: bool,
    latest_seq: u64,
}

impl<T: Transaction> Default for FormSession<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transaction> FormSession<T> {
    pub fn new() -> Self {
        Self::with_input(T::Input::default())
    }

    pub fn with_input(input: T::Input) -> Self {
        Self {
            input,
            result: None,
            error: None,
            loading: false,
            latest_seq: 0,
        }
    }

    pub fn input(&self) -> &T::Input {
        &self.input
    }

    pub fn result(&self) -> Option<&T::Output> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The submit control is disabled while a request is outstanding.
    pub fn submit_enabled(&self) -> bool {
        !self.loading
    }

    /// Applies one edit through the normalizer. A rejected edit leaves the
    /// input model exactly as it was.
    pub fn edit(&mut self, edit: &FieldEdit) -> std::result::Result<(), EditRejection> {
        match normalizer::apply_edit::<T>(&self.input, edit) {
            Ok(next) => {
                self.input = next;
                Ok(())
            }
            Err(rejection) => {
                tracing::warn!(
                    "⚠️ {}: edit of '{}' discarded: {}",
                    T::KIND.title(),
                    edit.field,
                    rejection
                );
                Err(rejection)
            }
        }
    }

    pub fn display_value(&self, field: &str) -> Option<String> {
        normalizer::display_value::<T>(&self.input, field)
    }

    /// Clears the previous result and error, marks the form as loading and
    /// tags the request with a fresh sequence number.
    pub fn begin_submit(&mut self) -> SubmitTicket<T::Input> {
        self.latest_seq += 1;
        self.result = None;
        self.error = None;
        self.loading = true;

        SubmitTicket {
            seq: self.latest_seq,
            body: self.input.clone(),
        }
    }

    /// Applies the outcome of a submission unless a newer one was issued.
    pub fn complete(
        &mut self,
        ticket: &SubmitTicket<T::Input>,
        outcome: Result<T::Output>,
    ) -> Completion {
        if ticket.seq != self.latest_seq {
            tracing::debug!(
                "{}: dropping response #{} (latest is #{})",
                T::KIND.title(),
                ticket.seq,
                self.latest_seq
            );
            return Completion::Stale;
        }

        self.loading = false;
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                Completion::Applied
            }
            Err(e) => {
                tracing::error!(
                    "❌ {} calculation failed: {} (Category: {:?})",
                    T::KIND.title(),
                    e,
                    e.category()
                );
                self.result = None;
                self.error = Some(GENERIC_CALCULATION_ERROR.to_string());
                Completion::Failed
            }
        }
    }

    pub async fn submit<S>(&mut self, service: &S) -> Completion
    where
        S: CalculationService + ?Sized,
    {
        let ticket = self.begin_submit();
        tracing::info!("🧮 Submitting {} calculation #{}", T::KIND.title(), ticket.seq);

        let outcome = client::calculate::<T, S>(service, &ticket.body).await;
        self.complete(&ticket, outcome)
    }

    /// Sections of the current result, shared by the presenter and the print view.
    pub fn sections(&self) -> Option<Vec<Section>> {
        self.result.as_ref().map(T::sections)
    }
}
