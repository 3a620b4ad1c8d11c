// src/controller.rs

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use anyhow::{Context, Result};
use tokio::task::JoinSet;
use tracing::{error, info, instrument, warn};

use crate::bridge::HostBridge;
use crate::config::InsertFailurePolicy;
use crate::error::ActivationError;
use crate::fetch::RecordSource;
use crate::schema::{DatasetDescriptor, IframeDescriptor};
use crate::status::{StatusPresenter, StatusText, Surface};

/// Outcome of one press of the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Records were fetched and handed to the host.
    Completed { records: usize },
    /// A previous press was still in flight.
    Ignored,
}

/// Wires the fetcher, the host bridge and the status line together.
pub struct Controller<F, B, S: Surface> {
    source: F,
    bridge: B,
    presenter: StatusPresenter<S>,
    status: Mutex<StatusText>,
    busy: AtomicBool,
    policy: InsertFailurePolicy,
    dataset: &'static DatasetDescriptor,
    frame: &'static IframeDescriptor,
}

/// Clears the busy flag however the activation ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<F, B, S> Controller<F, B, S>
where
    F: RecordSource + 'static,
    B: HostBridge + 'static,
    S: Surface + 'static,
{
    pub fn new(source: F, bridge: B, surface: S, policy: InsertFailurePolicy) -> Self {
        Self {
            source,
            bridge,
            presenter: StatusPresenter::new(surface),
            status: Mutex::new(StatusText::default()),
            busy: AtomicBool::new(false),
            policy,
            dataset: DatasetDescriptor::demographics(),
            frame: IframeDescriptor::demographics(),
        }
    }

    /// Handshake with the host, declare the dataset, then hand out the control.
    ///
    /// The returned [`Control`] is the only way to trigger [`Controller::on_activate`],
    /// so no press can arrive before the dataset exists.
    #[instrument(level = "info", skip_all)]
    pub async fn initialize(self: Arc<Self>) -> Result<Control<F, B, S>> {
        info!("initializing demographics plugin");
        self.bridge
            .init(self.frame)
            .await
            .context("negotiating plugin frame with host")?;
        self.bridge
            .init_data_set(self.dataset)
            .await
            .with_context(|| format!("declaring dataset {}", self.dataset.name))?;

        let control = Control {
            controller: Arc::clone(&self),
            in_flight: JoinSet::new(),
        };
        self.cycle();
        Ok(control)
    }

    /// Fetch, hand everything to the host, report the count.
    #[instrument(level = "info", skip_all)]
    pub async fn on_activate(&self) -> Result<Activation, ActivationError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("fetch already in flight; ignoring press");
            return Ok(Activation::Ignored);
        }
        let _busy = BusyGuard(&self.busy);

        let records = self.source.fetch_records().await?;
        let n = records.len();

        if let Err(e) = self.bridge.create_items(&records, &self.dataset.name).await {
            match self.policy {
                InsertFailurePolicy::LogAndContinue => {
                    error!(error = %e, "Problem emitting transaction to host");
                }
                InsertFailurePolicy::Abort => {
                    return Err(ActivationError::Insert {
                        records: n,
                        source: e,
                    });
                }
            }
        }

        if let Ok(mut status) = self.status.lock() {
            status.set(StatusText::records_fetched(n));
        }
        self.cycle();
        info!(records = n, "activation complete");
        Ok(Activation::Completed { records: n })
    }

    /// Redraw everything that can change.
    fn cycle(&self) {
        if let Ok(status) = self.status.lock() {
            self.presenter.render(&status);
        }
    }

    pub fn status(&self) -> StatusText {
        self.status
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn presenter(&self) -> &StatusPresenter<S> {
        &self.presenter
    }
}

/// The bound activation control. Each press runs as its own task.
pub struct Control<F, B, S: Surface> {
    controller: Arc<Controller<F, B, S>>,
    in_flight: JoinSet<Result<Activation, ActivationError>>,
}

impl<F, B, S> Control<F, B, S>
where
    F: RecordSource + 'static,
    B: HostBridge + 'static,
    S: Surface + 'static,
{
    pub fn press(&mut self) {
        let controller = Arc::clone(&self.controller);
        self.in_flight
            .spawn(async move { controller.on_activate().await });
    }

    /// Wait for every outstanding press. Failures are logged, not returned.
    pub async fn settle(&mut self) -> Vec<Activation> {
        let mut done = Vec::new();
        while let Some(joined) = self.in_flight.join_next().await {
            match joined {
                Ok(Ok(a)) => done.push(a),
                Ok(Err(e)) => error!(error = %e, "activation failed"),
                Err(e) => error!(error = %e, "activation task panicked"),
            }
        }
        done
    }

    pub fn controller(&self) -> &Controller<F, B, S> {
        &self.controller
    }
}
