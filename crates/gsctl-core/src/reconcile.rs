// ── Reconciliation protocol ──
//
// fetch → merge → submit → re-fetch. Every write operation runs through a
// `Run`, which logs each phase transition and the terminal outcome. Writes
// are sequential per port and stop at the first rejection; ports already
// written stay written.

use gsctl_api::{
    DebugPage, PoePortSetting, PoePortStatus, PortIndex, PortSetting, PortStatus, SwitchFamily,
};
use strum::Display;
use tracing::{debug, info, warn};

use crate::change::{PoeSettingsChange, PortSettingsChange};
use crate::error::CoreError;
use crate::mapping::normalize_port;
use crate::merge::{merge_poe, merge_port};
use crate::session::Session;

// ── Phase ────────────────────────────────────────────────────────────

/// States of one reconciliation run. `Failed` is reachable from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    Idle,
    Fetching,
    Merging,
    Submitting,
    Verifying,
    Done,
    Failed,
}

struct Run {
    operation: &'static str,
    phase: Phase,
}

impl Run {
    fn start(operation: &'static str) -> Self {
        debug!(operation, phase = %Phase::Idle, "reconcile started");
        Self {
            operation,
            phase: Phase::Idle,
        }
    }

    fn enter(&mut self, phase: Phase) {
        debug!(operation = self.operation, from = %self.phase, to = %phase, "phase transition");
        self.phase = phase;
    }

    fn finish<T>(mut self, result: Result<T, CoreError>) -> Result<T, CoreError> {
        match &result {
            Ok(_) => {
                self.enter(Phase::Done);
                info!(operation = self.operation, "reconcile done");
            }
            Err(e) => {
                warn!(operation = self.operation, phase = %self.phase, error = %e, "reconcile failed");
                self.enter(Phase::Failed);
            }
        }
        result
    }
}

// ── Port bounds ──────────────────────────────────────────────────────

/// Check every requested port against `1..=max`.
fn check_ports(ports: &[PortIndex], max: PortIndex) -> Result<(), CoreError> {
    match ports.iter().find(|&&p| p < 1 || p > max) {
        Some(&port) => Err(CoreError::PortOutOfRange { port, max }),
        None => Ok(()),
    }
}

/// Upper port bound: fixed on `Gs316`, the served list (capped at the
/// model's port count) on `Gs30x`.
fn port_bound(session: &Session, family: SwitchFamily, served: usize) -> PortIndex {
    family.fixed_port_count().unwrap_or_else(|| {
        let served = PortIndex::try_from(served).unwrap_or(PortIndex::MAX);
        session
            .model()
            .map_or(served, |model| served.min(model.max_ports()))
    })
}

/// Keep the records for `ports`, in the order given. An empty selection
/// keeps everything.
fn select<T: Clone>(
    records: Vec<T>,
    ports: &[PortIndex],
    index: impl Fn(&T) -> PortIndex,
) -> Vec<T> {
    if ports.is_empty() {
        return records;
    }
    touched(&records, ports, index)
}

/// Records written by a run, in the order given. Writing no ports touches
/// nothing, so an empty selection yields nothing.
fn touched<T: Clone>(
    records: &[T],
    ports: &[PortIndex],
    index: impl Fn(&T) -> PortIndex,
) -> Vec<T> {
    ports
        .iter()
        .filter_map(|&p| records.iter().find(|r| index(r) == p).cloned())
        .collect()
}

fn current<T>(
    records: &[T],
    port: PortIndex,
    max: PortIndex,
    index: impl Fn(&T) -> PortIndex,
) -> Result<&T, CoreError> {
    records
        .iter()
        .find(|r| index(r) == port)
        .ok_or(CoreError::PortOutOfRange { port, max })
}

// ── Operations ───────────────────────────────────────────────────────

impl Session {
    /// Current settings of `ports` (all ports when empty), as codes.
    pub async fn get_port_settings(
        &mut self,
        ports: &[PortIndex],
    ) -> Result<Vec<PortSetting>, CoreError> {
        let token = self.resolve()?;
        let family = token.family();
        let page = self.client().port_settings(&token).await?;
        let max = port_bound(self, family, page.ports.len());
        check_ports(ports, max)?;

        let settings: Vec<PortSetting> = page
            .ports
            .into_iter()
            .map(|p| normalize_port(family, p))
            .collect();
        Ok(select(settings, ports, |p: &PortSetting| p.index))
    }

    /// Link state of `ports` (all ports when empty).
    pub async fn get_port_status(
        &mut self,
        ports: &[PortIndex],
    ) -> Result<Vec<PortStatus>, CoreError> {
        let token = self.resolve()?;
        let status = self.client().port_status(&token).await?;
        let max = port_bound(self, token.family(), status.len());
        check_ports(ports, max)?;
        Ok(select(status, ports, |p: &PortStatus| p.index))
    }

    /// Apply `change` to every port in `ports` and return their settings
    /// as re-read from the switch, in the order requested.
    pub async fn set_port_settings(
        &mut self,
        ports: &[PortIndex],
        change: PortSettingsChange,
    ) -> Result<Vec<PortSetting>, CoreError> {
        let mut run = Run::start("set_port_settings");
        let result = self.reconcile_ports(&mut run, ports, &change).await;
        run.finish(result)
    }

    async fn reconcile_ports(
        &mut self,
        run: &mut Run,
        ports: &[PortIndex],
        change: &PortSettingsChange,
    ) -> Result<Vec<PortSetting>, CoreError> {
        run.enter(Phase::Fetching);
        let token = self.resolve()?;
        let family = token.family();
        let page = self.client().port_settings(&token).await?;

        run.enter(Phase::Merging);
        let settings: Vec<PortSetting> = page
            .ports
            .into_iter()
            .map(|p| normalize_port(family, p))
            .collect();
        let max = port_bound(self, family, settings.len());
        check_ports(ports, max)?;

        let mut updates = Vec::with_capacity(ports.len());
        for &port in ports {
            let now = current(&settings, port, max, |p: &PortSetting| p.index)?;
            updates.push((now, merge_port(family, now, change)?));
        }

        run.enter(Phase::Submitting);
        for (now, desired) in &updates {
            debug!(port = desired.index, "submitting port settings");
            self.client()
                .update_port(&token, page.hash.as_deref(), now, desired)
                .await?;
        }

        run.enter(Phase::Verifying);
        let fresh = self.client().port_settings(&token).await?;
        let fresh: Vec<PortSetting> = fresh
            .ports
            .into_iter()
            .map(|p| normalize_port(family, p))
            .collect();
        Ok(touched(&fresh, ports, |p: &PortSetting| p.index))
    }

    /// Current PoE settings of `ports` (all PoE ports when empty).
    pub async fn get_poe_settings(
        &mut self,
        ports: &[PortIndex],
    ) -> Result<Vec<PoePortSetting>, CoreError> {
        let token = self.resolve()?;
        let page = self.client().poe_config(&token).await?;
        let max = poe_bound(token.family(), page.ports.len());
        check_ports(ports, max)?;
        Ok(select(page.ports, ports, |p: &PoePortSetting| p.index))
    }

    /// Live PoE telemetry of `ports` (all PoE ports when empty).
    pub async fn get_poe_status(
        &mut self,
        ports: &[PortIndex],
    ) -> Result<Vec<PoePortStatus>, CoreError> {
        let token = self.resolve()?;
        let status = self.client().poe_status(&token).await?;
        let max = poe_bound(token.family(), status.len());
        check_ports(ports, max)?;
        Ok(select(status, ports, |p: &PoePortStatus| p.index))
    }

    /// Apply `change` to every PoE port in `ports` and return their
    /// settings as re-read from the switch, in the order requested.
    pub async fn set_poe_settings(
        &mut self,
        ports: &[PortIndex],
        change: PoeSettingsChange,
    ) -> Result<Vec<PoePortSetting>, CoreError> {
        let mut run = Run::start("set_poe_settings");
        let result = self.reconcile_poe(&mut run, ports, &change).await;
        run.finish(result)
    }

    async fn reconcile_poe(
        &mut self,
        run: &mut Run,
        ports: &[PortIndex],
        change: &PoeSettingsChange,
    ) -> Result<Vec<PoePortSetting>, CoreError> {
        run.enter(Phase::Fetching);
        let token = self.resolve()?;
        let family = token.family();
        let page = self.client().poe_config(&token).await?;

        run.enter(Phase::Merging);
        let max = poe_bound(family, page.ports.len());
        check_ports(ports, max)?;

        let mut updates = Vec::with_capacity(ports.len());
        for &port in ports {
            let now = current(&page.ports, port, max, |p: &PoePortSetting| p.index)?;
            updates.push((now, merge_poe(family, now, change, &page.max_power_limit)?));
        }

        run.enter(Phase::Submitting);
        for (now, desired) in &updates {
            debug!(port = desired.index, "submitting PoE settings");
            self.client()
                .update_poe_port(&token, page.hash.as_deref(), now, desired)
                .await?;
        }

        run.enter(Phase::Verifying);
        let fresh = self.client().poe_config(&token).await?;
        Ok(touched(&fresh.ports, ports, |p: &PoePortSetting| p.index))
    }

    /// Power-cycle `ports` in one submission and return their PoE settings
    /// as re-read from the switch afterwards.
    pub async fn cycle_poe_power(
        &mut self,
        ports: &[PortIndex],
    ) -> Result<Vec<PoePortSetting>, CoreError> {
        let mut run = Run::start("cycle_poe_power");
        let result = self.reconcile_cycle(&mut run, ports).await;
        run.finish(result)
    }

    async fn reconcile_cycle(
        &mut self,
        run: &mut Run,
        ports: &[PortIndex],
    ) -> Result<Vec<PoePortSetting>, CoreError> {
        run.enter(Phase::Fetching);
        let token = self.resolve()?;
        let family = token.family();

        // Gs316 needs neither a hash nor the served port list.
        let hash = match family.resettable_poe_ports() {
            Some(max) => {
                run.enter(Phase::Merging);
                check_ports(ports, max)?;
                None
            }
            None => {
                let page = self.client().poe_config(&token).await?;
                run.enter(Phase::Merging);
                check_ports(ports, poe_bound(family, page.ports.len()))?;
                page.hash
            }
        };

        run.enter(Phase::Submitting);
        self.client()
            .reset_poe_ports(&token, hash.as_deref(), ports)
            .await?;

        run.enter(Phase::Verifying);
        let fresh = self.client().poe_config(&token).await?;
        Ok(touched(&fresh.ports, ports, |p: &PoePortSetting| p.index))
    }

    /// Capture raw pages for troubleshooting. Authenticated pages are only
    /// included when a stored token resolves.
    pub async fn debug_report(&mut self) -> Vec<DebugPage> {
        let token = match self.resolve() {
            Ok(token) => Some(token),
            Err(e) => {
                debug!(error = %e, "no usable session, capturing public pages only");
                None
            }
        };
        self.client().debug_report(token.as_ref()).await
    }
}

/// PoE ports are bounded by the served list on `Gs30x`.
fn poe_bound(family: SwitchFamily, served: usize) -> PortIndex {
    family
        .resettable_poe_ports()
        .unwrap_or_else(|| PortIndex::try_from(served).unwrap_or(PortIndex::MAX))
}
