//! Drives an editor through a script and writes JSON lines

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use journey_core::{
    EventOutcome, InteractionStateMachine, JourneyQuery, RenderFeatures, ZoneConfig, ZoneSnapshot,
};
use parking_lot::Mutex;
use serde::Serialize;

use crate::debounce::{IssuedQuery, QueryDebouncer};
use crate::script::ReplayScript;

#[derive(Debug, Clone, Copy)]
pub struct ReplayOptions {
    pub debounce_ms: u64,
    pub features: bool,
}

/// Counters reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub applied: usize,
    pub ignored: usize,
    pub rejected: usize,
    pub snapshots: usize,
    pub queries: usize,
}

/// Output collected by the publisher callbacks between events
#[derive(Debug, Default)]
struct Outbox {
    snapshots: Vec<ZoneSnapshot>,
    features: Vec<RenderFeatures>,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Record<'a> {
    Snapshot {
        at_ms: u64,
        snapshot: &'a ZoneSnapshot,
    },
    Query {
        at_ms: u64,
        path: String,
        query: &'a JourneyQuery,
    },
    Features {
        at_ms: u64,
        geojson: serde_json::Value,
    },
}

fn write_record(out: &mut impl Write, record: &Record<'_>) -> Result<()> {
    serde_json::to_writer(&mut *out, record).context("encoding output line")?;
    writeln!(out).context("writing output line")?;
    Ok(())
}

fn write_query(out: &mut impl Write, issued: &IssuedQuery) -> Result<()> {
    write_record(
        out,
        &Record::Query {
            at_ms: issued.at_ms,
            path: issued.query.request_path(),
            query: &issued.query,
        },
    )
}

struct Runner<W: Write> {
    machine: InteractionStateMachine,
    outbox: Arc<Mutex<Outbox>>,
    debouncer: QueryDebouncer,
    out: W,
    summary: ReplaySummary,
}

impl<W: Write> Runner<W> {
    fn new(config: ZoneConfig, options: ReplayOptions, out: W) -> Result<Self> {
        let mut machine = InteractionStateMachine::new(config).context("creating zone editor")?;
        let outbox = Arc::new(Mutex::new(Outbox::default()));

        let snapshots = outbox.clone();
        machine.subscribe(move |snapshot: &ZoneSnapshot| {
            snapshots.lock().snapshots.push(snapshot.clone());
        });
        if options.features {
            let features = outbox.clone();
            machine.attach_sink(move |frame: &RenderFeatures| {
                features.lock().features.push(frame.clone());
            });
        }

        Ok(Self {
            machine,
            outbox,
            debouncer: QueryDebouncer::new(options.debounce_ms),
            out,
            summary: ReplaySummary::default(),
        })
    }

    /// Write everything the publisher produced at `at_ms`
    fn drain(&mut self, at_ms: u64) -> Result<()> {
        let Outbox {
            snapshots,
            features,
        } = std::mem::take(&mut *self.outbox.lock());

        for snapshot in &snapshots {
            write_record(&mut self.out, &Record::Snapshot { at_ms, snapshot })?;
            self.debouncer.observe(snapshot.query(), at_ms);
        }
        self.summary.snapshots += snapshots.len();

        for frame in &features {
            write_record(
                &mut self.out,
                &Record::Features {
                    at_ms,
                    geojson: frame.to_geojson(),
                },
            )?;
        }
        Ok(())
    }

    fn poll_queries(&mut self, now_ms: u64) -> Result<()> {
        if let Some(issued) = self.debouncer.poll(now_ms) {
            write_query(&mut self.out, &issued)?;
            self.summary.queries += 1;
        }
        Ok(())
    }

    fn run(mut self, script: &ReplayScript) -> Result<ReplaySummary> {
        self.machine.announce();
        self.drain(0)?;

        for (index, step) in script.steps.iter().enumerate() {
            self.poll_queries(step.at_ms)?;

            let mut event = step.event;
            if step.pick {
                event.target = self.machine.pick(event.position);
            }

            self.summary.events += 1;
            match self.machine.handle_event(&event) {
                Ok(EventOutcome::Applied { .. }) => self.summary.applied += 1,
                Ok(EventOutcome::Ignored(reason)) => {
                    tracing::debug!("Step {} ignored: {:?}", index, reason);
                    self.summary.ignored += 1;
                }
                Err(e) if e.is_internal_fault() => {
                    bail!("step {} at {} ms hit an internal fault: {}", index, step.at_ms, e);
                }
                Err(e) => {
                    tracing::warn!("Step {} rejected: {}", index, e);
                    self.summary.rejected += 1;
                }
            }

            self.drain(step.at_ms)?;
        }

        if self.debouncer.has_pending() {
            tracing::debug!("Flushing pending query at end of script");
        }
        if let Some(issued) = self.debouncer.flush() {
            write_query(&mut self.out, &issued)?;
            self.summary.queries += 1;
        }
        self.out.flush().context("flushing output")?;
        Ok(self.summary)
    }
}

/// Run `script` against a fresh editor, writing JSON lines to `out`
pub fn run(
    config: ZoneConfig,
    script: &ReplayScript,
    options: ReplayOptions,
    out: impl Write,
) -> Result<ReplaySummary> {
    Runner::new(config, options, out)?.run(script)
}
