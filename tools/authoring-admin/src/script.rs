//! Lifecycle scripts: a JSON list of items and the operations to run on them.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use authoring_lifecycle::adapters::{
    FallbackUserResolver, InMemoryLifecycleRegistry, InMemoryVersionedStore, LifecycleListener,
    ListenerRegistry, StaticEligibility, StaticUser, StoreSessionUser, SystemTimeSource,
    TracingNotifier,
};
use authoring_lifecycle::{
    property_keys, ItemId, ItemView, LifecycleConfig, LifecycleDefinition, LifecycleDependencies,
    LifecycleEvent, PublicationLifecycleApi, PublicationLifecycleService, RevisionData,
    SnapshotRef, TransitionContext, VersionLogEntry, VersionedStore, ViewerContext,
};
use authoring_telemetry::log_item_event;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// A whole script.
#[derive(Debug, Deserialize)]
pub struct Script {
    pub items: Vec<ItemScript>,
}

/// Operations for one freshly created item.
#[derive(Debug, Deserialize)]
pub struct ItemScript {
    pub name: String,
    /// Lifecycle to enroll into; the configured default when absent.
    #[serde(default)]
    pub lifecycle: Option<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Step {
    Change {
        state: String,
        #[serde(default)]
        revision_name: Option<String>,
        #[serde(default)]
        initial_phase: bool,
    },
    ContentChanged {
        #[serde(default)]
        state: Option<String>,
    },
    Resolve {
        #[serde(default)]
        mode: ViewMode,
    },
}

impl Step {
    fn label(&self) -> String {
        match self {
            Step::Change { state, .. } => format!("change {state}"),
            Step::ContentChanged { state } => {
                format!("content-changed {}", state.as_deref().unwrap_or("<first>"))
            }
            Step::Resolve { mode } => format!("resolve {mode:?}").to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    #[default]
    Live,
    Edit,
    Anonymous,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid lifecycle script")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read script {}", path.display()))?;
        Self::from_json(&json)
    }
}

/// Outcome of the script for one item.
#[derive(Debug, Serialize)]
pub struct ItemReport {
    pub id: String,
    pub name: String,
    pub state: Option<String>,
    pub live_revision: Option<String>,
    pub ledger: Vec<RevisionData>,
    pub last_log: Option<VersionLogEntry>,
    pub history: Vec<SnapshotRef>,
    pub steps: Vec<StepReport>,
    pub events: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: String,
    pub outcome: String,
}

/// Collects event names for the report.
#[derive(Default)]
struct EventLog {
    events: Mutex<Vec<String>>,
}

impl EventLog {
    fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl LifecycleListener for EventLog {
    fn name(&self) -> &str {
        "report"
    }

    fn on_event(&self, event: &LifecycleEvent) -> Result<(), String> {
        self.events.lock().push(event.kind().name().to_string());
        Ok(())
    }
}

type AdminService = PublicationLifecycleService<
    InMemoryVersionedStore,
    InMemoryLifecycleRegistry,
    FallbackUserResolver,
    ListenerRegistry,
    StaticEligibility,
    SystemTimeSource,
>;

/// Runs scripts against a private in-memory store.
pub struct Runner {
    service: AdminService,
    store: Arc<InMemoryVersionedStore>,
    events: Arc<EventLog>,
}

impl Runner {
    pub fn new(config: LifecycleConfig, lifecycles: InMemoryLifecycleRegistry, user: &str) -> Self {
        let store = Arc::new(
            InMemoryVersionedStore::new()
                .with_root_snapshot_name(config.root_snapshot_name.clone())
                .with_session_user("system"),
        );
        let users = FallbackUserResolver::new()
            .with_source(Arc::new(StaticUser::new("cli", user)))
            .with_source(Arc::new(StoreSessionUser::new(store.clone())));

        let events = Arc::new(EventLog::default());
        let notifier = ListenerRegistry::new();
        notifier.register(Arc::new(TracingNotifier));
        notifier.register(events.clone());

        let deps = LifecycleDependencies {
            store: store.clone(),
            lifecycles: Arc::new(lifecycles),
            users: Arc::new(users),
            notifier: Arc::new(notifier),
            eligibility: Arc::new(StaticEligibility::all()),
            clock: Arc::new(SystemTimeSource),
        };
        Self {
            service: PublicationLifecycleService::new(config, deps),
            store,
            events,
        }
    }

    pub fn run(&self, script: &Script) -> Result<Vec<ItemReport>> {
        script.items.iter().map(|item| self.run_item(item)).collect()
    }

    fn run_item(&self, script: &ItemScript) -> Result<ItemReport> {
        let item = self.store.create_item(&script.name);
        self.service
            .enroll(&item, script.lifecycle.as_deref())
            .with_context(|| format!("cannot enroll '{}'", script.name))?;
        log_item_event!(info, "item enrolled", item, name = %script.name);

        let mut steps = Vec::with_capacity(script.steps.len());
        for step in &script.steps {
            match self.run_step(&item, step) {
                Ok(outcome) => steps.push(StepReport {
                    step: step.label(),
                    outcome,
                }),
                Err(e) => {
                    log_item_event!(warn, "script step failed", item, error = %e);
                    steps.push(StepReport {
                        step: step.label(),
                        outcome: format!("error: {e}"),
                    });
                    // A failed transition leaves the item as the store has it.
                    break;
                }
            }
        }

        self.report(&item, &script.name, steps)
    }

    fn run_step(&self, item: &ItemId, step: &Step) -> Result<String> {
        match step {
            Step::Change {
                state,
                revision_name,
                initial_phase,
            } => {
                let mut context = if *initial_phase {
                    TransitionContext::initial_phase()
                } else {
                    TransitionContext::new()
                };
                if let Some(name) = revision_name {
                    context = context.with_revision_name(name.clone());
                }
                self.service.change_state(item, state, &context)?;
                Ok("ok".to_string())
            }
            Step::ContentChanged { state } => {
                let changed = self
                    .service
                    .update_lifecycle_on_change_content(item, state.as_deref())?;
                Ok(if changed { "changed" } else { "unchanged" }.to_string())
            }
            Step::Resolve { mode } => {
                let viewer = match mode {
                    ViewMode::Live => Some(ViewerContext::live()),
                    ViewMode::Edit => Some(ViewerContext::edit()),
                    ViewMode::Anonymous => None,
                };
                Ok(describe_view(
                    self.service.resolve_viewable(item, viewer.as_ref()),
                ))
            }
        }
    }

    fn report(&self, item: &ItemId, name: &str, steps: Vec<StepReport>) -> Result<ItemReport> {
        Ok(ItemReport {
            id: item.to_string(),
            name: name.to_string(),
            state: self.service.current_state(item)?,
            live_revision: self.store.get_text(item, property_keys::LIVE_REVISION)?,
            ledger: self
                .service
                .revision_ledger(item)?
                .entries()
                .cloned()
                .collect(),
            last_log: self.service.last_log_entry(item)?,
            history: self.store.list_snapshots(item)?,
            steps,
            events: self.events.drain(),
        })
    }
}

fn describe_view(view: Option<ItemView>) -> String {
    match view {
        None => "nothing".to_string(),
        Some(ItemView::WorkingCopy(id)) => format!("working copy {id}"),
        Some(ItemView::Snapshot(snapshot)) => format!("snapshot {}", snapshot.name),
        Some(ItemView::Frozen(frozen)) => format!("frozen snapshot {}", frozen.snapshot.name),
    }
}

/// Lifecycle definitions used when no definition file is given.
pub fn default_lifecycles(config: &LifecycleConfig) -> Result<InMemoryLifecycleRegistry> {
    let registry = InMemoryLifecycleRegistry::new().with_definition(LifecycleDefinition::new(
        config.default_lifecycle.clone(),
        ["draft", "pending", "published"],
    ))?;
    Ok(registry)
}
