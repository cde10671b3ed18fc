//! Matrix row model.
//!
//! One [`MatrixRow`] is one fault/component scenario. The same row feeds
//! candidate generation (which only needs monitor ids) and the execution
//! harness (which needs full [`MonitorSpec`]s), so monitor entries accept
//! either form.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Phase ───────────────────────────────────────────────────────────────

/// Which half of a fault scenario a row or candidate exercises.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// The declared start → end transition under the injected fault.
    #[default]
    Transition,
    /// Recovery from the post-fault end state, warming from the same fault.
    Recovery,
}

impl Phase {
    /// Both phases in emission order.
    pub fn all() -> &'static [Phase] {
        &[Self::Transition, Self::Recovery]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transition => "transition",
            Self::Recovery => "recovery",
        }
    }

    /// Three-letter tag used in sequenced test-case ids.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::Transition => "TRA",
            Self::Recovery => "REC",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ── ASIL ────────────────────────────────────────────────────────────────

/// Automotive Safety Integrity Level of a scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Asil {
    #[serde(rename = "QM")]
    Qm,
    A,
    B,
    C,
    D,
}

impl Asil {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Qm => "QM",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }

    /// Parse the textual level used in matrix documents.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "QM" => Some(Self::Qm),
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            _ => None,
        }
    }
}

impl fmt::Display for Asil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Row components ──────────────────────────────────────────────────────

/// State the component is in when the fault is injected.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BehaviorContext {
    /// State before injection.
    pub start_state: String,
    /// Fault the component is warming from, if the scenario is a follow-on.
    #[serde(default)]
    pub warm_from_fault_id: Option<String>,
}

impl BehaviorContext {
    pub fn new(start_state: impl Into<String>) -> Self {
        Self {
            start_state: start_state.into(),
            warm_from_fault_id: None,
        }
    }

    /// Mark the scenario as following on from `fault_id`.
    pub fn warm_from(mut self, fault_id: impl Into<String>) -> Self {
        self.warm_from_fault_id = Some(fault_id.into());
        self
    }
}

/// Outcome the component must reach.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpectedBehavior {
    /// State the component must settle in.
    pub end_state: String,
    /// Name of the transition into `end_state`.
    pub transition_name: String,
}

impl ExpectedBehavior {
    pub fn new(end_state: impl Into<String>, transition_name: impl Into<String>) -> Self {
        Self {
            end_state: end_state.into(),
            transition_name: transition_name.into(),
        }
    }
}

/// Timing budget of the transition, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimingBudget {
    /// Upper bound for the transition; at least 1.
    pub max_time_ms: u64,
    /// Allowed overshoot of `max_time_ms`.
    pub tolerance_ms: u64,
    /// Known error of the measurement itself.
    pub measurement_uncertainty: u64,
}

impl Default for TimingBudget {
    fn default() -> Self {
        Self {
            max_time_ms: 100,
            tolerance_ms: 10,
            measurement_uncertainty: 0,
        }
    }
}

/// Requirement traceability.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(default)]
    pub req_ids: Vec<String>,
}

/// ISO test methods, grouped the way matrix documents nest them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsoMethods {
    #[serde(default)]
    pub test: Vec<String>,
}

/// ISO environment and method tags used by compliance summaries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsoAttributes {
    #[serde(default)]
    pub environments: Vec<String>,
    #[serde(default)]
    pub methods: IsoMethods,
}

// ── Monitors ────────────────────────────────────────────────────────────

/// Full description of one monitor attached to a row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonitorSpec {
    /// Monitor id, unique within its row.
    pub id: String,
    /// Name of the plugin in the monitor registry.
    pub plugin: String,
    /// Plugin-specific parameters.
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl MonitorSpec {
    pub fn new(id: impl Into<String>, plugin: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            plugin: plugin.into(),
            params: Map::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// A monitor reference as written in a matrix document.
///
/// A bare id `X` stands for `{id: X, plugin: X, params: {}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MonitorEntry {
    Id(String),
    Spec(MonitorSpec),
}

impl MonitorEntry {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Spec(spec) => &spec.id,
        }
    }

    pub fn to_spec(&self) -> MonitorSpec {
        match self {
            Self::Id(id) => MonitorSpec::new(id.clone(), id.clone()),
            Self::Spec(spec) => spec.clone(),
        }
    }
}

impl From<&str> for MonitorEntry {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<MonitorSpec> for MonitorEntry {
    fn from(spec: MonitorSpec) -> Self {
        Self::Spec(spec)
    }
}

// ── Row identity ────────────────────────────────────────────────────────

/// Primary de-duplication key of a row.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RowKey {
    pub fault_id: String,
    pub component_id: String,
    pub start_state: String,
    pub warm_from_fault_id: Option<String>,
}

// ── Matrix row ──────────────────────────────────────────────────────────

fn default_enabled() -> bool {
    true
}

/// One fault/component scenario of a behavior matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatrixRow {
    /// Injected fault.
    pub fault_id: String,
    /// Component under test.
    pub component_id: String,
    pub context: BehaviorContext,
    pub expect: ExpectedBehavior,
    /// Monitors in evaluation order; ids are distinct.
    pub monitors: Vec<MonitorEntry>,
    pub timing: TimingBudget,
    /// Ranking weight in `[0.0, 1.0]`.
    pub priority: f64,
    /// Requirements the row verifies.
    pub trace: Trace,
    /// `MAJOR.MINOR.PATCH` revision of the row.
    pub version: String,
    /// Free text; never part of a candidate's identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Free labels; never part of a candidate's identity.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Disabled rows are validated and reported but never executed.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Phase the row itself describes.
    #[serde(default)]
    pub phase: Phase,
    /// ISO 26262 integrity level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asil: Option<Asil>,
    /// Coverage column of the row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_family: Option<String>,
    /// Test environments and methods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso: Option<IsoAttributes>,
}

impl MatrixRow {
    /// Create an enabled transition row with default timing and no monitors.
    pub fn new(
        fault_id: impl Into<String>,
        component_id: impl Into<String>,
        context: BehaviorContext,
        expect: ExpectedBehavior,
    ) -> Self {
        Self {
            fault_id: fault_id.into(),
            component_id: component_id.into(),
            context,
            expect,
            monitors: Vec::new(),
            timing: TimingBudget::default(),
            priority: 0.5,
            trace: Trace::default(),
            version: "1.0.0".into(),
            notes: None,
            tags: Vec::new(),
            enabled: true,
            phase: Phase::Transition,
            asil: None,
            event_type: None,
            event_family: None,
            iso: None,
        }
    }

    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_timing(mut self, timing: TimingBudget) -> Self {
        self.timing = timing;
        self
    }

    /// Append a monitor, either an id or a full [`MonitorSpec`].
    pub fn with_monitor(mut self, monitor: impl Into<MonitorEntry>) -> Self {
        self.monitors.push(monitor.into());
        self
    }

    /// Replace the traced requirement ids.
    pub fn with_req_ids<I, S>(mut self, req_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trace.req_ids = req_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Include or exclude the row from execution.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_asil(mut self, asil: Asil) -> Self {
        self.asil = Some(asil);
        self
    }

    pub fn with_event_type(mut self, event_type: u32) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn with_iso(mut self, iso: IsoAttributes) -> Self {
        self.iso = Some(iso);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Replace the tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// The identity tuple that must be unique within a document.
    pub fn key(&self) -> RowKey {
        RowKey {
            fault_id: self.fault_id.clone(),
            component_id: self.component_id.clone(),
            start_state: self.context.start_state.clone(),
            warm_from_fault_id: self.context.warm_from_fault_id.clone(),
        }
    }

    /// Monitor ids in declaration order.
    pub fn monitor_ids(&self) -> Vec<&str> {
        self.monitors.iter().map(MonitorEntry::id).collect()
    }

    /// Monitor specs in declaration order, expanding bare ids.
    pub fn monitor_specs(&self) -> Vec<MonitorSpec> {
        self.monitors.iter().map(MonitorEntry::to_spec).collect()
    }

    pub fn iso_environments(&self) -> &[String] {
        match &self.iso {
            Some(iso) => &iso.environments,
            None => &[],
        }
    }

    pub fn iso_test_methods(&self) -> &[String] {
        match &self.iso {
            Some(iso) => &iso.methods.test,
            None => &[],
        }
    }
}

/// An ordered sequence of rows, as carried under the `matrix` key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixDocument {
    /// Rows in document order.
    pub matrix: Vec<MatrixRow>,
}

impl MatrixDocument {
    pub fn new(matrix: Vec<MatrixRow>) -> Self {
        Self { matrix }
    }

    /// Raw document value, the shape the validator consumes.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}
