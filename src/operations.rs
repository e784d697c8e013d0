//! Operations demo.
//!
//! One "operation" instance type is bound under three capability keys with
//! three lifetimes. Comparing the ids of operations resolved from a handler
//! and from a service that depends on all three shows which lifetimes share
//! instances and which do not.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::{OPERATION_SCOPED, OPERATION_SINGLETON, OPERATION_TRANSIENT};
use crate::{InstanceRecord, Lifetime, RegistrationModule, Registrations, RegistryResult, ScopeHandle};

/// Installs the three operation bindings.
pub struct OperationsModule;

impl RegistrationModule for OperationsModule {
    fn register(self, registrations: &mut Registrations) {
        registrations
            .add_per_request(OPERATION_TRANSIENT)
            .add_per_scope(OPERATION_SCOPED)
            .add_per_process(OPERATION_SINGLETON);
    }
}

/// An operation instance as seen by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    record: InstanceRecord,
}

impl Operation {
    /// Unique id of the underlying instance.
    pub fn operation_id(&self) -> Uuid {
        self.record.id()
    }

    /// Creation sequence number within the registry, starting at 1.
    pub fn instance_number(&self) -> u64 {
        self.record.sequence()
    }

    /// When the instance was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.record.created_at()
    }

    /// "Transient", "Scoped" or "Singleton".
    pub fn lifetime_type(&self) -> &'static str {
        self.record.lifetime().label()
    }

    /// First eight hex characters of the id.
    pub fn short_id(&self) -> String {
        self.record.short_id()
    }

    /// One-line description naming the lifetime, id, sequence number and
    /// creation time.
    pub fn perform_operation(&self) -> String {
        self.record.describe()
    }

    /// The instance record this operation wraps.
    pub fn record(&self) -> &InstanceRecord {
        &self.record
    }
}

impl From<InstanceRecord> for Operation {
    fn from(record: InstanceRecord) -> Self {
        Self { record }
    }
}

/// The three operations resolved together in one scope.
#[derive(Debug, Clone)]
pub struct OperationSet {
    pub transient: Operation,
    pub scoped: Operation,
    pub singleton: Operation,
}

impl OperationSet {
    /// Resolves one operation of each lifetime in `scope`.
    pub fn resolve(scope: &ScopeHandle) -> RegistryResult<Self> {
        Ok(Self {
            transient: scope.resolve(&OPERATION_TRANSIENT)?.into(),
            scoped: scope.resolve(&OPERATION_SCOPED)?.into(),
            singleton: scope.resolve(&OPERATION_SINGLETON)?.into(),
        })
    }

    fn ids(&self) -> LifetimeIds {
        LifetimeIds {
            transient: self.transient.operation_id(),
            scoped: self.scoped.operation_id(),
            singleton: self.singleton.operation_id(),
        }
    }
}

/// Service depending on all three operations.
///
/// The service itself is built per use, so its transient operation is always
/// a different instance than one resolved directly by the caller.
#[derive(Debug, Clone)]
pub struct OperationService {
    operations: OperationSet,
}

impl OperationService {
    /// Builds the service, resolving its three operations in `scope`.
    pub fn resolve(scope: &ScopeHandle) -> RegistryResult<Self> {
        Ok(Self {
            operations: OperationSet::resolve(scope)?,
        })
    }

    /// The per-request operation this service was built with.
    pub fn transient_operation(&self) -> &Operation {
        &self.operations.transient
    }

    /// The per-scope operation, shared with everything else in the scope.
    pub fn scoped_operation(&self) -> &Operation {
        &self.operations.scoped
    }

    /// The per-process operation.
    pub fn singleton_operation(&self) -> &Operation {
        &self.operations.singleton
    }

    /// Ids of the three operations at this moment.
    pub fn snapshot(&self) -> OperationSnapshot {
        OperationSnapshot {
            transient_id: self.operations.transient.operation_id(),
            scoped_id: self.operations.scoped.operation_id(),
            singleton_id: self.operations.singleton.operation_id(),
            timestamp: Utc::now(),
        }
    }
}

/// Ids held by an [`OperationService`], taken at `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSnapshot {
    pub transient_id: Uuid,
    pub scoped_id: Uuid,
    pub singleton_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

/// One operation id per lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifetimeIds {
    pub transient: Uuid,
    pub scoped: Uuid,
    pub singleton: Uuid,
}

/// Verdicts on whether each lifetime behaved as expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub transient: Verdict,
    pub scoped: Verdict,
    pub singleton: Verdict,
}

/// Outcome of comparing two operations of one lifetime.
///
/// `message` is the human readable line shown in the reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    /// Both operations are the same instance.
    pub same_instance: bool,
    /// Sharing matched the lifetime: distinct for per-request, shared otherwise.
    pub as_expected: bool,
    pub message: String,
}

/// Picks the verdict text for a lifetime and whether it behaved as expected.
type Wording = fn(Lifetime, bool) -> &'static str;

/// Wording for an operation injected directly versus through a service.
fn injection_wording(lifetime: Lifetime, as_expected: bool) -> &'static str {
    match (lifetime, as_expected) {
        (Lifetime::PerRequest, true) => "✅ Different IDs - Each injection gets a new instance",
        (Lifetime::PerScope, true) => "✅ Same IDs - Same instance within this request",
        (Lifetime::PerProcess, true) => "✅ Same IDs - Same instance for entire app lifetime",
        (Lifetime::PerRequest, false) => "❌ Same IDs - This should not happen!",
        (_, false) => "❌ Different IDs - This should not happen!",
    }
}

/// Wording for two resolutions inside one request.
fn resolution_wording(lifetime: Lifetime, as_expected: bool) -> &'static str {
    match (lifetime, as_expected) {
        (Lifetime::PerRequest, true) => "✅ Different (as expected for Transient)",
        (Lifetime::PerScope, true) => "✅ Same (as expected for Scoped)",
        (Lifetime::PerProcess, true) => "✅ Same (as expected for Singleton)",
        (Lifetime::PerRequest, false) => "❌ ERROR: Should be different!",
        (_, false) => "❌ ERROR: Should be same!",
    }
}

impl Verdict {
    fn compare(lifetime: Lifetime, first: &Operation, second: &Operation, wording: Wording) -> Self {
        let same_instance = first.operation_id() == second.operation_id();
        let expected_same = lifetime != Lifetime::PerRequest;
        let as_expected = same_instance == expected_same;

        Self {
            same_instance,
            as_expected,
            message: wording(lifetime, as_expected).to_string(),
        }
    }
}

impl Analysis {
    fn compare(first: &OperationSet, second: &OperationSet, wording: Wording) -> Self {
        Self {
            transient: Verdict::compare(
                Lifetime::PerRequest,
                &first.transient,
                &second.transient,
                wording,
            ),
            scoped: Verdict::compare(Lifetime::PerScope, &first.scoped, &second.scoped, wording),
            singleton: Verdict::compare(
                Lifetime::PerProcess,
                &first.singleton,
                &second.singleton,
                wording,
            ),
        }
    }

    /// Whether every lifetime behaved as expected.
    pub fn all_expected(&self) -> bool {
        self.transient.as_expected && self.scoped.as_expected && self.singleton.as_expected
    }
}

/// Fixed description of each lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifetimeSummary {
    pub transient: &'static str,
    pub scoped: &'static str,
    pub singleton: &'static str,
}

impl Default for LifetimeSummary {
    fn default() -> Self {
        Self {
            transient: "New instance every time it's requested",
            scoped: "Same instance within a single HTTP request",
            singleton: "Same instance for entire application lifetime",
        }
    }
}

/// Operations resolved directly versus through [`OperationService`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub title: &'static str,
    pub description: &'static str,
    pub from_handler: LifetimeIds,
    pub from_service: LifetimeIds,
    pub analysis: Analysis,
    pub summary: LifetimeSummary,
    pub timestamp: String,
}

impl ComparisonReport {
    /// Resolves the operations directly and through an [`OperationService`]
    /// in `scope`, then compares them.
    pub fn build(scope: &ScopeHandle) -> RegistryResult<Self> {
        let direct = OperationSet::resolve(scope)?;
        let service = OperationService::resolve(scope)?;

        Ok(Self {
            title: "Dependency Injection Lifetime Comparison",
            description: "Compare the IDs below. Notice how they differ based on lifetime:",
            from_handler: direct.ids(),
            from_service: service.operations.ids(),
            analysis: Analysis::compare(&direct, &service.operations, injection_wording),
            summary: LifetimeSummary::default(),
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string(),
        })
    }
}

/// One operation in the simple report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationView {
    pub short_id: String,
    pub full_id: Uuid,
    pub instance_number: u64,
    pub behavior: &'static str,
}

impl OperationView {
    fn new(operation: &Operation, behavior: &'static str) -> Self {
        Self {
            short_id: operation.short_id(),
            full_id: operation.operation_id(),
            instance_number: operation.instance_number(),
            behavior,
        }
    }
}

/// The three operations of a simple report, keyed by lifetime.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationViews {
    pub transient: OperationView,
    pub scoped: OperationView,
    pub singleton: OperationView,
}

/// Current operation ids, meant to be fetched repeatedly.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleReport {
    pub instructions: &'static str,
    pub operations: OperationViews,
    pub request_time: String,
}

impl SimpleReport {
    /// Resolves one operation per lifetime in `scope`.
    pub fn build(scope: &ScopeHandle) -> RegistryResult<Self> {
        let set = OperationSet::resolve(scope)?;

        Ok(Self {
            instructions: "🔄 Call this endpoint multiple times to observe lifetime behavior",
            operations: OperationViews {
                transient: OperationView::new(&set.transient, "Changes every call"),
                scoped: OperationView::new(&set.scoped, "Changes per request"),
                singleton: OperationView::new(&set.singleton, "Never changes"),
            },
            request_time: Utc::now().format("%H:%M:%S%.3f").to_string(),
        })
    }
}

/// Two resolutions of every operation inside one scope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipleReport {
    pub description: &'static str,
    pub first_resolution: LifetimeIds,
    pub second_resolution: LifetimeIds,
    pub analysis: Analysis,
    pub summary: &'static str,
}

impl MultipleReport {
    /// Resolves every operation twice in `scope` and compares the pairs.
    pub fn build(scope: &ScopeHandle) -> RegistryResult<Self> {
        let first = OperationSet::resolve(scope)?;
        let second = OperationSet::resolve(scope)?;

        Ok(Self {
            description: "Multiple resolutions within the same request",
            first_resolution: first.ids(),
            second_resolution: second.ids(),
            analysis: Analysis::compare(&first, &second, resolution_wording),
            summary: "Within a single request: Transient creates new instances, Scoped reuses \
                      the same instance, Singleton always uses the global instance",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LifetimeRegistry, RegistrationsExt};

    fn registry() -> LifetimeRegistry {
        let mut registrations = Registrations::new();
        registrations.add_module(OperationsModule);
        registrations.build()
    }

    #[test]
    fn test_operation_service_shares_scoped_and_singleton() {
        let registry = registry();
        let scope = registry.begin_scope();
        let direct = OperationSet::resolve(&scope).unwrap();
        let service = OperationService::resolve(&scope).unwrap();

        assert_ne!(direct.transient, *service.transient_operation());
        assert_eq!(direct.scoped, *service.scoped_operation());
        assert_eq!(direct.singleton, *service.singleton_operation());

        let snapshot = service.snapshot();
        assert_eq!(snapshot.scoped_id, direct.scoped.operation_id());
    }

    #[test]
    fn test_operation_labels() {
        let registry = registry();
        let scope = registry.begin_scope();
        let set = OperationSet::resolve(&scope).unwrap();

        assert_eq!(set.transient.lifetime_type(), "Transient");
        assert_eq!(set.scoped.lifetime_type(), "Scoped");
        assert_eq!(set.singleton.lifetime_type(), "Singleton");
        assert!(set
            .singleton
            .perform_operation()
            .contains(&set.singleton.operation_id().to_string()));
    }

    #[test]
    fn test_reports_analysis_all_expected() {
        let registry = registry();
        let scope = registry.begin_scope();

        let comparison = ComparisonReport::build(&scope).unwrap();
        assert!(comparison.analysis.all_expected());
        assert!(!comparison.analysis.transient.same_instance);
        assert_eq!(comparison.from_handler.scoped, comparison.from_service.scoped);

        let multiple = MultipleReport::build(&scope).unwrap();
        assert!(multiple.analysis.all_expected());
        assert_eq!(multiple.first_resolution.scoped, comparison.from_handler.scoped);
    }

    #[test]
    fn test_simple_report_short_ids() {
        let registry = registry();
        let first = SimpleReport::build(&registry.begin_scope()).unwrap();
        let second = SimpleReport::build(&registry.begin_scope()).unwrap();

        assert_eq!(first.operations.singleton.full_id, second.operations.singleton.full_id);
        assert_ne!(first.operations.scoped.full_id, second.operations.scoped.full_id);
        assert_eq!(first.operations.transient.short_id.len(), 8);
    }

    #[test]
    fn test_verdict_flags_unexpected_reuse() {
        let registry = registry();
        let scope = registry.begin_scope();
        let op: Operation = scope.resolve(&OPERATION_TRANSIENT).unwrap().into();

        let verdict = Verdict::compare(Lifetime::PerRequest, &op, &op, resolution_wording);
        assert!(verdict.same_instance);
        assert!(!verdict.as_expected);
        assert_eq!(verdict.message, "❌ ERROR: Should be different!");
    }

    #[test]
    fn test_report_text_matches_demo_wording() {
        let registry = registry();
        let scope = registry.begin_scope();

        let report = ComparisonReport::build(&scope).unwrap();
        assert_eq!(
            report.analysis.transient.message,
            "✅ Different IDs - Each injection gets a new instance"
        );
        assert_eq!(
            report.analysis.singleton.message,
            "✅ Same IDs - Same instance for entire app lifetime"
        );
        // e.g. "2026-10-18 09:15:02.123 UTC"
        assert_eq!(report.timestamp.len(), 27);
        assert!(report.timestamp.ends_with(" UTC"));
        assert_eq!(&report.timestamp[10..11], " ");

        let multiple = MultipleReport::build(&scope).unwrap();
        assert_eq!(multiple.analysis.scoped.message, "✅ Same (as expected for Scoped)");
    }
}
