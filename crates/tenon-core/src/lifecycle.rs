//! The quotation lifecycle state machine.
//!
//! Transitions are planned as pure data and executed atomically:
//! each `plan_*` function validates against the current [`MaterialList`]
//! and returns a [`Transition`] effect; [`MaterialListStore::apply`] is
//! contractually a single transaction over the status write, the current
//! rows, and the snapshot write, guarded by an `updated_at` compare-and-swap
//! so concurrent actors get [`LifecycleError::Conflict`] instead of a silent
//! overwrite.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::compare::{CompareRow, build_comparison_rows, flatten_snapshot};
use crate::error::LifecycleError;
use crate::model::{MaterialList, QuotationType, Snapshot, SnapshotKind, Status};
use crate::validate::validate_line_items;

/// The planned effect of one lifecycle transition.
///
/// Everything in here is applied in one store transaction or not at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub material_list_id: i64,
    /// Optimistic-concurrency token: the `updated_at` the planner read.
    /// The store rejects the transition if the persisted row has moved on.
    pub expected_updated_at: DateTime<Utc>,
    /// Wall-clock instant stamped onto `updated_at` (and snapshots).
    pub now: DateTime<Utc>,
    pub new_status: Option<Status>,
    pub quotation_type: Option<QuotationType>,
    pub submitted_at: Option<DateTime<Utc>>,
    /// Replace the current projects/line items wholesale.
    pub replace_current: Option<Snapshot>,
    /// Capture (or overwrite) one snapshot.
    pub write_snapshot: Option<(SnapshotKind, Snapshot)>,
}

impl Transition {
    fn unchanged(list: &MaterialList, now: DateTime<Utc>) -> Self {
        Self {
            material_list_id: list.id,
            expected_updated_at: list.updated_at,
            now,
            new_status: None,
            quotation_type: None,
            submitted_at: None,
            replace_current: None,
            write_snapshot: None,
        }
    }
}

/// Persistence boundary for material lists, their current rows, and their
/// two snapshots.
///
/// `apply` MUST execute the whole [`Transition`] atomically and MUST fail
/// with [`LifecycleError::Conflict`] when the persisted `updated_at` no
/// longer equals `expected_updated_at`.
pub trait MaterialListStore {
    fn get_by_order(&self, order_number: &str) -> Result<Option<MaterialList>, LifecycleError>;

    fn create(
        &mut self,
        order_number: &str,
        created_by: &str,
        now: DateTime<Utc>,
    ) -> Result<MaterialList, LifecycleError>;

    /// Current projects and line items, in snapshot shape.
    fn load_current(&self, material_list_id: i64) -> Result<Snapshot, LifecycleError>;

    fn load_snapshot(
        &self,
        material_list_id: i64,
        kind: SnapshotKind,
    ) -> Result<Option<Snapshot>, LifecycleError>;

    fn apply(&mut self, transition: &Transition) -> Result<MaterialList, LifecycleError>;
}

/// Plan a `save`: replace the current rows; a fresh list moves to
/// `in_progress`, an in-flight revision stays in `revision`.
///
/// # Errors
///
/// [`LifecycleError::InvalidTransition`] when the list is not editable
/// (`submitted` is read-only for the designer, `completed` is terminal).
pub fn plan_save(
    list: &MaterialList,
    state: Snapshot,
    now: DateTime<Utc>,
) -> Result<Transition, LifecycleError> {
    if !list.status.is_editable() {
        return Err(LifecycleError::InvalidTransition {
            from: list.status,
            to: Status::InProgress,
        });
    }
    let new_status = (list.status == Status::NotStarted).then_some(Status::InProgress);
    Ok(Transition {
        new_status,
        replace_current: Some(state),
        ..Transition::unchanged(list, now)
    })
}

/// Plan a `submit`: validate, persist the current state, and capture it as
/// the `submitted` snapshot (overwriting any prior one). `submitted_at` is
/// stamped on the first submit only.
///
/// # Errors
///
/// [`LifecycleError::Validation`] for incomplete line items,
/// [`LifecycleError::InvalidTransition`] unless the list is `in_progress`
/// or `revision`.
pub fn plan_submit(
    list: &MaterialList,
    state: Snapshot,
    now: DateTime<Utc>,
) -> Result<Transition, LifecycleError> {
    validate_line_items(&state.categories)?;
    list.status
        .can_transition_to(Status::Submitted)
        .map_err(|e| LifecycleError::InvalidTransition {
            from: e.from,
            to: e.to,
        })?;
    Ok(Transition {
        new_status: Some(Status::Submitted),
        submitted_at: list.submitted_at.is_none().then_some(now),
        replace_current: Some(state.clone()),
        write_snapshot: Some((SnapshotKind::Submitted, state)),
        ..Transition::unchanged(list, now)
    })
}

/// Plan a `revise` (clerk pulls a submitted quotation back): capture the
/// *current* state as the `revision` snapshot — the baseline just before the
/// clerk's edits — and open the list for editing again.
///
/// # Errors
///
/// [`LifecycleError::MissingSnapshot`] when the list was never submitted,
/// [`LifecycleError::InvalidTransition`] unless the list is `submitted`.
pub fn plan_revise(
    list: &MaterialList,
    current: Snapshot,
    has_submitted_snapshot: bool,
    now: DateTime<Utc>,
) -> Result<Transition, LifecycleError> {
    if !has_submitted_snapshot {
        return Err(LifecycleError::MissingSnapshot(SnapshotKind::Submitted));
    }
    list.status
        .can_transition_to(Status::Revision)
        .map_err(|e| LifecycleError::InvalidTransition {
            from: e.from,
            to: e.to,
        })?;
    Ok(Transition {
        new_status: Some(Status::Revision),
        write_snapshot: Some((SnapshotKind::Revision, current)),
        ..Transition::unchanged(list, now)
    })
}

/// Plan a `complete`: persist the current state and close the quotation.
///
/// # Errors
///
/// [`LifecycleError::MissingSnapshot`] when the list was never submitted,
/// [`LifecycleError::InvalidTransition`] unless the list is `submitted`.
pub fn plan_complete(
    list: &MaterialList,
    state: Snapshot,
    has_submitted_snapshot: bool,
    now: DateTime<Utc>,
) -> Result<Transition, LifecycleError> {
    if !has_submitted_snapshot {
        return Err(LifecycleError::MissingSnapshot(SnapshotKind::Submitted));
    }
    list.status
        .can_transition_to(Status::Completed)
        .map_err(|e| LifecycleError::InvalidTransition {
            from: e.from,
            to: e.to,
        })?;
    Ok(Transition {
        new_status: Some(Status::Completed),
        replace_current: Some(state),
        ..Transition::unchanged(list, now)
    })
}

/// Plan a `quote`: the clerk fixes the quotation type and fills unit prices
/// from the catalog while the list sits in `submitted`.
///
/// # Errors
///
/// [`LifecycleError::Validation`] when the list is not in `submitted`.
pub fn plan_quote(
    list: &MaterialList,
    mut state: Snapshot,
    catalog: &Catalog,
    quotation_type: QuotationType,
    now: DateTime<Utc>,
) -> Result<Transition, LifecycleError> {
    if list.status != Status::Submitted {
        return Err(LifecycleError::Validation(format!(
            "prices can only be quoted while submitted (status is {})",
            list.status
        )));
    }
    apply_quotation_prices(&mut state, catalog, quotation_type);
    Ok(Transition {
        quotation_type: Some(quotation_type),
        replace_current: Some(state),
        ..Transition::unchanged(list, now)
    })
}

/// Fill `unit_price`/`total_price` on every line item from the catalog's
/// price column for `quotation_type`. Items without a priced material quote
/// at zero, as the source system did.
pub fn apply_quotation_prices(
    state: &mut Snapshot,
    catalog: &Catalog,
    quotation_type: QuotationType,
) {
    for item in &mut state.categories {
        let unit_price = item
            .material_id
            .and_then(|id| catalog.unit_price(id, quotation_type))
            .unwrap_or(0.0);
        item.unit_price = Some(unit_price);
        item.recompute_total();
    }
}

/// The lifecycle engine: plans transitions against a store and applies them.
pub struct Lifecycle<S> {
    store: S,
}

impl<S: MaterialListStore> Lifecycle<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Persist the designer's current state, creating the material list on
    /// first save.
    ///
    /// # Errors
    ///
    /// See [`plan_save`]; store failures pass through.
    pub fn save(
        &mut self,
        order_number: &str,
        created_by: &str,
        state: Snapshot,
        now: DateTime<Utc>,
    ) -> Result<MaterialList, LifecycleError> {
        let list = match self.store.get_by_order(order_number)? {
            Some(list) => list,
            None => {
                info!(order_number, "creating material list on first save");
                self.store.create(order_number, created_by, now)?
            }
        };
        let transition = plan_save(&list, state, now)?;
        debug!(order_number, status = %list.status, "saving material list");
        self.store.apply(&transition)
    }

    /// Submit the persisted current state for approval.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotFound`] for an unknown order; see [`plan_submit`].
    pub fn submit(
        &mut self,
        order_number: &str,
        now: DateTime<Utc>,
    ) -> Result<MaterialList, LifecycleError> {
        let list = self.require(order_number)?;
        let state = self.store.load_current(list.id)?;
        let transition = plan_submit(&list, state, now)?;
        info!(order_number, "submitting material list");
        self.store.apply(&transition)
    }

    /// Pull a submitted quotation back for revision.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotFound`] for an unknown order; see [`plan_revise`].
    pub fn revise(
        &mut self,
        order_number: &str,
        now: DateTime<Utc>,
    ) -> Result<MaterialList, LifecycleError> {
        let list = self.require(order_number)?;
        let has_submitted = self
            .store
            .load_snapshot(list.id, SnapshotKind::Submitted)?
            .is_some();
        let current = self.store.load_current(list.id)?;
        let transition = plan_revise(&list, current, has_submitted, now)?;
        info!(order_number, "opening material list for revision");
        self.store.apply(&transition)
    }

    /// Close the quotation.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotFound`] for an unknown order; see
    /// [`plan_complete`].
    pub fn complete(
        &mut self,
        order_number: &str,
        now: DateTime<Utc>,
    ) -> Result<MaterialList, LifecycleError> {
        let list = self.require(order_number)?;
        let has_submitted = self
            .store
            .load_snapshot(list.id, SnapshotKind::Submitted)?
            .is_some();
        let state = self.store.load_current(list.id)?;
        let transition = plan_complete(&list, state, has_submitted, now)?;
        info!(order_number, "completing material list");
        self.store.apply(&transition)
    }

    /// Quote prices on a submitted list.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotFound`] for an unknown order; see [`plan_quote`].
    pub fn quote(
        &mut self,
        order_number: &str,
        catalog: &Catalog,
        quotation_type: QuotationType,
        now: DateTime<Utc>,
    ) -> Result<MaterialList, LifecycleError> {
        let list = self.require(order_number)?;
        let state = self.store.load_current(list.id)?;
        let transition = plan_quote(&list, state, catalog, quotation_type, now)?;
        info!(order_number, %quotation_type, "quoting material list");
        self.store.apply(&transition)
    }

    /// Build the three-way comparison for a material list: current state
    /// against its `submitted` and `revision` snapshots.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotFound`] for an unknown order; store failures
    /// pass through. Absent snapshots are not errors.
    pub fn comparison(&self, order_number: &str) -> Result<Vec<CompareRow>, LifecycleError> {
        let list = self.require(order_number)?;
        let current = self.store.load_current(list.id)?;
        let submitted = self.store.load_snapshot(list.id, SnapshotKind::Submitted)?;
        let revision = self.store.load_snapshot(list.id, SnapshotKind::Revision)?;
        let current_rows = flatten_snapshot(&current);
        Ok(build_comparison_rows(
            &current_rows,
            submitted.as_ref(),
            revision.as_ref(),
        ))
    }

    fn require(&self, order_number: &str) -> Result<MaterialList, LifecycleError> {
        self.store
            .get_by_order(order_number)?
            .ok_or_else(|| LifecycleError::NotFound(order_number.to_string()))
    }
}
