//! Read-only views assembled from a store.

use crate::detail::{slot_details, ApplicantDetail, PerformanceDetail, PreferenceRow, SlotDetail};
use crate::error::CoreError;
use crate::performance::{EditPerformance, Performance, PerformanceOption};
use crate::rundown::{
    find_duplicate_performance_references, DuplicateReference, EditRundownSlot, RundownSlot,
};
use crate::schedule::{timed_rundown, TimedSlot};
use crate::stage::{stage_requirement_view, StageRequirementRow};
use crate::store::RecordStore;

/// All slots of a rundown in rundown order.
pub async fn rundown_slots<S>(store: &S) -> Result<Vec<RundownSlot>, CoreError>
where
    S: RecordStore<RundownSlot, EditRundownSlot>,
{
    let mut slots = store.fetch_all().await?;
    slots.sort_by_key(|s| (s.order, s.id));
    Ok(slots)
}

pub async fn load_timed_rundown<S>(store: &S) -> Result<Vec<TimedSlot>, CoreError>
where
    S: RecordStore<RundownSlot, EditRundownSlot>,
{
    Ok(timed_rundown(rundown_slots(store).await?))
}

pub async fn load_stage_requirements<S>(store: &S) -> Result<Vec<StageRequirementRow>, CoreError>
where
    S: RecordStore<RundownSlot, EditRundownSlot>,
{
    Ok(stage_requirement_view(rundown_slots(store).await?))
}

pub async fn load_duplicate_references<S>(store: &S) -> Result<Vec<DuplicateReference>, CoreError>
where
    S: RecordStore<RundownSlot, EditRundownSlot>,
{
    let slots = store.fetch_all().await?;
    Ok(find_duplicate_performance_references(&slots))
}

/// Dropdown entries for choosing a slot's performance.
pub async fn load_performance_options<S>(store: &S) -> Result<Vec<PerformanceOption>, CoreError>
where
    S: RecordStore<Performance, EditPerformance>,
{
    let performances = store.fetch_all().await?;
    Ok(performances.iter().map(PerformanceOption::from).collect())
}

/// Availability of every applicant, by performance id.
pub async fn load_preference_view<S>(store: &S) -> Result<Vec<PreferenceRow>, CoreError>
where
    S: RecordStore<Performance, EditPerformance>,
{
    let mut performances = store.fetch_all().await?;
    performances.sort_by_key(|p| p.id);
    Ok(performances.iter().map(PreferenceRow::from).collect())
}

/// Applicant contact details for each slot of a rundown.
pub async fn load_applicant_view<S, P>(
    rundown: &S,
    performances: &P,
) -> Result<Vec<SlotDetail<ApplicantDetail>>, CoreError>
where
    S: RecordStore<RundownSlot, EditRundownSlot>,
    P: RecordStore<Performance, EditPerformance>,
{
    load_slot_details(rundown, performances).await
}

/// Programme notes for each slot of a rundown.
pub async fn load_performance_detail_view<S, P>(
    rundown: &S,
    performances: &P,
) -> Result<Vec<SlotDetail<PerformanceDetail>>, CoreError>
where
    S: RecordStore<RundownSlot, EditRundownSlot>,
    P: RecordStore<Performance, EditPerformance>,
{
    load_slot_details(rundown, performances).await
}

async fn load_slot_details<S, P, T>(
    rundown: &S,
    performances: &P,
) -> Result<Vec<SlotDetail<T>>, CoreError>
where
    S: RecordStore<RundownSlot, EditRundownSlot>,
    P: RecordStore<Performance, EditPerformance>,
    T: for<'a> From<&'a Performance>,
{
    let slots = rundown_slots(rundown).await?;
    let performances = performances.fetch_all().await?;
    Ok(slot_details(&slots, &performances))
}
