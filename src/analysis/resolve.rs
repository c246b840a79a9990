//! Position resolution for abstract values.
//!
//! A value is only reportable when it points at exactly one allocation site.
//! Picking one of several candidate sites would put misleading evidence in a
//! bug report, so ambiguous values are an error rather than a best guess.

use tracing::error;

use crate::error::{AnalysisError, Result};
use crate::position::SourcePosition;
use crate::value::AbstractValue;

/// Resolve a value to its single allocation site.
///
/// # Errors
///
/// * [`AnalysisError::AmbiguousAllocationSite`] if the value does not have
///   exactly one allocation site
/// * [`AnalysisError::MissingAllocationSite`] if the value claims a single
///   site but reports none
pub fn resolve_position<V: AbstractValue>(value: &V) -> Result<SourcePosition> {
    if !value.is_single_allocation_site() {
        return Err(AnalysisError::AmbiguousAllocationSite {
            value: format!("{value:?}"),
            sites: value.allocation_sites().into_iter().collect(),
        });
    }

    match value.allocation_sites().into_iter().next() {
        Some(position) => Ok(position),
        None => {
            error!(
                value = ?value,
                "value lattice reported a single allocation site but returned none"
            );
            Err(AnalysisError::MissingAllocationSite {
                value: format!("{value:?}"),
            })
        }
    }
}

/// Resolve every value, then sort the positions.
///
/// Fails on the first value that cannot be resolved, so callers never see a
/// partially resolved list.
pub fn resolve_sorted<'a, V, I>(values: I) -> Result<Vec<SourcePosition>>
where
    V: AbstractValue + 'a,
    I: IntoIterator<Item = &'a V>,
{
    let mut positions = values
        .into_iter()
        .map(resolve_position)
        .collect::<Result<Vec<_>>>()?;
    positions.sort_unstable();
    Ok(positions)
}
