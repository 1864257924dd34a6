use super::operation::{Operation, ParamLocation};
use super::params::{stringify, CallParams};
use super::ApiClientError;

/// Assembles the query string for one call.
///
/// Query parameters are emitted in declaration order under their wire names.
/// Absent optional parameters are omitted entirely (never an empty key);
/// present values — including `0`, `false`, and `""` — are appended and
/// percent-encoded per standard URL query encoding.
///
/// Returns `Ok(None)` when no pair is emitted, so the URL carries no `?`.
pub(in crate::client) fn to_query_string<R>(
    operation: &Operation<R>,
    params: &CallParams,
) -> Result<Option<String>, ApiClientError> {
    let mut pairs = Vec::new();

    for spec in operation.params_in(ParamLocation::Query) {
        if let Some(value) = stringify(spec, params.get(spec.name()))? {
            pairs.push((spec.wire_name(), value));
        }
    }

    if pairs.is_empty() {
        return Ok(None);
    }
    let query = serde_urlencoded::to_string(&pairs)?;
    Ok(Some(query))
}
