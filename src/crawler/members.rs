//! Members crawler: one page of a community's member list
//!
//! No pagination happens here. Keeping `count` within 1..=1000 and advancing
//! `offset` between calls is up to the caller.

use crate::config::MembersConfig;
use crate::crawler::client::ApiClient;
use crate::model::schema::MemberPage;
use crate::model::MemberRecord;
use crate::HarvestError;

/// Upstream method listing community members
pub const MEMBERS_METHOD: &str = "groups.getMembers";

/// Builds the call parameters; optional ones are only sent when set
pub fn member_params(request: &MembersConfig) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("group_id", request.group_id.clone()),
        ("count", request.count.to_string()),
        ("offset", request.offset.to_string()),
    ];

    let optional = [
        ("sort", &request.sort),
        ("fields", &request.fields),
        ("filter", &request.filter),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            params.push((name, value.clone()));
        }
    }

    params
}

/// Fetches one page of members
///
/// # Returns
///
/// * `Ok((members, total))` - The page in upstream order and the community's total member count
/// * `Err(HarvestError::Api)` - The response had no `response` key; the raw body is attached
/// * `Err(HarvestError::RequestFailed)` - Transport or decode failure
pub async fn fetch_members(
    client: &ApiClient,
    request: &MembersConfig,
) -> Result<(Vec<MemberRecord>, i64), HarvestError> {
    let params = member_params(request);
    let page: MemberPage = client.call_json(MEMBERS_METHOD, &params).await?;

    tracing::info!(
        "[{}] Fetched {} members ({} total, offset {})",
        request.group_id,
        page.items.len(),
        page.count,
        request.offset
    );

    let members = page.items.into_iter().map(MemberRecord::from).collect();
    Ok((members, page.count))
}
