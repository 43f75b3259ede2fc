use crate::domain::models::{ListObjectsParams, ObjectListItem, ObjectListing};

/// Apply prefix, marker, delimiter grouping and limit to items sorted by key.
///
/// Common prefixes count toward the limit like keys do, and the next marker
/// may be either a key or a common prefix.
pub(crate) fn paginate<I>(params: &ListObjectsParams, items: I) -> ObjectListing
where
    I: IntoIterator<Item = ObjectListItem>,
{
    let limit = params.limit.max(1);
    let mut listing = ObjectListing::default();
    let mut last_entry: Option<String> = None;
    let mut taken = 0;

    for item in items {
        let key = item.key.as_str();
        if !params.matches_prefix(key) {
            continue;
        }

        let entry = match params.common_prefix_of(key) {
            Some(prefix) if last_entry.as_deref() == Some(prefix) => continue,
            Some(prefix) => prefix.to_string(),
            None => key.to_string(),
        };
        if !params.is_after_marker(&entry) {
            continue;
        }

        if taken == limit {
            listing.is_truncated = true;
            listing.next_marker = last_entry;
            return listing;
        }

        if entry.as_str() == key {
            listing.objects.push(item);
        } else {
            listing.common_prefixes.push(entry.clone());
        }
        last_entry = Some(entry);
        taken += 1;
    }

    listing
}
