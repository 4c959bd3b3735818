//! Client-side search over the fetched snapshot.

use crate::models::Client;

/// Whether `client` matches the search `term`.
///
/// The id matches on its decimal digits; name and email match
/// case-insensitively. An empty term matches everything.
pub fn matches(client: &Client, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    client.id.to_string().contains(term)
        || client.name.to_lowercase().contains(&needle)
        || client.email.to_lowercase().contains(&needle)
}

/// The records of `snapshot` matching `term`, in snapshot order.
pub fn filter_clients(snapshot: &[Client], term: &str) -> Vec<Client> {
    snapshot
        .iter()
        .filter(|c| matches(c, term))
        .cloned()
        .collect()
}
