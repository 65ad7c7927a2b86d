use serde_json::Value;
use tracing::debug;

use crate::client::CatalogClient;
use crate::error::CatalogError;

/// Maximum page size accepted by the playlist tracks endpoint
pub const PAGE_SIZE: u32 = 100;

/// Fetch every entry of a playlist, one page at a time.
///
/// Stops at the first page shorter than `page_size`, which includes the empty
/// page that follows a playlist whose length is an exact multiple of it.
pub fn collect_tracks<C: CatalogClient + ?Sized>(
    client: &C,
    playlist_id: &str,
    page_size: u32,
) -> Result<Vec<Value>, CatalogError> {
    let page_size = page_size.max(1);
    let mut offset = 0;
    let mut entries = Vec::new();

    loop {
        let page = client.get_playlist_tracks(playlist_id, offset, page_size)?;
        let received = page.items.len();
        debug!("Fetched {received} entries at offset {offset}");
        entries.extend(page.items);

        if received < page_size as usize {
            break;
        }
        offset += page_size;
    }

    Ok(entries)
}
