//! Remote record store: cached XML documents over a pluggable transport.
//!
//! One store instance owns one per-run document cache, keyed by the exact
//! resource string used to fetch (path + query). Cached documents are never
//! invalidated or expired within a run. Every fetch blocks the caller; no
//! two fetches are ever in flight at once and nothing is retried.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::error::{StoreError, TransportError};
use crate::record::{GenericRecord, map_element};
use crate::xml::{Document, Selector};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Port to the remote service.
///
/// Implementations are constructed with the service credentials (account and
/// API key); missing either is a configuration error raised before any
/// network activity.
pub trait Transport {
    /// Fetch raw bytes of a resource.
    fn fetch(&self, resource: &str) -> std::result::Result<Vec<u8>, TransportError>;

    /// Fire a named event on a resource: a state-changing request using a
    /// different verb and an `event` query parameter.
    fn fire(&self, resource: &str, event: &str) -> std::result::Result<Vec<u8>, TransportError>;
}

/// A parsed document held in the per-run cache.
#[derive(Debug)]
pub struct CachedDocument {
    resource: String,
    document: Document,
}

impl CachedDocument {
    /// The exact resource string the document was fetched under.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Queryable view over the parsed document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}

/// Caching, paginating access to remote XML collection resources.
pub struct RemoteStore<T> {
    transport: T,
    cache: HashMap<String, CachedDocument>,
}

impl<T: Transport> RemoteStore<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            cache: HashMap::new(),
        }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The cached document for a resource, fetching and parsing on first use.
    ///
    /// A parse failure is fatal and distinct from a transport failure.
    pub fn document(&mut self, resource: &str) -> Result<&CachedDocument> {
        match self.cache.entry(resource.to_string()) {
            Entry::Occupied(entry) => {
                debug!("cache hit for {}", resource);
                Ok(entry.into_mut())
            }
            Entry::Vacant(slot) => {
                debug!("fetching {}", resource);
                let bytes = self.transport.fetch(resource)?;
                let document = Document::parse(&bytes)?;
                Ok(slot.insert(CachedDocument {
                    resource: resource.to_string(),
                    document,
                }))
            }
        }
    }

    /// Number of elements matching the selector in a resource.
    pub fn count(&mut self, resource: &str, selector: &Selector) -> Result<usize> {
        Ok(self.document(resource)?.document().count(selector))
    }

    /// Elements matching the selector, mapped into generic records.
    pub fn records(&mut self, resource: &str, selector: &Selector) -> Result<Vec<GenericRecord>> {
        let document = self.document(resource)?.document();
        Ok(document
            .select(selector)
            .into_iter()
            .filter_map(map_element)
            .collect())
    }

    /// Collect a paged collection resource into a mapping keyed by id.
    ///
    /// Pages are requested as `{base}?page={n}` starting at 1. The loop stops
    /// at the first page where `probe` matches nothing, even if `filter`
    /// matched nothing on earlier non-empty pages. Both queries run against
    /// the same cached page, so each page is fetched exactly once. A failure
    /// on any page aborts the whole fetch; pages already accumulated are
    /// discarded.
    pub fn collect_paged<F>(
        &mut self,
        base: &str,
        probe: &Selector,
        filter: &Selector,
        id_of: F,
    ) -> Result<BTreeMap<u64, GenericRecord>>
    where
        F: Fn(&GenericRecord) -> Option<u64>,
    {
        let mut collected = BTreeMap::new();
        let mut page = 1u32;
        loop {
            let resource = format!("{base}?page={page}");
            if self.count(&resource, probe)? == 0 {
                debug!("page {} is empty, collection complete", page);
                break;
            }
            for record in self.records(&resource, filter)? {
                match id_of(&record) {
                    Some(id) => {
                        collected.insert(id, record);
                    }
                    None => warn!("skipping record without usable id on {}", resource),
                }
            }
            page += 1;
        }
        Ok(collected)
    }

    /// Fire a named event through the transport. Bypasses the cache.
    pub fn fire(
        &self,
        resource: &str,
        event: &str,
    ) -> std::result::Result<Vec<u8>, TransportError> {
        self.transport.fire(resource, event)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    pub(crate) struct MockTransport {
        pages: HashMap<String, String>,
        pub(crate) fetches: RefCell<Vec<String>>,
        pub(crate) fired: RefCell<Vec<(String, String)>>,
        pub(crate) fire_response: Vec<u8>,
    }

    impl MockTransport {
        pub(crate) fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                fetches: RefCell::new(Vec::new()),
                fired: RefCell::new(Vec::new()),
                fire_response: b"<status>ok</status>".to_vec(),
            }
        }
    }

    impl Transport for MockTransport {
        fn fetch(&self, resource: &str) -> std::result::Result<Vec<u8>, TransportError> {
            self.fetches.borrow_mut().push(resource.to_string());
            self.pages
                .get(resource)
                .map(|xml| xml.as_bytes().to_vec())
                .ok_or_else(|| TransportError::Http(format!("unexpected resource {resource}")))
        }

        fn fire(
            &self,
            resource: &str,
            event: &str,
        ) -> std::result::Result<Vec<u8>, TransportError> {
            self.fired
                .borrow_mut()
                .push((resource.to_string(), event.to_string()));
            Ok(self.fire_response.clone())
        }
    }

    fn invoice(id: u32, status: &str) -> String {
        format!("<invoice><id>{id}</id><status>{status}</status></invoice>")
    }

    #[test]
    fn test_collect_paged_terminates_and_fetches_each_page_once() {
        let transport = MockTransport::new(&[
            (
                "invoices.xml?page=1",
                &format!("<invoices>{}{}</invoices>", invoice(1, "open"), invoice(2, "open")),
            ),
            (
                "invoices.xml?page=2",
                &format!("<invoices>{}</invoices>", invoice(3, "open")),
            ),
            ("invoices.xml?page=3", "<invoices></invoices>"),
        ]);
        let mut store = RemoteStore::new(transport);

        let probe = Selector::element("invoice");
        let filter = Selector::element("invoice").child_not_equals("status", "paid");
        let collected = store
            .collect_paged("invoices.xml", &probe, &filter, |record| {
                record.field_str("id").and_then(|id| id.parse().ok())
            })
            .unwrap();

        assert_eq!(collected.keys().copied().collect::<Vec<u64>>(), vec![1, 2, 3]);
        assert_eq!(store.transport().fetches.borrow().len(), 3);
    }

    #[test]
    fn test_probe_and_filter_disagree() {
        // Page 1 is non-empty but fully paid; pagination must continue past it.
        let transport = MockTransport::new(&[
            (
                "invoices.xml?page=1",
                &format!("<invoices>{}</invoices>", invoice(1, "paid")),
            ),
            (
                "invoices.xml?page=2",
                &format!("<invoices>{}</invoices>", invoice(2, "open")),
            ),
            ("invoices.xml?page=3", "<invoices></invoices>"),
        ]);
        let mut store = RemoteStore::new(transport);

        let probe = Selector::element("invoice");
        let filter = Selector::element("invoice").child_not_equals("status", "paid");
        let collected = store
            .collect_paged("invoices.xml", &probe, &filter, |record| {
                record.field_str("id").and_then(|id| id.parse().ok())
            })
            .unwrap();

        assert_eq!(collected.keys().copied().collect::<Vec<u64>>(), vec![2]);
    }

    #[test]
    fn test_cache_serves_repeated_queries_from_one_fetch() {
        let transport = MockTransport::new(&[(
            "invoices.xml?page=1",
            &format!("<invoices>{}</invoices>", invoice(1, "open")),
        )]);
        let mut store = RemoteStore::new(transport);

        let all = Selector::element("invoice");
        let open = Selector::element("invoice").child_equals("status", "open");
        assert_eq!(
            store.document("invoices.xml?page=1").unwrap().resource(),
            "invoices.xml?page=1"
        );
        assert_eq!(store.count("invoices.xml?page=1", &all).unwrap(), 1);
        assert_eq!(store.count("invoices.xml?page=1", &open).unwrap(), 1);
        assert_eq!(store.records("invoices.xml?page=1", &all).unwrap().len(), 1);

        assert_eq!(store.transport().fetches.borrow().len(), 1);
    }

    #[test]
    fn test_transport_failure_aborts_collection() {
        // Page 2 is missing from the mock, so the fetch fails mid-collection.
        let transport = MockTransport::new(&[(
            "invoices.xml?page=1",
            &format!("<invoices>{}</invoices>", invoice(1, "open")),
        )]);
        let mut store = RemoteStore::new(transport);

        let probe = Selector::element("invoice");
        let result = store.collect_paged("invoices.xml", &probe, &probe, |record| {
            record.field_str("id").and_then(|id| id.parse().ok())
        });
        assert!(matches!(result, Err(StoreError::Transport(_))));
    }

    #[test]
    fn test_malformed_page_is_an_xml_error() {
        let transport = MockTransport::new(&[("invoices.xml?page=1", "<invoices><oops")]);
        let mut store = RemoteStore::new(transport);

        let probe = Selector::element("invoice");
        let result = store.count("invoices.xml?page=1", &probe);
        assert!(matches!(result, Err(StoreError::Xml(_))));
    }
}
