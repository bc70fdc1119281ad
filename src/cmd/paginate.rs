//! `--all` driver: sequential offset/limit fetches until a short page.

use serde_json::{Map, Value};

use super::catalog::{OperationDescriptor, Paging};
use crate::api::envelope::kind_of;
use crate::api::{PageInfo, ResultEnvelope, Transport};
use crate::config::ResolvedConfig;
use crate::error::CliError;

/// Page size used for single pages without `--limit` and for every `--all` page.
pub const DEFAULT_PAGE_SIZE: u64 = 25;

/// Upper bound on pages fetched by one `--all` request.
pub const DEFAULT_MAX_PAGES: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: u64,
    max_pages: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Paginator {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl Paginator {
    pub fn new(page_size: u64, max_pages: usize) -> Self {
        Paginator {
            page_size: page_size.max(1),
            max_pages: max_pages.max(1),
        }
    }

    /// Fetch every page of `op` and concatenate their `data`.
    ///
    /// The first failing page aborts the whole fetch; the error carries the
    /// page index. Nothing is returned for partial results.
    pub fn fetch_all<T: Transport + ?Sized>(
        &self,
        transport: &T,
        config: &ResolvedConfig,
        op: &OperationDescriptor,
        params: &Map<String, Value>,
    ) -> Result<ResultEnvelope, CliError> {
        let mut collected = Collected::new(op)?;
        tracing::debug!(
            operation = %op,
            page_size = self.page_size,
            max_pages = self.max_pages,
            "fetching all pages"
        );

        for page in 0..self.max_pages {
            let offset = page as u64 * self.page_size;
            let mut body = params.clone();
            body.insert("limit".to_string(), self.page_size.into());
            body.insert("offset".to_string(), offset.into());

            let envelope = transport
                .call(config, op, &body)
                .map_err(|e| e.on_page(page))?;
            let len = collected
                .absorb(envelope.data())
                .map_err(|e| e.on_page(page))?;
            tracing::debug!(operation = %op, page, offset, items = len, "fetched page");

            if (len as u64) < self.page_size {
                return Ok(collected.finish(self.page_size));
            }
        }

        tracing::warn!(operation = %op, max_pages = self.max_pages, "page ceiling reached");
        Err(CliError::Transport(format!(
            "pagination did not terminate after {} pages",
            self.max_pages
        )))
    }
}

/// Items gathered so far, shaped after the operation's paging style.
enum Collected {
    Items(Vec<Value>),
    Nested {
        key: &'static str,
        data: Map<String, Value>,
        count: usize,
    },
}

impl Collected {
    fn new(op: &OperationDescriptor) -> Result<Self, CliError> {
        match op.paging {
            Paging::None => Err(CliError::Validation(format!(
                "`{op}` is not paginated"
            ))),
            Paging::Offset => Ok(Collected::Items(Vec::new())),
            Paging::Nested(key) => Ok(Collected::Nested {
                key,
                data: Map::new(),
                count: 0,
            }),
        }
    }

    /// Append one page; returns its length.
    fn absorb(&mut self, page: &Value) -> Result<usize, CliError> {
        match self {
            Collected::Items(items) => {
                let Value::Array(rows) = page else {
                    return Err(unexpected_shape(format!(
                        "`data` is {}, expected an array",
                        kind_of(page)
                    )));
                };
                items.extend(rows.iter().cloned());
                Ok(rows.len())
            }
            Collected::Nested { key, data, count } => {
                let Value::Object(fields) = page else {
                    return Err(unexpected_shape(format!(
                        "`data` is {}, expected an object",
                        kind_of(page)
                    )));
                };
                let len = match fields.get(*key) {
                    Some(Value::Array(rows)) => rows.len(),
                    _ => {
                        return Err(unexpected_shape(format!(
                            "`data.{key}` is missing or not an array"
                        )));
                    }
                };
                for (name, value) in fields {
                    match data.get_mut(name) {
                        Some(Value::Array(acc)) => {
                            if let Value::Array(more) = value {
                                acc.extend(more.iter().cloned());
                            }
                        }
                        // Non-array fields keep their first-page value.
                        Some(_) => {}
                        None => {
                            data.insert(name.clone(), value.clone());
                        }
                    }
                }
                *count += len;
                Ok(len)
            }
        }
    }

    fn finish(self, page_size: u64) -> ResultEnvelope {
        let (data, total) = match self {
            Collected::Items(items) => {
                let total = items.len();
                (Value::Array(items), total)
            }
            Collected::Nested { data, count, .. } => (Value::Object(data), count),
        };
        ResultEnvelope::collected(
            data,
            PageInfo {
                limit: Some(page_size),
                offset: Some(0),
                next_path: None,
                total: Some(total as u64),
            },
        )
    }
}

fn unexpected_shape(detail: String) -> CliError {
    CliError::unknown_api(None, format!("unexpected page shape: {detail}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::catalog::Catalog;
    use crate::error::OutcomeCode;
    use serde_json::json;
    use std::cell::RefCell;

    /// Serves `pages` in order, recording the offset of each call.
    struct Pages {
        pages: Vec<Result<Value, u16>>,
        offsets: RefCell<Vec<u64>>,
    }

    impl Pages {
        fn new(pages: Vec<Result<Value, u16>>) -> Self {
            Pages {
                pages,
                offsets: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for Pages {
        fn call(
            &self,
            _config: &ResolvedConfig,
            _op: &OperationDescriptor,
            params: &Map<String, Value>,
        ) -> Result<ResultEnvelope, CliError> {
            let mut offsets = self.offsets.borrow_mut();
            let index = offsets.len();
            offsets.push(params["offset"].as_u64().unwrap());
            match &self.pages[index] {
                Ok(data) => ResultEnvelope::from_value(json!({ "data": data })),
                Err(404) => Err(CliError::NotFound("gone".into())),
                Err(status) => Err(CliError::unknown_api(Some(*status), "boom")),
            }
        }
    }

    fn config() -> ResolvedConfig {
        ResolvedConfig::new("https://wiki.example.com", "k").unwrap()
    }

    fn op(group: &str, name: &str) -> &'static OperationDescriptor {
        Catalog::builtin().lookup(group, name).unwrap()
    }

    #[test]
    fn concatenates_until_short_page() {
        let transport = Pages::new(vec![
            Ok(json!([1, 2])),
            Ok(json!([3, 4])),
            Ok(json!([5])),
        ]);
        let env = Paginator::new(2, 10)
            .fetch_all(&transport, &config(), op("documents", "list"), &Map::new())
            .unwrap();
        assert_eq!(env.data(), &json!([1, 2, 3, 4, 5]));
        assert_eq!(env.pagination().unwrap().total, Some(5));
        assert_eq!(*transport.offsets.borrow(), vec![0, 2, 4]);
    }

    #[test]
    fn empty_page_ends_the_loop() {
        let transport = Pages::new(vec![Ok(json!([1, 2])), Ok(json!([]))]);
        let env = Paginator::new(2, 10)
            .fetch_all(&transport, &config(), op("documents", "list"), &Map::new())
            .unwrap();
        assert_eq!(env.data(), &json!([1, 2]));
    }

    #[test]
    fn nested_pages_merge_parallel_arrays() {
        let transport = Pages::new(vec![
            Ok(json!({"users": [{"id": "u1"}], "memberships": [{"id": "m1"}]})),
            Ok(json!({"users": [], "memberships": []})),
        ]);
        let env = Paginator::new(1, 10)
            .fetch_all(&transport, &config(), op("collections", "memberships"), &Map::new())
            .unwrap();
        assert_eq!(
            env.data(),
            &json!({"users": [{"id": "u1"}], "memberships": [{"id": "m1"}]})
        );
        assert_eq!(env.pagination().unwrap().total, Some(1));
    }

    #[test]
    fn stars_pages_merge_stars_and_documents() {
        let transport = Pages::new(vec![
            Ok(json!({"stars": [{"id": "s1"}, {"id": "s2"}], "documents": [{"id": "d1"}, {"id": "d2"}]})),
            Ok(json!({"stars": [{"id": "s3"}], "documents": [{"id": "d3"}]})),
        ]);
        let env = Paginator::new(2, 10)
            .fetch_all(&transport, &config(), op("stars", "list"), &Map::new())
            .unwrap();
        assert_eq!(env.data()["stars"].as_array().unwrap().len(), 3);
        assert_eq!(env.data()["documents"].as_array().unwrap().len(), 3);
        assert_eq!(env.pagination().unwrap().total, Some(3));
        assert_eq!(*transport.offsets.borrow(), vec![0, 2]);
    }

    #[test]
    fn failing_page_aborts_with_its_index() {
        let transport = Pages::new(vec![Ok(json!([1, 2])), Err(404)]);
        let err = Paginator::new(2, 10)
            .fetch_all(&transport, &config(), op("documents", "list"), &Map::new())
            .unwrap_err();
        assert_eq!(err.outcome(), OutcomeCode::NotFoundError);
        assert_eq!(err.page(), Some(1));
    }

    #[test]
    fn shape_mismatch_is_unknown_api_error() {
        let transport = Pages::new(vec![Ok(json!({"id": "not-a-list"}))]);
        let err = Paginator::new(2, 10)
            .fetch_all(&transport, &config(), op("documents", "list"), &Map::new())
            .unwrap_err();
        assert_eq!(err.outcome(), OutcomeCode::UnknownApiError);
        assert_eq!(err.page(), Some(0));
    }

    #[test]
    fn full_pages_forever_hit_the_ceiling() {
        let transport = Pages::new(vec![Ok(json!([1])); 3]);
        let err = Paginator::new(1, 3)
            .fetch_all(&transport, &config(), op("documents", "list"), &Map::new())
            .unwrap_err();
        assert_eq!(err.outcome(), OutcomeCode::TransportError);
        assert!(err.to_string().contains("did not terminate"), "{err}");
        assert_eq!(transport.offsets.borrow().len(), 3);
    }

    #[test]
    fn refuses_operations_without_paging() {
        let transport = Pages::new(vec![]);
        let err = Paginator::default()
            .fetch_all(&transport, &config(), op("documents", "info"), &Map::new())
            .unwrap_err();
        assert_eq!(err.outcome(), OutcomeCode::ValidationError);
    }
}
