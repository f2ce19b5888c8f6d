use crate::client::{Client, Collection, PaginationStrategy, Record};
use crate::deserializer::Deserializer;
use crate::error::ClientError;
use crate::model::Model;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default)]
struct Pagination {
    number: Option<u64>,
    size: Option<u64>,
    limit: Option<u64>,
    offset: Option<u64>,
}

/// A chainable query over one client.
///
/// Builder calls are infallible; pagination calls that contradict the
/// configured strategy surface as a [`ClientError::Pagination`] when the
/// request parameters are built.
pub struct Scope<'a> {
    client: &'a Client,
    filter: Vec<(String, String)>,
    sort: Vec<(String, SortDirection)>,
    params: Vec<(String, String)>,
    fields: Vec<(String, Vec<String>)>,
    includes: Vec<String>,
    pagination: Pagination,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Scope {
            client,
            filter: Vec::new(),
            sort: Vec::new(),
            params: Vec::new(),
            fields: Vec::new(),
            includes: Vec::new(),
            pagination: Pagination::default(),
        }
    }

    /// Filter by an attribute: `filter[attribute]=value`.
    pub fn filter(mut self, attribute: impl Into<String>, value: impl ToString) -> Self {
        self.filter.push((attribute.into(), value.to_string()));
        self
    }

    /// Order by an attribute; descending renders as `-attribute`.
    pub fn order(mut self, attribute: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.push((attribute.into(), direction));
        self
    }

    /// Side-load relationships: `include=a,b.c`.
    pub fn includes(mut self, relationships: &[&str]) -> Self {
        self.includes
            .extend(relationships.iter().map(|r| r.to_string()));
        self
    }

    /// Sparse fieldset for a type: `fields[type]=a,b`.
    pub fn select(mut self, resource_type: impl Into<String>, fields: &[&str]) -> Self {
        self.fields.push((
            resource_type.into(),
            fields.iter().map(|f| f.to_string()).collect(),
        ));
        self
    }

    /// An arbitrary extra request parameter.
    pub fn extra_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Page number (page-based pagination).
    pub fn page(mut self, number: u64) -> Self {
        self.pagination.number = Some(number);
        self
    }

    /// Items per page (page-based pagination).
    pub fn per(mut self, size: u64) -> Self {
        self.pagination.size = Some(size);
        self
    }

    /// Maximum number of items (offset-based pagination).
    pub fn limit(mut self, limit: u64) -> Self {
        self.pagination.limit = Some(limit);
        self
    }

    /// Number of items to skip (offset-based pagination).
    pub fn offset(mut self, offset: u64) -> Self {
        self.pagination.offset = Some(offset);
        self
    }

    // ------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------

    pub async fn all<T: Model + 'static>(self) -> Result<Collection<T>, ClientError> {
        let url = self.client.collection_url::<T>()?;
        let document = self
            .client
            .request_document(&url, &self.query_parameters()?)
            .await?;

        // One deserialization pass for the whole response: records sharing
        // references share instances.
        let mut deserializer = Deserializer::new(self.client.registry());
        let mut data = Vec::new();
        for datum in document.collection() {
            data.push(T::from_record(
                deserializer.deserialize(datum, &document.included)?,
            ));
        }

        Ok(Collection {
            data,
            meta: document.meta.clone(),
            raw: document,
        })
    }

    pub async fn find<T: Model + 'static>(self, id: &str) -> Result<Record<T>, ClientError> {
        let url = self.client.record_url::<T>(id)?;
        let document = self
            .client
            .request_document(&url, &self.query_parameters()?)
            .await?;
        Self::single_record(self.client, document)
    }

    /// Like [`find`](Scope::find), but a 404 response becomes `None`.
    pub async fn find_optional<T: Model + 'static>(
        self,
        id: &str,
    ) -> Result<Option<Record<T>>, ClientError> {
        match self.find(id).await {
            Ok(record) => Ok(Some(record)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn first<T: Model + 'static>(self) -> Result<Record<T>, ClientError> {
        let url = self.client.collection_url::<T>()?;
        let document = self
            .client
            .request_document(&url, &self.query_parameters()?)
            .await?;
        Self::single_record(self.client, document)
    }

    pub async fn last<T: Model + 'static>(self) -> Result<Record<T>, ClientError> {
        let url = self.client.collection_url::<T>()?;
        let document = self
            .client
            .request_document(&url, &self.query_parameters()?)
            .await?;

        let Some(datum) = document.collection().last() else {
            return Err(ClientError::MissingData("record not found".to_string()));
        };
        let mut deserializer = Deserializer::new(self.client.registry());
        let record = deserializer.deserialize(datum, &document.included)?;
        Ok(Record {
            data: T::from_record(record),
            meta: document.meta.clone(),
            raw: document,
        })
    }

    fn single_record<T: Model + 'static>(
        client: &Client,
        document: crate::wire::Document,
    ) -> Result<Record<T>, ClientError> {
        let Some(datum) = document.single() else {
            return Err(ClientError::MissingData("record not found".to_string()));
        };
        let mut deserializer = Deserializer::new(client.registry());
        let record = deserializer.deserialize(datum, &document.included)?;
        Ok(Record {
            data: T::from_record(record),
            meta: document.meta.clone(),
            raw: document,
        })
    }

    /// Render the scope as request parameters, validating pagination calls
    /// against the configured strategy.
    pub(crate) fn query_parameters(&self) -> Result<Vec<(String, String)>, ClientError> {
        let mut parameters = Vec::new();

        for (attribute, value) in &self.filter {
            parameters.push((format!("filter[{}]", attribute), value.clone()));
        }

        if !self.sort.is_empty() {
            let rendered: Vec<String> = self
                .sort
                .iter()
                .map(|(attribute, direction)| match direction {
                    SortDirection::Asc => attribute.clone(),
                    SortDirection::Desc => format!("-{}", attribute),
                })
                .collect();
            parameters.push(("sort".to_string(), rendered.join(",")));
        }

        parameters.extend(self.params.iter().cloned());

        for (resource_type, fields) in &self.fields {
            parameters.push((format!("fields[{}]", resource_type), fields.join(",")));
        }

        if !self.includes.is_empty() {
            parameters.push(("include".to_string(), self.includes.join(",")));
        }

        let p = &self.pagination;
        match self.client.config().pagination_strategy {
            PaginationStrategy::PageBased => {
                if p.limit.is_some() || p.offset.is_some() {
                    return Err(ClientError::Pagination(
                        "limit/offset require offset-based pagination".to_string(),
                    ));
                }
                if let Some(number) = p.number {
                    parameters.push(("page[number]".to_string(), number.to_string()));
                }
                if let Some(size) = p.size {
                    parameters.push(("page[size]".to_string(), size.to_string()));
                }
            }
            PaginationStrategy::OffsetBased => {
                if p.number.is_some() || p.size.is_some() {
                    return Err(ClientError::Pagination(
                        "page/per require page-based pagination".to_string(),
                    ));
                }
                if let Some(limit) = p.limit {
                    parameters.push(("page[limit]".to_string(), limit.to_string()));
                }
                if let Some(offset) = p.offset {
                    parameters.push(("page[offset]".to_string(), offset.to_string()));
                }
            }
        }

        Ok(parameters)
    }
}
