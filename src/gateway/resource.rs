use std::marker::PhantomData;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::Result;
use crate::models::Entity;

use super::client::{Call, Gateway, Query};
use super::envelope::{Listing, PageRequest, PageResponse, ResponseShape};

/// Page size used when walking a paginated listing to the end.
pub const WALK_PAGE_SIZE: u32 = 100;

/// An entity served under its own REST collection.
pub trait RestResource: Entity {
    /// Collection path under the API base URL.
    const PATH: &'static str;

    /// How this collection wraps its responses.
    const SHAPE: ResponseShape;

    /// Paginated listing, relative to [`RestResource::PATH`].
    const PAGE_SUFFIX: &'static str = "/paginated";

    /// The plain listing answers only with pages; a full fetch walks them.
    const LIST_PAGED: bool = false;
}

/// Typed access to one REST collection.
pub struct Resource<'g, E> {
    gateway: &'g Gateway,
    entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Resource<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Resource<'_, E> {}

impl<'g, E: RestResource> Resource<'g, E> {
    pub(crate) fn new(gateway: &'g Gateway) -> Self {
        Resource {
            gateway,
            entity: PhantomData,
        }
    }

    pub fn gateway(&self) -> &'g Gateway {
        self.gateway
    }

    pub fn url(&self, suffix: &str) -> String {
        self.gateway.api_url(&format!("{}{suffix}", E::PATH))
    }

    pub(crate) fn call(&self, method: Method, suffix: &str) -> Call {
        Call::new(method, self.url(suffix), E::LABEL)
    }

    pub(crate) async fn fetch<T: DeserializeOwned>(&self, call: Call) -> Result<T> {
        self.gateway.fetch(call, E::SHAPE).await
    }

    pub(crate) async fn acknowledge(&self, call: Call) -> Result<()> {
        self.gateway.acknowledge(call, E::SHAPE).await
    }

    pub(crate) async fn download(&self, call: Call) -> Result<Vec<u8>> {
        self.gateway.download(call).await
    }

    /// A listing endpoint answering with an array (or a page, whose content is
    /// taken as-is).
    pub(crate) async fn fetch_list(&self, call: Call) -> Result<Vec<E>> {
        let listing: Listing<E> = self.fetch(call).await?;
        Ok(listing.into_items())
    }

    /// The full collection.
    pub async fn list(&self, filters: &Query) -> Result<Vec<E>> {
        if E::LIST_PAGED {
            return self.fetch_all(filters).await;
        }
        self.fetch_list(self.call(Method::GET, "").query(filters.clone()))
            .await
    }

    /// One server-side page.
    pub async fn page(&self, request: &PageRequest, filters: &Query) -> Result<PageResponse<E>> {
        self.page_at(E::PAGE_SUFFIX, request, filters).await
    }

    pub(crate) async fn page_at(
        &self,
        suffix: &str,
        request: &PageRequest,
        filters: &Query,
    ) -> Result<PageResponse<E>> {
        let query = filters.clone().merge(&request.to_query());
        self.fetch(self.call(Method::GET, suffix).query(query)).await
    }

    /// Walk a paginated listing until the backend reports the last page.
    pub async fn fetch_all(&self, filters: &Query) -> Result<Vec<E>> {
        self.walk(E::PAGE_SUFFIX, filters).await
    }

    pub(crate) async fn walk(&self, suffix: &str, filters: &Query) -> Result<Vec<E>> {
        let mut request = PageRequest::new(0, WALK_PAGE_SIZE);
        let mut items = Vec::new();
        loop {
            let page = self.page_at(suffix, &request, filters).await?;
            let done = page.is_final();
            items.extend(page.content);
            if done {
                break;
            }
            request.page += 1;
        }
        debug!(entity = E::LABEL, pages = request.page + 1, count = items.len(), "walked pages");
        Ok(items)
    }

    pub async fn get(&self, id: &E::Id) -> Result<E> {
        self.fetch(self.call(Method::GET, &format!("/{id}"))).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, input: &B) -> Result<E> {
        self.fetch(self.call(Method::POST, "").json(input)?).await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: &E::Id, input: &B) -> Result<E> {
        self.fetch(self.call(Method::PUT, &format!("/{id}")).json(input)?)
            .await
    }

    pub async fn delete(&self, id: &E::Id) -> Result<()> {
        self.acknowledge(self.call(Method::DELETE, &format!("/{id}")))
            .await
    }

    /// `GET {path}/search` with the given parameters.
    pub async fn search(&self, filters: &Query) -> Result<Vec<E>> {
        self.fetch_list(self.call(Method::GET, "/search").query(filters.clone()))
            .await
    }

    /// `PATCH {path}/{id}/{action}` answering with the updated record.
    pub(crate) async fn transition(&self, id: &E::Id, action: &str, body: Value) -> Result<E> {
        self.fetch(self.call(Method::PATCH, &format!("/{id}/{action}")).json(&body)?)
            .await
    }

    /// A transition without a body.
    pub(crate) async fn trigger(&self, id: &E::Id, action: &str) -> Result<E> {
        self.transition(id, action, json!({})).await
    }
}
