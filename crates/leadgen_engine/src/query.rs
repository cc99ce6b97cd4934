use leadgen_core::LeadQuery;
use url::form_urlencoded;
use url::Url;

/// Collects query parameters, dropping absent and empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryBuilder {
    pairs: Vec<(&'static str, String)>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param<V: ToString>(mut self, key: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            let value = value.to_string();
            if !value.is_empty() {
                self.pairs.push((key, value));
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encoded query string without the leading `?`.
    pub fn build(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(key, value)| (*key, value.as_str())))
            .finish()
    }

    pub(crate) fn apply(&self, url: &mut Url) {
        if self.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&self.build()));
        }
    }
}

impl From<&LeadQuery> for QueryBuilder {
    fn from(query: &LeadQuery) -> Self {
        QueryBuilder::new()
            .param("status", query.status.as_deref())
            .param("priority", query.priority.as_deref())
            .param("industry", query.industry.as_deref())
            .param("location", query.location.as_deref())
            .param("search", query.search.as_deref())
            .param("page", query.page)
            .param("per_page", query.per_page)
    }
}
