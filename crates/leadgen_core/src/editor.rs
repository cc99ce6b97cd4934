use crate::model::{
    ApolloConfig, ApolloGenerateParams, ApolloSearchType, ScrapeParams, ScraperConfig,
};

pub const DEFAULT_MAX_LEADS: u32 = 50;
pub const MAX_LEADS_LIMIT: u32 = 500;
pub const APOLLO_MAX_LEADS_LIMIT: u32 = 100;
pub const DEFAULT_SOURCES: [&str; 2] = ["google_search", "yellow_pages"];
const APOLLO_PREFILL_LOCATIONS: usize = 3;

/// List-valued form fields editable through tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    Keywords,
    Locations,
    Sources,
    Titles,
    Industries,
}

/// A single user edit to one of the job launch forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEdit {
    TagAdded { field: TagField, value: String },
    TagRemoved { field: TagField, value: String },
    MaxLeadsChanged(u32),
    AnalyzeWithAiChanged(bool),
    SaveLeadsChanged(bool),
    KeywordsTextChanged(String),
    SearchTypeChanged(ApolloSearchType),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please add at least one keyword and one location")]
    MissingKeywordsOrLocations,
    #[error("Apollo.io API key is not configured. Please add APOLLO_API_KEY to your environment.")]
    ApolloNotConfigured,
}

/// Ordered list of unique, trimmed, non-empty values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagList {
    items: Vec<String>,
}

impl TagList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the trimmed input is empty or already present.
    pub fn add(&mut self, input: &str) -> bool {
        let value = input.trim();
        if value.is_empty() || self.items.iter().any(|item| item == value) {
            return false;
        }
        self.items.push(value.to_string());
        true
    }

    pub fn remove(&mut self, value: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item != value);
        self.items.len() != before
    }

    pub fn replace_all<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.items.clear();
        for value in values {
            self.add(value.as_ref());
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    fn to_optional(&self) -> Option<Vec<String>> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.clone())
        }
    }
}

fn clamp_max_leads(value: u32, limit: u32) -> u32 {
    value.clamp(1, limit)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeForm {
    pub keywords: TagList,
    pub locations: TagList,
    pub sources: TagList,
    max_leads: u32,
    pub analyze_with_ai: bool,
}

impl Default for ScrapeForm {
    fn default() -> Self {
        let mut sources = TagList::new();
        sources.replace_all(DEFAULT_SOURCES);
        Self {
            keywords: TagList::new(),
            locations: TagList::new(),
            sources,
            max_leads: DEFAULT_MAX_LEADS,
            analyze_with_ai: true,
        }
    }
}

impl ScrapeForm {
    pub fn max_leads(&self) -> u32 {
        self.max_leads
    }

    pub fn set_max_leads(&mut self, value: u32) {
        self.max_leads = clamp_max_leads(value, MAX_LEADS_LIMIT);
    }

    /// Seeds keywords and locations from the scraper defaults when present.
    pub fn prefill(&mut self, config: &ScraperConfig) {
        if !config.target_industries.is_empty() {
            self.keywords.replace_all(&config.target_industries);
        }
        if !config.target_locations.is_empty() {
            self.locations.replace_all(&config.target_locations);
        }
    }

    /// Applies an edit; returns false when nothing changed.
    pub fn apply(&mut self, edit: FormEdit) -> bool {
        match edit {
            FormEdit::TagAdded { field, value } => {
                self.tags_mut(field).is_some_and(|tags| tags.add(&value))
            }
            FormEdit::TagRemoved { field, value } => {
                self.tags_mut(field).is_some_and(|tags| tags.remove(&value))
            }
            FormEdit::MaxLeadsChanged(value) => {
                self.set_max_leads(value);
                true
            }
            FormEdit::AnalyzeWithAiChanged(value) => {
                self.analyze_with_ai = value;
                true
            }
            FormEdit::SaveLeadsChanged(_)
            | FormEdit::KeywordsTextChanged(_)
            | FormEdit::SearchTypeChanged(_) => false,
        }
    }

    fn tags_mut(&mut self, field: TagField) -> Option<&mut TagList> {
        match field {
            TagField::Keywords => Some(&mut self.keywords),
            TagField::Locations => Some(&mut self.locations),
            TagField::Sources => Some(&mut self.sources),
            TagField::Titles | TagField::Industries => None,
        }
    }

    pub fn submit(&self) -> Result<ScrapeParams, FormError> {
        if self.keywords.is_empty() || self.locations.is_empty() {
            return Err(FormError::MissingKeywordsOrLocations);
        }
        Ok(ScrapeParams {
            keywords: self.keywords.items().to_vec(),
            locations: self.locations.items().to_vec(),
            max_leads: self.max_leads,
            sources: self.sources.items().to_vec(),
            analyze_with_ai: self.analyze_with_ai,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApolloForm {
    pub search_type: ApolloSearchType,
    pub titles: TagList,
    pub locations: TagList,
    pub industries: TagList,
    pub keywords: String,
    max_leads: u32,
    pub analyze_with_ai: bool,
    pub save_leads: bool,
    configured: bool,
}

impl Default for ApolloForm {
    fn default() -> Self {
        Self {
            search_type: ApolloSearchType::People,
            titles: TagList::new(),
            locations: TagList::new(),
            industries: TagList::new(),
            keywords: String::new(),
            max_leads: DEFAULT_MAX_LEADS,
            analyze_with_ai: true,
            save_leads: true,
            configured: false,
        }
    }
}

impl ApolloForm {
    pub fn max_leads(&self) -> u32 {
        self.max_leads
    }

    pub fn set_max_leads(&mut self, value: u32) {
        self.max_leads = clamp_max_leads(value, APOLLO_MAX_LEADS_LIMIT);
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn prefill(&mut self, config: &ApolloConfig) {
        self.configured = config.is_configured;
        if !config.target_locations.is_empty() {
            self.locations.replace_all(
                config
                    .target_locations
                    .iter()
                    .take(APOLLO_PREFILL_LOCATIONS),
            );
        }
    }

    pub fn apply(&mut self, edit: FormEdit) -> bool {
        match edit {
            FormEdit::TagAdded { field, value } => {
                self.tags_mut(field).is_some_and(|tags| tags.add(&value))
            }
            FormEdit::TagRemoved { field, value } => {
                self.tags_mut(field).is_some_and(|tags| tags.remove(&value))
            }
            FormEdit::MaxLeadsChanged(value) => {
                self.set_max_leads(value);
                true
            }
            FormEdit::AnalyzeWithAiChanged(value) => {
                self.analyze_with_ai = value;
                true
            }
            FormEdit::SaveLeadsChanged(value) => {
                self.save_leads = value;
                true
            }
            FormEdit::KeywordsTextChanged(text) => {
                self.keywords = text;
                true
            }
            FormEdit::SearchTypeChanged(search_type) => {
                self.search_type = search_type;
                true
            }
        }
    }

    fn tags_mut(&mut self, field: TagField) -> Option<&mut TagList> {
        match field {
            TagField::Titles => Some(&mut self.titles),
            TagField::Locations => Some(&mut self.locations),
            TagField::Industries => Some(&mut self.industries),
            TagField::Keywords | TagField::Sources => None,
        }
    }

    pub fn submit(&self) -> Result<ApolloGenerateParams, FormError> {
        if !self.configured {
            return Err(FormError::ApolloNotConfigured);
        }
        let keywords = self.keywords.trim();
        Ok(ApolloGenerateParams {
            search_type: self.search_type,
            person_titles: self.titles.to_optional(),
            person_locations: self.locations.to_optional(),
            organization_industries: self.industries.to_optional(),
            keywords: (!keywords.is_empty()).then(|| keywords.to_string()),
            max_leads: self.max_leads,
            analyze_with_ai: self.analyze_with_ai,
            save_leads: self.save_leads,
        })
    }
}
