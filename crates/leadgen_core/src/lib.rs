//! Leadgen core: wire types, lead table state and the pure update loop.
mod editor;
mod effect;
mod job;
mod model;
mod msg;
mod score;
mod state;
mod table;
mod update;
mod view_model;

pub use editor::{
    ApolloForm, FormEdit, FormError, ScrapeForm, TagField, TagList, APOLLO_MAX_LEADS_LIMIT,
    DEFAULT_MAX_LEADS, DEFAULT_SOURCES, MAX_LEADS_LIMIT,
};
pub use effect::Effect;
pub use job::TrackedJob;
pub use model::*;
pub use msg::Msg;
pub use score::{score_band, score_tier, ScoreBand, ScoreTier};
pub use state::{AppState, Notification, NotificationLevel, MAX_NOTIFICATIONS};
pub use table::{
    LeadFilter, LeadTable, SearchMode, TableSummary, DEFAULT_FETCH_SIZE, DEFAULT_ROWS_PER_PAGE,
};
pub use update::update;
pub use view_model::{AppViewModel, JobProgressView, LeadRowView};
