use crate::aggregation::SummaryOptions;
use crate::database::Db;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub summary: SummaryOptions,
}

impl AppState {
    pub fn new(db: Db, summary: SummaryOptions) -> Self {
        AppState { db, summary }
    }
}
