use crate::error::Result;
use crate::manager::TaskManager;
use crate::output::{self, Format};
use crate::query::{SearchMode, SearchQuery, SortField, SortOrder};

pub fn run(
    manager: &TaskManager,
    query: &str,
    regex: bool,
    case_sensitive: bool,
    sort: Option<SortField>,
    order: Option<SortOrder>,
    format: Format,
) -> Result<()> {
    let mut search = SearchQuery::new(query).mode(SearchMode {
        regex,
        case_sensitive,
    });
    if let Some(field) = sort {
        search = search.sorted(field, order.unwrap_or_default());
    } else if let Some(order) = order {
        search.order = order;
    }
    output::print_tasks(&manager.search(&search), format)
}
