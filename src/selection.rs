use crate::catalog::TestCatalog;
use crate::descriptor::TestDescriptor;
use crate::filter::{FilterSet, FilterSetResult};
use log::{debug, trace};
use serde::Serialize;

/// Selection outcome for one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionEntry {
    pub path: String,
    pub id: Option<String>,
    pub depth: usize,
    pub decision: FilterSetResult,
    pub selected: bool,
}

/// Walk the catalog and decide which tests run under `set`.
///
/// An included test is selected, an excluded one is not, and an unmatched
/// test follows its parent. Roots follow the set itself: with no inclusion
/// rules everything not excluded runs.
pub fn select(catalog: &TestCatalog, set: &FilterSet) -> Vec<SelectionEntry> {
    let root_default = !set.has_inclusion_rules();
    let mut entries: Vec<SelectionEntry> = Vec::with_capacity(catalog.len());

    for test in catalog.tests() {
        let inherited = test
            .parent()
            .and_then(|index| entries.get(index))
            .map_or(root_default, |parent| parent.selected);
        let decision = set.evaluate(test);
        let selected = match decision {
            FilterSetResult::Include => true,
            FilterSetResult::Exclude => false,
            FilterSetResult::Unmatched => inherited,
        };
        trace!("{} -> {decision:?} (selected: {selected})", test.path());

        entries.push(SelectionEntry {
            path: test.path().to_string(),
            id: test.id().map(str::to_string),
            depth: test.depth(),
            decision,
            selected,
        });
    }

    debug!(
        "selected {} of {} tests",
        entries.iter().filter(|e| e.selected).count(),
        entries.len()
    );
    entries
}
