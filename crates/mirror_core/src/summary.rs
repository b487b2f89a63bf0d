/// How a single page job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Saved {
        url: String,
        assets_written: usize,
        assets_failed: usize,
    },
    Failed {
        url: String,
        reason: String,
    },
}

impl PageOutcome {
    pub fn url(&self) -> &str {
        match self {
            PageOutcome::Saved { url, .. } | PageOutcome::Failed { url, .. } => url,
        }
    }
}

/// Tally of a crawl run, in the order pages were processed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    outcomes: Vec<PageOutcome>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: PageOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[PageOutcome] {
        &self.outcomes
    }

    pub fn saved(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PageOutcome::Saved { .. }))
            .count()
    }

    pub fn failed_urls(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PageOutcome::Failed { .. }))
            .map(PageOutcome::url)
            .collect()
    }

    /// Per-asset failures on pages that were otherwise saved.
    pub fn asset_failures(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                PageOutcome::Saved { assets_failed, .. } => *assets_failed,
                PageOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    pub fn all_saved(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| matches!(o, PageOutcome::Saved { .. }))
    }
}
