use tracing::warn;

use crate::model::{QualityWarning, WarningKind};

/// Collects recoverable problems and logs each one as it is recorded.
#[derive(Debug, Default)]
pub struct WarningLog {
    warnings: Vec<QualityWarning>,
}

impl WarningLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        kind: WarningKind,
        sheet: &str,
        row: Option<usize>,
        message: impl Into<String>,
    ) {
        let message = message.into();
        warn!(?kind, sheet, row, "{message}");
        self.warnings.push(QualityWarning {
            kind,
            sheet: sheet.to_string(),
            row,
            message,
        });
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|warning| warning.kind == kind).count()
    }

    pub fn into_inner(self) -> Vec<QualityWarning> {
        self.warnings
    }
}
