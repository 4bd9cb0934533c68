use super::data::MeasurementRecord;

/// Ordered store of completed measurements
///
/// Insertion order is measurement order, display order and export order.
/// Records only come in through `append` and only leave through `delete_last`
/// or `reset`.
#[derive(Debug, Clone, Default)]
pub struct ResultsLedger {
    records: Vec<MeasurementRecord>,
}

impl ResultsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: MeasurementRecord) {
        self.records.push(record);
    }

    /// Remove and return the final record, if any
    pub fn delete_last(&mut self) -> Option<MeasurementRecord> {
        self.records.pop()
    }

    pub fn reset(&mut self) {
        self.records.clear();
    }

    pub fn last(&self) -> Option<&MeasurementRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[MeasurementRecord] {
        &self.records
    }

    /// Copy of the rows for serialization; the ledger is untouched
    pub fn export(&self) -> Vec<MeasurementRecord> {
        self.records.clone()
    }
}
