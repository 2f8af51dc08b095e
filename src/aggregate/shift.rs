use serde::{Deserialize, Serialize};

use crate::model::WorkRecord;

/// Jobs worked in one shift slot, with the overall total for percentages
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ShiftCount {
    pub name: String,
    pub value: u32,
    #[serde(default)]
    pub total: u32,
}

impl ShiftCount {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.value as f64 / self.total as f64 * 100.0
        }
    }
}

/// Count jobs per shift code, most worked first.
pub fn shift_distribution(records: &[WorkRecord]) -> Vec<ShiftCount> {
    let mut shifts: Vec<ShiftCount> = Vec::new();

    for record in records {
        let code = record.shift.trim();
        let code = if code.is_empty() { "N/A" } else { code };
        match shifts.iter_mut().find(|s| s.name == code) {
            Some(s) => s.value += 1,
            None => shifts.push(ShiftCount {
                name: code.to_string(),
                value: 1,
                total: 0,
            }),
        }
    }

    let total = records.len() as u32;
    for s in &mut shifts {
        s.total = total;
    }

    shifts.sort_by(|a, b| b.value.cmp(&a.value));
    shifts
}
