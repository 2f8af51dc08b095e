/// Filters for the statement list endpoint. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StatementFilters {
    pub registration: Option<String>,
    pub name: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    pub category: Option<String>,
    pub operator: Option<String>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
}

/// Filters accepted by the `/analise/*` endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DashboardFilters {
    pub month: Option<String>,
    pub year: Option<String>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub category: Option<String>,
}

impl StatementFilters {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let fields = [
            ("matricula", &self.registration),
            ("nome", &self.name),
            ("mes", &self.month),
            ("ano", &self.year),
            ("categoria", &self.category),
            ("tomador", &self.operator),
            ("dataInicio", &self.date_start),
            ("dataFim", &self.date_end),
        ];
        present(&fields)
    }

    /// Stable serialized form used as a cache key
    pub fn cache_key(&self) -> String {
        serialize_pairs(&self.query_pairs())
    }
}

impl DashboardFilters {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let fields = [
            ("mes", &self.month),
            ("ano", &self.year),
            ("dataInicio", &self.date_start),
            ("dataFim", &self.date_end),
            ("categoria", &self.category),
        ];
        present(&fields)
    }

    pub fn cache_key(&self) -> String {
        serialize_pairs(&self.query_pairs())
    }
}

impl From<&DashboardFilters> for StatementFilters {
    fn from(f: &DashboardFilters) -> Self {
        StatementFilters {
            month: f.month.clone(),
            year: f.year.clone(),
            category: f.category.clone(),
            date_start: f.date_start.clone(),
            date_end: f.date_end.clone(),
            ..Default::default()
        }
    }
}

fn present(fields: &[(&'static str, &Option<String>)]) -> Vec<(&'static str, String)> {
    fields
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (*key, v.to_string()))
        })
        .collect()
}

fn serialize_pairs(pairs: &[(&'static str, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
