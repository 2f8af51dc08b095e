use std::fmt;
use std::str::FromStr;

/// Statement month codes, declared in calendar order.
///
/// The derived `Ord` is the canonical ordering; the codes themselves do not
/// sort chronologically (`ABR` < `FEV` < `JAN` lexically).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    Jan,
    Fev,
    Mar,
    Abr,
    Mai,
    Jun,
    Jul,
    Ago,
    Set,
    Out,
    Nov,
    Dez,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Fev,
        Month::Mar,
        Month::Abr,
        Month::Mai,
        Month::Jun,
        Month::Jul,
        Month::Ago,
        Month::Set,
        Month::Out,
        Month::Nov,
        Month::Dez,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Month::Jan => "JAN",
            Month::Fev => "FEV",
            Month::Mar => "MAR",
            Month::Abr => "ABR",
            Month::Mai => "MAI",
            Month::Jun => "JUN",
            Month::Jul => "JUL",
            Month::Ago => "AGO",
            Month::Set => "SET",
            Month::Out => "OUT",
            Month::Nov => "NOV",
            Month::Dez => "DEZ",
        }
    }

    /// 1-based calendar month number
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn from_number(n: u32) -> Option<Month> {
        n.checked_sub(1)
            .and_then(|i| Month::ALL.get(i as usize))
            .copied()
    }

    /// Zero-based index in the canonical ordering, or 12 for unknown codes
    /// so they sort after December.
    pub fn order_of(code: &str) -> usize {
        code.parse::<Month>().map(|m| m as usize).unwrap_or(12)
    }
}

impl FromStr for Month {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Month::ALL
            .iter()
            .copied()
            .find(|m| m.code() == code)
            .ok_or(())
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Sort key for a `(mes, ano)` pair: year first, then canonical month index.
pub fn period_key(mes: &str, ano: &str) -> (i32, usize) {
    (ano.trim().parse().unwrap_or(0), Month::order_of(mes))
}
