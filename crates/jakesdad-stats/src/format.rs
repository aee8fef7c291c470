/// How a category's value is shown next to an owner's name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Format {
    /// Whole count with a unit noun: "1 Ring", "3 Rings".
    Count {
        singular: &'static str,
        plural: &'static str,
    },
    /// "66.7%"
    Percent { decimals: usize },
    /// "1234.5 pts"
    Decimal {
        decimals: usize,
        suffix: &'static str,
    },
}

impl Format {
    pub fn render(&self, value: f64) -> String {
        match *self {
            Format::Count { singular, plural } => {
                let n = value.round() as i64;
                let noun = if n == 1 { singular } else { plural };
                format!("{n} {noun}")
            }
            Format::Percent { decimals } => format!("{value:.decimals$}%"),
            Format::Decimal { decimals, suffix } if suffix.is_empty() => {
                format!("{value:.decimals$}")
            }
            Format::Decimal { decimals, suffix } => format!("{value:.decimals$} {suffix}"),
        }
    }
}
