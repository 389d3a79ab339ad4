use std::collections::BTreeMap;

/// One ingredient line of the consolidated list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedIngredient {
    pub name: String,
    pub measurement_unit: String,
    pub amount: u64,
}

/// Groups `(name, unit, amount)` rows by the `(name, unit)` pair and sums the
/// amounts. Output is ordered by name, then unit.
pub fn aggregate<I>(rows: I) -> Vec<AggregatedIngredient>
where
    I: IntoIterator<Item = (String, String, u64)>,
{
    let mut groups: BTreeMap<(String, String), u64> = BTreeMap::new();

    for (name, unit, amount) in rows {
        let total = groups.entry((name, unit)).or_default();
        *total = total.saturating_add(amount);
    }

    groups
        .into_iter()
        .map(|((name, measurement_unit), amount)| AggregatedIngredient {
            name,
            measurement_unit,
            amount,
        })
        .collect()
}

pub fn render(username: &str, items: &[AggregatedIngredient]) -> String {
    let mut text = format!("Shopping list of {username}:\n");

    for item in items {
        text.push_str(&format!(
            "{}: {} {}\n",
            item.name, item.amount, item.measurement_unit
        ));
    }

    text
}
