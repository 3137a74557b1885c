//! Visit Statistics
//!
//! Pure functions over a customer's sale history. Nothing here is
//! incremental, so recomputing from the same history always gives the same
//! answer.

use std::collections::HashMap;

use saturno_store::{Customer, CustomerUpdate, NewSale, Sale};

/// Most frequent product name in `sales`
///
/// Ties go to the product seen first in iteration order.
pub fn favorite_product(sales: &[Sale]) -> Option<&str> {
    // name -> (count, first position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, sale) in sales.iter().enumerate() {
        counts
            .entry(sale.product_name.as_str())
            .or_insert((0, position))
            .0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(name, _)| name)
}

/// Build the partial update for `customer` after `sale`, given its full history
pub fn build_update(customer: &Customer, sale: &NewSale, history: &[Sale]) -> CustomerUpdate {
    CustomerUpdate {
        last_visit: sale.timestamp,
        last_drink: sale.product_name.clone(),
        first_visit: customer.first_visit.is_none().then_some(sale.timestamp),
        favorite_drink: favorite_product(history).map(str::to_string),
    }
}
