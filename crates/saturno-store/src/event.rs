//! Document Trigger Events

use serde::{Deserialize, Serialize};

use crate::model::{NewSale, Sale, SaleId};

/// Fired once for every document created under `sales/`
///
/// Delivery is at-least-once: consumers must tolerate seeing the same event
/// twice. `data` is `None` when the trigger source could not attach the
/// document snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaleCreated {
    pub sale_id: SaleId,
    pub data: Option<NewSale>,
}

impl SaleCreated {
    pub const fn new(sale_id: SaleId, data: Option<NewSale>) -> Self {
        Self { sale_id, data }
    }
}

impl From<&Sale> for SaleCreated {
    fn from(sale: &Sale) -> Self {
        Self {
            sale_id: sale.id.clone(),
            data: Some(NewSale {
                customer_id: sale.customer_id.clone(),
                product_name: sale.product_name.clone(),
                timestamp: sale.timestamp,
            }),
        }
    }
}
