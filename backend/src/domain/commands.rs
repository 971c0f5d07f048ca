//! Domain-level command and query types.
//! Front ends build these from user input; services turn them into
//! validated records and storage calls.

pub mod inventory {
    use crate::domain::models::product::{ProductChanges, ProductRecord};
    use crate::storage::SyncStatus;

    /// Input for adding a new product. Values are unchecked until the
    /// service builds a record from them.
    #[derive(Debug, Clone)]
    pub struct AddProductCommand {
        pub id: String,
        pub name: String,
        pub quantity: i64,
        pub unit_price: f64,
    }

    /// Input for changing some fields of an existing product.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateProductCommand {
        pub id: String,
        pub name: Option<String>,
        pub quantity: Option<i64>,
        pub unit_price: Option<f64>,
    }

    impl UpdateProductCommand {
        pub fn changes(&self) -> ProductChanges {
            ProductChanges {
                name: self.name.clone(),
                quantity: self.quantity,
                unit_price: self.unit_price,
            }
        }
    }

    #[derive(Debug, Clone)]
    pub struct RemoveProductCommand {
        pub id: String,
    }

    /// Case-insensitive name search
    #[derive(Debug, Clone)]
    pub struct SearchProductsQuery {
        pub text: String,
    }

    /// Result of adding a product.
    #[derive(Debug)]
    pub struct AddProductResult {
        pub product: ProductRecord,
        pub sync: SyncStatus,
    }
}
