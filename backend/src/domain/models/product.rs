//! Domain model for a product record.
use std::fmt;
use thiserror::Error;

/// Fields of a product that callers can supply values for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Id,
    Name,
    Quantity,
    UnitPrice,
}

impl ProductField {
    /// Column name in the inventory file
    pub fn column(&self) -> &'static str {
        match self {
            ProductField::Id => "id",
            ProductField::Name => "nombre",
            ProductField::Quantity => "cantidad",
            ProductField::UnitPrice => "precio",
        }
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProductField::Id => "id",
            ProductField::Name => "name",
            ProductField::Quantity => "quantity",
            ProductField::UnitPrice => "unit price",
        };
        f.write_str(label)
    }
}

/// A value rejected for one field of a product
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {field}: {reason}")]
pub struct InvalidValue {
    pub field: ProductField,
    pub reason: String,
}

impl InvalidValue {
    pub fn new(field: ProductField, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// A single inventory entry.
///
/// Fields are private so that every instance holds a non-empty id, a
/// quantity that cannot go below zero and a finite, non-negative price
/// rounded to cents.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    id: String,
    name: String,
    quantity: u64,
    unit_price: f64,
}

impl ProductRecord {
    /// Build a record, trimming the id and name.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        quantity: i64,
        unit_price: f64,
    ) -> Result<Self, InvalidValue> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(InvalidValue::new(ProductField::Id, "id cannot be empty"));
        }

        Ok(Self {
            id,
            name: name.into().trim().to_string(),
            quantity: validate_quantity(quantity)?,
            unit_price: validate_unit_price(unit_price)?,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into().trim().to_string();
    }

    /// Replace the quantity; a negative value leaves the record unchanged.
    pub fn set_quantity(&mut self, quantity: i64) -> Result<(), InvalidValue> {
        self.quantity = validate_quantity(quantity)?;
        Ok(())
    }

    /// Replace the unit price; a negative or non-finite value leaves the record unchanged.
    pub fn set_unit_price(&mut self, unit_price: f64) -> Result<(), InvalidValue> {
        self.unit_price = validate_unit_price(unit_price)?;
        Ok(())
    }
}

impl fmt::Display for ProductRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} (x{}) ${:.2}",
            self.id, self.name, self.quantity, self.unit_price
        )
    }
}

/// Partial update of a record. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price: Option<f64>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.quantity.is_none() && self.unit_price.is_none()
    }
}

pub fn validate_quantity(quantity: i64) -> Result<u64, InvalidValue> {
    u64::try_from(quantity).map_err(|_| {
        InvalidValue::new(
            ProductField::Quantity,
            format!("{} is negative", quantity),
        )
    })
}

/// Validate a price and round it to cents, the precision the file keeps.
pub fn validate_unit_price(unit_price: f64) -> Result<f64, InvalidValue> {
    if !unit_price.is_finite() {
        return Err(InvalidValue::new(
            ProductField::UnitPrice,
            format!("{} is not a finite number", unit_price),
        ));
    }
    if unit_price < 0.0 {
        return Err(InvalidValue::new(
            ProductField::UnitPrice,
            format!("{} is negative", unit_price),
        ));
    }
    // adding 0.0 turns -0.0 into 0.0
    Ok((unit_price * 100.0).round() / 100.0 + 0.0)
}

impl From<&ProductRecord> for shared::Product {
    fn from(record: &ProductRecord) -> Self {
        shared::Product {
            id: record.id.clone(),
            name: record.name.clone(),
            quantity: i64::try_from(record.quantity).unwrap_or(i64::MAX),
            unit_price: record.unit_price,
        }
    }
}

impl TryFrom<shared::Product> for ProductRecord {
    type Error = InvalidValue;

    fn try_from(product: shared::Product) -> Result<Self, InvalidValue> {
        ProductRecord::new(product.id, product.name, product.quantity, product.unit_price)
    }
}
