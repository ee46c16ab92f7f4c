/// Stock operations performed on a single product record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductAction {
    /// Reads the current stock level without modifying it.
    CheckStock,
    /// Removes units from stock.
    ///
    /// # Errors
    /// Fails when the amount exceeds the available stock or is zero.
    Withdraw(u32),
    /// Puts units back, e.g. when a multi-line withdrawal is rolled back.
    Restock(u32),
}

/// Every product action answers with the stock level after it ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductActionResult {
    StockLevel(u32),
}
