//! Product and category administration.
//!
//! Products name their category as text. Every write resolves that name
//! against the gateway's current category list first, so a typo surfaces as
//! [`CatalogError::CategoryNotFound`] instead of an orphaned product.
//!
//! Name uniqueness is owned by the gateway. The local duplicate checks only
//! save a round trip; a clash the gateway reports is mapped to the same
//! [`CatalogError::DuplicateCategory`] / [`CatalogError::DuplicateProduct`].

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::domain::{Category, CategoryId, NewProduct, Product, ProductId, ProductUpdate, ValidationError};
use crate::gateway::{GatewayError, InventoryGateway};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("category '{0}' does not exist")]
    CategoryNotFound(String),
    #[error("a category named '{0}' already exists")]
    DuplicateCategory(String),
    #[error("a product named '{0}' already exists")]
    DuplicateProduct(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Looks a category up by its trimmed name. Matching is case-sensitive.
pub fn resolve_category(categories: &[Category], name: &str) -> Result<CategoryId, CatalogError> {
    let name = name.trim();
    categories
        .iter()
        .find(|c| c.name == name)
        .map(|c| c.id)
        .ok_or_else(|| CatalogError::CategoryNotFound(name.to_string()))
}

pub struct Catalog<G> {
    gateway: G,
}

impl<G: InventoryGateway> Catalog<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    #[instrument(skip(self))]
    pub async fn add_category(&self, name: &str) -> Result<Category, CatalogError> {
        // Validates the name before the round trip.
        let name = Category::new(0, name)?.name;
        let categories = self.gateway.load_categories().await?;
        if categories.iter().any(|c| c.name == name) {
            warn!(category = %name, "Duplicate category rejected");
            return Err(CatalogError::DuplicateCategory(name));
        }

        let category = self
            .gateway
            .create_category(name.clone())
            .await
            .map_err(|e| duplicate_or(e, || CatalogError::DuplicateCategory(name)))?;
        info!(category_id = category.id, "Category created");
        Ok(category)
    }

    #[instrument(skip(self, product), fields(product_name = %product.name))]
    pub async fn add_product(&self, product: NewProduct) -> Result<Product, CatalogError> {
        let product = normalized(product)?;

        let products = self.gateway.load_products().await?;
        if products.iter().any(|p| p.name == product.name) {
            warn!("Duplicate product rejected");
            return Err(CatalogError::DuplicateProduct(product.name));
        }
        let categories = self.gateway.load_categories().await?;
        resolve_category(&categories, &product.category)?;

        let name = product.name.clone();
        let created = self
            .gateway
            .create_product(product)
            .await
            .map_err(|e| duplicate_or(e, || CatalogError::DuplicateProduct(name)))?;
        info!(product_id = created.id, "Product created");
        Ok(created)
    }

    #[instrument(skip(self, update))]
    pub async fn update_product(&self, id: ProductId, update: ProductUpdate) -> Result<Product, CatalogError> {
        if let Some(category) = &update.category {
            let categories = self.gateway.load_categories().await?;
            resolve_category(&categories, category)?;
        }
        let new_name = update.name.as_deref().map(str::trim).map(str::to_string);
        if let Some(name) = &new_name {
            let products = self.gateway.load_products().await?;
            if products.iter().any(|p| p.id != id && p.name == *name) {
                return Err(CatalogError::DuplicateProduct(name.clone()));
            }
        }

        let updated = self
            .gateway
            .update_product(id, update)
            .await
            .map_err(|e| duplicate_or(e, || CatalogError::DuplicateProduct(new_name.unwrap_or_default())))?;
        info!(product_id = updated.id, "Product updated");
        Ok(updated)
    }
}

fn duplicate_or(e: GatewayError, duplicate: impl FnOnce() -> CatalogError) -> CatalogError {
    if e.is_duplicate() {
        warn!(error = %e, "Gateway reported a name clash");
        duplicate()
    } else {
        e.into()
    }
}

/// Runs the product invariants locally and returns the trimmed parameters.
fn normalized(product: NewProduct) -> Result<NewProduct, ValidationError> {
    let checked = Product::new(0, product)?;
    Ok(NewProduct {
        name: checked.name,
        description: checked.description,
        category: checked.category,
        stock: checked.stock,
        min_stock: checked.min_stock,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_framework::FakeGateway;

    fn catalog() -> Catalog<FakeGateway> {
        let gateway = FakeGateway::with_products(vec![
            Product::new(1, NewProduct::new("Tornillos", "Ferreteria", 10, 2)).unwrap(),
        ])
        .with_categories(&["Ferreteria", "Limpieza"]);
        Catalog::new(gateway)
    }

    #[test]
    fn resolves_trimmed_names_case_sensitively() {
        let categories = vec![Category::new(3, "Limpieza").unwrap()];

        assert_eq!(resolve_category(&categories, " Limpieza "), Ok(3));
        assert_eq!(
            resolve_category(&categories, "limpieza"),
            Err(CatalogError::CategoryNotFound("limpieza".into()))
        );
    }

    #[tokio::test]
    async fn test_add_product_into_existing_category() {
        let catalog = catalog();

        let product = catalog
            .add_product(NewProduct::new(" Escobas ", "Limpieza", 6, 2).with_description("de paja"))
            .await
            .unwrap();

        assert_eq!(product.name, "Escobas");
        assert_eq!(product.category, "Limpieza");
        assert_eq!(catalog.gateway.calls().last(), Some(&"create_product"));
    }

    #[tokio::test]
    async fn test_add_product_with_unknown_category_is_rejected() {
        let catalog = catalog();

        let result = catalog.add_product(NewProduct::new("Cascos", "Seguridad", 3, 1)).await;

        assert_eq!(result, Err(CatalogError::CategoryNotFound("Seguridad".into())));
        assert!(!catalog.gateway.calls().contains(&"create_product"));
    }

    #[tokio::test]
    async fn test_add_product_rejects_duplicates_and_blank_names() {
        let catalog = catalog();

        let duplicate = catalog.add_product(NewProduct::new("Tornillos", "Ferreteria", 1, 0)).await;
        assert_eq!(duplicate, Err(CatalogError::DuplicateProduct("Tornillos".into())));

        let blank = catalog.add_product(NewProduct::new("  ", "Ferreteria", 1, 0)).await;
        assert!(matches!(blank, Err(CatalogError::Invalid(ValidationError::Blank { .. }))));
        assert!(catalog.gateway.calls().iter().all(|c| *c != "create_product"));
    }

    #[tokio::test]
    async fn test_add_category_rejects_duplicates() {
        let catalog = catalog();

        let created = catalog.add_category("Seguridad").await.unwrap();
        assert_eq!(created.name, "Seguridad");

        let again = catalog.add_category(" Seguridad").await;
        assert_eq!(again, Err(CatalogError::DuplicateCategory("Seguridad".into())));
        assert!(matches!(catalog.add_category("").await, Err(CatalogError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_name_clash_found_by_the_gateway_is_a_duplicate() {
        let catalog = catalog();
        let release = catalog.gateway.hold_product_loads();

        // Both adds pass the local check before either reaches the gateway.
        let (first, second, ()) = tokio::join!(
            catalog.add_product(NewProduct::new("Escobas", "Limpieza", 6, 2)),
            catalog.add_product(NewProduct::new("Escobas", "Limpieza", 3, 1)),
            async {
                while catalog.gateway.calls().iter().filter(|c| **c == "load_products").count() < 2 {
                    tokio::task::yield_now().await;
                }
                release.notify_waiters();
            }
        );

        let results = [first, second];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results.contains(&Err(CatalogError::DuplicateProduct("Escobas".into()))));
        let creates = catalog.gateway.calls().iter().filter(|c| **c == "create_product").count();
        assert_eq!(creates, 2);
    }

    #[tokio::test]
    async fn test_update_product_resolves_new_category() {
        let catalog = catalog();

        let moved = catalog
            .update_product(
                1,
                ProductUpdate {
                    category: Some("Limpieza".into()),
                    min_stock: Some(5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.category, "Limpieza");
        assert_eq!(moved.min_stock, 5);

        let unknown = catalog
            .update_product(
                1,
                ProductUpdate {
                    category: Some("Jardin".into()),
                    ..Default::default()
                },
            )
            .await;
        assert_eq!(unknown, Err(CatalogError::CategoryNotFound("Jardin".into())));
    }

    #[tokio::test]
    async fn test_update_of_missing_product_surfaces_gateway_error() {
        let catalog = catalog();

        let result = catalog.update_product(42, ProductUpdate::default()).await;

        assert!(matches!(result, Err(CatalogError::Gateway(ref e)) if e.kind == crate::gateway::GatewayErrorKind::NotFound));
    }
}
