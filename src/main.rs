use tracing::{error, info, Instrument};

use warehouse_withdrawals::app_system::{setup_tracing, WarehouseSystem};
use warehouse_withdrawals::domain::{NewProduct, SessionUser};
use warehouse_withdrawals::{Catalog, WarehouseConfig, WithdrawalDesk};

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = WarehouseConfig::load().map_err(|e| e.to_string())?;
    setup_tracing(&config.logging);

    info!("Starting warehouse demo");

    let system = WarehouseSystem::new(&config);

    // Seed the catalog
    let catalog = Catalog::new(system.gateway());
    let span = tracing::info_span!("catalog_seed");
    let (screws, gloves) = async {
        catalog.add_category("Ferreteria").await?;
        catalog.add_category("Seguridad").await?;
        let screws = catalog
            .add_product(NewProduct::new("Tornillos 3/8", "Ferreteria", 120, 20).with_description("Caja de 100"))
            .await?;
        let gloves = catalog.add_product(NewProduct::new("Guantes de nitrilo", "Seguridad", 12, 10)).await?;
        Ok::<_, warehouse_withdrawals::CatalogError>((screws, gloves))
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    info!(screws = screws.id, gloves = gloves.id, "Catalog seeded");

    // One counter session
    let desk = WithdrawalDesk::new(system.gateway());
    desk.refresh_all().await.map_err(|e| e.to_string())?;

    let clerk = SessionUser::new(1, "Ana Rojas", "Bodega");
    desk.add_to_cart(screws.id, 30).map_err(|e| e.to_string())?;
    desk.add_to_cart(gloves.id, 4).map_err(|e| e.to_string())?;

    if let Err(e) = desk.add_to_cart(gloves.id, 50) {
        info!(error = %e, "Oversized request refused as expected");
    }

    let span = tracing::info_span!("withdrawal_confirmation");
    let outcome = async {
        info!("Confirming withdrawal");
        desk.confirm_withdrawal("Luis Pérez", "Mantenimiento", Some("Reparación bomba 2"), Some(&clerk))
            .await
    }
    .instrument(span)
    .await;

    match outcome {
        Ok(withdrawal) => info!(
            withdrawal_id = withdrawal.id,
            total_items = withdrawal.total_items,
            "Withdrawal registered"
        ),
        Err(e) => error!(error = %e, "Withdrawal failed"),
    }

    let report = desk.report(config.top_withdrawn_limit);
    let rendered = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
    println!("{rendered}");

    // Gateways hold client clones; release them before shutdown.
    drop(desk);
    drop(catalog);
    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
